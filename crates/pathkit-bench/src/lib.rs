//! # Pathkit Bench
//!
//! Workload generators shared by the criterion benchmarks.
//!
//! Run with: cargo bench -p pathkit-bench

use pathkit_svg::{Document, Group, Path, Transform};

/// Path data with `n` line commands zig-zagging along the x axis.
pub fn generate_polyline(n: usize) -> String {
    let mut d = String::from("M0,0");
    for i in 1..=n {
        let y = if i % 2 == 0 { 0 } else { 10 };
        d.push_str(&format!(" L{},{}", i * 10, y));
    }
    d
}

/// Path data with `n` relative cubic curves.
pub fn generate_curves(n: usize) -> String {
    let mut d = String::from("M0 0");
    for _ in 0..n {
        d.push_str(" c0,20 20,20 20,0");
    }
    d.push_str(" z");
    d
}

/// A document of `groups` translated groups, each holding `paths` curved paths.
pub fn generate_document(groups: usize, paths: usize) -> Document {
    let mut doc = Document::new("bench").with_size("1000", "1000");
    for g in 0..groups {
        let mut group = Group::new(format!("g{g}"))
            .with_transform(Transform::identity().translate(0.0, g as f64 * 25.0));
        for p in 0..paths {
            group = group.with_child(Path::new(format!("g{g}p{p}"), generate_curves(8)));
        }
        doc = doc.with_child(group);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathkit_svg::RenderContext;

    #[test]
    fn generated_paths_interpret_cleanly() {
        let ctx = RenderContext::default();
        let segs = Path::new("poly", generate_polyline(10)).segments(&ctx).unwrap();
        assert_eq!(segs[0].points.len(), 11);

        let segs = Path::new("curves", generate_curves(3)).segments(&ctx).unwrap();
        assert!(segs[0].closed);
    }

    #[test]
    fn document_shape() {
        let doc = generate_document(3, 4);
        assert_eq!(doc.children.len(), 3);
        assert_eq!(doc.children[0].kind(), "group");
    }
}
