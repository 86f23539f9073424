//! Pathkit benchmarks
//!
//! Run with: cargo bench -p pathkit-bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pathkit_bench::{generate_curves, generate_document, generate_polyline};
use pathkit_lexer::lex;
use pathkit_svg::{
    CancelToken, CubicBezier, Path, Point, RenderConfig, RenderContext, Transform,
};

fn lexer_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    for n in [10, 100, 1000] {
        let d = generate_polyline(n);
        group.throughput(Throughput::Bytes(d.len() as u64));
        group.bench_with_input(BenchmarkId::new("tokens", n), &d, |b, d| {
            b.iter(|| lex("bench", d).count())
        });
    }

    group.bench_function("transform_list", |b| {
        b.iter(|| Transform::parse("matrix(1 0 0 1 5 5) translate(10, 20) translate(-3 4)"))
    });

    group.finish();
}

fn bezier_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("bezier");

    let curve = CubicBezier::new(
        Point::new(0.0, 0.0),
        Point::new(0.0, 100.0),
        Point::new(100.0, 100.0),
        Point::new(100.0, 0.0),
    );
    for depth in [4, 10, 16] {
        group.bench_with_input(BenchmarkId::new("flatten", depth), &depth, |b, &depth| {
            b.iter(|| curve.flatten(depth))
        });
    }
    group.bench_function("sample_64", |b| b.iter(|| curve.sample(64)));

    group.finish();
}

fn interpreter_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpreter");
    let ctx = RenderContext::default();

    for n in [10, 100, 1000] {
        let path = Path::new("lines", generate_polyline(n));
        group.bench_with_input(BenchmarkId::new("segments_lines", n), &path, |b, path| {
            b.iter(|| path.segments(&ctx))
        });

        let path = Path::new("curves", generate_curves(n));
        group.bench_with_input(BenchmarkId::new("segments_curves", n), &path, |b, path| {
            b.iter(|| path.segments(&ctx))
        });
        group.bench_with_input(BenchmarkId::new("instructions_curves", n), &path, |b, path| {
            b.iter(|| path.instructions(&ctx))
        });
    }

    group.finish();
}

fn tree_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree");
    group.sample_size(20);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("skipping tree benchmarks: {err}");
            return;
        }
    };

    for (groups, paths) in [(4, 4), (16, 16)] {
        let doc = generate_document(groups, paths);
        let id = format!("{groups}x{paths}");
        group.bench_with_input(BenchmarkId::new("produce", &id), &doc, |b, doc| {
            b.iter(|| {
                runtime.block_on(async {
                    doc.produce(RenderConfig::default(), CancelToken::never())
                        .collect()
                        .await
                })
            })
        });
        group.bench_with_input(BenchmarkId::new("produce_segments", &id), &doc, |b, doc| {
            b.iter(|| {
                runtime.block_on(async {
                    doc.produce_segments(RenderConfig::default(), CancelToken::never())
                        .collect()
                        .await
                })
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    lexer_benchmarks,
    bezier_benchmarks,
    interpreter_benchmarks,
    tree_benchmarks,
);

criterion_main!(benches);
