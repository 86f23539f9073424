//! Element tree and ordered stream aggregation.
//!
//! The tree is plain data built bottom-up by the caller. Producing output
//! spawns one task per node: leaves interpret themselves, groups forward
//! their children's items strictly in document order while a separate task
//! per child drains that child's errors.

use std::sync::Arc;

use pathkit_common::RenderConfig;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::context::{send_or_cancel, CancelToken, Delivery, RenderContext};
use crate::error::{SvgError, SvgResult};
use crate::instruction::{DrawingInstruction, PaintAttrs};
use crate::parse::number_list;
use crate::path::Path;
use crate::{Point, Segment, Transform};

/// Output of a producer: ordered items plus an independent error stream.
///
/// Both channels close when the producer is done.
#[derive(Debug)]
pub struct Streams<T> {
    pub items: mpsc::Receiver<T>,
    pub errors: mpsc::UnboundedReceiver<SvgError>,
}

impl<T> Streams<T> {
    /// Drain all items, then all errors.
    pub async fn collect(mut self) -> (Vec<T>, Vec<SvgError>) {
        let mut items = Vec::new();
        while let Some(item) = self.items.recv().await {
            items.push(item);
        }
        let mut errors = Vec::new();
        while let Some(err) = self.errors.recv().await {
            errors.push(err);
        }
        (items, errors)
    }
}

/// A `<g>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub id: String,
    pub transform: Transform,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub fill: Option<String>,
    pub fill_rule: Option<String>,
    pub children: Vec<Node>,
}

impl Group {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the transform from `transform` attribute text.
    pub fn with_transform_attr(mut self, text: &str) -> SvgResult<Self> {
        self.transform = Transform::parse(text)?;
        Ok(self)
    }

    pub fn with_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_fill_rule(mut self, rule: impl Into<String>) -> Self {
        self.fill_rule = Some(rule.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn produce(self: Arc<Self>, ctx: RenderContext) -> Streams<DrawingInstruction> {
        let child_ctx = ctx.for_group(&self);
        debug!(group = %self.id, children = self.children.len(), "Group producer started");
        aggregate(self.children.clone(), child_ctx, |node, ctx| node.produce(ctx))
    }

    pub fn produce_segments(self: Arc<Self>, ctx: RenderContext) -> Streams<Segment> {
        let child_ctx = ctx.for_group(&self);
        debug!(group = %self.id, children = self.children.len(), "Group segment producer started");
        aggregate(self.children.clone(), child_ctx, |node, ctx| node.produce_segments(ctx))
    }
}

/// A `<circle>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circle {
    pub id: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: Option<String>,
}

impl Circle {
    pub fn new(id: impl Into<String>, cx: f64, cy: f64, r: f64) -> Self {
        Self {
            id: id.into(),
            cx,
            cy,
            r,
            fill: None,
        }
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// `Circle` then `Paint`, in device space.
    ///
    /// The radius is scaled by the square root of the transform's area
    /// factor, which is exact for uniform scales.
    pub fn instructions(&self, ctx: &RenderContext) -> Vec<DrawingInstruction> {
        let center = ctx.transform.apply_point(Point::new(self.cx, self.cy));
        let radius = self.r * ctx.transform.determinant().abs().sqrt();
        let fill = self.fill.clone().or_else(|| ctx.paint.fill.clone());
        vec![
            DrawingInstruction::Circle { center, radius },
            DrawingInstruction::Paint(PaintAttrs::fill_only(fill)),
        ]
    }

    pub fn produce(self: Arc<Self>, ctx: RenderContext) -> Streams<DrawingInstruction> {
        let (tx, items) = mpsc::channel(ctx.channel_capacity());
        let (err_tx, errors) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for instruction in self.instructions(&ctx) {
                match send_or_cancel(&tx, instruction, &ctx.cancel).await {
                    Delivery::Sent => {}
                    Delivery::Closed => return,
                    Delivery::Cancelled => {
                        let _ = err_tx.send(SvgError::Cancelled);
                        return;
                    }
                }
            }
        });

        Streams { items, errors }
    }
}

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group(Arc<Group>),
    Path(Arc<Path>),
    Circle(Arc<Circle>),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Group(_) => "group",
            Node::Path(_) => "path",
            Node::Circle(_) => "circle",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Node::Group(g) => &g.id,
            Node::Path(p) => &p.id,
            Node::Circle(c) => &c.id,
        }
    }

    pub fn produce(&self, ctx: RenderContext) -> Streams<DrawingInstruction> {
        match self {
            Node::Group(g) => Arc::clone(g).produce(ctx),
            Node::Path(p) => Arc::clone(p).produce(ctx),
            Node::Circle(c) => Arc::clone(c).produce(ctx),
        }
    }

    /// Polyline output. Circles contribute nothing.
    pub fn produce_segments(&self, ctx: RenderContext) -> Streams<Segment> {
        match self {
            Node::Group(g) => Arc::clone(g).produce_segments(ctx),
            Node::Path(p) => Arc::clone(p).produce_segments(ctx),
            Node::Circle(_) => empty_streams(),
        }
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(Arc::new(group))
    }
}

impl From<Path> for Node {
    fn from(path: Path) -> Self {
        Node::Path(Arc::new(path))
    }
}

impl From<Circle> for Node {
    fn from(circle: Circle) -> Self {
        Node::Circle(Arc::new(circle))
    }
}

fn empty_streams<T>() -> Streams<T> {
    let (_, items) = mpsc::channel(1);
    let (_, errors) = mpsc::unbounded_channel();
    Streams { items, errors }
}

/// Root of an element tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub name: String,
    pub width: String,
    pub height: String,
    pub view_box: Option<String>,
    /// Output scale. Negative values mean `1 / -scale`; zero means `1`.
    pub scale: f64,
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: 1.0,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: impl Into<String>, height: impl Into<String>) -> Self {
        self.width = width.into();
        self.height = height.into();
        self
    }

    pub fn with_view_box(mut self, view_box: impl Into<String>) -> Self {
        self.view_box = Some(view_box.into());
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// `[min_x, min_y, width, height]` from the `viewBox` attribute.
    pub fn view_box_values(&self) -> SvgResult<Option<[f64; 4]>> {
        let Some(text) = self.view_box.as_deref() else {
            return Ok(None);
        };
        match number_list("viewBox", text)?.as_slice() {
            &[x, y, w, h] => Ok(Some([x, y, w, h])),
            other => Err(SvgError::invalid_attribute(
                "viewBox",
                format!("expected 4 numbers, found {}", other.len()),
            )),
        }
    }

    /// Root context: the document scale applied to everything below.
    pub fn context(&self, config: RenderConfig, cancel: CancelToken) -> RenderContext {
        RenderContext::new(config, cancel).with_scale(self.scale)
    }

    pub fn produce(&self, config: RenderConfig, cancel: CancelToken) -> Streams<DrawingInstruction> {
        let ctx = self.context(config, cancel);
        debug!(document = %self.name, children = self.children.len(), "Document producer started");
        aggregate(self.children.clone(), ctx, |node, ctx| node.produce(ctx))
    }

    pub fn produce_segments(&self, config: RenderConfig, cancel: CancelToken) -> Streams<Segment> {
        let ctx = self.context(config, cancel);
        debug!(document = %self.name, children = self.children.len(), "Document segment producer started");
        aggregate(self.children.clone(), ctx, |node, ctx| node.produce_segments(ctx))
    }
}

/// Forward each child's items in order, draining each child's errors in
/// its own task.
///
/// The returned error stream closes only after every drain task has
/// finished, so no child can still be writing when it does.
fn aggregate<T, F>(children: Vec<Node>, ctx: RenderContext, start: F) -> Streams<T>
where
    T: Send + 'static,
    F: Fn(&Node, RenderContext) -> Streams<T> + Send + 'static,
{
    let (tx, items) = mpsc::channel(ctx.channel_capacity());
    let (err_tx, errors) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut drains: Vec<JoinHandle<()>> = Vec::with_capacity(children.len());

        'children: for (index, child) in children.iter().enumerate() {
            if ctx.cancel.is_cancelled() {
                debug!(remaining = children.len() - index, "Cancelled before child");
                break;
            }

            let ordinal = index + 1;
            let Streams {
                items: mut child_items,
                errors: child_errors,
            } = start(child, ctx.clone());
            drains.push(tokio::spawn(drain_errors(child_errors, err_tx.clone(), ordinal)));

            while let Some(item) = child_items.recv().await {
                match send_or_cancel(&tx, item, &ctx.cancel).await {
                    Delivery::Sent => {}
                    Delivery::Closed => {
                        debug!(ordinal, kind = child.kind(), "Consumer went away");
                        break 'children;
                    }
                    Delivery::Cancelled => break 'children,
                }
            }
        }

        // Items close first so a consumer reading items-then-errors never waits
        // on a drain.
        drop(tx);
        for drain in drains {
            if let Err(err) = drain.await {
                warn!(error = %err, "Error drain task failed");
            }
        }
    });

    Streams { items, errors }
}

async fn drain_errors(
    mut errors: mpsc::UnboundedReceiver<SvgError>,
    out: mpsc::UnboundedSender<SvgError>,
    ordinal: usize,
) {
    while let Some(err) = errors.recv().await {
        let _ = out.send(err.in_element(ordinal));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_box_values() {
        let doc = Document::new("d").with_view_box("0 0, 100 50");
        assert_eq!(doc.view_box_values().unwrap(), Some([0.0, 0.0, 100.0, 50.0]));

        assert_eq!(Document::new("d").view_box_values().unwrap(), None);

        let short = Document::new("d").with_view_box("0 0 100");
        assert!(matches!(
            short.view_box_values(),
            Err(SvgError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn circle_is_mapped_through_the_transform() {
        let ctx = RenderContext::default().with_scale(2.0);
        let circle = Circle::new("c", 1.0, 2.0, 3.0).with_fill("red");
        let out = circle.instructions(&ctx);
        assert_eq!(
            out[0],
            DrawingInstruction::Circle {
                center: Point::new(2.0, 4.0),
                radius: 6.0,
            }
        );
        assert_eq!(
            out[1],
            DrawingInstruction::Paint(PaintAttrs::fill_only(Some("red".into())))
        );
    }

    #[test]
    fn node_conversions() {
        let node: Node = Path::new("p", "M0 0").into();
        assert_eq!(node.kind(), "path");
        assert_eq!(node.id(), "p");
        let node: Node = Group::new("g").into();
        assert_eq!(node.kind(), "group");
    }

    #[tokio::test]
    async fn circles_have_no_segments() {
        let node: Node = Circle::new("c", 0.0, 0.0, 1.0).into();
        let (items, errors) = node.produce_segments(RenderContext::default()).collect().await;
        assert!(items.is_empty());
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn empty_group_closes_both_streams() {
        let group = Arc::new(Group::new("g"));
        let (items, errors) = group.produce(RenderContext::default()).collect().await;
        assert!(items.is_empty());
        assert!(errors.is_empty());
    }
}
