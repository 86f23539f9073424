//! Path element and the path data interpreter.
//!
//! [`PathInterpreter`] walks the `d` attribute one command group at a time,
//! keeping the cursor in user space and handing device-space points to a
//! [`PathSink`]. The same interpreter drives polyline output, instruction
//! output, or both at once.

use std::collections::VecDeque;
use std::sync::Arc;

use pathkit_common::RenderConfig;
use pathkit_lexer::{lex, Lexer, TokenKind};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::bezier::CubicBezier;
use crate::context::{send_or_cancel, Delivery, RenderContext};
use crate::error::{SvgError, SvgResult};
use crate::instruction::{DrawingInstruction, PaintAttrs};
use crate::parse::{at_number, expect_number, number_list, unexpected};
use crate::sink::{InstructionSink, PathSink, SegmentSink};
use crate::tree::Streams;
use crate::{Point, Segment, Transform};

/// A `<path>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub id: String,
    /// Path data.
    pub d: String,
    /// Raw `transform` attribute.
    pub transform: Option<String>,
    /// Style declarations, already split into name/value pairs.
    pub properties: Vec<(String, String)>,
    pub stroke_width: Option<f64>,
    pub stroke: Option<String>,
    pub fill: Option<String>,
    pub stroke_linecap: Option<String>,
    pub stroke_linejoin: Option<String>,
}

impl Path {
    pub fn new(id: impl Into<String>, d: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            d: d.into(),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn with_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_linecap(mut self, cap: impl Into<String>) -> Self {
        self.stroke_linecap = Some(cap.into());
        self
    }

    pub fn with_linejoin(mut self, join: impl Into<String>) -> Self {
        self.stroke_linejoin = Some(join.into());
        self
    }

    /// Last value of a style property. Later declarations win.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Style property, else attribute, else the inherited value.
    fn paint_value(
        &self,
        name: &str,
        attribute: &Option<String>,
        inherited: &Option<String>,
    ) -> Option<String> {
        self.property(name)
            .map(str::to_string)
            .or_else(|| attribute.clone())
            .or_else(|| inherited.clone())
    }

    /// Stroke width in device units.
    ///
    /// Precedence: `stroke-width` style property, the attribute, the value
    /// inherited from groups, the configured default. An unusable property
    /// value is logged and skipped.
    pub fn resolved_stroke_width(&self, ctx: &RenderContext) -> f64 {
        let from_style = self
            .property("stroke-width")
            .and_then(|value| match parse_width(value) {
                Ok(width) => Some(width),
                Err(err) => {
                    warn!(path = %self.id, value, error = %err, "Ignoring stroke-width property");
                    None
                }
            });

        let width = from_style
            .or(self.stroke_width)
            .or(ctx.paint.stroke_width)
            .unwrap_or(ctx.config.default_stroke_width);
        width * ctx.scale
    }

    /// Paint attributes for the final `Paint` instruction.
    pub fn paint(&self, ctx: &RenderContext) -> PaintAttrs {
        PaintAttrs {
            stroke_width: self.resolved_stroke_width(ctx),
            stroke: self.paint_value("stroke", &self.stroke, &ctx.paint.stroke),
            fill: self.paint_value("fill", &self.fill, &ctx.paint.fill),
            fill_rule: self.paint_value("fill-rule", &None, &ctx.paint.fill_rule),
            stroke_linecap: self.paint_value("stroke-linecap", &self.stroke_linecap, &None),
            stroke_linejoin: self.paint_value("stroke-linejoin", &self.stroke_linejoin, &None),
        }
    }

    /// Ancestor transform times this path's own `transform` attribute.
    pub fn effective_transform(&self, ctx: &RenderContext) -> SvgResult<Transform> {
        match self.transform.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(ctx.transform.compose(&Transform::parse(text)?)),
            _ => Ok(ctx.transform),
        }
    }

    pub fn interpreter<'a>(&'a self, ctx: &RenderContext) -> SvgResult<PathInterpreter<'a>> {
        let transform = self.effective_transform(ctx)?;
        Ok(PathInterpreter::new(&self.id, &self.d, transform, &ctx.config))
    }

    fn wrap(&self, source: SvgError, operands: usize) -> SvgError {
        SvgError::Path {
            id: self.id.clone(),
            operands,
            source: Box::new(source),
        }
    }

    /// Run the whole path into `sink`.
    ///
    /// On error the sink keeps whatever was emitted before the failure.
    pub fn interpret<S: PathSink>(&self, ctx: &RenderContext, sink: &mut S) -> SvgResult<()> {
        let mut interpreter = self.interpreter(ctx).map_err(|e| self.wrap(e, 0))?;
        interpreter
            .run(sink)
            .map_err(|e| self.wrap(e, interpreter.operands()))
    }

    pub fn segments(&self, ctx: &RenderContext) -> SvgResult<Vec<Segment>> {
        let mut sink = SegmentSink::new(self.resolved_stroke_width(ctx));
        self.interpret(ctx, &mut sink)?;
        Ok(sink.into_segments())
    }

    pub fn instructions(&self, ctx: &RenderContext) -> SvgResult<Vec<DrawingInstruction>> {
        let mut sink = InstructionSink::new(self.paint(ctx));
        self.interpret(ctx, &mut sink)?;
        Ok(sink.into_instructions())
    }

    /// Stream drawing instructions from a spawned task.
    pub fn produce(self: Arc<Self>, ctx: RenderContext) -> Streams<DrawingInstruction> {
        let sink = InstructionSink::new(self.paint(&ctx));
        spawn_producer(self, ctx, sink, InstructionSink::take_instructions)
    }

    /// Stream polyline segments from a spawned task.
    pub fn produce_segments(self: Arc<Self>, ctx: RenderContext) -> Streams<Segment> {
        let sink = SegmentSink::new(self.resolved_stroke_width(&ctx));
        spawn_producer(self, ctx, sink, SegmentSink::take_segments)
    }

    /// Stream segments and instructions from a single interpreter run.
    ///
    /// Each step forwards its instructions first, then any segment the step
    /// completed.
    pub fn produce_dual(self: Arc<Self>, ctx: RenderContext) -> Streams<PathOutput> {
        let sinks = (
            SegmentSink::new(self.resolved_stroke_width(&ctx)),
            InstructionSink::new(self.paint(&ctx)),
        );
        spawn_producer(self, ctx, sinks, |sinks: &mut (SegmentSink, InstructionSink)| {
            let mut out: Vec<PathOutput> = sinks
                .1
                .take_instructions()
                .into_iter()
                .map(PathOutput::Instruction)
                .collect();
            out.extend(sinks.0.take_segments().into_iter().map(PathOutput::Segment));
            out
        })
    }
}

/// One item of a dual-mode stream.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOutput {
    Segment(Segment),
    Instruction(DrawingInstruction),
}

fn parse_width(value: &str) -> SvgResult<f64> {
    match number_list("stroke-width", value)?.as_slice() {
        [width] if *width >= 0.0 => Ok(*width),
        [width] => Err(SvgError::invalid_attribute(
            "stroke-width",
            format!("negative width {width}"),
        )),
        _ => Err(SvgError::invalid_attribute(
            "stroke-width",
            "expected exactly one number",
        )),
    }
}

/// Drive an interpreter in its own task, forwarding whatever `drain` takes
/// out of the sink after every step.
fn spawn_producer<T, S, F>(path: Arc<Path>, ctx: RenderContext, mut sink: S, mut drain: F) -> Streams<T>
where
    T: Send + 'static,
    S: PathSink + Send + 'static,
    F: FnMut(&mut S) -> Vec<T> + Send + 'static,
{
    let (tx, items) = mpsc::channel(ctx.channel_capacity());
    let (err_tx, errors) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        debug!(path = %path.id, "Path producer started");
        let mut interpreter = match path.interpreter(&ctx) {
            Ok(interpreter) => interpreter,
            Err(err) => {
                warn!(path = %path.id, error = %err, "Path transform rejected");
                let _ = err_tx.send(path.wrap(err, 0));
                return;
            }
        };

        loop {
            if ctx.cancel.is_cancelled() {
                let _ = err_tx.send(SvgError::Cancelled);
                return;
            }

            let step = interpreter.step(&mut sink);
            for item in drain(&mut sink) {
                match send_or_cancel(&tx, item, &ctx.cancel).await {
                    Delivery::Sent => {}
                    Delivery::Closed => {
                        debug!(path = %path.id, "Consumer went away");
                        return;
                    }
                    Delivery::Cancelled => {
                        let _ = err_tx.send(SvgError::Cancelled);
                        return;
                    }
                }
            }

            match step {
                Ok(true) => {}
                Ok(false) => {
                    debug!(path = %path.id, operands = interpreter.operands(), "Path producer finished");
                    return;
                }
                Err(err) => {
                    let err = path.wrap(err, interpreter.operands());
                    warn!(error = %err, category = err.category(), "Path aborted");
                    let _ = err_tx.send(err);
                    return;
                }
            }
        }
    });

    Streams { items, errors }
}

/// State machine over one path's command text.
pub struct PathInterpreter<'a> {
    lexer: Lexer<'a>,
    transform: Transform,
    /// User space.
    cursor: Point,
    /// User space start of the current subpath.
    subpath_start: Point,
    open: bool,
    curve_depth: u32,
    flatness: f64,
    operands: usize,
    /// Remaining letters of a multi-letter command token such as `zM`.
    pending: VecDeque<char>,
}

impl<'a> PathInterpreter<'a> {
    pub fn new(name: &str, d: &'a str, transform: Transform, config: &RenderConfig) -> Self {
        Self {
            lexer: lex(name, d),
            transform,
            cursor: Point::default(),
            subpath_start: Point::default(),
            open: false,
            curve_depth: config.curve_depth,
            flatness: config.flatness_radians(),
            operands: 0,
            pending: VecDeque::new(),
        }
    }

    /// Numbers consumed so far.
    pub fn operands(&self) -> usize {
        self.operands
    }

    /// Current point in user space.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn run<S: PathSink>(&mut self, sink: &mut S) -> SvgResult<()> {
        while self.step(sink)? {}
        Ok(())
    }

    /// Interpret one command together with its implicit repeats.
    ///
    /// Returns `Ok(false)` once the path text is exhausted; the sink has
    /// been finished by then.
    pub fn step<S: PathSink>(&mut self, sink: &mut S) -> SvgResult<bool> {
        let command = match self.pending.pop_front() {
            Some(command) => command,
            None => {
                self.lexer.skip_separators();
                let Some(token) = self.lexer.next_token() else {
                    return Ok(false);
                };
                match token.kind {
                    TokenKind::EndOfStream => {
                        sink.finish();
                        return Ok(false);
                    }
                    TokenKind::Letter | TokenKind::Word => {
                        let mut letters = token.text.chars();
                        let Some(first) = letters.next() else {
                            return Err(unexpected(&token, "path command"));
                        };
                        self.pending.extend(letters);
                        first
                    }
                    _ => return Err(unexpected(&token, "path command")),
                }
            }
        };

        trace!(lexer = self.lexer.name(), command = %command, "Path command");
        self.execute(command, sink)?;
        Ok(true)
    }

    fn execute<S: PathSink>(&mut self, command: char, sink: &mut S) -> SvgResult<()> {
        let relative = command.is_ascii_lowercase();
        match command.to_ascii_uppercase() {
            'M' => {
                let p = self.point(self.cursor, relative)?;
                self.move_to(p, sink);
                while self.more_numbers() {
                    let p = self.point(self.cursor, relative)?;
                    self.line_to(p, sink);
                }
            }
            'L' => loop {
                let p = self.point(self.cursor, relative)?;
                self.line_to(p, sink);
                if !self.more_numbers() {
                    break;
                }
            },
            'H' => loop {
                let x = self.number()?;
                let x = if relative { self.cursor.x + x } else { x };
                self.line_to(Point::new(x, self.cursor.y), sink);
                if !self.more_numbers() {
                    break;
                }
            },
            'V' => loop {
                let y = self.number()?;
                let y = if relative { self.cursor.y + y } else { y };
                self.line_to(Point::new(self.cursor.x, y), sink);
                if !self.more_numbers() {
                    break;
                }
            },
            'C' => loop {
                let start = self.cursor;
                let c1 = self.point(start, relative)?;
                let c2 = self.point(start, relative)?;
                let end = self.point(start, relative)?;
                self.curve_to(c1, c2, end, sink);
                if !self.more_numbers() {
                    break;
                }
            },
            'Z' => self.close(sink),
            _ => return Err(SvgError::UnsupportedCommand(command.to_string())),
        }
        Ok(())
    }

    fn number(&mut self) -> SvgResult<f64> {
        if let Some(command) = self.pending.front() {
            return Err(SvgError::grammar(format!(
                "expected number, found command {command:?}"
            )));
        }
        let value = expect_number(&mut self.lexer)?;
        self.operands += 1;
        Ok(value)
    }

    /// Read an `x y` pair, offset by `base` when relative.
    fn point(&mut self, base: Point, relative: bool) -> SvgResult<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(if relative {
            Point::new(base.x + x, base.y + y)
        } else {
            Point::new(x, y)
        })
    }

    /// True if another operand group follows without a command letter.
    fn more_numbers(&mut self) -> bool {
        self.pending.is_empty() && at_number(&mut self.lexer)
    }

    fn device(&self, p: Point) -> Point {
        self.transform.apply_point(p)
    }

    fn move_to<S: PathSink>(&mut self, p: Point, sink: &mut S) {
        self.cursor = p;
        self.subpath_start = p;
        self.open = true;
        sink.move_to(self.device(p));
    }

    /// Drawing without a subpath starts one at the cursor.
    fn ensure_open<S: PathSink>(&mut self, sink: &mut S) {
        if !self.open {
            self.move_to(self.cursor, sink);
        }
    }

    fn line_to<S: PathSink>(&mut self, p: Point, sink: &mut S) {
        self.ensure_open(sink);
        self.cursor = p;
        sink.line_to(self.device(p));
    }

    fn curve_to<S: PathSink>(&mut self, c1: Point, c2: Point, end: Point, sink: &mut S) {
        self.ensure_open(sink);
        let curve = CubicBezier::new(
            self.device(self.cursor),
            self.device(c1),
            self.device(c2),
            self.device(end),
        );
        let flattened = curve.flatten_with(self.curve_depth, self.flatness);
        self.cursor = end;
        let [_, c1, c2, end] = curve.points;
        sink.curve_to(c1, c2, end, &flattened);
    }

    fn close<S: PathSink>(&mut self, sink: &mut S) {
        sink.close();
        if self.open {
            self.cursor = self.subpath_start;
            self.open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InheritedPaint;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn segments(d: &str) -> SvgResult<Vec<Segment>> {
        Path::new("test", d).segments(&RenderContext::default())
    }

    fn instructions(d: &str) -> SvgResult<Vec<DrawingInstruction>> {
        Path::new("test", d).instructions(&RenderContext::default())
    }

    fn root_cause(result: SvgResult<impl std::fmt::Debug>) -> SvgError {
        result.unwrap_err().root_cause().clone()
    }

    #[test]
    fn closed_square() {
        let segs = segments("M0,0 L10,0 L10,10 Z").unwrap();
        assert_eq!(segs.len(), 1);
        assert!(segs[0].closed);
        assert_eq!(
            segs[0].points,
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 0.0)]
        );
    }

    #[test]
    fn implicit_lineto_after_moveto_in_both_modes() {
        let segs = segments("M0,0 10,10 20,20").unwrap();
        assert_eq!(segs.len(), 1);
        assert!(!segs[0].closed);
        assert_eq!(segs[0].points, vec![p(0.0, 0.0), p(10.0, 10.0), p(20.0, 20.0)]);

        let out = instructions("M0,0 10,10 20,20").unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], DrawingInstruction::Move(p(0.0, 0.0)));
        assert_eq!(out[1], DrawingInstruction::Line(p(10.0, 10.0)));
        assert_eq!(out[2], DrawingInstruction::Line(p(20.0, 20.0)));
        assert!(out[3].is_paint());
    }

    #[test]
    fn relative_commands_accumulate_in_user_space() {
        let segs = segments("m1,1 l2,0 0,2 h-2 v-2").unwrap();
        assert_eq!(
            segs[0].points,
            vec![p(1.0, 1.0), p(3.0, 1.0), p(3.0, 3.0), p(1.0, 3.0), p(1.0, 1.0)]
        );
    }

    #[test]
    fn horizontal_and_vertical_lines() {
        let out = instructions("M5 5 H10 V20 h1 1").unwrap();
        assert_eq!(
            &out[..5],
            &[
                DrawingInstruction::Move(p(5.0, 5.0)),
                DrawingInstruction::Line(p(10.0, 5.0)),
                DrawingInstruction::Line(p(10.0, 20.0)),
                DrawingInstruction::Line(p(11.0, 20.0)),
                DrawingInstruction::Line(p(12.0, 20.0)),
            ]
        );
    }

    #[test]
    fn second_moveto_starts_a_new_segment() {
        let segs = segments("M0 0 L1 0 M5 5 L6 5 z").unwrap();
        assert_eq!(segs.len(), 2);
        assert!(!segs[0].closed);
        assert!(segs[1].closed);
        assert_eq!(segs[1].points.last(), Some(&p(5.0, 5.0)));
    }

    #[test]
    fn close_returns_cursor_to_subpath_start() {
        let out = instructions("M1 1 L5 1 Z l1 0").unwrap();
        assert_eq!(out[2], DrawingInstruction::Close);
        assert_eq!(out[3], DrawingInstruction::Move(p(1.0, 1.0)));
        assert_eq!(out[4], DrawingInstruction::Line(p(2.0, 1.0)));
    }

    #[test]
    fn close_without_subpath_still_emits_close() {
        let out = instructions("Z").unwrap();
        assert_eq!(out[0], DrawingInstruction::Close);
        assert!(segments("Z").unwrap().is_empty());
    }

    #[test]
    fn line_without_moveto_opens_at_cursor() {
        let segs = segments("L3 4").unwrap();
        assert_eq!(segs[0].points, vec![p(0.0, 0.0), p(3.0, 4.0)]);
    }

    #[test]
    fn cubic_curve_in_both_modes() {
        let out = instructions("M0 0 C0 10 10 10 10 0").unwrap();
        assert_eq!(
            out[1],
            DrawingInstruction::Curve {
                c1: p(0.0, 10.0),
                c2: p(10.0, 10.0),
                end: p(10.0, 0.0),
            }
        );

        let segs = segments("M0 0 C0 10 10 10 10 0").unwrap();
        let config = RenderConfig::default();
        let expected = CubicBezier::new(p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0))
            .flatten_with(config.curve_depth, config.flatness_radians());
        assert_eq!(segs[0].points, expected);
    }

    #[test]
    fn relative_curve_controls_share_one_origin() {
        let out = instructions("M10 10 c0 10 10 10 10 0 0 -10 -10 -10 -10 0").unwrap();
        assert_eq!(
            out[1],
            DrawingInstruction::Curve {
                c1: p(10.0, 20.0),
                c2: p(20.0, 20.0),
                end: p(20.0, 10.0),
            }
        );
        assert!(matches!(out[2], DrawingInstruction::Curve { end, .. } if end == p(10.0, 10.0)));
    }

    #[test]
    fn word_tokens_dispatch_letter_by_letter() {
        let segs = segments("M0 0 L1 0 zM5 5 L6 6").unwrap();
        assert_eq!(segs.len(), 2);
        assert!(segs[0].closed);
        assert_eq!(segs[1].points[0], p(5.0, 5.0));
    }

    #[test]
    fn points_are_transformed_cursor_is_not() {
        let ctx = RenderContext::default();
        let path = Path::new("t", "M1 1 l1 0").with_transform("translate(10, 0)");
        let segs = path.segments(&ctx).unwrap();
        assert_eq!(segs[0].points, vec![p(11.0, 1.0), p(12.0, 1.0)]);

        let scaled = RenderContext::default().with_scale(2.0);
        let segs = path.segments(&scaled).unwrap();
        assert_eq!(segs[0].points, vec![p(22.0, 2.0), p(24.0, 2.0)]);
    }

    #[test]
    fn unsupported_commands_fail() {
        for d in ["M0 0 Q1 1 2 2", "M0 0 A1 1 0 0 1 2 2", "M0 0 s1 1 2 2", "M0 0 T1 1"] {
            assert!(
                matches!(root_cause(segments(d)), SvgError::UnsupportedCommand(_)),
                "{d}"
            );
        }
    }

    #[test]
    fn partial_operand_groups_are_grammar_errors() {
        assert!(matches!(root_cause(segments("M0")), SvgError::Grammar(_)));
        assert!(matches!(root_cause(segments("M0 0 L1 1 2")), SvgError::Grammar(_)));
        assert!(matches!(root_cause(segments("M0 0 C1 1 2 2 3")), SvgError::Grammar(_)));
        assert!(matches!(root_cause(segments("10 20")), SvgError::Grammar(_)));
        assert!(matches!(root_cause(segments("LM 1 1")), SvgError::Grammar(_)));
    }

    #[test]
    fn lex_and_number_errors() {
        assert!(matches!(root_cause(segments("M0 0 L1 #")), SvgError::Lex { .. }));
        assert!(matches!(root_cause(segments("M0 0x")), SvgError::Number { .. }));
    }

    #[test]
    fn errors_report_operands_consumed() {
        let err = segments("M0,0 L10,10 Q 1 2 3 4").unwrap_err();
        match err {
            SvgError::Path { id, operands, .. } => {
                assert_eq!(id, "test");
                assert_eq!(operands, 4);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_path_transform_is_reported() {
        let path = Path::new("t", "M0 0").with_transform("rotate(45)");
        let err = path.segments(&RenderContext::default()).unwrap_err();
        assert_eq!(err.root_cause(), &SvgError::UnsupportedTransform("rotate".into()));
    }

    #[test]
    fn stroke_width_precedence() {
        let mut ctx = RenderContext::default();
        assert_eq!(Path::new("p", "").resolved_stroke_width(&ctx), 1.0);

        ctx.paint = InheritedPaint {
            stroke_width: Some(3.0),
            ..Default::default()
        };
        assert_eq!(Path::new("p", "").resolved_stroke_width(&ctx), 3.0);

        let path = Path::new("p", "").with_stroke_width(4.0);
        assert_eq!(path.resolved_stroke_width(&ctx), 4.0);

        let path = path.with_property("stroke-width", "5");
        assert_eq!(path.resolved_stroke_width(&ctx), 5.0);

        let ctx = ctx.with_scale(2.0);
        assert_eq!(path.resolved_stroke_width(&ctx), 10.0);

        let bad = Path::new("p", "").with_stroke_width(4.0).with_property("stroke-width", "wide");
        assert_eq!(bad.resolved_stroke_width(&RenderContext::default()), 4.0);
    }

    #[test]
    fn paint_prefers_style_then_attribute_then_inherited() {
        let mut ctx = RenderContext::default();
        ctx.paint.fill = Some("blue".into());
        ctx.paint.stroke = Some("green".into());
        let path = Path::new("p", "M0 0")
            .with_stroke("black")
            .with_property("stroke", "red")
            .with_linecap("round");
        let paint = path.paint(&ctx);
        assert_eq!(paint.stroke.as_deref(), Some("red"));
        assert_eq!(paint.fill.as_deref(), Some("blue"));
        assert_eq!(paint.stroke_linecap.as_deref(), Some("round"));
        assert_eq!(paint.stroke_linejoin, None);
    }

    #[test]
    fn empty_path_only_paints() {
        let out = instructions("").unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].is_paint());
        assert!(segments("  ").unwrap().is_empty());
    }

    #[tokio::test]
    async fn produced_streams_match_sync_output() {
        let path = Arc::new(Path::new("p", "M0 0 L10 0 L10 10 Z M20 20 L30 30"));
        let ctx = RenderContext::default();

        let (items, errors) = Arc::clone(&path).produce(ctx.clone()).collect().await;
        assert!(errors.is_empty());
        assert_eq!(items, path.instructions(&ctx).unwrap());

        let (segs, errors) = Arc::clone(&path).produce_segments(ctx.clone()).collect().await;
        assert!(errors.is_empty());
        assert_eq!(segs, path.segments(&ctx).unwrap());
    }

    #[test]
    fn tee_matches_each_single_mode() {
        let ctx = RenderContext::default().with_scale(2.0);
        let path = Path::new("dual", "M0,0 10,10 20,20 V5 c1 1 2 2 3 3 z")
            .with_transform("translate(1, 2)");

        let mut sinks = (
            SegmentSink::new(path.resolved_stroke_width(&ctx)),
            InstructionSink::new(path.paint(&ctx)),
        );
        path.interpret(&ctx, &mut sinks).unwrap();
        let (segments, instructions) = sinks;

        assert_eq!(segments.into_segments(), path.segments(&ctx).unwrap());
        assert_eq!(instructions.into_instructions(), path.instructions(&ctx).unwrap());
    }

    #[tokio::test]
    async fn dual_stream_carries_both_outputs() {
        let path = Arc::new(Path::new("dual", "M0,0 10,10 20,20 V5 c1 1 2 2 3 3 z M7 7 L8 8"));
        let ctx = RenderContext::default();

        let (items, errors) = Arc::clone(&path).produce_dual(ctx.clone()).collect().await;
        assert!(errors.is_empty());

        let mut segs = Vec::new();
        let mut out = Vec::new();
        for item in items {
            match item {
                PathOutput::Segment(seg) => segs.push(seg),
                PathOutput::Instruction(instruction) => out.push(instruction),
            }
        }
        assert_eq!(segs, path.segments(&ctx).unwrap());
        assert_eq!(out, path.instructions(&ctx).unwrap());
    }

    #[tokio::test]
    async fn dual_stream_reports_errors() {
        let path = Arc::new(Path::new("dual", "M0 0 L1 1 A 1 1 0 0 0 2 2"));
        let (items, errors) = path.produce_dual(RenderContext::default()).collect().await;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].root_cause(), &SvgError::UnsupportedCommand("A".into()));
        assert!(items.contains(&PathOutput::Instruction(DrawingInstruction::Line(p(1.0, 1.0)))));
    }

    #[tokio::test]
    async fn produced_error_follows_partial_output() {
        let path = Arc::new(Path::new("p", "M0,0 L10,10 Q 1 2 3 4"));
        let (items, errors) = path.produce(RenderContext::default()).collect().await;
        assert_eq!(
            items,
            vec![
                DrawingInstruction::Move(p(0.0, 0.0)),
                DrawingInstruction::Line(p(10.0, 10.0)),
            ]
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].root_cause(), &SvgError::UnsupportedCommand("Q".into()));
    }
}
