//! Output sinks for the path interpreter.
//!
//! The interpreter does all cursor tracking and coordinate mapping; a sink
//! only decides what to record. Points handed to a sink are in device space.

use crate::instruction::{DrawingInstruction, PaintAttrs};
use crate::{Point, Segment};

/// Receives the drawing calls of one path.
pub trait PathSink {
    /// Start a new subpath at `p`.
    fn move_to(&mut self, p: Point);

    fn line_to(&mut self, p: Point);

    /// A cubic curve. `flattened` starts at the current point and ends at `end`.
    fn curve_to(&mut self, c1: Point, c2: Point, end: Point, flattened: &[Point]);

    /// Close the current subpath. Called even when no subpath is open.
    fn close(&mut self);

    /// The path text ended cleanly.
    fn finish(&mut self);
}

/// Collects polyline [`Segment`]s.
#[derive(Debug, Default)]
pub struct SegmentSink {
    width: f64,
    open: Option<Segment>,
    done: Vec<Segment>,
}

impl SegmentSink {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            open: None,
            done: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if let Some(segment) = self.open.take() {
            self.done.push(segment);
        }
    }

    /// Take the segments completed so far. The open segment stays open.
    pub fn take_segments(&mut self) -> Vec<Segment> {
        std::mem::take(&mut self.done)
    }

    pub fn into_segments(mut self) -> Vec<Segment> {
        self.flush();
        self.done
    }
}

impl PathSink for SegmentSink {
    fn move_to(&mut self, p: Point) {
        self.flush();
        self.open = Some(Segment::new(self.width, p));
    }

    fn line_to(&mut self, p: Point) {
        match &mut self.open {
            Some(segment) => segment.push(p),
            None => self.open = Some(Segment::new(self.width, p)),
        }
    }

    fn curve_to(&mut self, _c1: Point, _c2: Point, end: Point, flattened: &[Point]) {
        let width = self.width;
        let start = flattened.first().copied().unwrap_or(end);
        let segment = self
            .open
            .get_or_insert_with(|| Segment::new(width, start));
        segment.points.extend(flattened.iter().skip(1).copied());
    }

    fn close(&mut self) {
        if let Some(segment) = &mut self.open {
            if let Some(first) = segment.first() {
                segment.push(first);
            }
            segment.closed = true;
        }
        self.flush();
    }

    fn finish(&mut self) {
        self.flush();
    }
}

/// Collects [`DrawingInstruction`]s, ending with one `Paint`.
#[derive(Debug, Default)]
pub struct InstructionSink {
    paint: PaintAttrs,
    out: Vec<DrawingInstruction>,
}

impl InstructionSink {
    pub fn new(paint: PaintAttrs) -> Self {
        Self {
            paint,
            out: Vec::new(),
        }
    }

    /// Take the instructions buffered so far.
    pub fn take_instructions(&mut self) -> Vec<DrawingInstruction> {
        std::mem::take(&mut self.out)
    }

    pub fn into_instructions(self) -> Vec<DrawingInstruction> {
        self.out
    }
}

impl PathSink for InstructionSink {
    fn move_to(&mut self, p: Point) {
        self.out.push(DrawingInstruction::Move(p));
    }

    fn line_to(&mut self, p: Point) {
        self.out.push(DrawingInstruction::Line(p));
    }

    fn curve_to(&mut self, c1: Point, c2: Point, end: Point, _flattened: &[Point]) {
        self.out.push(DrawingInstruction::Curve { c1, c2, end });
    }

    fn close(&mut self) {
        self.out.push(DrawingInstruction::Close);
    }

    fn finish(&mut self) {
        self.out
            .push(DrawingInstruction::Paint(std::mem::take(&mut self.paint)));
    }
}

/// Feed both sinks from one interpreter run.
impl<A: PathSink, B: PathSink> PathSink for (A, B) {
    fn move_to(&mut self, p: Point) {
        self.0.move_to(p);
        self.1.move_to(p);
    }

    fn line_to(&mut self, p: Point) {
        self.0.line_to(p);
        self.1.line_to(p);
    }

    fn curve_to(&mut self, c1: Point, c2: Point, end: Point, flattened: &[Point]) {
        self.0.curve_to(c1, c2, end, flattened);
        self.1.curve_to(c1, c2, end, flattened);
    }

    fn close(&mut self) {
        self.0.close();
        self.1.close();
    }

    fn finish(&mut self) {
        self.0.finish();
        self.1.finish();
    }
}
