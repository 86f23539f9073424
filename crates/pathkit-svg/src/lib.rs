//! # Pathkit SVG
//!
//! Interprets SVG path data and transform attributes into polylines or
//! drawing instructions.
//!
//! ## Features
//!
//! - **Transforms**: 3x3 affine algebra and `matrix(...)`/`translate(...)` parsing
//! - **Curves**: adaptive cubic bezier flattening
//! - **Paths**: `M L H V C Z` commands, absolute and relative, with implicit repeats
//! - **Trees**: ordered, concurrent output over groups of paths and circles
//!
//! ## Architecture
//!
//! ```text
//! Document
//!    └── Node (Group | Path | Circle)
//!           └── produce(RenderContext) -> Streams { items, errors }
//!                  └── PathInterpreter -> PathSink
//!                         ├── SegmentSink      (polylines)
//!                         └── InstructionSink  (drawing instructions)
//! ```
//!
//! The `produce*` methods spawn tokio tasks and must be called from inside a
//! runtime. The synchronous [`Path::segments`] and [`Path::instructions`]
//! need none.

pub mod bezier;
pub mod context;
pub mod error;
pub mod geometry;
pub mod instruction;
mod parse;
pub mod path;
pub mod sink;
pub mod transform;
pub mod tree;

pub use bezier::CubicBezier;
pub use context::{cancel_pair, CancelHandle, CancelToken, InheritedPaint, RenderContext};
pub use error::{SvgError, SvgResult};
pub use geometry::{Point, Segment};
pub use instruction::{DrawingInstruction, PaintAttrs};
pub use path::{Path, PathInterpreter, PathOutput};
pub use sink::{InstructionSink, PathSink, SegmentSink};
pub use transform::Transform;
pub use tree::{Circle, Document, Group, Node, Streams};

pub use pathkit_common::RenderConfig;
