//! Incremental text layout + paint.
//!
//! A render measures the lines of a host-owned text model, keeps the widths
//! in a per-line cache, and paints the visible rows onto a [`Canvas`]. Edits
//! reach the render as [`core_text::TextEvent`] notifications; only the lines
//! they touch are re-measured on the next size query or paint.
//!
//! Invariants:
//! - The metric cache has one entry per model line after every `recalc`.
//!   A length disagreement is repaired by a full re-measure and logged.
//! - A clean dirty range plus an all-valid cache means the preferred size is
//!   exact for the current model.
//! - Paint never mutates the model and never calls back into the host; owner
//!   re-layout is requested through a drained flag.
//! - Widths, heights and coordinates are `i32` pixels; columns are char
//!   indices into a line.
//!
//! Pipeline:
//! 1. `text_updated` folds an event into the dirty range and shifts the cache.
//! 2. `recalc` re-measures the dirty span (plus any stale stragglers) and
//!    rescans max width / total height.
//! 3. `paint` computes the visible row window, then per row paints the
//!    selection background, the glyphs, and the variant's decorations.
//!
//! Exposed Components:
//! - `font` / `canvas`: metric provider and drawing surface seams.
//! - `dirty` / `line_cache` / `layout`: the incremental measurement engine.
//! - `wrap`: broken lines for a given width.
//! - `render`: `TextRender` with its closed set of variants.
//! - `string_render`: single-line render with one cached width.
//! - `path_metrics`: counters for what the incremental path actually did.

use core_text::TextError;
use thiserror::Error;

pub mod canvas;
pub mod dirty;
pub mod font;
pub mod layout;
pub mod line_cache;
pub mod path_metrics;
pub mod position;
pub mod render;
pub mod selection;
pub mod string_render;
pub mod style;
pub mod viewport;
pub mod wrap;

pub use canvas::{Canvas, PaintCommand, RecordingCanvas, Rect};
pub use font::{Font, FontMetrics, FontStyle, MonospaceMetrics};
pub use layout::{LayoutEngine, Size};
pub use path_metrics::{RenderPathMetrics, RenderPathMetricsSnapshot};
pub use position::{ModelPositions, PositionMetric};
pub use render::{OwnerId, TextRender, Variant, VariantKind};
pub use selection::{PaintTarget, Selection, StaticTarget};
pub use string_render::StringRender;
pub use style::{DecorationSet, Decorations, Mask, TextStyle};
pub use wrap::{BrokenLine, WrapMode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("line {line} out of range (rows: {count})")]
    LineOutOfRange { line: usize, count: usize },
    #[error(transparent)]
    Text(#[from] TextError),
}
