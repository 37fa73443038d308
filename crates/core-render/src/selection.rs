//! Selection state read from the paint target.
//!
//! Selections are owned by a separate collaborator (the widget's caret/mark
//! logic) which may lag buffer edits by one notification. Painting therefore
//! clamps a selection against the current model instead of trusting it.

use core_config::Color;
use core_text::{Position, TextModel};
use tracing::debug;

/// Half-open `[start, end)` selection with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    /// Build from two ends in any order.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn spans_line(&self, line: usize) -> bool {
        (self.start.line..=self.end.line).contains(&line)
    }

    /// Clamp both ends into `model`'s bounds.
    pub fn clamped(&self, model: &dyn TextModel) -> Self {
        let count = model.line_count();
        let len = |l: usize| model.line(l).map(|s| s.chars().count()).unwrap_or(0);
        let mut start = self.start;
        let mut end = self.end;
        start.clamp_to(count, len);
        end.clamp_to(count, len);
        let out = Self::new(start, end);
        if out != *self {
            debug!(target: "render.paint", from = ?self, to = ?out, "selection_clamped");
        }
        out
    }

    /// Columns of the row `[row_start, row_end)` of `line` covered by this
    /// selection, or `None` when the row is outside it.
    ///
    /// `last` marks the final row of the line; a caret-sized selection sitting
    /// exactly on an inner row boundary belongs to the following row.
    pub fn row_span(
        &self,
        line: usize,
        row_start: usize,
        row_end: usize,
        last: bool,
    ) -> Option<(usize, usize)> {
        if !self.spans_line(line) {
            return None;
        }
        let a = if line == self.start.line {
            self.start.col.max(row_start)
        } else {
            row_start
        };
        let b = if line == self.end.line {
            self.end.col.min(row_end)
        } else {
            row_end
        };
        if a > b || (a == b && a == row_end && !last && row_end > row_start) {
            return None;
        }
        Some((a, b))
    }
}

/// The widget a render paints for. Every method has a permissive default so
/// plain hosts only override what they track.
pub trait PaintTarget {
    fn selection(&self) -> Option<Selection> {
        None
    }

    fn is_enabled(&self) -> bool {
        true
    }

    /// Overrides the render's own disabled colour.
    fn disabled_color(&self) -> Option<Color> {
        None
    }

    /// Selection background; `None` suppresses selection painting.
    fn selection_color(&self) -> Option<Color> {
        None
    }
}

/// Plain-data [`PaintTarget`] for hosts without their own widget type.
#[derive(Debug, Clone, Default)]
pub struct StaticTarget {
    pub selection: Option<Selection>,
    pub disabled: bool,
    pub disabled_color: Option<Color>,
    pub selection_color: Option<Color>,
}

impl PaintTarget for StaticTarget {
    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn is_enabled(&self) -> bool {
        !self.disabled
    }

    fn disabled_color(&self) -> Option<Color> {
        self.disabled_color
    }

    fn selection_color(&self) -> Option<Color> {
        self.selection_color
    }
}
