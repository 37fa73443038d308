//! Visible row window for one paint call.
//!
//! Rows are laid out top to bottom at a fixed pitch (`line_height +
//! line_indent`) starting at the paint origin `y`. Scrolling is expressed by
//! an origin above the clip's top edge.
//!
//! Guarantees:
//! * `first_line < row_count` and `first_line + height <= row_count`.
//! * A trailing row is only counted when more than one line indent of it
//!   falls inside the paint height, so rows clipped to nothing are skipped.
//! * `None` means nothing to paint; it is never an error.

use std::ops::Range;

use crate::canvas::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub first_line: usize,
    pub height: usize,
    /// y of `first_line`'s top edge.
    pub top: i32,
    pub pitch: i32,
}

impl Viewport {
    pub fn compute(
        clip: Rect,
        y: i32,
        height: i32,
        line_height: i32,
        line_indent: i32,
        row_count: usize,
    ) -> Option<Self> {
        let pitch = line_height + line_indent;
        if clip.is_empty() || pitch <= 0 || row_count == 0 {
            return None;
        }
        let mut h = height.min(clip.height);
        let mut first = 0i32;
        if y < clip.y {
            first = (line_indent + clip.y - y) / pitch;
            h += (clip.y - y) - first * pitch;
        } else if y > clip.bottom() {
            return None;
        }
        let first_line = usize::try_from(first).ok()?;
        if first_line >= row_count {
            return None;
        }
        let span = h + line_indent;
        if span <= 0 {
            return None;
        }
        let rows = span / pitch + i32::from(span % pitch > line_indent);
        let rows = usize::try_from(rows).ok()?.min(row_count - first_line);
        if rows == 0 {
            return None;
        }
        Some(Self {
            first_line,
            height: rows,
            top: y + first * pitch,
            pitch,
        })
    }

    pub fn rows(&self) -> Range<usize> {
        self.first_line..self.first_line + self.height
    }

    /// Top edge of absolute row `row`.
    pub fn row_y(&self, row: usize) -> i32 {
        let offset = i32::try_from(row.saturating_sub(self.first_line)).unwrap_or(i32::MAX);
        self.top.saturating_add(offset.saturating_mul(self.pitch))
    }
}
