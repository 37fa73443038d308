//! Text model contract consumed by the layout engine, plus a rope-backed
//! reference buffer.
//!
//! The render crate never owns or copies line content. It reads lines through
//! [`TextModel`] and learns about mutations through [`TextEvent`] values that
//! the buffer hands back from every edit.
//!
//! Event contract:
//! - `Insert { line, line_count }`: the inserted text touched `line_count`
//!   lines starting at `line`; `line_count - 1` new lines now follow `line`.
//! - `Remove { line, line_count }`: the removed span touched `line_count`
//!   lines starting at `line`; they collapsed into the single line `line`, so
//!   `line_count - 1` lines disappeared.
//! - Events are produced after the buffer mutated and must be delivered to
//!   the engine before any other read of the buffer.
//!
//! Columns are `char` indices within a line. Lines never include their
//! trailing newline. Content is expected to be LF-normalized
//! (see [`segment::normalize_line_endings`]).

use std::borrow::Cow;

use ropey::Rope;
use thiserror::Error;
use tracing::trace;

pub mod segment;
pub mod width;

pub use width::egc_width;

/// Errors raised on contract misuse (caller bugs, not recoverable states).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("line {line} is out of range (line count {count})")]
    LineOutOfRange { line: usize, count: usize },
    #[error("column {col} is out of range for line {line} (length {len})")]
    ColumnOutOfRange { line: usize, col: usize, len: usize },
    #[error("range start {start:?} is after end {end:?}")]
    InvertedRange { start: Position, end: Position },
}

/// Read contract a text source must satisfy for layout and painting.
pub trait TextModel {
    /// Number of lines; an empty document still has one (empty) line when
    /// backed by [`Buffer`], while a plain slice may have zero.
    fn line_count(&self) -> usize;

    /// Line content without its terminator.
    fn line(&self, index: usize) -> Result<Cow<'_, str>, TextError>;

    /// Characters across all lines, excluding terminators.
    fn total_length(&self) -> usize {
        (0..self.line_count())
            .filter_map(|i| self.line(i).ok())
            .map(|l| l.chars().count())
            .sum()
    }
}

impl<S: AsRef<str>> TextModel for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> Result<Cow<'_, str>, TextError> {
        self.get(index)
            .map(|s| Cow::Borrowed(s.as_ref()))
            .ok_or(TextError::LineOutOfRange {
                line: index,
                count: self.len(),
            })
    }
}

impl<S: AsRef<str>> TextModel for Vec<S> {
    fn line_count(&self) -> usize {
        self.as_slice().line_count()
    }

    fn line(&self, index: usize) -> Result<Cow<'_, str>, TextError> {
        self.as_slice().line(index)
    }
}

/// Kind of structural change reported by a [`TextEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Remove,
}

/// Change notification produced by buffer mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEvent {
    pub kind: EditKind,
    /// First line touched by the edit.
    pub line: usize,
    /// Number of lines the edit touched (always >= 1).
    pub line_count: usize,
}

impl TextEvent {
    pub fn insert(line: usize, line_count: usize) -> Self {
        Self {
            kind: EditKind::Insert,
            line,
            line_count: line_count.max(1),
        }
    }

    pub fn remove(line: usize, line_count: usize) -> Self {
        Self {
            kind: EditKind::Remove,
            line,
            line_count: line_count.max(1),
        }
    }

    /// Signed change in the document's line count caused by this edit.
    pub fn line_delta(&self) -> isize {
        let touched = (self.line_count - 1) as isize;
        match self.kind {
            EditKind::Insert => touched,
            EditKind::Remove => -touched,
        }
    }
}

/// A position inside a buffer expressed as (line index, char column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    pub fn origin() -> Self {
        Self { line: 0, col: 0 }
    }

    /// Clamp into `[0, line_count)` lines and `[0, len]` columns.
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.col = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
            self.col = line_len_fn(self.line);
            return;
        }
        let max_len = line_len_fn(self.line);
        if self.col > max_len {
            self.col = max_len;
        }
    }
}

/// Byte offset of char column `col` in `s` (clamped to `s.len()`).
pub fn col_to_byte(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map(|(b, _)| b).unwrap_or(s.len())
}

/// Slice `s` by char columns `[start, end)`, clamping both ends.
pub fn slice_cols(s: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let b0 = col_to_byte(s, start);
    let b1 = col_to_byte(s, end);
    &s[b0..b1.max(b0)]
}

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone, Default)]
pub struct Buffer {
    rope: Rope,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
        }
    }

    /// Full buffer content with `\n` terminators.
    pub fn value(&self) -> String {
        self.rope.to_string()
    }

    /// Char length of a line, excluding its newline.
    pub fn line_len(&self, idx: usize) -> Result<usize, TextError> {
        self.check_line(idx)?;
        let line = self.rope.line(idx);
        let n = line.len_chars();
        let trailing = n > 0 && line.char(n - 1) == '\n';
        Ok(if trailing { n - 1 } else { n })
    }

    fn check_line(&self, idx: usize) -> Result<(), TextError> {
        let count = self.rope.len_lines();
        if idx >= count {
            return Err(TextError::LineOutOfRange { line: idx, count });
        }
        Ok(())
    }

    fn char_index(&self, pos: Position) -> Result<usize, TextError> {
        let len = self.line_len(pos.line)?;
        if pos.col > len {
            return Err(TextError::ColumnOutOfRange {
                line: pos.line,
                col: pos.col,
                len,
            });
        }
        Ok(self.rope.line_to_char(pos.line) + pos.col)
    }

    /// Insert `text` at `pos`. Returns the notification for the render.
    pub fn insert(&mut self, pos: Position, text: &str) -> Result<TextEvent, TextError> {
        let at = self.char_index(pos)?;
        let before = self.rope.len_lines();
        self.rope.insert(at, text);
        let touched = 1 + self.rope.len_lines() - before;
        trace!(target: "text.buffer", line = pos.line, touched, "insert");
        Ok(TextEvent::insert(pos.line, touched))
    }

    /// Remove the half-open span `[start, end)`.
    pub fn remove(&mut self, start: Position, end: Position) -> Result<TextEvent, TextError> {
        if start > end {
            return Err(TextError::InvertedRange { start, end });
        }
        let a = self.char_index(start)?;
        let b = self.char_index(end)?;
        self.rope.remove(a..b);
        let touched = end.line - start.line + 1;
        trace!(target: "text.buffer", line = start.line, touched, "remove");
        Ok(TextEvent::remove(start.line, touched))
    }

    /// Remove whole lines `[line, line + count)` including their terminators.
    pub fn remove_lines(&mut self, line: usize, count: usize) -> Result<TextEvent, TextError> {
        self.check_line(line)?;
        let total = self.rope.len_lines();
        let end_line = (line + count.max(1)).min(total);
        let b = if end_line >= total {
            self.rope.len_chars()
        } else {
            self.rope.line_to_char(end_line)
        };
        // Removing through the last line eats the preceding newline instead.
        let (a, start_line, last_touched) = if end_line < total {
            (self.rope.line_to_char(line), line, end_line)
        } else if line > 0 {
            (self.rope.line_to_char(line) - 1, line - 1, total - 1)
        } else {
            (0, 0, total - 1)
        };
        self.rope.remove(a..b);
        let touched = last_touched - start_line + 1;
        trace!(target: "text.buffer", line = start_line, touched, "remove_lines");
        Ok(TextEvent::remove(start_line, touched))
    }

    /// Replace all content. The returned events describe the replacement.
    pub fn set_value(&mut self, content: &str) -> [TextEvent; 2] {
        let old = self.rope.len_lines();
        self.rope = Rope::from_str(content);
        let new = self.rope.len_lines();
        [TextEvent::remove(0, old), TextEvent::insert(0, new)]
    }
}

impl TextModel for Buffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line(&self, index: usize) -> Result<Cow<'_, str>, TextError> {
        self.check_line(index)?;
        let slice = self.rope.line(index);
        Ok(match slice.as_str() {
            Some(s) => Cow::Borrowed(s.strip_suffix('\n').unwrap_or(s)),
            None => {
                let mut s = slice.to_string();
                if s.ends_with('\n') {
                    s.pop();
                }
                Cow::Owned(s)
            }
        })
    }

    fn total_length(&self) -> usize {
        self.rope.len_chars() - self.rope.len_lines().saturating_sub(1)
    }
}

/// Grapheme helpers operating on a single line.
pub mod grapheme {
    use crate::egc_width;
    use unicode_segmentation::UnicodeSegmentation;

    /// Iterate grapheme clusters in a line.
    pub fn iter(line: &str) -> impl Iterator<Item = &str> {
        line.graphemes(true)
    }

    /// Advance of `text` in cells: sum of cluster widths.
    pub fn advance(text: &str) -> usize {
        iter(text).map(|g| egc_width(g) as usize).sum()
    }

    /// Widest single cluster in `text`, in cells.
    pub fn widest_cluster(text: &str) -> usize {
        iter(text).map(|g| egc_width(g) as usize).max().unwrap_or(0)
    }
}
