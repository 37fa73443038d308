//! Per-line width cache aligned with text model line indices.
//!
//! Entries mirror structural edits (`collapse` / `expand`) so indices stay
//! aligned without re-measuring untouched lines. Aggregates (`max_width`,
//! `total_height`) are only meaningful after `rescan`.
//!
//! Invariant: when the owning engine is clean, `len()` equals the model's line
//! count and every entry is valid.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineMetric {
    pub width: i32,
    pub valid: bool,
}

impl LineMetric {
    const STALE: LineMetric = LineMetric {
        width: 0,
        valid: false,
    };
}

#[derive(Debug, Default)]
pub struct LineCache {
    lines: Vec<LineMetric>,
    max_width: i32,
    total_height: i32,
}

impl LineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, line: usize) -> Option<LineMetric> {
        self.lines.get(line).copied()
    }

    pub fn max_width(&self) -> i32 {
        self.max_width
    }

    pub fn total_height(&self) -> i32 {
        self.total_height
    }

    /// Drop everything and size for `line_count` stale lines.
    pub fn reset(&mut self, line_count: usize) {
        self.lines.clear();
        self.lines.resize(line_count, LineMetric::STALE);
    }

    /// `count` lines starting at `line` merged into `line`.
    pub fn collapse(&mut self, line: usize, count: usize) {
        if line >= self.lines.len() {
            return;
        }
        let end = (line + count).min(self.lines.len());
        self.lines.drain(line + 1..end.max(line + 1));
        self.lines[line] = LineMetric::STALE;
    }

    /// `count - 1` lines were added after `line`, which itself changed.
    pub fn expand(&mut self, line: usize, count: usize) {
        let added = count.saturating_sub(1);
        if line < self.lines.len() {
            self.lines[line] = LineMetric::STALE;
            self.lines
                .splice(line + 1..line + 1, std::iter::repeat_n(LineMetric::STALE, added));
        } else {
            let missing = line + count - self.lines.len();
            self.lines
                .extend(std::iter::repeat_n(LineMetric::STALE, missing));
        }
    }

    pub fn mark_stale(&mut self, range: Range<usize>) {
        let end = range.end.min(self.lines.len());
        for m in self.lines.get_mut(range.start.min(end)..end).into_iter().flatten() {
            *m = LineMetric::STALE;
        }
    }

    pub fn set_width(&mut self, line: usize, width: i32) {
        if let Some(m) = self.lines.get_mut(line) {
            *m = LineMetric { width, valid: true };
        }
    }

    /// Resize to `line_count`, returning `true` when the length was wrong. A
    /// mismatch means notifications were missed, so every entry goes stale.
    pub fn reconcile(&mut self, line_count: usize) -> bool {
        if self.lines.len() == line_count {
            return false;
        }
        self.reset(line_count);
        true
    }

    /// Recompute aggregates over every line.
    pub fn rescan(&mut self, line_height: i32, line_indent: i32) -> (i32, i32) {
        self.max_width = self.lines.iter().map(|m| m.width).max().unwrap_or(0);
        let n = i32::try_from(self.lines.len()).unwrap_or(i32::MAX);
        self.total_height = if n == 0 {
            0
        } else {
            line_height * n + line_indent * (n - 1)
        };
        (self.max_width, self.total_height)
    }

    pub fn all_valid(&self) -> bool {
        self.lines.iter().all(|m| m.valid)
    }

    pub fn stale_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.valid)
            .map(|(i, _)| i)
    }
}
