//! Dirty line range tracking.
//!
//! The layout engine keeps exactly one contiguous span of lines whose cached
//! width is stale. Edits merge into that span instead of queueing, so the
//! bookkeeping per notification is O(1) and the next `recalc` re-measures a
//! single range.
//!
//! Invariants:
//! * `count == 0` means clean; `start` is meaningless (kept at 0) in that state.
//! * Merges only grow the span or shift it; they never split it.
//! * A removal always leaves the collapsed boundary line itself dirty, since
//!   its surviving text may now include content from a merged neighbour.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyRange {
    pub start: usize,
    pub count: usize,
}

impl DirtyRange {
    pub fn new(start: usize, count: usize) -> Self {
        if count == 0 {
            return Self::default();
        }
        Self { start, count }
    }

    pub fn is_clean(&self) -> bool {
        self.count == 0
    }

    pub fn end(&self) -> usize {
        self.start + self.count
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn contains(&self, line: usize) -> bool {
        self.as_range().contains(&line)
    }

    /// `line_count` lines starting at `line` collapsed into `line`.
    pub fn notify_removed(&mut self, line: usize, line_count: usize) {
        if self.is_clean() {
            self.start = line;
            self.count = 1;
            return;
        }
        // Dirty lines before the removal point stay; dirty lines past the
        // removed block shift up onto it.
        let before = line.saturating_sub(self.start);
        let after = self.end().saturating_sub(line + line_count);
        self.count = before + after + 1;
        self.start = self.start.min(line);
    }

    /// Text inserted at `line` touched `line_count` lines (`line_count - 1` new).
    pub fn notify_inserted(&mut self, line: usize, line_count: usize) {
        let added = line_count.saturating_sub(1);
        if !self.is_clean() {
            if line <= self.start {
                self.start += added;
            } else if line < self.end() {
                self.count += added;
            }
        }
        self.invalidate(line, line_count);
    }

    /// Merge `[start, start + size)` into the range. Returns whether the range
    /// changed.
    pub fn invalidate(&mut self, start: usize, size: usize) -> bool {
        if size == 0 || (self.start == start && self.count == size) {
            return false;
        }
        if self.is_clean() {
            self.start = start;
            self.count = size;
        } else {
            let end = self.end().max(start + size);
            self.start = self.start.min(start);
            self.count = end - self.start;
        }
        true
    }

    /// Mark every line of a `line_count`-line document dirty; zero lines means
    /// nothing is left to measure.
    pub fn invalidate_all(&mut self, line_count: usize) -> bool {
        if line_count == 0 {
            let was_dirty = !self.is_clean();
            self.clear();
            return was_dirty;
        }
        self.invalidate(0, line_count)
    }

    /// Consume the range, leaving it clean.
    pub fn take(&mut self) -> Option<Range<usize>> {
        if self.is_clean() {
            return None;
        }
        let r = self.as_range();
        self.clear();
        Some(r)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_on_clean_marks_boundary_line() {
        let mut d = DirtyRange::default();
        d.notify_removed(0, 1);
        assert_eq!(d, DirtyRange::new(0, 1));
    }

    #[test]
    fn remove_inside_range_shrinks_it() {
        let mut d = DirtyRange::new(2, 5); // 2..7
        d.notify_removed(3, 3); // lines 3,4,5 collapse into 3
        assert_eq!(d, DirtyRange::new(2, 3)); // 2, 3 and old 6 now at 4
    }

    #[test]
    fn remove_before_range_shifts_it_up() {
        let mut d = DirtyRange::new(10, 2); // 10..12
        d.notify_removed(4, 3); // two lines disappear before the range
        assert_eq!(d.start, 4);
        assert_eq!(d.end(), 10);
        assert!(d.contains(8) && d.contains(9));
    }

    #[test]
    fn remove_after_range_extends_to_cover_it() {
        let mut d = DirtyRange::new(1, 2); // 1..3
        d.notify_removed(6, 1);
        assert_eq!(d, DirtyRange::new(1, 6));
        assert!(d.contains(6));
    }

    #[test]
    fn insert_before_range_shifts_start() {
        let mut d = DirtyRange::new(5, 2);
        d.notify_inserted(1, 3);
        // shifted 5..7 -> 7..9, then merged with 1..4
        assert_eq!(d, DirtyRange::new(1, 8));
    }

    #[test]
    fn insert_inside_range_grows_count() {
        let mut d = DirtyRange::new(2, 3); // 2..5
        d.notify_inserted(3, 4);
        assert_eq!(d, DirtyRange::new(2, 5)); // 2..7
    }

    #[test]
    fn invalidate_merges_and_reports_change() {
        let mut d = DirtyRange::default();
        assert!(d.invalidate(4, 2));
        assert!(!d.invalidate(4, 2), "identical range is not a change");
        assert!(d.invalidate(1, 1));
        assert_eq!(d.as_range(), 1..6);
        assert!(!d.invalidate(3, 0));
    }

    #[test]
    fn invalidate_all_of_empty_document_is_clean() {
        let mut d = DirtyRange::new(0, 3);
        assert!(d.invalidate_all(0));
        assert!(d.is_clean());
        assert!(!d.invalidate_all(0));
    }

    #[test]
    fn take_clears() {
        let mut d = DirtyRange::new(3, 2);
        assert_eq!(d.take(), Some(3..5));
        assert!(d.is_clean());
        assert_eq!(d.take(), None);
    }
}
