//! Layout engine: dirty-range driven metric cache.
//!
//! Owns the [`LineCache`] and the single [`DirtyRange`]. Structural
//! notifications keep cache entries aligned with model lines in O(edit size);
//! measurement is deferred to [`LayoutEngine::recalc`], which re-measures only
//! the dirty span and then rescans every cached width for the maximum (a
//! shrinking line may have been the widest one).
//!
//! The engine never reads text itself. `recalc` receives a measuring closure,
//! so the render decides what a "line" is (plain, masked, ...).
//!
//! Invariants:
//! * After a successful `recalc` the dirty range is clean and every cache
//!   entry is valid.
//! * `total_height == line_height * n + line_indent * (n - 1)` (0 for n = 0).
//! * Invalidation entry points return `true` when the owner should re-layout;
//!   callers coalesce those into one signal per edit.

use std::ops::Range;

use core_text::{EditKind, TextEvent};
use tracing::{debug, trace, warn};

use crate::RenderError;
use crate::dirty::DirtyRange;
use crate::line_cache::{LineCache, LineMetric};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// What one `recalc` pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecalcOutcome {
    pub measured: usize,
    /// Stale lines found outside the dirty range; zero unless an event was
    /// mis-sized.
    pub stragglers: usize,
    pub size_changed: bool,
    pub repaired: bool,
}

#[derive(Debug, Default)]
pub struct LayoutEngine {
    cache: LineCache,
    dirty: DirtyRange,
    size: Size,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dirty(&self) -> DirtyRange {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_clean()
    }

    pub fn line_count(&self) -> usize {
        self.cache.len()
    }

    pub fn metric(&self, line: usize) -> Option<LineMetric> {
        self.cache.get(line)
    }

    pub fn all_valid(&self) -> bool {
        self.cache.all_valid()
    }

    /// Last computed aggregate size; stale while dirty.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Route a buffer notification to the matching entry point.
    pub fn apply(&mut self, ev: &TextEvent) -> bool {
        match ev.kind {
            EditKind::Insert => self.notify_inserted(ev.line, ev.line_count),
            EditKind::Remove => self.notify_removed(ev.line, ev.line_count),
        }
    }

    pub fn notify_removed(&mut self, line: usize, line_count: usize) -> bool {
        let line_count = line_count.max(1);
        self.cache.collapse(line, line_count);
        self.dirty.notify_removed(line, line_count);
        trace!(target: "render.layout", line, line_count, dirty_start = self.dirty.start, dirty_count = self.dirty.count, "notify_removed");
        true
    }

    pub fn notify_inserted(&mut self, line: usize, line_count: usize) -> bool {
        let line_count = line_count.max(1);
        self.cache.expand(line, line_count);
        let before = self.dirty;
        self.dirty.notify_inserted(line, line_count);
        trace!(target: "render.layout", line, line_count, dirty_start = self.dirty.start, dirty_count = self.dirty.count, "notify_inserted");
        before != self.dirty
    }

    /// Mark `[start, start + size)` stale.
    pub fn invalidate(&mut self, start: usize, size: usize) -> bool {
        self.cache.mark_stale(start..start + size);
        self.dirty.invalidate(start, size)
    }

    /// Mark every line of a `line_count`-line model stale, resizing the cache.
    pub fn invalidate_all(&mut self, line_count: usize) -> bool {
        self.cache.reset(line_count);
        let mut changed = self.dirty.invalidate_all(line_count);
        if line_count == 0 {
            // Nothing left to measure, so the aggregates settle right away.
            self.cache.rescan(0, 0);
            changed |= self.size != Size::default();
            self.size = Size::default();
        }
        debug!(target: "render.layout", line_count, "invalidate_all");
        changed
    }

    /// Re-measure the dirty span and refresh aggregates.
    ///
    /// `measure(i)` returns the pixel width of line `i`. `line_count` is the
    /// model's current count; a cache of a different length is rebuilt from
    /// scratch (and reported as `repaired`) rather than trusted.
    pub fn recalc<F>(
        &mut self,
        line_count: usize,
        line_height: i32,
        line_indent: i32,
        mut measure: F,
    ) -> Result<RecalcOutcome, RenderError>
    where
        F: FnMut(usize) -> Result<i32, RenderError>,
    {
        let mut outcome = RecalcOutcome::default();
        let cached = self.cache.len();
        if self.cache.reconcile(line_count) {
            warn!(target: "render.layout", cached, line_count, "line_cache_length_mismatch");
            self.dirty.clear();
            self.dirty.invalidate_all(line_count);
            outcome.repaired = true;
        }
        let range = match self.dirty.take() {
            Some(r) => clamp(r, line_count),
            None if outcome.repaired => 0..0,
            None => return Ok(outcome),
        };
        for line in range.clone().rev() {
            match measure(line) {
                Ok(w) => self.cache.set_width(line, w),
                Err(e) => {
                    // Leave the unmeasured part dirty so a later pass retries.
                    self.dirty.invalidate(range.start, line + 1 - range.start);
                    return Err(e);
                }
            }
            outcome.measured += 1;
        }
        // Entries outside the range can only be stale if a notification was
        // mis-sized; measure them too so the clean state holds.
        let stragglers: Vec<usize> = self.cache.stale_lines().collect();
        for line in stragglers {
            let w = measure(line)?;
            self.cache.set_width(line, w);
            outcome.measured += 1;
            outcome.stragglers += 1;
        }
        let (width, height) = self.cache.rescan(line_height, line_indent);
        let size = Size::new(width, height);
        outcome.size_changed = size != self.size;
        self.size = size;
        debug!(target: "render.layout", start = range.start, end = range.end, measured = outcome.measured, width, height, "recalc");
        Ok(outcome)
    }

    /// Cached width of `line`; call `recalc` first for a fresh value.
    pub fn line_width(&self, line: usize) -> Result<i32, RenderError> {
        self.cache
            .get(line)
            .map(|m| m.width)
            .ok_or(RenderError::LineOutOfRange {
                line,
                count: self.cache.len(),
            })
    }
}

fn clamp(range: Range<usize>, line_count: usize) -> Range<usize> {
    let end = range.end.min(line_count);
    range.start.min(end)..end
}
