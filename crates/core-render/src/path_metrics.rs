//! Render path counters.
//!
//! Counts what the incremental machinery did: lines re-measured against
//! edits received, rewraps, and painted rows.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RenderPathMetrics {
    /// Text events delivered to the render.
    pub edits: AtomicU64,
    /// `recalc` passes that found work to do.
    pub recalcs: AtomicU64,
    /// Lines re-measured across all passes.
    pub lines_measured: AtomicU64,
    /// Stale lines measured outside the dirty range.
    pub stragglers: AtomicU64,
    /// Passes where the cache length disagreed with the model.
    pub cache_repairs: AtomicU64,
    /// Full re-breaks of the wrapping layer.
    pub rewraps: AtomicU64,
    /// Paint calls that reached the line loop.
    pub paints: AtomicU64,
    pub lines_painted: AtomicU64,
    pub selection_rects: AtomicU64,
    pub decoration_lines: AtomicU64,
    /// Owner invalidations handed to the host (after coalescing).
    pub owner_invalidations: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderPathMetricsSnapshot {
    pub edits: u64,
    pub recalcs: u64,
    pub lines_measured: u64,
    pub stragglers: u64,
    pub cache_repairs: u64,
    pub rewraps: u64,
    pub paints: u64,
    pub lines_painted: u64,
    pub selection_rects: u64,
    pub decoration_lines: u64,
    pub owner_invalidations: u64,
}

impl RenderPathMetrics {
    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RenderPathMetricsSnapshot {
        RenderPathMetricsSnapshot {
            edits: self.edits.load(Ordering::Relaxed),
            recalcs: self.recalcs.load(Ordering::Relaxed),
            lines_measured: self.lines_measured.load(Ordering::Relaxed),
            stragglers: self.stragglers.load(Ordering::Relaxed),
            cache_repairs: self.cache_repairs.load(Ordering::Relaxed),
            rewraps: self.rewraps.load(Ordering::Relaxed),
            paints: self.paints.load(Ordering::Relaxed),
            lines_painted: self.lines_painted.load(Ordering::Relaxed),
            selection_rects: self.selection_rects.load(Ordering::Relaxed),
            decoration_lines: self.decoration_lines.load(Ordering::Relaxed),
            owner_invalidations: self.owner_invalidations.load(Ordering::Relaxed),
        }
    }
}
