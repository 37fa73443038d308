//! Multi-line text render: layout engine + paint router + variant policy.
//!
//! A `TextRender` never owns text. The host passes its [`TextModel`] to every
//! call that needs content and forwards each [`TextEvent`] through
//! [`TextRender::text_updated`] before the model is read again. Renders and
//! models therefore have independent lifetimes.
//!
//! Variants form a closed set chosen at construction:
//! * `Plain`: lines as stored.
//! * `Decorated`: plain glyphs plus underline / overline / strike lines.
//! * `Password`: each line replaced by its mask; widths measure the mask.
//! * `Wrapped`: rows are broken lines for the last paint width.
//!
//! Owner signalling: invalidations that can change the preferred size raise a
//! pending flag instead of calling back into the host. The host drains it with
//! [`TextRender::take_owner_invalidation`] on its next turn, which yields at
//! most one signal per batch of edits and keeps layout from re-entering a
//! paint or a `recalc` in progress.
//!
//! Paint order per visible row: selection background (enabled targets only),
//! glyphs, decorations. Colour changes are restored before the next row.

use std::borrow::Cow;
use std::rc::Rc;

use core_config::{Color, ConfigFile};
use core_text::{TextEvent, TextModel};
use tracing::{debug, trace};

use crate::RenderError;
use crate::canvas::Canvas;
use crate::font::{Font, FontMetrics, FontStyle};
use crate::layout::{LayoutEngine, Size};
use crate::path_metrics::{RenderPathMetrics, RenderPathMetricsSnapshot};
use crate::position::ModelPositions;
use crate::selection::{PaintTarget, Selection};
use crate::style::{DecorationSet, Decorations, Mask, TextStyle};
use crate::viewport::Viewport;
use crate::wrap::{BrokenLine, WrapLayer, WrapMode};

/// Non-owning handle to the widget hosting a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u64);

#[derive(Debug)]
pub enum Variant {
    Plain,
    Decorated(Decorations),
    Password(Mask),
    Wrapped(WrapLayer),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariantKind {
    #[default]
    Plain,
    Decorated,
    Password,
    Wrapped,
}

impl Variant {
    pub fn kind(&self) -> VariantKind {
        match self {
            Variant::Plain => VariantKind::Plain,
            Variant::Decorated(_) => VariantKind::Decorated,
            Variant::Password(_) => VariantKind::Password,
            Variant::Wrapped(_) => VariantKind::Wrapped,
        }
    }
}

/// One visible row: a whole model line, or a broken line when wrapping.
struct Row<'a> {
    source_line: usize,
    start_col: usize,
    text: Cow<'a, str>,
    width: i32,
    last: bool,
}

/// Line as painted and measured: the mask for passwords, the source otherwise.
fn display_line<'a>(
    variant: &Variant,
    model: &'a dyn TextModel,
    line: usize,
) -> Result<Cow<'a, str>, RenderError> {
    let raw = model.line(line)?;
    Ok(match variant {
        Variant::Password(mask) => Cow::Owned(mask.apply(&raw)),
        _ => raw,
    })
}

pub struct TextRender {
    style: TextStyle,
    metrics: Rc<dyn FontMetrics>,
    layout: LayoutEngine,
    variant: Variant,
    owner: Option<OwnerId>,
    owner_pending: bool,
    path: RenderPathMetrics,
}

impl TextRender {
    pub fn new(style: TextStyle, metrics: Rc<dyn FontMetrics>, variant: Variant) -> Self {
        Self {
            style,
            metrics,
            layout: LayoutEngine::new(),
            variant,
            owner: None,
            owner_pending: false,
            path: RenderPathMetrics::default(),
        }
    }

    pub fn plain(style: TextStyle, metrics: Rc<dyn FontMetrics>) -> Self {
        Self::new(style, metrics, Variant::Plain)
    }

    pub fn decorated(
        style: TextStyle,
        metrics: Rc<dyn FontMetrics>,
        decorations: Decorations,
    ) -> Self {
        Self::new(style, metrics, Variant::Decorated(decorations))
    }

    pub fn password(style: TextStyle, metrics: Rc<dyn FontMetrics>, mask: Mask) -> Self {
        Self::new(style, metrics, Variant::Password(mask))
    }

    pub fn wrapped(style: TextStyle, metrics: Rc<dyn FontMetrics>, mode: WrapMode) -> Self {
        Self::new(style, metrics, Variant::Wrapped(WrapLayer::new(mode)))
    }

    pub fn from_config(cfg: &ConfigFile, metrics: Rc<dyn FontMetrics>, kind: VariantKind) -> Self {
        let variant = match kind {
            VariantKind::Plain => Variant::Plain,
            VariantKind::Decorated => Variant::Decorated(Decorations::from_config(&cfg.decoration)),
            VariantKind::Password => Variant::Password(Mask::from_config(&cfg.password)),
            VariantKind::Wrapped => Variant::Wrapped(WrapLayer::new(cfg.wrap.mode.into())),
        };
        Self::new(TextStyle::from_config(cfg), metrics, variant)
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn line_height(&self) -> i32 {
        self.metrics.line_height(&self.style.font)
    }

    pub fn path_metrics(&self) -> RenderPathMetricsSnapshot {
        self.path.snapshot()
    }

    /// Caret geometry: broken rows once the wrapped variant has laid out for
    /// a width, model lines otherwise.
    pub fn positions<'a>(&'a self, model: &'a dyn TextModel) -> ModelPositions<'a> {
        match self.wrapped_lines() {
            [] => ModelPositions::new(model),
            rows => ModelPositions::wrapped(model, rows),
        }
    }

    // ---- owner ----

    pub fn owner_changed(&mut self, owner: Option<OwnerId>) {
        self.owner = owner;
    }

    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    /// Drain the coalesced "re-layout my owner" signal.
    pub fn take_owner_invalidation(&mut self) -> Option<OwnerId> {
        if !std::mem::take(&mut self.owner_pending) {
            return None;
        }
        let owner = self.owner?;
        RenderPathMetrics::add(&self.path.owner_invalidations, 1);
        debug!(target: "render.layout", owner = owner.0, "owner_invalidated");
        Some(owner)
    }

    fn signal_owner(&mut self) {
        if self.owner.is_some() {
            self.owner_pending = true;
        }
    }

    /// Common tail of every invalidation: broken lines follow content, not
    /// just width, so they are dropped too.
    fn invalidated(&mut self, changed: bool) {
        if let Variant::Wrapped(layer) = &mut self.variant {
            layer.discard();
        }
        if changed {
            self.signal_owner();
        }
    }

    // ---- invalidation protocol ----

    /// Bind (or re-bind) to `model`: every line becomes dirty.
    pub fn set_value(&mut self, model: &dyn TextModel) {
        let changed = self.layout.invalidate_all(model.line_count());
        self.invalidated(changed);
    }

    /// Apply a buffer notification.
    pub fn text_updated(&mut self, ev: &TextEvent) {
        RenderPathMetrics::add(&self.path.edits, 1);
        let changed = self.layout.apply(ev);
        self.invalidated(changed);
    }

    pub fn invalidate(&mut self, start: usize, size: usize) {
        let changed = self.layout.invalidate(start, size);
        self.invalidated(changed);
    }

    /// Every line currently laid out becomes dirty.
    pub fn invalidate_all(&mut self) {
        let changed = self.layout.invalidate_all(self.layout.line_count());
        self.invalidated(changed);
    }

    /// Re-measure dirty lines. A no-op when clean.
    pub fn recalc(&mut self, model: &dyn TextModel) -> Result<(), RenderError> {
        let lh = self.line_height();
        let (variant, metrics, font) = (&self.variant, &*self.metrics, &self.style.font);
        let outcome = self
            .layout
            .recalc(model.line_count(), lh, self.style.line_indent, |i| {
                let text = display_line(variant, model, i)?;
                Ok(metrics.string_width(font, &text))
            })?;
        if outcome.measured > 0 || outcome.repaired {
            RenderPathMetrics::add(&self.path.recalcs, 1);
            RenderPathMetrics::add(&self.path.lines_measured, outcome.measured as u64);
            RenderPathMetrics::add(&self.path.stragglers, outcome.stragglers as u64);
        }
        if outcome.repaired {
            RenderPathMetrics::add(&self.path.cache_repairs, 1);
            self.invalidated(false);
        }
        if outcome.size_changed {
            self.signal_owner();
        }
        Ok(())
    }

    // ---- queries ----

    /// Line `line` as the variant paints it.
    pub fn line<'a>(
        &self,
        model: &'a dyn TextModel,
        line: usize,
    ) -> Result<Cow<'a, str>, RenderError> {
        display_line(&self.variant, model, line)
    }

    pub fn line_width(&mut self, model: &dyn TextModel, line: usize) -> Result<i32, RenderError> {
        self.recalc(model)?;
        self.layout.line_width(line)
    }

    pub fn preferred_size(&mut self, model: &dyn TextModel) -> Result<Size, RenderError> {
        self.recalc(model)?;
        Ok(self.layout.size())
    }

    /// Size when laid out into `width`. Only the wrapped variant depends on
    /// the width; the others report their natural size.
    pub fn preferred_size_for_width(
        &mut self,
        model: &dyn TextModel,
        width: i32,
    ) -> Result<Size, RenderError> {
        if !matches!(self.variant, Variant::Wrapped(_)) {
            return self.preferred_size(model);
        }
        self.ensure_wrapped(model, width)?;
        let n = i32::try_from(self.row_count(model)).unwrap_or(i32::MAX);
        let height = if n == 0 {
            0
        } else {
            self.line_height() * n + self.style.line_indent * (n - 1)
        };
        Ok(Size::new(width, height))
    }

    /// Broken lines of the wrapped variant (empty for other variants or
    /// before the first wrap).
    pub fn wrapped_lines(&self) -> &[BrokenLine] {
        match &self.variant {
            Variant::Wrapped(layer) => layer.lines(),
            _ => &[],
        }
    }

    fn ensure_wrapped(&mut self, model: &dyn TextModel, width: i32) -> Result<(), RenderError> {
        if let Variant::Wrapped(layer) = &mut self.variant {
            if layer.ensure(&*self.metrics, &self.style.font, model, width)? {
                RenderPathMetrics::add(&self.path.rewraps, 1);
            }
        }
        Ok(())
    }

    fn row_count(&self, model: &dyn TextModel) -> usize {
        match &self.variant {
            Variant::Wrapped(layer) => layer.lines().len(),
            _ => model.line_count(),
        }
    }

    fn row<'a>(&'a self, model: &'a dyn TextModel, row: usize) -> Result<Row<'a>, RenderError> {
        if let Variant::Wrapped(layer) = &self.variant {
            let lines = layer.lines();
            let b = lines.get(row).ok_or(RenderError::LineOutOfRange {
                line: row,
                count: lines.len(),
            })?;
            return Ok(Row {
                source_line: b.source_line,
                start_col: b.start_col,
                text: Cow::Borrowed(b.text.as_str()),
                width: b.width,
                last: b.last,
            });
        }
        Ok(Row {
            source_line: row,
            start_col: 0,
            text: display_line(&self.variant, model, row)?,
            width: self.layout.line_width(row)?,
            last: true,
        })
    }

    // ---- style ----

    /// Returns whether anything changed; a change invalidates every line.
    pub fn set_font(&mut self, font: Font) -> bool {
        if !self.style.replace_font(font) {
            return false;
        }
        self.invalidate_all();
        self.signal_owner();
        true
    }

    pub fn resize_font(&mut self, size: u16) -> bool {
        let font = self.style.font.resized(size);
        self.set_font(font)
    }

    pub fn restyle_font(&mut self, style: FontStyle) -> bool {
        let font = self.style.font.restyled(style);
        self.set_font(font)
    }

    /// Colour only affects painting; no re-layout.
    pub fn set_color(&mut self, color: Color) -> bool {
        self.style.replace_color(color)
    }

    pub fn set_disabled_color(&mut self, color: Color) -> bool {
        let changed = self.style.disabled_color != color;
        self.style.disabled_color = color;
        changed
    }

    pub fn set_line_indent(&mut self, indent: i32) -> bool {
        let indent = indent.max(0);
        if self.style.line_indent == indent {
            return false;
        }
        self.style.line_indent = indent;
        self.invalidate_all();
        true
    }

    // ---- variant policy ----

    pub fn decorations(&self) -> Option<&Decorations> {
        match &self.variant {
            Variant::Decorated(d) => Some(d),
            _ => None,
        }
    }

    fn decorations_mut(&mut self) -> Option<&mut Decorations> {
        match &mut self.variant {
            Variant::Decorated(d) => Some(d),
            _ => None,
        }
    }

    /// Replace the decoration set; `false` when unchanged or not decorated.
    pub fn set_decorations(&mut self, set: DecorationSet) -> bool {
        self.decorations_mut()
            .is_some_and(|d| d.set_decorations(set))
    }

    pub fn add_decorations(&mut self, set: DecorationSet) -> bool {
        self.decorations_mut()
            .is_some_and(|d| d.add_decorations(set))
    }

    pub fn clear_decorations(&mut self, set: DecorationSet) -> bool {
        self.decorations_mut()
            .is_some_and(|d| d.clear_decorations(set))
    }

    pub fn mask(&self) -> Option<&Mask> {
        match &self.variant {
            Variant::Password(m) => Some(m),
            _ => None,
        }
    }

    fn update_mask(&mut self, f: impl FnOnce(&mut Mask) -> bool) -> bool {
        let changed = match &mut self.variant {
            Variant::Password(m) => f(m),
            _ => false,
        };
        if changed {
            // Masked widths differ per echo char.
            let n = self.layout.line_count();
            self.invalidate(0, n);
        }
        changed
    }

    pub fn set_echo_char(&mut self, echo: char) -> bool {
        self.update_mask(|m| {
            let changed = m.echo != echo;
            m.echo = echo;
            changed
        })
    }

    pub fn set_show_last(&mut self, show_last: bool) -> bool {
        self.update_mask(|m| {
            let changed = m.show_last != show_last;
            m.show_last = show_last;
            changed
        })
    }

    pub fn set_wrap_mode(&mut self, mode: WrapMode) -> bool {
        match &mut self.variant {
            Variant::Wrapped(layer) => layer.set_mode(mode),
            _ => false,
        }
    }

    // ---- paint ----

    /// Paint the rows visible through the canvas clip, with the text origin
    /// at `(x, y)` and an area of `width x height`. A `y` above the clip top
    /// scrolls the text.
    #[allow(clippy::too_many_arguments)]
    pub fn paint(
        &mut self,
        canvas: &mut dyn Canvas,
        model: &dyn TextModel,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        target: Option<&dyn PaintTarget>,
    ) -> Result<(), RenderError> {
        let clip = canvas.clip();
        if clip.is_empty() {
            return Ok(());
        }
        self.recalc(model)?;
        self.ensure_wrapped(model, width)?;
        let lh = self.line_height();
        let Some(vp) = Viewport::compute(
            clip,
            y,
            height,
            lh,
            self.style.line_indent,
            self.row_count(model),
        ) else {
            trace!(target: "render.paint", y, height, "nothing_visible");
            return Ok(());
        };
        if canvas.font() != Some(&self.style.font) {
            canvas.set_font(&self.style.font);
        }
        RenderPathMetrics::add(&self.path.paints, 1);
        RenderPathMetrics::add(&self.path.lines_painted, vp.height as u64);
        trace!(target: "render.paint", first = vp.first_line, rows = vp.height, top = vp.top, "paint");

        let enabled = target.is_none_or(|t| t.is_enabled());
        if !enabled {
            let color = target
                .and_then(|t| t.disabled_color())
                .unwrap_or(self.style.disabled_color);
            for i in vp.rows() {
                canvas.set_color(color);
                let row = self.row(model, i)?;
                self.paint_row(canvas, x, vp.row_y(i), &row, color, lh);
            }
            return Ok(());
        }

        let color = self.style.color;
        if canvas.color() != Some(color) {
            canvas.set_color(color);
        }
        let selection = target
            .and_then(|t| Some((t.selection()?, t.selection_color()?)))
            .map(|(s, c)| (s.clamped(model), c))
            .filter(|(s, _)| !s.is_empty());
        for i in vp.rows() {
            let row = self.row(model, i)?;
            let row_y = vp.row_y(i);
            if let Some((sel, sel_color)) = &selection {
                self.paint_selection(canvas, x, row_y, vp.pitch, &row, sel, *sel_color);
                if canvas.color() != Some(color) {
                    canvas.set_color(color);
                }
            }
            self.paint_row(canvas, x, row_y, &row, color, lh);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_selection(
        &self,
        canvas: &mut dyn Canvas,
        x: i32,
        y: i32,
        pitch: i32,
        row: &Row<'_>,
        sel: &Selection,
        sel_color: Color,
    ) {
        let row_end = row.start_col + row.text.chars().count();
        let Some((a, b)) = sel.row_span(row.source_line, row.start_col, row_end, row.last) else {
            return;
        };
        let (dx, w) = if a == row.start_col && b == row_end {
            (0, row.width)
        } else {
            let font = &self.style.font;
            let (la, lb) = (a - row.start_col, b - row.start_col);
            (
                self.metrics.substring_width(font, &row.text, 0, la),
                self.metrics.substring_width(font, &row.text, la, lb),
            )
        };
        canvas.set_color(sel_color);
        canvas.fill_rect(x + dx, y, w.max(1), pitch);
        RenderPathMetrics::add(&self.path.selection_rects, 1);
    }

    fn paint_row(
        &self,
        canvas: &mut dyn Canvas,
        x: i32,
        y: i32,
        row: &Row<'_>,
        color: Color,
        line_height: i32,
    ) {
        canvas.fill_text(&row.text, x, y);
        let Variant::Decorated(d) = &self.variant else {
            return;
        };
        if d.set.is_empty() {
            return;
        }
        canvas.set_color(d.color);
        for dy in d.offsets(line_height) {
            canvas.draw_line(x, y + dy, x + row.width, y + dy, d.line_width);
            RenderPathMetrics::add(&self.path.decoration_lines, 1);
        }
        canvas.set_color(color);
    }
}

impl std::fmt::Debug for TextRender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRender")
            .field("style", &self.style)
            .field("variant", &self.variant.kind())
            .field("dirty", &self.layout.dirty())
            .field("owner", &self.owner)
            .finish()
    }
}
