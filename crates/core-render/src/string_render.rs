//! Single-line render for short labels.
//!
//! Owns its string and caches one width; there is no model, no dirty range
//! and no metric cache. Any change to the string or font drops the cached
//! width.

use std::rc::Rc;

use core_config::Color;
use core_text::slice_cols;

use crate::RenderError;
use crate::canvas::Canvas;
use crate::font::{Font, FontMetrics};
use crate::layout::Size;
use crate::position::PositionMetric;
use crate::selection::PaintTarget;
use crate::style::TextStyle;

pub struct StringRender {
    text: String,
    style: TextStyle,
    metrics: Rc<dyn FontMetrics>,
    width: Option<i32>,
}

impl StringRender {
    pub fn new(text: impl Into<String>, style: TextStyle, metrics: Rc<dyn FontMetrics>) -> Self {
        Self {
            text: text.into(),
            style,
            metrics,
            width: None,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Returns whether the text changed.
    pub fn set_value(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.text == text {
            return false;
        }
        self.text = text;
        self.invalidate();
        true
    }

    pub fn invalidate(&mut self) {
        self.width = None;
    }

    /// The only line is 0.
    pub fn line(&self, line: usize) -> Result<&str, RenderError> {
        if line > 0 {
            return Err(RenderError::LineOutOfRange { line, count: 1 });
        }
        Ok(&self.text)
    }

    pub fn line_height(&self) -> i32 {
        self.metrics.line_height(&self.style.font)
    }

    fn width(&mut self) -> i32 {
        match self.width {
            Some(w) => w,
            None => {
                let w = self.metrics.string_width(&self.style.font, &self.text);
                self.width = Some(w);
                w
            }
        }
    }

    pub fn preferred_size(&mut self) -> Size {
        Size::new(self.width(), self.line_height())
    }

    pub fn set_font(&mut self, font: Font) -> bool {
        if !self.style.replace_font(font) {
            return false;
        }
        self.invalidate();
        true
    }

    pub fn set_color(&mut self, color: Color) -> bool {
        self.style.replace_color(color)
    }

    pub fn paint(
        &self,
        canvas: &mut dyn Canvas,
        x: i32,
        y: i32,
        target: Option<&dyn PaintTarget>,
    ) {
        if canvas.font() != Some(&self.style.font) {
            canvas.set_font(&self.style.font);
        }
        let enabled = target.is_none_or(|t| t.is_enabled());
        if enabled {
            if let Some(t) = target {
                self.paint_selection(canvas, x, y, t);
            }
        }
        let color = if enabled {
            self.style.color
        } else {
            target
                .and_then(|t| t.disabled_color())
                .unwrap_or(self.style.disabled_color)
        };
        if canvas.color() != Some(color) {
            canvas.set_color(color);
        }
        canvas.fill_text(&self.text, x, y);
    }

    fn paint_selection(&self, canvas: &mut dyn Canvas, x: i32, y: i32, target: &dyn PaintTarget) {
        let (Some(sel), Some(sel_color)) = (target.selection(), target.selection_color()) else {
            return;
        };
        let len = self.text.chars().count();
        let a = sel.start.col.min(sel.end.col).min(len);
        let b = sel.start.col.max(sel.end.col).min(len);
        if a == b {
            return;
        }
        let font = &self.style.font;
        let dx = self.metrics.string_width(font, slice_cols(&self.text, 0, a));
        let w = self.metrics.substring_width(font, &self.text, a, b);
        canvas.set_color(sel_color);
        canvas.fill_rect(x + dx, y, w, self.line_height());
    }
}

impl PositionMetric for StringRender {
    fn lines(&self) -> usize {
        1
    }

    fn line_size(&self, line: usize) -> Result<usize, RenderError> {
        Ok(self.line(line)?.chars().count() + 1)
    }

    fn max_offset(&self) -> usize {
        self.text.chars().count()
    }
}

impl std::fmt::Debug for StringRender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringRender")
            .field("text", &self.text)
            .field("style", &self.style)
            .field("width", &self.width)
            .finish()
    }
}
