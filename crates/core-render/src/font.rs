//! Fonts and the measurement contract the layout engine relies on.
//!
//! The engine treats every width returned by a [`FontMetrics`] provider as
//! authoritative. Wrapping and selection geometry are derived from the same
//! provider, so a provider only has to be self-consistent: the width of a
//! prefix must not shrink when the prefix grows.
//!
//! Columns are `char` indices, matching `core_text::slice_cols`.

use core_config::FontConfig;
pub use core_config::FontStyle;
use core_text::{grapheme, slice_cols};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    pub family: String,
    pub size: u16,
    pub style: FontStyle,
}

impl Font {
    pub fn new(family: impl Into<String>, size: u16, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            size,
            style,
        }
    }

    /// Bold preset used by `TextStyle::bold`.
    pub fn default_bold() -> Self {
        Self::new("Arial", 12, FontStyle::Bold)
    }

    /// Small preset for secondary labels.
    pub fn default_small() -> Self {
        Self::new("Arial", 10, FontStyle::Normal)
    }

    pub fn resized(&self, size: u16) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    pub fn restyled(&self, style: FontStyle) -> Self {
        Self {
            style,
            ..self.clone()
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Arial", 14, FontStyle::Normal)
    }
}

impl From<&FontConfig> for Font {
    fn from(cfg: &FontConfig) -> Self {
        Self::new(cfg.family.clone(), cfg.size, cfg.style)
    }
}

/// Pixel measurement supplied by the embedding toolkit.
///
/// Implementations must be pure functions of `(font, text)`. One provider is
/// typically shared (`Rc<dyn FontMetrics>`) by every render of a window.
pub trait FontMetrics {
    fn string_width(&self, font: &Font, text: &str) -> i32;

    /// Width of the char columns `[start_col, end_col)` of `text`.
    fn substring_width(&self, font: &Font, text: &str, start_col: usize, end_col: usize) -> i32 {
        self.string_width(font, slice_cols(text, start_col, end_col))
    }

    fn line_height(&self, font: &Font) -> i32;
}

/// Fixed-pitch provider: every grapheme cluster advances by its cell count
/// (1 or 2, see `core_text::egc_width`) times a per-font cell width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonospaceMetrics {
    fixed: Option<(i32, i32)>,
}

impl MonospaceMetrics {
    /// Cell width and line height derived from the font size.
    pub fn scaled() -> Self {
        Self { fixed: None }
    }

    /// Same cell width and line height for every font.
    pub fn fixed(cell_width: i32, line_height: i32) -> Self {
        Self {
            fixed: Some((cell_width.max(1), line_height.max(1))),
        }
    }

    pub fn cell_width(&self, font: &Font) -> i32 {
        match self.fixed {
            Some((cell, _)) => cell,
            None => ((i32::from(font.size) * 3 + 4) / 5).max(1),
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn string_width(&self, font: &Font, text: &str) -> i32 {
        let cells = i32::try_from(grapheme::advance(text)).unwrap_or(i32::MAX);
        cells.saturating_mul(self.cell_width(font))
    }

    fn line_height(&self, font: &Font) -> i32 {
        match self.fixed {
            Some((_, lh)) => lh,
            None => ((i32::from(font.size) * 5 + 3) / 4).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_metrics_follow_font_size() {
        let m = MonospaceMetrics::scaled();
        let f = Font::default();
        assert_eq!(m.cell_width(&f), 9);
        assert_eq!(m.line_height(&f), 18);
        assert_eq!(m.string_width(&f, "abc"), 27);
        assert_eq!(m.line_height(&f.resized(8)), 10);
    }

    #[test]
    fn substring_width_uses_char_columns() {
        let m = MonospaceMetrics::fixed(10, 16);
        let f = Font::default();
        assert_eq!(m.substring_width(&f, "héllo", 1, 3), 20);
        assert_eq!(m.substring_width(&f, "héllo", 3, 99), 20);
        assert_eq!(m.substring_width(&f, "héllo", 4, 2), 0);
    }

    #[test]
    fn wide_clusters_take_two_cells() {
        let m = MonospaceMetrics::fixed(10, 16);
        assert_eq!(m.string_width(&Font::default(), "a漢"), 30);
    }

    #[test]
    fn presets_match_defaults() {
        assert_eq!(Font::default().size, 14);
        assert_eq!(Font::default_bold().style, FontStyle::Bold);
        assert_eq!(Font::default_bold().size, 12);
        assert_eq!(Font::default_small().size, 10);
        assert_eq!(
            Font::default().restyled(FontStyle::Italic).style,
            FontStyle::Italic
        );
    }
}
