//! Style values a render is constructed with.
//!
//! Nothing here is global: a render owns its `TextStyle` and variant policy,
//! built either from `Default` or from a loaded `core_config::ConfigFile`.

use bitflags::bitflags;
use core_config::{Color, ConfigFile, DecorationConfig, PasswordConfig};

use crate::font::Font;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub font: Font,
    pub color: Color,
    pub disabled_color: Color,
    /// Extra pixels between consecutive lines.
    pub line_indent: i32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: Font::default(),
            color: Color::GRAY,
            disabled_color: Color::WHITE,
            line_indent: 1,
        }
    }
}

impl TextStyle {
    /// Default style with the bold preset font.
    pub fn bold() -> Self {
        Self {
            font: Font::default_bold(),
            ..Self::default()
        }
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            font: Font::from(&cfg.font),
            color: cfg.text.color,
            disabled_color: cfg.text.disabled_color,
            line_indent: cfg.text.line_indent.max(0),
        }
    }

    pub(crate) fn replace_font(&mut self, font: Font) -> bool {
        if self.font == font {
            return false;
        }
        self.font = font;
        true
    }

    pub(crate) fn replace_color(&mut self, color: Color) -> bool {
        if self.color == color {
            return false;
        }
        self.color = color;
        true
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DecorationSet: u8 {
        const UNDERLINE = 0b001;
        const OVERLINE  = 0b010;
        const STRIKE    = 0b100;
    }
}

impl DecorationSet {
    pub fn from_config(cfg: &DecorationConfig) -> Self {
        let mut set = DecorationSet::empty();
        set.set(DecorationSet::UNDERLINE, cfg.underline);
        set.set(DecorationSet::OVERLINE, cfg.overline);
        set.set(DecorationSet::STRIKE, cfg.strike);
        set
    }
}

/// Decoration policy of the decorated variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decorations {
    pub set: DecorationSet,
    pub line_width: i32,
    pub color: Color,
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            set: DecorationSet::empty(),
            line_width: 1,
            color: Color::BLACK,
        }
    }
}

impl Decorations {
    pub fn new(set: DecorationSet) -> Self {
        Self {
            set,
            ..Self::default()
        }
    }

    pub fn from_config(cfg: &DecorationConfig) -> Self {
        Self {
            set: DecorationSet::from_config(cfg),
            line_width: cfg.line_width.max(1),
            color: cfg.color,
        }
    }

    /// Replace the active set. Returns whether it changed.
    pub fn set_decorations(&mut self, set: DecorationSet) -> bool {
        let changed = self.set != set;
        self.set = set;
        changed
    }

    pub fn add_decorations(&mut self, set: DecorationSet) -> bool {
        self.set_decorations(self.set | set)
    }

    pub fn clear_decorations(&mut self, set: DecorationSet) -> bool {
        self.set_decorations(self.set - set)
    }

    /// y offsets (relative to the row top) of every active decoration, in
    /// overline, underline, strike order.
    pub fn offsets(&self, line_height: i32) -> impl Iterator<Item = i32> + use<> {
        let set = self.set;
        let width = self.line_width;
        [
            (DecorationSet::OVERLINE, width),
            (DecorationSet::UNDERLINE, line_height - 1),
            // round half up, as for positive pixel values
            (DecorationSet::STRIKE, (line_height + 1) / 2 - 1),
        ]
        .into_iter()
        .filter(move |(flag, _)| set.contains(*flag))
        .map(|(_, dy)| dy)
    }
}

/// Masking policy of the password variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mask {
    pub echo: char,
    pub show_last: bool,
}

impl Default for Mask {
    fn default() -> Self {
        Self {
            echo: '*',
            show_last: true,
        }
    }
}

impl Mask {
    pub fn from_config(cfg: &PasswordConfig) -> Self {
        Self {
            echo: cfg.echo,
            show_last: cfg.show_last,
        }
    }

    /// One echo char per source char; the final char stays verbatim when
    /// `show_last` is set.
    pub fn apply(&self, line: &str) -> String {
        let n = line.chars().count();
        let mut out: String = std::iter::repeat_n(self.echo, n.saturating_sub(1)).collect();
        match line.chars().last() {
            Some(last) if self.show_last => out.push(last),
            Some(_) => out.push(self.echo),
            None => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_shows_last_char() {
        assert_eq!(Mask::default().apply("abc"), "**c");
        assert_eq!(Mask::default().apply(""), "");
        let hidden = Mask {
            echo: '#',
            show_last: false,
        };
        assert_eq!(hidden.apply("héllo"), "#####");
    }

    #[test]
    fn decoration_set_edits_report_change() {
        let mut d = Decorations::default();
        assert!(d.add_decorations(DecorationSet::UNDERLINE | DecorationSet::STRIKE));
        assert!(!d.add_decorations(DecorationSet::UNDERLINE));
        assert!(d.clear_decorations(DecorationSet::STRIKE));
        assert_eq!(d.set, DecorationSet::UNDERLINE);
        assert!(d.set_decorations(DecorationSet::OVERLINE));
        assert_eq!(d.set, DecorationSet::OVERLINE);
    }

    #[test]
    fn decoration_offsets() {
        let d = Decorations::new(DecorationSet::all());
        assert_eq!(d.offsets(16).collect::<Vec<_>>(), vec![1, 15, 7]);
        assert_eq!(d.offsets(15).collect::<Vec<_>>(), vec![1, 14, 7]);
        assert_eq!(Decorations::default().offsets(16).count(), 0);
    }

    #[test]
    fn style_from_config() {
        let mut cfg = ConfigFile::default();
        cfg.text.line_indent = 3;
        cfg.decoration.strike = true;
        let style = TextStyle::from_config(&cfg);
        assert_eq!(style.line_indent, 3);
        assert_eq!(style.font, Font::default());
        assert_eq!(
            Decorations::from_config(&cfg.decoration).set,
            DecorationSet::STRIKE
        );
        assert_eq!(TextStyle::bold().font, Font::default_bold());
    }
}
