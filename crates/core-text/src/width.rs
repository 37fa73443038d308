//! Grapheme cluster advance widths.
//!
//! `egc_width` is the single authority for how many advance cells a
//! grapheme cluster (EGC) occupies. The monospace font metrics provider in
//! `core-render` multiplies this by its cell width, so every width the layout
//! engine caches, every wrap breakpoint and every selection rectangle derives
//! from the same function and cannot drift apart.
//!
//! Precedence:
//! 1. Classifier (semantic kind -> width mapping).
//! 2. Conservative widen fallback (pictographic signal but width == 1).
//!
//! Invariants:
//! - Classifier favors over-estimation: an extra blank cell is harmless,
//!   under-estimation makes glyphs overlap their neighbours.
//! - Empty input has width 0; every non-empty cluster has width >= 1.

/// Semantic classification of a single grapheme cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EgcKind {
    Ascii,
    Narrow,
    Wide,
    EmojiSimple,
    EmojiModifier,
    EmojiKeycap,
    EmojiFlag,
    EmojiZwj,
    /// Base + combining mark(s); `true` when the base is wide or pictographic.
    Combining(bool),
    Other,
}

const ZWJ: char = '\u{200D}';
const KEYCAP: char = '\u{20E3}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_skin_tone_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

// Emoji blocks plus misc symbols and dingbats.
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

fn char_cells(c: char) -> usize {
    unicode_width::UnicodeWidthChar::width(c).unwrap_or(1)
}

fn classify(egc: &str) -> EgcKind {
    let mut chars = egc.chars();
    let Some(first) = chars.next() else {
        return EgcKind::Other;
    };
    if chars.next().is_none() {
        if first.is_ascii() {
            return EgcKind::Ascii;
        }
        if is_extended_pictographic(first) {
            return EgcKind::EmojiSimple;
        }
        return if char_cells(first) == 2 {
            EgcKind::Wide
        } else {
            EgcKind::Narrow
        };
    }

    let count = egc.chars().count();
    let pictographic = egc.chars().filter(|&c| is_extended_pictographic(c)).count();
    let regional = egc.chars().filter(|&c| is_regional_indicator(c)).count();
    let has_zwj = egc.contains(ZWJ);

    if egc.ends_with(KEYCAP) && (first.is_ascii_digit() || first == '#' || first == '*') {
        return EgcKind::EmojiKeycap;
    }
    if regional == 2 && count == 2 {
        return EgcKind::EmojiFlag;
    }
    if has_zwj && pictographic >= 2 {
        return EgcKind::EmojiZwj;
    }
    if pictographic >= 1 && egc.chars().any(is_skin_tone_modifier) {
        return EgcKind::EmojiModifier;
    }
    if pictographic == 1 && !has_zwj {
        return EgcKind::EmojiSimple;
    }
    if egc.chars().any(is_combining_mark) {
        let base_wide = egc
            .chars()
            .find(|&c| !is_combining_mark(c))
            .is_some_and(|c| is_extended_pictographic(c) || char_cells(c) == 2);
        return EgcKind::Combining(base_wide);
    }
    if egc.chars().any(|c| char_cells(c) == 2) {
        return EgcKind::Wide;
    }
    if pictographic > 0 {
        return EgcKind::EmojiSimple;
    }
    EgcKind::Narrow
}

#[inline]
fn width_for_kind(kind: EgcKind) -> u16 {
    match kind {
        EgcKind::Ascii | EgcKind::Narrow | EgcKind::Other => 1,
        EgcKind::Wide
        | EgcKind::EmojiSimple
        | EgcKind::EmojiModifier
        | EgcKind::EmojiKeycap
        | EgcKind::EmojiFlag
        | EgcKind::EmojiZwj => 2,
        EgcKind::Combining(true) => 2,
        EgcKind::Combining(false) => 1,
    }
}

/// Advance width in cells for a single grapheme cluster.
///
/// Precondition: `egc` is one grapheme cluster; callers segment first.
/// Control characters (tab included) occupy one cell.
#[inline]
pub fn egc_width(egc: &str) -> u16 {
    if egc.is_empty() {
        return 0;
    }
    let mut width = width_for_kind(classify(egc));
    if width == 1
        && egc
            .chars()
            .any(|c| is_extended_pictographic(c) || is_regional_indicator(c))
    {
        width = 2;
    }
    width
}
