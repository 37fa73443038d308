//! Input normalization ahead of layout.
//!
//! Contract:
//! - `normalize_line_endings` converts CRLF / lone CR to LF and reports what it
//!   found, so the buffer only ever sees `\n` terminators.
//! - `normalize` composes to NFC, so canonically equivalent strings measure to
//!   the same width and break at the same columns.
//! - Neither function logs content.

use unicode_normalization::UnicodeNormalization;

/// Line ending style detected in raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
    Cr,
}

/// Result of line ending normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    /// First ending style seen (LF when the input had none).
    pub original: LineEnding,
    /// More than one ending style was present.
    pub mixed: bool,
}

/// Convert every line ending to `\n`.
pub fn normalize_line_endings(input: &str) -> Normalized {
    let mut text = String::with_capacity(input.len());
    let mut seen: Option<LineEnding> = None;
    let mut mixed = false;
    let mut note = |kind: LineEnding| match seen {
        None => seen = Some(kind),
        Some(prev) if prev != kind => mixed = true,
        _ => {}
    };
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                note(LineEnding::CrLf);
                text.push('\n');
            }
            '\r' => {
                note(LineEnding::Cr);
                text.push('\n');
            }
            '\n' => {
                note(LineEnding::Lf);
                text.push('\n');
            }
            other => text.push(other),
        }
    }
    Normalized {
        text,
        original: seen.unwrap_or(LineEnding::Lf),
        mixed,
    }
}

/// Compose to NFC.
pub fn normalize(input: &str) -> String {
    input.nfc().collect()
}
