//! Wrapping layer: splits model lines into broken lines that fit a width.
//!
//! Break search works on char columns with widths from the same
//! [`FontMetrics`] the painter uses, so a broken line never measures wider
//! than the available width (except for the one-character fallback and, in
//! word mode, hanging whitespace).
//!
//! The search keeps a column hint from the previous break. From the hint it
//! walks forward while the prefix is narrower than the target and backward
//! while it is wider, stopping on an exact fit or on the first direction
//! reversal (the lower, fitting column wins).
//!
//! Invariants:
//! * Concatenating the broken lines of one source line reproduces it.
//! * An empty source line yields exactly one empty broken line.
//! * Every broken line of a non-empty source holds at least one char.
//! * Broken lines are rebuilt wholesale; nothing is patched incrementally.

use core_config::WrapModeSetting;
use core_text::TextModel;
use tracing::{debug, trace};

use crate::RenderError;
use crate::font::{Font, FontMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Widest char boundary that fits.
    #[default]
    Char,
    /// Prefer ending a row after whitespace; falls back to `Char`.
    Word,
}

impl From<WrapModeSetting> for WrapMode {
    fn from(s: WrapModeSetting) -> Self {
        match s {
            WrapModeSetting::Char => WrapMode::Char,
            WrapModeSetting::Word => WrapMode::Word,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLine {
    pub source_line: usize,
    /// Char column in the source line where this fragment starts.
    pub start_col: usize,
    pub text: String,
    pub width: i32,
    /// Last fragment of its source line.
    pub last: bool,
}

impl BrokenLine {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn end_col(&self) -> usize {
        self.start_col + self.char_len()
    }
}

/// Largest `k` in `1..=len` whose prefix `[0, k)` fits `width`, searched from
/// `hint`. Returns 1 when not even one char fits.
fn find_break(
    metrics: &dyn FontMetrics,
    font: &Font,
    text: &str,
    len: usize,
    width: i32,
    hint: usize,
) -> usize {
    let mut k = hint.clamp(1, len);
    let mut direction = 0i8;
    loop {
        let w = metrics.substring_width(font, text, 0, k);
        trace!(target: "render.wrap", k, w, width, "probe");
        if w < width {
            if direction < 0 || k == len {
                break;
            }
            direction = 1;
            k += 1;
        } else if w > width {
            if k == 1 {
                break;
            }
            k -= 1;
            if direction > 0 {
                break;
            }
            direction = -1;
        } else {
            break;
        }
    }
    k
}

fn word_adjust(chars: &[char], k: usize) -> usize {
    if k >= chars.len() {
        return k;
    }
    if chars[k].is_whitespace() {
        // The run after the break hangs on this row.
        let run = chars[k..].iter().take_while(|c| c.is_whitespace()).count();
        return k + run;
    }
    match chars[..k].iter().rposition(|c| c.is_whitespace()) {
        Some(p) => p + 1,
        None => k,
    }
}

/// Break one source line, appending fragments to `out`. `hint` carries the
/// last break column across calls.
#[allow(clippy::too_many_arguments)]
pub fn break_line(
    metrics: &dyn FontMetrics,
    font: &Font,
    source_line: usize,
    line: &str,
    width: i32,
    mode: WrapMode,
    hint: &mut usize,
    out: &mut Vec<BrokenLine>,
) {
    if line.is_empty() {
        out.push(BrokenLine {
            source_line,
            start_col: 0,
            text: String::new(),
            width: 0,
            last: true,
        });
        return;
    }
    let chars: Vec<char> = line.chars().collect();
    let mut start = 0usize;
    let mut byte = 0usize;
    while start < chars.len() {
        let rest = &line[byte..];
        let rest_chars = &chars[start..];
        let rest_w = metrics.string_width(font, rest);
        let mut k = if rest_w <= width {
            rest_chars.len()
        } else {
            find_break(metrics, font, rest, rest_chars.len(), width, *hint)
        };
        if mode == WrapMode::Word {
            k = word_adjust(rest_chars, k);
        }
        let text: String = rest_chars[..k].iter().collect();
        let fragment_w = if k == rest_chars.len() {
            rest_w
        } else {
            metrics.string_width(font, &text)
        };
        byte += text.len();
        out.push(BrokenLine {
            source_line,
            start_col: start,
            text,
            width: fragment_w,
            last: start + k == chars.len(),
        });
        *hint = k;
        start += k;
    }
}

/// Break every line of `model` at `width`.
pub fn break_to_lines(
    metrics: &dyn FontMetrics,
    font: &Font,
    model: &dyn TextModel,
    width: i32,
    mode: WrapMode,
) -> Result<Vec<BrokenLine>, RenderError> {
    let mut out = Vec::with_capacity(model.line_count());
    let mut hint = 0usize;
    for i in 0..model.line_count() {
        let line = model.line(i)?;
        break_line(metrics, font, i, &line, width, mode, &mut hint, &mut out);
    }
    Ok(out)
}

/// Cached broken lines for the last width used.
#[derive(Debug, Default)]
pub struct WrapLayer {
    mode: WrapMode,
    lines: Vec<BrokenLine>,
    last_width: Option<i32>,
}

impl WrapLayer {
    pub fn new(mode: WrapMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> WrapMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: WrapMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.discard();
        true
    }

    pub fn lines(&self) -> &[BrokenLine] {
        &self.lines
    }

    pub fn last_width(&self) -> Option<i32> {
        self.last_width
    }

    /// Forget the broken lines; the next `ensure` rebuilds them.
    pub fn discard(&mut self) {
        self.lines.clear();
        self.last_width = None;
    }

    /// Rebuild when `width` differs from the last one used. Returns whether a
    /// rebuild happened.
    pub fn ensure(
        &mut self,
        metrics: &dyn FontMetrics,
        font: &Font,
        model: &dyn TextModel,
        width: i32,
    ) -> Result<bool, RenderError> {
        if self.last_width == Some(width) {
            return Ok(false);
        }
        self.lines = break_to_lines(metrics, font, model, width, self.mode)?;
        self.last_width = Some(width);
        debug!(target: "render.wrap", width, rows = self.lines.len(), mode = ?self.mode, "rewrap");
        Ok(true)
    }
}
