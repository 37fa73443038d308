//! Line/offset geometry for caret and selection logic.

use core_text::TextModel;

use crate::RenderError;
use crate::wrap::BrokenLine;

/// Coordinate space a caret moves through. `line_size` counts one extra slot
/// for the line terminator so a caret can sit after the last char.
pub trait PositionMetric {
    fn lines(&self) -> usize;
    fn line_size(&self, line: usize) -> Result<usize, RenderError>;
    fn max_offset(&self) -> usize;
}

/// [`PositionMetric`] over a borrowed model, or over its broken rows when
/// the text is wrapped.
#[derive(Clone, Copy)]
pub struct ModelPositions<'a> {
    model: &'a dyn TextModel,
    rows: Option<&'a [BrokenLine]>,
}

impl<'a> ModelPositions<'a> {
    pub fn new(model: &'a dyn TextModel) -> Self {
        Self { model, rows: None }
    }

    /// Lines are the broken rows; offsets still span the whole model.
    pub fn wrapped(model: &'a dyn TextModel, rows: &'a [BrokenLine]) -> Self {
        Self {
            model,
            rows: Some(rows),
        }
    }
}

impl PositionMetric for ModelPositions<'_> {
    fn lines(&self) -> usize {
        match self.rows {
            Some(rows) => rows.len(),
            None => self.model.line_count(),
        }
    }

    fn line_size(&self, line: usize) -> Result<usize, RenderError> {
        match self.rows {
            Some(rows) => rows
                .get(line)
                .map(|r| r.text.chars().count() + 1)
                .ok_or(RenderError::LineOutOfRange {
                    line,
                    count: rows.len(),
                }),
            None => Ok(self.model.line(line)?.chars().count() + 1),
        }
    }

    fn max_offset(&self) -> usize {
        self.model.total_length()
    }
}
