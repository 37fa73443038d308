//! Drawing surface abstraction.
//!
//! Renders never talk to a windowing backend directly. They issue a small set
//! of primitives against a [`Canvas`]; the embedding toolkit maps them onto its
//! own context. [`RecordingCanvas`] keeps the primitives as an ordered command
//! list, which is what the demo binary prints and what tests assert against.
//!
//! Design invariants:
//! * Commands preserve issue order; nothing is reordered or merged.
//! * Positions are absolute pixels; the canvas does not translate.
//! * Font and colour are sticky state: a render only re-issues them when the
//!   canvas reports a different current value.
//! * The clip rectangle is fixed for the canvas lifetime.

use std::fmt;
use std::io::{self, Write};

use core_config::Color;

use crate::font::Font;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

pub trait Canvas {
    /// Current clip rectangle in absolute coordinates.
    fn clip(&self) -> Rect;
    fn font(&self) -> Option<&Font>;
    fn set_font(&mut self, font: &Font);
    fn color(&self) -> Option<Color>;
    fn set_color(&mut self, color: Color);
    /// Draw `text` with its top-left corner at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: i32, y: i32);
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, line_width: i32);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintCommand {
    SetFont(Font),
    SetColor(Color),
    FillText {
        text: String,
        x: i32,
        y: i32,
    },
    FillRect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        width: i32,
    },
}

impl fmt::Display for PaintCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintCommand::SetFont(font) => write!(
                f,
                "font {} {} {:?}",
                font.family, font.size, font.style
            ),
            PaintCommand::SetColor(c) => write!(f, "color {c}"),
            PaintCommand::FillText { text, x, y } => write!(f, "text {x},{y} {text:?}"),
            PaintCommand::FillRect {
                x,
                y,
                width,
                height,
            } => write!(f, "rect {x},{y} {width}x{height}"),
            PaintCommand::Line {
                x1,
                y1,
                x2,
                y2,
                width,
            } => write!(f, "line {x1},{y1} -> {x2},{y2} w{width}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    clip: Rect,
    font: Option<Font>,
    color: Option<Color>,
    cmds: Vec<PaintCommand>,
}

impl RecordingCanvas {
    pub fn new(clip: Rect) -> Self {
        Self {
            clip,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.cmds
    }

    /// Drain recorded commands, keeping font/colour state.
    pub fn take(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.cmds)
    }

    /// `(text, x, y)` of every text command, in order.
    pub fn texts(&self) -> Vec<(&str, i32, i32)> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                PaintCommand::FillText { text, x, y } => Some((text.as_str(), *x, *y)),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<Rect> {
        self.cmds
            .iter()
            .filter_map(|c| match *c {
                PaintCommand::FillRect {
                    x,
                    y,
                    width,
                    height,
                } => Some(Rect::new(x, y, width, height)),
                _ => None,
            })
            .collect()
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for c in &self.cmds {
            writeln!(out, "{c}")?;
        }
        out.flush()
    }
}

impl Canvas for RecordingCanvas {
    fn clip(&self) -> Rect {
        self.clip
    }

    fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    fn set_font(&mut self, font: &Font) {
        self.font = Some(font.clone());
        self.cmds.push(PaintCommand::SetFont(font.clone()));
    }

    fn color(&self) -> Option<Color> {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = Some(color);
        self.cmds.push(PaintCommand::SetColor(color));
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32) {
        self.cmds.push(PaintCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.cmds.push(PaintCommand::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, line_width: i32) {
        self.cmds.push(PaintCommand::Line {
            x1,
            y1,
            x2,
            y2,
            width: line_width,
        });
    }
}
