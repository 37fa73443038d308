//! Configuration loading and parsing.
//!
//! Parses `lumen.toml` (or an override path supplied by the binary) into the
//! explicit style values a text render is constructed with. There is no
//! process-wide default font or colour: callers build a render from
//! `Config::file` (or `ConfigFile::default()`) and pass it in.
//!
//! Every field has a default so partial files are fine. Unknown fields are
//! ignored. A file that fails to parse falls back to defaults with a warning
//! instead of aborting startup.
//!
//! Layout:
//! ```toml
//! [font]
//! family = "Arial"
//! size = 14
//! style = "normal"      # normal | bold | italic | bold_italic
//!
//! [text]
//! color = "gray"
//! disabled_color = "white"
//! line_indent = 1
//!
//! [decoration]
//! line_width = 1
//! color = "black"
//! underline = false
//! overline = false
//! strike = false
//!
//! [password]
//! echo = "*"
//! show_last = true
//!
//! [wrap]
//! mode = "char"         # char | word
//!
//! [selection]
//! color = "#ADD8E6"
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub mod color;

pub use color::{Color, ColorParseError};

const CONFIG_FILE_NAME: &str = "lumen.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub size: u16,
    pub style: FontStyle,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            size: 14,
            style: FontStyle::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub color: Color,
    pub disabled_color: Color,
    /// Extra pixels between consecutive lines.
    pub line_indent: i32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            color: Color::GRAY,
            disabled_color: Color::WHITE,
            line_indent: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    pub line_width: i32,
    pub color: Color,
    pub underline: bool,
    pub overline: bool,
    pub strike: bool,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            line_width: 1,
            color: Color::BLACK,
            underline: false,
            overline: false,
            strike: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub echo: char,
    pub show_last: bool,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            echo: '*',
            show_last: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapModeSetting {
    /// Break at the widest character boundary that fits.
    #[default]
    Char,
    /// Prefer the end of the last whitespace run, fall back to `Char`.
    Word,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WrapConfig {
    pub mode: WrapModeSetting,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub color: Color,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            color: Color::rgb(0xAD, 0xD8, 0xE6),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    pub font: FontConfig,
    pub text: TextConfig,
    pub decoration: DecorationConfig,
    pub password: PasswordConfig,
    pub wrap: WrapConfig,
    pub selection: SelectionConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // file contents as read
    pub file: ConfigFile,    // parsed (or default) data
    pub source: Option<PathBuf>,
}

/// Best-effort config path: working directory first, then the platform
/// config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("lumen").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let mut cfg = Config {
                raw: Some(content),
                file,
                source: Some(path),
            };
            cfg.sanitize();
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

/// Parse from an in-memory TOML string.
pub fn parse(content: &str) -> Result<Config> {
    let file = toml::from_str::<ConfigFile>(content)?;
    let mut cfg = Config {
        raw: Some(content.to_string()),
        file,
        source: None,
    };
    cfg.sanitize();
    Ok(cfg)
}

impl Config {
    /// Clamp values the render cannot honour. Returns how many fields changed.
    pub fn sanitize(&mut self) -> usize {
        let mut clamped = 0;
        let text = &mut self.file.text;
        if text.line_indent < 0 {
            info!(target: "config", raw = text.line_indent, clamped = 0, "line_indent_clamped");
            text.line_indent = 0;
            clamped += 1;
        }
        let deco = &mut self.file.decoration;
        if deco.line_width < 1 {
            info!(target: "config", raw = deco.line_width, clamped = 1, "decoration_line_width_clamped");
            deco.line_width = 1;
            clamped += 1;
        }
        let font = &mut self.file.font;
        if font.size == 0 {
            info!(target: "config", raw = font.size, clamped = 1, "font_size_clamped");
            font.size = 1;
            clamped += 1;
        }
        clamped
    }
}
