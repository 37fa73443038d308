//! Lumen entrypoint: lay out a text file and print the paint commands a
//! canvas of the requested size would receive.
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use core_config::{Config, load_from};
use core_render::{
    MonospaceMetrics, RecordingCanvas, Rect, Selection, StaticTarget, TextRender, VariantKind,
};
use core_text::Buffer;
use core_text::segment::{normalize, normalize_line_endings};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "lumen.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    Plain,
    Decorated,
    Password,
    Wrapped,
}

impl From<VariantArg> for VariantKind {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Plain => VariantKind::Plain,
            VariantArg::Decorated => VariantKind::Decorated,
            VariantArg::Password => VariantKind::Password,
            VariantArg::Wrapped => VariantKind::Wrapped,
        }
    }
}

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "lumen", version, about = "Text layout and paint demo")]
struct Args {
    /// UTF-8 text file to lay out. If omitted an empty document is used.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `lumen.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = VariantArg::Plain)]
    pub variant: VariantArg,
    /// Canvas width in pixels; also the wrap width.
    #[arg(long, default_value_t = 320)]
    pub width: i32,
    #[arg(long, default_value_t = 200)]
    pub height: i32,
    /// Pixels scrolled past the top of the text.
    #[arg(long, default_value_t = 0)]
    pub scroll: i32,
    /// Selection as `LINE:COL-LINE:COL`.
    #[arg(long, value_parser = parse_selection)]
    pub select: Option<Selection>,
    /// Paint as a disabled widget.
    #[arg(long)]
    pub disabled: bool,
}

fn parse_position(s: &str) -> Result<core_text::Position, String> {
    let (line, col) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got {s:?}"))?;
    let line = line.trim().parse().map_err(|e| format!("bad line {line:?}: {e}"))?;
    let col = col.trim().parse().map_err(|e| format!("bad column {col:?}: {e}"))?;
    Ok(core_text::Position::new(line, col))
}

fn parse_selection(s: &str) -> Result<Selection, String> {
    let (a, b) = s
        .split_once('-')
        .ok_or_else(|| format!("expected LINE:COL-LINE:COL, got {s:?}"))?;
    Ok(Selection::new(parse_position(a)?, parse_position(b)?))
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// File content with `\n` endings, composed to NFC.
fn load_text(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(String::new());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let norm = normalize_line_endings(&content);
    if norm.mixed {
        tracing::warn!(target: "io", file = %path.display(), "mixed_line_endings_detected");
    }
    tracing::debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_read_ok");
    Ok(normalize(&norm.text))
}

fn run(args: &Args, config: &Config, out: &mut impl Write) -> Result<()> {
    let text = load_text(args.path.as_deref())?;
    let buffer = Buffer::from_str(&text);
    let mut render = TextRender::from_config(
        &config.file,
        Rc::new(MonospaceMetrics::scaled()),
        args.variant.into(),
    );
    render.set_value(&buffer);

    let target = StaticTarget {
        selection: args.select,
        disabled: args.disabled,
        disabled_color: None,
        selection_color: Some(config.file.selection.color),
    };
    let mut canvas = RecordingCanvas::new(Rect::new(0, 0, args.width, args.height));
    render.paint(
        &mut canvas,
        &buffer,
        0,
        -args.scroll,
        args.width,
        args.height,
        Some(&target),
    )?;
    canvas.write_to(out)?;

    let size = render.preferred_size_for_width(&buffer, args.width)?;
    writeln!(out, "size {}x{}", size.width, size.height)?;

    let m = render.path_metrics();
    info!(
        target: "runtime",
        variant = ?args.variant,
        lines_measured = m.lines_measured,
        lines_painted = m.lines_painted,
        selection_rects = m.selection_rects,
        rewraps = m.rewraps,
        "paint_complete"
    );
    Ok(())
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    info!(
        target: "runtime.startup",
        config = config.source.as_ref().map(|p| p.display().to_string()).as_deref(),
        "config_loaded"
    );
    let stdout = std::io::stdout();
    if let Err(e) = run(&args, &config, &mut stdout.lock()) {
        error!(target: "runtime", error = %e, "run_failed");
        return Err(e);
    }
    Ok(())
}
