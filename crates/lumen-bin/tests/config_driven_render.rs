use std::rc::Rc;

use core_config::{Color, load_from};
use core_render::{
    DecorationSet, MonospaceMetrics, PaintCommand, RecordingCanvas, Rect, Size, TextRender,
    VariantKind, WrapMode,
};
use core_text::Buffer;

fn config(toml: &str) -> core_config::Config {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), toml).unwrap();
    load_from(Some(tmp.path().to_path_buf())).unwrap()
}

// Config file settings flow through to what the render paints.
#[test]
fn decorated_render_follows_config() {
    let cfg = config(
        "[text]\ncolor = \"red\"\nline_indent = 3\n[decoration]\nunderline = true\ncolor = \"blue\"\nline_width = 2\n",
    );
    let buf = Buffer::from_str("ab\ncd");
    let mut r = TextRender::from_config(
        &cfg.file,
        Rc::new(MonospaceMetrics::fixed(10, 16)),
        VariantKind::Decorated,
    );
    assert_eq!(
        r.decorations().map(|d| d.set),
        Some(DecorationSet::UNDERLINE)
    );
    r.set_value(&buf);
    assert_eq!(r.preferred_size(&buf).unwrap(), Size::new(20, 35));

    let mut canvas = RecordingCanvas::new(Rect::new(0, 0, 100, 100));
    r.paint(&mut canvas, &buf, 0, 0, 100, 100, None).unwrap();
    let red = "red".parse::<Color>().unwrap();
    let blue = "blue".parse::<Color>().unwrap();
    assert_eq!(canvas.commands()[1], PaintCommand::SetColor(red));
    assert!(canvas.commands().contains(&PaintCommand::Line {
        x1: 0,
        y1: 34,
        x2: 20,
        y2: 34,
        width: 2,
    }));
    assert!(canvas.commands().contains(&PaintCommand::SetColor(blue)));
}

#[test]
fn wrap_and_password_settings_apply() {
    let cfg = config("[wrap]\nmode = \"word\"\n[password]\necho = \"#\"\nshow_last = false\n");
    let buf = Buffer::from_str("hello world");

    let mut wrapped = TextRender::from_config(
        &cfg.file,
        Rc::new(MonospaceMetrics::fixed(10, 16)),
        VariantKind::Wrapped,
    );
    wrapped.set_value(&buf);
    assert_eq!(
        wrapped.preferred_size_for_width(&buf, 70).unwrap(),
        Size::new(70, 33)
    );
    let rows: Vec<_> = wrapped
        .wrapped_lines()
        .iter()
        .map(|b| b.text.as_str())
        .collect();
    assert_eq!(rows, vec!["hello ", "world"]);
    assert!(!wrapped.set_wrap_mode(WrapMode::Word));

    let mut password = TextRender::from_config(
        &cfg.file,
        Rc::new(MonospaceMetrics::fixed(10, 16)),
        VariantKind::Password,
    );
    password.set_value(&buf);
    assert_eq!(password.line(&buf, 0).unwrap(), "#".repeat(11));
}

#[test]
fn unparsable_config_paints_with_defaults() {
    let cfg = config("[text\ncolor = ");
    let buf = Buffer::from_str("x");
    let mut r = TextRender::from_config(
        &cfg.file,
        Rc::new(MonospaceMetrics::scaled()),
        VariantKind::Plain,
    );
    r.set_value(&buf);
    let mut canvas = RecordingCanvas::new(Rect::new(0, 0, 50, 50));
    r.paint(&mut canvas, &buf, 0, 0, 50, 50, None).unwrap();
    assert_eq!(canvas.commands()[1], PaintCommand::SetColor(Color::GRAY));
}
