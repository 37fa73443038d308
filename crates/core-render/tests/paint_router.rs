use std::rc::Rc;

use core_config::Color;
use core_render::{
    DecorationSet, Decorations, MonospaceMetrics, PaintCommand, PaintTarget, RecordingCanvas,
    Rect, Selection, StaticTarget, TextRender, TextStyle, WrapMode,
};
use core_text::{Position, TextModel};
use pretty_assertions::assert_eq;

const SEL: Color = Color::rgb(0xAD, 0xD8, 0xE6);

fn metrics() -> Rc<MonospaceMetrics> {
    Rc::new(MonospaceMetrics::fixed(10, 16))
}

fn selecting(a: (usize, usize), b: (usize, usize)) -> StaticTarget {
    StaticTarget {
        selection: Some(Selection::new(
            Position::new(a.0, a.1),
            Position::new(b.0, b.1),
        )),
        selection_color: Some(SEL),
        ..StaticTarget::default()
    }
}

fn paint(
    r: &mut TextRender,
    model: &dyn TextModel,
    y: i32,
    target: Option<&StaticTarget>,
) -> RecordingCanvas {
    let mut c = RecordingCanvas::new(Rect::new(0, 0, 200, 40));
    r.set_value(model);
    r.paint(&mut c, model, 0, y, 200, 40, target.map(|t| t as &dyn PaintTarget)).unwrap();
    c
}

#[test]
fn selection_painted_only_on_selected_lines() {
    let model = vec!["abcd", "efgh", "ijkl"];
    let mut r = TextRender::plain(TextStyle::default(), metrics());
    let c = paint(&mut r, &model, 0, Some(&selecting((1, 2), (2, 1))));
    assert_eq!(
        c.rects(),
        vec![Rect::new(20, 17, 20, 17), Rect::new(0, 34, 10, 17)]
    );
}

#[test]
fn single_line_selection_spans_selected_columns() {
    let model = vec!["hello"];
    let mut r = TextRender::plain(TextStyle::default(), metrics());
    let c = paint(&mut r, &model, 0, Some(&selecting((0, 3), (0, 1))));
    assert_eq!(c.rects(), vec![Rect::new(10, 0, 20, 17)]);
}

#[test]
fn selection_ending_at_column_zero_paints_a_sliver() {
    let model = vec!["abcd", "ef", "ghij"];
    let mut r = TextRender::plain(TextStyle::default(), metrics());
    let c = paint(&mut r, &model, 0, Some(&selecting((0, 0), (2, 0))));
    assert_eq!(
        c.rects(),
        vec![
            Rect::new(0, 0, 40, 17),
            Rect::new(0, 17, 20, 17),
            Rect::new(0, 34, 1, 17),
        ]
    );
}

#[test]
fn empty_selection_paints_nothing() {
    let model = vec!["abcd"];
    let mut r = TextRender::plain(TextStyle::default(), metrics());
    let c = paint(&mut r, &model, 0, Some(&selecting((0, 2), (0, 2))));
    assert!(c.rects().is_empty());
}

#[test]
fn text_colour_restored_after_selection() {
    let model = vec!["ab"];
    let mut r = TextRender::plain(TextStyle::default(), metrics());
    let c = paint(&mut r, &model, 0, Some(&selecting((0, 0), (0, 1))));
    let colours: Vec<String> = c.commands().iter().map(|cmd| cmd.to_string()).collect();
    assert_eq!(
        colours,
        vec![
            "font Arial 14 Normal",
            "color #808080",
            "color #ADD8E6",
            "rect 0,0 10x17",
            "color #808080",
            "text 0,0 \"ab\"",
        ]
    );
}

#[test]
fn scrolled_origin_paints_from_first_visible_row() {
    let model = vec!["l0", "l1", "l2", "l3", "l4", "l5"];
    let mut r = TextRender::plain(TextStyle::default(), metrics());
    let c = paint(&mut r, &model, -20, None);
    assert_eq!(c.texts(), vec![("l1", 0, -3), ("l2", 0, 14), ("l3", 0, 31)]);
    assert_eq!(r.path_metrics().lines_painted, 3);
}

#[test]
fn origin_below_clip_paints_nothing() {
    let model = vec!["a"];
    let mut r = TextRender::plain(TextStyle::default(), metrics());
    let c = paint(&mut r, &model, 41, None);
    assert!(c.commands().is_empty());
}

#[test]
fn font_and_colour_not_reissued_when_current() {
    let model = vec!["a", "b"];
    let mut r = TextRender::plain(TextStyle::default(), metrics());
    r.set_value(&model);
    let mut c = RecordingCanvas::new(Rect::new(0, 0, 200, 40));
    r.paint(&mut c, &model, 0, 0, 200, 40, None).unwrap();
    c.take();
    r.paint(&mut c, &model, 0, 0, 200, 40, None).unwrap();
    assert!(
        c.commands()
            .iter()
            .all(|cmd| matches!(cmd, PaintCommand::FillText { .. }))
    );
}

#[test]
fn wrapped_selection_follows_source_columns() {
    let model = vec!["abcdef"];
    let mut r = TextRender::wrapped(TextStyle::default(), metrics(), WrapMode::Char);
    r.set_value(&model);
    let mut c = RecordingCanvas::new(Rect::new(0, 0, 200, 40));
    let target = selecting((0, 2), (0, 5));
    r.paint(&mut c, &model, 0, 0, 30, 40, Some(&target)).unwrap();
    assert_eq!(c.texts(), vec![("abc", 0, 0), ("def", 0, 17)]);
    assert_eq!(
        c.rects(),
        vec![Rect::new(20, 0, 10, 17), Rect::new(0, 17, 20, 17)]
    );
}

#[test]
fn decorations_use_row_width_and_restore_disabled_colour() {
    let model = vec!["abcd"];
    let mut r = TextRender::decorated(
        TextStyle::default(),
        metrics(),
        Decorations::new(DecorationSet::STRIKE),
    );
    let target = StaticTarget {
        disabled: true,
        ..StaticTarget::default()
    };
    let c = paint(&mut r, &model, 0, Some(&target));
    let lines: Vec<String> = c.commands()[1..].iter().map(|cmd| cmd.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "color #FFFFFF",
            "text 0,0 \"abcd\"",
            "color #000000",
            "line 0,7 -> 40,7 w1",
            "color #FFFFFF",
        ]
    );
    assert_eq!(r.path_metrics().decoration_lines, 1);
}

#[test]
fn each_decoration_gets_its_own_line() {
    let model = vec!["ab", "c"];
    let mut r = TextRender::decorated(
        TextStyle::default(),
        metrics(),
        Decorations::new(DecorationSet::all()),
    );
    let c = paint(&mut r, &model, 0, None);
    let lines = c
        .commands()
        .iter()
        .filter(|cmd| matches!(cmd, PaintCommand::Line { .. }))
        .count();
    assert_eq!(lines, 6);
}
