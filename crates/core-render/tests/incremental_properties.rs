//! Property tests: incremental layout agrees with a from-scratch layout, and
//! wrapping never loses text.

use std::rc::Rc;

use core_render::wrap::{WrapMode, break_to_lines};
use core_render::{Font, FontMetrics, MonospaceMetrics, TextRender, TextStyle};
use core_text::{Buffer, Position, TextModel};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert { line: usize, col: usize, text: String },
    Remove { a: (usize, usize), b: (usize, usize) },
    RemoveLines { line: usize, count: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..20, 0usize..20, "[a-zé漢 \n]{0,6}")
            .prop_map(|(line, col, text)| Op::Insert { line, col, text }),
        ((0usize..20, 0usize..20), (0usize..20, 0usize..20))
            .prop_map(|(a, b)| Op::Remove { a, b }),
        (0usize..20, 1usize..4).prop_map(|(line, count)| Op::RemoveLines { line, count }),
    ]
}

/// Clamp a generated position into the buffer.
fn pos(buf: &Buffer, (line, col): (usize, usize)) -> Position {
    let line = line % buf.line_count();
    let len = buf.line_len(line).unwrap_or(0);
    Position::new(line, col.min(len))
}

fn metrics() -> Rc<dyn FontMetrics> {
    Rc::new(MonospaceMetrics::fixed(7, 15))
}

proptest! {
    #[test]
    fn incremental_matches_fresh(initial in "[a-z \n]{0,40}", ops in prop::collection::vec(op(), 1..25)) {
        let mut buf = Buffer::from_str(&initial);
        let mut r = TextRender::plain(TextStyle::default(), metrics());
        r.set_value(&buf);
        r.recalc(&buf).unwrap();

        for (i, op) in ops.into_iter().enumerate() {
            let ev = match op {
                Op::Insert { line, col, text } => buf.insert(pos(&buf, (line, col)), &text),
                Op::Remove { a, b } => {
                    let (a, b) = (pos(&buf, a), pos(&buf, b));
                    buf.remove(a.min(b), a.max(b))
                }
                Op::RemoveLines { line, count } => {
                    let line = line % buf.line_count();
                    buf.remove_lines(line, count)
                }
            }
            .unwrap();
            r.text_updated(&ev);
            // Every stale entry lies inside the one dirty range.
            let layout = r.layout();
            for line in 0..layout.line_count() {
                if layout.metric(line).is_some_and(|m| !m.valid) {
                    prop_assert!(
                        layout.dirty().contains(line),
                        "stale line {} outside {:?}",
                        line,
                        layout.dirty()
                    );
                }
            }
            // Interleave size queries with batches of edits.
            if i % 3 == 0 {
                r.recalc(&buf).unwrap();
            }
        }

        let size = r.preferred_size(&buf).unwrap();
        prop_assert!(!r.layout().is_dirty());
        prop_assert!(r.layout().all_valid());
        prop_assert_eq!(r.layout().line_count(), buf.line_count());
        prop_assert_eq!(r.path_metrics().cache_repairs, 0);
        prop_assert_eq!(r.path_metrics().stragglers, 0);

        let mut fresh = TextRender::plain(TextStyle::default(), metrics());
        fresh.set_value(&buf);
        prop_assert_eq!(size, fresh.preferred_size(&buf).unwrap());
        for line in 0..buf.line_count() {
            prop_assert_eq!(r.line_width(&buf, line).unwrap(), fresh.line_width(&buf, line).unwrap());
        }
    }

    #[test]
    fn broken_lines_concatenate_to_source(
        lines in prop::collection::vec("[a-z 漢]{0,30}", 1..6),
        width in 0i32..120,
        word in any::<bool>(),
    ) {
        let m = MonospaceMetrics::fixed(7, 15);
        let mode = if word { WrapMode::Word } else { WrapMode::Char };
        let rows = break_to_lines(&m, &Font::default(), &lines, width, mode).unwrap();
        for (i, line) in lines.iter().enumerate() {
            let parts: Vec<_> = rows.iter().filter(|b| b.source_line == i).collect();
            prop_assert!(!parts.is_empty());
            let joined: String = parts.iter().map(|b| b.text.as_str()).collect();
            prop_assert_eq!(&joined, line);
            prop_assert!(parts.last().is_some_and(|b| b.last));
            for b in &parts {
                if !line.is_empty() {
                    prop_assert!(!b.text.is_empty());
                }
                // Only single-char rows and hanging whitespace may overflow.
                let trimmed = b.text.trim_end();
                if mode == WrapMode::Char && b.text.chars().count() > 1 {
                    prop_assert!(b.width <= width);
                }
                if mode == WrapMode::Word && trimmed.chars().count() > 1 && !trimmed.contains(' ') {
                    prop_assert!(m.string_width(&Font::default(), trimmed) <= width.max(14));
                }
            }
        }
    }
}
