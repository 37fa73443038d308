//! Edit notifications report exactly the line-count change the buffer saw.

use core_text::{Buffer, Position, TextModel};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Insert { at: (usize, usize), text: String },
    Remove { a: (usize, usize), b: (usize, usize) },
    RemoveLines { line: usize, count: usize },
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        ((0usize..16, 0usize..16), "[a-zé \n]{0,8}").prop_map(|(at, text)| Edit::Insert { at, text }),
        ((0usize..16, 0usize..16), (0usize..16, 0usize..16)).prop_map(|(a, b)| Edit::Remove { a, b }),
        (0usize..16, 0usize..5).prop_map(|(line, count)| Edit::RemoveLines { line, count }),
    ]
}

fn clamp(buf: &Buffer, (line, col): (usize, usize)) -> Position {
    let line = line % buf.line_count();
    Position::new(line, col.min(buf.line_len(line).unwrap()))
}

proptest! {
    #[test]
    fn line_delta_matches_line_count_change(
        initial in "[a-z \n]{0,30}",
        edits in prop::collection::vec(edit(), 1..20),
    ) {
        let mut buf = Buffer::from_str(&initial);
        for e in edits {
            let before = buf.line_count() as isize;
            let ev = match e {
                Edit::Insert { at, text } => buf.insert(clamp(&buf, at), &text),
                Edit::Remove { a, b } => {
                    let (a, b) = (clamp(&buf, a), clamp(&buf, b));
                    buf.remove(a.min(b), a.max(b))
                }
                Edit::RemoveLines { line, count } => {
                    let line = line % buf.line_count();
                    buf.remove_lines(line, count)
                }
            }
            .unwrap();
            prop_assert_eq!(ev.line_delta(), buf.line_count() as isize - before, "{:?}", ev);
            prop_assert!(ev.line < buf.line_count().max(1));
        }
    }
}

#[test]
fn set_value_events_cancel_out_to_the_new_count() {
    let mut buf = Buffer::from_str("a\nb\nc");
    let [removed, inserted] = buf.set_value("x\ny");
    assert_eq!(3 + removed.line_delta() + inserted.line_delta(), 2);
    assert_eq!(buf.line_count(), 2);
}
