use std::fmt::Write;

use crate::{dto::BoardSummary, view::ViewModel};

pub fn boards(boards: &[BoardSummary], selected: Option<&str>) -> String {
    if boards.is_empty() {
        return "No boards yet. Create one with `new-board <name>`.\n".to_string();
    }

    let mut out = String::new();
    for (index, board) in boards.iter().enumerate() {
        let marker = if selected == Some(board.id.as_str()) { '*' } else { ' ' };
        let _ = write!(
            out,
            "{marker}{:>3}. {} ({} notes)",
            index + 1,
            board.name,
            board.notes_count
        );
        if !board.description.is_empty() {
            let _ = write!(out, " - {}", board.description);
        }
        out.push('\n');
    }
    out
}

/// Draws the selected board as three columns stacked vertically, each note with its label.
pub fn board(view: &ViewModel) -> String {
    let mut out = String::new();

    if let Some(notice) = view.notice() {
        let _ = writeln!(out, "! {notice}");
    }

    let (Some(board), Some(columns)) = (view.board(), view.columns()) else {
        out.push_str(if view.selected().is_some() {
            "Loading board...\n"
        } else {
            "No board selected. Use `boards` and `select <n>`.\n"
        });
        return out;
    };

    let _ = writeln!(out, "== {} ==", board.name);
    if !board.description.is_empty() {
        let _ = writeln!(out, "{}", board.description);
    }

    for column in &columns {
        let _ = writeln!(
            out,
            "\n[{}] {}",
            column.category.as_str().to_uppercase(),
            column.notes.len()
        );
        for (index, note) in column.notes.iter().enumerate() {
            let mut lines = note.text.lines();
            let first = lines.next().unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<4} +{:<3} {first}  ({})",
                column.label(index),
                note.votes,
                note.author
            );
            for line in lines {
                let _ = writeln!(out, "{:10}{line}", "");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use std::time::Duration;

    use super::*;
    use crate::dto::{Board, Category, Note};

    fn summary(id: &str, name: &str, notes_count: i64) -> BoardSummary {
        BoardSummary {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            created_at: Utc::now(),
            notes_count,
        }
    }

    fn loaded_view() -> ViewModel {
        let mut view = ViewModel::new(Duration::from_secs(10));
        view.select("b1");
        let ticket = view.begin_fetch().unwrap();
        view.apply_fetch(
            &ticket,
            Board {
                id: "b1".to_string(),
                name: "Sprint 12".to_string(),
                description: String::new(),
                created_at: Utc::now(),
                notes: vec![
                    Note {
                        id: "n1".to_string(),
                        text: "Pairing".to_string(),
                        author: "Ivan".to_string(),
                        category: Category::Good,
                        votes: 1,
                        created_at: Utc::now(),
                    },
                    Note {
                        id: "n2".to_string(),
                        text: "Fast CI\n\n---\n\nGreen builds".to_string(),
                        author: "Olga & Ivan".to_string(),
                        category: Category::Good,
                        votes: 5,
                        created_at: Utc::now(),
                    },
                ],
            },
        );
        view
    }

    #[test]
    fn board_list_marks_selection() {
        let out = boards(&[summary("b1", "Sprint 12", 2), summary("b2", "Sprint 13", 0)], Some("b2"));

        assert_eq!(out, "   1. Sprint 12 (2 notes)\n*  2. Sprint 13 (0 notes)\n");
    }

    #[test]
    fn columns_show_labels_in_vote_order() {
        let out = board(&loaded_view());

        let fast = out.find("g1   +5   Fast CI").unwrap();
        let pairing = out.find("g2   +1   Pairing").unwrap();
        assert!(fast < pairing);
        assert!(out.contains("[BAD] 0"));
        assert!(out.contains("[IMPROVE] 0"));
        assert!(out.contains("Green builds"));
        assert!(out.contains("(Olga & Ivan)"));
    }

    #[test]
    fn notice_is_shown_above_board() {
        let mut view = loaded_view();
        view.report("Cannot merge note with itself");

        assert!(board(&view).starts_with("! Cannot merge note with itself\n== Sprint 12 =="));
    }

    #[test]
    fn placeholder_without_board() {
        let mut view = ViewModel::new(Duration::from_secs(10));
        assert!(board(&view).starts_with("No board selected"));

        view.select("b1");
        assert_eq!(board(&view), "Loading board...\n");
    }
}
