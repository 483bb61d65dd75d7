use crate::dto::{Board, Category, Note};

#[derive(Debug)]
pub struct Column<'a> {
    pub category: Category,
    pub notes: Vec<&'a Note>,
}

impl Column<'_> {
    /// Label shown next to the note at `index` (`g1`, `b2`, ...).
    pub fn label(&self, index: usize) -> String {
        format!("{}{}", self.category.initial(), index + 1)
    }
}

/// Groups a board's notes by category, most voted first.
///
/// `sort_by` is stable, so notes with equal votes keep the order the server returned.
pub fn columns(board: &Board) -> [Column<'_>; 3] {
    Category::ALL.map(|category| {
        let mut notes: Vec<&Note> = board
            .notes
            .iter()
            .filter(|note| note.category == category)
            .collect();
        notes.sort_by(|a, b| b.votes.cmp(&a.votes));
        Column { category, notes }
    })
}
