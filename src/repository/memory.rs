use chrono::Utc;

use super::MergeOutcome;
use crate::models::{Board, BoardSummary, Category, Note};

/// Process-local store. Vectors keep insertion order, which is the order notes are served in.
#[derive(Default)]
pub struct MemoryRepository {
    boards: Vec<Board>,
    notes: Vec<Note>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn note_mut(&mut self, board_id: &str, note_id: &str) -> Option<&mut Note> {
        self.notes
            .iter_mut()
            .find(|note| note.id == note_id && note.board_id == board_id)
    }

    pub fn list_boards(&self) -> Vec<BoardSummary> {
        self.boards
            .iter()
            .map(|board| BoardSummary {
                board: board.clone(),
                notes_count: self
                    .notes
                    .iter()
                    .filter(|note| note.board_id == board.id)
                    .count()
                    .try_into()
                    .unwrap_or(i64::MAX),
            })
            .collect()
    }

    pub fn create_board(&mut self, id: &str, name: &str, description: &str) -> Board {
        let board = Board {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        self.boards.push(board.clone());
        board
    }

    pub fn get_board(&self, id: &str) -> Option<Board> {
        self.boards.iter().find(|board| board.id == id).cloned()
    }

    pub fn list_notes(&self, board_id: &str) -> Vec<Note> {
        self.notes
            .iter()
            .filter(|note| note.board_id == board_id)
            .cloned()
            .collect()
    }

    pub fn create_note(
        &mut self,
        id: &str,
        board_id: &str,
        text: &str,
        category: Category,
        author: &str,
    ) -> Note {
        let note = Note {
            id: id.to_string(),
            board_id: board_id.to_string(),
            text: text.to_string(),
            author: author.to_string(),
            category,
            votes: 0,
            created_at: Utc::now(),
        };
        self.notes.push(note.clone());
        note
    }

    pub fn update_note(
        &mut self,
        board_id: &str,
        note_id: &str,
        text: &str,
        author: &str,
    ) -> Option<Note> {
        let note = self.note_mut(board_id, note_id)?;
        note.text = text.to_string();
        note.author = author.to_string();
        Some(note.clone())
    }

    pub fn delete_note(&mut self, board_id: &str, note_id: &str) -> bool {
        let before = self.notes.len();
        self.notes
            .retain(|note| !(note.id == note_id && note.board_id == board_id));
        self.notes.len() != before
    }

    pub fn vote_note(&mut self, board_id: &str, note_id: &str) -> Option<Note> {
        let note = self.note_mut(board_id, note_id)?;
        note.votes = note.votes.saturating_add(1);
        Some(note.clone())
    }

    pub fn set_category(
        &mut self,
        board_id: &str,
        note_id: &str,
        category: Category,
    ) -> Option<Note> {
        let note = self.note_mut(board_id, note_id)?;
        note.category = category;
        Some(note.clone())
    }

    pub fn merge_notes(&mut self, board_id: &str, target_id: &str, source_id: &str) -> MergeOutcome {
        let position = |id: &str| {
            self.notes
                .iter()
                .position(|note| note.id == id && note.board_id == board_id)
        };
        let Some(source_idx) = position(source_id) else {
            return MergeOutcome::SourceMissing;
        };
        let Some(target_idx) = position(target_id) else {
            return MergeOutcome::TargetMissing;
        };

        let source = self.notes[source_idx].clone();
        let target = &mut self.notes[target_idx];
        target.absorb(&source);
        let merged = target.clone();
        self.notes.remove(source_idx);

        MergeOutcome::Merged(merged)
    }
}
