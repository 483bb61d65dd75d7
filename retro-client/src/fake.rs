use chrono::Utc;

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    api::BoardApi,
    dto::{ANONYMOUS, Board, BoardSummary, Category, Note},
    error::ClientError,
};

#[derive(Default)]
struct State {
    boards: Vec<Board>,
    next_id: u64,
}

impl State {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn board(&mut self, board_id: &str) -> Result<&mut Board, ClientError> {
        self.boards
            .iter_mut()
            .find(|board| board.id == board_id)
            .ok_or_else(|| ClientError::NotFound("Board not found".to_string()))
    }

    fn note(&mut self, board_id: &str, note_id: &str) -> Result<&mut Note, ClientError> {
        self.board(board_id)?
            .notes
            .iter_mut()
            .find(|note| note.id == note_id)
            .ok_or_else(|| ClientError::NotFound("Note not found".to_string()))
    }
}

/// In-process stand-in for the board server. Each call yields once so overlapping
/// requests interleave, and every call is counted.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
    calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn add_board(&self, name: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.id("b");
        state.boards.push(Board {
            id: id.clone(),
            name: name.to_string(),
            description: String::new(),
            created_at: Utc::now(),
            notes: Vec::new(),
        });
        id
    }

    async fn request(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }
}

impl BoardApi for FakeApi {
    async fn list_boards(&self) -> Result<Vec<BoardSummary>, ClientError> {
        self.request().await;
        let state = self.state.lock().unwrap();
        Ok(state
            .boards
            .iter()
            .map(|board| BoardSummary {
                id: board.id.clone(),
                name: board.name.clone(),
                description: board.description.clone(),
                created_at: board.created_at,
                notes_count: board.notes.len().try_into().unwrap(),
            })
            .collect())
    }

    async fn create_board(&self, name: &str, description: &str) -> Result<Board, ClientError> {
        self.request().await;
        let mut state = self.state.lock().unwrap();
        let board = Board {
            id: state.id("b"),
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            notes: Vec::new(),
        };
        state.boards.push(board.clone());
        Ok(board)
    }

    async fn get_board(&self, board_id: &str) -> Result<Board, ClientError> {
        self.request().await;
        let mut state = self.state.lock().unwrap();
        state.board(board_id).map(|board| board.clone())
    }

    async fn create_note(
        &self,
        board_id: &str,
        text: &str,
        category: Category,
        author: &str,
    ) -> Result<Note, ClientError> {
        self.request().await;
        let mut state = self.state.lock().unwrap();
        let id = state.id("n");
        let note = Note {
            id,
            text: text.to_string(),
            author: author.to_string(),
            category,
            votes: 0,
            created_at: Utc::now(),
        };
        state.board(board_id)?.notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(
        &self,
        board_id: &str,
        note_id: &str,
        text: &str,
        author: &str,
    ) -> Result<Note, ClientError> {
        self.request().await;
        let mut state = self.state.lock().unwrap();
        let note = state.note(board_id, note_id)?;
        note.text = text.to_string();
        note.author = author.to_string();
        Ok(note.clone())
    }

    async fn delete_note(&self, board_id: &str, note_id: &str) -> Result<(), ClientError> {
        self.request().await;
        let mut state = self.state.lock().unwrap();
        let board = state.board(board_id)?;
        let before = board.notes.len();
        board.notes.retain(|note| note.id != note_id);
        if board.notes.len() == before {
            return Err(ClientError::NotFound("Note not found".to_string()));
        }
        Ok(())
    }

    async fn vote_note(&self, board_id: &str, note_id: &str) -> Result<Note, ClientError> {
        self.request().await;
        let mut state = self.state.lock().unwrap();
        let note = state.note(board_id, note_id)?;
        note.votes += 1;
        Ok(note.clone())
    }

    async fn move_note(
        &self,
        board_id: &str,
        note_id: &str,
        category: Category,
    ) -> Result<Note, ClientError> {
        self.request().await;
        let mut state = self.state.lock().unwrap();
        let note = state.note(board_id, note_id)?;
        note.category = category;
        Ok(note.clone())
    }

    async fn merge_notes(
        &self,
        board_id: &str,
        target_id: &str,
        source_id: &str,
    ) -> Result<Note, ClientError> {
        self.request().await;
        if target_id == source_id {
            return Err(ClientError::Conflict(
                "Cannot merge note with itself".to_string(),
            ));
        }
        let mut state = self.state.lock().unwrap();
        let source = state.note(board_id, source_id)?.clone();
        let target = state.note(board_id, target_id)?;
        target.text = format!("{}\n\n---\n\n{}", target.text, source.text);
        target.votes += source.votes;
        if target.author == ANONYMOUS {
            target.author = source.author;
        }
        let merged = target.clone();
        state
            .board(board_id)?
            .notes
            .retain(|note| note.id != source_id);
        Ok(merged)
    }
}
