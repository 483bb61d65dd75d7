mod embedded;
mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use crate::models::{Board, BoardSummary, Category, Note};

#[derive(Debug)]
pub enum MergeOutcome {
    Merged(Note),
    SourceMissing,
    TargetMissing,
}

/// Board store backend selected at startup.
pub enum Repository {
    Postgres(PgRepository),
    Memory(MemoryRepository),
}

impl Repository {
    pub async fn list_boards(&self) -> Result<Vec<BoardSummary>, tokio_postgres::Error> {
        match self {
            Self::Postgres(repo) => repo.list_boards().await,
            Self::Memory(repo) => Ok(repo.list_boards()),
        }
    }

    pub async fn create_board(
        &mut self,
        id: &str,
        name: &str,
        description: &str,
    ) -> Result<Board, tokio_postgres::Error> {
        match self {
            Self::Postgres(repo) => repo.create_board(id, name, description).await,
            Self::Memory(repo) => Ok(repo.create_board(id, name, description)),
        }
    }

    pub async fn get_board(&self, id: &str) -> Result<Option<Board>, tokio_postgres::Error> {
        match self {
            Self::Postgres(repo) => repo.get_board(id).await,
            Self::Memory(repo) => Ok(repo.get_board(id)),
        }
    }

    pub async fn list_notes(&self, board_id: &str) -> Result<Vec<Note>, tokio_postgres::Error> {
        match self {
            Self::Postgres(repo) => repo.list_notes(board_id).await,
            Self::Memory(repo) => Ok(repo.list_notes(board_id)),
        }
    }

    pub async fn create_note(
        &mut self,
        id: &str,
        board_id: &str,
        text: &str,
        category: Category,
        author: &str,
    ) -> Result<Note, tokio_postgres::Error> {
        match self {
            Self::Postgres(repo) => repo.create_note(id, board_id, text, category, author).await,
            Self::Memory(repo) => Ok(repo.create_note(id, board_id, text, category, author)),
        }
    }

    pub async fn update_note(
        &mut self,
        board_id: &str,
        note_id: &str,
        text: &str,
        author: &str,
    ) -> Result<Option<Note>, tokio_postgres::Error> {
        match self {
            Self::Postgres(repo) => repo.update_note(board_id, note_id, text, author).await,
            Self::Memory(repo) => Ok(repo.update_note(board_id, note_id, text, author)),
        }
    }

    pub async fn delete_note(
        &mut self,
        board_id: &str,
        note_id: &str,
    ) -> Result<bool, tokio_postgres::Error> {
        match self {
            Self::Postgres(repo) => repo.delete_note(board_id, note_id).await,
            Self::Memory(repo) => Ok(repo.delete_note(board_id, note_id)),
        }
    }

    pub async fn vote_note(
        &mut self,
        board_id: &str,
        note_id: &str,
    ) -> Result<Option<Note>, tokio_postgres::Error> {
        match self {
            Self::Postgres(repo) => repo.vote_note(board_id, note_id).await,
            Self::Memory(repo) => Ok(repo.vote_note(board_id, note_id)),
        }
    }

    pub async fn set_category(
        &mut self,
        board_id: &str,
        note_id: &str,
        category: Category,
    ) -> Result<Option<Note>, tokio_postgres::Error> {
        match self {
            Self::Postgres(repo) => repo.set_category(board_id, note_id, category).await,
            Self::Memory(repo) => Ok(repo.set_category(board_id, note_id, category)),
        }
    }

    pub async fn merge_notes(
        &mut self,
        board_id: &str,
        target_id: &str,
        source_id: &str,
    ) -> Result<MergeOutcome, tokio_postgres::Error> {
        match self {
            Self::Postgres(repo) => repo.merge_notes(board_id, target_id, source_id).await,
            Self::Memory(repo) => Ok(repo.merge_notes(board_id, target_id, source_id)),
        }
    }
}
