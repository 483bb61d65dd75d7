use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{self, ANONYMOUS};

fn anonymous() -> String {
    ANONYMOUS.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBoardRequest {
    /// Board name, must not be blank
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Note text, must not be blank
    pub text: String,
    /// One of `good`, `bad`, `improve`
    pub category: String,
    /// Note author
    #[serde(default = "anonymous")]
    pub author: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    /// New note text
    pub text: String,
    /// New note author
    #[serde(default = "anonymous")]
    pub author: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoteCategoryRequest {
    /// Target category
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MergeNotesRequest {
    /// Note folded into the target and then removed
    #[serde(rename = "sourceNoteId")]
    pub source_note_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    pub id: String,
    pub text: String,
    pub category: String,
    pub author: String,
    pub votes: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardSummaryResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub notes_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardDetailResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub notes: Vec<NoteResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteNoteResponse {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable failure reason
    pub detail: String,
}

impl From<models::Note> for NoteResponse {
    fn from(note: models::Note) -> Self {
        Self {
            id: note.id,
            text: note.text,
            category: note.category.to_string(),
            author: note.author,
            votes: note.votes,
            created_at: note.created_at,
        }
    }
}

impl From<models::BoardSummary> for BoardSummaryResponse {
    fn from(summary: models::BoardSummary) -> Self {
        Self {
            id: summary.board.id,
            name: summary.board.name,
            description: summary.board.description,
            created_at: summary.board.created_at,
            notes_count: summary.notes_count,
        }
    }
}

impl BoardDetailResponse {
    pub fn new(board: models::Board, notes: Vec<models::Note>) -> Self {
        Self {
            id: board.id,
            name: board.name,
            description: board.description,
            created_at: board.created_at,
            notes: notes.into_iter().map(NoteResponse::from).collect(),
        }
    }
}
