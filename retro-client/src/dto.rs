use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Good,
    Bad,
    Improve,
}

impl Category {
    /// Column order on screen.
    pub const ALL: [Self; 3] = [Self::Good, Self::Bad, Self::Improve];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
            Self::Improve => "improve",
        }
    }

    /// Single-letter prefix used for note labels (`g1`, `b2`, `i3`).
    pub const fn initial(self) -> char {
        match self {
            Self::Good => 'g',
            Self::Bad => 'b',
            Self::Improve => 'i',
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "good" | "g" => Ok(Self::Good),
            "bad" | "b" => Ok(Self::Bad),
            "improve" | "i" => Ok(Self::Improve),
            _ => Err(format!("unknown category '{s}', expected good, bad or improve")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notes_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Board {
    pub fn note(&self, note_id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == note_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub author: String,
    pub category: Category,
    pub votes: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBoardRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateNoteRequest<'a> {
    pub text: &'a str,
    pub category: Category,
    pub author: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateNoteRequest<'a> {
    pub text: &'a str,
    pub author: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateNoteCategoryRequest {
    pub category: Category,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeNotesRequest<'a> {
    #[serde(rename = "sourceNoteId")]
    pub source_note_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteNoteResponse {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "message", alias = "error")]
    pub detail: String,
}
