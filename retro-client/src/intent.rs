use crate::dto::Category;

/// User intents produced by the interaction surface, independent of how they were gestured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectBoardRequested {
        board_id: String,
    },
    CreateBoardRequested {
        name: String,
        description: String,
    },
    CreateNoteRequested {
        category: Category,
        text: String,
        author: Option<String>,
    },
    EditNoteRequested {
        note_id: String,
        text: String,
        author: Option<String>,
    },
    DeleteNoteRequested {
        note_id: String,
    },
    VoteRequested {
        note_id: String,
    },
    MoveNoteRequested {
        note_id: String,
        category: Category,
    },
    MergeNotesRequested {
        source_note_id: String,
        target_note_id: String,
    },
    RefreshRequested,
}
