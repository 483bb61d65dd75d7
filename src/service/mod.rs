use crate::{
    dto::{
        BoardDetailResponse, BoardSummaryResponse, CreateBoardRequest, CreateNoteRequest,
        DeleteNoteResponse, MergeNotesRequest, NoteResponse, UpdateNoteCategoryRequest,
        UpdateNoteRequest,
    },
    error::ServiceError,
    models::{Category, normalize_author},
    repository::{MergeOutcome, Repository},
};

use std::sync::Arc;

use uuid::Uuid;

const BOARD_NOT_FOUND: &str = "Board not found";
const NOTE_NOT_FOUND: &str = "Note not found";

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn parse_category(raw: &str) -> Result<Category, ServiceError> {
    raw.parse()
        .map_err(|_| ServiceError::Validation("Invalid category".to_string()))
}

#[derive(Clone)]
pub struct BoardService {
    repo: Arc<tokio::sync::Mutex<Repository>>,
}

impl BoardService {
    pub const fn new(repo: Arc<tokio::sync::Mutex<Repository>>) -> Self {
        Self { repo }
    }

    pub async fn list_boards(&self) -> Result<Vec<BoardSummaryResponse>, ServiceError> {
        let boards = self.repo.lock().await.list_boards().await?;
        tracing::info!("Listing {} boards", boards.len());

        Ok(boards.into_iter().map(BoardSummaryResponse::from).collect())
    }

    pub async fn create_board(
        &self,
        request: CreateBoardRequest,
    ) -> Result<BoardDetailResponse, ServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("Name is required".to_string()));
        }

        let board = self
            .repo
            .lock()
            .await
            .create_board(&new_id(), name, request.description.trim())
            .await?;
        tracing::info!("Board created: {} ({})", board.name, board.id);

        Ok(BoardDetailResponse::new(board, Vec::new()))
    }

    pub async fn get_board(&self, board_id: &str) -> Result<BoardDetailResponse, ServiceError> {
        let repo = self.repo.lock().await;
        let board = repo
            .get_board(board_id)
            .await?
            .ok_or(ServiceError::NotFound(BOARD_NOT_FOUND))?;
        let notes = repo.list_notes(board_id).await?;

        Ok(BoardDetailResponse::new(board, notes))
    }

    pub async fn create_note(
        &self,
        board_id: &str,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        let mut repo = self.repo.lock().await;
        if repo.get_board(board_id).await?.is_none() {
            return Err(ServiceError::NotFound(BOARD_NOT_FOUND));
        }

        let category = parse_category(&request.category)?;
        let text = request.text.trim();
        if text.is_empty() {
            return Err(ServiceError::Validation("Text is required".to_string()));
        }

        let note = repo
            .create_note(
                &new_id(),
                board_id,
                text,
                category,
                &normalize_author(&request.author),
            )
            .await?;
        tracing::info!("Note {} added to board {} under {}", note.id, board_id, category);

        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        board_id: &str,
        note_id: &str,
        request: UpdateNoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(ServiceError::Validation("Text cannot be empty".to_string()));
        }

        let note = self
            .repo
            .lock()
            .await
            .update_note(board_id, note_id, text, &normalize_author(&request.author))
            .await?
            .ok_or(ServiceError::NotFound(NOTE_NOT_FOUND))?;
        tracing::info!("Note {} updated", note.id);

        Ok(note.into())
    }

    pub async fn delete_note(
        &self,
        board_id: &str,
        note_id: &str,
    ) -> Result<DeleteNoteResponse, ServiceError> {
        let mut repo = self.repo.lock().await;
        if repo.get_board(board_id).await?.is_none() {
            return Err(ServiceError::NotFound(BOARD_NOT_FOUND));
        }
        if !repo.delete_note(board_id, note_id).await? {
            return Err(ServiceError::NotFound(NOTE_NOT_FOUND));
        }
        tracing::info!("Note {} deleted from board {}", note_id, board_id);

        Ok(DeleteNoteResponse {
            message: "Note deleted successfully".to_string(),
            id: note_id.to_string(),
        })
    }

    pub async fn vote_note(
        &self,
        board_id: &str,
        note_id: &str,
    ) -> Result<NoteResponse, ServiceError> {
        let note = self
            .repo
            .lock()
            .await
            .vote_note(board_id, note_id)
            .await?
            .ok_or(ServiceError::NotFound(NOTE_NOT_FOUND))?;
        tracing::info!("Vote added to note {}, now {}", note.id, note.votes);

        Ok(note.into())
    }

    pub async fn update_category(
        &self,
        board_id: &str,
        note_id: &str,
        request: UpdateNoteCategoryRequest,
    ) -> Result<NoteResponse, ServiceError> {
        let category = parse_category(&request.category)?;

        let note = self
            .repo
            .lock()
            .await
            .set_category(board_id, note_id, category)
            .await?
            .ok_or(ServiceError::NotFound(NOTE_NOT_FOUND))?;
        tracing::info!("Note {} moved to {}", note.id, category);

        Ok(note.into())
    }

    pub async fn merge_notes(
        &self,
        board_id: &str,
        target_id: &str,
        request: MergeNotesRequest,
    ) -> Result<NoteResponse, ServiceError> {
        let source_id = request.source_note_id;
        if source_id == target_id {
            return Err(ServiceError::Conflict("Cannot merge note with itself"));
        }

        let outcome = self
            .repo
            .lock()
            .await
            .merge_notes(board_id, target_id, &source_id)
            .await?;

        match outcome {
            MergeOutcome::Merged(note) => {
                tracing::info!(
                    "Note {} merged into {}, votes now {}",
                    source_id,
                    note.id,
                    note.votes
                );
                Ok(note.into())
            }
            MergeOutcome::SourceMissing => Err(ServiceError::NotFound("Source note not found")),
            MergeOutcome::TargetMissing => Err(ServiceError::NotFound("Target note not found")),
        }
    }

    /// Creates a sample board when the store holds none.
    pub async fn seed_demo_data(&self) -> Result<(), ServiceError> {
        let mut repo = self.repo.lock().await;
        if !repo.list_boards().await?.is_empty() {
            tracing::info!("Demo data already present");
            return Ok(());
        }

        let board = repo
            .create_board(&new_id(), "Demo retro", "Sample board for trying things out")
            .await?;

        let notes = [
            ("Great communication inside the team", Category::Good, "Alexey", 0),
            ("Bugs take too long to resolve", Category::Bad, "Maria", 1),
            ("Introduce a code review process", Category::Improve, "Sergey", 0),
            ("Well organised meetings", Category::Good, "Anna", 2),
            ("Set up a CI/CD pipeline", Category::Improve, "Igor", 1),
        ];
        for (text, category, author, votes) in notes {
            let note = repo
                .create_note(&new_id(), &board.id, text, category, author)
                .await?;
            for _ in 0..votes {
                repo.vote_note(&board.id, &note.id).await?;
            }
        }

        tracing::info!("Demo board created: {}", board.id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;

    fn service() -> BoardService {
        BoardService::new(Arc::new(tokio::sync::Mutex::new(Repository::Memory(
            MemoryRepository::new(),
        ))))
    }

    async fn board(service: &BoardService) -> String {
        service
            .create_board(CreateBoardRequest {
                name: "Sprint 12".to_string(),
                description: String::new(),
            })
            .await
            .unwrap()
            .id
    }

    async fn note(service: &BoardService, board_id: &str, text: &str, category: &str) -> String {
        service
            .create_note(
                board_id,
                CreateNoteRequest {
                    text: text.to_string(),
                    category: category.to_string(),
                    author: "Anna".to_string(),
                },
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn blank_board_name_is_rejected() {
        let service = service();
        let err = service
            .create_board(CreateBoardRequest {
                name: "   ".to_string(),
                description: "x".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(service.list_boards().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_note_starts_without_votes_and_trims_input() {
        let service = service();
        let board_id = board(&service).await;

        let created = service
            .create_note(
                &board_id,
                CreateNoteRequest {
                    text: "  Pairing helped ".to_string(),
                    category: "good".to_string(),
                    author: " ".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.text, "Pairing helped");
        assert_eq!(created.author, "Anonymous");
        assert_eq!(created.votes, 0);
        assert_eq!(service.list_boards().await.unwrap()[0].notes_count, 1);
    }

    #[tokio::test]
    async fn note_creation_validates_board_category_and_text() {
        let service = service();
        let board_id = board(&service).await;

        let missing_board = service
            .create_note(
                "nope",
                CreateNoteRequest {
                    text: "x".to_string(),
                    category: "good".to_string(),
                    author: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(missing_board, ServiceError::NotFound(BOARD_NOT_FOUND)));

        let bad_category = service
            .create_note(
                &board_id,
                CreateNoteRequest {
                    text: "x".to_string(),
                    category: "meh".to_string(),
                    author: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(bad_category, ServiceError::Validation(_)));

        let empty_text = service
            .create_note(
                &board_id,
                CreateNoteRequest {
                    text: "\n".to_string(),
                    category: "bad".to_string(),
                    author: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(empty_text, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn voting_twice_adds_two() {
        let service = service();
        let board_id = board(&service).await;
        let n1 = note(&service, &board_id, "Standups were short", "good").await;

        service.vote_note(&board_id, &n1).await.unwrap();
        let voted = service.vote_note(&board_id, &n1).await.unwrap();

        assert_eq!(voted.votes, 2);
    }

    #[tokio::test]
    async fn concurrent_votes_are_all_counted() {
        let service = service();
        let board_id = board(&service).await;
        let n1 = note(&service, &board_id, "Demo day", "good").await;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let service = service.clone();
            let board_id = board_id.clone();
            let n1 = n1.clone();
            handles.push(tokio::spawn(async move {
                service.vote_note(&board_id, &n1).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let board = service.get_board(&board_id).await.unwrap();
        assert_eq!(board.notes[0].votes, 20);
    }

    #[tokio::test]
    async fn recategorize_moves_note_between_columns() {
        let service = service();
        let board_id = board(&service).await;
        let n1 = note(&service, &board_id, "Release slipped", "good").await;

        service
            .update_category(
                &board_id,
                &n1,
                UpdateNoteCategoryRequest {
                    category: "bad".to_string(),
                },
            )
            .await
            .unwrap();

        let board = service.get_board(&board_id).await.unwrap();
        let moved = board.notes.iter().find(|n| n.id == n1).unwrap();
        assert_eq!(moved.category, "bad");
        assert!(!board.notes.iter().any(|n| n.id == n1 && n.category == "good"));
    }

    #[tokio::test]
    async fn invalid_category_leaves_note_untouched() {
        let service = service();
        let board_id = board(&service).await;
        let n1 = note(&service, &board_id, "Retro notes", "improve").await;

        let err = service
            .update_category(
                &board_id,
                &n1,
                UpdateNoteCategoryRequest {
                    category: "later".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        let board = service.get_board(&board_id).await.unwrap();
        assert_eq!(board.notes[0].category, "improve");
    }

    #[tokio::test]
    async fn merge_removes_source_and_folds_it_into_target() {
        let service = service();
        let board_id = board(&service).await;
        let n1 = note(&service, &board_id, "Slow builds", "bad").await;
        let n2 = note(&service, &board_id, "CI queue", "bad").await;
        service.vote_note(&board_id, &n1).await.unwrap();
        service.vote_note(&board_id, &n2).await.unwrap();
        service.vote_note(&board_id, &n2).await.unwrap();

        let merged = service
            .merge_notes(
                &board_id,
                &n1,
                MergeNotesRequest {
                    source_note_id: n2.clone(),
                },
            )
            .await
            .unwrap();

        assert_eq!(merged.id, n1);
        assert_eq!(merged.votes, 3);
        assert_eq!(merged.text, "Slow builds\n\n---\n\nCI queue");

        let board = service.get_board(&board_id).await.unwrap();
        assert_eq!(board.notes.len(), 1);
        assert!(board.notes.iter().all(|n| n.id != n2));
    }

    #[tokio::test]
    async fn merge_rejects_self_and_missing_notes() {
        let service = service();
        let board_id = board(&service).await;
        let n1 = note(&service, &board_id, "Alone", "good").await;

        let self_merge = service
            .merge_notes(
                &board_id,
                &n1,
                MergeNotesRequest {
                    source_note_id: n1.clone(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(self_merge, ServiceError::Conflict(_)));

        let missing_source = service
            .merge_notes(
                &board_id,
                &n1,
                MergeNotesRequest {
                    source_note_id: "ghost".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            missing_source,
            ServiceError::NotFound("Source note not found")
        ));

        let missing_target = service
            .merge_notes(
                &board_id,
                "ghost",
                MergeNotesRequest {
                    source_note_id: n1.clone(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            missing_target,
            ServiceError::NotFound("Target note not found")
        ));

        assert_eq!(service.get_board(&board_id).await.unwrap().notes.len(), 1);
    }

    #[tokio::test]
    async fn notes_are_scoped_to_their_board() {
        let service = service();
        let first = board(&service).await;
        let second = board(&service).await;
        let n1 = note(&service, &first, "Scoped", "good").await;

        let err = service.vote_note(&second, &n1).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(NOTE_NOT_FOUND)));

        let err = service.delete_note(&second, &n1).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(NOTE_NOT_FOUND)));

        let err = service.delete_note("missing", &n1).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(BOARD_NOT_FOUND)));
    }

    #[tokio::test]
    async fn edit_and_delete_note() {
        let service = service();
        let board_id = board(&service).await;
        let n1 = note(&service, &board_id, "Typo", "good").await;

        let edited = service
            .update_note(
                &board_id,
                &n1,
                UpdateNoteRequest {
                    text: "Fixed".to_string(),
                    author: "Maria".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.text, "Fixed");
        assert_eq!(edited.author, "Maria");

        let empty = service
            .update_note(
                &board_id,
                &n1,
                UpdateNoteRequest {
                    text: " ".to_string(),
                    author: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(empty, ServiceError::Validation(_)));

        let deleted = service.delete_note(&board_id, &n1).await.unwrap();
        assert_eq!(deleted.id, n1);
        assert!(service.get_board(&board_id).await.unwrap().notes.is_empty());
    }

    #[tokio::test]
    async fn demo_data_is_seeded_once() {
        let service = service();
        service.seed_demo_data().await.unwrap();
        service.seed_demo_data().await.unwrap();

        let boards = service.list_boards().await.unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].notes_count, 5);

        let board = service.get_board(&boards[0].id).await.unwrap();
        let total_votes: i32 = board.notes.iter().map(|n| n.votes).sum();
        assert_eq!(total_votes, 4);
    }
}
