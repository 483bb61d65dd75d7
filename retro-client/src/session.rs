use tokio::sync::{Mutex, MutexGuard};

use std::{future::Future, time::Duration};

use crate::{
    api::BoardApi,
    dto::{ANONYMOUS, Category},
    error::ClientError,
    intent::Intent,
    view::{ActionKind, Applied, ViewModel},
};

/// Result of a user-triggered action.
#[derive(Debug)]
pub enum Outcome {
    /// The server accepted the change and the board was reloaded.
    Done,
    /// Nothing to do; no request was sent.
    Unchanged,
    /// A request of the same kind is still in flight.
    Busy,
    Failed(ClientError),
}

/// Result of a board fetch.
#[derive(Debug)]
pub enum Refresh {
    Applied,
    Discarded,
    NoBoard,
    Failed(ClientError),
}

impl From<Refresh> for Outcome {
    fn from(refresh: Refresh) -> Self {
        match refresh {
            Refresh::Applied | Refresh::Discarded => Self::Done,
            Refresh::NoBoard => Self::Unchanged,
            Refresh::Failed(e) => Self::Failed(e),
        }
    }
}

/// Mutation gateway plus the view model it keeps in sync.
///
/// Every mutation goes `Idle -> Requesting -> Reload -> Idle`, or reports the failure and
/// leaves the last fetched board in place. Nothing is applied locally before the server
/// confirms it.
pub struct Session<A> {
    api: A,
    view: Mutex<ViewModel>,
    user_name: Option<String>,
}

impl<A: BoardApi> Session<A> {
    pub fn new(api: A, user_name: Option<String>, notice_ttl: Duration) -> Self {
        Self {
            api,
            view: Mutex::new(ViewModel::new(notice_ttl)),
            user_name,
        }
    }

    pub async fn view(&self) -> MutexGuard<'_, ViewModel> {
        self.view.lock().await
    }

    #[cfg(test)]
    pub const fn api(&self) -> &A {
        &self.api
    }

    fn author(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .or_else(|| {
                self.user_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|author| !author.is_empty())
            })
            .unwrap_or(ANONYMOUS)
            .to_string()
    }

    async fn fail(&self, action: &str, err: ClientError) -> Outcome {
        tracing::warn!("{action} failed: {err}");
        self.view.lock().await.report(format!("{action} failed: {err}"));
        Outcome::Failed(err)
    }

    async fn require_board(&self, action: &str) -> Result<String, Outcome> {
        let selected = self.view.lock().await.selected().map(str::to_string);
        match selected {
            Some(board_id) => Ok(board_id),
            None => Err(self
                .fail(action, ClientError::Validation("No board selected".to_string()))
                .await),
        }
    }

    async fn mutate<T, F>(&self, kind: ActionKind, action: &str, request: F) -> Outcome
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        if !self.view.lock().await.try_begin(kind) {
            tracing::debug!("{action} ignored, previous request still in flight");
            return Outcome::Busy;
        }

        let outcome = match request.await {
            Ok(_) => {
                self.reload().await;
                Outcome::Done
            }
            Err(e) => self.fail(action, e).await,
        };

        self.view.lock().await.finish(kind);
        outcome
    }

    /// Fetches the selected board. Responses that are no longer current are dropped.
    pub async fn reload(&self) -> Refresh {
        let Some(ticket) = self.view.lock().await.begin_fetch() else {
            return Refresh::NoBoard;
        };

        let result = self.api.get_board(&ticket.board_id).await;

        let mut view = self.view.lock().await;
        match result {
            Ok(board) => match view.apply_fetch(&ticket, board) {
                Applied::Fresh => Refresh::Applied,
                Applied::Stale | Applied::OtherBoard => {
                    tracing::debug!(
                        "Discarding board response #{} for {}",
                        ticket.seq,
                        ticket.board_id
                    );
                    Refresh::Discarded
                }
            },
            Err(_) if !view.is_current(&ticket) => {
                tracing::debug!("Ignoring failed fetch #{} that is no longer current", ticket.seq);
                Refresh::Discarded
            }
            Err(e) => {
                tracing::warn!("Loading board {} failed: {e}", ticket.board_id);
                view.report(format!("Loading board failed: {e}"));
                Refresh::Failed(e)
            }
        }
    }

    pub async fn refresh_boards(&self) -> Outcome {
        match self.api.list_boards().await {
            Ok(boards) => {
                tracing::info!("Loaded {} boards", boards.len());
                self.view.lock().await.set_boards(boards);
                Outcome::Done
            }
            Err(e) => self.fail("Loading boards", e).await,
        }
    }

    pub async fn select_board(&self, board_id: &str) -> Refresh {
        self.view.lock().await.select(board_id);
        self.reload().await
    }

    pub async fn create_board(&self, name: &str, description: &str) -> Outcome {
        let name = name.trim();
        if name.is_empty() {
            return self
                .fail(
                    "Creating board",
                    ClientError::Validation("Board name is required".to_string()),
                )
                .await;
        }
        if !self.view.lock().await.try_begin(ActionKind::CreateBoard) {
            return Outcome::Busy;
        }

        let outcome = match self.api.create_board(name, description.trim()).await {
            Ok(board) => {
                tracing::info!("Board created: {}", board.id);
                self.refresh_boards().await;
                self.select_board(&board.id).await;
                Outcome::Done
            }
            Err(e) => self.fail("Creating board", e).await,
        };

        self.view.lock().await.finish(ActionKind::CreateBoard);
        outcome
    }

    pub async fn create_note(&self, category: Category, text: &str, author: Option<&str>) -> Outcome {
        const ACTION: &str = "Adding note";

        let text = text.trim();
        if text.is_empty() {
            return self
                .fail(ACTION, ClientError::Validation("Note text is required".to_string()))
                .await;
        }
        let board_id = match self.require_board(ACTION).await {
            Ok(board_id) => board_id,
            Err(outcome) => return outcome,
        };
        let author = self.author(author);

        self.mutate(
            ActionKind::CreateNote,
            ACTION,
            self.api.create_note(&board_id, text, category, &author),
        )
        .await
    }

    pub async fn edit_note(&self, note_id: &str, text: &str, author: Option<&str>) -> Outcome {
        const ACTION: &str = "Editing note";

        let text = text.trim();
        if text.is_empty() {
            return self
                .fail(ACTION, ClientError::Validation("Note text cannot be empty".to_string()))
                .await;
        }
        let board_id = match self.require_board(ACTION).await {
            Ok(board_id) => board_id,
            Err(outcome) => return outcome,
        };
        let author = self.author(author);

        self.mutate(
            ActionKind::EditNote,
            ACTION,
            self.api.update_note(&board_id, note_id, text, &author),
        )
        .await
    }

    pub async fn delete_note(&self, note_id: &str) -> Outcome {
        const ACTION: &str = "Deleting note";

        let board_id = match self.require_board(ACTION).await {
            Ok(board_id) => board_id,
            Err(outcome) => return outcome,
        };

        self.mutate(
            ActionKind::DeleteNote,
            ACTION,
            self.api.delete_note(&board_id, note_id),
        )
        .await
    }

    pub async fn vote(&self, note_id: &str) -> Outcome {
        const ACTION: &str = "Voting";

        let board_id = match self.require_board(ACTION).await {
            Ok(board_id) => board_id,
            Err(outcome) => return outcome,
        };

        self.mutate(ActionKind::Vote, ACTION, self.api.vote_note(&board_id, note_id))
            .await
    }

    /// Moves a note to `category`. Dropping a note onto its own column sends nothing.
    pub async fn move_note(&self, note_id: &str, category: Category) -> Outcome {
        const ACTION: &str = "Moving note";

        let board_id = match self.require_board(ACTION).await {
            Ok(board_id) => board_id,
            Err(outcome) => return outcome,
        };

        let current = self
            .view
            .lock()
            .await
            .board()
            .and_then(|board| board.note(note_id))
            .map(|note| note.category);
        if current == Some(category) {
            tracing::debug!("Note {note_id} already in {category}");
            return Outcome::Unchanged;
        }

        self.mutate(
            ActionKind::Move,
            ACTION,
            self.api.move_note(&board_id, note_id, category),
        )
        .await
    }

    /// Merges `source_id` into `target_id`. The outcome is whatever the server reports.
    pub async fn merge_notes(&self, source_id: &str, target_id: &str) -> Outcome {
        const ACTION: &str = "Merging notes";

        if source_id == target_id {
            return self
                .fail(
                    ACTION,
                    ClientError::Conflict("Cannot merge a note into itself".to_string()),
                )
                .await;
        }
        let board_id = match self.require_board(ACTION).await {
            Ok(board_id) => board_id,
            Err(outcome) => return outcome,
        };

        self.mutate(
            ActionKind::Merge,
            ACTION,
            self.api.merge_notes(&board_id, target_id, source_id),
        )
        .await
    }

    pub async fn dispatch(&self, intent: Intent) -> Outcome {
        match intent {
            Intent::SelectBoardRequested { board_id } => self.select_board(&board_id).await.into(),
            Intent::CreateBoardRequested { name, description } => {
                self.create_board(&name, &description).await
            }
            Intent::CreateNoteRequested {
                category,
                text,
                author,
            } => self.create_note(category, &text, author.as_deref()).await,
            Intent::EditNoteRequested {
                note_id,
                text,
                author,
            } => self.edit_note(&note_id, &text, author.as_deref()).await,
            Intent::DeleteNoteRequested { note_id } => self.delete_note(&note_id).await,
            Intent::VoteRequested { note_id } => self.vote(&note_id).await,
            Intent::MoveNoteRequested { note_id, category } => {
                self.move_note(&note_id, category).await
            }
            Intent::MergeNotesRequested {
                source_note_id,
                target_note_id,
            } => self.merge_notes(&source_note_id, &target_note_id).await,
            Intent::RefreshRequested => self.reload().await.into(),
        }
    }
}
