use serde::de::DeserializeOwned;

use std::{future::Future, time::Duration};

use crate::{
    dto::{
        Board, BoardSummary, Category, CreateBoardRequest, CreateNoteRequest, DeleteNoteResponse,
        ErrorResponse, MergeNotesRequest, Note, UpdateNoteCategoryRequest, UpdateNoteRequest,
    },
    error::ClientError,
};

/// Board store as seen from the client. Every call is a single request.
pub trait BoardApi: Send + Sync {
    fn list_boards(&self) -> impl Future<Output = Result<Vec<BoardSummary>, ClientError>> + Send;

    fn create_board(
        &self,
        name: &str,
        description: &str,
    ) -> impl Future<Output = Result<Board, ClientError>> + Send;

    fn get_board(&self, board_id: &str) -> impl Future<Output = Result<Board, ClientError>> + Send;

    fn create_note(
        &self,
        board_id: &str,
        text: &str,
        category: Category,
        author: &str,
    ) -> impl Future<Output = Result<Note, ClientError>> + Send;

    fn update_note(
        &self,
        board_id: &str,
        note_id: &str,
        text: &str,
        author: &str,
    ) -> impl Future<Output = Result<Note, ClientError>> + Send;

    fn delete_note(
        &self,
        board_id: &str,
        note_id: &str,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Sends a vote signal. The server owns the counter.
    fn vote_note(
        &self,
        board_id: &str,
        note_id: &str,
    ) -> impl Future<Output = Result<Note, ClientError>> + Send;

    fn move_note(
        &self,
        board_id: &str,
        note_id: &str,
        category: Category,
    ) -> impl Future<Output = Result<Note, ClientError>> + Send;

    /// Folds `source_id` into `target_id`; the server removes the source.
    fn merge_notes(
        &self,
        board_id: &str,
        target_id: &str,
        source_id: &str,
    ) -> impl Future<Output = Result<Note, ClientError>> + Send;
}

pub struct HttpBoardApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBoardApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn boards_url(&self) -> String {
        format!("{}/api/boards", self.base_url)
    }

    fn board_url(&self, board_id: &str) -> String {
        format!("{}/api/boards/{}", self.base_url, board_id)
    }

    fn note_url(&self, board_id: &str, note_id: &str) -> String {
        format!("{}/api/boards/{}/notes/{}", self.base_url, board_id, note_id)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.detail,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    tracing::debug!("Request failed with {}: {}", status, message);

    Err(ClientError::from_status(status.as_u16(), message))
}

impl BoardApi for HttpBoardApi {
    async fn list_boards(&self) -> Result<Vec<BoardSummary>, ClientError> {
        let response = self.client.get(self.boards_url()).send().await?;
        decode(response).await
    }

    async fn create_board(&self, name: &str, description: &str) -> Result<Board, ClientError> {
        let response = self
            .client
            .post(self.boards_url())
            .json(&CreateBoardRequest { name, description })
            .send()
            .await?;
        decode(response).await
    }

    async fn get_board(&self, board_id: &str) -> Result<Board, ClientError> {
        let response = self.client.get(self.board_url(board_id)).send().await?;
        decode(response).await
    }

    async fn create_note(
        &self,
        board_id: &str,
        text: &str,
        category: Category,
        author: &str,
    ) -> Result<Note, ClientError> {
        let response = self
            .client
            .post(format!("{}/notes", self.board_url(board_id)))
            .json(&CreateNoteRequest {
                text,
                category,
                author,
            })
            .send()
            .await?;
        decode(response).await
    }

    async fn update_note(
        &self,
        board_id: &str,
        note_id: &str,
        text: &str,
        author: &str,
    ) -> Result<Note, ClientError> {
        let response = self
            .client
            .put(self.note_url(board_id, note_id))
            .json(&UpdateNoteRequest { text, author })
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_note(&self, board_id: &str, note_id: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.note_url(board_id, note_id))
            .send()
            .await?;
        let deleted: DeleteNoteResponse = decode(response).await?;
        tracing::debug!("Server confirmed deletion of {}", deleted.id);
        Ok(())
    }

    async fn vote_note(&self, board_id: &str, note_id: &str) -> Result<Note, ClientError> {
        let response = self
            .client
            .post(format!("{}/vote", self.note_url(board_id, note_id)))
            .send()
            .await?;
        decode(response).await
    }

    async fn move_note(
        &self,
        board_id: &str,
        note_id: &str,
        category: Category,
    ) -> Result<Note, ClientError> {
        let response = self
            .client
            .put(format!("{}/category", self.note_url(board_id, note_id)))
            .json(&UpdateNoteCategoryRequest { category })
            .send()
            .await?;
        decode(response).await
    }

    async fn merge_notes(
        &self,
        board_id: &str,
        target_id: &str,
        source_id: &str,
    ) -> Result<Note, ClientError> {
        let response = self
            .client
            .put(format!("{}/merge", self.note_url(board_id, target_id)))
            .json(&MergeNotesRequest {
                source_note_id: source_id,
            })
            .send()
            .await?;
        decode(response).await
    }
}
