use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{
        BoardDetailResponse, BoardSummaryResponse, CreateBoardRequest, CreateNoteRequest,
        DeleteNoteResponse, ErrorResponse, MergeNotesRequest, NoteResponse,
        UpdateNoteCategoryRequest, UpdateNoteRequest,
    },
    error::ServiceError,
    service::BoardService,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        list_boards,
        create_board,
        get_board,
        create_note,
        update_note,
        delete_note,
        vote_note,
        update_category,
        merge_notes
    ),
    components(schemas(
        BoardSummaryResponse,
        BoardDetailResponse,
        NoteResponse,
        CreateBoardRequest,
        CreateNoteRequest,
        UpdateNoteRequest,
        UpdateNoteCategoryRequest,
        MergeNotesRequest,
        DeleteNoteResponse,
        ErrorResponse
    )),
    tags(
        (name = "boards", description = "Retrospective boards"),
        (name = "notes", description = "Notes on a board")
    )
)]
pub struct ApiDoc;

fn rejected(rejection: &JsonRejection) -> Response {
    tracing::warn!("rejected request body: {}", rejection.body_text());
    ServiceError::Validation(rejection.body_text()).into_response()
}

fn respond<T: serde::Serialize>(
    action: &str,
    status: StatusCode,
    result: Result<T, ServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(e) => {
            tracing::warn!("failed to {action}: {e}");
            e.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/boards",
    responses(
        (status = 200, description = "All boards", body = Vec<BoardSummaryResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "boards"
)]
#[debug_handler]
pub async fn list_boards(State(service): State<Arc<BoardService>>) -> Response {
    respond("list boards", StatusCode::OK, service.list_boards().await)
}

#[utoipa::path(
    post,
    path = "/api/boards",
    request_body = CreateBoardRequest,
    responses(
        (status = 201, description = "Board created", body = BoardDetailResponse),
        (status = 400, description = "Name is missing", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "boards"
)]
#[debug_handler]
pub async fn create_board(
    State(service): State<Arc<BoardService>>,
    payload: Result<Json<CreateBoardRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(&rejection),
    };
    respond(
        "create board",
        StatusCode::CREATED,
        service.create_board(payload).await,
    )
}

#[utoipa::path(
    get,
    path = "/api/boards/{board_id}",
    params(
        ("board_id" = String, Path, description = "Board ID")
    ),
    responses(
        (status = 200, description = "Board with its notes", body = BoardDetailResponse),
        (status = 404, description = "Board not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "boards"
)]
#[debug_handler]
pub async fn get_board(
    State(service): State<Arc<BoardService>>,
    Path(board_id): Path<String>,
) -> Response {
    respond("get board", StatusCode::OK, service.get_board(&board_id).await)
}

#[utoipa::path(
    post,
    path = "/api/boards/{board_id}/notes",
    params(
        ("board_id" = String, Path, description = "Board ID")
    ),
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Invalid category or empty text", body = ErrorResponse),
        (status = 404, description = "Board not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<BoardService>>,
    Path(board_id): Path<String>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(&rejection),
    };
    respond(
        "create note",
        StatusCode::CREATED,
        service.create_note(&board_id, payload).await,
    )
}

#[utoipa::path(
    put,
    path = "/api/boards/{board_id}/notes/{note_id}",
    params(
        ("board_id" = String, Path, description = "Board ID"),
        ("note_id" = String, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = NoteResponse),
        (status = 400, description = "Empty text", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<BoardService>>,
    Path((board_id, note_id)): Path<(String, String)>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(&rejection),
    };
    respond(
        "update note",
        StatusCode::OK,
        service.update_note(&board_id, &note_id, payload).await,
    )
}

#[utoipa::path(
    delete,
    path = "/api/boards/{board_id}/notes/{note_id}",
    params(
        ("board_id" = String, Path, description = "Board ID"),
        ("note_id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted", body = DeleteNoteResponse),
        (status = 404, description = "Board or note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<BoardService>>,
    Path((board_id, note_id)): Path<(String, String)>,
) -> Response {
    respond(
        "delete note",
        StatusCode::OK,
        service.delete_note(&board_id, &note_id).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/boards/{board_id}/notes/{note_id}/vote",
    params(
        ("board_id" = String, Path, description = "Board ID"),
        ("note_id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Vote counted", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn vote_note(
    State(service): State<Arc<BoardService>>,
    Path((board_id, note_id)): Path<(String, String)>,
) -> Response {
    respond(
        "vote note",
        StatusCode::OK,
        service.vote_note(&board_id, &note_id).await,
    )
}

#[utoipa::path(
    put,
    path = "/api/boards/{board_id}/notes/{note_id}/category",
    params(
        ("board_id" = String, Path, description = "Board ID"),
        ("note_id" = String, Path, description = "Note ID")
    ),
    request_body = UpdateNoteCategoryRequest,
    responses(
        (status = 200, description = "Note moved", body = NoteResponse),
        (status = 400, description = "Invalid category", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_category(
    State(service): State<Arc<BoardService>>,
    Path((board_id, note_id)): Path<(String, String)>,
    payload: Result<Json<UpdateNoteCategoryRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(&rejection),
    };
    respond(
        "move note",
        StatusCode::OK,
        service.update_category(&board_id, &note_id, payload).await,
    )
}

#[utoipa::path(
    put,
    path = "/api/boards/{board_id}/notes/{note_id}/merge",
    params(
        ("board_id" = String, Path, description = "Board ID"),
        ("note_id" = String, Path, description = "Target note ID")
    ),
    request_body = MergeNotesRequest,
    responses(
        (status = 200, description = "Merged target note", body = NoteResponse),
        (status = 404, description = "Source or target not found", body = ErrorResponse),
        (status = 409, description = "Note merged into itself", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn merge_notes(
    State(service): State<Arc<BoardService>>,
    Path((board_id, note_id)): Path<(String, String)>,
    payload: Result<Json<MergeNotesRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(&rejection),
    };
    respond(
        "merge notes",
        StatusCode::OK,
        service.merge_notes(&board_id, &note_id, payload).await,
    )
}
