mod config;
mod dto;
mod error;
mod handlers;
mod models;
mod repository;
mod service;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

use std::sync::Arc;

use handlers::rest;
use repository::{MemoryRepository, PgRepository, Repository};

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::StorageKind;
use service::BoardService;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!("Successfully loaded retro board config");

    // Repository creation and migration
    let repo = match (cfg.storage, cfg.pg_dsn.as_deref()) {
        (StorageKind::Postgres, Some(dsn)) => {
            let mut repo = PgRepository::new(dsn).await.unwrap_or_else(|e| {
                tracing::error!("Failed to establish database connection: {e}");
                panic!("failed to establish database connection: {e}");
            });
            repo.migrate().await.unwrap_or_else(|e| {
                tracing::error!("Failed to migrate database: {e}");
                panic!("failed to migrate database: {e}");
            });
            Repository::Postgres(repo)
        }
        (StorageKind::Postgres, None) => {
            tracing::error!("Postgres storage selected without a DSN");
            panic!("postgres storage selected without a DSN");
        }
        (StorageKind::Memory, _) => {
            tracing::warn!("Using in-memory storage, boards are lost on restart");
            Repository::Memory(MemoryRepository::new())
        }
    };
    let repo_ptr = Arc::new(tokio::sync::Mutex::new(repo));

    // Service creation
    let service = Arc::new(BoardService::new(repo_ptr));

    if cfg.seed_demo_data {
        service.seed_demo_data().await.unwrap_or_else(|e| {
            tracing::error!("Failed to create demo data: {e}");
            panic!("failed to create demo data: {e}");
        });
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind port {}: {e}", cfg.port);
            panic!("failed to bind port {}: {e}", cfg.port);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Retro board server starting, listening on {}", addr),
        Err(e) => tracing::warn!("Listening address unavailable: {e}"),
    }

    if let Err(e) = axum::serve(listener, app(service)).await {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }
}

// Router config
fn app(service: Arc<BoardService>) -> Router {
    let note = "/api/boards/{board_id}/notes/{note_id}";

    Router::new()
        .route("/", get(root))
        .route("/api/boards", get(rest::list_boards).post(rest::create_board))
        .route("/api/boards/{board_id}", get(rest::get_board))
        .route("/api/boards/{board_id}/notes", post(rest::create_note))
        .route(note, put(rest::update_note).delete(rest::delete_note))
        .route(
            &format!("{note}/vote"),
            post(rest::vote_note).put(rest::vote_note),
        )
        .route(&format!("{note}/category"), put(rest::update_category))
        .route(&format!("{note}/merge"), put(rest::merge_notes))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Response {
    (StatusCode::OK, "Retro board is up").into_response()
}
