//! The remote document store server.
//!
//! # Configuration
//!
//! Environment variables:
//! - `HIVEKEEP_PORT`: Port to listen on (default: 8080)
//! - `HIVEKEEP_DATA_DIR`: Directory to store documents (default: ~/.local/share/hivekeep-server)
//! - `HIVEKEEP_CONFIG`: Path to config file (default: ~/.config/hivekeep-server/config.yaml)
//!
//! # Config File Format
//!
//! ```yaml
//! api_keys:
//!   - key: "your-secret-key-here"
//!     user_id: "user1"
//! ```
//!
//! # Endpoints
//!
//! - `GET /health`: Health check (no auth required)
//! - `GET /me`: Current user
//! - `GET /collections/{collection}/documents?limit=N`: Documents ordered by id
//! - `GET /collections/{collection}/documents/{id}`: One document
//! - `PUT /collections/{collection}/documents/{id}`: Replace the caller's own document

pub mod auth;
pub mod storage;

pub use auth::{ApiKeyEntry, ApiKeyStore, AuthUser};
pub use storage::{DocumentStorage, StorageError};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::remote::protocol::{DocumentList, DocumentRecord, MeResponse};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub config_path: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = std::env::var("HIVEKEEP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let data_dir = std::env::var("HIVEKEEP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("hivekeep-server")
            });

        let config_path = std::env::var("HIVEKEEP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("hivekeep-server")
                    .join("config.yaml")
            });

        Self {
            port,
            data_dir,
            config_path,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    api_keys: Arc<ApiKeyStore>,
    storage: DocumentStorage,
}

impl AppState {
    pub fn new(api_keys: ApiKeyStore, storage: DocumentStorage) -> Self {
        Self {
            api_keys: Arc::new(api_keys),
            storage,
        }
    }
}

#[derive(Debug)]
enum ApiError {
    NotFound,
    Forbidden,
    BadRequest(String),
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidName(name) => {
                ApiError::BadRequest(format!("Invalid name: {}", name))
            }
            other => {
                tracing::error!("storage error: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Document not found".to_string(),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "Only your own document can be written".to_string(),
            ),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn me(Extension(user): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: user.user_id,
    })
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<usize>,
}

async fn list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<DocumentList>, ApiError> {
    let documents = state.storage.list(&collection, params.limit)?;
    Ok(Json(DocumentList { documents }))
}

async fn get_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<DocumentRecord>, ApiError> {
    match state.storage.load(&collection, &id)? {
        Some(data) => Ok(Json(DocumentRecord { id, data })),
        None => Err(ApiError::NotFound),
    }
}

async fn put_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((collection, id)): Path<(String, String)>,
    Json(data): Json<serde_json::Value>,
) -> Result<Json<DocumentRecord>, ApiError> {
    if id != user.user_id {
        tracing::warn!(user_id = %user.user_id, document = %id, "rejected cross-user write");
        return Err(ApiError::Forbidden);
    }

    state.storage.save(&collection, &id, &data)?;
    tracing::info!(collection = %collection, document = %id, "document replaced");
    Ok(Json(DocumentRecord { id, data }))
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route("/health", get(health));

    let protected_routes = Router::new()
        .route("/me", get(me))
        .route("/collections/{collection}/documents", get(list_documents))
        .route(
            "/collections/{collection}/documents/{id}",
            get(get_document).put(put_document),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
