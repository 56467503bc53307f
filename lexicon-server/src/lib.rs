//! HTTP API and console front ends for the Lexicon word store.

pub mod console;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use lexicon_store::{StoreError, WordStore};
use lexicon_types::{EntryLimits, ValidationError, WordEntry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

pub use console::run_console;

/// Greeting served at `/`.
pub const WELCOME: &str = "Welcome to the Lexicon dictionary API";

/// Body of `POST /api/words/add`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AddRequest {
    pub word: String,
    pub definition: String,
}

/// Body of `PUT /api/words/define/{word}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DefineRequest {
    pub definition: String,
}

/// Plain acknowledgement.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body: `{"error": "..."}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
struct AppState {
    store: Arc<WordStore>,
    limits: EntryLimits,
}

/// A [`StoreError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(StoreError::Validation(err))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::AlreadyExists(_) => StatusCode::CONFLICT,
            StoreError::Storage(_) | StoreError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            debug!("Request rejected ({}): {}", status, self.0);
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn welcome_handler() -> &'static str {
    WELCOME
}

async fn list_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<WordEntry>>> {
    Ok(Json(state.store.list().await?))
}

async fn get_handler(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> ApiResult<Json<WordEntry>> {
    Ok(Json(state.store.get(&word).await?))
}

/// `GET /api/words/add` shares its path with the add route; it is a lookup
/// of the word "add".
async fn get_add_handler(State(state): State<AppState>) -> ApiResult<Json<WordEntry>> {
    Ok(Json(state.store.get("add").await?))
}

async fn add_handler(
    State(state): State<AppState>,
    Json(req): Json<AddRequest>,
) -> ApiResult<(StatusCode, Json<WordEntry>)> {
    state.limits.validate(&req.word, &req.definition)?;
    state.store.add(&req.word, &req.definition).await?;
    let entry = WordEntry::new(req.word.trim(), req.definition.trim());
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn define_handler(
    State(state): State<AppState>,
    Path(word): Path<String>,
    Json(req): Json<DefineRequest>,
) -> ApiResult<Json<WordEntry>> {
    state.limits.validate_definition(&req.definition)?;
    state.store.edit(&word, &req.definition).await?;
    Ok(Json(WordEntry::new(word.trim(), req.definition.trim())))
}

async fn remove_handler(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.store.remove(&word).await?;
    Ok(Json(MessageResponse {
        message: format!("Word '{}' removed", word.trim()),
    }))
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();
    let response = next.run(req).await;
    info!(
        "{} {} -> {} ({:?})",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

/// Build the HTTP API router over the given store with default input limits.
///
/// `GET /api/words/list` always lists, so the word "list" cannot be looked
/// up by path. Every other word, "add" included, can.
pub fn build_router(store: Arc<WordStore>) -> Router {
    build_router_with_limits(store, EntryLimits::default())
}

/// Build the HTTP API router with explicit input limits.
pub fn build_router_with_limits(store: Arc<WordStore>, limits: EntryLimits) -> Router {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/api/words/list", get(list_handler))
        .route("/api/words/add", post(add_handler).get(get_add_handler))
        .route("/api/words/define/{word}", put(define_handler))
        .route("/api/words/remove/{word}", delete(remove_handler))
        .route("/api/words/{word}", get(get_handler))
        .layer(middleware::from_fn(log_requests))
        .with_state(AppState { store, limits })
}
