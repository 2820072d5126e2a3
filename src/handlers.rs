//! HTTP route handlers for documents, chat transcripts, and UI pages.
//!
//! Every document route is scoped by the [`Owner`] taken from the request.
//! A document that exists but belongs to someone else is reported exactly
//! like a missing one.

use crate::auth::Owner;
use crate::error::ApiError;
use crate::models::{
    ChatTranscript, DocId, DocumentPatch, DocumentView, HealthResponse, ListQuery, NewDocument,
    OkResponse,
};
use crate::templates::{render_dashboard, render_editor};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

fn parse_id(raw: &str) -> Result<DocId, ApiError> {
    Ok(raw.parse::<DocId>()?)
}

/// Decode an optional JSON body. Empty or whitespace-only bodies yield the default.
fn json_or_default<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))
}

// ============================================================================
// Health
// ============================================================================

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        ts: Utc::now().timestamp_millis(),
        firebase_project: state.firebase_project.clone(),
    })
}

// ============================================================================
// Document Handlers
// ============================================================================

pub async fn list_docs(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DocumentView>>, ApiError> {
    let needle = query
        .q
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let docs: Vec<DocumentView> = state
        .store
        .list(owner.as_str())?
        .iter()
        .filter(|doc| match &needle {
            Some(needle) => doc.title.to_lowercase().contains(needle),
            None => true,
        })
        .map(|doc| doc.view())
        .collect();

    debug!(owner = owner.as_str(), count = docs.len(), "listed documents");
    Ok(Json(docs))
}

/// Create a document. The body is optional; missing fields take defaults.
pub async fn create_doc(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    body: Bytes,
) -> Result<(StatusCode, Json<DocumentView>), ApiError> {
    let new_doc: NewDocument = json_or_default(&body)?;

    let doc = state.store.create(owner.as_str(), new_doc)?;
    debug!(id = %doc.id, owner = owner.as_str(), "created document");
    Ok((StatusCode::CREATED, Json(doc.view())))
}

pub async fn get_doc(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<Json<DocumentView>, ApiError> {
    let id = parse_id(&id)?;
    let doc = state
        .store
        .get(owner.as_str(), &id)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(doc.view()))
}

pub async fn update_doc(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<DocumentView>, ApiError> {
    let id = parse_id(&id)?;
    let patch: DocumentPatch = json_or_default(&body)?;
    let doc = state
        .store
        .update(owner.as_str(), &id, patch)?
        .ok_or(ApiError::NotFound)?;
    debug!(%id, owner = owner.as_str(), "updated document");
    Ok(Json(doc.view()))
}

/// Delete is unconditional: a valid id always answers `{ok: true}`.
pub async fn delete_doc(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = parse_id(&id)?;
    let removed = state.store.delete(owner.as_str(), &id)?;
    debug!(%id, owner = owner.as_str(), removed, "delete document");
    Ok(Json(OkResponse { ok: true }))
}

// ============================================================================
// Chat Transcript Handlers
// ============================================================================

pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<Json<ChatTranscript>, ApiError> {
    let id = parse_id(&id)?;
    let doc = state
        .store
        .get(owner.as_str(), &id)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(ChatTranscript { messages: doc.chat }))
}

/// Replace the stored transcript with the one in the body.
pub async fn put_chat(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ChatTranscript>, ApiError> {
    let id = parse_id(&id)?;
    let body: ChatTranscript = json_or_default(&body)?;
    let doc = state
        .store
        .set_chat(owner.as_str(), &id, body.messages)?
        .ok_or(ApiError::NotFound)?;
    debug!(%id, owner = owner.as_str(), messages = doc.chat.len(), "saved chat");
    Ok(Json(ChatTranscript { messages: doc.chat }))
}

// ============================================================================
// UI Pages
// ============================================================================

pub async fn dashboard_page() -> Html<String> {
    Html(render_dashboard())
}

pub async fn editor_page(Path(id): Path<String>) -> Result<Html<String>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Html(render_editor(&id)))
}
