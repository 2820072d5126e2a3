//! Notely library - the note server's modules, router, and shared state.
//!
//! - `models`: Documents, ids, and request/response bodies
//! - `store`: sled-backed document storage scoped by owner
//! - `auth`: Owner extraction from the `x-owner` header
//! - `handlers`: Document, chat, and page routes
//! - `ai`: Prompt construction and the Gemini client
//! - `pdf_import`: PDF upload to document conversion
//! - `templates`: Dashboard and editor HTML
//! - `config`: Flags and environment

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod ai;
pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pdf_import;
pub mod store;
pub mod templates;

/// Body limit for JSON routes.
pub const JSON_BODY_LIMIT: usize = 2 * 1024 * 1024;

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub store: store::DocStore,
    pub ai: Arc<dyn ai::TextGenerator>,
    pub firebase_project: Option<String>,
}

impl AppState {
    pub fn new(store: store::DocStore, ai: Arc<dyn ai::TextGenerator>) -> Self {
        Self {
            store,
            ai,
            firebase_project: None,
        }
    }

    pub fn with_firebase_project(mut self, project: Option<String>) -> Self {
        self.firebase_project = project;
        self
    }
}

// ============================================================================
// Router
// ============================================================================

/// CORS for the configured origins. `*` allows any origin without credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(auth::OWNER_HEADER),
        ]);

    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        layer
            .allow_origin(AllowOrigin::list(allowed))
            .allow_credentials(true)
    }
}

pub fn build_router(state: Arc<AppState>, origins: &[String]) -> Router {
    Router::new()
        // Pages
        .route("/", get(handlers::dashboard_page))
        .route("/doc/{id}", get(handlers::editor_page))
        // Documents
        .route("/api", get(handlers::health))
        .route(
            "/api/docs",
            get(handlers::list_docs).post(handlers::create_doc),
        )
        .route(
            "/api/docs/import",
            post(pdf_import::import_pdf)
                .layer(DefaultBodyLimit::max(pdf_import::MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/docs/{id}",
            get(handlers::get_doc)
                .put(handlers::update_doc)
                .delete(handlers::delete_doc),
        )
        .route(
            "/api/docs/{id}/chat",
            get(handlers::get_chat).put(handlers::put_chat),
        )
        // AI
        .route("/api/ai/inline", post(ai::ai_inline))
        .route("/api/ai/enhance", post(ai::ai_enhance))
        .route("/api/ai/chat", post(ai::ai_chat))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub use ai::{Conversation, GeminiClient, Mode, TextGenerator};
pub use auth::{Owner, OWNER_HEADER};
pub use config::Config;
pub use error::ApiError;
pub use models::{ChatMessage, DocId, Document, DocumentView};
pub use store::{DocStore, StoreError};
