//! Notely server entry point.
//!
//! Loads configuration, opens the document store, builds the AI client and
//! serves the REST API plus the dashboard and editor pages.

use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use notely::{build_router, AppState, Config, DocStore, GeminiClient};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env_and_args();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notely=info,tower_http=info")),
        )
        .with(fmt::layer())
        .init();

    let store_path = config.store_path();
    if let Some(uri) = config.ignored_mongodb_uri() {
        warn!(
            uri_scheme = uri.split(':').next().unwrap_or_default(),
            "MONGODB_URI does not name an embedded store and is ignored; set NOTELY_DB_PATH or use sled:<path>"
        );
    }
    let store = DocStore::open(&store_path)
        .with_context(|| format!("opening document store at {}", store_path.display()))?;

    let gemini = GeminiClient::new(&config.gemini_api_base, config.gemini_api_key())
        .context("building Gemini client")?;
    if !gemini.is_configured() {
        warn!("GEMINI_API_KEY is not set. AI requests will fail until it is provided.");
    }

    let firebase = config
        .firebase_account()
        .context("parsing FIREBASE_SERVICE_ACCOUNT_JSON")?;
    if let Some(ref account) = firebase {
        info!(
            project = %account.project_id,
            client_email = account.client_email.as_deref().unwrap_or("-"),
            "Firebase service account loaded"
        );
    }

    let origins = config.allowed_origins();
    let state = Arc::new(
        AppState::new(store, Arc::new(gemini))
            .with_firebase_project(firebase.map(|a| a.project_id)),
    );
    let app = build_router(state, &origins);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;

    info!(
        addr = %bind_addr,
        store = %store_path.display(),
        cors = ?origins,
        "Notely server running at http://{}",
        bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Notely server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
