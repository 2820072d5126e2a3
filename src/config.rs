//! Server configuration from command-line flags and environment variables.
//!
//! Flags override the environment; a `.env` file in the working directory is
//! loaded into the environment first.

use crate::ai::DEFAULT_GEMINI_API_BASE;
use crate::auth::{parse_service_account, FirebaseServiceAccount};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = ".notely_db";

#[derive(Parser, Debug, Clone)]
#[command(name = "notely", version, about = "Notely note server")]
pub struct Config {
    /// Host to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// sled database directory
    #[arg(long, env = "NOTELY_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Accepted for compatibility; only `sled:<path>` and `file:<path>` are used
    #[arg(long, env = "MONGODB_URI", hide_env_values = true)]
    pub mongodb_uri: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_GEMINI_API_BASE)]
    pub gemini_api_base: String,

    /// Comma-separated CORS origins; empty means any origin
    #[arg(long, env = "ALLOW_ORIGIN")]
    pub allow_origin: Option<String>,

    #[arg(long, env = "FIREBASE_SERVICE_ACCOUNT_JSON", hide_env_values = true)]
    pub firebase_service_account_json: Option<String>,
}

impl Config {
    pub fn from_env_and_args() -> Self {
        let _ = dotenvy::dotenv();
        Self::parse()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn mongodb_uri_path(&self) -> Option<PathBuf> {
        let uri = self.mongodb_uri.as_deref()?.trim();
        uri.strip_prefix("sled:")
            .or_else(|| uri.strip_prefix("file:"))
            .map(|p| p.trim_start_matches("//"))
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    /// Where the document store lives: `NOTELY_DB_PATH`, then a
    /// `sled:`/`file:` `MONGODB_URI`, then the default.
    pub fn store_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .or_else(|| self.mongodb_uri_path())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
    }

    /// A `MONGODB_URI` that does not name an embedded store, and so is ignored.
    pub fn ignored_mongodb_uri(&self) -> Option<&str> {
        let uri = self.mongodb_uri.as_deref().filter(|u| !u.trim().is_empty())?;
        if self.mongodb_uri_path().is_some() {
            None
        } else {
            Some(uri)
        }
    }

    pub fn gemini_api_key(&self) -> Option<String> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }

    /// CORS origins; `["*"]` when none are configured.
    pub fn allowed_origins(&self) -> Vec<String> {
        let origins: Vec<String> = self
            .allow_origin
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            vec!["*".to_string()]
        } else {
            origins
        }
    }

    pub fn firebase_account(&self) -> Result<Option<FirebaseServiceAccount>, serde_json::Error> {
        match self
            .firebase_service_account_json
            .as_deref()
            .filter(|j| !j.trim().is_empty())
        {
            Some(json) => parse_service_account(json).map(Some),
            None => Ok(None),
        }
    }
}
