//! Ownership and identity.
//!
//! Sign-in happens in the browser against Firebase; the client then sends the
//! user id on every API call in the `x-owner` header. The server takes that
//! header at face value. Ownership is a plain string match, not a
//! security boundary.

use crate::models::DEFAULT_OWNER;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use serde::Deserialize;
use std::convert::Infallible;

/// Header carrying the owner id
pub const OWNER_HEADER: &str = "x-owner";

// ============================================================================
// Owner Extraction
// ============================================================================

/// The owner a request acts for. Never empty; falls back to `anon`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read the owner from request headers, trimming whitespace.
pub fn owner_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_OWNER)
        .to_string()
}

impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Owner(owner_from_headers(&parts.headers)))
    }
}

// ============================================================================
// Firebase Service Account
// ============================================================================

/// The fields of a Firebase service-account key that the server reports.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FirebaseServiceAccount {
    pub project_id: String,
    #[serde(default)]
    pub client_email: Option<String>,
}

pub fn parse_service_account(json: &str) -> Result<FirebaseServiceAccount, serde_json::Error> {
    serde_json::from_str(json)
}
