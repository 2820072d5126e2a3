//! Data models for Notely.
//!
//! This module contains the stored document shape, its client projection,
//! the request/response bodies of the REST API, and the document identifier.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

pub const DEFAULT_OWNER: &str = "anon";
pub const DEFAULT_TITLE: &str = "Untitled doc";
pub const DEFAULT_CONTENT_HTML: &str = "<h1>Untitled doc</h1><p></p>";

// ============================================================================
// Document Identifier
// ============================================================================

/// A 12-byte document id, rendered as 24 lowercase hex characters.
///
/// Layout: 4-byte big-endian creation second, 5 bytes of per-process
/// randomness, 3-byte wrapping counter. Ids created by one process sort in
/// creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocId([u8; 12]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id")]
pub struct InvalidDocId;

fn process_unique() -> &'static [u8; 5] {
    static UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    UNIQUE.get_or_init(|| {
        let mut bytes = [0u8; 5];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    })
}

fn next_counter() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| AtomicU32::new(rand::thread_rng().next_u32()));
    counter.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff
}

impl DocId {
    pub fn generate() -> Self {
        Self::generate_at(Utc::now())
    }

    pub fn generate_at(at: DateTime<Utc>) -> Self {
        let secs = at.timestamp().clamp(0, u32::MAX as i64) as u32;
        let counter = next_counter();

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 12]>::try_from(bytes).ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

impl FromStr for DocId {
    type Err = InvalidDocId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 24 {
            return Err(InvalidDocId);
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| InvalidDocId)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for DocId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Stored Document
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocId,
    pub owner: String,
    pub title: String,
    pub content_html: String,
    #[serde(default)]
    pub chat: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn view(&self) -> DocumentView {
        DocumentView {
            id: self.id,
            title: self.title.clone(),
            content_html: self.content_html.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Advance `updated_at`, never letting it stand still between two writes.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::microseconds(1)
        };
    }
}

/// What clients see of a document. The chat transcript is served separately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: DocId,
    pub title: String,
    pub content_html: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Request / Response Bodies
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub title: Option<String>,
    pub content_html: Option<String>,
}

/// Partial update; absent and `null` fields are both left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub content_html: Option<String>,
}

impl DocumentPatch {
    pub fn apply(self, doc: &mut Document) {
        if let Some(title) = self.title {
            doc.title = title;
        }
        if let Some(content_html) = self.content_html {
            doc.content_html = content_html;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatTranscript {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub ts: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firebase_project: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRequest {
    pub prompt: Option<String>,
    pub mode: Option<String>,
    pub context_html: Option<String>,
    pub messages: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_round_trips_through_hex() {
        let id = DocId::generate();
        let text = id.to_string();
        assert_eq!(text.len(), 24);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(text.parse::<DocId>().unwrap(), id);
    }

    #[test]
    fn test_doc_id_accepts_uppercase() {
        let id: DocId = "65A1B2C3D4E5F60718293A4B".parse().unwrap();
        assert_eq!(id.to_string(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_doc_id_rejects_bad_input() {
        for bad in [
            "",
            "abc",
            "not-an-id",
            "65a1b2c3d4e5f60718293a4",
            "65a1b2c3d4e5f60718293a4bz",
            "zza1b2c3d4e5f60718293a4b",
        ] {
            assert_eq!(bad.parse::<DocId>(), Err(InvalidDocId), "{bad:?}");
        }
    }

    #[test]
    fn test_doc_ids_sort_in_creation_order() {
        let at = Utc::now();
        let a = DocId::generate_at(at);
        let b = DocId::generate_at(at + chrono::Duration::seconds(1));
        assert!(a < b);
        assert_eq!(&a.as_bytes()[..4], &(at.timestamp() as u32).to_be_bytes());
    }

    #[test]
    fn test_doc_ids_are_distinct() {
        let at = Utc::now();
        let a = DocId::generate_at(at);
        let b = DocId::generate_at(at);
        assert_ne!(a, b);
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let now = Utc::now();
        let mut doc = Document {
            id: DocId::generate(),
            owner: "u1".to_string(),
            title: "Old".to_string(),
            content_html: "<p>old</p>".to_string(),
            chat: vec![],
            created_at: now,
            updated_at: now,
        };

        let patch: DocumentPatch =
            serde_json::from_str(r#"{"title": "New", "contentHtml": null}"#).unwrap();
        patch.apply(&mut doc);
        assert_eq!(doc.title, "New");
        assert_eq!(doc.content_html, "<p>old</p>");
    }

    #[test]
    fn test_touch_always_advances() {
        let future = Utc::now() + chrono::Duration::hours(1);
        let mut doc = Document {
            id: DocId::generate(),
            owner: DEFAULT_OWNER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            content_html: DEFAULT_CONTENT_HTML.to_string(),
            chat: vec![],
            created_at: future,
            updated_at: future,
        };
        doc.touch();
        assert!(doc.updated_at > future);
    }

    #[test]
    fn test_view_uses_camel_case_and_hides_chat() {
        let now = Utc::now();
        let doc = Document {
            id: DocId::generate(),
            owner: "u1".to_string(),
            title: "T".to_string(),
            content_html: "<p>x</p>".to_string(),
            chat: vec![ChatMessage::new("user", "hi")],
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(doc.view()).unwrap();
        assert_eq!(json["id"], doc.id.to_string());
        assert_eq!(json["contentHtml"], "<p>x</p>");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("chat").is_none());
        assert!(json.get("owner").is_none());
    }
}
