//! Document storage on sled.
//!
//! Documents live in the `docs` tree keyed by their 12 id bytes and encoded as
//! JSON. A second tree, `docs:by_owner`, maps `owner \0 id` to nothing so an
//! owner's documents can be listed with a prefix scan. Every read and write
//! is scoped by owner: a document owned by someone else behaves as missing.

use crate::models::{
    ChatMessage, DocId, Document, DocumentPatch, NewDocument, DEFAULT_CONTENT_HTML, DEFAULT_TITLE,
};
use chrono::Utc;
use std::path::Path;
use tracing::warn;

const DOCS_TREE: &str = "docs";
const OWNER_INDEX_TREE: &str = "docs:by_owner";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Sled(#[from] sled::Error),
    #[error("corrupt document record: {0}")]
    Codec(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Clone)]
pub struct DocStore {
    docs: sled::Tree,
    by_owner: sled::Tree,
}

fn owner_key(owner: &str, id: &DocId) -> Vec<u8> {
    let mut key = owner_prefix(owner);
    key.extend_from_slice(id.as_bytes());
    key
}

fn owner_prefix(owner: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(owner.len() + 13);
    key.extend_from_slice(owner.as_bytes());
    key.push(0);
    key
}

impl DocStore {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> StoreResult<Self> {
        Ok(Self {
            docs: db.open_tree(DOCS_TREE)?,
            by_owner: db.open_tree(OWNER_INDEX_TREE)?,
        })
    }

    /// All of `owner`'s documents, most recently updated first.
    pub fn list(&self, owner: &str) -> StoreResult<Vec<Document>> {
        let mut docs = Vec::new();
        for entry in self.by_owner.scan_prefix(owner_prefix(owner)) {
            let (key, _) = entry?;
            let Some(id) = DocId::from_slice(&key[key.len().saturating_sub(12)..]) else {
                continue;
            };
            match self.load(&id)? {
                Some(doc) if doc.owner == owner => docs.push(doc),
                _ => {
                    // Index entry left behind by an interrupted delete.
                    warn!(%id, owner, "dropping stale owner index entry");
                    self.by_owner.remove(&key)?;
                }
            }
        }

        docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(docs)
    }

    pub fn create(&self, owner: &str, new: NewDocument) -> StoreResult<Document> {
        let now = Utc::now();
        let doc = Document {
            id: DocId::generate_at(now),
            owner: owner.to_string(),
            title: new.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content_html: new
                .content_html
                .unwrap_or_else(|| DEFAULT_CONTENT_HTML.to_string()),
            chat: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.docs
            .insert(doc.id.as_bytes(), serde_json::to_vec(&doc)?)?;
        self.by_owner.insert(owner_key(owner, &doc.id), Vec::<u8>::new())?;
        Ok(doc)
    }

    pub fn get(&self, owner: &str, id: &DocId) -> StoreResult<Option<Document>> {
        Ok(self.load(id)?.filter(|doc| doc.owner == owner))
    }

    pub fn update(
        &self,
        owner: &str,
        id: &DocId,
        patch: DocumentPatch,
    ) -> StoreResult<Option<Document>> {
        self.modify(owner, id, |doc| patch.clone().apply(doc))
    }

    pub fn set_chat(
        &self,
        owner: &str,
        id: &DocId,
        messages: Vec<ChatMessage>,
    ) -> StoreResult<Option<Document>> {
        self.modify(owner, id, |doc| doc.chat = messages.clone())
    }

    /// Delete the document if `owner` owns it. Returns whether anything was removed.
    pub fn delete(&self, owner: &str, id: &DocId) -> StoreResult<bool> {
        loop {
            let Some(current) = self.docs.get(id.as_bytes())? else {
                return Ok(false);
            };
            let doc: Document = serde_json::from_slice(&current)?;
            if doc.owner != owner {
                return Ok(false);
            }

            let swapped = self
                .docs
                .compare_and_swap(id.as_bytes(), Some(current), None as Option<&[u8]>)?;
            if swapped.is_ok() {
                self.by_owner.remove(owner_key(owner, id))?;
                return Ok(true);
            }
        }
    }

    fn load(&self, id: &DocId) -> StoreResult<Option<Document>> {
        match self.docs.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Read-modify-write with compare-and-swap, retried until no other
    /// writer got in between.
    fn modify<F>(&self, owner: &str, id: &DocId, mut apply: F) -> StoreResult<Option<Document>>
    where
        F: FnMut(&mut Document),
    {
        loop {
            let Some(current) = self.docs.get(id.as_bytes())? else {
                return Ok(None);
            };
            let mut doc: Document = serde_json::from_slice(&current)?;
            if doc.owner != owner {
                return Ok(None);
            }

            apply(&mut doc);
            doc.touch();

            let next = serde_json::to_vec(&doc)?;
            let swapped = self
                .docs
                .compare_and_swap(id.as_bytes(), Some(current), Some(next))?;
            if swapped.is_ok() {
                return Ok(Some(doc));
            }
        }
    }
}
