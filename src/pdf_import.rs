//! PDF import: turn an uploaded PDF into a new document.
//!
//! Text is extracted page by page with `pdf-extract`. Blank lines split a
//! page into blocks; short unpunctuated single-line blocks become headings and
//! everything else becomes paragraphs.

use crate::auth::Owner;
use crate::content::{first_block_text, html_escape};
use crate::error::ApiError;
use crate::models::{DocumentView, NewDocument};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Upload size accepted by the import route.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const HEADING_MAX_CHARS: usize = 80;
const SENTENCE_ENDINGS: &[char] = &['.', ',', ';', ':', '?', '!'];
const FALLBACK_STEM: &str = "Imported PDF";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("missing file field")]
    MissingFile,
    #[error("uploaded file is empty")]
    Empty,
    #[error("file is not a PDF")]
    NotPdf,
    #[error("could not read PDF: {0}")]
    Unreadable(String),
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

// ============================================================================
// Text Extraction
// ============================================================================

pub fn check_pdf(bytes: &[u8]) -> Result<(), ImportError> {
    if bytes.is_empty() {
        return Err(ImportError::Empty);
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err(ImportError::NotPdf);
    }
    Ok(())
}

/// Extract the text of each page.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ImportError> {
    check_pdf(bytes)?;
    pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ImportError::Unreadable(e.to_string()))
}

// ============================================================================
// Page → HTML
// ============================================================================

struct Block {
    text: String,
    lines: usize,
}

impl Block {
    fn is_heading(&self) -> bool {
        self.lines == 1
            && self.text.chars().count() <= HEADING_MAX_CHARS
            && !self.text.ends_with(SENTENCE_ENDINGS)
    }
}

fn page_blocks(page: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in page.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(Block {
                    text: current.join(" "),
                    lines: current.len(),
                });
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(Block {
            text: current.join(" "),
            lines: current.len(),
        });
    }

    blocks
}

/// Render extracted pages as editor HTML.
pub fn pages_to_html(pages: &[String], stem: &str) -> String {
    let mut html = String::new();
    let mut rendered_pages = 0;
    let mut used_h1 = false;

    for page in pages {
        let blocks = page_blocks(page);
        if blocks.is_empty() {
            continue;
        }
        if rendered_pages > 0 {
            html.push_str("<hr>");
        }

        for block in &blocks {
            let text = html_escape(&block.text);
            if block.is_heading() {
                let tag = if rendered_pages == 0 && !used_h1 { "h1" } else { "h2" };
                used_h1 = true;
                html.push_str(&format!("<{tag}>{text}</{tag}>"));
            } else {
                html.push_str(&format!("<p>{text}</p>"));
            }
        }
        rendered_pages += 1;
    }

    if html.is_empty() {
        format!("<h1>{}</h1><p></p>", html_escape(stem))
    } else {
        html
    }
}

fn file_stem(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).file_stem())
        .map(|stem| stem.to_string_lossy().trim().to_string())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_STEM.to_string())
}

/// Title and content for a new document built from extracted pages.
pub fn document_from_pages(pages: &[String], file_name: Option<&str>) -> NewDocument {
    let stem = file_stem(file_name);
    let content_html = pages_to_html(pages, &stem);
    let title = first_block_text(&content_html).unwrap_or(stem);

    NewDocument {
        title: Some(title),
        content_html: Some(content_html),
    }
}

// ============================================================================
// Route Handler
// ============================================================================

pub async fn import_pdf(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentView>), ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("invalid upload: {}", e)))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or(ImportError::MissingFile)?;
    check_pdf(&bytes)?;

    let size = bytes.len();
    let pages = tokio::task::spawn_blocking(move || extract_pages(&bytes))
        .await
        .map_err(|e| {
            warn!(error = %e, "PDF extraction aborted");
            ImportError::Unreadable("extraction aborted".to_string())
        })??;

    let new_doc = document_from_pages(&pages, file_name.as_deref());
    let doc = state.store.create(owner.as_str(), new_doc)?;
    info!(
        id = %doc.id,
        owner = owner.as_str(),
        pages = pages.len(),
        bytes = size,
        "imported PDF"
    );

    Ok((StatusCode::CREATED, Json(doc.view())))
}
