//! AI-assisted writing: prompt construction, the Gemini client, and the
//! `/api/ai/*` handlers.
//!
//! Each endpoint builds a [`Conversation`] (system instruction, prior turns,
//! final user message) and hands it to a [`TextGenerator`]. The model's text
//! is returned to the client verbatim.

use crate::error::ApiError;
use crate::models::{AiRequest, AiResponse, ChatMessage};
use crate::AppState;
use async_trait::async_trait;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const FAST_MODEL: &str = "gemini-2.5-flash-lite";
pub const CHAT_MODEL: &str = "gemini-2.5-flash";

/// How many prior chat messages are replayed to the model.
pub const CHAT_HISTORY_LIMIT: usize = 5;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const NOTE_SYSTEM_INSTRUCTION: &str = "\
You are an AI assistant specialized in helping users take high-quality notes.
Always write clearly, concisely, and directly relevant to the highlighted text.
Ensure you are following your main instruction and focusing on doing that.
Keep responses short and note-friendly (1–3 sentences if possible).
Use simple language, proper formatting, and avoid unnecessary filler.
only provide content for the highlighted section.";

const ENHANCE_SYSTEM_INSTRUCTION: &str = "\
You are an AI assistant specialized in enhancing user notes.
Your task is to improve only the highlighted text provided by the user.
Enhancements should be minimal:
- Fix grammar, punctuation, and spelling.
- Improve clarity and readability.
- Format for notes (bold, italics, bullet points) if it helps.
- Use plain text math with actual symbols (², ×, ÷, √) instead of LaTeX ($...$) when showing formulas.
Do NOT change the meaning or add new content.
Keep the text concise and note-friendly.
If you are unsure how to improve it, return the original text exactly as it was.
Do not make large rewrites; keep changes subtle and minimal.";

const CHAT_SYSTEM_INSTRUCTION: &str = "\
You are an AI assistant specialized in helping users with their notes.
You can summarize, explain, or provide insights based on the content of their notes.
Always answer clearly, concisely, and contextually using the notes provided.";

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("AI client not initialized (missing GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("request to model failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model returned no text")]
    EmptyResponse,
}

// ============================================================================
// Modes and Conversations
// ============================================================================

/// Which instruction template an AI request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Explain,
    Expand,
    Summarize,
    Question,
    Connect,
    Enhance,
    Chat,
    /// Fallback for a missing or unrecognised mode tag.
    Insight,
}

impl Mode {
    pub fn parse(tag: Option<&str>) -> Mode {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("explain") => Mode::Explain,
            Some("expand") => Mode::Expand,
            Some("summarize") => Mode::Summarize,
            Some("question") => Mode::Question,
            Some("connect") => Mode::Connect,
            Some("enhance") => Mode::Enhance,
            Some("chat") => Mode::Chat,
            _ => Mode::Insight,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Explain => "explain",
            Mode::Expand => "expand",
            Mode::Summarize => "summarize",
            Mode::Question => "question",
            Mode::Connect => "connect",
            Mode::Enhance => "enhance",
            Mode::Chat => "chat",
            Mode::Insight => "insight",
        }
    }

    /// The per-mode instruction wrapped around the highlighted text.
    pub fn instruction(&self, highlight: &str) -> String {
        match self {
            Mode::Explain => {
                format!("Explain the highlighted text in simple terms: \"{highlight}\"")
            }
            Mode::Expand => format!(
                "Add relevant details, examples, or elaboration for the highlighted text: \"{highlight}\""
            ),
            Mode::Summarize => {
                format!("Summarize the highlighted text concisely for notes: \"{highlight}\"")
            }
            Mode::Question => format!(
                "Generate a single clear question about the highlighted text for quizzing: \"{highlight}\""
            ),
            Mode::Connect => format!(
                "Show connections between this highlighted text and other parts of the notes: \"{highlight}\""
            ),
            Mode::Enhance | Mode::Chat | Mode::Insight => format!(
                "Provide a concise note-friendly insight for the highlighted text: \"{highlight}\""
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Map a stored chat role onto the model's two roles.
    pub fn from_chat_role(role: &str) -> Role {
        match role {
            "assistant" | "model" => Role::Model,
            _ => Role::User,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    fn user(text: String) -> Self {
        Turn {
            role: Role::User,
            text,
        }
    }
}

/// One model call: instruction, replayed history, and the new user message.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub model: &'static str,
    pub system_instruction: &'static str,
    pub history: Vec<Turn>,
    pub message: String,
}

pub fn inline_conversation(highlight: &str, notes: &str, mode: Mode) -> Conversation {
    Conversation {
        model: FAST_MODEL,
        system_instruction: NOTE_SYSTEM_INSTRUCTION,
        history: vec![Turn::user(format!(
            "Here are the notes:\n{}\n\nInstruction:\n{}",
            notes,
            mode.instruction(highlight)
        ))],
        message: highlight.to_string(),
    }
}

pub fn enhance_conversation(highlight: &str) -> Conversation {
    Conversation {
        model: FAST_MODEL,
        system_instruction: ENHANCE_SYSTEM_INSTRUCTION,
        history: vec![Turn::user(format!(
            "Enhance this highlighted text:\n\n{}",
            highlight
        ))],
        message: highlight.to_string(),
    }
}

pub fn chat_conversation(prompt: &str, notes: &str, messages: &[ChatMessage]) -> Conversation {
    let recent = &messages[messages.len().saturating_sub(CHAT_HISTORY_LIMIT)..];

    let mut history = Vec::with_capacity(recent.len() + 1);
    history.push(Turn::user(format!("Here are my notes:\n{}", notes)));
    history.extend(recent.iter().map(|m| Turn {
        role: Role::from_chat_role(&m.role),
        text: m.content.clone(),
    }));

    Conversation {
        model: CHAT_MODEL,
        system_instruction: CHAT_SYSTEM_INSTRUCTION,
        history,
        message: prompt.to_string(),
    }
}

// ============================================================================
// Text Generation
// ============================================================================

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, conversation: &Conversation) -> Result<String, AiError>;
}

/// Gemini `generateContent` over REST.
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn request_body(conversation: &Conversation) -> GenerateRequest<'_> {
    let mut contents: Vec<Content<'_>> = conversation
        .history
        .iter()
        .map(|turn| Content {
            role: Some(turn.role.as_str()),
            parts: vec![Part { text: &turn.text }],
        })
        .collect();
    contents.push(Content {
        role: Some(Role::User.as_str()),
        parts: vec![Part {
            text: &conversation.message,
        }],
    });

    GenerateRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: conversation.system_instruction,
            }],
        },
        contents,
    }
}

/// Concatenate the text parts of the first candidate.
fn response_text(response: GenerateResponse) -> Result<String, AiError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        Err(AiError::EmptyResponse)
    } else {
        Ok(text)
    }
}

impl GeminiClient {
    pub fn new(api_base: &str, api_key: Option<String>) -> Result<Self, AiError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, conversation: &Conversation) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base, conversation.model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(conversation))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response_text(response.json::<GenerateResponse>().await?)
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

pub async fn ai_inline(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AiRequest>,
) -> Result<Json<AiResponse>, ApiError> {
    let highlight = required(body.prompt.as_deref(), "Highlight is required")?;
    let mode = Mode::parse(body.mode.as_deref());
    let notes = body.context_html.as_deref().unwrap_or_default();

    let conversation = inline_conversation(highlight, notes, mode);
    debug!(mode = mode.as_str(), model = conversation.model, "inline AI request");

    let answer = state.ai.generate(&conversation).await?;
    Ok(Json(AiResponse { answer }))
}

pub async fn ai_enhance(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AiRequest>,
) -> Result<Json<AiResponse>, ApiError> {
    let highlight = required(body.prompt.as_deref(), "Highlight is required")?;
    debug!(model = FAST_MODEL, "enhance AI request");

    let answer = state.ai.generate(&enhance_conversation(highlight)).await?;
    Ok(Json(AiResponse { answer }))
}

pub async fn ai_chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AiRequest>,
) -> Result<Json<AiResponse>, ApiError> {
    let prompt = required(body.prompt.as_deref(), "Prompt is required")?;
    let notes = body.context_html.as_deref().unwrap_or_default();
    let messages = body.messages.as_deref().unwrap_or_default();

    let conversation = chat_conversation(prompt, notes, messages);
    debug!(
        model = conversation.model,
        history = conversation.history.len(),
        "chat AI request"
    );

    let answer = state.ai.generate(&conversation).await?;
    Ok(Json(AiResponse { answer }))
}
