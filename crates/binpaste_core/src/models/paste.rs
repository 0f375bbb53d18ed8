//! Paste-related data models and content policy checks.

use crate::constants::{
    MAX_CONTENT_CHARS, MAX_TITLE_CHARS, MIN_CONTENT_CHARS, MIN_SEARCH_TERM_CHARS, UNTITLED,
};
use crate::error::AppError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Full paste representation returned by the API.
///
/// The core passes it through unmodified; `content` is ciphertext when
/// `is_encrypted` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub size_in_bytes: usize,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_erasable: bool,
    #[serde(default)]
    pub is_encrypted: bool,
    #[serde(default)]
    pub is_one_time: bool,
    #[serde(default)]
    pub is_permanent: bool,
    pub date_created: NaiveDateTime,
    #[serde(default)]
    pub date_of_expiry: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_viewed: Option<NaiveDateTime>,
    #[serde(default)]
    pub views: u64,
}

/// Lightweight row used by the recent-pastes list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub size_in_bytes: usize,
    #[serde(default)]
    pub is_encrypted: bool,
    pub date_created: NaiveDateTime,
    #[serde(default)]
    pub date_of_expiry: Option<NaiveDateTime>,
}

/// Title and body carried from a paste being cloned into the create form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteDraft {
    pub title: Option<String>,
    pub content: String,
}

/// How long the API keeps a paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Expiry {
    OneHour,
    OneDay,
    OneWeek,
    OneMonth,
    ThreeMonths,
    OneYear,
    Never,
}

/// Who can discover a paste.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Exposure {
    /// Listed and searchable.
    #[default]
    Public,
    /// Reachable by link only.
    Unlisted,
    /// Deleted after the first read.
    Once,
}

/// Request payload for creating a paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePasteCmd {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub is_encrypted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<Expiry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposure: Option<Exposure>,
}

impl PasteRecord {
    /// Title for display, falling back to a placeholder.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Whether the clone action is offered for this paste.
    ///
    /// Encrypted bodies are ciphertext, and non-public pastes must not leak
    /// into a new public paste by accident.
    pub fn is_cloneable(&self) -> bool {
        self.is_public && !self.is_encrypted
    }

    /// Draft pre-filling the create form from this paste.
    pub fn to_draft(&self) -> PasteDraft {
        PasteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

impl From<&PasteRecord> for PasteSummary {
    fn from(value: &PasteRecord) -> Self {
        Self {
            id: value.id.clone(),
            title: value.title.clone(),
            size_in_bytes: value.size_in_bytes,
            is_encrypted: value.is_encrypted,
            date_created: value.date_created,
            date_of_expiry: value.date_of_expiry,
        }
    }
}

/// Trim a title and drop it when blank.
///
/// # Errors
/// Returns [`AppError::BadRequest`] when the trimmed title is too long.
pub fn normalize_title(title: Option<String>) -> Result<Option<String>, AppError> {
    let Some(title) = title else {
        return Ok(None);
    };
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::BadRequest(format!(
            "title exceeds {} characters",
            MAX_TITLE_CHARS
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Check a plaintext body against the upstream content policy.
///
/// # Errors
/// Returns [`AppError::BadRequest`] for blank, too short or too long bodies.
pub fn validate_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(AppError::BadRequest("content must not be blank".to_string()));
    }
    let chars = content.chars().count();
    if chars < MIN_CONTENT_CHARS {
        return Err(AppError::BadRequest(format!(
            "content must be at least {} characters",
            MIN_CONTENT_CHARS
        )));
    }
    if chars > MAX_CONTENT_CHARS {
        return Err(AppError::BadRequest(format!(
            "content exceeds {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(())
}

/// Normalize a search term, dropping terms too short to send.
///
/// # Returns
/// The trimmed term when it has at least [`MIN_SEARCH_TERM_CHARS`] characters.
pub fn effective_search_term(term: &str) -> Option<&str> {
    let trimmed = term.trim();
    (trimmed.chars().count() >= MIN_SEARCH_TERM_CHARS).then_some(trimmed)
}
