#![forbid(unsafe_code)]

//! Remote API surface.
//!
//! The forms service and the form-responses service are external
//! collaborators: this module defines their wire types and trait seams, not
//! a transport. Implementations (HTTP, in-memory fakes) live with the
//! embedding application; everything here is what the rest of formgrid can
//! rely on.
//!
//! Reads tolerate last-completed-wins: two in-flight fetches may resolve in
//! either order and the caller keeps whichever state arrived last. Nothing
//! here sequences or cancels requests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use formgrid_engine::DragSnapshot;
use formgrid_schema::FormStructure;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from remote API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The transport could not reach the service.
    Connect(String),
    /// The service answered with a non-2xx status.
    Status(u16),
    /// The response body could not be decoded.
    Decode(String),
    /// The referenced record does not exist.
    NotFound,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Connect(msg) => write!(f, "connection failed: {msg}"),
            ApiError::Status(code) => write!(f, "unexpected status {code}"),
            ApiError::Decode(msg) => write!(f, "decode error: {msg}"),
            ApiError::NotFound => write!(f, "record not found"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Server-side form identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FormId(pub Uuid);

impl FormId {
    /// Generate a fresh random form id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for FormId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Browser-session identifier attached to submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a fresh random session id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Forms service
// ---------------------------------------------------------------------------

/// One entry in the forms listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSummary {
    /// Form id.
    pub id: FormId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Author.
    pub created_by: String,
    /// Server-side creation timestamp, RFC 3339.
    pub created_at: String,
}

/// A full form record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    /// Form id.
    pub id: FormId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// The exported schema the renderer consumes.
    pub form_data: FormStructure,
    /// The builder state, kept so the form can be reopened for editing.
    pub drag_structure: DragSnapshot,
    /// Author.
    pub created_by: String,
}

/// Payload for creating a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewForm {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// The exported schema.
    pub form_data: FormStructure,
    /// The builder state.
    pub drag_structure: DragSnapshot,
    /// Author.
    pub created_by: String,
}

/// The forms service.
pub trait FormsApi {
    /// List all form summaries.
    fn list(&self) -> ApiResult<Vec<FormSummary>>;

    /// Fetch one full form record.
    fn get(&self, id: FormId) -> ApiResult<FormRecord>;

    /// Create a form, returning the stored record with its assigned id.
    fn create(&self, form: &NewForm) -> ApiResult<FormRecord>;

    /// Delete a form.
    fn delete(&self, id: FormId) -> ApiResult<()>;
}

// ---------------------------------------------------------------------------
// Form-responses service
// ---------------------------------------------------------------------------

/// One submitted answer: a single value or, for multi-selects, several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    /// One value.
    One(String),
    /// Several values (multi-select fields).
    Many(Vec<String>),
}

impl ResponseValue {
    /// The values as a flat slice-like iterator.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        match self {
            ResponseValue::One(v) => std::slice::from_ref(v).iter().map(String::as_str),
            ResponseValue::Many(vs) => vs.as_slice().iter().map(String::as_str),
        }
    }
}

/// A stored response record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Record id.
    pub id: Uuid,
    /// The form answered.
    pub form_id: FormId,
    /// Submitting session.
    pub session_id: SessionId,
    /// Field key to answer.
    pub responses: BTreeMap<String, ResponseValue>,
    /// Server-side creation timestamp, RFC 3339.
    pub created_at: String,
}

/// Payload for submitting a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSubmission {
    /// The form answered.
    pub form_id: FormId,
    /// Submitting session.
    pub session_id: SessionId,
    /// Field key to answer.
    pub responses: BTreeMap<String, ResponseValue>,
    /// Submitting user agent.
    pub user_agent: String,
    /// Client-side submission timestamp, RFC 3339.
    pub submitted_at: String,
}

/// The form-responses service.
pub trait FormResponsesApi {
    /// All responses recorded for one form.
    fn list_for_form(&self, form: FormId) -> ApiResult<Vec<ResponseRecord>>;

    /// Submit one response.
    fn submit(&self, submission: &ResponseSubmission) -> ApiResult<()>;
}
