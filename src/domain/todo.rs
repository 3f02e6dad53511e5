use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted TODO row. `id` and the timestamps are assigned by the store;
/// `subject` is guaranteed non-empty by handler-side validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub subject: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Request payloads decode leniently: a missing field takes its default and
// is caught by handler validation, not by the decoder.

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteTodoRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}
