use chrono::{DateTime, Utc};
use serde::Serialize;

/// One stored verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    pub id: String,
    /// Hostname of the verified site.
    pub domain: String,
    /// Lookup key taken from the verification file name.
    pub token: String,
    /// Exact body served for the verification file.
    pub content: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

/// Fields supplied by the caller when persisting a verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVerificationRecord {
    pub domain: String,
    pub token: String,
    pub content: String,
}

impl NewVerificationRecord {
    pub fn new(
        domain: impl Into<String>,
        token: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            token: token.into(),
            content: content.into(),
        }
    }
}

/// Result of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted,
    /// A row for the same domain and token already existed; nothing changed.
    AlreadyPresent,
}
