//! Durable storage for issued verification files.
//!
//! Google fetches `/google<token>.html` some time after the token was issued,
//! possibly from a different process than the one that requested it, so the
//! content lives in the database rather than in memory.

use async_trait::async_trait;
use thiserror::Error;

pub mod record;
pub mod sqlite;

pub use record::{InsertOutcome, NewVerificationRecord, VerificationRecord};
pub use sqlite::{SqliteVerificationStore, database_path};

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// Backend-specific error.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence interface for verification records.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Persists a record. Re-inserting the same domain and token is not an error.
    async fn insert(&self, record: NewVerificationRecord) -> Result<InsertOutcome>;

    /// Returns the most recently created record for `token`.
    async fn find_latest_by_token(&self, token: &str) -> Result<Option<VerificationRecord>>;
}
