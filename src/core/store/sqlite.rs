//! SQLite-backed verification record store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};
use uuid::Uuid;

use super::record::{InsertOutcome, NewVerificationRecord, VerificationRecord};
use super::{Result, StoreError, VerificationStore};

/// In-memory database location understood by SQLite.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Resolves a `DATABASE_URL` value to a SQLite location.
///
/// Accepts `sqlite://path`, `sqlite:path`, `:memory:` and bare paths.
pub fn database_path(database_url: &str) -> Result<PathBuf> {
    let trimmed = database_url.trim();
    let path = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);

    if path.is_empty() {
        return Err(StoreError::InvalidConfig(
            "DATABASE_URL does not name a database file".to_string(),
        ));
    }

    if path.contains("://") {
        return Err(StoreError::InvalidConfig(format!(
            "Unsupported database URL scheme: {database_url}"
        )));
    }

    Ok(PathBuf::from(path))
}

/// Verification records in a single SQLite table.
///
/// The connection is shared behind a mutex; every statement runs on the
/// blocking thread pool.
#[derive(Clone)]
pub struct SqliteVerificationStore {
    conn: Arc<Mutex<Connection>>,
    location: PathBuf,
}

impl std::fmt::Debug for SqliteVerificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteVerificationStore")
            .field("location", &self.location)
            .finish()
    }
}

impl SqliteVerificationStore {
    /// Opens (creating if needed) the database at `path` and applies the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let location = path.as_ref().to_path_buf();

        let conn = if location.as_os_str() == MEMORY_DATABASE {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = location.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            Connection::open(&location)?
        };

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            location,
        };
        store.migrate()?;
        info!(location = %store.location.display(), "Verification store opened");
        Ok(store)
    }

    /// Opens the store named by a `DATABASE_URL` value.
    pub fn from_url(database_url: &str) -> Result<Self> {
        Self::open(database_path(database_url)?)
    }

    /// Opens a private in-memory store.
    pub fn in_memory() -> Result<Self> {
        Self::open(MEMORY_DATABASE)
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS domain_verification (
              id TEXT PRIMARY KEY,
              domain TEXT NOT NULL,
              token TEXT NOT NULL,
              content TEXT NOT NULL,
              is_verified INTEGER NOT NULL DEFAULT 0,
              created_at_ms INTEGER NOT NULL,
              verified_at_ms INTEGER,
              UNIQUE (domain, token)
            );

            CREATE INDEX IF NOT EXISTS idx_domain_verification_token
              ON domain_verification (token, created_at_ms);
            "#,
        )?;
        Ok(())
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("store task failed: {e}")))?
    }
}

fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Backend(format!("invalid timestamp in store: {ms}")))
}

fn insert_record(
    conn: &Connection,
    record: &NewVerificationRecord,
    now: DateTime<Utc>,
) -> Result<InsertOutcome> {
    let changed = conn.execute(
        "INSERT INTO domain_verification (id, domain, token, content, is_verified, created_at_ms, verified_at_ms) \
         VALUES (?1, ?2, ?3, ?4, 0, ?5, NULL) \
         ON CONFLICT (domain, token) DO NOTHING",
        params![
            Uuid::new_v4().to_string(),
            record.domain,
            record.token,
            record.content,
            now.timestamp_millis(),
        ],
    )?;

    Ok(if changed == 0 {
        InsertOutcome::AlreadyPresent
    } else {
        InsertOutcome::Inserted
    })
}

fn find_latest(conn: &Connection, token: &str) -> Result<Option<VerificationRecord>> {
    let row = conn
        .query_row(
            "SELECT id, domain, token, content, is_verified, created_at_ms, verified_at_ms \
             FROM domain_verification \
             WHERE token = ?1 \
             ORDER BY created_at_ms DESC, rowid DESC \
             LIMIT 1",
            params![token],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, bool>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, Option<i64>>(6)?,
                ))
            },
        )
        .optional()?;

    let Some((id, domain, token, content, is_verified, created_at_ms, verified_at_ms)) = row else {
        return Ok(None);
    };

    Ok(Some(VerificationRecord {
        id,
        domain,
        token,
        content,
        is_verified,
        created_at: millis_to_datetime(created_at_ms)?,
        verified_at: verified_at_ms.map(millis_to_datetime).transpose()?,
    }))
}

#[async_trait]
impl VerificationStore for SqliteVerificationStore {
    async fn insert(&self, record: NewVerificationRecord) -> Result<InsertOutcome> {
        let outcome = self
            .with_conn(move |conn| insert_record(conn, &record, Utc::now()))
            .await?;
        debug!(?outcome, "Verification record insert finished");
        Ok(outcome)
    }

    async fn find_latest_by_token(&self, token: &str) -> Result<Option<VerificationRecord>> {
        let token = token.to_string();
        self.with_conn(move |conn| find_latest(conn, &token)).await
    }
}
