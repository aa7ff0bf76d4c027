//! Board state repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide raw keyed read/write/remove of one serialized payload.
//! - Keep SQL details inside the repository boundary.
//!
//! # Invariants
//! - A write replaces any prior payload under the same key wholesale.
//! - Repositories never interpret the payload.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by state repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from state repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Write would exceed the repository's storage quota.
    QuotaExceeded { limit: usize, requested: usize },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded { limit, requested } => write!(
                f,
                "state storage quota exceeded: {requested} bytes requested, limit {limit}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "state repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "state repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Keyed storage for serialized board state.
///
/// Implementations take `&self`; hosts are single-threaded and cooperative,
/// so interior mutability is enough for in-process backends.
pub trait StateRepository {
    /// Loads the payload stored under `key`, if any.
    fn read_state(&self, key: &str) -> RepoResult<Option<String>>;
    /// Stores `payload` under `key`, replacing any previous value.
    fn write_state(&self, key: &str, payload: &str) -> RepoResult<()>;
    /// Removes `key`. Returns whether a value was present.
    fn remove_state(&self, key: &str) -> RepoResult<bool>;
}

impl<R: StateRepository + ?Sized> StateRepository for &R {
    fn read_state(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read_state(key)
    }

    fn write_state(&self, key: &str, payload: &str) -> RepoResult<()> {
        (**self).write_state(key, payload)
    }

    fn remove_state(&self, key: &str) -> RepoResult<bool> {
        (**self).remove_state(key)
    }
}

/// SQLite-backed state repository over the `board_state` table.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_state_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn read_state(&self, key: &str) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload
                 FROM board_state
                 WHERE state_key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_state(&self, key: &str, payload: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO board_state (state_key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(state_key) DO UPDATE
             SET payload = excluded.payload,
                 updated_at = excluded.updated_at;",
            params![key, payload],
        )?;
        Ok(())
    }

    fn remove_state(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM board_state WHERE state_key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

fn ensure_state_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'board_state'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable("board_state"));
    }
    Ok(())
}
