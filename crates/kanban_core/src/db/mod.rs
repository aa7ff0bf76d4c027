//! Board database bootstrap.
//!
//! # Responsibility
//! - Open SQLite connections that back the persisted board snapshot.
//! - Bring the `board_state` table up to the schema this binary expects.
//!
//! # Invariants
//! - The applied schema version lives in `PRAGMA user_version`.
//! - A connection handed out by this module is fully migrated.
//! - A database stamped by a newer binary is never touched.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening or migrating the board database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected a connection-level statement.
    Sqlite(rusqlite::Error),
    /// One migration step failed; nothing from the batch was committed.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// Stored `user_version` is ahead of `migrations::latest_version()`.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Schema version the failure is tied to, if any.
    pub fn schema_version(&self) -> Option<u32> {
        match self {
            Self::Sqlite(_) => None,
            Self::Migration { version, .. } => Some(*version),
            Self::UnsupportedSchemaVersion { db_version, .. } => Some(*db_version),
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "board database error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "board schema migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "board database is at schema {db_version}; this build knows up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
