//! SQLite storage behind the persisted settings store.
//!
//! # Responsibility
//! - Open file or in-memory connections with the schema migrated.
//! - Name what failed (open target, migration version, setting key) so
//!   a settings error in the log points at its cause.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Nothing reads or writes settings before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Settings database failures.
#[derive(Debug)]
pub enum DbError {
    /// The connection could not be opened or configured.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    VersionRead(rusqlite::Error),
    /// The file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// Reading or writing one setting failed.
    Setting {
        key: String,
        source: rusqlite::Error,
    },
}

impl DbError {
    /// Stable snake_case code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "settings_open_failed",
            Self::VersionRead(_) => "schema_version_unreadable",
            Self::SchemaTooNew { .. } => "schema_too_new",
            Self::Migration { .. } => "migration_failed",
            Self::Setting { .. } => "setting_io_failed",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open settings database `{target}`: {source}")
            }
            Self::VersionRead(source) => {
                write!(f, "cannot read settings schema version: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "settings database schema v{found} is newer than this build supports (v{supported})"
            ),
            Self::Migration { version, source } => {
                write!(f, "settings migration v{version} failed: {source}")
            }
            Self::Setting { key, source } => write!(f, "setting `{key}` failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. }
            | Self::Migration { source, .. }
            | Self::Setting { source, .. }
            | Self::VersionRead(source) => Some(source),
            Self::SchemaTooNew { .. } => None,
        }
    }
}
