//! SQLite-backed settings store.

use super::SettingsStore;
use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Settings persisted in the `settings` table.
pub struct SqliteSettingsStore {
    conn: Connection,
}

impl SqliteSettingsStore {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn try_get_int(&self, key: &str) -> DbResult<Option<i64>> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1;",
                params![key],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map_err(|source| setting_error(key, source))
    }

    pub fn try_set_int(&self, key: &str, value: i64) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = strftime('%s', 'now');",
            params![key, value],
        )
        .map(|_| ())
        .map_err(|source| setting_error(key, source))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn setting_error(key: &str, source: rusqlite::Error) -> DbError {
    DbError::Setting {
        key: key.to_string(),
        source,
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.try_get_int(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                error!(
                    "event=settings_get module=settings status=error key={} error_code={} error={}",
                    key,
                    err.code(),
                    err
                );
                default
            }
        }
    }

    fn set_int(&self, key: &str, value: i64) {
        match self.try_set_int(key, value) {
            Ok(()) => debug!(
                "event=settings_set module=settings status=ok key={} value={}",
                key, value
            ),
            Err(err) => error!(
                "event=settings_set module=settings status=error key={} error_code={} error={}",
                key,
                err.code(),
                err
            ),
        }
    }
}
