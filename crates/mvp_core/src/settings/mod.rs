//! Persisted key-value settings used by models to survive restarts.
//!
//! # Responsibility
//! - Define the integer get/set contract models depend on.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - `get_int` never fails; an absent key or a storage error yields `default`.
//! - `set_int` never fails; a storage error is logged and the write skipped.

mod memory;
mod sqlite;

pub use memory::MemorySettingsStore;
pub use sqlite::SqliteSettingsStore;

/// Integer settings injected into a model at setup.
pub trait SettingsStore {
    fn get_int(&self, key: &str, default: i64) -> i64;

    fn set_int(&self, key: &str, value: i64);
}
