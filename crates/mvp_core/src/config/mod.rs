//! Static configuration records loaded once at model setup.
//!
//! # Responsibility
//! - Deserialize level-indexed upgrade tables from JSON.
//! - Validate tables before any model reads them.
//!
//! # Invariants
//! - Every table has non-empty `values` and `costs` of equal length.
//! - Level accessors never panic; out-of-range levels return `None`.

mod upgrade;

pub use upgrade::{ConfigError, ConfigResult, UpgradeCatalog, UpgradeTable};
