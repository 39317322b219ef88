//! Observable data holders.
//!
//! # Responsibility
//! - Store named, statically-keyed fields with per-type default reads.
//! - Notify subscribers synchronously when a field really changes.
//! - Relay changes of nested records as the outer record's own changes.
//!
//! # Invariants
//! - All bookkeeping and every notification finish before `set` returns.
//! - Records are single-threaded (`Rc`-based) and never shared across
//!   threads.

mod field;
mod notifier;
mod observable;

pub use field::{FieldKey, FieldValue};
pub use notifier::{ChangeNotifier, SubscriptionId, WeakNotifier};
pub use observable::ObservableRecord;
