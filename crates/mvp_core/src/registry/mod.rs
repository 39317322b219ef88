//! Method registry shared by a presenter, its model and its view.
//!
//! Lets the model and view expose operations under stable symbolic keys
//! without holding typed references to each other.

mod key;
mod method_registry;

pub use key::MethodKey;
pub use method_registry::MethodRegistry;
