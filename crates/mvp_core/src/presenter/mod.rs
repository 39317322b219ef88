//! Coordinator that wires one model to one view.
//!
//! # Responsibility
//! - Own the model, the view and the per-presenter method registry.
//! - Drive the initialization sequence and forward model changes to the view.
//!
//! # See also
//! - `registry::MethodRegistry` for keyed dispatch.
//! - `record::ObservableRecord` for change notification.

mod contract;
mod coordinator;

pub use contract::{
    HostLifecycle, Model, ModelHook, PresenterContext, PresenterState, View, ViewHook,
};
pub use coordinator::Presenter;
