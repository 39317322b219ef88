//! Contracts between a presenter and its two collaborators.
//!
//! # Responsibility
//! - Define the hooks a data holder (`Model`) and a presentation unit
//!   (`View`) implement, and the context they receive.
//! - Name the built-in registry keys the presenter dispatches through.
//!
//! # Invariants
//! - Models and views never receive each other; they communicate only through
//!   the registry in [`PresenterContext`].

use crate::diagnostics::Diagnostics;
use crate::record::ChangeNotifier;
use crate::registry::MethodRegistry;
use std::rc::{Rc, Weak};
use uuid::Uuid;

crate::method_keys! {
    /// Model hooks the presenter runs through the registry during init.
    pub enum ModelHook {
        InitializeNestedProperties,
        InitializeProperties,
        PostSetup,
    }
}

crate::method_keys! {
    /// View hooks the presenter runs through the registry.
    pub enum ViewHook {
        BindComplete,
        ListenersComplete,
        SetupComplete,
        UpdateView,
        ShowView,
        HideView,
    }
}

/// Presenter lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterState {
    Uninitialized,
    Initializing,
    Ready,
    Destroyed,
}

impl PresenterState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Destroyed => "destroyed",
        }
    }
}

/// What a model or view gets from its presenter.
#[derive(Debug, Clone)]
pub struct PresenterContext {
    presenter_id: Uuid,
    presenter_name: String,
    registry: Rc<MethodRegistry>,
    diagnostics: Diagnostics,
}

impl PresenterContext {
    pub(crate) fn new(
        presenter_id: Uuid,
        presenter_name: String,
        registry: Rc<MethodRegistry>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            presenter_id,
            presenter_name,
            registry,
            diagnostics,
        }
    }

    pub fn presenter_id(&self) -> Uuid {
        self.presenter_id
    }

    pub fn presenter_name(&self) -> &str {
        &self.presenter_name
    }

    pub fn registry(&self) -> &Rc<MethodRegistry> {
        &self.registry
    }

    /// Registry handle for closures stored in the registry itself or in
    /// long-lived elements; a strong handle there would keep it alive forever.
    pub fn weak_registry(&self) -> Weak<MethodRegistry> {
        Rc::downgrade(&self.registry)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

/// Data holder.
///
/// Hooks run in this order during presenter init: `register_methods`,
/// `setup`, then (after the view is bound) `initialize_nested_properties`,
/// `initialize_properties`, `post_setup`.
pub trait Model: 'static {
    /// Notifier of the record whose changes are forwarded to the view.
    fn notifier(&self) -> ChangeNotifier;

    /// Registers this model's handlers into the registry.
    fn register_methods(&mut self, ctx: &PresenterContext);

    /// Loads configuration and restores persisted values.
    fn setup(&mut self, _ctx: &PresenterContext) {}

    fn initialize_nested_properties(&mut self) {}

    /// Pushes initial values into the observable record.
    fn initialize_properties(&mut self) {}

    /// Starts periodic or background behavior.
    fn post_setup(&mut self) {}

    /// Runs on presenter destroy, before the registry is cleared.
    fn teardown(&mut self) {}

    /// Fields the view must render after init even if they never changed.
    fn initial_view_fields(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

/// Presentation unit.
pub trait View: 'static {
    /// Resolves UI elements.
    fn bind(&mut self, ctx: &PresenterContext);

    /// Registers this view's own handlers into the registry.
    fn register_methods(&mut self, _ctx: &PresenterContext) {}

    fn on_bind_complete(&mut self) {}

    /// Wires element listeners that raise intents.
    fn on_listeners_complete(&mut self) {}

    fn on_setup_complete(&mut self) {}

    /// Refreshes only the elements that depend on `field`.
    ///
    /// A change raised while this view is inside another hook is delivered
    /// right after that hook returns.
    fn update_view(&mut self, field: &str);

    fn show_view(&mut self);

    fn hide_view(&mut self);
}

/// Activation and destruction signals from the hosting environment.
pub trait HostLifecycle {
    fn on_activate(&mut self);

    fn on_destroy(&mut self);
}
