//! Presenter: owns one model and one view and wires them together.
//!
//! # Responsibility
//! - Run the fixed initialization sequence exactly once.
//! - Forward model change notifications to the view through the registry.
//! - Tear everything down on the host's destroy signal.
//!
//! # Invariants
//! - `initialize` only acts from `Uninitialized`; every other call is a no-op.
//! - A missing collaborator aborts init back to `Uninitialized` after a report.
//! - The view has live element handles before any model value is pushed, and
//!   `post_setup` runs after the view finished its own setup.
//! - Nothing here panics on wiring faults; they are reported and skipped.
//! - A change forwarded while the view is busy is replayed as soon as the
//!   view is released, in arrival order.

use super::contract::{
    HostLifecycle, Model, ModelHook, PresenterContext, PresenterState, View, ViewHook,
};
use crate::diagnostics::{Diagnostics, MvpError, Role};
use crate::record::{ChangeNotifier, SubscriptionId};
use crate::registry::{MethodKey, MethodRegistry};
use log::{debug, error, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use uuid::Uuid;

/// Coordinator of one model/view pair.
pub struct Presenter<M: Model, V: View> {
    id: Uuid,
    name: String,
    state: Rc<Cell<PresenterState>>,
    model: Option<Rc<RefCell<M>>>,
    view: Option<Rc<RefCell<V>>>,
    registry: Rc<MethodRegistry>,
    diagnostics: Diagnostics,
    forwarding: Option<(ChangeNotifier, SubscriptionId)>,
    pending: PendingUpdates,
}

/// Field names forwarded while the view was mid-hook.
#[derive(Clone, Default)]
struct PendingUpdates {
    fields: Rc<RefCell<VecDeque<String>>>,
}

impl PendingUpdates {
    fn push(&self, field: String) {
        self.fields.borrow_mut().push_back(field);
    }

    fn len(&self) -> usize {
        self.fields.borrow().len()
    }

    fn clear(&self) {
        self.fields.borrow_mut().clear();
    }

    /// Replays queued fields until the queue is empty or the view is busy again.
    fn flush<V: View>(&self, view: &RefCell<V>) {
        loop {
            let next = self.fields.borrow_mut().pop_front();
            let Some(field) = next else {
                break;
            };
            let borrowed = view.try_borrow_mut();
            match borrowed {
                Ok(mut view) => view.update_view(&field),
                Err(_) => {
                    self.fields.borrow_mut().push_front(field);
                    break;
                }
            }
        }
    }
}

impl<M: Model, V: View> Presenter<M, V> {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let diagnostics = Diagnostics::new();
        Self {
            id: Uuid::new_v4(),
            registry: Rc::new(MethodRegistry::new(name.clone(), diagnostics.clone())),
            name,
            state: Rc::new(Cell::new(PresenterState::Uninitialized)),
            model: None,
            view: None,
            diagnostics,
            forwarding: None,
            pending: PendingUpdates::default(),
        }
    }

    pub fn with_model(mut self, model: M) -> Self {
        self.attach_model(model);
        self
    }

    pub fn with_view(mut self, view: V) -> Self {
        self.attach_view(view);
        self
    }

    pub fn attach_model(&mut self, model: M) {
        self.model = Some(Rc::new(RefCell::new(model)));
    }

    pub fn attach_view(&mut self, view: V) {
        self.view = Some(Rc::new(RefCell::new(view)));
    }

    /// Runs the init sequence. Returns `true` only for the call that reached
    /// `Ready`.
    pub fn initialize(&mut self) -> bool {
        if self.state.get() != PresenterState::Uninitialized {
            debug!(
                "event=presenter_init module=presenter status=skip presenter={} state={}",
                self.name,
                self.state.get().as_str()
            );
            return false;
        }
        self.state.set(PresenterState::Initializing);
        info!(
            "event=presenter_init module=presenter status=start presenter={} id={}",
            self.name, self.id
        );

        let (model, view) = match (self.model.clone(), self.view.clone()) {
            (Some(model), Some(view)) => (model, view),
            (model, view) => {
                if model.is_none() {
                    self.report_missing(Role::Model);
                }
                if view.is_none() {
                    self.report_missing(Role::View);
                }
                error!(
                    "event=presenter_init module=presenter status=error presenter={} error_code=missing_collaborator",
                    self.name
                );
                self.state.set(PresenterState::Uninitialized);
                return false;
            }
        };

        self.subscribe_forwarding(&model);

        let ctx = self.context();
        self.register_model_hooks(&model, &view);
        {
            let mut model = model.borrow_mut();
            model.register_methods(&ctx);
            model.setup(&ctx);
        }

        view.borrow_mut().bind(&ctx);
        self.register_view_hooks(&view);
        view.borrow_mut().register_methods(&ctx);

        let registry = &self.registry;
        registry.invoke0(ViewHook::BindComplete);
        registry.invoke0(ViewHook::ListenersComplete);
        registry.invoke0(ModelHook::InitializeNestedProperties);
        registry.invoke0(ModelHook::InitializeProperties);
        registry.invoke0(ViewHook::SetupComplete);
        registry.invoke0(ModelHook::PostSetup);

        let initial_fields = model.borrow().initial_view_fields();
        for field in initial_fields {
            self.force_update_view(field);
        }

        self.state.set(PresenterState::Ready);
        info!(
            "event=presenter_init module=presenter status=ok presenter={} id={} methods={}",
            self.name,
            self.id,
            self.registry.len()
        );
        true
    }

    /// Dispatches `UpdateView(field)` whether or not the field changed.
    pub fn force_update_view(&self, field: &str) -> bool {
        self.registry
            .invoke1(ViewHook::UpdateView, field.to_string())
    }

    pub fn show_view(&self) -> bool {
        self.dispatch_visibility(ViewHook::ShowView)
    }

    pub fn hide_view(&self) -> bool {
        self.dispatch_visibility(ViewHook::HideView)
    }

    /// Detaches from the model, runs model teardown and clears the registry.
    pub fn destroy(&mut self) {
        let previous = self.state.get();
        if previous == PresenterState::Destroyed {
            return;
        }

        if let Some((notifier, subscription)) = self.forwarding.take() {
            notifier.unsubscribe(subscription);
        }

        if previous == PresenterState::Ready {
            if let Some(model) = &self.model {
                match model.try_borrow_mut() {
                    Ok(mut model) => model.teardown(),
                    Err(_) => self.diagnostics.report(
                        &self.name,
                        MvpError::ReentrantDispatch {
                            component: self.name.clone(),
                            key: "Model::teardown".to_string(),
                        },
                    ),
                }
            }
        }

        self.registry.clear();
        self.pending.clear();
        self.state.set(PresenterState::Destroyed);
        info!(
            "event=presenter_destroy module=presenter status=ok presenter={} id={} from_state={}",
            self.name,
            self.id,
            previous.as_str()
        );
    }

    pub fn state(&self) -> PresenterState {
        self.state.get()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &Rc<MethodRegistry> {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// View updates waiting for the view to finish its current hook.
    pub fn pending_view_updates(&self) -> usize {
        self.pending.len()
    }

    pub fn model(&self) -> Option<&Rc<RefCell<M>>> {
        self.model.as_ref()
    }

    pub fn view(&self) -> Option<&Rc<RefCell<V>>> {
        self.view.as_ref()
    }

    /// Context handed to the model and view.
    pub fn context(&self) -> PresenterContext {
        PresenterContext::new(
            self.id,
            self.name.clone(),
            Rc::clone(&self.registry),
            self.diagnostics.clone(),
        )
    }

    fn subscribe_forwarding(&mut self, model: &Rc<RefCell<M>>) {
        let notifier = model.borrow().notifier();
        let registry = Rc::downgrade(&self.registry);
        let state = Rc::clone(&self.state);
        let diagnostics = self.diagnostics.clone();
        let name = self.name.clone();

        let subscription = notifier.subscribe(move |field| {
            let Some(registry) = registry.upgrade() else {
                return;
            };
            if !registry.contains(ViewHook::UpdateView) {
                if state.get() == PresenterState::Ready {
                    diagnostics.report(
                        &name,
                        MvpError::MissingCollaborator {
                            component: name.clone(),
                            role: Role::View,
                        },
                    );
                } else {
                    debug!(
                        "event=view_forward module=presenter status=skip presenter={} field={} reason=view_not_bound",
                        name, field
                    );
                }
                return;
            }
            registry.invoke1(ViewHook::UpdateView, field.to_string());
        });
        self.forwarding = Some((notifier, subscription));
    }

    fn register_model_hooks(&self, model: &Rc<RefCell<M>>, view: &Rc<RefCell<V>>) {
        self.register_hook(model, view, ModelHook::InitializeNestedProperties, |model| {
            model.initialize_nested_properties()
        });
        self.register_hook(model, view, ModelHook::InitializeProperties, |model| {
            model.initialize_properties()
        });
        self.register_hook(model, view, ModelHook::PostSetup, |model| model.post_setup());
    }

    fn register_view_hooks(&self, view: &Rc<RefCell<V>>) {
        self.register_hook(view, view, ViewHook::BindComplete, |view| view.on_bind_complete());
        self.register_hook(view, view, ViewHook::ListenersComplete, |view| {
            view.on_listeners_complete()
        });
        self.register_hook(view, view, ViewHook::SetupComplete, |view| {
            view.on_setup_complete()
        });
        self.register_hook(view, view, ViewHook::ShowView, |view| view.show_view());
        self.register_hook(view, view, ViewHook::HideView, |view| view.hide_view());

        let target = Rc::downgrade(view);
        let pending = self.pending.clone();
        let name = self.name.clone();
        // Failures are already reported by the registry.
        let _ = self
            .registry
            .register1(ViewHook::UpdateView, move |field: String| {
                let Some(view) = target.upgrade() else {
                    return;
                };
                let borrowed = view.try_borrow_mut();
                match borrowed {
                    Ok(mut busy) => busy.update_view(&field),
                    Err(_) => {
                        debug!(
                            "event=view_forward module=presenter status=deferred presenter={} field={}",
                            name, field
                        );
                        pending.push(field);
                        return;
                    }
                }
                pending.flush(&*view);
            });
    }

    /// Registers `run` under `key`; afterwards replays view updates that
    /// arrived while `view` was busy.
    fn register_hook<T: 'static, K: MethodKey>(
        &self,
        target: &Rc<RefCell<T>>,
        view: &Rc<RefCell<V>>,
        key: K,
        run: impl Fn(&mut T) + 'static,
    ) {
        let target = Rc::downgrade(target);
        let view = Rc::downgrade(view);
        let pending = self.pending.clone();
        let diagnostics = self.diagnostics.clone();
        let name = self.name.clone();
        let _ = self.registry.register0(key, move || {
            let Some(target) = target.upgrade() else {
                return;
            };
            let borrowed = target.try_borrow_mut();
            match borrowed {
                Ok(mut target) => run(&mut *target),
                Err(_) => {
                    diagnostics.report(
                        &name,
                        MvpError::ReentrantDispatch {
                            component: name.clone(),
                            key: key.label().to_string(),
                        },
                    );
                    return;
                }
            }
            if let Some(view) = view.upgrade() {
                pending.flush(&*view);
            }
        });
    }

    fn dispatch_visibility(&self, key: ViewHook) -> bool {
        if self.view.is_none() {
            warn!(
                "event=view_visibility module=presenter status=skip presenter={} key={}",
                self.name,
                key.as_str()
            );
            self.report_missing(Role::View);
            return false;
        }
        self.registry.invoke0(key)
    }

    fn report_missing(&self, role: Role) {
        self.diagnostics.report(
            &self.name,
            MvpError::MissingCollaborator {
                component: self.name.clone(),
                role,
            },
        );
    }
}

impl<M: Model, V: View> HostLifecycle for Presenter<M, V> {
    fn on_activate(&mut self) {
        self.initialize();
    }

    fn on_destroy(&mut self) {
        self.destroy();
    }
}
