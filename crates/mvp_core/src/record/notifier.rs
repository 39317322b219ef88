//! Field-changed subscriber list.

use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

type Handler = Rc<dyn Fn(&str)>;

/// Token returned by [`ChangeNotifier::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Shared list of field-changed handlers.
///
/// Clones share the same list. Delivery iterates over a snapshot taken when
/// `notify` starts, so handlers may subscribe, unsubscribe or trigger further
/// notifications without invalidating the current pass.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    inner: Rc<NotifierInner>,
}

#[derive(Default)]
struct NotifierInner {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SubscriptionId, Handler)>>,
}

/// Non-owning reference to a [`ChangeNotifier`].
#[derive(Clone)]
pub struct WeakNotifier {
    inner: Weak<NotifierInner>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler that receives the changed field name.
    pub fn subscribe(&self, handler: impl Fn(&str) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .handlers
            .borrow_mut()
            .push((id, Rc::new(handler)));
        id
    }

    /// Removes one handler. Returns `false` when `id` is not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.inner.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() < before
    }

    /// Delivers `field` to every handler subscribed at call time, in
    /// subscription order.
    pub fn notify(&self, field: &str) {
        let snapshot: Vec<Handler> = self
            .inner
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in snapshot {
            handler(field);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }

    pub fn clear(&self) {
        self.inner.handlers.borrow_mut().clear();
    }

    pub fn downgrade(&self) -> WeakNotifier {
        WeakNotifier {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether both handles share one subscriber list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl WeakNotifier {
    pub fn upgrade(&self) -> Option<ChangeNotifier> {
        self.inner.upgrade().map(|inner| ChangeNotifier { inner })
    }
}

impl Debug for ChangeNotifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
