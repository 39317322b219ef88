//! Observable record with nested-record relay.
//!
//! # Invariants
//! - `set` with a value equal to the current one (or to the default, for an
//!   absent field) changes nothing and notifies nobody.
//! - On a real change, relay bookkeeping finishes before subscribers run:
//!   the old nested record loses the relay, the new one gains it.
//! - A relayed change is re-emitted under the inner field's own name.

use super::field::{FieldKey, FieldValue};
use super::notifier::{ChangeNotifier, SubscriptionId};
use log::warn;
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Named-field data holder with change notification.
///
/// This is a shared handle: clones observe and mutate the same fields.
/// Two handles compare equal only when they point at the same record.
pub struct ObservableRecord<F: FieldKey> {
    inner: Rc<RecordInner<F>>,
}

struct RecordInner<F: FieldKey> {
    values: RefCell<HashMap<F, Box<dyn Any>>>,
    relays: RefCell<HashMap<F, Relay>>,
    notifier: ChangeNotifier,
}

struct Relay {
    source: ChangeNotifier,
    subscription: SubscriptionId,
}

impl<F: FieldKey> ObservableRecord<F> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RecordInner {
                values: RefCell::new(HashMap::new()),
                relays: RefCell::new(HashMap::new()),
                notifier: ChangeNotifier::new(),
            }),
        }
    }

    /// Returns the stored value, or `T::default()` when `field` was never set.
    pub fn get<T: FieldValue>(&self, field: F) -> T {
        self.try_get(field).unwrap_or_default()
    }

    /// Returns the stored value, or `None` when absent or stored as another type.
    pub fn try_get<T: FieldValue>(&self, field: F) -> Option<T> {
        let values = self.inner.values.borrow();
        let stored = values.get(&field)?;
        match stored.downcast_ref::<T>() {
            Some(value) => Some(value.clone()),
            None => {
                warn!(
                    "event=record_get module=record status=skip field={} error_code=type_mismatch requested={}",
                    field.name(),
                    type_name::<T>()
                );
                None
            }
        }
    }

    pub fn contains(&self, field: F) -> bool {
        self.inner.values.borrow().contains_key(&field)
    }

    /// Stores `value` and notifies subscribers when it differs from the
    /// current value. Returns whether a change happened.
    pub fn set<T: FieldValue>(&self, field: F, value: T) -> bool {
        if !self.differs(field, &value) {
            return false;
        }

        let previous_relay = self.inner.relays.borrow_mut().remove(&field);
        if let Some(relay) = previous_relay {
            relay.source.unsubscribe(relay.subscription);
        }

        if let Some(source) = value.relay_source() {
            self.attach_relay(field, source);
        }

        let previous = self
            .inner
            .values
            .borrow_mut()
            .insert(field, Box::new(value));
        drop(previous);

        self.inner.notifier.notify(field.name());
        true
    }

    /// Applies `update` to the current value and stores the result.
    pub fn update<T: FieldValue>(&self, field: F, update: impl FnOnce(T) -> T) -> bool {
        let next = update(self.get(field));
        self.set(field, next)
    }

    /// Notifies subscribers about `field` without changing it.
    pub fn notify(&self, field: F) {
        self.inner.notifier.notify(field.name());
    }

    pub fn subscribe(&self, handler: impl Fn(&str) + 'static) -> SubscriptionId {
        self.inner.notifier.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.notifier.unsubscribe(id)
    }

    /// Handle to this record's subscriber list.
    pub fn notifier(&self) -> ChangeNotifier {
        self.inner.notifier.clone()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn differs<T: FieldValue>(&self, field: F, value: &T) -> bool {
        let values = self.inner.values.borrow();
        match values.get(&field) {
            Some(stored) => stored
                .downcast_ref::<T>()
                .map_or(true, |current| current != value),
            None => *value != T::default(),
        }
    }

    fn attach_relay(&self, field: F, source: ChangeNotifier) {
        if source.ptr_eq(&self.inner.notifier) {
            warn!(
                "event=record_relay module=record status=skip field={} error_code=self_nesting",
                field.name()
            );
            return;
        }

        let outer = self.inner.notifier.downgrade();
        let subscription = source.subscribe(move |inner_field| {
            if let Some(outer) = outer.upgrade() {
                outer.notify(inner_field);
            }
        });
        self.inner.relays.borrow_mut().insert(
            field,
            Relay {
                source,
                subscription,
            },
        );
    }
}

impl<F: FieldKey> Drop for RecordInner<F> {
    fn drop(&mut self) {
        for (_, relay) in self.relays.get_mut().drain() {
            relay.source.unsubscribe(relay.subscription);
        }
    }
}

impl<F: FieldKey> Clone for ObservableRecord<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<F: FieldKey> Default for ObservableRecord<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FieldKey> PartialEq for ObservableRecord<F> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<F: FieldKey> FieldValue for ObservableRecord<F> {
    fn relay_source(&self) -> Option<ChangeNotifier> {
        Some(self.notifier())
    }
}

impl<F: FieldKey> Debug for ObservableRecord<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<&'static str> = self
            .inner
            .values
            .borrow()
            .keys()
            .map(|field| field.name())
            .collect();
        fields.sort_unstable();
        f.debug_struct("ObservableRecord")
            .field("fields", &fields)
            .field("relays", &self.inner.relays.borrow().len())
            .field("notifier", &self.inner.notifier)
            .finish()
    }
}
