//! Keyed table of heterogeneous callables with checked invocation.
//!
//! # Responsibility
//! - Map opaque method keys to callables of 0..=3 parameters.
//! - Reject duplicate keys and calls whose shape differs from the registered
//!   one instead of performing an unchecked call.
//!
//! # Invariants
//! - One key maps to at most one callable; re-registration never overwrites.
//! - Every failure is reported to the shared [`Diagnostics`] exactly once.
//! - The table is not borrowed while a callable runs, so callables may call
//!   back into the registry.

use super::key::{describe_key, MethodKey, RegistryKey};
use crate::diagnostics::{Diagnostics, MvpError, MvpResult};
use log::debug;
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Stored callable, tagged by arity.
///
/// The erased payload is a `Box<dyn Fn(..) -> R>` with the exact parameter
/// and return types given at registration.
#[derive(Clone)]
enum Callable {
    Nullary(Rc<dyn Any>),
    Unary(Rc<dyn Any>),
    Binary(Rc<dyn Any>),
    Ternary(Rc<dyn Any>),
}

struct Entry {
    key: String,
    signature: String,
    callable: Callable,
}

/// Per-coordinator method table.
pub struct MethodRegistry {
    owner: String,
    methods: RefCell<HashMap<RegistryKey, Entry>>,
    diagnostics: Diagnostics,
}

macro_rules! arity_methods {
    (
        $variant:ident,
        $register:ident,
        $try_call:ident,
        $call:ident,
        $invoke:ident;
        $($arg:ident: $ty:ident),*
    ) => {
        /// Registers `method` under `key`. Fails with `DuplicateRegistration`
        /// when `key` is taken; the existing entry stays active.
        pub fn $register<K: MethodKey, $($ty: 'static,)* R: 'static>(
            &self,
            key: K,
            method: impl Fn($($ty),*) -> R + 'static,
        ) -> MvpResult<()> {
            let boxed: Box<dyn Fn($($ty),*) -> R> = Box::new(method);
            self.insert(
                key,
                signature(&[$(type_name::<$ty>()),*], type_name::<R>()),
                Callable::$variant(Rc::new(boxed)),
            )
        }

        /// Runs the callable under `key` and returns its result.
        pub fn $try_call<K: MethodKey, $($ty: 'static,)* R: 'static>(
            &self,
            key: K,
            $($arg: $ty),*
        ) -> MvpResult<R> {
            let (callable, registered) = self.lookup(key)?;
            if let Callable::$variant(erased) = &callable {
                if let Some(method) = erased.downcast_ref::<Box<dyn Fn($($ty),*) -> R>>() {
                    return Ok(method($($arg),*));
                }
            }
            Err(self.fail(MvpError::SignatureMismatch {
                key: describe_key(key),
                expected: signature(&[$(type_name::<$ty>()),*], type_name::<R>()),
                actual: registered,
            }))
        }

        /// Like the `try_` form, but absorbs the failure into `None`.
        pub fn $call<K: MethodKey, $($ty: 'static,)* R: 'static>(
            &self,
            key: K,
            $($arg: $ty),*
        ) -> Option<R> {
            self.$try_call(key, $($arg),*).ok()
        }

        /// Runs a unit-returning callable. Returns whether it ran.
        pub fn $invoke<K: MethodKey, $($ty: 'static),*>(&self, key: K, $($arg: $ty),*) -> bool {
            self.$try_call::<K, $($ty,)* ()>(key, $($arg),*).is_ok()
        }
    };
}

impl MethodRegistry {
    /// Creates an empty table; `owner` names the component in reports.
    pub fn new(owner: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self {
            owner: owner.into(),
            methods: RefCell::new(HashMap::new()),
            diagnostics,
        }
    }

    arity_methods!(Nullary, register0, try_call0, call0, invoke0;);
    arity_methods!(Unary, register1, try_call1, call1, invoke1; a: A);
    arity_methods!(Binary, register2, try_call2, call2, invoke2; a: A, b: B);
    arity_methods!(Ternary, register3, try_call3, call3, invoke3; a: A, b: B, c: C);

    /// Removes the entry under `key`. Fails with `UnknownKey` when absent.
    pub fn unregister<K: MethodKey>(&self, key: K) -> MvpResult<()> {
        let removed = self.methods.borrow_mut().remove(&RegistryKey::of(key));
        match removed {
            Some(entry) => {
                debug!(
                    "event=method_unregister module=registry status=ok owner={} key={}",
                    self.owner, entry.key
                );
                Ok(())
            }
            None => Err(self.fail(MvpError::UnknownKey {
                key: describe_key(key),
            })),
        }
    }

    pub fn contains<K: MethodKey>(&self, key: K) -> bool {
        self.methods
            .borrow()
            .contains_key(&RegistryKey::of(key))
    }

    /// Returns the registered signature text for `key`.
    pub fn signature_of<K: MethodKey>(&self, key: K) -> Option<String> {
        self.methods
            .borrow()
            .get(&RegistryKey::of(key))
            .map(|entry| entry.signature.clone())
    }

    /// Returns the `Enum::Variant` labels of every entry, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .methods
            .borrow()
            .values()
            .map(|entry| entry.key.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.methods.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.borrow().is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let drained: Vec<Entry> = self
            .methods
            .borrow_mut()
            .drain()
            .map(|(_, entry)| entry)
            .collect();
        debug!(
            "event=registry_clear module=registry status=ok owner={} removed={}",
            self.owner,
            drained.len()
        );
        // Captured state of the callables may itself touch the registry on drop.
        drop(drained);
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    fn insert<K: MethodKey>(&self, key: K, signature: String, callable: Callable) -> MvpResult<()> {
        let table_key = RegistryKey::of(key);
        let label = describe_key(key);
        let mut methods = self.methods.borrow_mut();
        if methods.contains_key(&table_key) {
            drop(methods);
            return Err(self.fail(MvpError::DuplicateRegistration { key: label }));
        }

        debug!(
            "event=method_register module=registry status=ok owner={} key={} signature={}",
            self.owner, label, signature
        );
        methods.insert(
            table_key,
            Entry {
                key: label,
                signature,
                callable,
            },
        );
        Ok(())
    }

    fn lookup<K: MethodKey>(&self, key: K) -> MvpResult<(Callable, String)> {
        let found = self
            .methods
            .borrow()
            .get(&RegistryKey::of(key))
            .map(|entry| (entry.callable.clone(), entry.signature.clone()));
        found.ok_or_else(|| {
            self.fail(MvpError::UnknownKey {
                key: describe_key(key),
            })
        })
    }

    fn fail(&self, error: MvpError) -> MvpError {
        self.diagnostics.report(&self.owner, error.clone());
        error
    }
}

impl Debug for MethodRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("owner", &self.owner)
            .field("keys", &self.keys())
            .finish()
    }
}

fn signature(params: &[&'static str], returns: &'static str) -> String {
    format!("fn({}) -> {}", params.join(", "), returns)
}

#[cfg(test)]
mod tests {
    use super::{signature, MethodRegistry};
    use crate::diagnostics::{Diagnostics, MvpError};
    use std::cell::Cell;
    use std::rc::Rc;

    crate::method_keys! {
        enum Tool { Ping, Sum, Join }
    }

    crate::method_keys! {
        enum OtherTool { Ping }
    }

    fn registry() -> MethodRegistry {
        MethodRegistry::new("ToolPresenter", Diagnostics::new())
    }

    #[test]
    fn signature_text_lists_params_and_return() {
        assert_eq!(signature(&[], "()"), "fn() -> ()");
        assert_eq!(signature(&["i32", "bool"], "u8"), "fn(i32, bool) -> u8");
    }

    #[test]
    fn keys_from_different_enums_do_not_collide() {
        let registry = registry();
        registry
            .register0(Tool::Ping, || 1_u8)
            .expect("tool ping should register");
        registry
            .register0(OtherTool::Ping, || 2_u8)
            .expect("other ping should register");

        assert_eq!(registry.call0::<_, u8>(Tool::Ping), Some(1));
        assert_eq!(registry.call0::<_, u8>(OtherTool::Ping), Some(2));
        assert_eq!(registry.keys(), vec!["OtherTool::Ping", "Tool::Ping"]);
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let registry = registry();
        registry
            .register2(Tool::Sum, |a: i64, b: i64| a + b)
            .expect("sum should register");

        let err = registry
            .try_call1::<_, i64, i64>(Tool::Sum, 1)
            .expect_err("unary call on binary entry must fail");
        assert!(matches!(err, MvpError::SignatureMismatch { .. }));
        assert_eq!(registry.call2::<_, i64, i64, i64>(Tool::Sum, 2, 3), Some(5));
        assert_eq!(
            registry.diagnostics().count_code("signature_mismatch"),
            1
        );
    }

    #[test]
    fn callable_may_reenter_registry() {
        let registry = Rc::new(registry());
        let hits = Rc::new(Cell::new(0));
        {
            let hits = Rc::clone(&hits);
            registry
                .register0(Tool::Ping, move || hits.set(hits.get() + 1))
                .expect("ping should register");
        }
        {
            let weak = Rc::downgrade(&registry);
            registry
                .register0(Tool::Join, move || {
                    if let Some(registry) = weak.upgrade() {
                        registry.invoke0(Tool::Ping);
                        registry.invoke0(Tool::Ping);
                    }
                })
                .expect("join should register");
        }

        assert!(registry.invoke0(Tool::Join));
        assert_eq!(hits.get(), 2);
    }
}
