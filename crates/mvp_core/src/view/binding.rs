//! Bound-element table.
//!
//! # Responsibility
//! - Resolve a declared list of element names once, through a caller-supplied
//!   structural lookup, and keep the handles in declaration order.
//! - Serve handles by element type plus positional index.
//!
//! # Invariants
//! - Slot `i` of a type holds the element declared `i`-th at bind time, or a
//!   hole when the name did not resolve.
//! - Binding the same type twice appends a second run of slots; callers bind
//!   each type once.

use crate::diagnostics::{Diagnostics, MvpError};
use log::debug;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Declaration-ordered element names a view binds.
///
/// Declare implementors with [`element_keys!`](crate::element_keys); the
/// enum's declaration order is the slot order.
pub trait ElementKey: Copy + 'static {
    fn all() -> &'static [Self];

    fn name(self) -> &'static str;

    fn index(self) -> usize;
}

/// Element handles keyed by element type, each an ordered slot list.
pub struct ElementTable {
    owner: String,
    slots: HashMap<TypeId, Vec<Option<Rc<dyn Any>>>>,
    diagnostics: Diagnostics,
}

impl ElementTable {
    pub fn new(owner: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self {
            owner: owner.into(),
            slots: HashMap::new(),
            diagnostics,
        }
    }

    /// Resolves every name of `K` through `lookup`, appending one slot per
    /// name. Returns how many names resolved.
    pub fn bind<E: Any, K: ElementKey>(&mut self, lookup: impl Fn(&str) -> Option<Rc<E>>) -> usize {
        let element_type = short_type_name::<E>();
        let mut resolved = 0;
        let mut run = Vec::with_capacity(K::all().len());
        for key in K::all() {
            match lookup(key.name()) {
                Some(element) => {
                    resolved += 1;
                    run.push(Some(element as Rc<dyn Any>));
                }
                None => {
                    self.diagnostics.report(
                        &self.owner,
                        MvpError::UnresolvedElement {
                            element_type,
                            name: key.name().to_string(),
                        },
                    );
                    run.push(None);
                }
            }
        }

        debug!(
            "event=view_bind module=view status=ok owner={} element_type={} declared={} resolved={}",
            self.owner,
            element_type,
            run.len(),
            resolved
        );
        self.slots.entry(TypeId::of::<E>()).or_default().extend(run);
        resolved
    }

    /// Handle at `index` among bound `E`s.
    ///
    /// Returns `None` for a hole left by an unresolved name, and reports
    /// `InvalidBindIndex` when the type was never bound or `index` is out of
    /// range.
    pub fn get<E: Any>(&self, index: usize) -> Option<Rc<E>> {
        let slot = self
            .slots
            .get(&TypeId::of::<E>())
            .and_then(|slots| slots.get(index));
        match slot {
            Some(Some(element)) => Rc::clone(element).downcast::<E>().ok(),
            Some(None) => None,
            None => {
                self.diagnostics.report(
                    &self.owner,
                    MvpError::InvalidBindIndex {
                        element_type: short_type_name::<E>(),
                        index,
                    },
                );
                None
            }
        }
    }

    /// Handle for `key`'s declaration slot.
    pub fn get_by_key<E: Any, K: ElementKey>(&self, key: K) -> Option<Rc<E>> {
        self.get::<E>(key.index())
    }

    /// Number of slots (resolved or not) bound for `E`.
    pub fn bound_len<E: Any>(&self) -> usize {
        self.slots
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    pub fn is_bound<E: Any>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<E>())
    }
}

impl Debug for ElementTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementTable")
            .field("owner", &self.owner)
            .field("types", &self.slots.len())
            .finish()
    }
}

fn short_type_name<E>() -> &'static str {
    let full = type_name::<E>();
    full.rsplit("::").next().unwrap_or(full)
}
