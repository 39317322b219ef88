//! Concrete UI element handles.
//!
//! Elements are shared (`Rc`) between the hierarchy that owns them and the
//! views that bind them, so every mutator takes `&self`.

use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Text label.
#[derive(Debug)]
pub struct TextElement {
    name: String,
    text: RefCell<String>,
    writes: Cell<u32>,
}

impl TextElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: RefCell::new(String::new()),
            writes: Cell::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
        self.writes.set(self.writes.get() + 1);
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Number of `set_text` calls so far.
    pub fn write_count(&self) -> u32 {
        self.writes.get()
    }
}

/// Clickable button with listener list.
pub struct ButtonElement {
    name: String,
    interactable: Cell<bool>,
    listeners: RefCell<Vec<Rc<dyn Fn()>>>,
}

impl ButtonElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interactable: Cell::new(true),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_listener(&self, listener: impl Fn() + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn clear_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn set_interactable(&self, interactable: bool) {
        self.interactable.set(interactable);
    }

    pub fn is_interactable(&self) -> bool {
        self.interactable.get()
    }

    /// Simulates a user click. Returns `false` when the button is disabled.
    pub fn click(&self) -> bool {
        if !self.interactable.get() {
            return false;
        }
        let listeners: Vec<Rc<dyn Fn()>> = self.listeners.borrow().iter().cloned().collect();
        for listener in listeners {
            listener();
        }
        true
    }
}

impl Debug for ButtonElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonElement")
            .field("name", &self.name)
            .field("interactable", &self.interactable.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Uniformly scaled transform node.
#[derive(Debug)]
pub struct TransformElement {
    name: String,
    scale: Cell<f32>,
}

impl TransformElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: Cell::new(1.0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_uniform_scale(&self, scale: f32) {
        self.scale.set(scale);
    }

    pub fn scale(&self) -> f32 {
        self.scale.get()
    }
}

/// Container whose visibility a view toggles.
#[derive(Debug)]
pub struct PanelElement {
    name: String,
    visible: Cell<bool>,
    visibility_sets: Cell<u32>,
}

impl PanelElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: Cell::new(true),
            visibility_sets: Cell::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
        self.visibility_sets.set(self.visibility_sets.get() + 1);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn visibility_sets(&self) -> u32 {
        self.visibility_sets.get()
    }
}
