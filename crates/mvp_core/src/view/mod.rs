//! Presentation-unit building blocks.
//!
//! # Responsibility
//! - Resolve and hold UI element handles for a view.
//! - Provide the element types and the hierarchy a host composes them in.
//!
//! # See also
//! - `presenter::View` for the hooks a view implements.

mod binding;
mod elements;
mod ui_tree;

pub use binding::{ElementKey, ElementTable};
pub use elements::{ButtonElement, PanelElement, TextElement, TransformElement};
pub use ui_tree::{UiNode, UiTree};
