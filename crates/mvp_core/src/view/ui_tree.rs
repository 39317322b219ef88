//! Named element hierarchy used for structural lookup at bind time.

use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// One node: a name, an optional element of any type, and children.
pub struct UiNode {
    name: String,
    element: Option<Rc<dyn Any>>,
    children: Vec<UiNode>,
}

impl UiNode {
    /// Creates an element-less grouping node.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            element: None,
            children: Vec::new(),
        }
    }

    /// Creates a node carrying `element`.
    pub fn with_element<E: Any>(name: impl Into<String>, element: Rc<E>) -> Self {
        Self {
            name: name.into(),
            element: Some(element),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, node: UiNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn push(&mut self, node: UiNode) {
        self.children.push(node);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First node, depth-first from this one, whose name is `name` and
    /// whose element is an `E`.
    pub fn find<E: Any>(&self, name: &str) -> Option<Rc<E>> {
        if self.name == name {
            if let Some(found) = self
                .element
                .as_ref()
                .and_then(|element| Rc::clone(element).downcast::<E>().ok())
            {
                return Some(found);
            }
        }
        self.children.iter().find_map(|child| child.find::<E>(name))
    }

    /// Total node count including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(UiNode::node_count).sum::<usize>()
    }
}

impl Debug for UiNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiNode")
            .field("name", &self.name)
            .field("has_element", &self.element.is_some())
            .field("children", &self.children)
            .finish()
    }
}

/// Root of a view's element hierarchy.
#[derive(Debug)]
pub struct UiTree {
    root: UiNode,
}

impl UiTree {
    pub fn new(root: UiNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &UiNode {
        &self.root
    }

    pub fn find<E: Any>(&self, name: &str) -> Option<Rc<E>> {
        self.root.find::<E>(name)
    }
}

#[cfg(test)]
mod tests {
    use super::{UiNode, UiTree};
    use crate::view::{ButtonElement, TextElement};
    use std::rc::Rc;

    #[test]
    fn find_matches_name_and_type() {
        let text = Rc::new(TextElement::new("Gold"));
        let tree = UiTree::new(
            UiNode::group("Canvas")
                .child(UiNode::with_element("Gold", Rc::new(ButtonElement::new("Gold"))))
                .child(UiNode::group("Header").child(UiNode::with_element("Gold", Rc::clone(&text)))),
        );

        let found = tree.find::<TextElement>("Gold").expect("text should resolve");
        assert!(Rc::ptr_eq(&found, &text));
        assert!(tree.find::<TextElement>("Silver").is_none());
        assert_eq!(tree.root().node_count(), 4);
    }
}
