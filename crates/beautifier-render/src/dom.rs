//! The document capability the renderer drives.
//!
//! The renderer never touches a concrete DOM. It is written against [`Dom`],
//! which the web glue implements over `web-sys` and which this module
//! implements over the arena [`DomTree`] for headless use and tests.

use std::fmt::Debug;

use beautifier_dom::{DomTree, NodeId};
use thiserror::Error;

/// Failure reported by a DOM implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node handle does not refer to a node of this document.
    #[error("node does not belong to this document")]
    MissingNode,
    /// The operation needs an element but got another node type.
    #[error("node is not an element")]
    NotAnElement,
    /// The host rejected the operation.
    #[error("DOM operation failed: {0}")]
    Host(String),
}

/// Minimal DOM surface needed to detect, render, and toggle.
pub trait Dom {
    /// Handle to a node. Cheap to clone.
    type Node: Clone + PartialEq + Debug;

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    fn body(&self) -> Option<Self::Node>;

    /// [§ 3.1.3 The head element](https://html.spec.whatwg.org/multipage/dom.html#the-head-element-2)
    fn head(&self) -> Option<Self::Node>;

    /// [§ 5.1 getElementById](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// First descendant element of `root` with local name `tag`.
    fn first_element_by_tag(&self, root: &Self::Node, tag: &str) -> Option<Self::Node>;

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    fn text_content(&self, node: &Self::Node) -> String;

    /// Markup of the children of `node`.
    fn inner_html(&self, node: &Self::Node) -> String;

    /// [§ 4.9 getAttribute](https://dom.spec.whatwg.org/#dom-element-getattribute)
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// [§ 4.4 parentNode](https://dom.spec.whatwg.org/#dom-node-parentnode)
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Create a detached element.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Host`] if the host refuses the tag name.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, DomError>;

    /// Create a detached text node.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if the host cannot create the node.
    fn create_text(&mut self, text: &str) -> Result<Self::Node, DomError>;

    /// Set an attribute on an element.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotAnElement`] for non-element nodes.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str)
    -> Result<(), DomError>;

    /// Remove an attribute from an element, if present.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotAnElement`] for non-element nodes.
    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), DomError>;

    /// Replace all children of `node` with a single text node.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if the node does not exist.
    fn set_text_content(&mut self, node: &Self::Node, text: &str) -> Result<(), DomError>;

    /// Append `child` as the last child of `parent`, moving it if attached.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if either node is unknown or the host rejects the
    /// insertion.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    /// Detach every child of `parent` and return them in order.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if `parent` is unknown.
    fn take_children(&mut self, parent: &Self::Node) -> Result<Vec<Self::Node>, DomError>;
}

fn check(tree: &DomTree, id: NodeId) -> Result<(), DomError> {
    tree.get(id).map(|_| ()).ok_or(DomError::MissingNode)
}

fn check_element(tree: &DomTree, id: NodeId) -> Result<(), DomError> {
    check(tree, id)?;
    tree.as_element(id).map(|_| ()).ok_or(DomError::NotAnElement)
}

impl Dom for DomTree {
    type Node = NodeId;

    fn body(&self) -> Option<NodeId> {
        Self::body(self)
    }

    fn head(&self) -> Option<NodeId> {
        Self::head(self)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.get_element_by_id(id)
    }

    fn first_element_by_tag(&self, root: &NodeId, tag: &str) -> Option<NodeId> {
        Self::first_element_by_tag(self, *root, tag)
    }

    fn text_content(&self, node: &NodeId) -> String {
        Self::text_content(self, *node)
    }

    fn inner_html(&self, node: &NodeId) -> String {
        Self::inner_html(self, *node)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.get_attribute(*node, name).map(str::to_string)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        Self::parent(self, *node)
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        Ok(Self::create_element(self, tag))
    }

    fn create_text(&mut self, text: &str) -> Result<NodeId, DomError> {
        Ok(Self::create_text(self, text))
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        check_element(self, *node)?;
        Self::set_attribute(self, *node, name, value);
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), DomError> {
        check_element(self, *node)?;
        Self::remove_attribute(self, *node, name);
        Ok(())
    }

    fn set_text_content(&mut self, node: &NodeId, text: &str) -> Result<(), DomError> {
        check(self, *node)?;
        Self::set_text_content(self, *node, text);
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        check(self, *parent)?;
        check(self, *child)?;
        Self::append_child(self, *parent, *child);
        Ok(())
    }

    fn take_children(&mut self, parent: &NodeId) -> Result<Vec<NodeId>, DomError> {
        check(self, *parent)?;
        Ok(Self::take_children(self, *parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_node_is_reported() {
        let mut tree = DomTree::html_document();
        let body = Dom::body(&tree).unwrap();
        let err = Dom::append_child(&mut tree, &body, &NodeId(999)).unwrap_err();
        assert_eq!(err, DomError::MissingNode);
    }

    #[test]
    fn test_attribute_on_text_node_is_rejected() {
        let mut tree = DomTree::html_document();
        let text = Dom::create_text(&mut tree, "x").unwrap();
        let err = Dom::set_attribute(&mut tree, &text, "id", "a").unwrap_err();
        assert_eq!(err, DomError::NotAnElement);
    }
}
