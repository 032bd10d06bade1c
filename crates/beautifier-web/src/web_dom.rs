//! [`Dom`] over the live page document.

use beautifier_render::{Dom, DomError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Node};

use crate::chrome;

/// The page document as seen by the renderer.
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    /// Wrap the page document.
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    /// The wrapped document.
    pub const fn document(&self) -> &Document {
        &self.document
    }
}

fn host_error(value: &JsValue) -> DomError {
    DomError::Host(chrome::message(value))
}

fn element(node: &Node) -> Result<&Element, DomError> {
    node.dyn_ref::<Element>().ok_or(DomError::NotAnElement)
}

impl Dom for WebDom {
    type Node = Node;

    fn body(&self) -> Option<Node> {
        self.document.body().map(Into::into)
    }

    fn head(&self) -> Option<Node> {
        self.document.head().map(Into::into)
    }

    fn element_by_id(&self, id: &str) -> Option<Node> {
        self.document.get_element_by_id(id).map(Into::into)
    }

    fn first_element_by_tag(&self, root: &Node, tag: &str) -> Option<Node> {
        root.dyn_ref::<Element>()?
            .query_selector(tag)
            .ok()
            .flatten()
            .map(Into::into)
    }

    fn text_content(&self, node: &Node) -> String {
        node.text_content().unwrap_or_default()
    }

    fn inner_html(&self, node: &Node) -> String {
        node.dyn_ref::<Element>().map(Element::inner_html).unwrap_or_default()
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>()?.get_attribute(name)
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn create_element(&mut self, tag: &str) -> Result<Node, DomError> {
        self.document
            .create_element(tag)
            .map(Into::into)
            .map_err(|e| host_error(&e))
    }

    fn create_text(&mut self, text: &str) -> Result<Node, DomError> {
        Ok(self.document.create_text_node(text).into())
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) -> Result<(), DomError> {
        element(node)?
            .set_attribute(name, value)
            .map_err(|e| host_error(&e))
    }

    fn remove_attribute(&mut self, node: &Node, name: &str) -> Result<(), DomError> {
        element(node)?
            .remove_attribute(name)
            .map_err(|e| host_error(&e))
    }

    fn set_text_content(&mut self, node: &Node, text: &str) -> Result<(), DomError> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> Result<(), DomError> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|e| host_error(&e))
    }

    fn take_children(&mut self, parent: &Node) -> Result<Vec<Node>, DomError> {
        let mut children = Vec::new();
        while let Some(child) = parent.first_child() {
            let _ = parent.remove_child(&child).map_err(|e| host_error(&e))?;
            children.push(child);
        }
        Ok(children)
    }
}
