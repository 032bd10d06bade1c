//! Writing a view into the DOM.
//!
//! Tree markup for a container:
//!
//! ```text
//! <div class="jb-node">
//!   <span class="jb-header" data-jb-action="toggle-node" data-jb-path="/b">
//!     <span class="jb-arrow jb-open">▶</span>[<span class="jb-count">2 items</span>
//!   </span>
//!   <div class="jb-block">
//!     <div class="jb-row"><span class="jb-index">0:</span>...</div>
//!   </div>
//!   <div class="jb-close">],</div>
//! </div>
//! ```
//!
//! A collapsed container is identical except for `hidden` on its block and no
//! `jb-open` on its arrow.

use std::collections::HashMap;

use crate::controls::{ACTION_ATTR, ActionKind, PATH_ATTR};
use crate::dom::{Dom, DomError};
use crate::highlight::{Token, TokenKind};
use crate::ids;
use crate::path::NodePath;
use crate::tree::{ContainerNode, EntryLabel, RenderNode, RenderTree};

/// Disclosure arrow glyph.
pub const ARROW: &str = "\u{25b6}";

const ARROW_CLASS: &str = "jb-arrow";
const ARROW_OPEN_CLASS: &str = "jb-arrow jb-open";

/// The two elements a node toggle touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleHandles<N> {
    /// Child block, hidden while collapsed.
    pub block: N,
    /// Disclosure arrow, rotated while expanded.
    pub arrow: N,
}

/// Mounted containers by path.
pub type ToggleIndex<N> = HashMap<NodePath, ToggleHandles<N>>;

/// Mount `tree` as a new `#json-beautifier-output` under `parent`.
///
/// # Errors
///
/// Propagates any [`DomError`] from the host.
pub fn mount_tree<D: Dom>(
    dom: &mut D,
    parent: &D::Node,
    tree: &RenderTree,
) -> Result<ToggleIndex<D::Node>, DomError> {
    let output = dom.create_element("div")?;
    dom.set_attribute(&output, "id", ids::OUTPUT)?;
    dom.set_attribute(&output, "class", "jb-tree")?;

    let mut index = ToggleIndex::new();
    mount_node(dom, &output, &tree.root, false, &mut index)?;
    dom.append_child(parent, &output)?;
    Ok(index)
}

/// Mount the flat token stream as a `<pre id="json-beautifier-output">`
/// under `parent`.
///
/// Highlighted tokens become spans; punctuation stays bare text.
///
/// # Errors
///
/// Propagates any [`DomError`] from the host.
pub fn mount_flat<D: Dom>(
    dom: &mut D,
    parent: &D::Node,
    tokens: &[Token],
) -> Result<(), DomError> {
    let pre = dom.create_element("pre")?;
    dom.set_attribute(&pre, "id", ids::OUTPUT)?;
    for token in tokens {
        if token.kind == TokenKind::Punct {
            append_text(dom, &pre, &token.text)?;
        } else {
            let span = span(dom, token.kind.as_ref(), &token.text)?;
            dom.append_child(&pre, &span)?;
        }
    }
    dom.append_child(parent, &pre)
}

/// Show or hide a mounted container's block.
///
/// # Errors
///
/// Propagates any [`DomError`] from the host.
pub fn set_expanded<D: Dom>(
    dom: &mut D,
    handles: &ToggleHandles<D::Node>,
    expanded: bool,
) -> Result<(), DomError> {
    if expanded {
        dom.remove_attribute(&handles.block, "hidden")?;
        dom.set_attribute(&handles.arrow, "class", ARROW_OPEN_CLASS)
    } else {
        dom.set_attribute(&handles.block, "hidden", "")?;
        dom.set_attribute(&handles.arrow, "class", ARROW_CLASS)
    }
}

fn mount_node<D: Dom>(
    dom: &mut D,
    parent: &D::Node,
    node: &RenderNode,
    trailing_comma: bool,
    index: &mut ToggleIndex<D::Node>,
) -> Result<(), DomError> {
    let comma = if trailing_comma { "," } else { "" };
    match node {
        RenderNode::Scalar { kind, text } => {
            let span = span(dom, kind.as_ref(), text)?;
            dom.append_child(parent, &span)?;
            if trailing_comma {
                append_text(dom, parent, comma)?;
            }
            Ok(())
        }
        RenderNode::Empty(kind) => {
            append_text(dom, parent, &format!("{}{}{comma}", kind.open(), kind.close()))
        }
        RenderNode::Container(container) => {
            mount_container(dom, parent, container, comma, index)
        }
    }
}

fn mount_container<D: Dom>(
    dom: &mut D,
    parent: &D::Node,
    container: &ContainerNode,
    comma: &str,
    index: &mut ToggleIndex<D::Node>,
) -> Result<(), DomError> {
    let wrapper = element(dom, "div", "jb-node")?;

    let header = element(dom, "span", "jb-header")?;
    dom.set_attribute(&header, ACTION_ATTR, ActionKind::ToggleNode.as_ref())?;
    dom.set_attribute(&header, PATH_ATTR, container.path.as_str())?;
    let arrow = span(dom, ARROW_CLASS, ARROW)?;
    dom.append_child(&header, &arrow)?;
    append_text(dom, &header, container.kind.open())?;
    let count = span(dom, "jb-count", &container.count_label())?;
    dom.append_child(&header, &count)?;
    dom.append_child(&wrapper, &header)?;

    let block = element(dom, "div", "jb-block")?;
    for entry in &container.entries {
        let row = element(dom, "div", "jb-row")?;
        let label_class = match entry.label {
            EntryLabel::Index(_) => "jb-index",
            EntryLabel::Key(_) => "jb-label",
        };
        let label = span(dom, label_class, &entry.label.text())?;
        dom.append_child(&row, &label)?;
        mount_node(dom, &row, &entry.value, entry.trailing_comma, index)?;
        dom.append_child(&block, &row)?;
    }
    dom.append_child(&wrapper, &block)?;

    let close = element(dom, "div", "jb-close")?;
    append_text(dom, &close, &format!("{}{comma}", container.kind.close()))?;
    dom.append_child(&wrapper, &close)?;

    let handles = ToggleHandles { block, arrow };
    set_expanded(dom, &handles, container.expanded)?;
    let _ = index.insert(container.path.clone(), handles);

    dom.append_child(parent, &wrapper)
}

fn element<D: Dom>(dom: &mut D, tag: &str, class: &str) -> Result<D::Node, DomError> {
    let node = dom.create_element(tag)?;
    dom.set_attribute(&node, "class", class)?;
    Ok(node)
}

fn span<D: Dom>(dom: &mut D, class: &str, text: &str) -> Result<D::Node, DomError> {
    let node = element(dom, "span", class)?;
    append_text(dom, &node, text)?;
    Ok(node)
}

fn append_text<D: Dom>(dom: &mut D, parent: &D::Node, text: &str) -> Result<(), DomError> {
    let node = dom.create_text(text)?;
    dom.append_child(parent, &node)
}
