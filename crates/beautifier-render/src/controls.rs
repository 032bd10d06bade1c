//! The fixed control overlay and click dispatch.
//!
//! Interactive elements carry a `data-jb-action` attribute (and, for tree
//! headers, a `data-jb-path`). The host installs a single click listener and
//! resolves clicks through [`find_action`].

use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumString};

use crate::dom::{Dom, DomError};
use crate::ids;
use crate::path::NodePath;

/// Attribute naming the action of a clickable element.
pub const ACTION_ATTR: &str = "data-jb-action";

/// Attribute holding the [`NodePath`] of a tree header.
pub const PATH_ATTR: &str = "data-jb-path";

/// Label of the download button.
pub const DOWNLOAD_LABEL: &str = "Download JSON";

/// Toggle label while the beautified view shows.
pub const VIEW_RAW_LABEL: &str = "View Raw JSON";

/// Toggle label while the raw view shows.
pub const VIEW_BEAUTIFIED_LABEL: &str = "View Beautified JSON";

/// Value of [`ACTION_ATTR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ActionKind {
    /// Save the beautified text.
    Download,
    /// Swap between raw and beautified views.
    ToggleView,
    /// Expand or collapse one container.
    ToggleNode,
}

/// A resolved click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Save the beautified text.
    Download,
    /// Swap between raw and beautified views.
    ToggleView,
    /// Expand or collapse the container at the path.
    ToggleNode(NodePath),
}

impl Action {
    /// Decode the attribute pair of a clickable element.
    ///
    /// `toggle-node` needs a well-formed path; unknown actions yield `None`.
    #[must_use]
    pub fn from_attributes(action: &str, path: Option<&str>) -> Option<Self> {
        match ActionKind::from_str(action).ok()? {
            ActionKind::Download => Some(Self::Download),
            ActionKind::ToggleView => Some(Self::ToggleView),
            ActionKind::ToggleNode => path.and_then(NodePath::parse).map(Self::ToggleNode),
        }
    }

    /// The attribute value of this action.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Download => ActionKind::Download,
            Self::ToggleView => ActionKind::ToggleView,
            Self::ToggleNode(_) => ActionKind::ToggleNode,
        }
    }
}

/// Resolve a click on `target` by walking up to the nearest element that
/// carries [`ACTION_ATTR`].
pub fn find_action<D: Dom>(dom: &D, target: &D::Node) -> Option<Action> {
    let mut current = Some(target.clone());
    while let Some(node) = current {
        if let Some(action) = dom.attribute(&node, ACTION_ATTR) {
            let path = dom.attribute(&node, PATH_ATTR);
            return Action::from_attributes(&action, path.as_deref());
        }
        current = dom.parent(&node);
    }
    None
}

/// Handles to the mounted overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls<N> {
    /// `#json-beautifier-controls`
    pub overlay: N,
    /// `#json-beautifier-download`
    pub download: N,
    /// `#json-beautifier-toggle`
    pub toggle: N,
}

/// Create the detached overlay with both buttons.
///
/// # Errors
///
/// Propagates any [`DomError`] from the host.
pub fn build_controls<D: Dom>(dom: &mut D) -> Result<Controls<D::Node>, DomError> {
    let overlay = dom.create_element("div")?;
    dom.set_attribute(&overlay, "id", ids::CONTROLS)?;

    let download = button(dom, ids::DOWNLOAD, ActionKind::Download, DOWNLOAD_LABEL)?;
    let toggle = button(dom, ids::TOGGLE, ActionKind::ToggleView, VIEW_RAW_LABEL)?;
    dom.append_child(&overlay, &download)?;
    dom.append_child(&overlay, &toggle)?;

    Ok(Controls {
        overlay,
        download,
        toggle,
    })
}

fn button<D: Dom>(
    dom: &mut D,
    id: &str,
    action: ActionKind,
    label: &str,
) -> Result<D::Node, DomError> {
    let button = dom.create_element("button")?;
    dom.set_attribute(&button, "id", id)?;
    dom.set_attribute(&button, "type", "button")?;
    dom.set_attribute(&button, ACTION_ATTR, action.as_ref())?;
    dom.set_text_content(&button, label)?;
    Ok(button)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beautifier_dom::DomTree;

    #[test]
    fn test_action_attribute_values() {
        assert_eq!(ActionKind::ToggleView.as_ref(), "toggle-view");
        assert_eq!(ActionKind::ToggleNode.to_string(), "toggle-node");
        assert_eq!(Action::from_attributes("download", None), Some(Action::Download));
        assert_eq!(
            Action::from_attributes("toggle-node", Some("/a/0")),
            Some(Action::ToggleNode(NodePath::root().key("a").index(0)))
        );
        assert_eq!(Action::from_attributes("toggle-node", None), None);
        assert_eq!(Action::from_attributes("toggle-node", Some("a")), None);
        assert_eq!(Action::from_attributes("explode", None), None);
    }

    #[test]
    fn test_overlay_markup() {
        let mut tree = DomTree::html_document();
        let controls = build_controls(&mut tree).unwrap();
        assert_eq!(
            tree.outer_html(controls.overlay),
            "<div id=\"json-beautifier-controls\">\
             <button data-jb-action=\"download\" id=\"json-beautifier-download\" type=\"button\">Download JSON</button>\
             <button data-jb-action=\"toggle-view\" id=\"json-beautifier-toggle\" type=\"button\">View Raw JSON</button>\
             </div>"
        );
    }

    #[test]
    fn test_find_action_walks_to_ancestor() {
        let mut tree = DomTree::html_document();
        let controls = build_controls(&mut tree).unwrap();
        let label = tree.first_child(controls.toggle).unwrap();
        assert_eq!(find_action(&tree, &label), Some(Action::ToggleView));
        assert_eq!(find_action(&tree, &controls.overlay), None);
    }
}
