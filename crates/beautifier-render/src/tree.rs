//! The collapsible tree view as plain data.
//!
//! [`build_render_tree`] is a pure function of the document and the expansion
//! set; [`crate::mount`] writes its result into a DOM. Collapsed containers
//! still carry their entries so that a toggle only flips visibility.

use serde_json::Value;
use strum_macros::{AsRefStr, Display};

use crate::document::ParsedDocument;
use crate::highlight::{self, TokenKind};
use crate::path::{ExpansionSet, NodePath};

/// Object or array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ContainerKind {
    /// `{...}`
    Object,
    /// `[...]`
    Array,
}

impl ContainerKind {
    /// Opening bracket.
    #[must_use]
    pub const fn open(self) -> &'static str {
        match self {
            Self::Object => "{",
            Self::Array => "[",
        }
    }

    /// Closing bracket.
    #[must_use]
    pub const fn close(self) -> &'static str {
        match self {
            Self::Object => "}",
            Self::Array => "]",
        }
    }
}

/// Row prefix of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryLabel {
    /// Array position, shown dim as `i:`.
    Index(usize),
    /// Object key, shown bold as `"key":`.
    Key(String),
}

impl EntryLabel {
    /// Text of the label, colon included.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Index(i) => format!("{i}:"),
            Self::Key(key) => format!("{}:", highlight::quote(key)),
        }
    }
}

/// One row of a container's child block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Index or key prefix.
    pub label: EntryLabel,
    /// The entry's value.
    pub value: RenderNode,
    /// Whether a `,` follows; true for every entry but the last.
    pub trailing_comma: bool,
}

/// A non-empty object or array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerNode {
    /// Where the container sits in the document.
    pub path: NodePath,
    /// Object or array.
    pub kind: ContainerKind,
    /// Whether the child block is shown.
    pub expanded: bool,
    /// Rows in document order.
    pub entries: Vec<Entry>,
}

impl ContainerNode {
    /// Count annotation shown in the header.
    #[must_use]
    pub fn count_label(&self) -> String {
        count_label(self.entries.len())
    }
}

/// One JSON value in the tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    /// String, number, boolean or null as one colored span.
    Scalar {
        /// Color class.
        kind: TokenKind,
        /// JSON serialization of the value.
        text: String,
    },
    /// `{}` or `[]`, rendered inline with no arrow.
    Empty(ContainerKind),
    /// Collapsible container.
    Container(ContainerNode),
}

impl RenderNode {
    /// The container, if this node is collapsible.
    #[must_use]
    pub const fn as_container(&self) -> Option<&ContainerNode> {
        match self {
            Self::Container(container) => Some(container),
            _ => None,
        }
    }
}

/// Rendered form of a whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTree {
    /// The top-level value.
    pub root: RenderNode,
}

impl RenderTree {
    /// Every collapsible container in pre-order.
    #[must_use]
    pub fn containers(&self) -> Vec<&ContainerNode> {
        let mut out = Vec::new();
        collect_containers(&self.root, &mut out);
        out
    }
}

fn collect_containers<'a>(node: &'a RenderNode, out: &mut Vec<&'a ContainerNode>) {
    if let RenderNode::Container(container) = node {
        out.push(container);
        for entry in &container.entries {
            collect_containers(&entry.value, out);
        }
    }
}

/// `"1 item"` or `"N items"`.
#[must_use]
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{count} items")
    }
}

/// Build the tree view of `document` with `expansion` deciding which
/// containers are open.
#[must_use]
pub fn build_render_tree(document: &ParsedDocument, expansion: &ExpansionSet) -> RenderTree {
    RenderTree {
        root: build_node(document.value(), NodePath::root(), expansion),
    }
}

fn build_node(value: &Value, path: NodePath, expansion: &ExpansionSet) -> RenderNode {
    let (kind, entries) = match value {
        Value::Array(items) if items.is_empty() => return RenderNode::Empty(ContainerKind::Array),
        Value::Object(map) if map.is_empty() => return RenderNode::Empty(ContainerKind::Object),
        Value::Array(items) => {
            let last = items.len() - 1;
            let entries = items
                .iter()
                .enumerate()
                .map(|(i, item)| Entry {
                    label: EntryLabel::Index(i),
                    value: build_node(item, path.index(i), expansion),
                    trailing_comma: i != last,
                })
                .collect();
            (ContainerKind::Array, entries)
        }
        Value::Object(map) => {
            let last = map.len() - 1;
            let entries = map
                .iter()
                .enumerate()
                .map(|(i, (key, item))| Entry {
                    label: EntryLabel::Key(key.clone()),
                    value: build_node(item, path.key(key), expansion),
                    trailing_comma: i != last,
                })
                .collect();
            (ContainerKind::Object, entries)
        }
        scalar => {
            return RenderNode::Scalar {
                kind: TokenKind::of_scalar(scalar).unwrap_or(TokenKind::Punct),
                text: highlight::scalar_text(scalar),
            };
        }
    };
    RenderNode::Container(ContainerNode {
        expanded: expansion.is_expanded(&path),
        path,
        kind,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(source: &str) -> (ParsedDocument, RenderTree) {
        let doc = ParsedDocument::parse(source).unwrap();
        let tree = build_render_tree(&doc, &ExpansionSet::fully_expanded(&doc));
        (doc, tree)
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(0), "0 items");
        assert_eq!(count_label(1), "1 item");
        assert_eq!(count_label(12), "12 items");
    }

    #[test]
    fn test_entries_and_commas() {
        let (_, tree) = tree(r#"{"a":1,"b":[true,null]}"#);
        let root = tree.root.as_container().unwrap();
        assert_eq!(root.kind, ContainerKind::Object);
        assert_eq!(root.count_label(), "2 items");
        assert_eq!(root.entries[0].label, EntryLabel::Key("a".into()));
        assert!(root.entries[0].trailing_comma);
        assert!(!root.entries[1].trailing_comma);

        let b = root.entries[1].value.as_container().unwrap();
        assert_eq!(b.path.as_str(), "/b");
        assert_eq!(b.entries[1].label.text(), "1:");
        assert_eq!(
            b.entries[1].value,
            RenderNode::Scalar {
                kind: TokenKind::Null,
                text: "null".into()
            }
        );
    }

    #[test]
    fn test_empty_containers_are_inline() {
        let (_, tree) = tree(r#"[{}, []]"#);
        let root = tree.root.as_container().unwrap();
        assert_eq!(root.entries[0].value, RenderNode::Empty(ContainerKind::Object));
        assert_eq!(root.entries[1].value, RenderNode::Empty(ContainerKind::Array));
        assert_eq!(tree.containers().len(), 1);
    }

    #[test]
    fn test_collapsed_container_keeps_entries() {
        let doc = ParsedDocument::parse(r#"{"x": {"y": [1]}}"#).unwrap();
        let mut expansion = ExpansionSet::fully_expanded(&doc);
        expansion.collapse(&NodePath::root().key("x"));
        let tree = build_render_tree(&doc, &expansion);
        let states: Vec<(&str, bool, usize)> = tree
            .containers()
            .into_iter()
            .map(|c| (c.path.as_str(), c.expanded, c.entries.len()))
            .collect();
        assert_eq!(states, [("", true, 1), ("/x", false, 1), ("/x/y", true, 1)]);
    }

    #[test]
    fn test_building_is_pure() {
        let (doc, first) = tree(r#"[1, {"k": "v"}]"#);
        let second = build_render_tree(&doc, &ExpansionSet::fully_expanded(&doc));
        assert_eq!(first, second);
    }

    #[test]
    fn test_key_label_is_escaped() {
        assert_eq!(EntryLabel::Key("a\"b".into()).text(), r#""a\"b":"#);
    }
}
