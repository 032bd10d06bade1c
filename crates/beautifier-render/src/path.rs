//! Naming containers inside a document, and tracking which are expanded.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use crate::document::ParsedDocument;

/// [RFC 6901](https://www.rfc-editor.org/rfc/rfc6901) JSON Pointer naming a
/// value in the document. The root is the empty pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(String);

impl NodePath {
    /// Pointer to the top-level value.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Accept a pointer read back from the DOM.
    ///
    /// Returns `None` unless `pointer` is empty or starts with `/`.
    #[must_use]
    pub fn parse(pointer: &str) -> Option<Self> {
        (pointer.is_empty() || pointer.starts_with('/')).then(|| Self(pointer.to_string()))
    }

    /// Pointer to the member `key` of the object at `self`.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        // "~" must be escaped before "/" so that "~1" in a key survives.
        let escaped = key.replace('~', "~0").replace('/', "~1");
        Self(format!("{}/{escaped}", self.0))
    }

    /// Pointer to element `index` of the array at `self`.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}/{index}", self.0))
    }

    /// The pointer text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The containers whose child block is currently shown.
///
/// Kept apart from the rendered output so that building the view stays a
/// pure function of the document and this set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    expanded: BTreeSet<NodePath>,
}

impl ExpansionSet {
    /// Nothing expanded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every non-empty container of `document` expanded, the initial view.
    #[must_use]
    pub fn fully_expanded(document: &ParsedDocument) -> Self {
        let mut set = Self::new();
        set.expand_all(NodePath::root(), document.value());
        set
    }

    fn expand_all(&mut self, path: NodePath, value: &Value) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, child) in map {
                    self.expand_all(path.key(key), child);
                }
                let _ = self.expanded.insert(path);
            }
            Value::Array(items) if !items.is_empty() => {
                for (i, child) in items.iter().enumerate() {
                    self.expand_all(path.index(i), child);
                }
                let _ = self.expanded.insert(path);
            }
            _ => {}
        }
    }

    /// Whether `path` is expanded.
    #[must_use]
    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.expanded.contains(path)
    }

    /// Flip `path` and return whether it is now expanded.
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            let _ = self.expanded.insert(path.clone());
            true
        }
    }

    /// Mark `path` collapsed.
    pub fn collapse(&mut self, path: &NodePath) {
        let _ = self.expanded.remove(path);
    }

    /// Number of expanded containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// Whether no container is expanded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Expanded paths in pointer order.
    pub fn iter(&self) -> impl Iterator<Item = &NodePath> {
        self.expanded.iter()
    }
}
