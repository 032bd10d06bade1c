//! Page renderer for the JSON Beautifier extension.
//!
//! # Scope
//!
//! This crate provides:
//! - **Detection** - find a JSON payload in the page text
//! - **Parsing** - strict decode into an object or array
//! - **Views** - collapsible tree or highlighted flat text
//! - **Theming** - light and dark palettes emitted as one stylesheet
//! - **Controls** - the download and raw/beautified toggle overlay
//! - **Saving** - direct page download with a relay fallback
//!
//! Everything runs against the [`Dom`] capability, so the same code drives a
//! real page in the browser and a [`beautifier_dom::DomTree`] in tests.
//!
//! ```
//! use beautifier_dom::DomTree;
//! use beautifier_render::{ColorScheme, Injection, RendererConfig, inject};
//!
//! let mut tree = DomTree::html_document();
//! let body = tree.body().unwrap();
//! let text = tree.create_text(r#"{"a": 1}"#);
//! tree.append_child(body, text);
//!
//! let injection = inject(&mut tree, RendererConfig::default(), ColorScheme::Light).unwrap();
//! assert!(matches!(injection, Injection::Rendered(_)));
//! assert!(tree.get_element_by_id("json-beautifier-container").is_some());
//! ```

pub mod config;
pub mod controls;
pub mod detect;
pub mod document;
pub mod dom;
pub mod highlight;
pub mod mount;
pub mod path;
pub mod save;
pub mod session;
pub mod theme;
pub mod tree;

/// Element ids the beautifier owns.
pub mod ids {
    /// Wrapper of the beautified view.
    pub const CONTAINER: &str = "json-beautifier-container";
    /// The tree root or the flat `<pre>`.
    pub const OUTPUT: &str = "json-beautifier-output";
    /// The fixed button overlay.
    pub const CONTROLS: &str = "json-beautifier-controls";
    /// Download button.
    pub const DOWNLOAD: &str = "json-beautifier-download";
    /// Raw/beautified toggle button.
    pub const TOGGLE: &str = "json-beautifier-toggle";
    /// Generated stylesheet.
    pub const STYLE: &str = "json-beautifier-style";
}

pub use config::{ConfigError, DisplayMode, RendererConfig};
pub use controls::{Action, ActionKind, Controls, find_action};
pub use detect::SkipReason;
pub use document::ParsedDocument;
pub use dom::{Dom, DomError};
pub use highlight::{Token, TokenKind, tokenize};
pub use path::{ExpansionSet, NodePath};
pub use save::{
    ChannelError, DirectSaver, DownloadFile, FallbackSaver, FileSaver, Notifier, PageDownloads,
    RelayChannel, RelayedSaver, SaveError,
};
pub use session::{Injection, RenderError, RenderMode, RenderSession, detect_document, inject};
pub use theme::{ColorScheme, ThemePalette};
pub use tree::{RenderNode, RenderTree, build_render_tree};
