//! One beautified page.
//!
//! [`inject`] runs the whole pipeline once: guard, detect, parse, style,
//! mount. Everything the page can do afterwards is a method on the returned
//! [`RenderSession`], which owns all per-page state.

use strum_macros::{AsRefStr, Display};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{DisplayMode, RendererConfig};
use crate::controls::{self, Action, Controls};
use crate::detect::{self, SkipReason};
use crate::document::ParsedDocument;
use crate::dom::{Dom, DomError};
use crate::highlight;
use crate::ids;
use crate::mount::{self, ToggleIndex};
use crate::path::{ExpansionSet, NodePath};
use crate::save::{DownloadFile, FileSaver, SaveError};
use crate::theme::{self, ColorScheme, ThemePalette};
use crate::tree;

/// Which view the body currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RenderMode {
    /// The beautified container.
    Beautified,
    /// The page's original content.
    Raw,
}

/// Failure while mutating the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The DOM rejected an operation.
    #[error(transparent)]
    Dom(#[from] DomError),
    /// The download could not be started.
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Outcome of [`inject`].
#[derive(Debug)]
pub enum Injection<N> {
    /// The page now shows the beautified view.
    Rendered(RenderSession<N>),
    /// The page was left untouched.
    Skipped(SkipReason),
}

impl<N> Injection<N> {
    /// The session, if the page was rendered.
    #[must_use]
    pub fn into_session(self) -> Option<RenderSession<N>> {
        match self {
            Self::Rendered(session) => Some(session),
            Self::Skipped(_) => None,
        }
    }
}

/// State of a beautified page.
#[derive(Debug)]
pub struct RenderSession<N> {
    config: RendererConfig,
    document: ParsedDocument,
    mode: RenderMode,
    scheme: ColorScheme,
    palette: ThemePalette,
    original_nodes: Vec<N>,
    original_markup: String,
    body: N,
    container: N,
    controls: Controls<N>,
    style: N,
    expansion: ExpansionSet,
    toggles: ToggleIndex<N>,
}

/// Whether the page already carries any of the beautifier's elements.
fn already_rendered<D: Dom>(dom: &D) -> bool {
    [ids::CONTAINER, ids::CONTROLS, ids::STYLE]
        .into_iter()
        .any(|id| dom.element_by_id(id).is_some())
}

/// Detect and parse the page's JSON payload without touching the DOM.
///
/// # Errors
///
/// The [`SkipReason`] that disqualifies the page.
pub fn detect_document<D: Dom>(dom: &D) -> Result<ParsedDocument, SkipReason> {
    if already_rendered(dom) {
        return Err(SkipReason::AlreadyRendered);
    }
    let source = detect::source_text(dom)?;
    detect::check_shape(&source)?;
    ParsedDocument::parse(&source)
}

/// Replace the page body with the beautified view of its JSON payload.
///
/// Pages without a JSON payload, and pages already beautified, are left
/// untouched and reported as [`Injection::Skipped`].
///
/// # Errors
///
/// [`RenderError::Dom`] if the DOM rejects an operation part way through.
pub fn inject<D: Dom>(
    dom: &mut D,
    config: RendererConfig,
    scheme: ColorScheme,
) -> Result<Injection<D::Node>, RenderError> {
    let document = match detect_document(dom) {
        Ok(document) => document,
        Err(reason) => {
            debug!(target: "beautifier::render", %reason, "Page left untouched");
            return Ok(Injection::Skipped(reason));
        }
    };
    let Some(body) = dom.body() else {
        return Ok(Injection::Skipped(SkipReason::NoBody));
    };
    info!(target: "beautifier::render", mode = %config.display_mode, "Valid JSON detected");

    let palette = scheme.palette();
    let controls = controls::build_controls(dom)?;

    let container = dom.create_element("div")?;
    dom.set_attribute(&container, "id", ids::CONTAINER)?;
    let expansion = ExpansionSet::fully_expanded(&document);
    let toggles = match config.display_mode {
        DisplayMode::Tree => {
            let tree = tree::build_render_tree(&document, &expansion);
            mount::mount_tree(dom, &container, &tree)?
        }
        DisplayMode::Flat => {
            mount::mount_flat(dom, &container, &highlight::tokenize(&document))?;
            ToggleIndex::new()
        }
    };

    // Everything above is detached; the page changes from here on.
    let style = dom.create_element("style")?;
    dom.set_attribute(&style, "id", ids::STYLE)?;
    dom.set_text_content(&style, &theme::stylesheet(&palette, &config))?;
    match dom.head() {
        Some(head) => dom.append_child(&head, &style)?,
        // Inside the overlay the sheet stays in the body in both views.
        None => dom.append_child(&controls.overlay, &style)?,
    }

    let original_markup = dom.inner_html(&body);
    let original_nodes = dom.take_children(&body)?;
    dom.append_child(&body, &container)?;
    dom.append_child(&body, &controls.overlay)?;

    Ok(Injection::Rendered(RenderSession {
        config,
        document,
        mode: RenderMode::Beautified,
        scheme,
        palette,
        original_nodes,
        original_markup,
        body,
        container,
        controls,
        style,
        expansion,
        toggles,
    }))
}

impl<N> RenderSession<N> {
    /// Configuration read at injection.
    #[must_use]
    pub const fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The text offered for download, two-space indented.
    #[must_use]
    pub fn beautified(&self) -> String {
        self.document.beautify()
    }

    /// Current view.
    #[must_use]
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Current color scheme.
    #[must_use]
    pub const fn color_scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// Palette of the current color scheme.
    #[must_use]
    pub const fn palette(&self) -> &ThemePalette {
        &self.palette
    }

    /// Body markup captured before the first render.
    #[must_use]
    pub fn original_markup(&self) -> &str {
        &self.original_markup
    }

    /// Containers currently expanded.
    #[must_use]
    pub const fn expansion(&self) -> &ExpansionSet {
        &self.expansion
    }

    /// `#json-beautifier-container`, attached only in the beautified view.
    #[must_use]
    pub const fn container(&self) -> &N {
        &self.container
    }

    /// The control overlay and its buttons.
    #[must_use]
    pub const fn controls(&self) -> &Controls<N> {
        &self.controls
    }

    /// `#json-beautifier-style`
    #[must_use]
    pub const fn style(&self) -> &N {
        &self.style
    }

    /// Swap between the beautified and raw views and return the new mode.
    ///
    /// # Errors
    ///
    /// [`RenderError::Dom`] if the DOM rejects an operation.
    pub fn toggle_view<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
    ) -> Result<RenderMode, RenderError> {
        let _ = dom.take_children(&self.body)?;
        let (mode, label) = match self.mode {
            RenderMode::Beautified => {
                for node in &self.original_nodes {
                    dom.append_child(&self.body, node)?;
                }
                (RenderMode::Raw, controls::VIEW_BEAUTIFIED_LABEL)
            }
            RenderMode::Raw => {
                dom.append_child(&self.body, &self.container)?;
                (RenderMode::Beautified, controls::VIEW_RAW_LABEL)
            }
        };
        dom.append_child(&self.body, &self.controls.overlay)?;
        dom.set_text_content(&self.controls.toggle, label)?;
        self.mode = mode;
        debug!(target: "beautifier::render", %mode, "View toggled");
        Ok(mode)
    }

    /// Expand or collapse the container at `path`.
    ///
    /// Returns the new expansion state, or `None` when no mounted container
    /// has that path (flat mode, or a stale path).
    ///
    /// # Errors
    ///
    /// [`RenderError::Dom`] if the DOM rejects an operation.
    pub fn toggle_node<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        path: &NodePath,
    ) -> Result<Option<bool>, RenderError> {
        let Some(handles) = self.toggles.get(path) else {
            return Ok(None);
        };
        let expanded = self.expansion.toggle(path);
        mount::set_expanded(dom, handles, expanded)?;
        Ok(Some(expanded))
    }

    /// Repaint for a new color scheme by rewriting the stylesheet.
    ///
    /// View mode and expansion state are untouched.
    ///
    /// # Errors
    ///
    /// [`RenderError::Dom`] if the DOM rejects an operation.
    pub fn set_color_scheme<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        scheme: ColorScheme,
    ) -> Result<(), RenderError> {
        if scheme == self.scheme {
            return Ok(());
        }
        self.scheme = scheme;
        self.palette = scheme.palette();
        dom.set_text_content(&self.style, &theme::stylesheet(&self.palette, &self.config))?;
        info!(target: "beautifier::render", %scheme, "Color scheme changed");
        Ok(())
    }

    /// The file the download button saves.
    #[must_use]
    pub fn download_file(&self) -> DownloadFile {
        DownloadFile {
            content: self.beautified(),
            filename: self.config.filename.clone(),
        }
    }

    /// Save the beautified text through `saver`.
    ///
    /// # Errors
    ///
    /// [`RenderError::Save`] if no save could be started.
    pub fn download(&self, saver: &mut dyn FileSaver) -> Result<(), RenderError> {
        saver.save(&self.download_file()).map_err(|e| {
            error!(target: "beautifier::render", error = %e, "Could not download the JSON");
            RenderError::from(e)
        })
    }

    /// Perform a resolved click.
    ///
    /// # Errors
    ///
    /// Whatever the performed operation reports.
    pub fn dispatch<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        action: &Action,
        saver: &mut dyn FileSaver,
    ) -> Result<(), RenderError> {
        match action {
            Action::Download => self.download(saver),
            Action::ToggleView => self.toggle_view(dom).map(|_| ()),
            Action::ToggleNode(path) => self.toggle_node(dom, path).map(|_| ()),
        }
    }

    /// Resolve a click on `target` and perform it.
    ///
    /// Returns the performed action, or `None` when the click did not hit
    /// a beautifier control.
    ///
    /// # Errors
    ///
    /// Whatever the performed operation reports.
    pub fn handle_click<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        target: &N,
        saver: &mut dyn FileSaver,
    ) -> Result<Option<Action>, RenderError> {
        let Some(action) = controls::find_action(dom, target) else {
            return Ok(None);
        };
        self.dispatch(dom, &action, saver)?;
        Ok(Some(action))
    }
}
