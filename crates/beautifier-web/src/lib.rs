//! Browser glue for the JSON Beautifier extension.
//!
//! Two `wasm-bindgen` entry points, one per extension context:
//! - `startContentScript(config?)` runs the page renderer once on the
//!   current document and wires up clicks and color scheme changes
//! - `startBackground()` registers the download relay and the install hook
//!
//! Native builds compile this crate as a stub so the workspace checks and
//! tests on every target. Only configuration decoding is target independent.

use beautifier_render::RendererConfig;
use tracing::warn;

#[cfg(target_arch = "wasm32")]
mod background;
#[cfg(target_arch = "wasm32")]
mod chrome;
#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod content;
#[cfg(target_arch = "wasm32")]
mod page;
#[cfg(target_arch = "wasm32")]
mod web_dom;

#[cfg(target_arch = "wasm32")]
pub use background::start_background;
#[cfg(target_arch = "wasm32")]
pub use content::start_content_script;

/// Decode the optional configuration passed to the content script entry.
///
/// Missing or invalid configuration falls back to the defaults; an invalid
/// document is logged and otherwise ignored.
#[must_use]
pub fn renderer_config(json: Option<&str>) -> RendererConfig {
    let Some(json) = json.filter(|j| !j.trim().is_empty()) else {
        return RendererConfig::default();
    };
    RendererConfig::from_json(json).unwrap_or_else(|e| {
        warn!(target: "beautifier::web", error = %e, "Ignoring renderer configuration");
        RendererConfig::default()
    })
}

/// Native stand-in for the content script entry.
#[cfg(not(target_arch = "wasm32"))]
#[allow(clippy::needless_pass_by_value)]
pub fn start_content_script(_config: Option<String>) {}

/// Native stand-in for the background entry.
#[cfg(not(target_arch = "wasm32"))]
pub fn start_background() {}
