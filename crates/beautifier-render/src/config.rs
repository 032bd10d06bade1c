//! Renderer configuration.
//!
//! Every field has a default, so an empty JSON object (or no configuration
//! at all) reproduces the stock extension behavior.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Which presentation strategy the beautified view uses.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DisplayMode {
    /// Collapsible tree, one DOM node per JSON value.
    #[default]
    Tree,
    /// Highlighted beautified text in a single `<pre>`.
    Flat,
}

/// Options read once at injection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererConfig {
    /// Presentation strategy.
    pub display_mode: DisplayMode,
    /// File name offered for the download.
    pub filename: String,
    /// Left padding of each nested child block, in pixels.
    pub indent_px: u32,
    /// Delay before the temporary download link and URL are released.
    pub cleanup_delay_ms: u64,
    /// Distance of the control overlay from the top and right edges.
    pub overlay_offset_px: u32,
    /// Horizontal gap between the control buttons.
    pub overlay_gap_px: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Tree,
            filename: "beautified.json".to_string(),
            indent_px: 20,
            cleanup_delay_ms: 100,
            overlay_offset_px: 10,
            overlay_gap_px: 10,
        }
    }
}

/// Invalid configuration document.
#[derive(Debug, Error)]
#[error("invalid renderer configuration: {0}")]
pub struct ConfigError(#[from] serde_json::Error);

impl RendererConfig {
    /// Parse a configuration document, filling unspecified fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `json` is not an object or a field has the
    /// wrong type. Unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
