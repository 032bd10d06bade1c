//! Color palettes and the generated stylesheet.
//!
//! Every color the beautified view uses comes from a [`ThemePalette`], and
//! every palette value reaches the page through one stylesheet. Switching
//! theme therefore means regenerating that stylesheet and nothing else.

use std::fmt::Write;

use strum_macros::{AsRefStr, Display, EnumString};

use crate::config::RendererConfig;
use crate::highlight::TokenKind;
use crate::ids;

/// The host's light/dark preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ColorScheme {
    /// Bright backgrounds, dark text.
    #[default]
    Light,
    /// Dark backgrounds, light text.
    Dark,
}

impl ColorScheme {
    /// Media query whose match state selects [`ColorScheme::Dark`].
    pub const DARK_QUERY: &'static str = "(prefers-color-scheme: dark)";

    /// Map the result of the `prefers-color-scheme: dark` query.
    #[must_use]
    pub const fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }

    /// The palette for this scheme.
    #[must_use]
    pub const fn palette(self) -> ThemePalette {
        match self {
            Self::Light => ThemePalette::LIGHT,
            Self::Dark => ThemePalette::DARK,
        }
    }
}

/// Semantic color roles of the beautified view, as CSS color values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    // -- Surface --
    /// Page background behind the view.
    pub background: &'static str,
    /// Default text and punctuation.
    pub text: &'static str,
    /// Guide line on the left of child blocks.
    pub border: &'static str,

    // -- Tokens --
    /// Object keys.
    pub key: &'static str,
    /// String values.
    pub string: &'static str,
    /// Number values.
    pub number: &'static str,
    /// `true` / `false`.
    pub boolean: &'static str,
    /// `null`.
    pub null: &'static str,
    /// Array index labels, item counts and the disclosure arrow.
    pub muted: &'static str,

    // -- Controls --
    /// Download button fill.
    pub download_bg: &'static str,
    /// Download button fill on hover.
    pub download_hover: &'static str,
    /// Toggle button fill.
    pub toggle_bg: &'static str,
    /// Toggle button fill on hover.
    pub toggle_hover: &'static str,
    /// Button label color.
    pub button_text: &'static str,
    /// Button drop shadow color.
    pub shadow: &'static str,
}

impl ThemePalette {
    /// Light palette.
    pub const LIGHT: Self = Self {
        background: "#f8f9fa",
        text: "#212529",
        border: "#dee2e6",
        key: "#007bff",
        string: "#28a745",
        number: "#fd7e14",
        boolean: "#dc3545",
        null: "#6c757d",
        muted: "#868e96",
        download_bg: "#007bff",
        download_hover: "#0069d9",
        toggle_bg: "#6c757d",
        toggle_hover: "#5a6268",
        button_text: "#ffffff",
        shadow: "rgba(0, 0, 0, 0.2)",
    };

    /// Dark palette.
    pub const DARK: Self = Self {
        background: "#1e1e1e",
        text: "#d4d4d4",
        border: "#3c3c3c",
        key: "#9cdcfe",
        string: "#ce9178",
        number: "#b5cea8",
        boolean: "#569cd6",
        null: "#808080",
        muted: "#858585",
        download_bg: "#0e639c",
        download_hover: "#1177bb",
        toggle_bg: "#3c3c3c",
        toggle_hover: "#505050",
        button_text: "#ffffff",
        shadow: "rgba(0, 0, 0, 0.6)",
    };

    /// Color of a highlighted token.
    #[must_use]
    pub const fn token_color(&self, kind: TokenKind) -> &'static str {
        match kind {
            TokenKind::Key => self.key,
            TokenKind::String => self.string,
            TokenKind::Number => self.number,
            TokenKind::Boolean => self.boolean,
            TokenKind::Null => self.null,
            TokenKind::Punct => self.text,
        }
    }
}

/// Generate the stylesheet for `palette`.
///
/// Rules are scoped to the beautifier's own ids so the raw page keeps its
/// look when the overlay is shown on top of it.
#[must_use]
pub fn stylesheet(palette: &ThemePalette, config: &RendererConfig) -> String {
    let container = ids::CONTAINER;
    let controls = ids::CONTROLS;
    let download = ids::DOWNLOAD;
    let toggle = ids::TOGGLE;
    let p = palette;

    let mut css = String::new();

    // -- Surface --
    let _ = writeln!(
        css,
        "#{container} {{ font-family: monospace; padding: 20px; margin: 0; border: none; \
         border-radius: 0; min-height: 100vh; box-sizing: border-box; position: relative; \
         line-height: 1.5; background-color: {bg}; color: {text}; }}",
        bg = p.background,
        text = p.text,
    );
    let _ = writeln!(
        css,
        "#{container} pre {{ margin: 0; padding: 0; background-color: transparent; \
         overflow: auto; white-space: pre-wrap; word-wrap: break-word; }}"
    );

    // -- Tokens --
    for kind in TokenKind::HIGHLIGHTED {
        let extra = match kind {
            TokenKind::Key | TokenKind::Boolean => " font-weight: bold;",
            TokenKind::Null => " font-style: italic;",
            _ => "",
        };
        let _ = writeln!(
            css,
            "#{container} .{class} {{ color: {color};{extra} }}",
            class = kind.as_ref(),
            color = p.token_color(kind),
        );
    }

    // -- Tree --
    let _ = writeln!(
        css,
        "#{container} .jb-header {{ cursor: pointer; user-select: none; display: inline; }}"
    );
    let _ = writeln!(
        css,
        "#{container} .jb-arrow {{ display: inline-block; width: 1em; color: {muted}; \
         transition: transform 0.1s; }}",
        muted = p.muted,
    );
    let _ = writeln!(
        css,
        "#{container} .jb-arrow.jb-open {{ transform: rotate(90deg); }}"
    );
    let _ = writeln!(
        css,
        "#{container} .jb-count {{ color: {muted}; font-size: 0.85em; margin-left: 0.5em; }}",
        muted = p.muted,
    );
    let _ = writeln!(
        css,
        "#{container} .jb-block {{ padding-left: {indent}px; border-left: 1px dotted {border}; }}",
        indent = config.indent_px,
        border = p.border,
    );
    let _ = writeln!(css, "#{container} .jb-block[hidden] {{ display: none; }}");
    let _ = writeln!(
        css,
        "#{container} .jb-index {{ color: {muted}; margin-right: 0.5em; }}",
        muted = p.muted,
    );
    let _ = writeln!(
        css,
        "#{container} .jb-label {{ color: {key}; font-weight: bold; margin-right: 0.5em; }}",
        key = p.key,
    );
    let _ = writeln!(
        css,
        "#{container} .jb-node {{ display: inline; }} #{container} .jb-close {{ display: block; }}"
    );

    // -- Controls --
    let _ = writeln!(
        css,
        "#{controls} {{ position: fixed; top: {offset}px; right: {offset}px; z-index: 9999; \
         display: flex; gap: {gap}px; }}",
        offset = config.overlay_offset_px,
        gap = config.overlay_gap_px,
    );
    let _ = writeln!(
        css,
        "#{controls} button {{ padding: 8px 12px; color: {fg}; border: none; \
         border-radius: 4px; font-weight: bold; cursor: pointer; \
         box-shadow: 0 2px 5px {shadow}; }}",
        fg = p.button_text,
        shadow = p.shadow,
    );
    for (id, bg, hover) in [
        (download, p.download_bg, p.download_hover),
        (toggle, p.toggle_bg, p.toggle_hover),
    ] {
        let _ = writeln!(
            css,
            "#{id} {{ background-color: {bg}; }} #{id}:hover {{ background-color: {hover}; }}"
        );
    }

    css
}
