//! Messages exchanged between the page renderer and the background relay.
//!
//! The wire shapes match what the extension runtime passes through
//! `runtime.sendMessage`:
//!
//! - request: `{"action": "downloadJson", "content": "...", "filename": "..."}`
//! - response: `{"status": "success", "downloadId": 7}` or
//!   `{"status": "error", "message": "..."}`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `action` tag of a download request.
pub const DOWNLOAD_ACTION: &str = "downloadJson";

/// MIME type of the blob handed to the host download capability.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Message Chrome routes to the background context.
///
/// Tagged by its `action` field; messages carrying any other action are not
/// addressed to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum RelayMessage {
    /// Save `content` under `filename`.
    #[serde(rename = "downloadJson")]
    DownloadJson(DownloadRequest),
}

impl RelayMessage {
    /// Build a download message for a complete request.
    #[must_use]
    pub fn download(content: &str, filename: &str) -> Self {
        Self::DownloadJson(DownloadRequest {
            content: Some(content.to_string()),
            filename: Some(filename.to_string()),
        })
    }
}

/// Payload of a `downloadJson` message.
///
/// Both fields are optional on the wire so that an incomplete request can be
/// answered with an error instead of being dropped as malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// File body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Suggested file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl DownloadRequest {
    /// Read the fields of a raw `downloadJson` message.
    ///
    /// A field that is absent or not a string is treated as missing.
    #[must_use]
    pub fn from_message(message: &Value) -> Self {
        let field = |name: &str| message.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            content: field("content"),
            filename: field("filename"),
        }
    }

    /// Returns `(content, filename)` when both are present and non-empty.
    #[must_use]
    pub fn fields(&self) -> Option<(&str, &str)> {
        let content = self.content.as_deref().filter(|c| !c.is_empty())?;
        let filename = self.filename.as_deref().filter(|f| !f.is_empty())?;
        Some((content, filename))
    }
}

/// Reply sent back through the message channel, exactly once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DownloadResponse {
    /// The host accepted the download.
    Success {
        /// Identifier the host assigned to the download.
        #[serde(rename = "downloadId")]
        download_id: u64,
    },
    /// The download could not be started.
    Error {
        /// Human readable reason.
        message: String,
    },
}

impl DownloadResponse {
    /// Shorthand for an error response.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Options passed to the privileged download call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOptions {
    /// Object URL of the blob to save.
    pub url: String,
    /// Suggested file name.
    pub filename: String,
    /// Ask the user where to save.
    pub save_as: bool,
}
