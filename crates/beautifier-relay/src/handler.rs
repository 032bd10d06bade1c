//! The background download relay.
//!
//! A stateless request handler: every message is answered from its own
//! payload plus calls into the [`DownloadHost`] capability.

use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::protocol::{
    DOWNLOAD_ACTION, DownloadOptions, DownloadRequest, DownloadResponse, JSON_MIME_TYPE,
    RelayMessage,
};

/// Reply text for a request lacking content or filename.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing content or filename.";

/// Reply text when the blob URL could not be created.
pub const BLOB_FAILED_MESSAGE: &str = "Failed to create blob or initiate download.";

/// Error string reported by the host browser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostError(pub String);

/// Identifier the host assigns to an accepted download.
pub type DownloadId = u64;

/// Completion callback of [`DownloadHost::download`].
pub type DownloadCallback = Box<dyn FnOnce(Result<DownloadId, HostError>)>;

/// Callback delivering the single response for a message.
pub type Responder = Box<dyn FnOnce(DownloadResponse)>;

/// Privileged browser capabilities the relay needs.
pub trait DownloadHost {
    /// Wrap `content` in a blob of type `mime_type` and return an object URL for it.
    ///
    /// # Errors
    ///
    /// Returns the host's message if the blob or URL cannot be created.
    fn create_object_url(&self, content: &str, mime_type: &str) -> Result<String, HostError>;

    /// Release an object URL created by [`DownloadHost::create_object_url`].
    fn revoke_object_url(&self, url: &str);

    /// Start a download. `on_complete` runs once when the host answers.
    fn download(&self, options: DownloadOptions, on_complete: DownloadCallback);
}

/// What the listener must tell the message channel after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// The message is ours and the responder will be called; keep the channel open.
    WillRespond,
    /// The message is for someone else; the responder was dropped unused.
    NotHandled,
}

impl Ack {
    /// Value returned from the extension's `onMessage` listener.
    #[must_use]
    pub const fn keep_channel_open(self) -> bool {
        matches!(self, Self::WillRespond)
    }
}

/// Background handler for `downloadJson` messages.
#[derive(Debug)]
pub struct DownloadRelay<H> {
    host: Rc<H>,
}

impl<H> Clone for DownloadRelay<H> {
    fn clone(&self) -> Self {
        Self {
            host: Rc::clone(&self.host),
        }
    }
}

impl<H: DownloadHost + 'static> DownloadRelay<H> {
    /// Create a relay over the given host capabilities.
    pub fn new(host: H) -> Self {
        Self {
            host: Rc::new(host),
        }
    }

    /// The host capabilities this relay calls into.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Dispatch a raw message as received from the runtime.
    ///
    /// Messages whose `action` is not `downloadJson` are ignored. A
    /// `downloadJson` message is always answered, even when its fields are
    /// malformed.
    pub fn handle_value(&self, message: &Value, respond: Responder) -> Ack {
        if message.get("action").and_then(Value::as_str) != Some(DOWNLOAD_ACTION) {
            return Ack::NotHandled;
        }
        let request = DownloadRequest::from_message(message);
        self.handle(RelayMessage::DownloadJson(request), respond)
    }

    /// Dispatch a decoded message, answering through `respond` exactly once.
    pub fn handle(&self, message: RelayMessage, respond: Responder) -> Ack {
        let RelayMessage::DownloadJson(request) = message;
        info!(target: "beautifier::relay", filename = ?request.filename, "Received download request");

        let Some((content, filename)) = request.fields() else {
            error!(target: "beautifier::relay", "Missing content or filename for download.");
            respond(DownloadResponse::error(MISSING_FIELDS_MESSAGE));
            return Ack::WillRespond;
        };

        let url = match self.host.create_object_url(content, JSON_MIME_TYPE) {
            Ok(url) => url,
            Err(e) => {
                error!(target: "beautifier::relay", error = %e, "Error creating blob or initiating download");
                respond(DownloadResponse::error(BLOB_FAILED_MESSAGE));
                return Ack::WillRespond;
            }
        };

        let options = DownloadOptions {
            url: url.clone(),
            filename: filename.to_string(),
            save_as: true,
        };
        let host = Rc::clone(&self.host);
        self.host.download(
            options,
            Box::new(move |result| match result {
                Ok(download_id) => {
                    // The host revokes the URL once the download settles;
                    // revoking here can cut off a download still in flight.
                    info!(target: "beautifier::relay", download_id, "Download started");
                    respond(DownloadResponse::Success { download_id });
                }
                Err(e) => {
                    warn!(target: "beautifier::relay", error = %e, "Download failed");
                    host.revoke_object_url(&url);
                    respond(DownloadResponse::error(e.0));
                }
            }),
        );
        Ack::WillRespond
    }
}

/// Install lifecycle hook. Only logs; the extension keeps no state.
pub fn on_installed() {
    info!(target: "beautifier::relay", "JSON Beautifier extension installed.");
}
