//! Saving the beautified text as a file.
//!
//! The session only knows the [`FileSaver`] capability. Two implementations
//! exist: [`DirectSaver`] clicks a temporary blob link in the page, and
//! [`RelayedSaver`] asks the background relay to perform a privileged
//! download. [`FallbackSaver`] tries the first and falls back to the second.

use std::rc::Rc;
use std::time::Duration;

use beautifier_relay::protocol::JSON_MIME_TYPE;
use beautifier_relay::{DownloadResponse, RelayMessage};
use thiserror::Error;
use tracing::{error, info};

/// Prefix of every alert the extension raises.
pub const ALERT_PREFIX: &str = "JSON Beautifier Error: ";

/// Alert shown when the relay message could not even be sent.
pub const SEND_FAILED_MESSAGE: &str =
    "Could not download the JSON. Please check console for details.";

/// Failure of the message channel to the background context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ChannelError(pub String);

/// Why a save did not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    /// The saver cannot run in this context.
    #[error("saving is not supported here")]
    Unsupported,
    /// The blob or its object URL could not be created.
    #[error("failed to create object URL: {0}")]
    ObjectUrl(String),
    /// The temporary link could not be created or clicked.
    #[error("failed to start download: {0}")]
    Link(String),
    /// The relay message could not be sent.
    #[error("failed to send message: {0}")]
    Channel(#[from] ChannelError),
}

/// A file to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFile {
    /// File body.
    pub content: String,
    /// Suggested file name.
    pub filename: String,
}

/// Capability to hand a file to the user.
pub trait FileSaver {
    /// Whether [`FileSaver::save`] can run at all in this context.
    fn is_available(&self) -> bool {
        true
    }

    /// Start saving `file`. Completion may be reported asynchronously.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] if the save could not be started.
    fn save(&mut self, file: &DownloadFile) -> Result<(), SaveError>;
}

/// Page APIs used by [`DirectSaver`].
pub trait PageDownloads {
    /// Handle to a temporary link element.
    type Link: 'static;

    /// Whether blobs, object URLs and timers exist in this context.
    fn is_supported(&self) -> bool;

    /// Wrap `content` in a blob of type `mime_type` and return its object URL.
    ///
    /// # Errors
    ///
    /// [`SaveError::ObjectUrl`] if the blob or URL cannot be created.
    fn create_object_url(&self, content: &str, mime_type: &str) -> Result<String, SaveError>;

    /// Release an object URL.
    fn revoke_object_url(&self, url: &str);

    /// Append an invisible `<a href=url download=filename>` to the body and
    /// click it.
    ///
    /// # Errors
    ///
    /// [`SaveError::Link`] if the link cannot be created or clicked.
    fn click_link(&self, url: &str, filename: &str) -> Result<Self::Link, SaveError>;

    /// Remove a link created by [`PageDownloads::click_link`].
    fn remove_link(&self, link: &Self::Link);

    /// Run `task` once after `delay`.
    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Saves through a temporary blob link in the page.
#[derive(Debug)]
pub struct DirectSaver<H> {
    host: Rc<H>,
    cleanup_delay: Duration,
}

impl<H: PageDownloads + 'static> DirectSaver<H> {
    /// Create a saver that releases the link and URL after `cleanup_delay`.
    pub fn new(host: H, cleanup_delay: Duration) -> Self {
        Self {
            host: Rc::new(host),
            cleanup_delay,
        }
    }

    /// The page capabilities.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H: PageDownloads + 'static> FileSaver for DirectSaver<H> {
    fn is_available(&self) -> bool {
        self.host.is_supported()
    }

    fn save(&mut self, file: &DownloadFile) -> Result<(), SaveError> {
        let url = self.host.create_object_url(&file.content, JSON_MIME_TYPE)?;
        let link = match self.host.click_link(&url, &file.filename) {
            Ok(link) => link,
            Err(e) => {
                self.host.revoke_object_url(&url);
                return Err(e);
            }
        };

        let host = Rc::clone(&self.host);
        self.host.defer(
            self.cleanup_delay,
            Box::new(move || {
                host.remove_link(&link);
                host.revoke_object_url(&url);
            }),
        );
        info!(target: "beautifier::render", filename = %file.filename, "Download initiated directly");
        Ok(())
    }
}

/// Completion callback of [`RelayChannel::send`].
pub type ReplyCallback = Box<dyn FnOnce(Result<DownloadResponse, ChannelError>)>;

/// Message channel from the page to the background relay.
pub trait RelayChannel {
    /// Send `message`; `on_reply` runs once with the relay's answer or the
    /// channel's error.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] if the message could not be sent at all.
    fn send(&self, message: RelayMessage, on_reply: ReplyCallback) -> Result<(), ChannelError>;
}

/// Blocking user-facing error display.
pub trait Notifier {
    /// Show `message` to the user.
    fn alert(&self, message: &str);
}

/// Saves by asking the background relay.
#[derive(Debug)]
pub struct RelayedSaver<C, N> {
    channel: C,
    notifier: Rc<N>,
}

impl<C: RelayChannel, N: Notifier + 'static> RelayedSaver<C, N> {
    /// Create a saver over `channel` that reports failures through `notifier`.
    pub fn new(channel: C, notifier: N) -> Self {
        Self {
            channel,
            notifier: Rc::new(notifier),
        }
    }

    /// The message channel.
    #[must_use]
    pub const fn channel(&self) -> &C {
        &self.channel
    }

    /// The notifier.
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

impl<C: RelayChannel, N: Notifier + 'static> FileSaver for RelayedSaver<C, N> {
    fn save(&mut self, file: &DownloadFile) -> Result<(), SaveError> {
        let message = RelayMessage::download(&file.content, &file.filename);
        let notifier = Rc::clone(&self.notifier);
        let sent = self.channel.send(
            message,
            Box::new(move |reply| match reply {
                Ok(DownloadResponse::Success { download_id }) => {
                    info!(target: "beautifier::render", download_id, "Download initiated by relay");
                }
                Ok(DownloadResponse::Error { message }) => {
                    error!(target: "beautifier::render", %message, "Download failed");
                    notifier.alert(&format!("{ALERT_PREFIX}{message}"));
                }
                Err(e) => {
                    error!(target: "beautifier::render", error = %e, "Error sending message");
                    notifier.alert(&format!("{ALERT_PREFIX}{e}"));
                }
            }),
        );
        if let Err(e) = sent {
            error!(target: "beautifier::render", error = %e, "Failed to send message");
            self.notifier.alert(&format!("{ALERT_PREFIX}{SEND_FAILED_MESSAGE}"));
            return Err(e.into());
        }
        Ok(())
    }
}

/// Uses `primary` when it is available, otherwise or on failure `fallback`.
///
/// A failing primary is tried once per save and the fallback once after it.
#[derive(Debug)]
pub struct FallbackSaver<P, F> {
    primary: P,
    fallback: F,
}

impl<P: FileSaver, F: FileSaver> FallbackSaver<P, F> {
    /// Compose two savers.
    pub const fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// The preferred saver.
    #[must_use]
    pub const fn primary(&self) -> &P {
        &self.primary
    }

    /// The saver used when the primary is unavailable or fails.
    #[must_use]
    pub const fn fallback(&self) -> &F {
        &self.fallback
    }
}

impl<P: FileSaver, F: FileSaver> FileSaver for FallbackSaver<P, F> {
    fn is_available(&self) -> bool {
        self.primary.is_available() || self.fallback.is_available()
    }

    fn save(&mut self, file: &DownloadFile) -> Result<(), SaveError> {
        if self.primary.is_available() {
            match self.primary.save(file) {
                Ok(()) => return Ok(()),
                Err(e) => error!(target: "beautifier::render", error = %e, "Failed direct download"),
            }
        }
        self.fallback.save(file)
    }
}
