//! Content-script implementations of the saver capabilities.

use std::time::Duration;

use beautifier_relay::{DownloadResponse, RelayMessage};
use beautifier_render::save::ReplyCallback;
use beautifier_render::{ChannelError, Notifier, PageDownloads, RelayChannel, SaveError};
use js_sys::{Array, Function};
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Url, Window};

use crate::chrome;

/// Blob links and timers of the page window.
#[derive(Debug, Clone)]
pub struct PageBlobDownloads {
    window: Window,
    document: Document,
}

impl PageBlobDownloads {
    /// Use `window` and its document.
    pub const fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }
}

/// Build an object URL for `content` typed as `mime_type`.
pub fn blob_url(content: &str, mime_type: &str) -> Result<String, JsValue> {
    let parts = Array::of1(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    Url::create_object_url_with_blob(&blob)
}

impl PageDownloads for PageBlobDownloads {
    type Link = HtmlAnchorElement;

    fn is_supported(&self) -> bool {
        self.document.body().is_some()
    }

    fn create_object_url(&self, content: &str, mime_type: &str) -> Result<String, SaveError> {
        blob_url(content, mime_type).map_err(|e| SaveError::ObjectUrl(chrome::message(&e)))
    }

    fn revoke_object_url(&self, url: &str) {
        let _ = Url::revoke_object_url(url);
    }

    fn click_link(&self, url: &str, filename: &str) -> Result<HtmlAnchorElement, SaveError> {
        let link_error = |e: JsValue| SaveError::Link(chrome::message(&e));
        let body = self
            .document
            .body()
            .ok_or_else(|| SaveError::Link("document has no body".to_string()))?;
        let anchor = self
            .document
            .create_element("a")
            .map_err(link_error)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|e| link_error(e.into()))?;
        anchor.set_attribute("style", "display: none").map_err(link_error)?;
        anchor.set_href(url);
        anchor.set_download(filename);
        let _ = body.append_child(&anchor).map_err(link_error)?;
        anchor.click();
        Ok(anchor)
    }

    fn remove_link(&self, link: &HtmlAnchorElement) {
        link.remove();
    }

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(task);
        let timeout = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let _ = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout);
    }
}

/// `window.alert`.
#[derive(Debug, Clone)]
pub struct WindowAlert {
    window: Window,
}

impl WindowAlert {
    /// Alert through `window`.
    pub const fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Notifier for WindowAlert {
    fn alert(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }
}

/// `chrome.runtime.sendMessage` to the background relay.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeChannel;

impl RelayChannel for RuntimeChannel {
    fn send(&self, message: RelayMessage, on_reply: ReplyCallback) -> Result<(), ChannelError> {
        let (runtime, send_message): (JsValue, Function) =
            chrome::method(&["runtime"], "sendMessage").ok_or_else(|| {
                ChannelError("chrome.runtime.sendMessage unavailable".to_string())
            })?;
        let payload = chrome::to_js(&message).map_err(ChannelError)?;

        let callback = Closure::once_into_js(move |response: JsValue| {
            if let Some(error) = chrome::last_error_message() {
                on_reply(Err(ChannelError(error)));
                return;
            }
            let decoded = chrome::to_json(&response)
                .and_then(|text| serde_json::from_str::<DownloadResponse>(&text).ok());
            match decoded {
                Some(response) => on_reply(Ok(response)),
                None => debug!(target: "beautifier::web", "Relay reply was not a download response"),
            }
        });

        send_message
            .call2(&runtime, &payload, &callback)
            .map(|_| ())
            .map_err(|e| ChannelError(chrome::message(&e)))
    }
}
