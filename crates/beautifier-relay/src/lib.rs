//! Background download relay for the JSON Beautifier extension.
//!
//! # Scope
//!
//! This crate provides:
//! - **Protocol** - the `downloadJson` request and its response, in wire shape
//! - **Relay** - the privileged handler that turns a request into a host
//!   download, answering exactly once
//! - **Lifecycle** - the install hook
//!
//! The relay only runs when the page renderer could not save the file itself.

pub mod handler;
pub mod protocol;

pub use handler::{
    Ack, BLOB_FAILED_MESSAGE, DownloadCallback, DownloadHost, DownloadId, DownloadRelay, HostError,
    MISSING_FIELDS_MESSAGE, Responder, on_installed,
};
pub use protocol::{
    DOWNLOAD_ACTION, DownloadOptions, DownloadRequest, DownloadResponse, RelayMessage,
};
