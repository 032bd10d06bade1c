//! Background service worker: the download relay over `chrome.downloads`.

use std::cell::RefCell;
use std::rc::Rc;

use beautifier_relay::{
    DownloadCallback, DownloadHost, DownloadId, DownloadOptions, DownloadRelay, DownloadResponse,
    HostError, on_installed,
};
use js_sys::Function;
use tracing::error;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::Url;

use crate::{chrome, console, page};

/// `chrome.downloads` and blob URLs of the worker global.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDownloadHost;

fn download_id(value: &JsValue) -> Option<DownloadId> {
    serde_json::from_str(&chrome::to_json(value)?).ok()
}

impl DownloadHost for BrowserDownloadHost {
    fn create_object_url(&self, content: &str, mime_type: &str) -> Result<String, HostError> {
        page::blob_url(content, mime_type).map_err(|e| HostError(chrome::message(&e)))
    }

    fn revoke_object_url(&self, url: &str) {
        let _ = Url::revoke_object_url(url);
    }

    fn download(&self, options: DownloadOptions, on_complete: DownloadCallback) {
        let pending = Rc::new(RefCell::new(Some(on_complete)));
        let finish = {
            let pending = Rc::clone(&pending);
            move |result: Result<DownloadId, HostError>| {
                if let Some(callback) = pending.borrow_mut().take() {
                    callback(result);
                }
            }
        };

        let Some((downloads, start)) = chrome::method(&["downloads"], "download") else {
            finish(Err(HostError("chrome.downloads unavailable".to_string())));
            return;
        };
        let options = match chrome::to_js(&options) {
            Ok(options) => options,
            Err(e) => {
                finish(Err(HostError(e)));
                return;
            }
        };

        let on_started = {
            let finish = finish.clone();
            Closure::once_into_js(move |id: JsValue| {
                let result = match chrome::last_error_message() {
                    Some(message) => Err(HostError(message)),
                    None => download_id(&id)
                        .ok_or_else(|| HostError("Download did not start".to_string())),
                };
                finish(result);
            })
        };

        if let Err(e) = start.call2(&downloads, &options, &on_started) {
            finish(Err(HostError(chrome::message(&e))));
        }
    }
}

fn listen_for_downloads(relay: DownloadRelay<BrowserDownloadHost>) -> Result<(), String> {
    let listener = Closure::wrap(Box::new(
        move |message: JsValue, _sender: JsValue, send_response: Function| -> JsValue {
            let Some(value) = chrome::to_json(&message)
                .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
            else {
                return JsValue::FALSE;
            };
            let respond = Box::new(move |response: DownloadResponse| {
                match chrome::to_js(&response) {
                    Ok(reply) => {
                        let _ = send_response.call1(&JsValue::UNDEFINED, &reply);
                    }
                    Err(e) => error!(target: "beautifier::web", error = %e, "Could not encode response"),
                }
            });
            JsValue::from_bool(relay.handle_value(&value, respond).keep_channel_open())
        },
    )
        as Box<dyn FnMut(JsValue, JsValue, Function) -> JsValue>);
    chrome::add_listener(&["runtime", "onMessage"], listener.as_ref())?;
    // Lives as long as the worker.
    listener.forget();
    Ok(())
}

fn listen_for_install() -> Result<(), String> {
    let listener = Closure::wrap(Box::new(on_installed) as Box<dyn FnMut()>);
    chrome::add_listener(&["runtime", "onInstalled"], listener.as_ref())?;
    listener.forget();
    Ok(())
}

/// Register the download relay and the install hook.
#[wasm_bindgen(js_name = startBackground)]
pub fn start_background() {
    console::init();
    let relay = DownloadRelay::new(BrowserDownloadHost);
    if let Err(e) = listen_for_downloads(relay) {
        error!(target: "beautifier::web", error = %e, "Could not register download relay");
    }
    if let Err(e) = listen_for_install() {
        error!(target: "beautifier::web", error = %e, "Could not register install hook");
    }
}
