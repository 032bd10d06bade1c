//! Reflection helpers for the `chrome.*` extension APIs, which `web-sys` does
//! not bind.

use js_sys::{Function, JSON, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

/// Look up `chrome.<path...>` on the global object.
pub fn api(path: &[&str]) -> Option<JsValue> {
    let mut value = Reflect::get(&js_sys::global(), &"chrome".into()).ok()?;
    for segment in path {
        if value.is_undefined() || value.is_null() {
            return None;
        }
        value = Reflect::get(&value, &(*segment).into()).ok()?;
    }
    (!value.is_undefined() && !value.is_null()).then_some(value)
}

/// Look up a function and the object it must be called on.
pub fn method(object: &[&str], name: &str) -> Option<(JsValue, Function)> {
    let target = api(object)?;
    let function = Reflect::get(&target, &name.into()).ok()?.dyn_into::<Function>().ok()?;
    Some((target, function))
}

/// `chrome.runtime.lastError.message`, set while a callback runs after a
/// failed call.
pub fn last_error_message() -> Option<String> {
    let error = api(&["runtime", "lastError"])?;
    Some(
        Reflect::get(&error, &"message".into())
            .ok()
            .and_then(|m| m.as_string())
            .unwrap_or_else(|| "Unknown error".to_string()),
    )
}

/// `obj.addListener(callback)` on `chrome.<event path>`.
pub fn add_listener(event: &[&str], callback: &JsValue) -> Result<(), String> {
    let (target, add) =
        method(event, "addListener").ok_or_else(|| format!("chrome.{} unavailable", event.join(".")))?;
    add.call1(&target, callback).map(|_| ()).map_err(|e| message(&e))
}

/// Convert a serializable value into a plain JS object.
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    let text = serde_json::to_string(value).map_err(|e| e.to_string())?;
    JSON::parse(&text).map_err(|e| message(&e))
}

/// Convert a plain JS value into JSON text.
pub fn to_json(value: &JsValue) -> Option<String> {
    if value.is_undefined() {
        return None;
    }
    JSON::stringify(value).ok().map(String::from)
}

/// Best-effort description of a thrown JS value.
pub fn message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
