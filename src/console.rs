//! Browser console logging. Every message is prefixed with the context it came from.

use wasm_bindgen::JsValue;

pub fn error(context: &str, message: &str) {
    web_sys::console::error_1(&JsValue::from_str(&format!("[discover:{context}] {message}")));
}

pub fn warn(context: &str, message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(&format!("[discover:{context}] {message}")));
}

pub fn debug(context: &str, message: &str) {
    web_sys::console::debug_1(&JsValue::from_str(&format!("[discover:{context}] {message}")));
}
