//! Shared helpers for the JavaScript-facing API
//!
//! Console logging macros plus the conversions between `JsValue` and the
//! crate's own types, each logging before it hands an error back to JS.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::models::CorpusItem;

// ============================================================================
// Console Logging Functions
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn info(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

// ============================================================================
// Logging Macros
// ============================================================================

/// Log an info message with [WASM] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

/// Log a warning message with [WASM] ⚠️ prefix
#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_warn(&format!($($arg)*))
    };
}

/// Log an error message with [WASM] ❌ prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_error(&format!($($arg)*))
    };
}

pub fn log_info(msg: &str) {
    info(&format!("[WASM] {}", msg));
}

pub fn log_warn(msg: &str) {
    warn(&format!("[WASM] ⚠️ {}", msg));
}

pub fn log_error(msg: &str) {
    error(&format!("[WASM] ❌ {}", msg));
}

// ============================================================================
// Conversion Helpers
// ============================================================================

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        JsValue::from_str(&msg)
    })
}

/// Log a viewer error and convert it for JavaScript
pub fn viewer_error(err: ViewerError) -> JsValue {
    log_error(&err.to_string());
    err.into()
}

fn to_json(value: JsValue) -> Result<serde_json::Value, String> {
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

/// Decode an item object from JavaScript, keeping its key order
pub fn item_from_js(value: JsValue) -> Result<CorpusItem, JsValue> {
    let json = to_json(value).map_err(|e| viewer_error(ViewerError::InvalidItem(e)))?;
    CorpusItem::from_json(&json).map_err(viewer_error)
}

/// Decode optional viewer options; `undefined`/`null` give the defaults
pub fn options_from_js(value: JsValue) -> Result<ViewerConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(ViewerConfig::default());
    }
    let json = to_json(value).map_err(|e| viewer_error(ViewerError::InvalidOptions(e)))?;
    ViewerConfig::from_json(&json).map_err(viewer_error)
}
