//! Error types for the corpus item viewer
//!
//! Field-level problems never surface here; they degrade to a
//! [`Diagnostic`](crate::renderers::Diagnostic) and the field is skipped.
//! These types cover the operation-level failures returned to JavaScript.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Failure while fetching an external script or stylesheet
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// The browser fired `error` on the inserted element
    #[error("failed to load {url}")]
    Failed { url: String },

    /// No `load` event arrived before the configured timeout
    #[error("timed out after {timeout_ms} ms loading {url}")]
    Timeout { url: String, timeout_ms: u32 },

    /// There is no window/document to insert the element into
    #[error("no document available to load {url}")]
    NoDocument { url: String },

    /// Creating or inserting the element threw
    #[error("DOM error while loading {url}: {message}")]
    Dom { url: String, message: String },
}

/// Failure reported by a charting or graph delegate for one request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("container '{0}' not found")]
    MissingContainer(String),

    #[error("could not encode plot data: {0}")]
    Encode(String),

    #[error("charting library error: {0}")]
    Library(String),
}

/// Top-level viewer error returned by the JS-facing entry points
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    /// The item is not a JSON/JS object
    #[error("invalid corpus item: {0}")]
    InvalidItem(String),

    /// The options object could not be decoded
    #[error("invalid viewer options: {0}")]
    InvalidOptions(String),

    /// The hosting page did not inject the expected global
    #[error("global '{0}' is not defined")]
    MissingGlobal(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("DOM error: {0}")]
    Dom(String),
}

impl From<ViewerError> for JsValue {
    fn from(err: ViewerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort readable message from a thrown JS value
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_messages_name_the_url() {
        let err = LoadError::Timeout {
            url: "https://cdn.example/lib.js".to_string(),
            timeout_ms: 500,
        };
        assert_eq!(err.to_string(), "timed out after 500 ms loading https://cdn.example/lib.js");

        let wrapped: ViewerError = LoadError::Failed { url: "a.js".to_string() }.into();
        assert_eq!(wrapped.to_string(), "failed to load a.js");
    }
}
