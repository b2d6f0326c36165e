//! Corpus Item Viewer WASM Module
//!
//! Displays a structured corpus item as HTML. Scalar fields become
//! `name: value` lines, `matrix` payloads get their shape and a Plotly
//! heatmap, and `fst` payloads get a transducer graph when enabled.

pub mod api;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod parse;
pub mod present;
pub mod renderers;
pub mod view;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use error::{ChartError, LoadError, ViewerError};
pub use models::*;
pub use renderers::{render_item, Diagnostic, RenderOutput};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if console_log::init_with_level(log::Level::Debug).is_err() {
            web_sys::console::warn_1(&"[WASM] logger already initialized".into());
        }
    }

    log::info!("Corpus item viewer WASM module initialized");
    api::render::autorun();
}
