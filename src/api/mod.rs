//! Corpus Item Viewer WASM API
//!
//! - `helpers`: console logging macros and `JsValue` conversions
//! - `render`: the rendering entry points and the start-up autorun

pub mod helpers;
pub mod render;

pub use render::{render_corpus_item, render_corpus_item_html, render_item_data};
