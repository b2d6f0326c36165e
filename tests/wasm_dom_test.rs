//! Browser tests for mounting, resource loading and drawing
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use corpus_view_wasm::api::render::show_item;
use corpus_view_wasm::config::ViewerConfig;
use corpus_view_wasm::loader::{self, ResourceLoader};
use corpus_view_wasm::models::CorpusItem;
use corpus_view_wasm::present;
use corpus_view_wasm::renderers::render_item;
use corpus_view_wasm::LoadError;
use serde_json::json;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn scripts_with_src(doc: &web_sys::Document, url: &str) -> usize {
    let scripts = doc.get_elements_by_tag_name("script");
    (0..scripts.length())
        .filter_map(|i| scripts.item(i))
        .filter(|s| s.get_attribute("src").as_deref() == Some(url))
        .count()
}

fn global_number(name: &str) -> f64 {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .unwrap()
        .as_f64()
        .unwrap_or(0.0)
}

#[wasm_bindgen_test]
fn test_mount_builds_text_and_containers() {
    let doc = document();
    let item = CorpusItem::from_json(&json!({
        "name": "<b>not bold</b>",
        "m": { "type": "matrix", "data": [[1, 2], [3, 4]] }
    }))
    .unwrap();
    let output = render_item(&item, &ViewerConfig::default());
    let body = doc.body().unwrap();

    let root = present::mount(&doc, &body, &output.root).unwrap();

    assert_eq!(root.class_name(), "corpus-item");
    assert_eq!(root.child_element_count(), 2);
    // Values go in as text, never as markup
    assert!(root.query_selector("b b").unwrap().is_none());
    assert!(root.text_content().unwrap().contains("name: <b>not bold</b>"));
    assert!(doc.get_element_by_id(&output.plots[0].container_id).is_some());

    body.remove_child(&root).unwrap();
}

#[wasm_bindgen_test]
async fn test_document_is_ready_in_test_page() {
    loader::document_ready(&document()).await.unwrap();
}

#[wasm_bindgen_test]
async fn test_missing_script_fails_instead_of_hanging() {
    let resources = ResourceLoader::new();
    let url = "/definitely-missing-script.js";

    let err = resources.load_script(url, Some(5_000)).await.unwrap_err();

    assert!(matches!(err, LoadError::Failed { .. } | LoadError::Timeout { .. }));
    assert!(!resources.is_loaded(url));
}

#[wasm_bindgen_test]
async fn test_concurrent_loads_share_one_script_element() {
    let doc = document();
    let url = "data:text/javascript,window.__corpusViewShared=(window.__corpusViewShared||0)+1";
    let resources = loader::page_resources();
    let same_page = loader::page_resources();
    assert!(Rc::ptr_eq(&resources, &same_page));

    let (first, second) = futures::join!(
        resources.load_script(url, Some(5_000)),
        same_page.load_script(url, Some(5_000))
    );
    first.unwrap();
    second.unwrap();
    resources.load_script(url, Some(5_000)).await.unwrap();

    assert_eq!(scripts_with_src(&doc, url), 1);
    assert_eq!(global_number("__corpusViewShared"), 1.0);
}

#[wasm_bindgen_test]
async fn test_library_already_on_page_is_not_fetched() {
    let doc = document();
    let url = "/never-requested-library.js";
    js_sys::Reflect::set(
        &js_sys::global(),
        &JsValue::from_str("corpusViewPresent"),
        &js_sys::Object::new(),
    )
    .unwrap();
    let resources = ResourceLoader::new();

    resources.load_library(url, "corpusViewPresent", Some(5_000)).await.unwrap();

    assert_eq!(scripts_with_src(&doc, url), 0);
    assert!(resources.is_loaded(url));
}

#[wasm_bindgen_test]
fn test_stylesheet_is_inserted_once() {
    let doc = document();
    let url = "/viewer-test.css";
    let resources = ResourceLoader::new();

    resources.load_stylesheet(url).unwrap();
    resources.load_stylesheet(url).unwrap();

    let links = doc.query_selector_all("link[href='/viewer-test.css']").unwrap();
    assert_eq!(links.length(), 1);
    assert!(resources.is_loaded(url));
}

#[wasm_bindgen_test]
async fn test_failed_graph_library_still_draws_heatmaps() {
    let plotly = js_sys::Object::new();
    let new_plot = js_sys::Function::new_with_args(
        "id, data",
        "window.__corpusViewPlots = (window.__corpusViewPlots || 0) + 1; \
         return Promise.resolve();",
    );
    js_sys::Reflect::set(&plotly, &JsValue::from_str("newPlot"), &new_plot).unwrap();
    js_sys::Reflect::set(&js_sys::global(), &JsValue::from_str("Plotly"), &plotly).unwrap();

    let item = CorpusItem::from_json(&json!({
        "m": { "type": "matrix", "data": [[1, 2], [3, 4]] },
        "g": { "type": "fst", "src": "0\t1\ta\tb\t1\n1\tx" }
    }))
    .unwrap();
    let config = ViewerConfig {
        draw_fst: true,
        vis_js_url: "/missing-graph-library.js".to_string(),
        vis_css_url: "/missing-graph-library.css".to_string(),
        load_timeout_ms: Some(5_000),
        ..ViewerConfig::default()
    };

    let summary = show_item(&item, &config).await.unwrap();

    assert_eq!(summary.plots, 1);
    assert_eq!(summary.graphs, 1);
    assert_eq!(summary.failed_draws, 1);
    assert_eq!(global_number("__corpusViewPlots"), 1.0);
}
