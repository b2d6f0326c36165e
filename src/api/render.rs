//! Rendering entry points exposed to JavaScript
//!
//! The page either injects an `item_data` global before the module starts
//! (picked up by [`autorun`]) or calls `renderCorpusItem` itself.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{self, viewer_error};
use crate::config::ViewerConfig;
use crate::error::{js_error_message, LoadError, ViewerError};
use crate::loader::{self, page_resources};
use crate::models::CorpusItem;
use crate::present::{self, PlotlyCharts, VisNetworkGraphs, PLOTLY_GLOBAL, VIS_GLOBAL};
use crate::renderers::{render_item, RenderSummary};
use crate::{wasm_error, wasm_info, wasm_warn};

/// Name of the global the hosting page injects the item under
pub const ITEM_GLOBAL: &str = "item_data";

/// Render an item into a new `<div>` appended to `<body>`
///
/// # Parameters
/// - `item_js`: the corpus item object
/// - `options_js`: optional viewer options (see `ViewerConfig`)
///
/// # Returns
/// `{ fields, plots, graphs, diagnostics, failed_draws }`
#[wasm_bindgen(js_name = renderCorpusItem)]
pub async fn render_corpus_item(
    item_js: JsValue,
    options_js: JsValue,
) -> Result<JsValue, JsValue> {
    let config = helpers::options_from_js(options_js)?;
    let item = helpers::item_from_js(item_js)?;
    let summary = show_item(&item, &config).await.map_err(viewer_error)?;
    helpers::serialize(&summary, "Summary serialization error")
}

/// Render the item injected as the `item_data` global
#[wasm_bindgen(js_name = renderItemData)]
pub async fn render_item_data(options_js: JsValue) -> Result<JsValue, JsValue> {
    let item_js = injected_item()
        .ok_or_else(|| viewer_error(ViewerError::MissingGlobal(ITEM_GLOBAL.to_string())))?;
    render_corpus_item(item_js, options_js).await
}

/// Render an item to an HTML string without touching the document
///
/// Heatmap and graph containers are present but empty.
#[wasm_bindgen(js_name = renderCorpusItemHtml)]
pub fn render_corpus_item_html(item_js: JsValue, options_js: JsValue) -> Result<String, JsValue> {
    let config = helpers::options_from_js(options_js)?;
    let item = helpers::item_from_js(item_js)?;
    Ok(render_item(&item, &config).root.to_html())
}

fn injected_item() -> Option<JsValue> {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(ITEM_GLOBAL))
        .ok()
        .filter(|v| !v.is_undefined())
}

/// Start the default view when the page has injected an item
pub fn autorun() {
    if injected_item().is_none() {
        log::debug!("no '{}' global, waiting for an explicit render call", ITEM_GLOBAL);
        return;
    }

    wasm_bindgen_futures::spawn_local(async {
        match render_item_data(JsValue::UNDEFINED).await {
            Ok(_) => wasm_info!("corpus item rendered"),
            Err(e) => wasm_error!("corpus item render failed: {}", js_error_message(&e)),
        }
    });
}

/// Wait for the document, render, mount under `<body>`, then draw
///
/// The text view is mounted before any library is fetched, so a failed
/// library load still leaves the field values on the page. Each library is
/// loaded on its own: if one fails, only its plots or graphs are skipped and
/// reported in `failed_draws`.
pub async fn show_item(
    item: &CorpusItem,
    config: &ViewerConfig,
) -> Result<RenderSummary, ViewerError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ViewerError::Dom("no document".to_string()))?;
    loader::document_ready(&document).await?;

    let output = render_item(item, config);
    let body = document
        .body()
        .ok_or_else(|| ViewerError::Dom("document has no body".to_string()))?;
    present::mount(&document, &body, &output.root)?;

    let resources = page_resources();
    let timeout_ms = config.load_timeout_ms;

    let charts_ready = if output.plots.is_empty() {
        false
    } else {
        let loaded = resources
            .load_library(&config.plotly_url, PLOTLY_GLOBAL, timeout_ms)
            .await;
        library_ready(loaded, output.plots.len(), "heatmaps")
    };

    let graphs_ready = if output.graphs.is_empty() {
        false
    } else {
        if let Err(err) = resources.load_stylesheet(&config.vis_css_url) {
            wasm_warn!("graph stylesheet not loaded: {}", err);
        }
        let loaded = resources
            .load_library(&config.vis_js_url, VIS_GLOBAL, timeout_ms)
            .await;
        library_ready(loaded, output.graphs.len(), "graphs")
    };

    let mut charts = PlotlyCharts;
    let mut graphs = VisNetworkGraphs::new(document);
    let failed = present::run_delegates(
        &output,
        charts_ready.then_some(&mut charts),
        graphs_ready.then_some(&mut graphs),
    )
    .await;
    Ok(output.summary(failed))
}

fn library_ready(loaded: Result<(), LoadError>, requests: usize, what: &str) -> bool {
    match loaded {
        Ok(()) => true,
        Err(err) => {
            wasm_warn!("{}; skipping {} {}", err, requests, what);
            false
        }
    }
}
