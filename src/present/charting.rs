//! Charting and graph delegates
//!
//! The renderers only describe what to draw. Drawing is handed to an
//! implementation of [`ChartingDelegate`] / [`GraphDelegate`]; the browser
//! implementations call Plotly and vis.js, which are loaded at runtime and
//! looked up on the global object when first called.

use std::future::Future;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::{js_error_message, ChartError};
use crate::parse::FstGraph;
use crate::renderers::HeatmapTrace;

/// Global defined by the Plotly bundle
pub const PLOTLY_GLOBAL: &str = "Plotly";

/// Global defined by the vis.js bundle
pub const VIS_GLOBAL: &str = "vis";

/// Creates a heatmap plot in a named container
///
/// The future resolves once the plot is drawn, or with the reason it was not.
pub trait ChartingDelegate {
    fn new_plot(
        &mut self,
        container_id: &str,
        traces: &[HeatmapTrace],
    ) -> impl Future<Output = Result<(), ChartError>>;
}

/// Draws a transducer graph in a named container
pub trait GraphDelegate {
    fn draw(
        &mut self,
        container_id: &str,
        graph: &FstGraph,
    ) -> impl Future<Output = Result<(), ChartError>>;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly, js_name = newPlot, catch)]
    fn plotly_new_plot(container_id: &str, data: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(js_namespace = vis, extends = js_sys::Object)]
    type DataSet;

    #[wasm_bindgen(constructor, js_namespace = vis, catch)]
    fn new(items: &JsValue) -> Result<DataSet, JsValue>;

    #[wasm_bindgen(js_namespace = vis, extends = js_sys::Object)]
    type Network;

    #[wasm_bindgen(constructor, js_namespace = vis, catch)]
    fn new(
        container: &web_sys::Element,
        data: &JsValue,
        options: &JsValue,
    ) -> Result<Network, JsValue>;
}

/// Plain JS objects, never `Map`s, so the libraries can read the keys
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ChartError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| ChartError::Encode(e.to_string()))
}

/// Heatmaps through `Plotly.newPlot`
#[derive(Debug, Default, Clone, Copy)]
pub struct PlotlyCharts;

impl ChartingDelegate for PlotlyCharts {
    async fn new_plot(
        &mut self,
        container_id: &str,
        traces: &[HeatmapTrace],
    ) -> Result<(), ChartError> {
        let library = |e: JsValue| ChartError::Library(js_error_message(&e));
        let data = to_js(traces)?;
        // newPlot reports most failures by rejecting, not by throwing
        let drawn = plotly_new_plot(container_id, &data).map_err(library)?;
        JsFuture::from(drawn).await.map(|_| ()).map_err(library)
    }
}

#[derive(Serialize)]
struct VisNode {
    id: u64,
    label: String,
}

#[derive(Serialize)]
struct VisEdge {
    from: u64,
    to: u64,
    label: String,
}

/// Transducer graphs through `vis.Network`, laid out left to right
pub struct VisNetworkGraphs {
    document: web_sys::Document,
}

impl VisNetworkGraphs {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl GraphDelegate for VisNetworkGraphs {
    async fn draw(&mut self, container_id: &str, graph: &FstGraph) -> Result<(), ChartError> {
        let container = self
            .document
            .get_element_by_id(container_id)
            .ok_or_else(|| ChartError::MissingContainer(container_id.to_string()))?;

        let nodes: Vec<VisNode> = graph
            .states
            .iter()
            .map(|s| VisNode { id: s.id, label: s.label() })
            .collect();
        let edges: Vec<VisEdge> = graph
            .edges
            .iter()
            .map(|e| VisEdge { from: e.from, to: e.to, label: e.label() })
            .collect();

        let library = |e: JsValue| ChartError::Library(js_error_message(&e));
        let data = js_sys::Object::new();
        let node_set = DataSet::new(&to_js(&nodes)?).map_err(library)?;
        let edge_set = DataSet::new(&to_js(&edges)?).map_err(library)?;
        js_sys::Reflect::set(&data, &JsValue::from_str("nodes"), &node_set).map_err(library)?;
        js_sys::Reflect::set(&data, &JsValue::from_str("edges"), &edge_set).map_err(library)?;

        let options = to_js(&serde_json::json!({
            "layout": {
                "hierarchical": { "direction": "LR", "sortMethod": "directed" }
            }
        }))?;

        Network::new(&container, &data, &options)
            .map(|_| ())
            .map_err(library)
    }
}
