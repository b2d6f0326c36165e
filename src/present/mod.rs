//! Presenting a rendered item in the live document
//!
//! Mounting comes first: Plotly and vis.js look their containers up in the
//! document, so the view tree must be attached before any delegate runs.

pub mod charting;

pub use charting::{
    ChartingDelegate, GraphDelegate, PlotlyCharts, VisNetworkGraphs, PLOTLY_GLOBAL, VIS_GLOBAL,
};

use web_sys::{Document, Element, Node};

use crate::error::{js_error_message, ViewerError};
use crate::renderers::RenderOutput;
use crate::view::{ViewElement, ViewNode};

/// Create DOM elements for `view` without attaching them
///
/// Text goes through text nodes only, so field values can never inject markup.
pub fn build_element(document: &Document, view: &ViewElement) -> Result<Element, ViewerError> {
    let element = document
        .create_element(&view.tag)
        .map_err(|e| ViewerError::Dom(js_error_message(&e)))?;
    if let Some(id) = &view.id {
        element.set_id(id);
    }
    if let Some(class) = &view.class {
        element.set_class_name(class);
    }

    for child in &view.children {
        let node: Node = match child {
            ViewNode::Element(el) => build_element(document, el)?.into(),
            ViewNode::Text { text } => document.create_text_node(text).into(),
        };
        element
            .append_child(&node)
            .map_err(|e| ViewerError::Dom(js_error_message(&e)))?;
    }

    Ok(element)
}

/// Build `view` and append it under `parent`
pub fn mount(
    document: &Document,
    parent: &Node,
    view: &ViewElement,
) -> Result<Element, ViewerError> {
    let element = build_element(document, view)?;
    parent
        .append_child(&element)
        .map_err(|e| ViewerError::Dom(js_error_message(&e)))?;
    Ok(element)
}

/// Run every plot and graph request; returns how many failed
///
/// A failing request is logged and does not stop the remaining ones. A
/// `None` delegate means its library is unavailable: each of its requests
/// counts as failed and the other kind is still drawn.
pub async fn run_delegates<C, G>(
    output: &RenderOutput,
    mut charts: Option<&mut C>,
    mut graphs: Option<&mut G>,
) -> usize
where
    C: ChartingDelegate,
    G: GraphDelegate,
{
    let mut failed = 0;

    for request in &output.plots {
        let Some(charts) = charts.as_deref_mut() else {
            log::error!("heatmap '{}' skipped: charting library unavailable", request.container_id);
            failed += 1;
            continue;
        };
        if let Err(err) = charts.new_plot(&request.container_id, &request.traces).await {
            log::error!("heatmap '{}' failed: {}", request.container_id, err);
            failed += 1;
        }
    }

    for request in &output.graphs {
        let Some(graphs) = graphs.as_deref_mut() else {
            log::error!("graph '{}' skipped: graph library unavailable", request.container_id);
            failed += 1;
            continue;
        };
        if let Err(err) = graphs.draw(&request.container_id, &request.graph).await {
            log::error!("graph '{}' failed: {}", request.container_id, err);
            failed += 1;
        }
    }

    failed
}
