//! Transducer visualizer
//!
//! Graph drawing is off unless `draw_fst` is set; by default the field gets an
//! empty placeholder container and nothing else.

use serde::Serialize;

use super::{Diagnostic, RenderContext};
use crate::models::{FstPayload, FST_TYPE};
use crate::parse::FstGraph;
use crate::view::ViewElement;

/// A graph to draw into `container_id` once the view is mounted
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GraphRequest {
    pub container_id: String,
    pub graph: FstGraph,
}

/// Render an fst field into `node`
///
/// Returns `false` when the field was skipped with a diagnostic, in which case
/// `node` should not be attached.
pub fn render_fst(
    node: &mut ViewElement,
    field_index: usize,
    field_name: &str,
    payload: &FstPayload,
    ctx: &mut RenderContext<'_>,
) -> bool {
    let mut info = ViewElement::div().with_class("fst-info");

    if !ctx.config.draw_fst {
        info.push(ViewElement::div().with_class("fst-graph"));
        node.push(info);
        return true;
    }

    let graph = match FstGraph::parse(&payload.src) {
        Ok(graph) => graph,
        Err(err) => {
            ctx.report(Diagnostic::InvalidPayload {
                field: field_name.to_string(),
                type_tag: FST_TYPE.to_string(),
                reason: err.to_string(),
            });
            return false;
        }
    };

    let container_id = ctx.config.graph_id(ctx.render_id, field_index);
    info.push(ViewElement::div().with_id(container_id.clone()).with_class("fst-graph"));
    node.push(info);
    ctx.request_graph(GraphRequest { container_id, graph });
    true
}
