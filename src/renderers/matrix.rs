//! Matrix visualizer
//!
//! Reports the matrix shape and, for anything larger than a single row or
//! column, reserves a container and requests a heatmap for it.

use serde::Serialize;

use super::{labelled_line, RenderContext};
use crate::models::MatrixPayload;
use crate::view::ViewElement;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Heatmap,
}

/// One trace in the charting library's data format: `{ z, type }`
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct HeatmapTrace {
    pub z: Vec<Vec<f64>>,
    #[serde(rename = "type")]
    pub kind: TraceKind,
}

impl HeatmapTrace {
    pub fn new(z: Vec<Vec<f64>>) -> Self {
        Self {
            z,
            kind: TraceKind::Heatmap,
        }
    }
}

/// A plot to draw into `container_id` once the view is mounted
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PlotRequest {
    pub container_id: String,
    pub traces: Vec<HeatmapTrace>,
}

pub fn render_matrix(
    node: &mut ViewElement,
    field_index: usize,
    payload: &MatrixPayload,
    ctx: &mut RenderContext<'_>,
) {
    let mut info = ViewElement::div().with_class("matrix-info");
    info.push(labelled_line("Number of rows", payload.rows()));
    info.push(labelled_line("Number of cols", payload.cols()));

    if payload.has_heatmap() {
        let container_id = ctx.config.heatmap_id(ctx.render_id, field_index);
        info.push(ViewElement::div().with_id(container_id.clone()).with_class("heatmap"));
        ctx.request_plot(PlotRequest {
            container_id,
            traces: vec![HeatmapTrace::new(payload.data().to_vec())],
        });
    }

    node.push(info);
}
