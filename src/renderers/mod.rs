//! Field renderers
//!
//! [`render_item`] walks a decoded [`CorpusItem`] and builds the view tree,
//! collecting the plots and graphs that still need drawing once the tree is
//! attached to the page. Problems with a single field never abort the
//! render: the field is skipped and a [`Diagnostic`] recorded.

pub mod fst;
pub mod matrix;

pub use fst::{render_fst, GraphRequest};
pub use matrix::{render_matrix, HeatmapTrace, PlotRequest, TraceKind};

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use thiserror::Error;

use crate::config::ViewerConfig;
use crate::models::{CorpusItem, FieldValue, Scalar};
use crate::view::ViewElement;

/// A field that was skipped, and why
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("type for field '{field}' is undefined")]
    MissingType { field: String },

    #[error("type for field '{field}' is unknown ({type_tag})")]
    UnknownType { field: String, type_tag: String },

    #[error("field '{field}' has an invalid {type_tag} payload: {reason}")]
    InvalidPayload {
        field: String,
        type_tag: String,
        reason: String,
    },
}

impl Diagnostic {
    pub fn field(&self) -> &str {
        match self {
            Diagnostic::MissingType { field }
            | Diagnostic::UnknownType { field, .. }
            | Diagnostic::InvalidPayload { field, .. } => field,
        }
    }
}

/// Everything produced by one render pass
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub root: ViewElement,
    pub plots: Vec<PlotRequest>,
    pub graphs: Vec<GraphRequest>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Counts reported back to JavaScript after a render
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RenderSummary {
    pub fields: usize,
    pub plots: usize,
    pub graphs: usize,
    pub diagnostics: Vec<String>,
    pub failed_draws: usize,
}

impl RenderOutput {
    pub fn summary(&self, failed_draws: usize) -> RenderSummary {
        RenderSummary {
            fields: self.root.children.len(),
            plots: self.plots.len(),
            graphs: self.graphs.len(),
            diagnostics: self.diagnostics.iter().map(ToString::to_string).collect(),
            failed_draws,
        }
    }
}

/// Mutable state shared by the visualizers during one render pass
pub struct RenderContext<'a> {
    pub config: &'a ViewerConfig,
    /// Distinguishes container ids of items rendered on the same page
    pub render_id: usize,
    plots: Vec<PlotRequest>,
    graphs: Vec<GraphRequest>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a ViewerConfig, render_id: usize) -> Self {
        Self {
            config,
            render_id,
            plots: Vec::new(),
            graphs: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn request_plot(&mut self, request: PlotRequest) {
        self.plots.push(request);
    }

    pub fn request_graph(&mut self, request: GraphRequest) {
        self.graphs.push(request);
    }

    /// Log and keep a diagnostic
    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn finish(self, root: ViewElement) -> RenderOutput {
        RenderOutput {
            root,
            plots: self.plots,
            graphs: self.graphs,
            diagnostics: self.diagnostics,
        }
    }
}

static NEXT_RENDER_ID: AtomicUsize = AtomicUsize::new(0);

/// Render every field of `item`, in order, under a fresh root element
///
/// Each call takes a new render id, so container ids never collide between
/// items shown on the same page.
pub fn render_item(item: &CorpusItem, config: &ViewerConfig) -> RenderOutput {
    let render_id = NEXT_RENDER_ID.fetch_add(1, Ordering::Relaxed);
    render_item_as(render_id, item, config)
}

/// [`render_item`] with an explicit render id
pub fn render_item_as(
    render_id: usize,
    item: &CorpusItem,
    config: &ViewerConfig,
) -> RenderOutput {
    let mut ctx = RenderContext::new(config, render_id);
    let mut root = ViewElement::div().with_class("corpus-item");

    for (index, (name, value)) in item.fields().iter().enumerate() {
        match value {
            FieldValue::Scalar(scalar) => root.push(render_scalar(name, scalar)),
            FieldValue::Matrix(payload) => {
                let mut node = field_node();
                render_matrix(&mut node, index, payload, &mut ctx);
                root.push(node);
            }
            FieldValue::Fst(payload) => {
                let mut node = field_node();
                if render_fst(&mut node, index, name, payload, &mut ctx) {
                    root.push(node);
                }
            }
            FieldValue::Untyped => ctx.report(Diagnostic::MissingType {
                field: name.clone(),
            }),
            FieldValue::Unknown { type_tag } => ctx.report(Diagnostic::UnknownType {
                field: name.clone(),
                type_tag: type_tag.clone(),
            }),
            FieldValue::Invalid { type_tag, error } => ctx.report(Diagnostic::InvalidPayload {
                field: name.clone(),
                type_tag: type_tag.clone(),
                reason: error.to_string(),
            }),
        }
    }

    log::debug!(
        "rendered {} of {} fields ({} plots, {} graphs)",
        root.children.len(),
        item.len(),
        ctx.plots.len(),
        ctx.graphs.len()
    );
    ctx.finish(root)
}

fn field_node() -> ViewElement {
    ViewElement::div().with_class("field")
}

/// `<b>name</b>: value`
fn render_scalar(name: &str, value: &Scalar) -> ViewElement {
    let mut node = field_node();
    node.push(ViewElement::new("b").with_text(name));
    node.push_text(format!(": {}", value));
    node
}

/// `<div><b>label: </b>value</div>`
pub(crate) fn labelled_line(label: &str, value: impl std::fmt::Display) -> ViewElement {
    let mut line = ViewElement::div();
    line.push(ViewElement::new("b").with_text(format!("{}: ", label)));
    line.push_text(value.to_string());
    line
}
