//! Viewer configuration
//!
//! Options passed from JavaScript are decoded into [`ViewerConfig`]; any key
//! the caller leaves out keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Plotly bundle used for heatmaps
pub const DEFAULT_PLOTLY_URL: &str = "https://cdn.plot.ly/plotly-latest.min.js";

/// vis.js bundle used for transducer graphs
pub const DEFAULT_VIS_JS_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/vis/4.14.0/vis.min.js";

/// vis.js stylesheet used for transducer graphs
pub const DEFAULT_VIS_CSS_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/vis/4.14.0/vis.min.css";

pub const DEFAULT_LOAD_TIMEOUT_MS: u32 = 30_000;

/// Configuration for rendering and presenting a corpus item
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Script URL of the charting library
    pub plotly_url: String,

    /// Script URL of the graph library
    pub vis_js_url: String,

    /// Stylesheet URL of the graph library
    pub vis_css_url: String,

    /// Give up on a script load after this many milliseconds (`None` waits forever)
    pub load_timeout_ms: Option<u32>,

    /// Draw transducer graphs instead of leaving an empty placeholder
    pub draw_fst: bool,

    /// Prefix for heatmap container ids, suffixed with render and field index
    pub heatmap_id_prefix: String,

    /// Prefix for graph container ids, suffixed with render and field index
    pub graph_id_prefix: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            plotly_url: DEFAULT_PLOTLY_URL.to_string(),
            vis_js_url: DEFAULT_VIS_JS_URL.to_string(),
            vis_css_url: DEFAULT_VIS_CSS_URL.to_string(),
            load_timeout_ms: Some(DEFAULT_LOAD_TIMEOUT_MS),
            draw_fst: false,
            heatmap_id_prefix: "heatmap".to_string(),
            graph_id_prefix: "fst-graph".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Decode options from JSON; `null` yields the defaults
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ViewerError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
            .map_err(|e| ViewerError::InvalidOptions(e.to_string()))
    }

    pub fn heatmap_id(&self, render_id: usize, field_index: usize) -> String {
        format!("{}-{}-{}", self.heatmap_id_prefix, render_id, field_index)
    }

    pub fn graph_id(&self, render_id: usize, field_index: usize) -> String {
        format!("{}-{}-{}", self.graph_id_prefix, render_id, field_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let config = ViewerConfig::from_json(&json!({ "drawFst": true })).unwrap();
        assert!(config.draw_fst);
        assert_eq!(config.plotly_url, DEFAULT_PLOTLY_URL);
        assert_eq!(config.load_timeout_ms, Some(DEFAULT_LOAD_TIMEOUT_MS));
    }

    #[test]
    fn test_null_options_are_default() {
        assert_eq!(ViewerConfig::from_json(&json!(null)).unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_wrong_option_type_is_rejected() {
        let err = ViewerConfig::from_json(&json!({ "loadTimeoutMs": "soon" })).unwrap_err();
        assert!(matches!(err, ViewerError::InvalidOptions(_)));
    }

    #[test]
    fn test_container_ids_use_render_and_field_index() {
        let config = ViewerConfig::default();
        assert_eq!(config.heatmap_id(0, 3), "heatmap-0-3");
        assert_eq!(config.graph_id(2, 0), "fst-graph-2-0");
    }
}
