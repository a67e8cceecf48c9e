use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::ChartKind;

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format. Host fields override the
/// matching defaults on every recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub kind: ChartKind,
    #[serde(default = "default_data_label_distance_px")]
    pub data_label_distance_px: f64,
    #[serde(default = "default_donut_inner_size")]
    pub donut_inner_size: String,
    #[serde(default = "default_allow_point_select")]
    pub allow_point_select: bool,
    #[serde(default)]
    pub default_label_threshold: Option<f64>,
    #[serde(default)]
    pub default_palette: Vec<String>,
    #[serde(default)]
    pub tooltip_point_format: Option<String>,
    /// Render after every recompute. Hosts that batch field updates can turn
    /// this off and call `ChartEngine::render` themselves.
    #[serde(default = "default_auto_render")]
    pub auto_render: bool,
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            data_label_distance_px: default_data_label_distance_px(),
            donut_inner_size: default_donut_inner_size(),
            allow_point_select: default_allow_point_select(),
            default_label_threshold: None,
            default_palette: Vec::new(),
            tooltip_point_format: None,
            auto_render: default_auto_render(),
        }
    }

    #[must_use]
    pub fn with_data_label_distance_px(mut self, distance: f64) -> Self {
        self.data_label_distance_px = distance;
        self
    }

    #[must_use]
    pub fn with_donut_inner_size(mut self, inner_size: impl Into<String>) -> Self {
        self.donut_inner_size = inner_size.into();
        self
    }

    #[must_use]
    pub fn with_allow_point_select(mut self, allow: bool) -> Self {
        self.allow_point_select = allow;
        self
    }

    #[must_use]
    pub fn with_default_label_threshold(mut self, threshold: Option<f64>) -> Self {
        self.default_label_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_default_palette<S: Into<String>>(
        mut self,
        palette: impl IntoIterator<Item = S>,
    ) -> Self {
        self.default_palette = palette.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_tooltip_point_format(mut self, format: impl Into<String>) -> Self {
        self.tooltip_point_format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_auto_render(mut self, auto_render: bool) -> Self {
        self.auto_render = auto_render;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.data_label_distance_px.is_finite() {
            return Err(ChartError::InvalidData(
                "config `data_label_distance_px` must be finite".to_owned(),
            ));
        }
        if let Some(threshold) = self.default_label_threshold {
            if !threshold.is_finite() {
                return Err(ChartError::InvalidData(
                    "config `default_label_threshold` must be finite".to_owned(),
                ));
            }
        }
        if self.default_palette.iter().any(|color| color.trim().is_empty()) {
            return Err(ChartError::InvalidData(
                "config `default_palette` must not contain blank colors".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ChartEngineConfig {
    fn default() -> Self {
        Self::new(ChartKind::default())
    }
}

fn default_data_label_distance_px() -> f64 {
    20.0
}

fn default_donut_inner_size() -> String {
    "50%".to_owned()
}

fn default_allow_point_select() -> bool {
    true
}

fn default_auto_render() -> bool {
    true
}
