use serde::{Deserialize, Serialize};

use crate::core::{AxisIndex, HierarchyNode, MorphMode, SeriesSpec};
use crate::error::{ChartError, ChartResult};

/// Chart type tag understood by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    #[default]
    Pie,
    Donut,
    Column,
    Bar,
    Line,
    Area,
    Scatter,
    Bubble,
    Treemap,
    Sunburst,
    MorphScatter,
}

impl ChartKind {
    #[must_use]
    pub fn is_hierarchical(self) -> bool {
        matches!(self, Self::Treemap | Self::Sunburst)
    }

    #[must_use]
    pub fn is_circular(self) -> bool {
        matches!(self, Self::Pie | Self::Donut)
    }

    /// Kinds whose points are positioned by `x`/`y` rather than by category.
    #[must_use]
    pub fn is_coordinate_based(self) -> bool {
        matches!(self, Self::Scatter | Self::Bubble | Self::MorphScatter)
    }

    #[must_use]
    pub fn has_axes(self) -> bool {
        !self.is_circular() && !self.is_hierarchical()
    }
}

/// Container-level directives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    pub background_color: String,
    pub reflow: bool,
}

impl Default for ChartFrame {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            background_color: "transparent".to_owned(),
            reflow: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipDirective {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_format: Option<String>,
    pub point_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLabelDirective {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Echo of the label threshold; affected points carry `labelSuppressed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// Per-plot interaction and shape directives.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotDirective {
    pub allow_point_select: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisDirection {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisDefinition {
    pub direction: AxisDirection,
    pub index: AxisIndex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub opposite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Data extent of the series plotted against this axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Complete, renderer-agnostic description of one chart.
///
/// Rebuilt from scratch on every recompute and handed to the renderer as a
/// whole; renderers never receive partial updates through this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpecification {
    pub kind: ChartKind,
    pub chart: ChartFrame,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub tooltip: TooltipDirective,
    pub data_labels: DataLabelDirective,
    pub plot: PlotDirective,
    #[serde(default)]
    pub axes: Vec<AxisDefinition>,
    #[serde(default)]
    pub series: Vec<SeriesSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<Vec<HierarchyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morph_mode: Option<MorphMode>,
}

impl ChartSpecification {
    /// Checks the invariants a renderer relies on.
    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in [("width", self.chart.width), ("height", self.chart.height)] {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ChartError::InvalidData(format!(
                        "chart `{name}` must be finite and > 0"
                    )));
                }
            }
        }

        let has_y_axes = self
            .axes
            .iter()
            .any(|axis| axis.direction == AxisDirection::Y);
        for series in &self.series {
            let routed_axis_exists = self.axes.iter().any(|axis| {
                axis.direction == AxisDirection::Y && axis.index == series.axis_index
            });
            if has_y_axes && !routed_axis_exists {
                return Err(ChartError::InvalidData(format!(
                    "series routed to missing y axis {}",
                    series.axis_index.as_index()
                )));
            }
            for point in &series.data {
                for value in [point.x, point.y, point.z].into_iter().flatten() {
                    if !value.is_finite() {
                        return Err(ChartError::InvalidData(
                            "series point values must be finite".to_owned(),
                        ));
                    }
                }
            }
        }

        if let Some(nodes) = &self.hierarchy {
            for node in nodes {
                if !node.value.is_finite() || !node.percent.is_finite() {
                    return Err(ChartError::InvalidData(format!(
                        "hierarchy node `{}` has invalid value or percent",
                        node.id
                    )));
                }
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|series| series.data.len()).sum::<usize>()
            + self.hierarchy.as_ref().map_or(0, Vec::len)
    }
}
