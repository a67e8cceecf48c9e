use serde::{Deserialize, Serialize};

/// One row of the parallel input arrays.
///
/// `index` is the row position in the source arrays and is the point's
/// identity: it never changes between recomputes of the same inputs, which is
/// what lets the morph controller address points across a toggle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub index: usize,
    pub name: String,
    pub value: Option<f64>,
    pub secondary_value: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub alt_x: Option<f64>,
    pub alt_y: Option<f64>,
    pub group: Option<String>,
    pub color: Option<String>,
}

impl Point {
    #[must_use]
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_xy(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    #[must_use]
    pub fn with_alt_xy(mut self, x: f64, y: f64) -> Self {
        self.alt_x = Some(x);
        self.alt_y = Some(y);
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Primary coordinate pair, present only when both halves are.
    #[must_use]
    pub fn primary_xy(&self) -> Option<(f64, f64)> {
        self.x.zip(self.y)
    }

    /// Alternate coordinate pair, present only when both halves are.
    #[must_use]
    pub fn alternate_xy(&self) -> Option<(f64, f64)> {
        self.alt_x.zip(self.alt_y)
    }
}

/// Named partition of points sharing one tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    /// Slot in first-seen order, starting at zero.
    pub order: usize,
    /// Legend color for the whole group. Individual points may still carry
    /// their own explicit color.
    pub color: String,
    pub points: Vec<Point>,
}

/// Input shape resolved once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    /// One or more flat series, each an ordered run of points.
    Flat(Vec<Vec<Point>>),
    /// Points partitioned by tag; one series per group.
    Grouped(Vec<Group>),
}

impl SeriesData {
    #[must_use]
    pub fn series_count(&self) -> usize {
        match self {
            Self::Flat(series) => series.len(),
            Self::Grouped(groups) => groups.len(),
        }
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        match self {
            Self::Flat(series) => series.iter().map(Vec::len).sum(),
            Self::Grouped(groups) => groups.iter().map(|group| group.points.len()).sum(),
        }
    }
}

/// Which value axis a series is plotted against. Serialized as `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AxisIndex {
    #[default]
    Primary,
    Secondary,
}

impl AxisIndex {
    #[must_use]
    pub fn from_routing(secondary: bool) -> Self {
        if secondary {
            Self::Secondary
        } else {
            Self::Primary
        }
    }

    #[must_use]
    pub fn as_index(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

impl From<AxisIndex> for u8 {
    fn from(axis: AxisIndex) -> Self {
        axis.as_index()
    }
}

impl TryFrom<u8> for AxisIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Primary),
            1 => Ok(Self::Secondary),
            other => Err(format!("axis index must be 0 or 1, got {other}")),
        }
    }
}

/// Renderer-facing record derived from a [`Point`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub index: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Set when the point's value falls below the label threshold. The point
    /// stays in the series; only its text label is hidden.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub label_suppressed: bool,
}

/// One renderable dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub color: String,
    pub axis_index: AxisIndex,
    pub data: Vec<SeriesPoint>,
}

/// Tree entry for treemap/sunburst layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub value: f64,
    /// Share of the sibling total as a percentage, rounded to one decimal.
    pub percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Ordered palette plus fallback. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaletteState {
    pub colors: Vec<String>,
    pub fallback: Option<String>,
}

impl PaletteState {
    #[must_use]
    pub fn new(colors: Vec<String>) -> Self {
        Self {
            colors,
            fallback: None,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}
