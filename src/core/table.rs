use crate::core::types::Point;

/// Parallel input arrays for one chart.
///
/// Arrays may disagree in length. Missing trailing entries read as absent
/// rather than failing, and non-finite numbers are treated as absent too.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularInput {
    pub labels: Vec<Option<String>>,
    pub values: Vec<Option<f64>>,
    pub secondary_values: Vec<Option<f64>>,
    pub groups: Vec<Option<String>>,
    pub colors: Vec<Option<String>>,
    pub x_values: Vec<Option<f64>>,
    pub y_values: Vec<Option<f64>>,
    pub z_values: Vec<Option<f64>>,
    pub alt_x_values: Vec<Option<f64>>,
    pub alt_y_values: Vec<Option<f64>>,
}

impl TabularInput {
    #[must_use]
    pub fn from_labels_values<S: Into<String>>(
        labels: impl IntoIterator<Item = S>,
        values: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self {
            labels: labels.into_iter().map(|label| Some(label.into())).collect(),
            values: values.into_iter().map(Some).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_groups<S: Into<String>>(mut self, groups: impl IntoIterator<Item = S>) -> Self {
        self.groups = groups.into_iter().map(|group| Some(group.into())).collect();
        self
    }

    #[must_use]
    pub fn with_colors<S: Into<String>>(mut self, colors: impl IntoIterator<Item = S>) -> Self {
        self.colors = colors.into_iter().map(|color| Some(color.into())).collect();
        self
    }

    #[must_use]
    pub fn with_secondary_values(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.secondary_values = values.into_iter().map(Some).collect();
        self
    }

    #[must_use]
    pub fn with_xy(
        mut self,
        x: impl IntoIterator<Item = f64>,
        y: impl IntoIterator<Item = f64>,
    ) -> Self {
        self.x_values = x.into_iter().map(Some).collect();
        self.y_values = y.into_iter().map(Some).collect();
        self
    }

    #[must_use]
    pub fn with_z(mut self, z: impl IntoIterator<Item = f64>) -> Self {
        self.z_values = z.into_iter().map(Some).collect();
        self
    }

    #[must_use]
    pub fn with_alt_xy(
        mut self,
        x: impl IntoIterator<Item = f64>,
        y: impl IntoIterator<Item = f64>,
    ) -> Self {
        self.alt_x_values = x.into_iter().map(Some).collect();
        self.alt_y_values = y.into_iter().map(Some).collect();
        self
    }

    /// Number of rows.
    ///
    /// Labels drive the row count. Without labels, the longest numeric column
    /// does, so coordinate-only inputs (scatter, bubble) still produce points.
    #[must_use]
    pub fn row_count(&self) -> usize {
        if !self.labels.is_empty() {
            return self.labels.len();
        }
        [
            self.values.len(),
            self.secondary_values.len(),
            self.x_values.len(),
            self.y_values.len(),
            self.z_values.len(),
            self.alt_x_values.len(),
            self.alt_y_values.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// True when at least one row carries a group tag.
    #[must_use]
    pub fn has_group_tags(&self) -> bool {
        self.groups
            .iter()
            .take(self.row_count())
            .any(|tag| tag.is_some())
    }

    /// Builds the point at `index`, padding absent columns.
    #[must_use]
    pub fn point(&self, index: usize) -> Point {
        Point {
            index,
            name: text_at(&self.labels, index).unwrap_or_default(),
            value: number_at(&self.values, index),
            secondary_value: number_at(&self.secondary_values, index),
            x: number_at(&self.x_values, index),
            y: number_at(&self.y_values, index),
            z: number_at(&self.z_values, index),
            alt_x: number_at(&self.alt_x_values, index),
            alt_y: number_at(&self.alt_y_values, index),
            group: text_at(&self.groups, index),
            color: text_at(&self.colors, index),
        }
    }

    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        (0..self.row_count()).map(|index| self.point(index)).collect()
    }
}

fn number_at(column: &[Option<f64>], index: usize) -> Option<f64> {
    column
        .get(index)
        .copied()
        .flatten()
        .filter(|value| value.is_finite())
}

fn text_at(column: &[Option<String>], index: usize) -> Option<String> {
    column.get(index).cloned().flatten()
}
