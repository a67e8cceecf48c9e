use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::color::{ColorResolver, ColorSlot};
use crate::core::grouping::point_color;
use crate::core::types::{AxisIndex, Point, SeriesData, SeriesPoint, SeriesSpec};

/// Which point fields feed the renderer-facing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointProjection {
    /// Category charts: `y = value`.
    #[default]
    Value,
    /// Cartesian charts: `x`, `y` and (for bubbles) `z` from the coordinates.
    Coordinates,
}

/// Display directives applied while assembling series.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AssemblyOptions<'a> {
    /// `axis_routing[i] == true` sends series `i` to the secondary axis.
    pub axis_routing: Option<&'a [bool]>,
    /// Points whose projected value is below this get their label hidden.
    pub label_threshold: Option<f64>,
    /// Positional name overrides for flat series.
    pub series_names: &'a [Option<String>],
    pub projection: PointProjection,
}

/// Turns grouped or flat data into the final series list.
///
/// Series follow input order (group order for grouped data) and points keep
/// their original index order. Nothing is filtered out: the label threshold
/// only flags points.
#[must_use]
pub fn assemble(
    data: &SeriesData,
    options: &AssemblyOptions<'_>,
    explicit_colors: &[Option<String>],
    resolver: &ColorResolver<'_>,
) -> Vec<SeriesSpec> {
    let series: Vec<SeriesSpec> = match data {
        SeriesData::Grouped(groups) => groups
            .iter()
            .enumerate()
            .map(|(series_index, group)| SeriesSpec {
                name: Some(group.name.clone()),
                color: group.color.clone(),
                axis_index: route(options.axis_routing, series_index),
                data: group
                    .points
                    .iter()
                    .map(|point| {
                        let color = point_color(group, point, explicit_colors, resolver);
                        project(point, Some(color), options)
                    })
                    .collect(),
            })
            .collect(),
        SeriesData::Flat(runs) => {
            let single_run = runs.len() == 1;
            runs.iter()
                .enumerate()
                .map(|(series_index, points)| {
                    let series_color = resolver.group_color(series_index);
                    let data = points
                        .iter()
                        .map(|point| {
                            // One run cycles the palette per point; several runs are
                            // colored per series like groups.
                            let color = if single_run {
                                resolver.resolve(ColorSlot::item(point.index), explicit_colors)
                            } else {
                                let slot = ColorSlot::grouped(point.index, series_index);
                                resolver
                                    .resolve(slot, explicit_colors)
                                    .or_else(|| Some(series_color.clone()))
                            };
                            project(point, color, options)
                        })
                        .collect();
                    SeriesSpec {
                        name: options.series_names.get(series_index).cloned().flatten(),
                        color: series_color,
                        axis_index: route(options.axis_routing, series_index),
                        data,
                    }
                })
                .collect()
        }
    };

    trace!(
        series = series.len(),
        points = data.point_count(),
        "assembled series"
    );
    series
}

fn route(axis_routing: Option<&[bool]>, series_index: usize) -> AxisIndex {
    let secondary = axis_routing
        .and_then(|routing| routing.get(series_index))
        .copied()
        .unwrap_or(false);
    AxisIndex::from_routing(secondary)
}

/// True when a threshold is set and `y` is missing or below it.
#[must_use]
pub fn below_label_threshold(y: Option<f64>, threshold: Option<f64>) -> bool {
    threshold.is_some_and(|threshold| y.is_none_or(|value| value < threshold))
}

fn project(point: &Point, color: Option<String>, options: &AssemblyOptions<'_>) -> SeriesPoint {
    let (x, y, z) = match options.projection {
        PointProjection::Value => (None, point.value, None),
        PointProjection::Coordinates => (point.x, point.y, point.z),
    };
    let label_suppressed = below_label_threshold(y, options.label_threshold);

    SeriesPoint {
        index: point.index,
        name: point.name.clone(),
        y,
        x,
        z,
        color,
        label_suppressed,
    }
}
