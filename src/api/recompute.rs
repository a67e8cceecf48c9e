use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::core::{
    AssemblyOptions, AxisIndex, ColorResolver, HierarchyInput, LinkedNode, MorphController,
    MorphMode, PaletteState, Point, PointProjection, SeriesData, SeriesSpec, TabularInput,
    assemble, below_label_threshold, build_hierarchy, group_points,
};
use crate::render::{
    AxisDefinition, AxisDirection, ChartFrame, ChartKind, ChartSpecification, DataLabelDirective,
    PlotDirective, TooltipDirective,
};

use super::ChartEngineConfig;
use super::inputs::{InputStore, fields};

const PIE_POINT_FORMAT: &str =
    "<span style=\"color:{point.color}\">\u{25cf}</span> {point.name}: <b>{point.percentage:.1f}%</b>";
const CATEGORY_POINT_FORMAT: &str =
    "<span style=\"color:{point.color}\">\u{25cf}</span> {series.name}: <b>{point.y}</b>";
const SCATTER_POINT_FORMAT: &str = "{point.name}: ({point.x}, {point.y})";
const BUBBLE_POINT_FORMAT: &str = "{point.name}: ({point.x}, {point.y}), size {point.z}";
const HIERARCHY_POINT_FORMAT: &str = "{point.name}: <b>{point.value}</b> ({point.percent}%)";

/// Builds the full chart specification from the current host fields.
///
/// Pure: the same config and inputs always produce the same specification,
/// and malformed or missing inputs degrade to absent values instead of
/// failing.
#[must_use]
pub fn recompute(config: &ChartEngineConfig, inputs: &InputStore) -> ChartSpecification {
    let kind = config.kind;
    let palette = effective_palette(config, inputs);
    let resolver = ColorResolver::new(&palette);
    let label_threshold = inputs
        .number(fields::LABEL_THRESHOLD)
        .or(config.default_label_threshold);

    let mut spec = ChartSpecification {
        kind,
        chart: ChartFrame {
            width: positive(inputs.number(fields::WIDTH)),
            height: positive(inputs.number(fields::HEIGHT)),
            ..ChartFrame::default()
        },
        title: inputs.non_blank_text(fields::TITLE),
        subtitle: inputs.non_blank_text(fields::SUBTITLE),
        tooltip: tooltip_for(kind, config, inputs),
        data_labels: DataLabelDirective {
            enabled: kind.is_circular() || kind.is_hierarchical() || label_threshold.is_some(),
            distance: kind.is_circular().then_some(config.data_label_distance_px),
            threshold: label_threshold,
        },
        plot: PlotDirective {
            allow_point_select: config.allow_point_select && kind.is_circular(),
            cursor: (config.allow_point_select && kind.is_circular())
                .then(|| "pointer".to_owned()),
            inner_size: (kind == ChartKind::Donut).then(|| config.donut_inner_size.clone()),
        },
        axes: Vec::new(),
        series: Vec::new(),
        hierarchy: None,
        morph_mode: None,
    };

    if kind.is_hierarchical() {
        let input = hierarchy_input(inputs);
        spec.hierarchy = Some(build_hierarchy(&input, &palette));
        log_recompute(&spec);
        return spec;
    }

    let table = inputs.table();
    let data = resolve_series_data(kind, &table, &resolver);
    let routing: Vec<bool> = inputs
        .flags(fields::AXIS_ROUTING)
        .into_iter()
        .map(|flag| flag.unwrap_or(false))
        .collect();
    let series_names = inputs.texts(fields::SERIES_NAMES);
    let options = AssemblyOptions {
        axis_routing: (!routing.is_empty()).then_some(routing.as_slice()),
        label_threshold,
        series_names: &series_names,
        projection: if kind.is_coordinate_based() {
            PointProjection::Coordinates
        } else {
            PointProjection::Value
        },
    };
    let mut series = assemble(&data, &options, &table.colors, &resolver);

    if kind == ChartKind::MorphScatter {
        let alternate = inputs.flag(fields::ALTERNATE_MODE).unwrap_or(false);
        let mode = MorphMode::from_alternate_flag(alternate);
        let controller = MorphController::from_series(&series_runs(&data), mode);
        place_at_current(&mut series, &controller, label_threshold);
        spec.morph_mode = Some(mode);
    }

    if kind.has_axes() {
        let categories = if kind.is_coordinate_based() {
            None
        } else {
            Some(assign_categories(&mut series))
        };
        spec.axes = axes_for(&series, categories, inputs);
    }

    spec.series = series;
    log_recompute(&spec);
    spec
}

/// Resolves the flat/grouped shape once for the given chart kind.
///
/// Tagged rows always group. Untagged category charts split secondary values
/// into a second flat series; every other kind gets a single flat series.
#[must_use]
pub fn resolve_series_data(
    kind: ChartKind,
    table: &TabularInput,
    resolver: &ColorResolver<'_>,
) -> SeriesData {
    if table.has_group_tags() && !kind.is_circular() {
        return SeriesData::Grouped(group_points(table, resolver));
    }

    let points = table.points();
    let has_secondary = points.iter().any(|point| point.secondary_value.is_some());
    if has_secondary && !kind.is_circular() && !kind.is_coordinate_based() {
        let secondary: Vec<Point> = points
            .iter()
            .map(|point| Point {
                value: point.secondary_value,
                ..point.clone()
            })
            .collect();
        return SeriesData::Flat(vec![points, secondary]);
    }
    SeriesData::Flat(vec![points])
}

/// Per-series point runs in series order, for seeding a morph controller.
#[must_use]
pub fn series_runs(data: &SeriesData) -> Vec<Vec<Point>> {
    match data {
        SeriesData::Flat(runs) => runs.clone(),
        SeriesData::Grouped(groups) => groups.iter().map(|group| group.points.clone()).collect(),
    }
}

/// Morph-capable point runs for the current host fields.
#[must_use]
pub fn morph_runs(config: &ChartEngineConfig, inputs: &InputStore) -> Vec<Vec<Point>> {
    let palette = effective_palette(config, inputs);
    let resolver = ColorResolver::new(&palette);
    series_runs(&resolve_series_data(config.kind, &inputs.table(), &resolver))
}

fn effective_palette(config: &ChartEngineConfig, inputs: &InputStore) -> PaletteState {
    let mut palette = inputs.palette();
    if palette.colors.is_empty() {
        palette.colors.clone_from(&config.default_palette);
    }
    palette
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

fn tooltip_for(
    kind: ChartKind,
    config: &ChartEngineConfig,
    inputs: &InputStore,
) -> TooltipDirective {
    let default_format = match kind {
        ChartKind::Pie | ChartKind::Donut => PIE_POINT_FORMAT,
        ChartKind::Scatter | ChartKind::MorphScatter => SCATTER_POINT_FORMAT,
        ChartKind::Bubble => BUBBLE_POINT_FORMAT,
        ChartKind::Treemap | ChartKind::Sunburst => HIERARCHY_POINT_FORMAT,
        ChartKind::Column | ChartKind::Bar | ChartKind::Line | ChartKind::Area => {
            CATEGORY_POINT_FORMAT
        }
    };
    TooltipDirective {
        header_format: kind.is_circular().then(String::new),
        point_format: inputs
            .non_blank_text(fields::TOOLTIP_FORMAT)
            .or_else(|| config.tooltip_point_format.clone())
            .unwrap_or_else(|| default_format.to_owned()),
    }
}

fn hierarchy_input(inputs: &InputStore) -> HierarchyInput {
    let ids = inputs.texts(fields::IDS);
    if ids.iter().all(Option::is_none) {
        return HierarchyInput::Flat(inputs.table().points());
    }

    let parents = inputs.texts(fields::PARENTS);
    let labels = inputs.texts(fields::LABELS);
    let values = inputs.numbers(fields::VALUES);
    let colors = inputs.texts(fields::COLORS);
    let nodes = ids
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let id = id.clone().unwrap_or_else(|| index.to_string());
            LinkedNode {
                name: labels
                    .get(index)
                    .cloned()
                    .flatten()
                    .unwrap_or_else(|| id.clone()),
                parent: parents.get(index).cloned().flatten(),
                value: values.get(index).copied().flatten().filter(|v| v.is_finite()),
                color: colors.get(index).cloned().flatten(),
                id,
            }
        })
        .collect();

    HierarchyInput::Linked {
        nodes,
        root_id: inputs.non_blank_text(fields::ROOT_ID),
    }
}

/// Moves points to the controller's coordinates; label flags follow the placed `y`.
fn place_at_current(
    series: &mut [SeriesSpec],
    controller: &MorphController,
    label_threshold: Option<f64>,
) {
    for point in controller.points() {
        let Some(target) = series
            .get_mut(point.series_index)
            .and_then(|spec| spec.data.get_mut(point.point_index))
        else {
            continue;
        };
        let (x, y) = match point.current {
            Some((x, y)) => (Some(x), Some(y)),
            None => (None, None),
        };
        target.x = x;
        target.y = y;
        target.label_suppressed = below_label_threshold(y, label_threshold);
    }
}

/// Gives every category point its slot on a shared x axis, first-seen order.
fn assign_categories(series: &mut [SeriesSpec]) -> Vec<String> {
    let mut categories: IndexSet<String> = IndexSet::new();
    for spec in series.iter_mut() {
        for point in &mut spec.data {
            let (slot, _) = categories.insert_full(point.name.clone());
            point.x = Some(slot as f64);
        }
    }
    categories.into_iter().collect()
}

fn axes_for(
    series: &[SeriesSpec],
    categories: Option<Vec<String>>,
    inputs: &InputStore,
) -> Vec<AxisDefinition> {
    let x_values = series
        .iter()
        .flat_map(|spec| spec.data.iter().filter_map(|point| point.x));
    let (x_min, x_max) = if categories.is_some() {
        (None, None)
    } else {
        extent(x_values)
    };

    let mut axes = vec![AxisDefinition {
        direction: AxisDirection::X,
        index: AxisIndex::Primary,
        title: inputs.non_blank_text(fields::X_AXIS_TITLE),
        opposite: false,
        categories,
        min: x_min,
        max: x_max,
    }];

    for axis in [AxisIndex::Primary, AxisIndex::Secondary] {
        let routed = series.iter().filter(|spec| spec.axis_index == axis);
        if axis == AxisIndex::Secondary && routed.clone().next().is_none() {
            continue;
        }
        let (min, max) = extent(
            routed.flat_map(|spec| spec.data.iter().filter_map(|point| point.y)),
        );
        let title_field = match axis {
            AxisIndex::Primary => fields::Y_AXIS_TITLE,
            AxisIndex::Secondary => fields::SECONDARY_AXIS_TITLE,
        };
        axes.push(AxisDefinition {
            direction: AxisDirection::Y,
            index: axis,
            title: inputs.non_blank_text(title_field),
            opposite: axis == AxisIndex::Secondary,
            categories: None,
            min,
            max,
        });
    }
    axes
}

fn extent(values: impl Iterator<Item = f64> + Clone) -> (Option<f64>, Option<f64>) {
    let min = values.clone().min_by_key(|v| OrderedFloat(*v));
    let max = values.max_by_key(|v| OrderedFloat(*v));
    (min, max)
}

fn log_recompute(spec: &ChartSpecification) {
    debug!(
        kind = ?spec.kind,
        series = spec.series.len(),
        points = spec.point_count(),
        axes = spec.axes.len(),
        "recomputed chart specification"
    );
}
