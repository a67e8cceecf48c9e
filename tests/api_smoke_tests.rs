use chartspec::api::{ChartEngine, ChartEngineConfig, FieldValue, InputStore, ToggleOutcome, fields};
use chartspec::core::{AxisIndex, DEFAULT_PALETTE, MorphMode, PointUpdate};
use chartspec::error::{ChartError, ChartResult};
use chartspec::render::{AxisDirection, ChartKind, ChartSpecification, NullRenderer, Renderer};

fn pie_inputs() -> InputStore {
    InputStore::new()
        .with(fields::LABELS, FieldValue::texts(["Chrome", "Firefox", "Safari"]))
        .with(fields::VALUES, FieldValue::numbers([60.0, 25.0, 15.0]))
        .with(fields::COLORS, FieldValue::texts(["#ff0000", "", "#0000ff"]))
        .with(fields::PALETTE, FieldValue::texts(["#aaa", "#bbb"]))
        .with(fields::TITLE, "Browser share")
}

fn morph_inputs() -> InputStore {
    InputStore::new()
        .with(fields::LABELS, FieldValue::texts(["p", "q", "r"]))
        .with(fields::X_VALUES, FieldValue::numbers([1.0, 3.0, 5.0]))
        .with(fields::Y_VALUES, FieldValue::numbers([2.0, 4.0, 6.0]))
        .with(fields::ALT_X_VALUES, FieldValue::numbers([10.0, 30.0, 50.0]))
        .with(fields::ALT_Y_VALUES, FieldValue::numbers([20.0, 40.0, 60.0]))
}

fn xy(spec: &ChartSpecification) -> Vec<(Option<f64>, Option<f64>)> {
    spec.series[0].data.iter().map(|p| (p.x, p.y)).collect()
}

#[test]
fn pie_specification_from_host_fields() {
    let engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::Pie),
        pie_inputs(),
    )
    .expect("engine init");

    let spec = engine.specification();
    assert_eq!(spec.kind, ChartKind::Pie);
    assert_eq!(spec.title.as_deref(), Some("Browser share"));
    assert_eq!(spec.series.len(), 1);
    assert!(spec.axes.is_empty());

    let colors: Vec<Option<&str>> = spec.series[0]
        .data
        .iter()
        .map(|p| p.color.as_deref())
        .collect();
    assert_eq!(colors, vec![Some("#ff0000"), Some("#bbb"), Some("#0000ff")]);
    let values: Vec<Option<f64>> = spec.series[0].data.iter().map(|p| p.y).collect();
    assert_eq!(values, vec![Some(60.0), Some(25.0), Some(15.0)]);

    assert_eq!(spec.tooltip.header_format.as_deref(), Some(""));
    assert!(spec.tooltip.point_format.contains("{point.percentage:.1f}%"));
    assert!(spec.data_labels.enabled);
    assert_eq!(spec.data_labels.distance, Some(20.0));
    assert!(spec.plot.allow_point_select);
    assert_eq!(spec.plot.cursor.as_deref(), Some("pointer"));
    assert_eq!(spec.plot.inner_size, None);
    assert_eq!(spec.chart.background_color, "transparent");
    assert!(spec.chart.reflow);

    assert_eq!(engine.renderer().render_count, 1);
    assert_eq!(engine.renderer().last_point_count, 3);
}

#[test]
fn donut_sets_inner_size() {
    let engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::Donut).with_donut_inner_size("60%"),
        pie_inputs(),
    )
    .expect("engine init");

    assert_eq!(engine.specification().plot.inner_size.as_deref(), Some("60%"));
}

#[test]
fn every_field_change_recomputes_and_renders() {
    let mut engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::Pie),
        pie_inputs(),
    )
    .expect("engine init");

    let changed = engine
        .set_field(fields::VALUES, FieldValue::numbers([1.0, 2.0, 3.0]))
        .expect("set values");
    assert!(changed);
    assert_eq!(engine.generation(), 2);
    assert_eq!(engine.renderer().render_count, 2);
    assert_eq!(engine.specification().series[0].data[2].y, Some(3.0));

    let unchanged = engine
        .set_field(fields::VALUES, FieldValue::numbers([1.0, 2.0, 3.0]))
        .expect("set same values");
    assert!(!unchanged);
    assert_eq!(engine.generation(), 2);
    assert_eq!(engine.renderer().render_count, 2);
}

#[test]
fn set_fields_recomputes_once() {
    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::Column),
    )
    .expect("engine init");

    engine
        .set_fields([
            (fields::LABELS, FieldValue::texts(["a", "b"])),
            (fields::VALUES, FieldValue::numbers([1.0, 2.0])),
        ])
        .expect("set fields");

    assert_eq!(engine.generation(), 2);
    assert_eq!(engine.renderer().render_count, 2);
    assert_eq!(engine.specification().point_count(), 2);
}

#[test]
fn removing_a_field_drops_its_effect() {
    let mut engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::Pie),
        pie_inputs(),
    )
    .expect("engine init");

    assert!(engine.remove_field(fields::TITLE).expect("remove title"));
    assert_eq!(engine.specification().title, None);
    assert!(!engine.remove_field(fields::TITLE).expect("remove missing"));
}

#[test]
fn grouped_column_chart_routes_groups_to_dual_axes() {
    let inputs = InputStore::new()
        .with(fields::LABELS, FieldValue::texts(["Q1", "Q2", "Q1", "Q2"]))
        .with(fields::VALUES, FieldValue::numbers([1.0, 2.0, 3.0, 4.0]))
        .with(fields::GROUPS, FieldValue::texts(["rev", "rev", "cost", "cost"]))
        .with(fields::AXIS_ROUTING, FieldValue::bools([false, true]))
        .with(fields::SECONDARY_AXIS_TITLE, "Cost");
    let engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::Column),
        inputs,
    )
    .expect("engine init");

    let spec = engine.specification();
    assert_eq!(spec.series.len(), 2);
    assert_eq!(spec.series[0].name.as_deref(), Some("rev"));
    assert_eq!(spec.series[0].color, DEFAULT_PALETTE[0]);
    assert_eq!(spec.series[1].axis_index, AxisIndex::Secondary);

    assert_eq!(spec.axes.len(), 3);
    assert_eq!(spec.axes[0].direction, AxisDirection::X);
    assert_eq!(
        spec.axes[0].categories,
        Some(vec!["Q1".to_owned(), "Q2".to_owned()])
    );
    assert_eq!(spec.axes[1].index, AxisIndex::Primary);
    assert_eq!((spec.axes[1].min, spec.axes[1].max), (Some(1.0), Some(2.0)));
    assert!(spec.axes[2].opposite);
    assert_eq!(spec.axes[2].title.as_deref(), Some("Cost"));
    assert_eq!((spec.axes[2].min, spec.axes[2].max), (Some(3.0), Some(4.0)));

    let slots: Vec<Option<f64>> = spec.series[1].data.iter().map(|p| p.x).collect();
    assert_eq!(slots, vec![Some(0.0), Some(1.0)]);
}

#[test]
fn secondary_values_become_second_flat_series() {
    let inputs = InputStore::new()
        .with(fields::LABELS, FieldValue::texts(["a", "b"]))
        .with(fields::VALUES, FieldValue::numbers([1.0, 2.0]))
        .with(fields::SECONDARY_VALUES, FieldValue::numbers([10.0, 20.0]))
        .with(fields::SERIES_NAMES, FieldValue::texts(["Sales", "Margin"]));
    let engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::Line),
        inputs,
    )
    .expect("engine init");

    let spec = engine.specification();
    assert_eq!(spec.series.len(), 2);
    assert_eq!(spec.series[1].name.as_deref(), Some("Margin"));
    assert_eq!(spec.series[1].data[1].y, Some(20.0));
    assert_eq!(spec.axes.len(), 2);
}

#[test]
fn multiple_flat_series_are_colored_per_series() {
    let inputs = InputStore::new()
        .with(fields::LABELS, FieldValue::texts(["a", "b", "c"]))
        .with(fields::VALUES, FieldValue::numbers([1.0, 2.0, 3.0]))
        .with(fields::SECONDARY_VALUES, FieldValue::numbers([4.0, 5.0, 6.0]))
        .with(fields::PALETTE, FieldValue::texts(["#111", "#222", "#333"]));
    let engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::Column),
        inputs,
    )
    .expect("engine init");

    let spec = engine.specification();
    assert_eq!(spec.series.len(), 2);
    assert_eq!(spec.series[0].color, "#111");
    assert_eq!(spec.series[1].color, "#222");
    assert!(
        spec.series[0]
            .data
            .iter()
            .all(|p| p.color.as_deref() == Some("#111"))
    );
    assert!(
        spec.series[1]
            .data
            .iter()
            .all(|p| p.color.as_deref() == Some("#222"))
    );
}

#[test]
fn treemap_builds_hierarchy_from_linked_fields() {
    let inputs = InputStore::new()
        .with(fields::IDS, FieldValue::texts(["root", "a", "b"]))
        .with(fields::PARENTS, FieldValue::texts(["", "root", "root"]))
        .with(fields::LABELS, FieldValue::texts(["Root", "A", "B"]))
        .with(
            fields::VALUES,
            FieldValue::NumberArray(vec![None, Some(3.0), Some(1.0)]),
        )
        .with(fields::ROOT_ID, "root");
    let engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::Treemap),
        inputs,
    )
    .expect("engine init");

    let spec = engine.specification();
    let nodes = spec.hierarchy.as_ref().expect("hierarchy");
    assert!(spec.series.is_empty());
    assert!(spec.axes.is_empty());
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].value, 4.0);
    assert_eq!(nodes[0].color, None);
    assert_eq!(nodes[1].percent, 75.0);
    assert_eq!(nodes[1].color.as_deref(), Some(DEFAULT_PALETTE[0]));
    assert_eq!(nodes[2].color.as_deref(), Some(DEFAULT_PALETTE[1]));
}

#[test]
fn morph_toggle_commits_one_batch_and_persists_mode() {
    let mut engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::MorphScatter),
        morph_inputs(),
    )
    .expect("engine init");
    assert_eq!(engine.specification().morph_mode, Some(MorphMode::Primary));
    assert_eq!(xy(engine.specification())[0], (Some(1.0), Some(2.0)));

    let outcome = engine.toggle_morph().expect("toggle");
    assert_eq!(
        outcome,
        ToggleOutcome::Applied {
            mode: MorphMode::Alternate,
            updates: 3,
        }
    );
    assert_eq!(engine.renderer().committed_batches, vec![3]);
    assert!(engine.renderer().staged_updates.is_empty());
    assert!(!engine.morph().expect("morph controller").is_toggling());
    assert_eq!(engine.inputs().flag(fields::ALTERNATE_MODE), Some(true));
    assert_eq!(engine.specification().morph_mode, Some(MorphMode::Alternate));
    assert_eq!(
        xy(engine.specification()),
        vec![
            (Some(10.0), Some(20.0)),
            (Some(30.0), Some(40.0)),
            (Some(50.0), Some(60.0)),
        ]
    );

    engine.toggle_morph().expect("toggle back");
    assert_eq!(engine.renderer().committed_batches, vec![3, 3]);
    assert_eq!(
        xy(engine.specification()),
        vec![
            (Some(1.0), Some(2.0)),
            (Some(3.0), Some(4.0)),
            (Some(5.0), Some(6.0)),
        ]
    );
}

#[test]
fn morph_toggle_is_unsupported_for_static_kinds() {
    let mut engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::Pie),
        pie_inputs(),
    )
    .expect("engine init");

    assert_eq!(engine.toggle_morph().expect("toggle"), ToggleOutcome::Unsupported);
    assert!(engine.renderer().committed_batches.is_empty());
}

#[derive(Debug, Default)]
struct FlakyRenderer {
    applied: Vec<PointUpdate>,
    commits: usize,
    fail_at: Option<usize>,
}

impl Renderer for FlakyRenderer {
    fn render(&mut self, spec: &ChartSpecification) -> ChartResult<()> {
        spec.validate()
    }

    fn apply_point_update(&mut self, update: &PointUpdate) -> ChartResult<()> {
        if self.fail_at == Some(self.applied.len()) {
            self.fail_at = None;
            return Err(ChartError::InvalidData("adapter unavailable".to_owned()));
        }
        self.applied.push(*update);
        Ok(())
    }

    fn commit(&mut self) -> ChartResult<()> {
        self.commits += 1;
        Ok(())
    }
}

#[test]
fn failed_morph_batch_rolls_back_applied_points() {
    let renderer = FlakyRenderer {
        fail_at: Some(1),
        ..FlakyRenderer::default()
    };
    let mut engine = ChartEngine::with_inputs(
        renderer,
        ChartEngineConfig::new(ChartKind::MorphScatter),
        morph_inputs(),
    )
    .expect("engine init");

    let err = engine.toggle_morph().expect_err("toggle should fail");
    assert!(matches!(err, ChartError::InvalidData(_)));

    let applied = &engine.renderer().applied;
    assert_eq!(applied.len(), 2);
    assert_eq!((applied[0].new_x, applied[0].new_y), (10.0, 20.0));
    assert_eq!(
        applied[1],
        PointUpdate {
            series_index: 0,
            point_index: 0,
            new_x: 1.0,
            new_y: 2.0,
        }
    );
    assert_eq!(engine.renderer().commits, 1);

    let morph = engine.morph().expect("morph controller");
    assert_eq!(morph.mode(), MorphMode::Primary);
    assert!(!morph.is_toggling());
    assert_eq!(engine.specification().morph_mode, Some(MorphMode::Primary));

    let retry = engine.toggle_morph().expect("retry");
    assert_eq!(
        retry,
        ToggleOutcome::Applied {
            mode: MorphMode::Alternate,
            updates: 3,
        }
    );
    assert_eq!(engine.renderer().commits, 2);
}

#[test]
fn alternate_mode_field_selects_starting_coordinates() {
    let inputs = morph_inputs().with(fields::ALTERNATE_MODE, true);
    let engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::MorphScatter),
        inputs,
    )
    .expect("engine init");

    assert_eq!(engine.morph().map(|m| m.mode()), Some(MorphMode::Alternate));
    assert_eq!(xy(engine.specification())[2], (Some(50.0), Some(60.0)));
}

#[test]
fn morph_label_flags_follow_placed_coordinates() {
    let inputs = InputStore::new()
        .with(fields::LABELS, FieldValue::texts(["p"]))
        .with(fields::X_VALUES, FieldValue::numbers([1.0]))
        .with(fields::Y_VALUES, FieldValue::numbers([2.0]))
        .with(fields::ALT_X_VALUES, FieldValue::numbers([5.0]))
        .with(fields::ALT_Y_VALUES, FieldValue::numbers([60.0]))
        .with(fields::LABEL_THRESHOLD, 10.0);
    let mut engine = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::MorphScatter),
        inputs.clone().with(fields::ALTERNATE_MODE, true),
    )
    .expect("engine init");

    let point = &engine.specification().series[0].data[0];
    assert_eq!(point.y, Some(60.0));
    assert!(!point.label_suppressed);

    engine.toggle_morph().expect("toggle");
    let point = &engine.specification().series[0].data[0];
    assert_eq!(point.y, Some(2.0));
    assert!(point.label_suppressed);

    let primary = ChartEngine::with_inputs(
        NullRenderer::default(),
        ChartEngineConfig::new(ChartKind::MorphScatter),
        inputs,
    )
    .expect("engine init");
    assert!(primary.specification().series[0].data[0].label_suppressed);
}

#[test]
fn invalid_config_is_rejected_on_construction() {
    let config = ChartEngineConfig::new(ChartKind::Pie).with_default_palette(["#1", " "]);
    let result = ChartEngine::new(NullRenderer::default(), config);
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}
