use chartspec::core::{ColorPolicy, ColorResolver, ColorSlot, DEFAULT_PALETTE, PaletteState};

fn palette(colors: &[&str]) -> PaletteState {
    PaletteState::new(colors.iter().map(|c| (*c).to_owned()).collect())
}

fn explicit(colors: &[Option<&str>]) -> Vec<Option<String>> {
    colors.iter().map(|c| c.map(str::to_owned)).collect()
}

#[test]
fn group_colors_cycle_with_wraparound() {
    let palette = palette(&["#a", "#b", "#c"]);
    let resolver = ColorResolver::new(&palette);

    let colors: Vec<String> = (0..7).map(|order| resolver.group_color(order)).collect();
    assert_eq!(colors, vec!["#a", "#b", "#c", "#a", "#b", "#c", "#a"]);
}

#[test]
fn explicit_color_wins_over_group_palette() {
    let palette = palette(&["#a", "#b"]);
    let resolver = ColorResolver::new(&palette);
    let explicit = explicit(&[None, Some("#f00")]);

    assert_eq!(
        resolver.resolve(ColorSlot::grouped(1, 0), &explicit).as_deref(),
        Some("#f00")
    );
    assert_eq!(
        resolver.resolve(ColorSlot::grouped(0, 1), &explicit).as_deref(),
        Some("#b")
    );
}

#[test]
fn ungrouped_items_cycle_supplied_palette_by_index() {
    let palette = palette(&["#a", "#b"]);
    let resolver = ColorResolver::new(&palette);

    let colors: Vec<Option<String>> = (0..4)
        .map(|index| resolver.resolve(ColorSlot::item(index), &[]))
        .collect();
    assert_eq!(
        colors,
        vec![
            Some("#a".to_owned()),
            Some("#b".to_owned()),
            Some("#a".to_owned()),
            Some("#b".to_owned()),
        ]
    );
}

#[test]
fn grouped_data_without_palette_uses_default_palette() {
    let palette = PaletteState::default();
    let resolver = ColorResolver::new(&palette);

    assert_eq!(resolver.group_color(0), DEFAULT_PALETTE[0]);
    assert_eq!(resolver.group_color(11), DEFAULT_PALETTE[1]);
}

#[test]
fn ungrouped_items_without_palette_fall_back_to_default_color() {
    let with_fallback = PaletteState::default().with_fallback("#999");
    let resolver = ColorResolver::new(&with_fallback);
    assert_eq!(
        resolver.resolve(ColorSlot::item(4), &[]).as_deref(),
        Some("#999")
    );

    let bare = PaletteState::default();
    let resolver = ColorResolver::new(&bare);
    assert_eq!(resolver.resolve(ColorSlot::item(4), &[]), None);
}

#[test]
fn explicit_colors_shorter_than_data_do_not_fail() {
    let palette = palette(&["#a"]);
    let resolver = ColorResolver::new(&palette);
    let explicit = explicit(&[Some("#f00")]);

    assert_eq!(
        resolver.resolve(ColorSlot::item(9), &explicit).as_deref(),
        Some("#a")
    );
}

#[test]
fn resolution_is_idempotent() {
    let palette = palette(&["#a", "#b", "#c"]).with_fallback("#000");
    let resolver = ColorResolver::new(&palette);
    let explicit = explicit(&[Some("#f00"), None, Some(" ")]);

    let first: Vec<Option<String>> = (0..6)
        .map(|index| resolver.resolve(ColorSlot::grouped(index, index / 2), &explicit))
        .collect();
    let second: Vec<Option<String>> = (0..6)
        .map(|index| resolver.resolve(ColorSlot::grouped(index, index / 2), &explicit))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn policy_list_is_inspectable() {
    let palette = PaletteState::default();
    let resolver = ColorResolver::new(&palette);
    assert_eq!(
        resolver.policies(),
        &[
            ColorPolicy::ExplicitPerIndex,
            ColorPolicy::GroupPalette,
            ColorPolicy::DefaultPalette,
            ColorPolicy::ItemPalette,
            ColorPolicy::Fallback,
        ]
    );

    let trimmed = ColorResolver::new(&palette).with_policies(&[ColorPolicy::ExplicitPerIndex]);
    assert_eq!(trimmed.resolve(ColorSlot::grouped(0, 0), &[]), None);
}
