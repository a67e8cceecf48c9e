use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::types::PaletteState;

/// Built-in palette used when grouped data arrives without a palette.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#2caffe", "#544fc5", "#00e272", "#fe6a35", "#6b8abc", "#d568fb", "#2ee0ca", "#fa4b42",
    "#feb56a", "#91e8e1",
];

/// One step of the color fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorPolicy {
    /// `explicit_colors[index]` when present and non-blank.
    ExplicitPerIndex,
    /// `palette[group_order % len]` for grouped slots.
    GroupPalette,
    /// [`DEFAULT_PALETTE`] cycled by group order when no palette is supplied.
    DefaultPalette,
    /// `palette[index % len]` for ungrouped items.
    ItemPalette,
    /// The palette's fallback color, possibly absent.
    Fallback,
}

/// Position being colored: either a point/item or a group-level slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSlot {
    pub index: usize,
    pub group_order: Option<usize>,
}

impl ColorSlot {
    #[must_use]
    pub fn item(index: usize) -> Self {
        Self {
            index,
            group_order: None,
        }
    }

    #[must_use]
    pub fn grouped(index: usize, group_order: usize) -> Self {
        Self {
            index,
            group_order: Some(group_order),
        }
    }
}

/// Pure color decision table over a read-only palette.
///
/// Steps are evaluated top-to-bottom and the first one that yields a color
/// wins. Identical inputs always produce identical output.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorResolver<'a> {
    palette: &'a PaletteState,
    policies: SmallVec<[ColorPolicy; 5]>,
}

impl<'a> ColorResolver<'a> {
    #[must_use]
    pub fn new(palette: &'a PaletteState) -> Self {
        Self {
            palette,
            policies: SmallVec::from_slice(&[
                ColorPolicy::ExplicitPerIndex,
                ColorPolicy::GroupPalette,
                ColorPolicy::DefaultPalette,
                ColorPolicy::ItemPalette,
                ColorPolicy::Fallback,
            ]),
        }
    }

    /// Replaces the evaluation order. Steps missing from `policies` are skipped.
    #[must_use]
    pub fn with_policies(mut self, policies: &[ColorPolicy]) -> Self {
        self.policies = SmallVec::from_slice(policies);
        self
    }

    #[must_use]
    pub fn policies(&self) -> &[ColorPolicy] {
        &self.policies
    }

    #[must_use]
    pub fn palette(&self) -> &PaletteState {
        self.palette
    }

    /// Resolves the color for one slot.
    ///
    /// Returns `None` only when every step falls through and no fallback is
    /// configured; the renderer then applies its own default.
    #[must_use]
    pub fn resolve(&self, slot: ColorSlot, explicit_colors: &[Option<String>]) -> Option<String> {
        self.policies
            .iter()
            .find_map(|policy| self.apply(*policy, slot, explicit_colors))
    }

    /// Group-level color that ignores per-point overrides. Always defined,
    /// since the default palette is never empty.
    #[must_use]
    pub fn group_color(&self, group_order: usize) -> String {
        self.apply(
            ColorPolicy::GroupPalette,
            ColorSlot::grouped(group_order, group_order),
            &[],
        )
        .or_else(|| {
            self.apply(
                ColorPolicy::DefaultPalette,
                ColorSlot::grouped(group_order, group_order),
                &[],
            )
        })
        .unwrap_or_else(|| DEFAULT_PALETTE[group_order % DEFAULT_PALETTE.len()].to_owned())
    }

    fn apply(
        &self,
        policy: ColorPolicy,
        slot: ColorSlot,
        explicit_colors: &[Option<String>],
    ) -> Option<String> {
        match policy {
            ColorPolicy::ExplicitPerIndex => explicit_colors
                .get(slot.index)
                .and_then(Option::as_deref)
                .map(str::trim)
                .filter(|color| !color.is_empty())
                .map(str::to_owned),
            ColorPolicy::GroupPalette => {
                let order = slot.group_order?;
                cycle(&self.palette.colors, order)
            }
            ColorPolicy::DefaultPalette => {
                let order = slot.group_order?;
                if !self.palette.colors.is_empty() {
                    return None;
                }
                Some(DEFAULT_PALETTE[order % DEFAULT_PALETTE.len()].to_owned())
            }
            ColorPolicy::ItemPalette => {
                if slot.group_order.is_some() {
                    return None;
                }
                cycle(&self.palette.colors, slot.index)
            }
            ColorPolicy::Fallback => self.palette.fallback.clone(),
        }
    }
}

fn cycle(colors: &[String], slot: usize) -> Option<String> {
    if colors.is_empty() {
        return None;
    }
    Some(colors[slot % colors.len()].clone())
}
