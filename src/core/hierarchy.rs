use indexmap::{IndexMap, IndexSet};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::color::{ColorResolver, ColorSlot};
use crate::core::types::{HierarchyNode, PaletteState, Point};

/// Input node carrying an explicit parent link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedNode {
    pub id: String,
    pub parent: Option<String>,
    pub name: String,
    pub value: Option<f64>,
    pub color: Option<String>,
}

impl LinkedNode {
    #[must_use]
    pub fn new(id: impl Into<String>, parent: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: parent.map(str::to_owned),
            name: name.into(),
            value: None,
            color: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// The two accepted hierarchy shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum HierarchyInput {
    /// Pre-linked nodes. `root_id`, when set, names the explicit root whose
    /// direct children count as top-level.
    Linked {
        nodes: Vec<LinkedNode>,
        root_id: Option<String>,
    },
    /// Flat rows treated as one level under an implicit root.
    Flat(Vec<Point>),
}

/// Builds augmented hierarchy records.
///
/// `percent` is each node's share of its sibling total (global total for
/// top-level nodes), rounded to one decimal; a zero sibling total yields 0.
/// Nodes without a value take the sum of their children. Only top-level nodes
/// receive palette colors; deeper nodes keep explicit colors only.
#[must_use]
pub fn build_hierarchy(input: &HierarchyInput, palette: &PaletteState) -> Vec<HierarchyNode> {
    match input {
        HierarchyInput::Linked { nodes, root_id } => {
            build_linked(nodes, root_id.as_deref(), palette)
        }
        HierarchyInput::Flat(points) => {
            let nodes: Vec<LinkedNode> = points
                .iter()
                .map(|point| LinkedNode {
                    id: point.index.to_string(),
                    parent: None,
                    name: point.name.clone(),
                    value: point.value,
                    color: point.color.clone(),
                })
                .collect();
            build_linked(&nodes, None, palette)
        }
    }
}

/// Which share a node's percent is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SiblingSet<'a> {
    /// The explicit root measures against itself.
    Root,
    /// Every top-level node shares the global total.
    TopLevel,
    Parent(&'a str),
}

fn build_linked(
    nodes: &[LinkedNode],
    root_id: Option<&str>,
    palette: &PaletteState,
) -> Vec<HierarchyNode> {
    let mut positions: IndexMap<&str, usize> = IndexMap::with_capacity(nodes.len());
    for (position, node) in nodes.iter().enumerate() {
        if positions.insert(node.id.as_str(), position).is_some() {
            warn!(id = %node.id, "duplicate hierarchy node id; later node shadows links");
        }
    }

    let mut children: IndexMap<Option<&str>, Vec<usize>> = IndexMap::new();
    for (position, node) in nodes.iter().enumerate() {
        children.entry(parent_key(node)).or_default().push(position);
    }

    let values = resolve_values(nodes, &children);

    let sibling_sets: Vec<SiblingSet<'_>> = nodes
        .iter()
        .map(|node| {
            if root_id == Some(node.id.as_str()) {
                return SiblingSet::Root;
            }
            match parent_key(node) {
                Some(parent) if Some(parent) != root_id && positions.contains_key(parent) => {
                    SiblingSet::Parent(parent)
                }
                _ => SiblingSet::TopLevel,
            }
        })
        .collect();

    let mut sibling_totals: IndexMap<SiblingSet<'_>, f64> = IndexMap::new();
    for (set, value) in sibling_sets.iter().zip(&values) {
        *sibling_totals.entry(*set).or_default() += value;
    }

    let explicit_colors: Vec<Option<String>> =
        nodes.iter().map(|node| node.color.clone()).collect();
    let resolver = ColorResolver::new(palette);
    let mut top_level_order = 0usize;

    let built: Vec<HierarchyNode> = nodes
        .iter()
        .enumerate()
        .map(|(position, node)| {
            let set = sibling_sets[position];
            let value = values[position];
            let percent = match set {
                SiblingSet::Root => percent_of(value, value),
                _ => percent_of(value, sibling_totals.get(&set).copied().unwrap_or(0.0)),
            };

            let color = if set == SiblingSet::TopLevel {
                let slot = ColorSlot::grouped(position, top_level_order);
                top_level_order += 1;
                resolver.resolve(slot, &explicit_colors)
            } else {
                explicit_colors[position].clone()
            };

            HierarchyNode {
                id: node.id.clone(),
                parent_id: parent_key(node).map(str::to_owned),
                name: node.name.clone(),
                value,
                percent,
                color,
            }
        })
        .collect();

    debug!(
        nodes = built.len(),
        top_level = top_level_order,
        "built hierarchy"
    );
    built
}

fn parent_key(node: &LinkedNode) -> Option<&str> {
    node.parent.as_deref().filter(|parent| !parent.is_empty())
}

/// Fills in missing values with the sum of their children.
///
/// Post-order walk over an explicit stack, so chain depth is bounded only by
/// memory. A node reached again while still on the walk path is a cycle and
/// contributes 0.
fn resolve_values<'a>(
    nodes: &'a [LinkedNode],
    children: &IndexMap<Option<&'a str>, Vec<usize>>,
) -> Vec<f64> {
    let mut resolved: Vec<Option<f64>> = nodes
        .iter()
        .map(|node| node.value.filter(|v| v.is_finite()))
        .collect();
    let mut visiting: IndexSet<usize> = IndexSet::new();
    let mut stack: Vec<(usize, bool)> = Vec::new();

    for start in 0..nodes.len() {
        if resolved[start].is_some() {
            continue;
        }
        stack.push((start, false));
        while let Some((position, expanded)) = stack.pop() {
            if resolved[position].is_some() {
                continue;
            }
            let members = children
                .get(&Some(nodes[position].id.as_str()))
                .map_or(&[][..], Vec::as_slice);

            if expanded {
                let sum = members
                    .iter()
                    .filter(|&&child| child != position)
                    .map(|&child| resolved[child].unwrap_or(0.0))
                    .sum();
                visiting.swap_remove(&position);
                resolved[position] = Some(sum);
                continue;
            }
            if !visiting.insert(position) {
                warn!(
                    id = %nodes[position].id,
                    "cycle in hierarchy parent links; treating value as 0"
                );
                continue;
            }
            stack.push((position, true));
            stack.extend(
                members
                    .iter()
                    .copied()
                    .filter(|&child| child != position && resolved[child].is_none())
                    .map(|child| (child, false)),
            );
        }
    }

    resolved.into_iter().map(|v| v.unwrap_or(0.0)).collect()
}

/// `round(value / total * 100, 1)`, or `0` when the total is zero.
#[must_use]
pub fn percent_of(value: f64, total: f64) -> f64 {
    if total == 0.0 || !total.is_finite() {
        return 0.0;
    }
    let raw = value / total * 100.0;
    Decimal::from_f64(raw)
        .map(|exact| exact.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(0.0)
}
