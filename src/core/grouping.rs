use indexmap::IndexMap;
use tracing::trace;

use crate::core::color::{ColorResolver, ColorSlot};
use crate::core::table::TabularInput;
use crate::core::types::{Group, Point};

/// Name given to the single group produced for untagged input.
pub const IMPLICIT_GROUP_NAME: &str = "";

/// Partitions the table's rows into groups in first-seen tag order.
///
/// Untagged input yields one implicit group holding every point. When only
/// some rows are tagged, untagged rows share a group named
/// [`IMPLICIT_GROUP_NAME`] placed at the slot where the first untagged row
/// appears. Group colors come from `resolver` by group order; points keep
/// their own explicit color, if any.
#[must_use]
pub fn group_points(table: &TabularInput, resolver: &ColorResolver<'_>) -> Vec<Group> {
    let points = table.points();
    if !table.has_group_tags() {
        return vec![Group {
            name: IMPLICIT_GROUP_NAME.to_owned(),
            order: 0,
            color: resolver.group_color(0),
            points,
        }];
    }

    let mut partitions: IndexMap<Option<String>, Vec<Point>> = IndexMap::new();
    for point in points {
        partitions.entry(point.group.clone()).or_default().push(point);
    }
    trace!(groups = partitions.len(), "partitioned points by tag");

    partitions
        .into_iter()
        .enumerate()
        .map(|(order, (tag, points))| Group {
            name: tag.unwrap_or_else(|| IMPLICIT_GROUP_NAME.to_owned()),
            order,
            color: resolver.group_color(order),
            points,
        })
        .collect()
}

/// Resolves each point's own color within its group.
///
/// Explicit per-index colors win over the group color. The group's legend
/// color is left untouched either way.
#[must_use]
pub fn point_color(
    group: &Group,
    point: &Point,
    explicit_colors: &[Option<String>],
    resolver: &ColorResolver<'_>,
) -> String {
    resolver
        .resolve(ColorSlot::grouped(point.index, group.order), explicit_colors)
        .unwrap_or_else(|| group.color.clone())
}
