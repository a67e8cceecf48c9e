pub mod color;
pub mod grouping;
pub mod hierarchy;
pub mod morph;
pub mod series;
pub mod table;
pub mod types;

pub use color::{ColorPolicy, ColorResolver, ColorSlot, DEFAULT_PALETTE};
pub use grouping::{IMPLICIT_GROUP_NAME, group_points, point_color};
pub use hierarchy::{HierarchyInput, LinkedNode, build_hierarchy, percent_of};
pub use morph::{MorphBatch, MorphController, MorphMode, MorphPoint, PointUpdate, plan_toggle};
pub use series::{AssemblyOptions, PointProjection, assemble, below_label_threshold};
pub use table::TabularInput;
pub use types::{
    AxisIndex, Group, HierarchyNode, PaletteState, Point, SeriesData, SeriesPoint, SeriesSpec,
};
