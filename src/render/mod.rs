mod null_renderer;
mod specification;

pub use null_renderer::NullRenderer;
pub use specification::{
    AxisDefinition, AxisDirection, ChartFrame, ChartKind, ChartSpecification, DataLabelDirective,
    PlotDirective, TooltipDirective,
};

use crate::core::PointUpdate;
use crate::error::ChartResult;

/// Contract implemented by any rendering collaborator.
///
/// Renderers receive a fully resolved `ChartSpecification` so drawing code
/// stays isolated from the data transformation. Morph toggles arrive as a
/// batch of `apply_point_update` calls closed by exactly one `commit`; a
/// renderer should defer its redraw until `commit`.
pub trait Renderer {
    fn render(&mut self, spec: &ChartSpecification) -> ChartResult<()>;

    fn apply_point_update(&mut self, update: &PointUpdate) -> ChartResult<()>;

    fn commit(&mut self) -> ChartResult<()>;
}
