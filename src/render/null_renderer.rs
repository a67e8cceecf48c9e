use crate::core::PointUpdate;
use crate::error::ChartResult;
use crate::render::{ChartSpecification, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates every specification and records what it was asked to
/// do, so tests can assert on batch/commit ordering without a real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub render_count: usize,
    pub last_series_count: usize,
    pub last_point_count: usize,
    pub last_spec: Option<ChartSpecification>,
    /// Updates received since the last commit.
    pub staged_updates: Vec<PointUpdate>,
    /// Batch sizes seen at each commit, in order.
    pub committed_batches: Vec<usize>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, spec: &ChartSpecification) -> ChartResult<()> {
        spec.validate()?;
        self.render_count += 1;
        self.last_series_count = spec.series.len();
        self.last_point_count = spec.point_count();
        self.last_spec = Some(spec.clone());
        Ok(())
    }

    fn apply_point_update(&mut self, update: &PointUpdate) -> ChartResult<()> {
        self.staged_updates.push(*update);
        Ok(())
    }

    fn commit(&mut self) -> ChartResult<()> {
        self.committed_batches.push(self.staged_updates.len());
        self.staged_updates.clear();
        Ok(())
    }
}
