//! Dual-coordinate morphing.
//!
//! Every point carries a primary `(x, y)` and an alternate `(x_1, y_1)` pair.
//! A toggle is planned as a pure batch of update commands; the controller only
//! adopts the new mode and positions once the whole batch is committed, so a
//! half-applied toggle is never observable through it.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::types::Point;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MorphMode {
    #[default]
    Primary,
    Alternate,
}

impl MorphMode {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Primary => Self::Alternate,
            Self::Alternate => Self::Primary,
        }
    }

    #[must_use]
    pub fn from_alternate_flag(alternate: bool) -> Self {
        if alternate {
            Self::Alternate
        } else {
            Self::Primary
        }
    }

    #[must_use]
    pub fn is_alternate(self) -> bool {
        matches!(self, Self::Alternate)
    }
}

/// Both coordinate interpretations of one point plus where it currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MorphPoint {
    pub series_index: usize,
    pub point_index: usize,
    /// Row index in the source arrays.
    pub source_index: usize,
    pub primary: Option<(f64, f64)>,
    pub alternate: Option<(f64, f64)>,
    pub current: Option<(f64, f64)>,
}

impl MorphPoint {
    #[must_use]
    pub fn coordinates(&self, mode: MorphMode) -> Option<(f64, f64)> {
        match mode {
            MorphMode::Primary => self.primary,
            MorphMode::Alternate => self.alternate,
        }
    }
}

/// Instruction for the rendering adapter to move one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointUpdate {
    pub series_index: usize,
    pub point_index: usize,
    pub new_x: f64,
    pub new_y: f64,
}

/// One planned toggle.
///
/// `updates` moves every positioned point to its target coordinate;
/// `rollback` moves the same points back to where they were.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphBatch {
    pub id: u64,
    pub from: MorphMode,
    pub target: MorphMode,
    pub updates: Vec<PointUpdate>,
    pub rollback: Vec<PointUpdate>,
    positions: Vec<Option<(f64, f64)>>,
}

/// Plans a transition of `points` to `target` without touching them.
///
/// Points lacking the target pair stay where they are. Points with no
/// position at all emit no command.
#[must_use]
pub fn plan_toggle(
    points: &[MorphPoint],
    target: MorphMode,
) -> (Vec<Option<(f64, f64)>>, Vec<PointUpdate>, Vec<PointUpdate>) {
    let mut positions = Vec::with_capacity(points.len());
    let mut updates = Vec::with_capacity(points.len());
    let mut rollback = Vec::with_capacity(points.len());

    for point in points {
        let next = point.coordinates(target).or(point.current);
        positions.push(next);
        let Some((new_x, new_y)) = next else {
            continue;
        };
        updates.push(PointUpdate {
            series_index: point.series_index,
            point_index: point.point_index,
            new_x,
            new_y,
        });
        if let Some((old_x, old_y)) = point.current {
            rollback.push(PointUpdate {
                series_index: point.series_index,
                point_index: point.point_index,
                new_x: old_x,
                new_y: old_y,
            });
        }
    }

    (positions, updates, rollback)
}

/// Two-state controller with a single-batch guard.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphController {
    mode: MorphMode,
    points: Vec<MorphPoint>,
    pending_batch: Option<u64>,
    next_batch_id: u64,
}

impl MorphController {
    /// Builds the controller from per-series point runs, placing every point
    /// at its `mode` coordinate (or the other pair when that one is missing).
    #[must_use]
    pub fn from_series(series: &[Vec<Point>], mode: MorphMode) -> Self {
        Self {
            mode,
            points: morph_points(series, mode),
            pending_batch: None,
            next_batch_id: 1,
        }
    }

    #[must_use]
    pub fn mode(&self) -> MorphMode {
        self.mode
    }

    #[must_use]
    pub fn points(&self) -> &[MorphPoint] {
        &self.points
    }

    #[must_use]
    pub fn pending_batch(&self) -> Option<u64> {
        self.pending_batch
    }

    #[must_use]
    pub fn is_toggling(&self) -> bool {
        self.pending_batch.is_some()
    }

    /// Current position of every point, in series then point order.
    #[must_use]
    pub fn current_coordinates(&self) -> Vec<Option<(f64, f64)>> {
        self.points.iter().map(|point| point.current).collect()
    }

    /// Starts a toggle. Rejected while another batch is pending.
    pub fn begin_toggle(&mut self) -> ChartResult<MorphBatch> {
        if let Some(pending_batch) = self.pending_batch {
            warn!(pending_batch, "rejecting morph toggle while batch is pending");
            return Err(ChartError::MorphToggleInProgress { pending_batch });
        }

        let target = self.mode.flipped();
        let (positions, updates, rollback) = plan_toggle(&self.points, target);
        let id = self.next_batch_id;
        self.next_batch_id += 1;
        self.pending_batch = Some(id);
        debug!(batch = id, ?target, updates = updates.len(), "planned morph batch");

        Ok(MorphBatch {
            id,
            from: self.mode,
            target,
            updates,
            rollback,
            positions,
        })
    }

    /// Adopts a fully applied batch: every point moves and the mode flips at once.
    pub fn commit(&mut self, batch: MorphBatch) -> ChartResult<MorphMode> {
        self.ensure_pending(batch.id)?;
        for (point, position) in self.points.iter_mut().zip(batch.positions) {
            point.current = position;
        }
        self.mode = batch.target;
        self.pending_batch = None;
        debug!(batch = batch.id, mode = ?self.mode, "committed morph batch");
        Ok(self.mode)
    }

    /// Drops a pending batch, leaving mode and positions untouched.
    pub fn abort(&mut self, batch: &MorphBatch) -> ChartResult<()> {
        self.ensure_pending(batch.id)?;
        self.pending_batch = None;
        debug!(batch = batch.id, "aborted morph batch");
        Ok(())
    }

    /// Plans and commits in one step, for callers without an adapter to drive.
    pub fn toggle(&mut self) -> ChartResult<MorphBatch> {
        let batch = self.begin_toggle()?;
        let receipt = batch.clone();
        self.commit(batch)?;
        Ok(receipt)
    }

    /// Replaces the points after a recompute while keeping the current mode.
    pub fn rebase(&mut self, series: &[Vec<Point>]) -> ChartResult<()> {
        if let Some(pending_batch) = self.pending_batch {
            return Err(ChartError::MorphToggleInProgress { pending_batch });
        }
        self.points = morph_points(series, self.mode);
        Ok(())
    }

    fn ensure_pending(&self, batch: u64) -> ChartResult<()> {
        if self.pending_batch == Some(batch) {
            Ok(())
        } else {
            Err(ChartError::StaleMorphBatch {
                batch,
                pending: self.pending_batch,
            })
        }
    }
}

fn morph_points(series: &[Vec<Point>], mode: MorphMode) -> Vec<MorphPoint> {
    series
        .iter()
        .enumerate()
        .flat_map(|(series_index, points)| {
            points
                .iter()
                .enumerate()
                .map(move |(point_index, point)| {
                    let primary = point.primary_xy();
                    let alternate = point.alternate_xy();
                    let current = match mode {
                        MorphMode::Primary => primary.or(alternate),
                        MorphMode::Alternate => alternate.or(primary),
                    };
                    MorphPoint {
                        series_index,
                        point_index,
                        source_index: point.index,
                        primary,
                        alternate,
                        current,
                    }
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{MorphMode, MorphPoint, plan_toggle};

    #[test]
    fn unpositioned_points_emit_no_command() {
        let points = [MorphPoint {
            series_index: 0,
            point_index: 0,
            source_index: 0,
            primary: None,
            alternate: None,
            current: None,
        }];
        let (positions, updates, rollback) = plan_toggle(&points, MorphMode::Alternate);
        assert_eq!(positions, vec![None]);
        assert!(updates.is_empty());
        assert!(rollback.is_empty());
    }
}
