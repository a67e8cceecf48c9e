use indexmap::IndexSet;
use tracing::{debug, trace, warn};

use crate::core::{MorphController, MorphMode};
use crate::error::ChartResult;
use crate::extensions::{ChartPlugin, PluginEvent};
use crate::render::{ChartSpecification, Renderer};

use super::ChartEngineConfig;
use super::inputs::{FieldValue, InputStore, fields};
use super::recompute::{morph_runs, recompute as recompute_specification};

/// Result of asking the engine to flip morph mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied { mode: MorphMode, updates: usize },
    /// The chart kind has no alternate coordinates.
    Unsupported,
}

/// One chart instance bound to a renderer.
///
/// The engine owns its input snapshot and its last specification. Every
/// input change triggers a full recompute that replaces the previous
/// specification; `&mut self` keeps recomputes for one instance serialized.
pub struct ChartEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: ChartEngineConfig,
    pub(super) inputs: InputStore,
    pub(super) spec: ChartSpecification,
    pub(super) morph: Option<MorphController>,
    pub(super) generation: u64,
    pub(super) plugins: Vec<Box<dyn ChartPlugin>>,
}

impl<R: Renderer> ChartEngine<R> {
    pub fn new(renderer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        Self::with_inputs(renderer, config, InputStore::new())
    }

    pub fn with_inputs(
        renderer: R,
        config: ChartEngineConfig,
        inputs: InputStore,
    ) -> ChartResult<Self> {
        config.validate()?;
        let spec = recompute_specification(&config, &inputs);
        let morph = spec
            .morph_mode
            .map(|mode| MorphController::from_series(&morph_runs(&config, &inputs), mode));
        let mut engine = Self {
            renderer,
            config,
            inputs,
            spec,
            morph,
            generation: 1,
            plugins: Vec::new(),
        };
        if engine.config.auto_render {
            engine.render()?;
        }
        Ok(engine)
    }

    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn inputs(&self) -> &InputStore {
        &self.inputs
    }

    #[must_use]
    pub fn specification(&self) -> &ChartSpecification {
        &self.spec
    }

    /// Number of completed recomputes, starting at 1 for the initial build.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn morph(&self) -> Option<&MorphController> {
        self.morph.as_ref()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Updates one host field. Returns `false` without recomputing when the
    /// value is unchanged.
    pub fn set_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> ChartResult<bool> {
        let name = name.into();
        if !self.inputs.set(name.clone(), value) {
            trace!(field = %name, "input unchanged; skipping recompute");
            return Ok(false);
        }
        debug!(field = %name, "input changed");
        self.on_inputs_changed(1)?;
        Ok(true)
    }

    /// Applies several field updates, then recomputes once.
    pub fn set_fields<N, V>(
        &mut self,
        updates: impl IntoIterator<Item = (N, V)>,
    ) -> ChartResult<bool>
    where
        N: Into<String>,
        V: Into<FieldValue>,
    {
        let changed = updates
            .into_iter()
            .fold(0usize, |count, (name, value)| {
                count + usize::from(self.inputs.set(name, value))
            });
        if changed == 0 {
            return Ok(false);
        }
        debug!(fields = changed, "inputs changed");
        self.on_inputs_changed(changed)?;
        Ok(true)
    }

    pub fn remove_field(&mut self, name: &str) -> ChartResult<bool> {
        if self.inputs.remove(name).is_none() {
            return Ok(false);
        }
        debug!(field = name, "input removed");
        self.on_inputs_changed(1)?;
        Ok(true)
    }

    /// Swaps in a complete new input snapshot.
    pub fn replace_inputs(&mut self, inputs: InputStore) -> ChartResult<()> {
        let fields = inputs.len();
        self.inputs = inputs;
        debug!(fields, "inputs replaced");
        self.on_inputs_changed(fields)
    }

    /// Rebuilds the specification from the current inputs.
    pub fn recompute(&mut self) -> &ChartSpecification {
        self.spec = recompute_specification(&self.config, &self.inputs);
        self.generation += 1;
        self.sync_morph();
        self.emit_plugin_event(PluginEvent::Recomputed {
            generation: self.generation,
        });
        &self.spec
    }

    /// Hands the current specification to the renderer.
    pub fn render(&mut self) -> ChartResult<()> {
        self.renderer.render(&self.spec)?;
        self.emit_plugin_event(PluginEvent::Rendered {
            generation: self.generation,
        });
        Ok(())
    }

    /// Flips morph mode as one batch.
    ///
    /// Every update command reaches the renderer before its single `commit`.
    /// If the renderer fails part-way, the points already moved are sent back
    /// and the mode stays as it was.
    pub fn toggle_morph(&mut self) -> ChartResult<ToggleOutcome> {
        let Some(controller) = self.morph.as_mut() else {
            return Ok(ToggleOutcome::Unsupported);
        };

        // Commit or abort always runs before returning, so no batch is left pending.
        let batch = controller.begin_toggle()?;

        let mut applied = IndexSet::with_capacity(batch.updates.len());
        let mut failure = None;
        for update in &batch.updates {
            if let Err(err) = self.renderer.apply_point_update(update) {
                failure = Some(err);
                break;
            }
            applied.insert((update.series_index, update.point_index));
        }
        if failure.is_none() {
            if let Err(err) = self.renderer.commit() {
                failure = Some(err);
            }
        }

        if let Some(err) = failure {
            warn!(
                error = %err,
                batch = batch.id,
                applied = applied.len(),
                "rolling back partially applied morph batch"
            );
            for update in batch
                .rollback
                .iter()
                .filter(|update| applied.contains(&(update.series_index, update.point_index)))
            {
                if let Err(rollback_err) = self.renderer.apply_point_update(update) {
                    warn!(error = %rollback_err, "morph rollback update failed");
                }
            }
            if let Err(commit_err) = self.renderer.commit() {
                warn!(error = %commit_err, "morph rollback commit failed");
            }
            controller.abort(&batch)?;
            return Err(err);
        }

        let updates = batch.updates.len();
        let mode = controller.commit(batch)?;
        self.inputs.set(fields::ALTERNATE_MODE, mode.is_alternate());
        self.spec = recompute_specification(&self.config, &self.inputs);
        self.emit_plugin_event(PluginEvent::MorphToggled { mode, updates });
        Ok(ToggleOutcome::Applied { mode, updates })
    }

    fn on_inputs_changed(&mut self, fields: usize) -> ChartResult<()> {
        self.emit_plugin_event(PluginEvent::InputsChanged { fields });
        self.recompute();
        if self.config.auto_render {
            self.render()?;
        }
        Ok(())
    }

    fn sync_morph(&mut self) {
        let Some(mode) = self.spec.morph_mode else {
            self.morph = None;
            return;
        };
        let runs = morph_runs(&self.config, &self.inputs);
        match self.morph.as_mut() {
            Some(controller) if controller.mode() == mode => {
                if let Err(err) = controller.rebase(&runs) {
                    warn!(error = %err, "rebuilding morph controller after failed rebase");
                    self.morph = Some(MorphController::from_series(&runs, mode));
                }
            }
            _ => self.morph = Some(MorphController::from_series(&runs, mode)),
        }
    }
}
