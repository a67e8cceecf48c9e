use serde::{Deserialize, Serialize};

use crate::core::MorphMode;
use crate::render::ChartKind;

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub kind: ChartKind,
    pub generation: u64,
    pub input_fields: usize,
    pub series_len: usize,
    pub points_len: usize,
    pub morph_mode: Option<MorphMode>,
}

/// Event stream exposed to plugins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PluginEvent {
    InputsChanged { fields: usize },
    Recomputed { generation: u64 },
    Rendered { generation: u64 },
    MorphToggled { mode: MorphMode, updates: usize },
}

/// Extension hook interface for bounded custom logic.
///
/// Plugins observe engine events and read context without mutating the
/// engine. Hosts use them to persist outputs back into their own state.
pub trait ChartPlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: PluginEvent, context: PluginContext);
}
