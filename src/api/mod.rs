mod engine;
mod engine_config;
mod inputs;
mod json_contract;
mod plugin_dispatch;
mod recompute;

pub use engine::{ChartEngine, ToggleOutcome};
pub use engine_config::ChartEngineConfig;
pub use inputs::{FieldValue, InputStore, fields};
pub use json_contract::{CHART_SPEC_JSON_SCHEMA_V1, ChartSpecificationJsonContractV1};
pub use recompute::{morph_runs, recompute, resolve_series_data, series_runs};
