//! chartspec-rs: data-to-series chart specification engine.
//!
//! Flat, parallel-array host fields go in; a fully resolved
//! `ChartSpecification` (series, hierarchy nodes, axes, tooltip and label
//! directives) comes out and is handed to a `Renderer` collaborator.
//!
//! The transformation core in [`core`] is pure. [`api::ChartEngine`] binds it
//! to a host's reactive state: every field change triggers a full recompute.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig, InputStore, ToggleOutcome};
pub use error::{ChartError, ChartResult};
