//! Optional feature modules live here.
//!
//! Keep extensions decoupled from the transformation core.

pub mod plugins;

pub use plugins::{ChartPlugin, PluginContext, PluginEvent};
