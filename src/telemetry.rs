//! Opt-in `tracing` subscriber setup.
//!
//! Recompute, render and morph batches emit events under the `chartspec`
//! target. Hosts with their own subscriber can ignore this module entirely.

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "chartspec=info";

/// Installs a compact console subscriber filtered by `RUST_LOG`, or by
/// [`DEFAULT_FILTER`] when that variable is absent.
///
/// `false` means nothing was installed: either the `telemetry` feature is off
/// or the process already has a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
