//! Telemetry helpers for applications embedding `chart-motion`.
//!
//! The core only emits `tracing` events (scale builds, label resolution
//! summaries, transition restarts, path fallbacks). Hosts either call
//! `init_default_tracing` or install their own subscriber.

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_TRACING_FILTER: &str = "info";

/// Initializes a compact `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `false` when the feature is disabled or when the host application
/// already installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_TRACING_FILTER));
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
