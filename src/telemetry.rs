//! Opt-in `tracing` bootstrap for hosts embedding the widget.
//!
//! The engine only emits `tracing` events; it never installs a subscriber on
//! its own. Hosts without their own log routing can call
//! [`init_default_tracing`] once at startup, everyone else wires their own
//! subscriber and filters.

/// Installs a compact `tracing` subscriber honoring `RUST_LOG`.
///
/// Without `RUST_LOG`, engine events are logged at `debug` and everything
/// else at `info`. Returns `false` when the `telemetry` feature is disabled
/// or a global subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter("info,histoslider_rs=debug")
}

/// Like [`init_default_tracing`], with an explicit fallback filter.
///
/// `RUST_LOG` still wins when set; `fallback_filter` applies otherwise.
#[must_use]
pub fn init_tracing_with_filter(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_filter));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}
