use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Build the log filter from an optional `RUST_LOG`-style directive string,
/// falling back to [`DEFAULT_FILTER`].
pub fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialise the global `tracing` subscriber.
///
/// Everything is written to stderr; the level comes from `RUST_LOG`.
pub fn setup_logging() -> anyhow::Result<()> {
    let directives = std::env::var("RUST_LOG").ok();
    let filter = build_filter(directives.as_deref());

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Signals ────────────────────────────────────────────────────────────────────

/// Decide whether the result of waiting on Ctrl+C should stop the run.
///
/// Only a delivered signal stops it. When the handler could not be
/// installed the run continues to the end of input.
pub fn interrupt_requested(signal: std::io::Result<()>) -> bool {
    match signal {
        Ok(()) => {
            tracing::warn!("Ctrl+C received; writing rows extracted so far");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable; running to completion");
            false
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
