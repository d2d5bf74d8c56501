mod bootstrap;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracklog_core::settings::Settings;
use tracklog_data::pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging()?;

    tracing::info!("parse-logs v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Mode: {}, input: {}, output: {}",
        settings.mode,
        settings.input.display(),
        settings.output.display()
    );

    let stop = Arc::new(AtomicBool::new(false));

    // The pipeline is synchronous; run it off the async runtime so Ctrl+C
    // can still be observed while it reads.
    let mut worker = {
        let stop = Arc::clone(&stop);
        tokio::task::spawn_blocking(move || pipeline::run(&settings, &stop))
    };

    let report = tokio::select! {
        joined = &mut worker => joined?,
        signal = tokio::signal::ctrl_c() => {
            if bootstrap::interrupt_requested(signal) {
                stop.store(true, Ordering::Relaxed);
            }
            worker.await?
        }
    }?;

    tracing::info!(
        "Done: {} rows from {} lines ({} failed, {} blank) in {:.2}s",
        report.rows_emitted,
        report.lines_read,
        report.lines_failed,
        report.lines_skipped,
        report.elapsed_seconds
    );

    Ok(())
}
