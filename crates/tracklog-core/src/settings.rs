use clap::Parser;
use std::path::PathBuf;

use crate::models::Mode;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Extract problem submissions or video interactions from a gzip tracking log
#[derive(Parser, Debug, Clone)]
#[command(
    name = "parse-logs",
    about = "Extract problem submissions or video interactions from a gzip tracking log",
    version
)]
pub struct Settings {
    /// Gzip-compressed tracking log to read
    #[arg(long)]
    pub input: PathBuf,

    /// Tab-separated file to write
    #[arg(long)]
    pub output: PathBuf,

    /// Which events to extract
    #[arg(long, value_enum)]
    pub mode: Mode,
}
