//! End-to-end extraction run.
//!
//! Reads a gzip log line by line, extracts each JSON record, classifies it
//! with the mode's rule set and accumulates the resulting rows, then writes
//! them as one tab-separated table. A line that fails to parse or classify
//! is logged and skipped; only unreadable input or unwritable output abort
//! the run, and they do so before anything is written.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracklog_core::error::Result;
use tracklog_core::models::Mode;
use tracklog_core::settings::Settings;

use crate::classifier::{Classifier, SubmissionClassifier, VideoClassifier};
use crate::extractor::extract_record;
use crate::reader::LogLines;
use crate::sink::write_table_file;

// ── Public types ──────────────────────────────────────────────────────────────

/// Counters and timing for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub mode: Mode,
    /// RFC 3339 timestamp when the run started.
    pub started_at: String,
    /// Lines pulled from the input, including skipped and failed ones.
    pub lines_read: u64,
    /// Whitespace-only lines.
    pub lines_skipped: u64,
    /// Lines that failed to parse or classify.
    pub lines_failed: u64,
    pub rows_emitted: u64,
    /// `true` when the stop flag ended reading before end of input.
    pub stopped_early: bool,
    pub elapsed_seconds: f64,
}

impl RunReport {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            started_at: Utc::now().to_rfc3339(),
            lines_read: 0,
            lines_skipped: 0,
            lines_failed: 0,
            rows_emitted: 0,
            stopped_early: false,
            elapsed_seconds: 0.0,
        }
    }
}

/// Rows accumulated by [`extract`] in input order, plus the run counters.
#[derive(Debug, Clone)]
pub struct Extraction<R> {
    pub rows: Vec<R>,
    pub report: RunReport,
}

// ── Per-line step ─────────────────────────────────────────────────────────────

/// Extract the record from `line` and classify it.
pub fn process_line<C: Classifier>(classifier: &C, line: &str) -> Result<Vec<C::Row>> {
    let record = extract_record(line)?;
    classifier.classify(&record)
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Drive `lines` through `classifier`.
///
/// `stop` is checked before each line; once it is set, reading ends and the
/// rows gathered so far are returned. Per-line errors are logged and
/// counted. A fatal error (such as undecodable input) is returned as-is and
/// discards the partial result.
pub fn extract<C, I>(classifier: &C, lines: I, stop: &AtomicBool) -> Result<Extraction<C::Row>>
where
    C: Classifier,
    I: IntoIterator<Item = Result<String>>,
{
    let started = Instant::now();
    let mut report = RunReport::new(C::MODE);
    let mut rows = Vec::new();

    for line in lines {
        if stop.load(Ordering::Relaxed) {
            report.stopped_early = true;
            info!("Stop requested after {} lines", report.lines_read);
            break;
        }

        let line = line?;
        report.lines_read += 1;

        if line.trim().is_empty() {
            report.lines_skipped += 1;
            continue;
        }

        match process_line(classifier, &line) {
            Ok(extracted) => {
                report.rows_emitted += extracted.len() as u64;
                rows.extend(extracted);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                report.lines_failed += 1;
                warn!(line = report.lines_read, error = %e, "Skipping line");
            }
        }
    }

    report.elapsed_seconds = started.elapsed().as_secs_f64();
    debug!(
        "{} lines read, {} skipped, {} failed, {} rows",
        report.lines_read, report.lines_skipped, report.lines_failed, report.rows_emitted
    );

    Ok(Extraction { rows, report })
}

/// Run one mode from `input` to `output`.
pub fn run_classifier<C: Classifier>(
    classifier: &C,
    input: &Path,
    output: &Path,
    stop: &AtomicBool,
) -> Result<RunReport> {
    let lines = LogLines::open(input)?;
    let Extraction { rows, mut report } = extract(classifier, lines, stop)?;

    let write_start = Instant::now();
    write_table_file(output, &rows)?;
    report.elapsed_seconds += write_start.elapsed().as_secs_f64();

    info!(
        mode = %report.mode,
        rows = report.rows_emitted,
        failed = report.lines_failed,
        stopped_early = report.stopped_early,
        "Wrote {}",
        output.display()
    );
    Ok(report)
}

/// Run the extraction described by `settings`, selecting the classifier by
/// mode.
pub fn run(settings: &Settings, stop: &AtomicBool) -> Result<RunReport> {
    info!(
        "Extracting {} events from {}",
        settings.mode,
        settings.input.display()
    );
    match settings.mode {
        Mode::Problem => run_classifier(
            &SubmissionClassifier,
            &settings.input,
            &settings.output,
            stop,
        ),
        Mode::Video => run_classifier(&VideoClassifier, &settings.input, &settings.output, stop),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
