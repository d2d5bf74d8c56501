//! Tab-separated output tables.
//!
//! Fields are written verbatim: no quoting and no escaping. A value that
//! itself contains a tab or newline will shift or split its row when read
//! back; the format has no way to express such values.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;
use tracklog_core::error::{ExtractError, Result};
use tracklog_core::models::OutputRow;

/// Field separator of the output format.
pub const DELIMITER: u8 = b'\t';

// ── Writing ───────────────────────────────────────────────────────────────────

/// Write the header for `R` followed by one line per row.
pub fn write_table<R: OutputRow, W: Write>(writer: W, rows: &[R]) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(writer);

    out.write_record(R::COLUMNS).map_err(table_error)?;
    for row in rows {
        out.write_record(row.fields()).map_err(table_error)?;
    }
    out.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write the table into it.
pub fn write_table_file<R: OutputRow>(path: &Path, rows: &[R]) -> Result<()> {
    let with_path = |source| ExtractError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(with_path)?;
    write_table(BufWriter::new(file), rows).map_err(|e| match e {
        ExtractError::Io(source) => with_path(source),
        other => other,
    })?;
    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// A tab-separated table loaded back from disk, columns addressable by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Position of the column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ExtractError::UnknownColumn(name.to_string()))
    }
}

/// Parse a table written by [`write_table`].
pub fn read_table<Rd: Read>(reader: Rd) -> Result<RawTable> {
    let mut input = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .quoting(false)
        .has_headers(true)
        .from_reader(reader);

    let headers = input
        .headers()
        .map_err(table_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in input.records() {
        let record = record.map_err(table_error)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Open `path` and parse it with [`read_table`].
pub fn read_table_file(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|source| ExtractError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file)
}

fn table_error(err: csv::Error) -> ExtractError {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => ExtractError::Io(source),
        other => ExtractError::Table(format!("{:?}", other)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
