use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while extracting rows from a tracking log.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The decompressed byte stream is not valid UTF-8 (or gzip framing is
    /// broken). Aborts the run.
    #[error("Failed to decode input at line {line}: {source}")]
    Decode {
        line: u64,
        #[source]
        source: std::io::Error,
    },

    /// A line contains no `{`, so there is no record to parse.
    #[error("No JSON record found in line")]
    NoRecordBoundary,

    /// The text after the first `{` is not well-formed JSON.
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field the active classifier requires is absent or has the wrong type.
    #[error("Malformed event: {field} {problem}")]
    Shape {
        field: &'static str,
        problem: &'static str,
    },

    /// The input file could not be opened.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tabular output could not be encoded or decoded.
    #[error("Table error: {0}")]
    Table(String),

    /// A consumer asked for a column the table does not have.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Shorthand for a required field that is missing.
    pub fn missing(field: &'static str) -> Self {
        ExtractError::Shape {
            field,
            problem: "is missing",
        }
    }

    /// Shorthand for a required field with an unexpected JSON type.
    pub fn wrong_type(field: &'static str) -> Self {
        ExtractError::Shape {
            field,
            problem: "has an unexpected type",
        }
    }

    /// `true` when the error must abort the whole run rather than skip a
    /// single line.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ExtractError::NoRecordBoundary | ExtractError::Parse(_) | ExtractError::Shape { .. }
        )
    }
}

/// Convenience alias used throughout the tracklog crates.
pub type Result<T> = std::result::Result<T, ExtractError>;
