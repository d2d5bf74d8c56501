//! Splits a raw log line into its JSON record.
//!
//! Tracking logs are written by a logging framework that prefixes each JSON
//! object with a timestamp and host header; everything before the first `{`
//! is discarded.

use serde_json::Value;
use tracklog_core::error::{ExtractError, Result};

/// Parse the JSON record embedded in `line`.
pub fn extract_record(line: &str) -> Result<Value> {
    let start = line.find('{').ok_or(ExtractError::NoRecordBoundary)?;
    Ok(serde_json::from_str(&line[start..])?)
}
