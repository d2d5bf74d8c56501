//! Shared types for the tracking-log extractor: the error taxonomy, the
//! output row model, record accessors and command-line settings.

pub mod error;
pub mod models;
pub mod record;
pub mod settings;

pub use error::{ExtractError, Result};
