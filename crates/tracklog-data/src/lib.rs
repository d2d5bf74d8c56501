//! Extraction layer for tracking logs.
//!
//! Reads gzip-compressed event logs line by line, pulls the JSON record out
//! of each line, classifies it into problem-submission or video-interaction
//! rows and writes those rows as a tab-separated table.

pub mod classifier;
pub mod extractor;
pub mod pipeline;
pub mod reader;
pub mod sink;
pub mod views;

pub use tracklog_core as core;
