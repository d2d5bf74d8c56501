//! Derived views over an extracted table.
//!
//! These back the course dashboard: a per-answer distribution for one
//! categorical column and a per-learner listing for one free-text column.
//! Both count each learner once per distinct value and drop empty cells.

use std::collections::{HashMap, HashSet};

use tracklog_core::error::Result;
use tracklog_core::record::NONE_SENTINEL;

use crate::sink::RawTable;

fn is_null(value: &str) -> bool {
    value.is_empty() || value == NONE_SENTINEL
}

/// Distinct non-null `(user, value)` pairs in first-seen order.
fn distinct_pairs<'t>(
    table: &'t RawTable,
    user_column: &str,
    column: &str,
) -> Result<Vec<(&'t str, &'t str)>> {
    let user_idx = table.column_index(user_column)?;
    let value_idx = table.column_index(column)?;

    let mut seen = HashSet::new();
    let pairs = table
        .rows
        .iter()
        .filter_map(|row| Some((row.get(user_idx)?.as_str(), row.get(value_idx)?.as_str())))
        .filter(|(user, value)| !is_null(user) && !is_null(value))
        .filter(|pair| seen.insert(*pair))
        .collect();
    Ok(pairs)
}

/// How many learners gave each value of `column`, most frequent first.
/// Ties are ordered by value.
pub fn distribution(
    table: &RawTable,
    user_column: &str,
    column: &str,
) -> Result<Vec<(String, usize)>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (_, value) in distinct_pairs(table, user_column, column)? {
        *counts.entry(value).or_default() += 1;
    }

    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(out)
}

/// Each learner's distinct non-null values of `column`, in table order.
pub fn detail(table: &RawTable, user_column: &str, column: &str) -> Result<Vec<(String, String)>> {
    Ok(distinct_pairs(table, user_column, column)?
        .into_iter()
        .map(|(user, value)| (user.to_string(), value.to_string()))
        .collect())
}
