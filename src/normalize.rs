//! Exact-match expansion of domain abbreviations in extracted cells.

use crate::models::{AbbreviationMap, Row};
use tracing::debug;

/// Replace every cell whose entire text equals a mapping key with its
/// expansion.
///
/// Pure and total: unmapped cells and `None` cells pass through unchanged,
/// and the row/column shape is preserved. Because no expansion collides with
/// a key, applying this twice equals applying it once.
pub fn expand_abbreviations(rows: Vec<Row>, map: &AbbreviationMap) -> Vec<Row> {
    let expanded: Vec<Row> = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| {
                    cell.map(|text| match map.get(text.as_str()) {
                        Some(expansion) => (*expansion).to_string(),
                        None => text,
                    })
                })
                .collect()
        })
        .collect();
    debug!(rows = expanded.len(), "Expanded abbreviations");
    expanded
}
