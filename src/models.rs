//! Row data model and the fixed abbreviation mapping.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One table cell: extracted text, or `None` when the cell slot was empty.
pub type Cell = Option<String>;

/// One table row, cells in the order they were detected on the page.
pub type Row = Vec<Cell>;

/// Exact-match substitution table from short domain codes to expanded terms.
/// Keys are unique; no partial or substring replacement is ever performed.
pub type AbbreviationMap = HashMap<&'static str, &'static str>;

/// The domain codes expanded in every extracted cell.
pub static ABBREVIATIONS: Lazy<AbbreviationMap> = Lazy::new(|| {
    HashMap::from([
        ("OD", "Oftalmologia Diagnóstica"),
        ("AMB", "Ambulatório"),
    ])
});
