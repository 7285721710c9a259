//! CSV serialization of extracted rows.

use crate::error::Result;
use crate::models::Row;
use std::path::Path;
use tracing::{info, instrument};

/// Write rows as UTF-8 comma-separated text, one row per line.
///
/// `None` cells become empty fields.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display(), rows = rows.len()))]
pub fn write_rows(rows: &[Row], path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for row in rows {
        let record: Vec<&str> = row.iter().map(|cell| cell.as_deref().unwrap_or("")).collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!("CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_writes_one_line_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dados_rol.csv");
        let rows = vec![
            vec![cell("Oftalmologia Diagnóstica"), cell("x")],
            vec![cell("Ambulatório"), cell("y")],
        ];

        write_rows(&rows, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Oftalmologia Diagnóstica,x\nAmbulatório,y\n");
    }

    #[test]
    fn test_none_cells_become_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = vec![vec![cell("a"), None, cell("c")]];

        write_rows(&rows, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,,c\n");
    }

    #[test]
    fn test_cells_with_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = vec![vec![cell("a,b"), cell("c")]];

        write_rows(&rows, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"a,b\",c\n");
    }

    #[test]
    fn test_empty_row_set_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_rows(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
