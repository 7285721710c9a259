//! PDF table extraction.
//!
//! Opens a downloaded document, walks its pages in physical order, and
//! flattens every detected table (minus its header row) into one row
//! sequence. A page without a table contributes nothing; a document-level
//! parse failure aborts the whole extraction.

mod detector;
mod spans;

pub use detector::{TableDetector, TableDetectorConfig};

use crate::error::{Error, Result};
use crate::models::Row;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Extract all table rows from the PDF at `path`.
///
/// The first row of each detected table is assumed to be column labels and
/// dropped without inspecting its content. Remaining rows keep their page
/// order, then table order within a page, with cell text as-read: no
/// trimming, no type coercion.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn extract_table_rows(path: impl AsRef<Path>) -> Result<Vec<Row>> {
    let path = path.as_ref();
    info!("Starting table extraction");

    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }

    let doc = Document::load(path)?;
    let detector = TableDetector::new();
    let mut all_rows: Vec<Row> = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        let content = spans::collect_page_content(&doc, page_id)?;
        match detector.detect(&content) {
            Some(mut table) => {
                let detected = table.len();
                if !table.is_empty() {
                    table.remove(0);
                }
                debug!(
                    page = page_number,
                    detected,
                    kept = table.len(),
                    "Table detected"
                );
                all_rows.extend(table);
            }
            None => debug!(page = page_number, "No table on page"),
        }
    }

    info!(rows = all_rows.len(), "Extraction finished");
    Ok(all_rows)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a PDF where each page shows the given `(x, y, text)` runs.
    pub fn pdf_with_text_pages(pages: &[Vec<(i64, i64, &str)>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for runs in pages {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
            ];
            for (x, y, text) in runs {
                operations.push(Operation::new(
                    "Tm",
                    vec![
                        1.into(),
                        0.into(),
                        0.into(),
                        1.into(),
                        (*x).into(),
                        (*y).into(),
                    ],
                ));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            }
            operations.push(Operation::new("ET", vec![]));

            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    /// A one-page annex with the three-row code/description table used
    /// across the tests.
    pub fn sample_annex_pdf() -> Vec<u8> {
        pdf_with_text_pages(&[vec![
            (72, 700, "Code"),
            (200, 700, "Desc"),
            (72, 680, "OD"),
            (200, 680, "x"),
            (72, 660, "AMB"),
            (200, 660, "y"),
        ]])
    }

    /// A one-page document with no tabular layout at all.
    pub fn prose_only_pdf() -> Vec<u8> {
        pdf_with_text_pages(&[vec![
            (72, 700, "Considerando o disposto na resolucao,"),
            (72, 680, "a diretoria torna publico o anexo"),
            (72, 660, "atualizado do rol de procedimentos"),
            (72, 640, "para consulta da sociedade."),
        ]])
    }
}
