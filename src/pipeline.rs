//! The sequential pipeline: discover annex links, fetch the selected pair,
//! extract and normalize the first annex's tables, persist the result.
//!
//! Every stage runs to completion before the next begins and raises its
//! failure immediately; `main` owns the logging and exit-code mapping.

use crate::discover::find_pdf_links;
use crate::error::{Error, Result};
use crate::extract::extract_table_rows;
use crate::fetch;
use crate::models::ABBREVIATIONS;
use crate::normalize::expand_abbreviations;
use crate::outputs::{archive, csv};
use crate::utils::{ensure_writable_dir, resolve_reference};
use std::path::PathBuf;
use tracing::{info, instrument};
use url::Url;

/// How many annex links the publication page is expected to carry.
pub const EXPECTED_LINKS: usize = 2;

/// Base name of the intermediate CSV artifact.
pub const CSV_BASENAME: &str = "dados_rol.csv";

/// Everything one pipeline run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub page_url: String,
    pub work_dir: PathBuf,
    pub archive_tag: String,
}

/// Artifacts produced by a successful run.
#[derive(Debug)]
pub struct RunSummary {
    pub fetched: Vec<PathBuf>,
    pub rows: usize,
    pub archive_path: PathBuf,
}

/// Run the whole pipeline once.
///
/// Selection policy: take the first two discovered links and reverse them,
/// so the annex that appears second on the page is fetched first and becomes
/// `Anexo_1.pdf`. Only that first fetched file is parsed; the second is
/// downloaded and kept on disk untouched, matching the published reference
/// behavior. On failure, already-fetched PDFs stay where they are; the CSV
/// is deleted only after a successful archive step.
#[instrument(level = "info", skip_all, fields(page_url = %config.page_url))]
pub async fn run(config: &RunConfig) -> Result<RunSummary> {
    ensure_writable_dir(&config.work_dir).await?;
    let client = fetch::build_client()?;

    // DISCOVER
    let page_url =
        Url::parse(&config.page_url).map_err(|source| Error::InvalidReference {
            href: config.page_url.clone(),
            source,
        })?;
    let html = fetch::fetch_page(&client, page_url.as_str()).await?;
    let links = find_pdf_links(&html);

    // SELECT
    if links.len() < EXPECTED_LINKS {
        return Err(Error::InsufficientLinks {
            found: links.len(),
            needed: EXPECTED_LINKS,
        });
    }
    let selected: Vec<&String> = links.iter().take(EXPECTED_LINKS).rev().collect();

    // FETCH
    let mut fetched = Vec::new();
    for (i, href) in selected.iter().enumerate() {
        let target = resolve_reference(&page_url, href)?;
        let dest = config.work_dir.join(format!("Anexo_{}.pdf", i + 1));
        fetch::download(&client, target.as_str(), &dest).await?;
        fetched.push(dest);
    }

    // EXTRACT AND NORMALIZE
    let rows = extract_table_rows(&fetched[0])?;
    let rows = expand_abbreviations(rows, &ABBREVIATIONS);

    // PERSIST
    let csv_path = config.work_dir.join(CSV_BASENAME);
    csv::write_rows(&rows, &csv_path)?;
    let archive_path = config
        .work_dir
        .join(format!("Teste_{}.gz", config.archive_tag));
    archive::archive_and_remove(&csv_path, &archive_path)?;

    info!(
        rows = rows.len(),
        archive = %archive_path.display(),
        "Pipeline completed"
    );
    Ok(RunSummary {
        fetched,
        rows: rows.len(),
        archive_path,
    })
}
