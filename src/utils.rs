//! URL resolution and filesystem helpers.

use crate::error::{Error, Result};
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

/// Resolve a discovered href against the publication page URL.
///
/// Relative references pick up the page's scheme and host; absolute ones pass
/// through untouched. The result always carries a scheme and a host.
pub fn resolve_reference(page_url: &Url, href: &str) -> Result<Url> {
    let resolved = page_url
        .join(href)
        .map_err(|source| Error::InvalidReference {
            href: href.to_string(),
            source,
        })?;
    debug!(%href, resolved = %resolved, "Resolved document reference");
    Ok(resolved)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then performs a write test by creating
/// and immediately deleting a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    // Small sync write probe (simpler error surface)
    let probe_path = path.join(".__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Working directory is writable");
    Ok(())
}
