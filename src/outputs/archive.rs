//! Single-file compressed archival of the intermediate CSV.

use crate::error::Result;
use flate2::{Compression, GzBuilder};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument};

/// Compress `source` into `archive_path`, preserving the source's base name
/// in the gzip FNAME header, then delete `source`.
///
/// The source is removed only after the archive has been fully written, so a
/// failed archive step never loses the intermediate file.
#[instrument(level = "info", skip_all, fields(source = %source.as_ref().display(), archive = %archive_path.as_ref().display()))]
pub fn archive_and_remove(source: impl AsRef<Path>, archive_path: impl AsRef<Path>) -> Result<()> {
    let source = source.as_ref();
    let archive_path = archive_path.as_ref();

    let data = fs::read(source)?;
    let base_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = File::create(archive_path)?;
    let mut encoder = GzBuilder::new()
        .filename(base_name)
        .write(file, Compression::default());
    encoder.write_all(&data)?;
    encoder.finish()?;

    fs::remove_file(source)?;
    info!(bytes = data.len(), "Archive created, intermediate removed");
    Ok(())
}
