//! In-memory zip of a rendered report bundle.

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ReportFile;

/// Deflate every file into one zip archive, entries in the given order.
pub fn zip_bundle(files: &[ReportFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        zip.start_file(file.name, options)
            .with_context(|| format!("failed to add {} to archive", file.name))?;
        zip.write_all(file.content.as_bytes())
            .with_context(|| format!("failed to compress {}", file.name))?;
    }

    let cursor = zip.finish().context("failed to finish zip archive")?;
    Ok(cursor.into_inner())
}
