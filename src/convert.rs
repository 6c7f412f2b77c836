//! Conversion entry points: uploaded bytes in, ZIP artifact out.
//!
//! ## Working-directory lifetime
//!
//! Every conversion gets a fresh `TempDir` holding the uploaded PDF and the
//! rasterizer's output files. The directory is removed when the `TempDir`
//! drops — on success, on error, and on panic alike — so no cleanup path has
//! to be written or can be missed. Concurrent conversions never share a
//! directory.

use crate::config::ConversionSettings;
use crate::error::Pdf2ZipError;
use crate::output::{ArchiveArtifact, ConversionOutput, ConversionStats};
use crate::pipeline::{archive, command, invoke};
use std::path::Path;
use std::time::Instant;
use tempfile::TempDir;
use tracing::{debug, info};

/// Convert uploaded PDF bytes into a ZIP of page images.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - [`Pdf2ZipError::NotAPdf`] — bytes do not start with `%PDF`
/// - [`Pdf2ZipError::RasterizerNotFound`] — Ghostscript not installed/found
/// - [`Pdf2ZipError::RasterizationFailed`] — Ghostscript ran and failed
/// - [`Pdf2ZipError::ArchiveWriteFailed`] — packaging failed
pub async fn convert_bytes(
    pdf: &[u8],
    settings: &ConversionSettings,
) -> Result<ConversionOutput, Pdf2ZipError> {
    let total_start = Instant::now();

    // ── Step 1: Gate the upload ──────────────────────────────────────────
    ensure_pdf_magic(pdf)?;

    // ── Step 2: Fresh working directory, upload persisted into it ────────
    let workdir = TempDir::new()
        .map_err(|e| Pdf2ZipError::Internal(format!("Failed to create temp dir: {e}")))?;
    let input_path = workdir.path().join("upload.pdf");
    tokio::fs::write(&input_path, pdf)
        .await
        .map_err(|e| Pdf2ZipError::Internal(format!("Failed to write upload: {e}")))?;
    debug!(
        "Working directory {} ({} upload bytes)",
        workdir.path().display(),
        pdf.len()
    );

    // ── Step 3: Build the rasterizer invocation ──────────────────────────
    let cmd = command::build_command(settings, &input_path, workdir.path());

    // ── Step 4: Rasterize ────────────────────────────────────────────────
    let raster_start = Instant::now();
    let pages = invoke::rasterize(cmd, workdir.path(), settings.format).await?;
    let raster_duration_ms = raster_start.elapsed().as_millis() as u64;
    info!(
        "Rasterized {} pages in {}ms at {} DPI ({})",
        pages.len(),
        raster_duration_ms,
        settings.dpi,
        settings.format
    );

    // ── Step 5: Package ──────────────────────────────────────────────────
    let archive_start = Instant::now();
    let buffer = {
        let pages = pages.clone();
        tokio::task::spawn_blocking(move || archive::archive_pages(&pages))
            .await
            .map_err(|e| Pdf2ZipError::Internal(format!("Archive task panicked: {e}")))??
    };
    let archive_duration_ms = archive_start.elapsed().as_millis() as u64;

    // ── Step 6: Assemble output ──────────────────────────────────────────
    let artifact = ArchiveArtifact::new(buffer.into_inner());
    let stats = ConversionStats {
        page_count: pages.len(),
        raster_duration_ms,
        archive_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        archive_bytes: artifact.bytes.len(),
    };
    info!(
        "Conversion complete: {} pages, {} archive bytes, {}ms total",
        stats.page_count, stats.archive_bytes, stats.total_duration_ms
    );

    Ok(ConversionOutput { artifact, stats })
    // `workdir` drops here: upload and page images are deleted.
}

/// Convert a PDF file on disk into a ZIP of page images.
pub async fn convert_file(
    input: impl AsRef<Path>,
    settings: &ConversionSettings,
) -> Result<ConversionOutput, Pdf2ZipError> {
    let input = input.as_ref();
    let bytes = tokio::fs::read(input)
        .await
        .map_err(|e| Pdf2ZipError::Internal(format!("Failed to read '{}': {e}", input.display())))?;
    convert_bytes(&bytes, settings).await
}

/// Convert a PDF file and write the archive next to the caller's choosing.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a partial
/// archive at `output_path`.
pub async fn convert_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    settings: &ConversionSettings,
) -> Result<ConversionStats, Pdf2ZipError> {
    let output = convert_file(input, settings).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| archive_write_failed(path, e))?;
        }
    }

    let tmp_path = path.with_extension("zip.tmp");
    tokio::fs::write(&tmp_path, &output.artifact.bytes)
        .await
        .map_err(|e| archive_write_failed(path, e))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| archive_write_failed(path, e))?;

    Ok(output.stats)
}

fn archive_write_failed(path: &Path, e: std::io::Error) -> Pdf2ZipError {
    Pdf2ZipError::ArchiveWriteFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    }
}

/// Reject uploads that do not start with the PDF magic bytes.
fn ensure_pdf_magic(bytes: &[u8]) -> Result<(), Pdf2ZipError> {
    let mut magic = [0u8; 4];
    let n = bytes.len().min(4);
    magic[..n].copy_from_slice(&bytes[..n]);
    if &magic != b"%PDF" {
        return Err(Pdf2ZipError::NotAPdf { magic });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_magic_accepts_pdf_header() {
        assert!(ensure_pdf_magic(b"%PDF-1.7\n...").is_ok());
    }

    #[test]
    fn pdf_magic_rejects_other_bytes() {
        for bad in [&b"PK\x03\x04zip"[..], b"<html>", b"", b"%PD"] {
            assert!(
                matches!(ensure_pdf_magic(bad), Err(Pdf2ZipError::NotAPdf { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn convert_bytes_rejects_non_pdf_before_touching_disk() {
        let settings = ConversionSettings::default();
        let err = convert_bytes(b"not a pdf at all", &settings)
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2ZipError::NotAPdf { .. }));
    }
}
