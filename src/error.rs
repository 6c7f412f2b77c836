//! Error types for the pdf2zip library.
//!
//! Everything is one enum, [`Pdf2ZipError`]. Conversions are all-or-nothing —
//! either a complete archive of every page in range is produced, or the whole
//! request fails — so there is no page-level error type and no partial-result
//! channel. Every variant is caught at the server boundary and rendered as a
//! user-visible response; none may take the hosting process down.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2zip library.
#[derive(Debug, Error)]
pub enum Pdf2ZipError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The uploaded bytes do not start with the PDF magic.
    #[error("Uploaded file is not a valid PDF.\nFirst bytes: {magic:?}")]
    NotAPdf { magic: [u8; 4] },

    /// An output format string outside JPEG/PNG/TIFF reached the parser.
    #[error("Unsupported output format '{format}'. Supported: JPEG, PNG, TIFF.")]
    UnsupportedFormat { format: String },

    /// Settings builder validation failed.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    // ── Rasterizer errors ─────────────────────────────────────────────────
    /// The Ghostscript executable could not be spawned.
    #[error(
        "Ghostscript executable not found at '{path}'.\n\
         Install Ghostscript or point --ghostscript / GHOSTSCRIPT_PATH at the binary."
    )]
    RasterizerNotFound { path: PathBuf },

    /// Ghostscript ran but exited with a failure status.
    ///
    /// Covers malformed PDFs, out-of-range page selections, and PDF features
    /// the rasterizer cannot handle. `stderr` carries its diagnostics.
    #[error("Ghostscript failed with {}:\n{stderr}", status_label(.status))]
    RasterizationFailed { status: Option<i32>, stderr: String },

    // ── Archive errors ────────────────────────────────────────────────────
    /// A produced page could not be read or written into the ZIP.
    #[error("Failed to archive rendered page '{path}': {detail}")]
    ArchiveWriteFailed { path: PathBuf, detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (temp directory creation, task join).
    #[error("Internal error: {0}")]
    Internal(String),
}

fn status_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (killed by signal)".to_string(),
    }
}
