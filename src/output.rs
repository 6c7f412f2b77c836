//! Output types: the downloadable archive and per-stage statistics.

use serde::Serialize;

/// Default download name for the produced archive.
pub const ARCHIVE_FILE_NAME: &str = "converted_images.zip";

/// MIME type of the produced archive.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// The finished, in-memory ZIP ready for download.
///
/// Holds the complete archive bytes; page images themselves never live in
/// memory, only their packaged form. The artifact belongs to whoever serves
/// the download — by then the working directory behind it is already gone.
#[derive(Debug, Clone)]
pub struct ArchiveArtifact {
    /// Suggested download filename.
    pub file_name: String,
    /// Complete ZIP bytes.
    pub bytes: Vec<u8>,
}

impl ArchiveArtifact {
    /// Wrap archive bytes under the standard download name.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            file_name: ARCHIVE_FILE_NAME.to_string(),
            bytes,
        }
    }

    pub fn content_type(&self) -> &'static str {
        ARCHIVE_CONTENT_TYPE
    }
}

/// Timing and size statistics for one conversion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    /// Pages the rasterizer produced.
    pub page_count: usize,
    /// Wall-clock time spent inside Ghostscript.
    pub raster_duration_ms: u64,
    /// Wall-clock time spent packaging the ZIP.
    pub archive_duration_ms: u64,
    /// End-to-end time including temp-file handling.
    pub total_duration_ms: u64,
    /// Size of the finished archive in bytes.
    pub archive_bytes: usize,
}

/// Result of a successful conversion.
#[derive(Debug)]
pub struct ConversionOutput {
    /// The downloadable archive.
    pub artifact: ArchiveArtifact,
    /// Statistics for logging and the UI.
    pub stats: ConversionStats,
}
