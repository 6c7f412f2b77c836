//! Rasterizer invocation: run Ghostscript to completion and collect its
//! output files.
//!
//! ## Why spawn_blocking?
//!
//! `Command::output()` blocks the calling thread for the whole render, which
//! for a large document at high DPI can be minutes. The async wrapper moves
//! that wait onto tokio's blocking pool so the worker threads serving other
//! requests never stall. There is no timeout and no retry: one attempt per
//! conversion, and the process is trusted to terminate on its own.

use crate::config::OutputFormat;
use crate::error::Pdf2ZipError;
use crate::pipeline::command::RasterCommand;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// One rendered page on disk.
///
/// The file is owned by the conversion's working directory; this is a
/// reference to it, not a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// Location inside the working directory.
    pub path: PathBuf,
    /// 1-indexed position, parsed from the zero-padded counter in the name.
    pub ordinal: u32,
}

impl PageImage {
    /// Base filename, e.g. `page_001.png`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Run the rasterizer and enumerate the pages it produced.
///
/// Blocks on tokio's blocking pool until the external process exits.
pub async fn rasterize(
    cmd: RasterCommand,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PageImage>, Pdf2ZipError> {
    let dir = output_dir.to_path_buf();
    tokio::task::spawn_blocking(move || rasterize_blocking(&cmd, &dir, format))
        .await
        .map_err(|e| Pdf2ZipError::Internal(format!("Raster task panicked: {e}")))?
}

/// Blocking implementation of [`rasterize`].
fn rasterize_blocking(
    cmd: &RasterCommand,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PageImage>, Pdf2ZipError> {
    debug!("Invoking rasterizer: {}", cmd.display_line());

    let output = Command::new(&cmd.program)
        .args(&cmd.args)
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Pdf2ZipError::RasterizerNotFound {
                path: cmd.program.clone(),
            },
            _ => Pdf2ZipError::Internal(format!(
                "Failed to spawn '{}': {e}",
                cmd.program.display()
            )),
        })?;

    if !output.status.success() {
        return Err(Pdf2ZipError::RasterizationFailed {
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let pages = collect_pages(output_dir, format)?;
    info!("Rasterizer produced {} pages", pages.len());
    Ok(pages)
}

/// Enumerate produced pages: every file in `dir` with the format's extension,
/// sorted by filename.
///
/// The zero-padded counter in the output pattern makes lexicographic order
/// equal numeric page order, so sorting names is sorting pages.
pub fn collect_pages(dir: &Path, format: OutputFormat) -> Result<Vec<PageImage>, Pdf2ZipError> {
    let wanted = format.extension();
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| Pdf2ZipError::Internal(format!("Failed to list '{}': {e}", dir.display())))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case(wanted))
                .unwrap_or(false)
        })
        .collect();

    paths.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(i, path)| {
            let ordinal = parse_ordinal(&path).unwrap_or(i as u32 + 1);
            PageImage { path, ordinal }
        })
        .collect())
}

/// Pull the page counter out of a `page_NNN.ext` filename.
fn parse_ordinal(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.rsplit('_').next()?;
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn collect_pages_sorts_and_filters() {
        let dir = TempDir::new().unwrap();
        for name in ["page_003.png", "page_001.png", "page_002.png"] {
            fs::write(dir.path().join(name), name).unwrap();
        }
        // strays with other extensions are ignored
        fs::write(dir.path().join("upload.pdf"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let pages = collect_pages(dir.path(), OutputFormat::Png).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(
            pages.iter().map(|p| p.file_name()).collect::<Vec<_>>(),
            vec!["page_001.png", "page_002.png", "page_003.png"]
        );
        assert_eq!(pages.iter().map(|p| p.ordinal).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn collect_pages_empty_dir_is_empty_not_error() {
        let dir = TempDir::new().unwrap();
        let pages = collect_pages(dir.path(), OutputFormat::Jpeg).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn collect_pages_matches_extension_per_format() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page_001.jpeg"), "j").unwrap();
        fs::write(dir.path().join("page_001.png"), "p").unwrap();

        let jpeg = collect_pages(dir.path(), OutputFormat::Jpeg).unwrap();
        assert_eq!(jpeg.len(), 1);
        assert_eq!(jpeg[0].file_name(), "page_001.jpeg");
    }

    #[test]
    fn parse_ordinal_reads_zero_padded_counter() {
        assert_eq!(parse_ordinal(Path::new("/t/page_042.png")), Some(42));
        assert_eq!(parse_ordinal(Path::new("/t/page_007.tiff")), Some(7));
        assert_eq!(parse_ordinal(Path::new("/t/cover.png")), None);
    }

    #[cfg(unix)]
    #[test]
    fn missing_executable_is_rasterizer_not_found() {
        let dir = TempDir::new().unwrap();
        let cmd = RasterCommand {
            program: PathBuf::from("/nonexistent/gs-binary"),
            args: vec!["-dBATCH".into()],
        };
        let err = rasterize_blocking(&cmd, dir.path(), OutputFormat::Png).unwrap_err();
        assert!(matches!(err, Pdf2ZipError::RasterizerNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_carries_stderr() {
        let dir = TempDir::new().unwrap();
        let cmd = RasterCommand {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".into(), "echo render blew up >&2; exit 3".into()],
        };
        let err = rasterize_blocking(&cmd, dir.path(), OutputFormat::Png).unwrap_err();
        match err {
            Pdf2ZipError::RasterizationFailed { status, stderr } => {
                assert_eq!(status, Some(3));
                assert!(stderr.contains("render blew up"));
            }
            other => panic!("expected RasterizationFailed, got {other:?}"),
        }
    }
}
