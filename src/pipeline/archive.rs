//! Archive packaging: page files on disk → one in-memory ZIP.
//!
//! Pages are referenced by path, never buffered together: each file is read,
//! deflated into the archive, and dropped before the next one is touched, so
//! peak memory stays near one page plus the compressed output regardless of
//! page count. Entries carry the base filename only — no directory structure.

use crate::error::Pdf2ZipError;
use crate::pipeline::invoke::PageImage;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Package the given pages, in order, into an in-memory ZIP.
///
/// Returns a seekable buffer positioned at its start, ready for transmission.
/// An empty page list yields a valid, empty archive.
pub fn archive_pages(pages: &[PageImage]) -> Result<Cursor<Vec<u8>>, Pdf2ZipError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for page in pages {
        let bytes = std::fs::read(&page.path).map_err(|e| Pdf2ZipError::ArchiveWriteFailed {
            path: page.path.clone(),
            detail: e.to_string(),
        })?;

        zip.start_file(page.file_name(), options)
            .map_err(|e| Pdf2ZipError::ArchiveWriteFailed {
                path: page.path.clone(),
                detail: format!("ZIP entry: {e}"),
            })?;
        zip.write_all(&bytes)
            .map_err(|e| Pdf2ZipError::ArchiveWriteFailed {
                path: page.path.clone(),
                detail: format!("ZIP write: {e}"),
            })?;

        debug!("Archived {} ({} bytes)", page.file_name(), bytes.len());
    }

    let mut cursor = zip.finish().map_err(|e| Pdf2ZipError::ArchiveWriteFailed {
        path: "converted_images.zip".into(),
        detail: format!("ZIP finalise: {e}"),
    })?;
    cursor.set_position(0);
    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn page(dir: &TempDir, name: &str, contents: &[u8]) -> PageImage {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        PageImage {
            path,
            ordinal: name
                .trim_start_matches("page_")
                .split('.')
                .next()
                .and_then(|d| d.parse().ok())
                .unwrap_or(0),
        }
    }

    #[test]
    fn round_trip_preserves_names_and_bytes() {
        let dir = TempDir::new().unwrap();
        let pages = vec![
            page(&dir, "page_001.png", b"first page pixels"),
            page(&dir, "page_002.png", b"second page pixels"),
            page(&dir, "page_003.png", b"third page pixels"),
        ];

        let cursor = archive_pages(&pages).unwrap();
        assert_eq!(cursor.position(), 0);

        let mut zip = ZipArchive::new(cursor).unwrap();
        assert_eq!(zip.len(), 3);
        for (i, expected) in [
            ("page_001.png", b"first page pixels".as_slice()),
            ("page_002.png", b"second page pixels".as_slice()),
            ("page_003.png", b"third page pixels".as_slice()),
        ]
        .iter()
        .enumerate()
        {
            let mut entry = zip.by_index(i).unwrap();
            assert_eq!(entry.name(), expected.0);
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            assert_eq!(bytes, expected.1);
        }
    }

    #[test]
    fn entries_carry_no_directory_structure() {
        let dir = TempDir::new().unwrap();
        let pages = vec![page(&dir, "page_001.jpeg", b"x")];
        let cursor = archive_pages(&pages).unwrap();
        let zip = ZipArchive::new(cursor).unwrap();
        let names: Vec<&str> = zip.file_names().collect();
        assert_eq!(names, vec!["page_001.jpeg"]);
    }

    #[test]
    fn empty_input_yields_valid_empty_archive() {
        let cursor = archive_pages(&[]).unwrap();
        let zip = ZipArchive::new(cursor).unwrap();
        assert_eq!(zip.len(), 0);
    }

    #[test]
    fn unreadable_input_is_archive_write_failed() {
        let missing = PageImage {
            path: PathBuf::from("/nonexistent/page_001.png"),
            ordinal: 1,
        };
        let err = archive_pages(&[missing]).unwrap_err();
        assert!(matches!(err, Pdf2ZipError::ArchiveWriteFailed { .. }));
    }
}
