//! Conversion settings and the output-format enumeration.
//!
//! Every knob a user can turn lives in [`ConversionSettings`], built via its
//! [`ConversionSettingsBuilder`]. Keeping the whole parameter set in one
//! struct makes it trivial to log a conversion's inputs, share them across
//! threads, and diff two runs to understand why their outputs differ.

use crate::error::Pdf2ZipError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Settings for one PDF-to-images conversion.
///
/// Built via [`ConversionSettings::builder()`] or
/// [`ConversionSettings::default()`].
///
/// # Example
/// ```rust
/// use pdf2zip::{ConversionSettings, OutputFormat};
///
/// let settings = ConversionSettings::builder()
///     .dpi(600)
///     .format(OutputFormat::Png)
///     .pages(1, 3)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// Rendering resolution in dots per inch. Range: 150–1200. Default: 300.
    ///
    /// 300 DPI reads crisply on screen and in print; 600+ is for archival
    /// scans and fine print, at a steep cost in file size and render time.
    pub dpi: u32,

    /// JPEG quality, 1–100. Default: 95.
    ///
    /// Passed to Ghostscript as `-dJPEGQ` for every output format; the
    /// rasterizer ignores it for non-JPEG devices.
    pub quality: u8,

    /// First page to render, 1-indexed. Default: 1.
    pub first_page: u32,

    /// Last page to render, 1-indexed, inclusive. Default: 9999.
    ///
    /// The default deliberately overshoots: Ghostscript clamps the range to
    /// the document's real page count, so "render everything" needs no page
    /// counting on our side. An inverted range (`first_page > last_page`) is
    /// passed through verbatim; whatever the rasterizer does with it is
    /// surfaced unchanged.
    pub last_page: u32,

    /// Output image format. Default: JPEG.
    pub format: OutputFormat,

    /// Path to the Ghostscript executable. Default: `gs`.
    ///
    /// A bare name is resolved through `PATH`; an absolute path pins a
    /// specific installation.
    pub ghostscript: PathBuf,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            dpi: 300,
            quality: 95,
            first_page: 1,
            last_page: 9999,
            format: OutputFormat::Jpeg,
            ghostscript: PathBuf::from("gs"),
        }
    }
}

impl ConversionSettings {
    /// Create a new builder for `ConversionSettings`.
    pub fn builder() -> ConversionSettingsBuilder {
        ConversionSettingsBuilder {
            settings: Self::default(),
        }
    }
}

/// Builder for [`ConversionSettings`].
#[derive(Debug)]
pub struct ConversionSettingsBuilder {
    settings: ConversionSettings,
}

impl ConversionSettingsBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.settings.dpi = dpi.clamp(150, 1200);
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.settings.quality = quality.clamp(1, 100);
        self
    }

    /// Set the inclusive 1-indexed page range. No `first ≤ last` check:
    /// the range goes to the rasterizer as given.
    pub fn pages(mut self, first: u32, last: u32) -> Self {
        self.settings.first_page = first.max(1);
        self.settings.last_page = last.max(1);
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.settings.format = format;
        self
    }

    pub fn ghostscript(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.ghostscript = path.into();
        self
    }

    /// Build the settings, validating constraints.
    ///
    /// The setters already clamp, so this only rejects structs assembled by
    /// hand with out-of-range fields.
    pub fn build(self) -> Result<ConversionSettings, Pdf2ZipError> {
        let s = &self.settings;
        if s.dpi < 150 || s.dpi > 1200 {
            return Err(Pdf2ZipError::InvalidSettings(format!(
                "DPI must be 150–1200, got {}",
                s.dpi
            )));
        }
        if s.quality == 0 || s.quality > 100 {
            return Err(Pdf2ZipError::InvalidSettings(format!(
                "Quality must be 1–100, got {}",
                s.quality
            )));
        }
        if s.first_page == 0 || s.last_page == 0 {
            return Err(Pdf2ZipError::InvalidSettings(
                "Page numbers are 1-indexed; 0 is not a page".into(),
            ));
        }
        Ok(self.settings)
    }
}

// ── Output formats ───────────────────────────────────────────────────────

/// The image formats the rasterizer can emit.
///
/// Each maps to a fixed Ghostscript device: the JPEG encoder, the 24-bit
/// colour PNG device, and the 24-bit uncompressed TIFF device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// JPEG (`jpeg` device). Smallest files; lossy. (default)
    #[default]
    Jpeg,
    /// PNG, 24-bit colour (`png16m` device). Lossless.
    Png,
    /// TIFF, 24-bit uncompressed (`tiff24nc` device). Largest files.
    Tiff,
}

impl OutputFormat {
    /// The Ghostscript `-sDEVICE=` identifier for this format.
    pub fn device(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png16m",
            OutputFormat::Tiff => "tiff24nc",
        }
    }

    /// File extension used in the output pattern: the lower-cased format name.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Tiff => "tiff",
        }
    }

    /// All supported formats, in the order the UI presents them.
    pub fn all() -> [OutputFormat; 3] {
        [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::Tiff]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Tiff => "TIFF",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = Pdf2ZipError;

    /// Parse a format name, case-insensitively.
    ///
    /// This is the one boundary where an open value can enter the closed
    /// enumeration, so it is where [`Pdf2ZipError::UnsupportedFormat`] lives.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JPEG" | "JPG" => Ok(OutputFormat::Jpeg),
            "PNG" => Ok(OutputFormat::Png),
            "TIFF" | "TIF" => Ok(OutputFormat::Tiff),
            _ => Err(Pdf2ZipError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}
