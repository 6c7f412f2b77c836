//! Ghostscript command construction: settings in, argv out.
//!
//! Pure — no I/O, no process spawning. The argument list is a deterministic
//! function of its inputs, which is what makes the invocation testable
//! without a rasterizer installed.

use crate::config::ConversionSettings;
use std::path::{Path, PathBuf};

/// Filename stem for produced pages; `%03d` is Ghostscript's page counter.
///
/// Three zero-padded digits keep filename sort order equal to numeric page
/// order for any document the rasterizer will realistically emit.
pub const PAGE_STEM: &str = "page_%03d";

/// A fully specified external-rasterizer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterCommand {
    /// Executable to run.
    pub program: PathBuf,
    /// Arguments, in the exact order they are passed.
    pub args: Vec<String>,
}

impl RasterCommand {
    /// Render the invocation as a single shell-style line for logs.
    pub fn display_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Build the Ghostscript invocation for one conversion.
///
/// Always sets: device and output pattern for the requested format, target
/// resolution, non-interactive batch flags, the page range, JPEG quality
/// (`-dJPEGQ` is a no-op for non-JPEG devices and passed regardless),
/// moderate anti-aliasing for graphics and text, and a fixed rendering
/// thread count.
pub fn build_command(
    settings: &ConversionSettings,
    input: &Path,
    output_dir: &Path,
) -> RasterCommand {
    let pattern = output_dir.join(format!("{PAGE_STEM}.{}", settings.format.extension()));

    let args = vec![
        format!("-sDEVICE={}", settings.format.device()),
        format!("-sOutputFile={}", pattern.display()),
        format!("-r{}", settings.dpi),
        "-dNOPAUSE".to_string(),
        "-dBATCH".to_string(),
        format!("-dFirstPage={}", settings.first_page),
        format!("-dLastPage={}", settings.last_page),
        format!("-dJPEGQ={}", settings.quality),
        "-dGraphicsAlphaBits=4".to_string(),
        "-dTextAlphaBits=4".to_string(),
        "-dNumRenderingThreads=4".to_string(),
        "-f".to_string(),
        input.display().to_string(),
    ];

    RasterCommand {
        program: settings.ghostscript.clone(),
        args,
    }
}
