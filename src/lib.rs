//! # pdf2zip
//!
//! Upload a PDF, rasterise every page to an image with Ghostscript, download
//! the pages as a single ZIP.
//!
//! The hard work is delegated: Ghostscript does all rendering through a fixed
//! command-line contract. This crate is the glue around it — parameter
//! translation, process invocation, file collection, ZIP packaging — plus the
//! small web form that drives it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload
//!  │
//!  ├─ 1. Gate     reject non-PDF bytes (%PDF magic)
//!  ├─ 2. Stage    write the upload into a fresh temp directory
//!  ├─ 3. Command  build the Ghostscript argv from the settings
//!  ├─ 4. Invoke   run Ghostscript to completion (spawn_blocking)
//!  ├─ 5. Collect  enumerate page_%03d.<ext> files in page order
//!  └─ 6. Archive  deflate them into one in-memory ZIP
//! ```
//!
//! The temp directory and everything in it are deleted when the conversion
//! returns, whether it succeeded or failed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2zip::{convert_bytes, ConversionSettings, OutputFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ConversionSettings::builder()
//!         .dpi(300)
//!         .format(OutputFormat::Png)
//!         .pages(1, 3)
//!         .build()?;
//!     let pdf = std::fs::read("document.pdf")?;
//!     let output = convert_bytes(&pdf, &settings).await?;
//!     std::fs::write("converted_images.zip", &output.artifact.bytes)?;
//!     eprintln!("{} pages in {}ms", output.stats.page_count, output.stats.total_duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! Or run the bundled server (`pdf2zip --port 8080`) and use the form at `/`.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2zip` server binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod server;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionSettings, ConversionSettingsBuilder, OutputFormat};
pub use convert::{convert_bytes, convert_file, convert_to_file};
pub use error::Pdf2ZipError;
pub use output::{ArchiveArtifact, ConversionOutput, ConversionStats};
pub use server::{app, ServerConfig};
pub use session::{Session, SessionState};
