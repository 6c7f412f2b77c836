//! Pipeline stages for PDF-to-images conversion.
//!
//! Each submodule implements exactly one transformation step, independently
//! testable without the others.
//!
//! ## Data Flow
//!
//! ```text
//! settings ──▶ command ──▶ invoke ──▶ archive
//!  (form)      (argv)   (Ghostscript)  (ZIP)
//! ```
//!
//! 1. [`command`] — map validated settings to the Ghostscript argv; pure
//! 2. [`invoke`]  — run the rasterizer to completion and enumerate the page
//!    files it wrote; runs in `spawn_blocking` because the wait is synchronous
//! 3. [`archive`] — deflate the page files into one in-memory ZIP

pub mod archive;
pub mod command;
pub mod invoke;
