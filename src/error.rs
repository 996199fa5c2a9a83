//! Error types for the pdf2jpg library.
//!
//! Three error types reflect three distinct scopes:
//!
//! * [`Pdf2JpgError`] — **job-level**: the job cannot start at all (bad input
//!   path, no PDFs, a job already running, no rasterizer backend). The
//!   converter turns the input errors into status messages; the runner and
//!   the backend constructors return them as `Err`.
//!
//! * [`RasterizerError`] — returned by a [`crate::pipeline::render::PageRasterizer`]
//!   when a document cannot be opened or a page cannot be rendered.
//!
//! * [`PageError`] — **non-fatal**: a single page failed to render or to be
//!   written. Stored inside [`crate::output::PageResult`]; the document keeps
//!   going with the next page.

use std::path::PathBuf;
use thiserror::Error;

/// Job-level errors returned by the pdf2jpg library.
#[derive(Debug, Error)]
pub enum Pdf2JpgError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input path is neither a `.pdf` file nor a directory.
    #[error("Invalid input: '{}' is not a PDF file or a directory", path.display())]
    InvalidInput { path: PathBuf },

    /// The input directory contains no `.pdf` files.
    #[error("No PDF files found in '{}'", dir.display())]
    NoPdfFiles { dir: PathBuf },

    // ── Runner errors ─────────────────────────────────────────────────────
    /// A conversion job is already in progress on this runner.
    #[error("A conversion is already in progress")]
    AlreadyRunning,

    // ── Backend errors ────────────────────────────────────────────────────
    /// No usable rasterizer backend could be initialised.
    #[error(
        "Rasterizer backend '{backend}' is unavailable: {reason}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing pdfium copy.\n\
  • Install poppler-utils and run with --backend poppler.\n\
  • Point --poppler-path at the directory containing pdftoppm and pdfinfo.\n"
    )]
    RasterizerUnavailable { backend: String, reason: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by a page rasterizer backend.
#[derive(Debug, Error)]
pub enum RasterizerError {
    /// The document could not be opened or parsed.
    #[error("cannot open '{}': {detail}", path.display())]
    OpenFailed { path: PathBuf, detail: String },

    /// A single page could not be rendered.
    #[error("rendering page {page} failed: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// An external tool could not be spawned or exited unsuccessfully.
    #[error("{tool} failed: {detail}")]
    ToolFailed { tool: String, detail: String },

    /// The rendered bytes could not be decoded into an image.
    #[error("cannot decode rendered page: {0}")]
    Decode(#[from] image::ImageError),
}

/// A non-fatal error for a single page.
///
/// Stored in [`crate::output::PageResult`]. The document continues with the
/// next page.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// Page rasterisation failed.
    #[error("{detail}")]
    RenderFailed { page: usize, detail: String },

    /// The JPEG could not be encoded or written.
    #[error("cannot write '{}': {detail}", path.display())]
    WriteFailed {
        page: usize,
        path: PathBuf,
        detail: String,
    },
}

impl PageError {
    /// 1-based page number the error belongs to.
    pub fn page(&self) -> usize {
        match self {
            PageError::RenderFailed { page, .. } | PageError::WriteFailed { page, .. } => *page,
        }
    }
}
