//! # pdf2jpg
//!
//! Convert every page of a PDF, or of every PDF in a folder, into numbered
//! JPEG images.
//!
//! Rasterisation is delegated to a native library behind the
//! [`pipeline::render::PageRasterizer`] trait: pdfium (default) or the
//! poppler command-line tools. The crate itself is the orchestration around
//! it: file discovery, output naming, the page loop, and the status/progress
//! callback protocol.
//!
//! ## Pipeline Overview
//!
//! ```text
//! path (file or folder)
//!  │
//!  ├─ 1. Input   resolve *.pdf files, sorted by name
//!  ├─ 2. Count   ask the rasterizer for the page count
//!  ├─ 3. Render  one page at a time at the configured DPI (300)
//!  └─ 4. Encode  <pdf-dir>/jpg/<name>/<name>_001.jpg, _002.jpg, …
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2jpg::{BatchConverter, ConsoleReporter, ConversionConfig};
//! use pdf2jpg::pipeline::render::rasterizer_from_config;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let converter = BatchConverter::new(rasterizer_from_config(&config)?, config);
//!     let summary = converter.convert(Path::new("scans/"), &ConsoleReporter::stdout());
//!     eprintln!("{} pages written", summary.pages_written());
//!     Ok(())
//! }
//! ```
//!
//! Interactive front-ends should go through [`JobRunner`], which runs the
//! converter on a background worker and streams [`ConversionEvent`]s.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2jpg` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod runner;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, RasterizerBackend};
pub use convert::BatchConverter;
pub use error::{PageError, Pdf2JpgError, RasterizerError};
pub use output::{DocumentReport, JobSummary, PageResult};
pub use pipeline::input::{ConversionJob, PdfDocument};
pub use pipeline::render::{rasterizer_from_config, PageRasterizer};
pub use progress::{ConsoleReporter, ConversionProgressCallback};
pub use runner::{ConversionEvent, JobHandle, JobRunner};
