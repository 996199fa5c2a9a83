//! Pipeline stages for PDF-to-JPEG conversion.
//!
//! Each submodule implements one step; [`crate::convert`] drives them in a
//! strictly sequential loop, one document and one page at a time.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render / poppler ──▶ encode
//! (path)    (one page, N DPI)    (JPEG file)
//! ```
//!
//! 1. [`input`]   — resolve a file or directory into an ordered job and
//!    derive output names
//! 2. [`render`]  — the [`render::PageRasterizer`] seam and its pdfium backend
//! 3. [`poppler`] — alternative backend driving `pdfinfo` / `pdftoppm`
//! 4. [`encode`]  — flatten to RGB and write the JPEG

pub mod encode;
pub mod input;
pub mod poppler;
pub mod render;
