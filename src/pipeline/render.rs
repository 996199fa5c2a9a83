//! PDF rasterisation: the [`PageRasterizer`] seam and its pdfium backend.
//!
//! The converter only ever asks two questions of a backend: how many pages
//! a document has, and what one page looks like at a given DPI. Keeping that
//! behind a trait lets the converter run unchanged against pdfium, the
//! poppler command-line tools ([`crate::pipeline::poppler`]) or an in-memory
//! fake in tests.
//!
//! ## Locating pdfium
//!
//! pdfium is a native shared library loaded at runtime. [`PdfiumRasterizer::bind`]
//! tries, in order, and uses the first library that loads:
//!
//! 1. the path configured in [`ConversionConfig::pdfium_library`]
//!    (a library file or the directory containing it)
//! 2. `PDFIUM_LIB_PATH`
//! 3. `<data-local-dir>/pdf2jpg/` (e.g. `~/.local/share/pdf2jpg/`)
//! 4. the current directory
//! 5. the system library search path

use crate::config::{ConversionConfig, RasterizerBackend};
use crate::error::{Pdf2JpgError, RasterizerError};
use crate::pipeline::poppler::PopplerRasterizer;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// PDF points per inch; pdfium renders 1 pt = 1 px at scale 1.0.
const POINTS_PER_INCH: f32 = 72.0;

/// A native PDF renderer the converter drives one page at a time.
///
/// Implementations must be `Send + Sync`: the runner moves the converter
/// onto a background worker.
pub trait PageRasterizer: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Number of pages in the document.
    fn page_count(&self, pdf_path: &Path) -> Result<usize, RasterizerError>;

    /// Render one 1-indexed page at `dpi`.
    fn render_page(
        &self,
        pdf_path: &Path,
        page_num: usize,
        dpi: u32,
    ) -> Result<DynamicImage, RasterizerError>;
}

/// Construct the backend selected in `config`.
pub fn rasterizer_from_config(
    config: &ConversionConfig,
) -> Result<Arc<dyn PageRasterizer>, Pdf2JpgError> {
    let rasterizer: Arc<dyn PageRasterizer> = match config.backend {
        RasterizerBackend::Pdfium => Arc::new(PdfiumRasterizer::bind(config)?),
        RasterizerBackend::Poppler => Arc::new(PopplerRasterizer::discover(
            config.poppler_path.as_deref(),
        )?),
    };
    info!("Using {} rasterizer", rasterizer.name());
    Ok(rasterizer)
}

/// Rasterizer backed by the pdfium shared library.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind to pdfium, searching the locations listed in the module docs.
    pub fn bind(config: &ConversionConfig) -> Result<Self, Pdf2JpgError> {
        let mut last_error = String::from("no candidate locations");

        for candidate in library_candidates(config.pdfium_library.as_deref()) {
            debug!("Trying pdfium at {}", candidate.display());
            match Pdfium::bind_to_library(&candidate) {
                Ok(bindings) => {
                    info!("Bound pdfium from {}", candidate.display());
                    return Ok(Self {
                        pdfium: Pdfium::new(bindings),
                    });
                }
                Err(e) => last_error = format!("{}: {e}", candidate.display()),
            }
        }

        debug!("Trying the system pdfium library");
        Pdfium::bind_to_system_library()
            .map(|bindings| Self {
                pdfium: Pdfium::new(bindings),
            })
            .map_err(|e| Pdf2JpgError::RasterizerUnavailable {
                backend: "pdfium".into(),
                reason: format!("{last_error}; system library: {e}"),
            })
    }

    fn open<'a>(&'a self, pdf_path: &Path) -> Result<PdfDocument<'a>, RasterizerError> {
        self.pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| RasterizerError::OpenFailed {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn name(&self) -> &'static str {
        "pdfium"
    }

    fn page_count(&self, pdf_path: &Path) -> Result<usize, RasterizerError> {
        let document = self.open(pdf_path)?;
        Ok(document.pages().len() as usize)
    }

    fn render_page(
        &self,
        pdf_path: &Path,
        page_num: usize,
        dpi: u32,
    ) -> Result<DynamicImage, RasterizerError> {
        let document = self.open(pdf_path)?;
        let render_failed = |detail: String| RasterizerError::RenderFailed {
            page: page_num,
            detail,
        };

        let index = page_num
            .checked_sub(1)
            .and_then(|i| u16::try_from(i).ok())
            .ok_or_else(|| render_failed(format!("page index {page_num} out of range")))?;

        let page = document
            .pages()
            .get(index)
            .map_err(|e| render_failed(format!("{e:?}")))?;

        let render_config =
            PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / POINTS_PER_INCH);
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| render_failed(format!("{e:?}")))?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            page_num,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

/// Library file paths to try before the system search path.
fn library_candidates(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(p) = configured {
        candidates.push(library_file(p));
    }
    if let Ok(p) = std::env::var("PDFIUM_LIB_PATH") {
        if !p.is_empty() {
            candidates.push(library_file(Path::new(&p)));
        }
    }
    if let Some(data_dir) = dirs::data_local_dir() {
        candidates.push(Pdfium::pdfium_platform_library_name_at_path(
            &data_dir.join("pdf2jpg"),
        ));
    }
    candidates.push(Pdfium::pdfium_platform_library_name_at_path("./"));

    candidates
}

/// A directory means "the platform library inside it"; anything else is
/// taken as the library file itself.
fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}
