//! Configuration types for PDF-to-JPEG conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The rasterizer backend and the paths
//! it needs are resolved once at startup from these values and injected into
//! the converter; nothing downstream reads the environment.

use crate::error::Pdf2JpgError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default rendering resolution.
pub const DEFAULT_DPI: u32 = 300;

/// Default name of the directory created next to each source PDF.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "jpg";

/// Configuration for a PDF-to-JPEG conversion.
///
/// # Example
/// ```rust
/// use pdf2jpg::{ConversionConfig, RasterizerBackend};
///
/// let config = ConversionConfig::builder()
///     .dpi(200)
///     .backend(RasterizerBackend::Poppler)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 200);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Rendering DPI for each page. Range: 72–600. Default: 300.
    pub dpi: u32,

    /// Directory created next to each PDF to hold its page images.
    /// Default: `jpg`, giving `<pdf-dir>/jpg/<stem>/`.
    pub output_dir_name: String,

    /// Which rasterizer backend to construct. Default: [`RasterizerBackend::Pdfium`].
    pub backend: RasterizerBackend,

    /// Explicit path to the pdfium shared library (file or containing directory).
    /// If None, the library is discovered (see [`crate::pipeline::render`]).
    pub pdfium_library: Option<PathBuf>,

    /// Directory containing `pdftoppm` and `pdfinfo`.
    /// If None, both tools are looked up on `PATH`.
    pub poppler_path: Option<PathBuf>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            output_dir_name: DEFAULT_OUTPUT_DIR_NAME.to_string(),
            backend: RasterizerBackend::default(),
            pdfium_library: None,
            poppler_path: None,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn output_dir_name(mut self, name: impl Into<String>) -> Self {
        self.config.output_dir_name = name.into();
        self
    }

    pub fn backend(mut self, backend: RasterizerBackend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn poppler_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.poppler_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2JpgError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(Pdf2JpgError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        let name = c.output_dir_name.trim();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(Pdf2JpgError::InvalidConfig(format!(
                "output directory name must be a single path component, got '{}'",
                c.output_dir_name
            )));
        }
        Ok(self.config)
    }
}

/// The native library used to rasterise pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RasterizerBackend {
    /// PDFium via `pdfium-render` (default).
    #[default]
    Pdfium,
    /// Poppler's `pdfinfo` / `pdftoppm` command-line tools.
    Poppler,
}

impl std::fmt::Display for RasterizerBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterizerBackend::Pdfium => f.write_str("pdfium"),
            RasterizerBackend::Poppler => f.write_str("poppler"),
        }
    }
}
