//! Poppler-based [`PageRasterizer`] implementation.
//!
//! Shells out to `pdfinfo` for the page count and to
//! `pdftoppm -png -r <dpi> -f <page> -l <page> <pdf>` for a single page.
//! With no output root, `pdftoppm` writes the PNG to stdout, which is
//! decoded in memory with `image`.

use crate::error::{Pdf2JpgError, RasterizerError};
use crate::pipeline::render::PageRasterizer;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// A rasterizer backed by the poppler CLI tools.
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    pdfinfo_path: PathBuf,
    pdftoppm_path: PathBuf,
}

impl PopplerRasterizer {
    /// Use explicit tool paths.
    pub fn new(pdfinfo_path: PathBuf, pdftoppm_path: PathBuf) -> Self {
        Self {
            pdfinfo_path,
            pdftoppm_path,
        }
    }

    /// Locate both tools in `tool_dir` when given, otherwise on `PATH`.
    pub fn discover(tool_dir: Option<&Path>) -> Result<Self, Pdf2JpgError> {
        Ok(Self {
            pdfinfo_path: locate_tool("pdfinfo", tool_dir)?,
            pdftoppm_path: locate_tool("pdftoppm", tool_dir)?,
        })
    }
}

impl PageRasterizer for PopplerRasterizer {
    fn name(&self) -> &'static str {
        "poppler"
    }

    fn page_count(&self, pdf_path: &Path) -> Result<usize, RasterizerError> {
        let output = run_tool(Command::new(&self.pdfinfo_path).arg(pdf_path), "pdfinfo")?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_page_count(&stdout).ok_or_else(|| RasterizerError::OpenFailed {
            path: pdf_path.to_path_buf(),
            detail: "pdfinfo output has no 'Pages:' line".into(),
        })
    }

    fn render_page(
        &self,
        pdf_path: &Path,
        page_num: usize,
        dpi: u32,
    ) -> Result<DynamicImage, RasterizerError> {
        let page = page_num.to_string();
        let dpi = dpi.to_string();
        let mut cmd = Command::new(&self.pdftoppm_path);
        cmd.args(["-png", "-r", dpi.as_str(), "-f", page.as_str(), "-l", page.as_str()])
            .arg(pdf_path);

        let output = run_tool(&mut cmd, "pdftoppm")?;
        if output.stdout.is_empty() {
            return Err(RasterizerError::RenderFailed {
                page: page_num,
                detail: "pdftoppm produced no image data".into(),
            });
        }
        debug!(
            "pdftoppm page {} → {} PNG bytes",
            page_num,
            output.stdout.len()
        );
        Ok(image::load_from_memory_with_format(
            &output.stdout,
            image::ImageFormat::Png,
        )?)
    }
}

/// Resolve a poppler tool: `<tool_dir>/<name>` when it exists, else `PATH`.
fn locate_tool(name: &str, tool_dir: Option<&Path>) -> Result<PathBuf, Pdf2JpgError> {
    if let Some(dir) = tool_dir {
        let exe = dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
        if exe.is_file() {
            return Ok(exe);
        }
        debug!("{} not found in {}; falling back to PATH", name, dir.display());
    }
    which::which(name).map_err(|e| Pdf2JpgError::RasterizerUnavailable {
        backend: "poppler".into(),
        reason: format!("{name} not found: {e}"),
    })
}

fn run_tool(cmd: &mut Command, tool: &str) -> Result<Output, RasterizerError> {
    let output = cmd.output().map_err(|e| RasterizerError::ToolFailed {
        tool: tool.to_string(),
        detail: e.to_string(),
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.lines().next().unwrap_or("").trim().to_string();
        return Err(RasterizerError::ToolFailed {
            tool: tool.to_string(),
            detail: if detail.is_empty() {
                format!("exited with {}", output.status)
            } else {
                detail
            },
        });
    }
    Ok(output)
}

/// Extract the `Pages:` value from `pdfinfo` output.
fn parse_page_count(pdfinfo_stdout: &str) -> Option<usize> {
    pdfinfo_stdout
        .lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|v| v.trim().parse().ok())
}
