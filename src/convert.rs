//! The batch conversion loop.
//!
//! [`BatchConverter::convert`] resolves the input, then walks every document
//! and every page strictly in order. All failures are caught at the narrowest
//! scope and turned into status lines:
//!
//! | Failure                      | Scope    | Effect                         |
//! |------------------------------|----------|--------------------------------|
//! | invalid path / no PDFs       | job      | reported, nothing else happens |
//! | output dir / page count      | document | reported, next document        |
//! | render / JPEG write          | page     | reported, next page            |
//!
//! Per document the sequence of callback events is:
//!
//! ```text
//! Starting ─▶ (page count failed ─▶ skipped)
//!          └▶ { converting P/N, progress(P, N), saved | page error }* ─▶ Finished
//! ```

use crate::config::ConversionConfig;
use crate::error::PageError;
use crate::output::{DocumentReport, JobSummary, PageResult};
use crate::pipeline::encode;
use crate::pipeline::input::{page_number_width, ConversionJob, PdfDocument};
use crate::pipeline::render::PageRasterizer;
use crate::progress::ConversionProgressCallback;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Drives a [`PageRasterizer`] over every page of every PDF in a job.
#[derive(Clone)]
pub struct BatchConverter {
    rasterizer: Arc<dyn PageRasterizer>,
    config: ConversionConfig,
}

impl BatchConverter {
    pub fn new(rasterizer: Arc<dyn PageRasterizer>, config: ConversionConfig) -> Self {
        Self { rasterizer, config }
    }

    /// Convert a PDF file, or every PDF directly inside a directory, to JPEGs.
    ///
    /// Output for `.../X.pdf` lands in `.../jpg/X/X_001.jpg`, `X_002.jpg`, …
    /// (four digits for documents of 1000+ pages).
    ///
    /// Never fails: every problem is reported through `callback`. The returned
    /// [`JobSummary`] mirrors what was reported.
    pub fn convert(
        &self,
        input: &Path,
        callback: &dyn ConversionProgressCallback,
    ) -> JobSummary {
        info!("Starting job: {}", input.display());

        let job = match ConversionJob::resolve(input, &self.config.output_dir_name) {
            Ok(job) => job,
            Err(e) => {
                let message = e.to_string();
                warn!("{message}");
                callback.on_status(&format!("[ERROR] {message}"));
                return JobSummary::rejected(message);
            }
        };

        let documents = job
            .documents
            .iter()
            .map(|doc| self.convert_document(doc, callback))
            .collect();

        JobSummary {
            documents,
            rejected: None,
        }
    }

    /// Run one document through the page loop.
    fn convert_document(
        &self,
        doc: &PdfDocument,
        callback: &dyn ConversionProgressCallback,
    ) -> DocumentReport {
        let start = Instant::now();
        let mut report = DocumentReport {
            source: doc.path.clone(),
            base_name: doc.base_name.clone(),
            output_dir: doc.output_dir.clone(),
            total_pages: 0,
            pages_written: 0,
            pages_failed: 0,
            elapsed_secs: 0.0,
            skipped: None,
        };

        // ── Step 1: Output directory ─────────────────────────────────────────
        if let Err(e) = std::fs::create_dir_all(&doc.output_dir) {
            let reason = format!(
                "Failed to create output directory '{}': {e}",
                doc.output_dir.display()
            );
            return self.skip(report, reason, callback);
        }

        // ── Step 2: Announce ─────────────────────────────────────────────────
        callback.on_status(&format!("[INFO] Starting conversion: {}", doc.base_name));

        // ── Step 3: Page count ───────────────────────────────────────────────
        let total_pages = match self.rasterizer.page_count(&doc.path) {
            Ok(n) => n,
            Err(e) => {
                let reason = format!(
                    "Failed to read page count: {} → {e}",
                    doc.path.display()
                );
                report.elapsed_secs = start.elapsed().as_secs_f64();
                return self.skip(report, reason, callback);
            }
        };
        report.total_pages = total_pages;
        debug!(
            "{}: {} pages, {}-digit page numbers",
            doc.base_name,
            total_pages,
            page_number_width(total_pages)
        );

        // ── Step 4: Page loop ────────────────────────────────────────────────
        for page_num in 1..=total_pages {
            callback.on_status(&format!("    [INFO] converting page {page_num}/{total_pages}"));
            callback.on_progress(page_num, total_pages);

            let result = self.convert_page(doc, page_num, total_pages);
            match &result {
                PageResult::Written { output_path, .. } => {
                    report.pages_written += 1;
                    callback.on_status(&format!("    [OK] Saved: {}", output_path.display()));
                }
                PageResult::Failed { error } => {
                    report.pages_failed += 1;
                    warn!("{} page {}: {}", doc.base_name, page_num, error);
                    callback.on_status(&format!("    [ERROR] Page {page_num} failed: {error}"));
                }
            }
            callback.on_page_result(&result);
        }

        // ── Step 5: Done ─────────────────────────────────────────────────────
        report.elapsed_secs = start.elapsed().as_secs_f64();
        info!(
            "{}: {}/{} pages written in {:.2}s",
            doc.base_name, report.pages_written, total_pages, report.elapsed_secs
        );
        callback.on_status(&format!(
            "[DONE] Finished: {} ({} pages, {:.2} s)",
            doc.base_name, total_pages, report.elapsed_secs
        ));
        callback.on_document_complete(&report);
        report
    }

    /// Render and write a single page.
    fn convert_page(&self, doc: &PdfDocument, page_num: usize, total_pages: usize) -> PageResult {
        let image = match self
            .rasterizer
            .render_page(&doc.path, page_num, self.config.dpi)
        {
            Ok(image) => image,
            Err(e) => {
                return PageResult::Failed {
                    error: PageError::RenderFailed {
                        page: page_num,
                        detail: e.to_string(),
                    },
                }
            }
        };

        let path = doc.page_output_path(page_num, total_pages);
        match encode::save_jpeg(&image, &path) {
            Ok(()) => PageResult::Written {
                page_num,
                output_path: path,
            },
            Err(e) => PageResult::Failed {
                error: PageError::WriteFailed {
                    page: page_num,
                    path,
                    detail: e.to_string(),
                },
            },
        }
    }

    fn skip(
        &self,
        mut report: DocumentReport,
        reason: String,
        callback: &dyn ConversionProgressCallback,
    ) -> DocumentReport {
        warn!("Skipping {}: {}", report.base_name, reason);
        callback.on_status(&format!("[ERROR] {reason}"));
        report.skipped = Some(reason);
        callback.on_document_complete(&report);
        report
    }
}
