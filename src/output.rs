//! Per-page, per-document and per-job result types.
//!
//! None of these are retained by the converter itself: [`PageResult`] is
//! handed to the callback as soon as a page finishes, and the document
//! reports are collected into the [`JobSummary`] returned to the caller.

use crate::error::PageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one page attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageResult {
    /// The JPEG for `page_num` (1-indexed) was written to `output_path`.
    Written { page_num: usize, output_path: PathBuf },
    /// The page could not be rendered or written.
    Failed { error: PageError },
}

impl PageResult {
    /// 1-indexed page number this result belongs to.
    pub fn page_num(&self) -> usize {
        match self {
            PageResult::Written { page_num, .. } => *page_num,
            PageResult::Failed { error } => error.page(),
        }
    }
}

/// Summary of one document after its page loop finished or it was skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Source PDF.
    pub source: PathBuf,
    /// File stem used for the output directory and file names.
    pub base_name: String,
    /// `<source-dir>/<output-dir-name>/<base_name>/`.
    pub output_dir: PathBuf,
    /// Page count reported by the rasterizer; 0 when the document was skipped.
    pub total_pages: usize,
    /// Pages written as JPEG.
    pub pages_written: usize,
    /// Pages whose render or write failed.
    pub pages_failed: usize,
    /// Wall-clock seconds spent on this document.
    pub elapsed_secs: f64,
    /// Set when the document was skipped before its page loop.
    pub skipped: Option<String>,
}

/// Aggregate result of one conversion job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSummary {
    /// One entry per resolved document, in processing order.
    pub documents: Vec<DocumentReport>,
    /// Set when the job stopped before any document (invalid input, no PDFs).
    pub rejected: Option<String>,
}

impl JobSummary {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            documents: Vec::new(),
            rejected: Some(reason.into()),
        }
    }

    pub fn pages_written(&self) -> usize {
        self.documents.iter().map(|d| d.pages_written).sum()
    }

    pub fn pages_failed(&self) -> usize {
        self.documents.iter().map(|d| d.pages_failed).sum()
    }

    pub fn documents_skipped(&self) -> usize {
        self.documents.iter().filter(|d| d.skipped.is_some()).count()
    }
}
