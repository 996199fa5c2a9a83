//! Status/progress callback trait for conversion events.
//!
//! Every conversion reports through one [`ConversionProgressCallback`]. The
//! converter calls it synchronously, in order, from whichever thread runs the
//! job. A front-end that needs to touch display-thread state forwards the
//! events through a channel (see [`crate::runner`]); the library knows nothing
//! about how the host application displays them.
//!
//! # Example
//!
//! ```rust
//! use pdf2jpg::ConversionProgressCallback;
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct Collect {
//!     lines: Mutex<Vec<String>>,
//! }
//!
//! impl ConversionProgressCallback for Collect {
//!     fn on_status(&self, message: &str) {
//!         self.lines.lock().unwrap().push(message.to_string());
//!     }
//! }
//!
//! let cb = Collect::default();
//! cb.on_status("[INFO] Starting conversion: report");
//! cb.on_progress(1, 2);
//! assert_eq!(cb.lines.lock().unwrap().len(), 1);
//! ```

use crate::output::{DocumentReport, PageResult};
use std::io::Write;
use std::sync::Mutex;

/// Receives status lines and progress updates from the converter.
///
/// `on_status` is required; everything else defaults to a no-op so callers
/// only override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// A human-readable, newline-free log line.
    fn on_status(&self, message: &str);

    /// Called once per page, before rendering.
    ///
    /// # Arguments
    /// * `current` — 1-indexed page number, `1 ≤ current ≤ total`
    /// * `total`   — total pages in the current document
    fn on_progress(&self, current: usize, total: usize) {
        let _ = (current, total);
    }

    /// Called after each page attempt with its outcome.
    fn on_page_result(&self, result: &PageResult) {
        let _ = result;
    }

    /// Called once per document after the page loop (or after it was skipped).
    fn on_document_complete(&self, report: &DocumentReport) {
        let _ = report;
    }
}

/// Writes every status line to a console stream.
///
/// Used when no front-end is attached; progress is folded into the
/// `converting page P/N` status lines and therefore not printed separately.
pub struct ConsoleReporter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleReporter {
    /// Report to standard output.
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// Report to standard error.
    pub fn stderr() -> Self {
        Self::with_writer(std::io::stderr())
    }

    /// Report to an arbitrary writer.
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl ConversionProgressCallback for ConsoleReporter {
    fn on_status(&self, message: &str) {
        // A poisoned lock only means another writer panicked mid-line.
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(out, "{message}");
    }
}
