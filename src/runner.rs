//! Background execution for interactive front-ends.
//!
//! A [`JobRunner`] owns one [`BatchConverter`] and runs at most one job at a
//! time on a blocking worker (`tokio::task::spawn_blocking`). The converter's
//! callbacks are turned into [`ConversionEvent`]s and forwarded over an
//! unbounded `mpsc` channel, so the display side only ever reads from a
//! receiver and never shares mutable state with the worker.
//!
//! ```rust,no_run
//! use pdf2jpg::{BatchConverter, ConversionConfig, ConversionEvent, JobRunner};
//! use pdf2jpg::pipeline::render::rasterizer_from_config;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConversionConfig::default();
//! let converter = BatchConverter::new(rasterizer_from_config(&config)?, config);
//! let runner = JobRunner::new(converter);
//!
//! let mut job = runner.start("scans/")?;
//! while let Some(event) = job.next_event().await {
//!     match event {
//!         ConversionEvent::Status(line) => println!("{line}"),
//!         ConversionEvent::Progress { current, total } => eprintln!("{current}/{total}"),
//!         ConversionEvent::Finished(_) => break,
//!     }
//! }
//! let summary = job.wait().await?;
//! println!("{} pages written", summary.pages_written());
//! # Ok(())
//! # }
//! ```

use crate::convert::BatchConverter;
use crate::error::Pdf2JpgError;
use crate::output::JobSummary;
use crate::progress::ConversionProgressCallback;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

/// One converter callback, marshalled for the display thread.
#[derive(Debug, Clone)]
pub enum ConversionEvent {
    /// A status line, in emission order.
    Status(String),
    /// Page `current` of `total` is about to be rendered.
    Progress { current: usize, total: usize },
    /// The job is over; always the last event.
    Finished(JobSummary),
}

/// Forwards callbacks into the event channel.
struct ChannelReporter {
    tx: UnboundedSender<ConversionEvent>,
}

impl ConversionProgressCallback for ChannelReporter {
    fn on_status(&self, message: &str) {
        // The receiver may have been dropped; the job still runs to completion.
        let _ = self.tx.send(ConversionEvent::Status(message.to_string()));
    }

    fn on_progress(&self, current: usize, total: usize) {
        let _ = self.tx.send(ConversionEvent::Progress { current, total });
    }
}

/// Clears the running flag when the worker ends, including on panic.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs conversion jobs one at a time in the background.
pub struct JobRunner {
    converter: BatchConverter,
    running: Arc<AtomicBool>,
}

impl JobRunner {
    pub fn new(converter: BatchConverter) -> Self {
        Self {
            converter,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// `true` while a job started by this runner is still in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start converting `input` on a background worker.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// * [`Pdf2JpgError::AlreadyRunning`] — a previous job has not finished
    /// * [`Pdf2JpgError::Internal`]       — no Tokio runtime is available
    pub fn start(&self, input: impl Into<PathBuf>) -> Result<JobHandle, Pdf2JpgError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| Pdf2JpgError::Internal(format!("no Tokio runtime: {e}")))?;

        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Pdf2JpgError::AlreadyRunning);
        }
        let guard = RunningGuard(Arc::clone(&self.running));

        let input = input.into();
        let converter = self.converter.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        debug!("Submitting job for {}", input.display());

        let task = handle.spawn_blocking(move || {
            let reporter = ChannelReporter { tx };
            let summary = converter.convert(&input, &reporter);
            // Release before announcing completion so a consumer reacting to
            // `Finished` can start the next job immediately.
            drop(guard);
            let _ = reporter.tx.send(ConversionEvent::Finished(summary.clone()));
            summary
        });

        Ok(JobHandle { events: rx, task })
    }
}

/// A running job: its event stream and its final result.
#[derive(Debug)]
pub struct JobHandle {
    events: UnboundedReceiver<ConversionEvent>,
    task: JoinHandle<JobSummary>,
}

impl JobHandle {
    /// Next event, or `None` once the worker has finished and the stream is drained.
    pub async fn next_event(&mut self) -> Option<ConversionEvent> {
        self.events.recv().await
    }

    /// Wait for the worker and return its summary.
    pub async fn wait(self) -> Result<JobSummary, Pdf2JpgError> {
        self.task
            .await
            .map_err(|e| Pdf2JpgError::Internal(format!("Conversion task panicked: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionConfig;
    use crate::error::RasterizerError;
    use crate::pipeline::render::PageRasterizer;
    use image::DynamicImage;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Blocks in `page_count` until the test releases (or drops) the gate.
    struct GatedRasterizer {
        gate: Mutex<std::sync::mpsc::Receiver<()>>,
    }

    impl PageRasterizer for GatedRasterizer {
        fn name(&self) -> &'static str {
            "gated"
        }

        fn page_count(&self, _pdf_path: &Path) -> Result<usize, RasterizerError> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(2)
        }

        fn render_page(
            &self,
            _pdf_path: &Path,
            _page_num: usize,
            _dpi: u32,
        ) -> Result<DynamicImage, RasterizerError> {
            Ok(DynamicImage::new_rgb8(2, 2))
        }
    }

    fn gated_runner() -> (JobRunner, std::sync::mpsc::Sender<()>) {
        let (tx, rx) = std::sync::mpsc::channel();
        let rasterizer = Arc::new(GatedRasterizer {
            gate: Mutex::new(rx),
        });
        let converter = BatchConverter::new(rasterizer, ConversionConfig::default());
        (JobRunner::new(converter), tx)
    }

    async fn drain(job: &mut JobHandle) -> Vec<ConversionEvent> {
        let mut events = Vec::new();
        while let Some(event) = job.next_event().await {
            let done = matches!(event, ConversionEvent::Finished(_));
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[tokio::test]
    async fn second_start_is_rejected_while_running() {
        let tmp = TempDir::new().unwrap();
        let pdf = tmp.path().join("a.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();
        let (runner, gate) = gated_runner();

        let mut job = runner.start(&pdf).expect("first start");
        assert!(runner.is_running());
        assert!(matches!(
            runner.start(&pdf),
            Err(Pdf2JpgError::AlreadyRunning)
        ));

        // Dropping the sender unblocks this and every later page_count call.
        drop(gate);
        let events = drain(&mut job).await;
        assert!(matches!(events.last(), Some(ConversionEvent::Finished(_))));
        let summary = job.wait().await.unwrap();
        assert_eq!(summary.pages_written(), 2);
        assert!(!runner.is_running());

        let job = runner.start(&pdf).expect("start after completion");
        let summary = job.wait().await.unwrap();
        assert_eq!(summary.documents.len(), 1);
    }

    #[tokio::test]
    async fn events_follow_callback_order() {
        let tmp = TempDir::new().unwrap();
        let pdf = tmp.path().join("a.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();
        let (runner, gate) = gated_runner();
        drop(gate);

        let mut job = runner.start(&pdf).unwrap();
        let events = drain(&mut job).await;

        let progress: Vec<(usize, usize)> = events
            .iter()
            .filter_map(|e| match e {
                ConversionEvent::Progress { current, total } => Some((*current, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![(1, 2), (2, 2)]);

        // status "converting page 1/2" comes right before Progress(1, 2)
        let idx = events
            .iter()
            .position(|e| matches!(e, ConversionEvent::Progress { current: 1, .. }))
            .unwrap();
        assert!(matches!(
            &events[idx - 1],
            ConversionEvent::Status(s) if s.ends_with("converting page 1/2")
        ));
    }

    #[test]
    fn start_outside_runtime_is_an_error() {
        let (runner, _gate) = gated_runner();
        let err = runner.start("whatever.pdf").unwrap_err();
        assert!(matches!(err, Pdf2JpgError::Internal(_)));
        assert!(!runner.is_running());
    }
}
