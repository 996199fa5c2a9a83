//! End-to-end tests against the real pdfium library.
//!
//! Every test writes its own small PDF into a temp dir, so only libpdfium is
//! needed. They are gated behind the `E2E_ENABLED` environment variable so
//! they do not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/path/to/libpdfium cargo test --test e2e -- --nocapture

use pdf2jpg::pipeline::render::PdfiumRasterizer;
use pdf2jpg::{
    BatchConverter, ConsoleReporter, ConversionConfig, ConversionEvent, JobRunner, PageRasterizer,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    }};
}

fn pdfium() -> Arc<PdfiumRasterizer> {
    Arc::new(PdfiumRasterizer::bind(&ConversionConfig::default()).expect("pdfium should bind"))
}

/// Bytes of a valid PDF with `pages` blank A4 pages (595 x 842 pt).
fn blank_pdf(pages: usize) -> Vec<u8> {
    let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", i + 3)).collect();
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {pages} >>",
            kids.join(" ")
        ),
    ];
    for _ in 0..pages {
        objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] >>".to_string());
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }
    let xref = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

/// Write a `pages`-page PDF called `name` into a fresh temp dir.
fn staged(name: &str, pages: usize) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let pdf = tmp.path().join(name);
    std::fs::write(&pdf, blank_pdf(pages)).unwrap();
    (tmp, pdf)
}

fn jpeg_size(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).expect("readable JPEG")
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn test_pdfium_page_count() {
    e2e_skip_unless_enabled!();
    let (_tmp, pdf) = staged("sample.pdf", 3);
    assert_eq!(pdfium().page_count(&pdf).expect("page count"), 3);
}

#[test]
fn test_pdfium_render_is_300_dpi() {
    e2e_skip_unless_enabled!();
    let (_tmp, pdf) = staged("sample.pdf", 1);
    let img = pdfium().render_page(&pdf, 1, 300).expect("render page 1");
    // A4 at 300 DPI: 595 pt → 2479 px, 842 pt → 3508 px (±1 for rounding).
    assert!(img.width().abs_diff(2479) <= 1, "width {}", img.width());
    assert!(img.height().abs_diff(3508) <= 1, "height {}", img.height());
}

#[test]
fn test_pdfium_out_of_range_page_fails() {
    e2e_skip_unless_enabled!();
    let (_tmp, pdf) = staged("sample.pdf", 1);
    assert!(pdfium().render_page(&pdf, 2, 300).is_err());
}

#[test]
fn test_pdfium_rejects_garbage() {
    e2e_skip_unless_enabled!();
    let tmp = TempDir::new().unwrap();
    let fake = tmp.path().join("fake.pdf");
    std::fs::write(&fake, b"this is not a pdf").unwrap();
    assert!(pdfium().page_count(&fake).is_err());
}

#[test]
fn test_convert_sample_writes_every_page() {
    e2e_skip_unless_enabled!();
    let (tmp, pdf) = staged("sample.pdf", 2);

    let converter = BatchConverter::new(pdfium(), ConversionConfig::default());
    let summary = converter.convert(&pdf, &ConsoleReporter::stdout());

    assert_eq!(summary.pages_written(), 2);
    assert_eq!(summary.pages_failed(), 0);
    let first = tmp.path().join("jpg/sample/sample_001.jpg");
    assert!(first.is_file());
    assert!(tmp.path().join("jpg/sample/sample_002.jpg").is_file());
    let (w, h) = jpeg_size(&first);
    assert!(w.abs_diff(2479) <= 1 && h.abs_diff(3508) <= 1, "{w}x{h}");
}

#[tokio::test]
async fn test_runner_streams_events_for_real_pdf() {
    e2e_skip_unless_enabled!();
    let (_tmp, pdf) = staged("sample.pdf", 2);

    let runner = JobRunner::new(BatchConverter::new(pdfium(), ConversionConfig::default()));
    let mut job = runner.start(&pdf).unwrap();

    let mut statuses = 0;
    while let Some(event) = job.next_event().await {
        match event {
            ConversionEvent::Status(_) => statuses += 1,
            ConversionEvent::Progress { current, total } => assert!(current <= total),
            ConversionEvent::Finished(_) => break,
        }
    }
    let summary = job.wait().await.unwrap();
    assert_eq!(summary.pages_written(), 2);
    assert_eq!(statuses, 2 + 2 * summary.pages_written());
}
