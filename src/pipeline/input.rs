//! Input resolution: turn the user-supplied path into an ordered job.
//!
//! A `.pdf` file (case-insensitive extension) becomes a one-document job; a
//! directory becomes every direct child file ending in `.pdf`, sorted by file
//! name. Nothing is created on disk here, so a rejected input never leaves
//! partial output behind.

use crate::error::Pdf2JpgError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The resolved, non-empty set of PDFs a job will convert.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Source PDFs in processing order.
    pub documents: Vec<PdfDocument>,
}

/// One source PDF and where its pages go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    /// Absolute path as listed; symlinks are not followed, so output stays
    /// next to the link under the link's own name.
    pub path: PathBuf,
    /// File name without the `.pdf` extension.
    pub base_name: String,
    /// `<dir-of-pdf>/<output_dir_name>/<base_name>/`.
    pub output_dir: PathBuf,
}

impl PdfDocument {
    /// Describe the PDF at `path`, placing its pages under `output_dir_name`
    /// next to it.
    pub fn new(path: PathBuf, output_dir_name: &str) -> Self {
        let path = std::path::absolute(&path).unwrap_or(path);
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let output_dir = parent.join(output_dir_name).join(&base_name);
        Self {
            path,
            base_name,
            output_dir,
        }
    }

    /// Output path for a 1-indexed page of a `total_pages` document.
    pub fn page_output_path(&self, page_num: usize, total_pages: usize) -> PathBuf {
        self.output_dir
            .join(page_file_name(&self.base_name, page_num, total_pages))
    }
}

/// Digits used for page numbers: 4 for documents of 1000+ pages, else 3.
pub fn page_number_width(total_pages: usize) -> usize {
    if total_pages >= 1000 {
        4
    } else {
        3
    }
}

/// `<base>_<page zero-padded>.jpg`.
pub fn page_file_name(base_name: &str, page_num: usize, total_pages: usize) -> String {
    let width = page_number_width(total_pages);
    format!("{base_name}_{page_num:0width$}.jpg")
}

/// `true` when the file name ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

impl ConversionJob {
    /// Resolve `input` into an ordered list of documents.
    ///
    /// # Errors
    /// * [`Pdf2JpgError::InvalidInput`] — not an existing `.pdf` file or directory
    /// * [`Pdf2JpgError::NoPdfFiles`]   — a directory without any `.pdf` file
    pub fn resolve(input: &Path, output_dir_name: &str) -> Result<Self, Pdf2JpgError> {
        let paths = if input.is_file() && has_pdf_extension(input) {
            vec![input.to_path_buf()]
        } else if input.is_dir() {
            let paths = list_pdfs(input)?;
            if paths.is_empty() {
                return Err(Pdf2JpgError::NoPdfFiles {
                    dir: input.to_path_buf(),
                });
            }
            paths
        } else {
            return Err(Pdf2JpgError::InvalidInput {
                path: input.to_path_buf(),
            });
        };

        let documents: Vec<PdfDocument> = paths
            .into_iter()
            .map(|p| PdfDocument::new(p, output_dir_name))
            .collect();
        debug!(
            "Resolved {} PDF(s) from {}",
            documents.len(),
            input.display()
        );

        Ok(Self { documents })
    }
}

/// Direct child files of `dir` with a `.pdf` extension, sorted by file name.
fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, Pdf2JpgError> {
    let entries = std::fs::read_dir(dir).map_err(|_| Pdf2JpgError::InvalidInput {
        path: dir.to_path_buf(),
    })?;

    let mut pdfs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && has_pdf_extension(p))
        .collect();
    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pdfs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, b"%PDF-1.4\n").unwrap();
        p
    }

    #[test]
    fn padding_width_switches_at_one_thousand() {
        assert_eq!(page_number_width(1), 3);
        assert_eq!(page_number_width(999), 3);
        assert_eq!(page_number_width(1000), 4);
        assert_eq!(page_number_width(2500), 4);
    }

    #[test]
    fn page_file_names_are_zero_padded() {
        assert_eq!(page_file_name("report", 1, 2), "report_001.jpg");
        assert_eq!(page_file_name("report", 42, 999), "report_042.jpg");
        assert_eq!(page_file_name("book", 7, 1200), "book_0007.jpg");
        assert_eq!(page_file_name("book", 1200, 1200), "book_1200.jpg");
    }

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(has_pdf_extension(Path::new("a.pdf")));
        assert!(has_pdf_extension(Path::new("a.PDF")));
        assert!(has_pdf_extension(Path::new("a.Pdf")));
        assert!(!has_pdf_extension(Path::new("a.pdf.txt")));
        assert!(!has_pdf_extension(Path::new("pdf")));
    }

    #[test]
    fn single_file_resolves_to_one_document() {
        let tmp = TempDir::new().unwrap();
        let pdf = touch(tmp.path(), "scan.PDF");
        let job = ConversionJob::resolve(&pdf, "jpg").unwrap();
        assert_eq!(job.documents.len(), 1);
        let doc = &job.documents[0];
        assert_eq!(doc.base_name, "scan");
        assert!(doc.output_dir.ends_with("jpg/scan"));
    }

    #[test]
    fn directory_is_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "b.pdf");
        touch(tmp.path(), "a.pdf");
        touch(tmp.path(), "C.Pdf");
        touch(tmp.path(), "notes.txt");
        std::fs::create_dir(tmp.path().join("nested.pdf")).unwrap();

        let job = ConversionJob::resolve(tmp.path(), "jpg").unwrap();
        let names: Vec<_> = job.documents.iter().map(|d| d.base_name.as_str()).collect();
        // Byte-wise file name order: uppercase sorts before lowercase.
        assert_eq!(names, vec!["C", "a", "b"]);
    }

    #[test]
    fn empty_directory_is_rejected() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "readme.md");
        let err = ConversionJob::resolve(tmp.path(), "jpg").unwrap_err();
        assert!(matches!(err, Pdf2JpgError::NoPdfFiles { .. }));
    }

    #[test]
    fn missing_or_non_pdf_path_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let txt = touch(tmp.path(), "notes.txt");
        assert!(matches!(
            ConversionJob::resolve(&txt, "jpg").unwrap_err(),
            Pdf2JpgError::InvalidInput { .. }
        ));
        assert!(matches!(
            ConversionJob::resolve(&tmp.path().join("missing.pdf"), "jpg").unwrap_err(),
            Pdf2JpgError::InvalidInput { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_pdf_keeps_its_own_name_and_folder() {
        let tmp = TempDir::new().unwrap();
        let inbox = tmp.path().join("inbox");
        let elsewhere = tmp.path().join("elsewhere");
        std::fs::create_dir_all(&inbox).unwrap();
        std::fs::create_dir_all(&elsewhere).unwrap();
        let target = touch(&elsewhere, "original_name.pdf");
        std::os::unix::fs::symlink(&target, inbox.join("report.pdf")).unwrap();

        let job = ConversionJob::resolve(&inbox, "jpg").unwrap();
        let doc = &job.documents[0];
        assert_eq!(doc.base_name, "report");
        assert_eq!(doc.output_dir, inbox.join("jpg").join("report"));
        assert_eq!(doc.path, inbox.join("report.pdf"));
    }

    #[test]
    fn relative_path_is_made_absolute() {
        let doc = PdfDocument::new(PathBuf::from("scans/deck.pdf"), "jpg");
        assert!(doc.path.is_absolute());
        assert!(doc.output_dir.is_absolute());
        assert!(doc.output_dir.ends_with("scans/jpg/deck"));
    }

    #[test]
    fn custom_output_dir_name() {
        let tmp = TempDir::new().unwrap();
        let pdf = touch(tmp.path(), "deck.pdf");
        let doc = PdfDocument::new(pdf, "images");
        assert!(doc.output_dir.ends_with("images/deck"));
        assert!(doc
            .page_output_path(3, 10)
            .ends_with("images/deck/deck_003.jpg"));
    }
}
