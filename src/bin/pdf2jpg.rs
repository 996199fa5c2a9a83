//! CLI binary for pdf2jpg.
//!
//! A terminal front-end over [`JobRunner`]: takes a folder (or single PDF)
//! from the command line or prompts for one, runs the conversion on a
//! background worker, and renders the event stream as a log plus a progress
//! bar for the current document.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2jpg::{
    rasterizer_from_config, BatchConverter, ConversionConfig, ConversionEvent, JobRunner,
    JobSummary, RasterizerBackend,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every PDF in a folder
  pdf2jpg ~/scans

  # Convert a single file at 150 DPI
  pdf2jpg --dpi 150 report.pdf

  # Prompt for folders interactively
  pdf2jpg

  # Use poppler instead of pdfium
  pdf2jpg --backend poppler --poppler-path /opt/poppler/bin ~/scans

OUTPUT LAYOUT:
  ~/scans/report.pdf  →  ~/scans/jpg/report/report_001.jpg, report_002.jpg, …
  Documents with 1000+ pages use four-digit page numbers.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH        Path to libpdfium (file or directory)
  PDF2JPG_BACKEND        pdfium or poppler
  PDF2JPG_POPPLER_PATH   Directory containing pdftoppm and pdfinfo
  PDF2JPG_DPI            Rendering resolution
  RUST_LOG               Override the log filter
"#;

/// Convert the pages of PDF files into numbered JPEG images.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2jpg",
    version,
    about = "Convert the pages of PDF files into numbered JPEG images",
    long_about = "Convert every page of a PDF file, or of every PDF directly inside a folder, \
into JPEG images written to <folder>/jpg/<name>/<name>_<page>.jpg. Without an INPUT argument \
the tool prompts for folders interactively.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file or folder of PDFs. Prompts interactively when omitted.
    input: Option<PathBuf>,

    /// Rendering DPI (72–600).
    #[arg(long, env = "PDF2JPG_DPI", default_value_t = pdf2jpg::config::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Rasterizer backend.
    #[arg(long, env = "PDF2JPG_BACKEND", value_enum, default_value = "pdfium")]
    backend: BackendArg,

    /// Path to the pdfium shared library, or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Directory containing the poppler tools (pdftoppm, pdfinfo).
    #[arg(long, env = "PDF2JPG_POPPLER_PATH")]
    poppler_path: Option<PathBuf>,

    /// Name of the directory created next to each PDF.
    #[arg(long, env = "PDF2JPG_OUTPUT_DIR", default_value = pdf2jpg::config::DEFAULT_OUTPUT_DIR_NAME)]
    output_dir_name: String,

    /// Print the job summary as JSON when a job finishes.
    #[arg(long, env = "PDF2JPG_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2JPG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2JPG_VERBOSE")]
    verbose: bool,

    /// Suppress the status log; only `[ERROR]` lines and the final summary are printed.
    #[arg(short, long, env = "PDF2JPG_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum BackendArg {
    Pdfium,
    Poppler,
}

impl From<BackendArg> for RasterizerBackend {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Pdfium => RasterizerBackend::Pdfium,
            BackendArg::Poppler => RasterizerBackend::Poppler,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The status log already narrates the job; library INFO logs would
    // duplicate it, so only warnings surface unless -v is given.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build converter ──────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let rasterizer =
        rasterizer_from_config(&config).context("Failed to initialise the PDF rasterizer")?;
    let runner = JobRunner::new(BatchConverter::new(rasterizer, config));

    // ── Run ──────────────────────────────────────────────────────────────
    match cli.input.clone() {
        Some(input) => run_job(&runner, &input, &cli).await,
        None => interactive(&runner, &cli).await,
    }
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .dpi(cli.dpi)
        .backend(cli.backend.clone().into())
        .output_dir_name(&cli.output_dir_name);

    if let Some(ref p) = cli.pdfium_lib {
        builder = builder.pdfium_library(p);
    }
    if let Some(ref p) = cli.poppler_path {
        builder = builder.poppler_path(p);
    }

    builder.build().context("Invalid configuration")
}

/// Prompt for folders until an empty line or EOF.
async fn interactive(runner: &JobRunner, cli: &Cli) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    eprintln!("Select a folder of PDFs to convert to JPG.");
    loop {
        stdout
            .write_all(b"Folder (empty to quit): ")
            .await
            .context("Failed to write prompt")?;
        stdout.flush().await.ok();

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        let folder = line.trim();
        if folder.is_empty() {
            break;
        }

        let path = PathBuf::from(folder);
        if !path.exists() {
            eprintln!("{} The selected folder does not exist.", red("✗"));
            continue;
        }
        eprintln!("Selected folder: {}", path.display());

        run_job(runner, &path, cli).await?;
    }

    Ok(())
}

/// Run one job and render its events until it finishes.
/// `true` for job, document and page failure lines.
fn is_error_status(line: &str) -> bool {
    line.trim_start().starts_with("[ERROR]")
}

async fn run_job(runner: &JobRunner, input: &Path, cli: &Cli) -> Result<()> {
    if !cli.quiet {
        eprintln!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Starting PDF conversion in '{}'…", input.display()))
        );
    }

    let mut job = runner.start(input).context("Cannot start conversion")?;
    let bar = if cli.quiet || cli.no_progress {
        None
    } else {
        Some(new_progress_bar())
    };

    while let Some(event) = job.next_event().await {
        match event {
            ConversionEvent::Status(line) => {
                if cli.quiet {
                    if is_error_status(&line) {
                        eprintln!("{line}");
                    }
                    continue;
                }
                match bar {
                    Some(ref bar) => bar.println(line),
                    // Keep stdout clean for the JSON summary.
                    None if cli.json => eprintln!("{line}"),
                    None => println!("{line}"),
                }
            }
            ConversionEvent::Progress { current, total } => {
                if let Some(ref bar) = bar {
                    bar.set_position((current * 100 / total.max(1)) as u64);
                    bar.set_message(format!("page {current}/{total}"));
                }
            }
            ConversionEvent::Finished(_) => break,
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let summary = job.wait().await.context("Conversion failed")?;
    print_summary(&summary, cli)
}

fn new_progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}%  {msg}  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Converting");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn print_summary(summary: &JobSummary, cli: &Cli) -> Result<()> {
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).context("Failed to serialise summary")?
        );
        return Ok(());
    }
    if summary.rejected.is_some() {
        // The rejection was already printed as a status line.
        return Ok(());
    }

    let failed = summary.pages_failed();
    let skipped = summary.documents_skipped();
    let mark = if failed == 0 && skipped == 0 {
        green("✔")
    } else {
        cyan("⚠")
    };
    eprintln!(
        "{mark} All conversions complete: {} document(s), {} pages written",
        summary.documents.len(),
        bold(&summary.pages_written().to_string()),
    );
    if failed > 0 {
        eprintln!("  {} pages failed", red(&failed.to_string()));
    }
    if skipped > 0 {
        eprintln!("  {} document(s) skipped", red(&skipped.to_string()));
    }
    Ok(())
}
