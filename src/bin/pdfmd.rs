//! CLI binary for pdfmd.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, runs the conversion, and writes the output file.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfmd::{
    convert, convert_to_file, inspect, ConversionConfig, ConversionProgressCallback,
    ExtractBackend, PageSelection, PageSeparator, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar on stderr while
/// pages are extracted and structured.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set by
    /// `on_conversion_start` (called once the document is open).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_conversion_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Opening");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, _page_num: usize, _total: usize, _markdown_len: usize) {
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", truncate_on_char_boundary(error, 79))
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, _total_pages: usize, _success_count: usize) {
        self.bar.finish_and_clear();
    }
}

/// Cut `s` to at most `max` bytes, stepping back to a `char` boundary so
/// multi-byte text never panics the slice.
fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion
  pdfmd document.pdf output.md

  # Specific pages, horizontal-rule separators
  pdfmd --pages 1-5 --separator hr paper.pdf paper.md

  # YAML front-matter with document metadata
  pdfmd --metadata report.pdf report.md

  # Verbatim backend output, no structuring heuristics
  pdfmd --no-structure scan.pdf scan.md

  # Structured JSON (pages, stats, metadata) instead of Markdown
  pdfmd --json document.pdf document.json

  # Print PDF metadata only, no conversion
  pdfmd --inspect document.pdf output.md

EXIT CODES:
  0  success
  1  wrong arguments, unreadable input, or conversion failure
"#;

/// Convert PDF files to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "pdfmd",
    version,
    about = "Convert PDF files to Markdown",
    long_about = "Convert a PDF document to clean Markdown. Text extraction is delegated to \
the lopdf library (falling back to pdf-extract for damaged files); pdfmd adds page \
selection, heading/paragraph structuring, and whitespace cleanup on top.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file.
    input: PathBuf,

    /// Output Markdown file (overwritten if present).
    output: PathBuf,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, default_value = "all")]
    pages: String,

    /// Page separator: none, hr, comment, or custom string.
    #[arg(long, default_value = "none")]
    separator: String,

    /// Extraction backend: auto, lopdf, pdf-extract.
    #[arg(long, value_enum, default_value = "auto")]
    backend: BackendArg,

    /// Prepend YAML front-matter with document metadata.
    #[arg(long)]
    metadata: bool,

    /// Disable Markdown structuring heuristics (verbatim extracted text).
    #[arg(long)]
    no_structure: bool,

    /// Write structured JSON (pages, stats, metadata) instead of Markdown.
    #[arg(long)]
    json: bool,

    /// Print PDF metadata only; the output path is ignored.
    #[arg(long)]
    inspect: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Auto,
    Lopdf,
    PdfExtract,
}

impl From<BackendArg> for ExtractBackend {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Auto => ExtractBackend::Auto,
            BackendArg::Lopdf => ExtractBackend::Lopdf,
            BackendArg::PdfExtract => ExtractBackend::PdfExtract,
        }
    }
}

fn main() -> ExitCode {
    // clap exits with code 2 on usage errors; the published contract is
    // exit 1 with the usage message on stderr. --help and --version keep
    // exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e)
            if matches!(
                e.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", red("error:"), e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect {
        let meta = inspect(&cli.input).context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let stats = if cli.json {
        let output = convert(&cli.input, &config).context("Conversion failed")?;
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        write_atomic(&cli.output, &json)?;
        output.stats
    } else {
        convert_to_file(&cli.input, &cli.output, &config).context("Conversion failed")?
    };

    // Confirmation line: the documented success contract.
    if !cli.quiet {
        println!(
            "Converted {} -> {}",
            cli.input.display(),
            cli.output.display()
        );
    }

    if !cli.quiet && !show_progress {
        eprintln!(
            "{}  {}/{} pages  {}ms  →  {}",
            if stats.failed_pages == 0 {
                green("✔")
            } else {
                red("⚠")
            },
            stats.processed_pages,
            stats.processed_pages + stats.failed_pages,
            stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
    } else if !cli.quiet && stats.failed_pages > 0 {
        eprintln!(
            "{}  {} of {} pages failed  {}",
            red("⚠"),
            stats.failed_pages,
            stats.processed_pages + stats.failed_pages,
            dim("(run with -v for details)"),
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let pages = parse_pages(&cli.pages)?;
    let separator = parse_separator(&cli.separator);

    let mut builder = ConversionConfig::builder()
        .backend(cli.backend.into())
        .pages(pages)
        .page_separator(separator)
        .include_metadata(cli.metadata)
        .structure(!cli.no_structure);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Write `content` to `path` via a temp file + rename, creating parents.
fn write_atomic(path: &PathBuf, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to rename into {}", path.display()))?;
    Ok(())
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start.trim().parse().context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!("Invalid page range '{}-{}': start must be <= end", start, end);
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        for &p in &pages {
            if p < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
            }
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

/// Parse `--separator` string into `PageSeparator`.
fn parse_separator(s: &str) -> PageSeparator {
    match s.to_lowercase().as_str() {
        "none" => PageSeparator::None,
        "hr" | "---" => PageSeparator::HorizontalRule,
        "comment" => PageSeparator::Comment,
        custom => PageSeparator::Custom(custom.to_string()),
    }
}
