//! Conversion entry points.
//!
//! [`convert`] is the primary API: it runs the whole pipeline, collects
//! every [`PageResult`] into memory, and assembles the final Markdown
//! document before returning. [`convert_to_file`] adds an atomic file
//! write on top; [`convert_from_bytes`] skips the filesystem on the input
//! side; [`inspect`] reads metadata without converting anything.
//!
//! The whole pipeline is synchronous and single-threaded: extraction is a
//! local, CPU-cheap library call, so there is nothing to overlap.

use crate::config::ConversionConfig;
use crate::error::PdfmdError;
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata, PageResult};
use crate::pipeline::{extract, input, markdown, postprocess};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file to Markdown.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(ConversionOutput)` on success, even if some pages failed
/// (check `output.stats.failed_pages`, or use
/// [`ConversionOutput::into_strict`]).
///
/// # Errors
/// Returns `Err(PdfmdError)` only for fatal errors:
/// - File not found / permission denied / not a PDF / too large
/// - Document unparseable by every backend, or encrypted
/// - All selected pages failed to extract
pub fn convert(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, PdfmdError> {
    let total_start = Instant::now();
    let path = input_path.as_ref();
    info!("Starting conversion: {}", path.display());

    let bytes = input::read_input(path, config.max_file_size)?;
    convert_validated(&bytes, path, config, total_start)
}

/// Convert PDF bytes in memory to Markdown.
///
/// This is the recommended API when PDF data comes from a database,
/// network stream, or in-memory buffer rather than a file on disk. No
/// temporary file is created; the backend parses the buffer directly.
pub fn convert_from_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, PdfmdError> {
    let total_start = Instant::now();
    let synthetic = Path::new("<memory>");
    input::validate_magic(bytes, synthetic)?;
    convert_validated(bytes, synthetic, config, total_start)
}

/// Convert a PDF and write the Markdown directly to a file.
///
/// Uses an atomic write (temp file + rename) so a failed conversion never
/// leaves a partial or truncated output file behind. Parent directories
/// are created as needed; an existing output file is overwritten.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, PdfmdError> {
    let output = convert(input_path, config)?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PdfmdError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let tmp_path = path.with_extension("md.tmp");
    fs::write(&tmp_path, &output.markdown).map_err(|e| PdfmdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::rename(&tmp_path, path).map_err(|e| PdfmdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(output.stats)
}

/// Extract PDF metadata without converting content.
pub fn inspect(input_path: impl AsRef<Path>) -> Result<DocumentMetadata, PdfmdError> {
    let path = input_path.as_ref();
    let bytes = input::read_input(path, ConversionConfig::default().max_file_size)?;
    extract::extract_metadata(&bytes, path)
}

// ── Internal pipeline ────────────────────────────────────────────────────

/// Run extraction, structuring, and assembly over already-validated bytes.
fn convert_validated(
    bytes: &[u8],
    path: &Path,
    config: &ConversionConfig,
    total_start: Instant,
) -> Result<ConversionOutput, PdfmdError> {
    // ── Step 1: Extract text via the backend library ─────────────────────
    let extract_start = Instant::now();
    let extraction = extract::extract(bytes, path, config)?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    info!(
        "Extracted {} of {} pages in {}ms",
        extraction.pages.len(),
        extraction.total_pages,
        extract_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(extraction.pages.len());
    }

    // ── Step 2: Structure each page as Markdown ──────────────────────────
    let selected = extraction.pages.len();
    let mut pages: Vec<PageResult> = Vec::with_capacity(selected);
    for page in extraction.pages {
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page.page_num, selected);
        }
        let page_start = Instant::now();

        let result = match page.error {
            None => {
                let structured = if config.structure {
                    markdown::structure_page(&page.text)
                } else {
                    page.text.clone()
                };
                let cleaned = postprocess::clean_markdown(&structured);
                debug!(
                    "Page {}: {} chars extracted, {} bytes markdown",
                    page.page_num,
                    page.text.chars().count(),
                    cleaned.len()
                );
                PageResult {
                    page_num: page.page_num,
                    extracted_chars: page.text.chars().count(),
                    duration_ms: page.duration_ms + page_start.elapsed().as_millis() as u64,
                    markdown: cleaned,
                    error: None,
                }
            }
            Some(err) => PageResult {
                page_num: page.page_num,
                markdown: String::new(),
                extracted_chars: 0,
                duration_ms: page.duration_ms,
                error: Some(err),
            },
        };

        if let Some(ref cb) = config.progress_callback {
            match &result.error {
                None => cb.on_page_complete(result.page_num, selected, result.markdown.len()),
                Some(e) => cb.on_page_error(result.page_num, selected, &e.to_string()),
            }
        }
        pages.push(result);
    }

    // Extraction already walks pages in order, but the invariant is ours
    // to hold regardless of backend.
    pages.sort_by_key(|p| p.page_num);

    // ── Step 3: Check for total failure ──────────────────────────────────
    let processed = pages.iter().filter(|p| p.error.is_none()).count();
    let failed = pages.len() - processed;

    if processed == 0 && !pages.is_empty() {
        let first_error = pages
            .iter()
            .find_map(|p| p.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(PdfmdError::AllPagesFailed {
            total: pages.len(),
            first_error,
        });
    }

    // ── Step 4: Assemble final document ──────────────────────────────────
    let markdown = assemble_document(&pages, config, &extraction.metadata);

    // ── Step 5: Compute stats ────────────────────────────────────────────
    let stats = ConversionStats {
        total_pages: extraction.total_pages,
        processed_pages: processed,
        failed_pages: failed,
        extracted_chars: pages.iter().map(|p| p.extracted_chars as u64).sum(),
        markdown_bytes: markdown.len() as u64,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        extract_duration_ms,
    };

    info!(
        "Conversion complete: {}/{} pages, {}ms total",
        processed, selected, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(selected, processed);
    }

    Ok(ConversionOutput {
        markdown,
        pages,
        metadata: extraction.metadata,
        stats,
    })
}

/// Assemble the final markdown document from page results.
///
/// Successful pages are joined with the configured separator; failed pages
/// are simply absent. The document always ends with exactly one newline.
fn assemble_document(
    pages: &[PageResult],
    config: &ConversionConfig,
    metadata: &DocumentMetadata,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    // Optional YAML front-matter
    if config.include_metadata {
        parts.push(format_yaml_front_matter(metadata));
    }

    let successful: Vec<&PageResult> = pages.iter().filter(|p| p.error.is_none()).collect();
    for (i, page) in successful.iter().enumerate() {
        if i > 0 {
            parts.push(config.page_separator.render(page.page_num));
        }
        parts.push(page.markdown.trim_end().to_string());
    }

    postprocess::clean_markdown(&parts.join(""))
}

/// Format document metadata as YAML front matter.
fn format_yaml_front_matter(meta: &DocumentMetadata) -> String {
    let mut yaml = String::from("---\n");

    if let Some(ref t) = meta.title {
        yaml.push_str(&format!("title: \"{}\"\n", t));
    }
    if let Some(ref a) = meta.author {
        yaml.push_str(&format!("author: \"{}\"\n", a));
    }
    if let Some(ref s) = meta.subject {
        yaml.push_str(&format!("subject: \"{}\"\n", s));
    }
    if let Some(ref k) = meta.keywords {
        yaml.push_str(&format!("keywords: \"{}\"\n", k));
    }
    if let Some(ref c) = meta.creator {
        yaml.push_str(&format!("creator: \"{}\"\n", c));
    }
    if let Some(ref p) = meta.producer {
        yaml.push_str(&format!("producer: \"{}\"\n", p));
    }
    yaml.push_str(&format!("pages: {}\n", meta.page_count));
    if !meta.pdf_version.is_empty() {
        yaml.push_str(&format!("pdf_version: \"{}\"\n", meta.pdf_version));
    }

    yaml.push_str("---\n\n");
    yaml
}
