//! Text extraction: the seam between pdfmd and the PDF parsing libraries.
//!
//! All structural PDF work (cross-reference parsing, font decoding) happens
//! inside the backend libraries; this module only dispatches to them and
//! normalises their results and errors.
//!
//! ## Backend strategy
//!
//! lopdf is the primary backend: it extracts page by page, which is what
//! enables page selection, per-page error reporting, and per-page progress
//! events. pdf-extract is the fallback for documents lopdf cannot load;
//! it tolerates more structural damage but only yields the document as a
//! single block of text, so a fallback run reports exactly one page.
//!
//! pdf-extract is known to panic on some malformed content streams, so its
//! call is wrapped in `catch_unwind` with a quiet panic hook; a panic
//! becomes a regular error instead of taking the process down.

use crate::config::{ConversionConfig, ExtractBackend, PageSelection};
use crate::error::{PageError, PdfmdError};
use crate::output::DocumentMetadata;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

/// One extracted page: the backend's raw text, or the error that replaced it.
#[derive(Debug)]
pub struct ExtractedPage {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Raw extracted text; empty when `error` is set.
    pub text: String,
    pub error: Option<PageError>,
    /// Time the backend spent on this page.
    pub duration_ms: u64,
}

/// The raw result of running a backend over the selected pages.
#[derive(Debug)]
pub struct Extraction {
    pub metadata: DocumentMetadata,
    /// Pages in the source document (1 when the fallback backend ran).
    pub total_pages: usize,
    pub pages: Vec<ExtractedPage>,
}

/// Extract text from the selected pages of an in-memory PDF.
///
/// `path` is only used in error messages; callers converting from bytes
/// pass a synthetic path.
pub fn extract(
    bytes: &[u8],
    path: &Path,
    config: &ConversionConfig,
) -> Result<Extraction, PdfmdError> {
    match config.backend {
        ExtractBackend::Lopdf => extract_lopdf(bytes, path, &config.pages),
        ExtractBackend::PdfExtract => {
            if !matches!(config.pages, PageSelection::All) {
                return Err(PdfmdError::InvalidConfig(
                    "page selection requires the lopdf backend (pdf-extract only yields whole documents)".into(),
                ));
            }
            extract_fallback(bytes, path)
        }
        ExtractBackend::Auto => match extract_lopdf(bytes, path, &config.pages) {
            Ok(extraction) => Ok(extraction),
            // Only fall back on load failures. Page selection cannot be
            // honoured by the whole-document backend, so a selecting
            // config keeps the precise lopdf error.
            Err(e @ PdfmdError::CorruptPdf { .. })
                if matches!(config.pages, PageSelection::All) =>
            {
                warn!("lopdf failed ({e}), retrying with pdf-extract");
                extract_fallback(bytes, path).map_err(|_| e)
            }
            Err(e) => Err(e),
        },
    }
}

/// Read metadata and page count without extracting any text.
pub fn extract_metadata(bytes: &[u8], path: &Path) -> Result<DocumentMetadata, PdfmdError> {
    let doc = load_document(bytes, path)?;
    Ok(read_metadata(&doc))
}

// ── lopdf backend ────────────────────────────────────────────────────────

fn load_document(bytes: &[u8], path: &Path) -> Result<Document, PdfmdError> {
    let doc = Document::load_mem(bytes).map_err(|e| PdfmdError::CorruptPdf {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    if doc.is_encrypted() {
        return Err(PdfmdError::EncryptedPdf {
            path: path.to_path_buf(),
        });
    }

    Ok(doc)
}

fn extract_lopdf(
    bytes: &[u8],
    path: &Path,
    selection: &PageSelection,
) -> Result<Extraction, PdfmdError> {
    let doc = load_document(bytes, path)?;
    let total_pages = doc.get_pages().len();
    debug!("lopdf opened {}: {} pages", path.display(), total_pages);

    let selected = selection.to_page_numbers(total_pages);
    if selected.is_empty() && total_pages > 0 {
        // The selection named only pages past the end of the document.
        let requested = match selection {
            PageSelection::Single(p) => *p,
            PageSelection::Range(s, _) => *s,
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(0),
            PageSelection::All => 0,
        };
        return Err(PdfmdError::PageOutOfRange {
            page: requested,
            total: total_pages,
        });
    }

    let pages = selected
        .into_iter()
        .map(|page_num| {
            let start = std::time::Instant::now();
            match doc.extract_text(&[page_num as u32]) {
                Ok(text) => ExtractedPage {
                    page_num,
                    text,
                    error: None,
                    duration_ms: start.elapsed().as_millis() as u64,
                },
                Err(e) => {
                    warn!("Page {page_num}: extraction failed: {e}");
                    ExtractedPage {
                        page_num,
                        text: String::new(),
                        error: Some(PageError::ExtractFailed {
                            page: page_num,
                            detail: e.to_string(),
                        }),
                        duration_ms: start.elapsed().as_millis() as u64,
                    }
                }
            }
        })
        .collect();

    Ok(Extraction {
        metadata: read_metadata(&doc),
        total_pages,
        pages,
    })
}

// ── pdf-extract fallback ─────────────────────────────────────────────────

fn extract_fallback(bytes: &[u8], path: &Path) -> Result<Extraction, PdfmdError> {
    debug!("pdf-extract fallback on {}", path.display());
    let start = std::time::Instant::now();

    // pdf-extract can panic on malformed input. Swap in a silent panic hook
    // for the duration of the call so the user sees our error, not a raw
    // panic backtrace, then restore the previous hook.
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));
    std::panic::set_hook(prev_hook);

    let text = match result {
        Ok(Ok(t)) => t,
        Ok(Err(e)) => {
            return Err(PdfmdError::CorruptPdf {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })
        }
        Err(_) => {
            warn!("pdf-extract panicked on {}", path.display());
            return Err(PdfmdError::CorruptPdf {
                path: path.to_path_buf(),
                detail: "extraction backend panicked".into(),
            });
        }
    };

    // The whole document arrives as one block; report it as a single page.
    Ok(Extraction {
        metadata: DocumentMetadata {
            page_count: 1,
            ..Default::default()
        },
        total_pages: 1,
        pages: vec![ExtractedPage {
            page_num: 1,
            text,
            error: None,
            duration_ms: start.elapsed().as_millis() as u64,
        }],
    })
}

// ── Metadata ─────────────────────────────────────────────────────────────

/// Read the trailer Info dictionary into [`DocumentMetadata`].
///
/// Missing or non-textual entries become `None`; a PDF with no Info
/// dictionary at all yields a metadata struct with only `page_count` and
/// `pdf_version` populated.
fn read_metadata(doc: &Document) -> DocumentMetadata {
    let mut meta = DocumentMetadata {
        page_count: doc.get_pages().len(),
        pdf_version: doc.version.clone(),
        ..Default::default()
    };

    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|o| o.as_reference().ok())
        .and_then(|id| doc.get_object(id).ok())
        .and_then(|o| o.as_dict().ok());

    if let Some(dict) = info {
        let get = |key: &[u8]| -> Option<String> {
            dict.get(key)
                .ok()
                .and_then(|o| o.as_str().ok())
                .and_then(decode_pdf_string)
        };
        meta.title = get(b"Title");
        meta.author = get(b"Author");
        meta.subject = get(b"Subject");
        meta.keywords = get(b"Keywords");
        meta.creator = get(b"Creator");
        meta.producer = get(b"Producer");
    }

    meta
}

/// Decode a PDF text string: UTF-16BE with BOM, otherwise PDFDocEncoding
/// treated as UTF-8 (a close-enough superset for the ASCII range that
/// dominates real Info dictionaries).
fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        let s = String::from_utf16_lossy(&units);
        return if s.is_empty() { None } else { Some(s) };
    }
    match std::str::from_utf8(bytes) {
        Ok(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    }
}
