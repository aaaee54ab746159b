//! Output types: the assembled document, per-page results, and run statistics.
//!
//! Everything here derives `Serialize` so the CLI's `--json` mode can emit
//! the whole [`ConversionOutput`] structurally instead of flattening it to
//! Markdown.

use crate::error::PageError;
use serde::{Deserialize, Serialize};

/// The complete result of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The assembled Markdown document (front-matter, pages, separators).
    pub markdown: String,
    /// Per-page results, ordered by page number. Failed pages carry an error
    /// and an empty markdown string.
    pub pages: Vec<PageResult>,
    /// Document metadata read from the PDF Info dictionary.
    pub metadata: DocumentMetadata,
    /// Counters and timings for the run.
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Treat any page failure as an error.
    ///
    /// [`crate::convert`] returns `Ok` on partial success; callers that
    /// want all-or-nothing semantics call this instead of inspecting
    /// `stats.failed_pages` themselves.
    pub fn into_strict(self) -> Result<Self, crate::error::PdfmdError> {
        if self.stats.failed_pages > 0 {
            let first_error = self
                .pages
                .iter()
                .find_map(|p| p.error.as_ref())
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown page error".to_string());
            return Err(crate::error::PdfmdError::SomePagesFailed {
                failed: self.stats.failed_pages,
                total: self.stats.processed_pages + self.stats.failed_pages,
                first_error,
            });
        }
        Ok(self)
    }
}

/// The outcome of converting one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Markdown for this page; empty when `error` is set.
    pub markdown: String,
    /// Characters of raw text the backend extracted, before structuring.
    pub extracted_chars: usize,
    /// Wall-clock time spent on this page.
    pub duration_ms: u64,
    /// Set when extraction failed for this page.
    pub error: Option<PageError>,
}

/// Document metadata from the PDF Info dictionary.
///
/// All string fields are `None` when the dictionary omits them or holds
/// values that are not decodable text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    /// Total pages in the document (not the selected subset).
    pub page_count: usize,
    /// PDF version from the file header, e.g. "1.7".
    pub pdf_version: String,
}

/// Counters and timings for a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Selected pages that extracted successfully.
    pub processed_pages: usize,
    /// Selected pages that failed extraction.
    pub failed_pages: usize,
    /// Raw characters extracted across all successful pages.
    pub extracted_chars: u64,
    /// Bytes of assembled Markdown.
    pub markdown_bytes: u64,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
    /// Time spent inside the extraction backend.
    pub extract_duration_ms: u64,
}
