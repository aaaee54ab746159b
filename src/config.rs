//! Configuration types for PDF-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Callers set only the knobs they care
//! about; everything else keeps a documented default.

use crate::error::PdfmdError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a PDF-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfmd::{ConversionConfig, PageSelection};
///
/// let config = ConversionConfig::builder()
///     .pages(PageSelection::Range(1, 5))
///     .include_metadata(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Which extraction backend to use. Default: [`ExtractBackend::Auto`].
    pub backend: ExtractBackend,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// Page separator in assembled output. Default: None.
    pub page_separator: PageSeparator,

    /// Include YAML front-matter with document metadata. Default: false.
    pub include_metadata: bool,

    /// Apply Markdown structuring heuristics to the extracted text. Default: true.
    ///
    /// When false the extracted text passes through verbatim (modulo the
    /// whitespace-normalisation rules in the postprocess stage), which is
    /// the right mode when downstream tooling does its own layout analysis
    /// or when output must match the backend library byte-for-byte.
    pub structure: bool,

    /// Maximum input file size in bytes. Default: 100 MiB.
    ///
    /// PDF parsers allocate in proportion to the cross-reference table, so
    /// an adversarial multi-gigabyte file can exhaust memory before any
    /// meaningful error surfaces. The cap turns that into a clean
    /// [`PdfmdError::FileTooLarge`] before the backend ever runs.
    pub max_file_size: u64,

    /// Optional progress callback receiving per-page events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            backend: ExtractBackend::default(),
            pages: PageSelection::default(),
            page_separator: PageSeparator::default(),
            include_metadata: false,
            structure: true,
            max_file_size: 100 * 1024 * 1024,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("backend", &self.backend)
            .field("pages", &self.pages)
            .field("page_separator", &self.page_separator)
            .field("include_metadata", &self.include_metadata)
            .field("structure", &self.structure)
            .field("max_file_size", &self.max_file_size)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn backend(mut self, backend: ExtractBackend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn page_separator(mut self, sep: PageSeparator) -> Self {
        self.config.page_separator = sep;
        self
    }

    pub fn include_metadata(mut self, v: bool) -> Self {
        self.config.include_metadata = v;
        self
    }

    pub fn structure(mut self, v: bool) -> Self {
        self.config.structure = v;
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, PdfmdError> {
        let c = &self.config;
        if c.max_file_size == 0 {
            return Err(PdfmdError::InvalidConfig(
                "max_file_size must be ≥ 1 byte".into(),
            ));
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start < 1 {
                return Err(PdfmdError::InvalidConfig(format!(
                    "Pages are 1-indexed, minimum is 1 (got {start})"
                )));
            }
            if start > end {
                return Err(PdfmdError::InvalidConfig(format!(
                    "Invalid page range {start}-{end}: start must be <= end"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which PDF library performs text extraction.
///
/// Two backends exist because no single pure-Rust PDF parser handles every
/// file in the wild. lopdf extracts page by page (enabling page selection
/// and per-page error reporting) but is strict about cross-reference
/// tables; pdf-extract tolerates more damage but only yields the whole
/// document at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractBackend {
    /// Try lopdf first, fall back to pdf-extract on failure. (default)
    #[default]
    Auto,
    /// lopdf only; fail if it cannot parse the document.
    Lopdf,
    /// pdf-extract only; whole-document extraction, no per-page results.
    PdfExtract,
}

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
    /// Convert a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Convert specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 1-indexed
    /// page numbers, clipped to `total_pages`.
    pub fn to_page_numbers(&self, total_pages: usize) -> Vec<usize> {
        let mut pages: Vec<usize> = match self {
            PageSelection::All => (1..=total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![*p]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1);
                let e = (*end).min(total_pages);
                (s..=e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .copied()
                .filter(|&p| p >= 1 && p <= total_pages)
                .collect(),
        };
        pages.sort_unstable();
        pages.dedup();
        pages
    }
}

/// How to separate pages in the assembled Markdown output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSeparator {
    /// No separator; pages joined with "\n\n". (default)
    #[default]
    None,
    /// Horizontal rule: "\n\n---\n\n"
    HorizontalRule,
    /// HTML comment with page number: "<!-- page N -->"
    Comment,
    /// Custom string inserted between pages.
    Custom(String),
}

impl PageSeparator {
    /// Render the separator string for the given page number (1-indexed).
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageSeparator::None => "\n\n".to_string(),
            PageSeparator::HorizontalRule => "\n\n---\n\n".to_string(),
            PageSeparator::Comment => format!("\n\n<!-- page {} -->\n\n", page_num),
            PageSeparator::Custom(s) => format!("\n\n{}\n\n", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_selection_to_page_numbers() {
        assert_eq!(PageSelection::All.to_page_numbers(5), vec![1, 2, 3, 4, 5]);
        assert_eq!(PageSelection::Single(3).to_page_numbers(5), vec![3]);
        assert_eq!(
            PageSelection::Single(6).to_page_numbers(5),
            Vec::<usize>::new()
        );
        assert_eq!(PageSelection::Range(2, 4).to_page_numbers(5), vec![2, 3, 4]);
        assert_eq!(
            PageSelection::Set(vec![1, 3, 5]).to_page_numbers(5),
            vec![1, 3, 5]
        );
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_page_numbers(5),
            vec![1, 3] // deduplicated and sorted
        );
    }

    #[test]
    fn range_clipped_to_document() {
        assert_eq!(PageSelection::Range(3, 10).to_page_numbers(4), vec![3, 4]);
    }

    #[test]
    fn separator_render() {
        assert_eq!(PageSeparator::None.render(2), "\n\n");
        assert_eq!(PageSeparator::HorizontalRule.render(2), "\n\n---\n\n");
        assert_eq!(PageSeparator::Comment.render(2), "\n\n<!-- page 2 -->\n\n");
        assert_eq!(
            PageSeparator::Custom("* * *".into()).render(2),
            "\n\n* * *\n\n"
        );
    }

    #[test]
    fn builder_rejects_inverted_range() {
        let err = ConversionConfig::builder()
            .pages(PageSelection::Range(5, 2))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("start must be <= end"));
    }

    #[test]
    fn builder_rejects_zero_size_cap() {
        assert!(ConversionConfig::builder().max_file_size(0).build().is_err());
    }

    #[test]
    fn builder_defaults() {
        let c = ConversionConfig::builder().build().unwrap();
        assert_eq!(c.backend, ExtractBackend::Auto);
        assert!(c.structure);
        assert!(!c.include_metadata);
    }
}
