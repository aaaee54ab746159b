//! Error types for the pdfmd library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PdfmdError`] is fatal: the conversion cannot proceed at all
//!   (missing input file, not a PDF, encrypted document, unwritable
//!   output). Returned as `Err(PdfmdError)` from the top-level `convert*`
//!   functions.
//!
//! * [`PageError`] is non-fatal: a single page failed to extract
//!   (damaged content stream, unsupported encoding) but other pages are
//!   fine. Stored inside [`crate::output::PageResult`] so callers can
//!   inspect partial success rather than losing the whole document to one
//!   bad page.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfmd library.
///
/// Page-level failures use [`PageError`] and are stored in
/// [`crate::output::PageResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum PdfmdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The file exceeds the configured size cap.
    #[error("PDF file too large: '{path}' is {size} bytes (limit {limit})")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// Neither backend could parse the document.
    #[error("PDF '{path}' could not be parsed: {detail}\nTry repairing with: qpdf input.pdf repaired.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// The document is encrypted; pdfmd has no password support.
    #[error("PDF '{path}' is encrypted.\nDecrypt it first, e.g.: qpdf --decrypt --password=PW input.pdf out.pdf")]
    EncryptedPdf { path: PathBuf },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// Every selected page failed to extract; output would be empty.
    #[error("All {total} pages failed to extract.\nFirst error: {first_error}")]
    AllPagesFailed { total: usize, first_error: String },

    /// Some selected pages failed and the caller asked for all-or-nothing
    /// semantics via [`crate::output::ConversionOutput::into_strict`].
    #[error("{failed} of {total} pages failed to extract.\nFirst error: {first_error}")]
    SomePagesFailed {
        failed: usize,
        total: usize,
        first_error: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Stored alongside [`crate::output::PageResult`] when a page fails.
/// The overall conversion continues unless ALL pages fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The backend could not decode this page's content stream.
    #[error("Page {page}: text extraction failed: {detail}")]
    ExtractFailed { page: usize, detail: String },
}

impl PageError {
    /// 1-indexed page number this error belongs to.
    pub fn page(&self) -> usize {
        match self {
            PageError::ExtractFailed { page, .. } => *page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_pages_failed_display() {
        let e = PdfmdError::AllPagesFailed {
            total: 10,
            first_error: "garbled stream".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("10"), "got: {msg}");
        assert!(msg.contains("garbled stream"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = PdfmdError::NotAPdf {
            path: PathBuf::from("/tmp/fake.pdf"),
            magic: *b"PK\x03\x04",
        };
        assert!(e.to_string().contains("/tmp/fake.pdf"));
    }

    #[test]
    fn file_too_large_display() {
        let e = PdfmdError::FileTooLarge {
            path: PathBuf::from("big.pdf"),
            size: 200,
            limit: 100,
        };
        let msg = e.to_string();
        assert!(msg.contains("200"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn page_error_reports_page() {
        let e = PageError::ExtractFailed {
            page: 7,
            detail: "bad stream".into(),
        };
        assert_eq!(e.page(), 7);
        assert!(e.to_string().contains("Page 7"));
    }
}
