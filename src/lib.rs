//! # pdfmd
//!
//! Convert PDF documents to Markdown.
//!
//! Text extraction is delegated to `lopdf` (with a `pdf-extract` fallback
//! for damaged files); this crate wraps it in the plumbing a conversion
//! tool needs: input validation, page selection, Markdown structuring
//! heuristics, deterministic cleanup, atomic output writes, and per-page
//! error reporting.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     validate path, %PDF magic, size cap
//!  ├─ 2. Extract   per-page text via lopdf (pdf-extract fallback)
//!  ├─ 3. Structure headings, paragraphs, bullets, hyphenation repair
//!  ├─ 4. Polish    whitespace and invisible-unicode cleanup rules
//!  └─ 5. Output    assembled Markdown + per-page stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfmd::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("document.pdf", &config)?;
//!     println!("{}", output.markdown);
//!     eprintln!("{}/{} pages converted",
//!         output.stats.processed_pages,
//!         output.stats.total_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfmd` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdfmd = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, ExtractBackend, PageSelection, PageSeparator,
};
pub use convert::{convert, convert_from_bytes, convert_to_file, inspect};
pub use error::{PageError, PdfmdError};
pub use output::{ConversionOutput, ConversionStats, DocumentMetadata, PageResult};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
