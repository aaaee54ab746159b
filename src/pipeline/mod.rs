//! Pipeline stages for PDF-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ markdown ──▶ postprocess
//! (path)  (lopdf /      (heading,    (whitespace,
//!          pdf-extract)  paragraph)   unicode cleanup)
//! ```
//!
//! 1. [`input`]: validate the path, magic bytes, and size cap; read bytes
//! 2. [`extract`]: delegate text extraction to the backend library; the
//!    only stage that knows anything about the PDF format
//! 3. [`markdown`]: heuristic structuring of the extracted plain text
//!    (skipped when `ConversionConfig::structure` is false)
//! 4. [`postprocess`]: deterministic cleanup rules (line endings,
//!    blank lines, invisible characters)

pub mod extract;
pub mod input;
pub mod markdown;
pub mod postprocess;
