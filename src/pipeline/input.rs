//! Input validation: check the user-supplied path before any backend runs.
//!
//! Existence, permissions, the `%PDF` magic bytes, and the size cap are
//! checked here so callers get a precise [`PdfmdError`] variant instead of
//! a backend parse error like "xref not found" for a JPEG or a mistyped
//! path.

use crate::error::PdfmdError;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Every well-formed PDF starts with these bytes. Anything else is
/// rejected before parsing.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Validate a local PDF path and read it into memory.
///
/// Returns the file's bytes on success; both backends operate on the byte
/// buffer so the file is read exactly once.
pub fn read_input(path_str: impl AsRef<Path>, max_file_size: u64) -> Result<Vec<u8>, PdfmdError> {
    let path: PathBuf = path_str.as_ref().to_path_buf();

    let meta = match fs::metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfmdError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfmdError::FileNotFound { path });
        }
    };

    if !meta.is_file() {
        return Err(PdfmdError::FileNotFound { path });
    }

    if meta.len() > max_file_size {
        return Err(PdfmdError::FileTooLarge {
            path,
            size: meta.len(),
            limit: max_file_size,
        });
    }

    let mut file = match fs::File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfmdError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfmdError::FileNotFound { path });
        }
    };

    let mut bytes = Vec::with_capacity(meta.len() as usize);
    file.read_to_end(&mut bytes)
        .map_err(|e| PdfmdError::Internal(format!("read '{}': {}", path.display(), e)))?;

    validate_magic(&bytes, &path)?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Check the `%PDF` magic bytes of an in-memory buffer.
pub fn validate_magic(bytes: &[u8], path: &Path) -> Result<(), PdfmdError> {
    let mut magic = [0u8; 4];
    let n = bytes.len().min(4);
    magic[..n].copy_from_slice(&bytes[..n]);
    if &magic != PDF_MAGIC {
        return Err(PdfmdError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}
