//! PDF text extraction.

use std::path::Path;

use anyhow::{anyhow, Result};

/// Produces the text of each page of a document on disk.
///
/// Called from the blocking thread pool; implementations may do heavy,
/// synchronous work.
pub trait TextExtractor: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// Page-by-page extraction backed by `pdf-extract`.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        pdf_extract::extract_text_by_pages(path)
            .map_err(|e| anyhow!("Failed to extract PDF text from {}: {e}", path.display()))
    }
}

/// Joins page texts with newlines, skipping pages without text, and trims
/// the result. An empty return value means nothing was extractable.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(AsRef::as_ref)
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
