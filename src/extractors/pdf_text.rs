// src/extractors/pdf_text.rs
use crate::utils::error::ExtractError;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Reads a PDF from disk and returns the text layer of each page, in order.
pub fn read_page_texts(path: &Path) -> Result<Vec<String>, ExtractError> {
    if !path.is_file() {
        return Err(ExtractError::DocumentNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
    page_texts_from_bytes(&bytes)
}

/// Splits an in-memory PDF into per-page text.
///
/// `pdf_extract` can panic on malformed input rather than return an error,
/// so the call runs behind `catch_unwind` and both paths become
/// [`ExtractError::Decode`].
pub fn page_texts_from_bytes(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match result {
        Ok(Ok(pages)) => {
            tracing::debug!("Decoded {} pages of text", pages.len());
            Ok(pages)
        }
        Ok(Err(e)) => Err(ExtractError::Decode(e.to_string())),
        Err(_) => Err(ExtractError::Decode(
            "PDF text extraction panicked (malformed document)".to_string(),
        )),
    }
}
