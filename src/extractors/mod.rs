// src/extractors/mod.rs
pub mod pdf_text;
pub mod result_sheet;

// Re-export key extraction types for convenience
pub use result_sheet::{ResultSheetExtractor, ScanOptions, ScanReport};

use crate::utils::error::ExtractError;
use std::path::Path;

/// Decodes the PDF at `path` and scans every page for result blocks.
/// Only unreadable input fails; layout mismatches just yield fewer rows.
pub fn extract_document(path: &Path, options: ScanOptions) -> Result<ScanReport, ExtractError> {
    let pages = pdf_text::read_page_texts(path)?;
    tracing::info!("Extracting results from {} ({} pages)", path.display(), pages.len());
    Ok(ResultSheetExtractor::new(options).scan(&pages))
}
