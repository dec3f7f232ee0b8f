#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report PDF text extraction and download.
//!
//! Credit bureau reports arrive as PDF documents. This crate wraps the
//! pure-Rust text extraction ([`pdf_extract`]) behind the shape the report
//! parser expects: per-page plain text concatenated in document order, one
//! newline after each page. Downloading reports from a URL lives in
//! [`download`].
//!
//! Extraction is the only hard-failure layer around the parser; everything
//! downstream of a successful extraction is best effort.

pub mod download;

use std::path::Path;

/// Errors specific to obtaining report text.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// An HTTP request to download a report failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts the full text of a report PDF from its raw bytes.
///
/// Pages are concatenated in document order with a newline appended after
/// each page, so line-oriented parsing never sees two pages glued into one
/// line.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if the bytes are not a readable PDF.
pub fn extract_report_text(bytes: &[u8]) -> Result<String, PdfError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))?;

    let mut full_text = String::new();
    for page in &pages {
        full_text.push_str(page);
        full_text.push('\n');
    }

    log::debug!(
        "Extracted {} characters of text from {} pages",
        full_text.len(),
        pages.len(),
    );

    Ok(full_text)
}

/// Reads a report PDF from disk and extracts its full text.
///
/// # Errors
///
/// Returns [`PdfError::Io`] if the file cannot be read and
/// [`PdfError::Extraction`] if it is not a readable PDF.
pub fn extract_report_text_from_file(path: &Path) -> Result<String, PdfError> {
    let bytes = std::fs::read(path)?;
    extract_report_text(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bytes_that_are_not_a_pdf() {
        let err = extract_report_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Extraction(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = extract_report_text_from_file(Path::new("/nonexistent/report.pdf")).unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }
}
