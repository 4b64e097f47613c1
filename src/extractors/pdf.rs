// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! PDF text extractor

use std::path::Path;
use tracing::{debug, warn};

use super::TextExtractor;
use crate::{FolioError, Result};

/// Extracts PDF text page by page
pub struct PdfExtractor;

/// Text gathered by the per-page pass
#[derive(Debug, Default)]
struct PageText {
    text: String,
    failed_pages: usize,
}

impl PageText {
    /// Nothing came out and lopdf choked on at least one page
    fn needs_whole_document(&self) -> bool {
        self.text.trim().is_empty() && self.failed_pages > 0
    }
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Per-page text through lopdf, skipping pages with nothing to extract
    fn extract_pages(bytes: &[u8]) -> Result<PageText> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| FolioError::Pdf(format!("Failed to load PDF: {}", e)))?;

        let mut pages = PageText::default();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) if !page_text.trim().is_empty() => {
                    pages.text.push_str(page_text.trim_end());
                    pages.text.push('\n');
                }
                Ok(_) => debug!("Page {} has no extractable text", page_number),
                Err(e) => {
                    debug!("Page {} text extraction failed: {}", page_number, e);
                    pages.failed_pages += 1;
                }
            }
        }

        Ok(pages)
    }

    /// Whole-document extraction for files lopdf cannot open or read
    fn extract_whole(bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| FolioError::Pdf(format!("Text extraction failed: {}", e)))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;

        match Self::extract_pages(&bytes) {
            Ok(pages) if pages.needs_whole_document() => {
                warn!(
                    "No page text from {:?} ({} pages failed), trying whole document",
                    path, pages.failed_pages
                );
                match Self::extract_whole(&bytes) {
                    Ok(text) => Ok(text),
                    Err(e) => {
                        debug!("Whole-document extraction also failed: {}", e);
                        Ok(pages.text)
                    }
                }
            }
            Ok(pages) => Ok(pages.text),
            Err(e) => {
                warn!("Per-page extraction failed for {:?}: {}, trying whole document", path, e);
                Self::extract_whole(&bytes)
            }
        }
    }
}
