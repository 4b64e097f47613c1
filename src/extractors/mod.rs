// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Plain-text extraction for the supported document formats

pub mod docx;
pub mod pdf;
pub mod text;

use std::path::Path;

use crate::config::ScanConfig;
use crate::Result;

/// Every extension some extractor can handle
pub const KNOWN_EXTENSIONS: &[&str] = &["txt", "pdf", "docx"];

/// Trait for text extractors
pub trait TextExtractor: Send + Sync {
    /// Name of this extractor
    fn name(&self) -> &'static str;

    /// File extensions this extractor handles
    fn supported_extensions(&self) -> &[&str];

    /// Check if this extractor can handle a file
    fn can_handle(&self, path: &Path) -> bool {
        match extension_of(path) {
            Some(ext) => self.supported_extensions().iter().any(|e| e.eq_ignore_ascii_case(&ext)),
            None => false,
        }
    }

    /// Extract plain text; an empty string means nothing was extractable
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Registry of the extractors enabled by configuration
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create a registry limited to the configured extensions
    pub fn new(config: &ScanConfig) -> Self {
        let mut registry = Self {
            extractors: Vec::new(),
        };

        let candidates: Vec<Box<dyn TextExtractor>> = vec![
            Box::new(text::PlainTextExtractor::new()),
            Box::new(pdf::PdfExtractor::new()),
            Box::new(docx::DocxExtractor::new()),
        ];

        for extractor in candidates {
            if extractor.supported_extensions().iter().any(|e| config.is_supported(e)) {
                registry.register(extractor);
            }
        }

        registry
    }

    /// Register a new extractor
    pub fn register(&mut self, extractor: Box<dyn TextExtractor>) {
        self.extractors.push(extractor);
    }

    /// Find the extractor for a file
    pub fn find_extractor(&self, path: &Path) -> Option<&dyn TextExtractor> {
        self.extractors.iter()
            .find(|e| e.can_handle(path))
            .map(|e| e.as_ref())
    }

    /// Get extractor names
    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }
}

/// Lowercased extension without the dot
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_registry_has_all_formats() {
        let registry = ExtractorRegistry::new(&ScanConfig::default());
        assert_eq!(registry.extractor_names(), vec!["text", "pdf", "docx"]);
    }

    #[test]
    fn test_registry_follows_configured_extensions() {
        let config = ScanConfig {
            supported_extensions: vec!["txt".to_string()],
            ..ScanConfig::default()
        };
        let registry = ExtractorRegistry::new(&config);
        assert_eq!(registry.extractor_names(), vec!["text"]);
        assert!(registry.find_extractor(&PathBuf::from("a.txt")).is_some());
        assert!(registry.find_extractor(&PathBuf::from("a.pdf")).is_none());
    }

    #[test]
    fn test_find_extractor_is_case_insensitive() {
        let registry = ExtractorRegistry::new(&ScanConfig::default());
        let found = registry.find_extractor(&PathBuf::from("Scan.PDF")).unwrap();
        assert_eq!(found.name(), "pdf");
        assert!(registry.find_extractor(&PathBuf::from("notes.md")).is_none());
        assert!(registry.find_extractor(&PathBuf::from("README")).is_none());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(&PathBuf::from("a/b.DocX")), Some("docx".to_string()));
        assert_eq!(extension_of(&PathBuf::from(".txt")), None);
        assert_eq!(extension_of(&PathBuf::from("plain")), None);
    }
}
