// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Word (DOCX) text extractor

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;

use super::TextExtractor;
use crate::{FolioError, Result};

/// Extracts paragraph text from `word/document.xml`
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Read the main document part out of the package
    fn document_xml(path: &Path) -> Result<String> {
        let file = std::fs::File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| FolioError::Docx(format!("Failed to open DOCX: {}", e)))?;

        let mut part = archive.by_name("word/document.xml")
            .map_err(|_| FolioError::Docx("No document.xml found".to_string()))?;

        let mut content = String::new();
        part.read_to_string(&mut content)?;
        Ok(content)
    }
}

/// One string per top-level `w:p`, with run text, tabs and breaks preserved
///
/// Paragraphs nested inside a run (text boxes under `w:txbxContent`) are
/// skipped; Word often stores them twice, once per `mc:AlternateContent`
/// branch.
pub fn paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    depth += 1;
                    if depth == 1 {
                        current.clear();
                    }
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" if depth == 0 => paragraphs.push(String::new()),
                b"w:tab" if depth == 1 => current.push('\t'),
                b"w:br" | b"w:cr" if depth == 1 => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text && depth == 1 => {
                let text = t.unescape()
                    .map_err(|e| FolioError::Docx(format!("Bad text node: {}", e)))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => {
                    if depth == 1 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    depth = depth.saturating_sub(1);
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FolioError::Docx(format!(
                    "Malformed document.xml at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn extract(&self, path: &Path) -> Result<String> {
        let xml = Self::document_xml(path)?;
        Ok(paragraphs(&xml)?.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Lease Agreement</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t xml:space="preserve">Tenant: </w:t></w:r><w:r><w:t>Jane &amp; Co</w:t></w:r></w:p>
    <w:p><w:r><w:t>Rent</w:t><w:tab/><w:t>900</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn write_docx(path: &Path, xml: &str) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_paragraphs_joined_by_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lease.docx");
        write_docx(&path, BODY);

        let text = DocxExtractor::new().extract(&path).unwrap();
        assert_eq!(text, "Lease Agreement\n\nTenant: Jane & Co\nRent\t900");
    }

    #[test]
    fn test_whitespace_between_tags_is_not_text() {
        let xml = r#"<w:document><w:body><w:p>
            <w:r>
              <w:t>Only this</w:t>
            </w:r>
        </w:p></w:body></w:document>"#;
        assert_eq!(paragraphs(xml).unwrap(), vec!["Only this".to_string()]);
    }

    #[test]
    fn test_text_box_keeps_surrounding_runs() {
        let xml = r#"<w:body>
<w:p><w:r><w:t>Before</w:t></w:r><w:r><w:pict><v:shape><v:textbox><w:txbxContent><w:p><w:r><w:t>Box</w:t></w:r></w:p><w:p/></w:txbxContent></v:textbox></v:shape></w:pict></w:r><w:r><w:t xml:space="preserve"> After</w:t></w:r></w:p>
<w:p><w:r><w:t>Next</w:t></w:r></w:p>
</w:body>"#;
        assert_eq!(
            paragraphs(xml).unwrap(),
            vec!["Before After".to_string(), "Next".to_string()]
        );
    }

    #[test]
    fn test_missing_document_part() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("docProps/app.xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"<Properties/>").unwrap();
        zip.finish().unwrap();

        assert!(matches!(DocxExtractor::new().extract(&path), Err(FolioError::Docx(_))));
    }

    #[test]
    fn test_not_a_zip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.docx");
        std::fs::write(&path, "just text").unwrap();

        assert!(DocxExtractor::new().extract(&path).is_err());
    }
}
