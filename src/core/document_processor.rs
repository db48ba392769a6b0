use crate::error::{AppError, Result};
use std::path::Path;
use tracing::warn;

/// Text of one PDF page, split into lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfPage {
    pub lines: Vec<String>,
}

impl PdfPage {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    fn from_text(text: &str) -> Self {
        Self {
            lines: text
                .lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

pub trait PdfReader: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PdfPage>>;
}

/// Pure Rust PDF text extraction
#[derive(Debug, Clone, Default)]
pub struct LopdfReader;

impl PdfReader for LopdfReader {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PdfPage>> {
        let doc = lopdf::Document::load(path)
            .map_err(|e| AppError::extraction(path, format!("Failed to load PDF: {}", e)))?;

        let pages = doc
            .get_pages()
            .keys()
            .map(|page_number| page_or_empty(path, *page_number, doc.extract_text(&[*page_number])))
            .collect();

        Ok(pages)
    }
}

/// An unreadable page contributes no text; the rest of the document is kept.
fn page_or_empty<E: std::fmt::Display>(
    path: &Path,
    page_number: u32,
    text: std::result::Result<String, E>,
) -> PdfPage {
    match text {
        Ok(text) => PdfPage::from_text(&text),
        Err(e) => {
            warn!(
                "Skipping page {} of {}: {}",
                page_number,
                path.display(),
                e
            );
            PdfPage::default()
        }
    }
}

/// Flatten pages into one blob: lines joined with CRLF, pages with a single space.
pub fn flatten_pages(pages: &[PdfPage]) -> String {
    pages
        .iter()
        .map(|page| page.lines.join("\r\n"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_pages() {
        let pages = vec![
            PdfPage::new(vec!["Facture".to_string(), "N° 42".to_string()]),
            PdfPage::new(vec!["Total: 12,00 €".to_string()]),
        ];
        assert_eq!(flatten_pages(&pages), "Facture\r\nN° 42 Total: 12,00 €");
    }

    #[test]
    fn test_flatten_no_pages_is_empty() {
        assert_eq!(flatten_pages(&[]), "");
    }

    #[test]
    fn test_page_from_text_drops_blank_lines() {
        let page = PdfPage::from_text("first  \n\n  \nsecond\r\n");
        assert_eq!(page.lines, vec!["first", "second"]);
    }

    #[test]
    fn test_unreadable_page_is_skipped() {
        let path = Path::new("releve.pdf");
        let pages = vec![
            page_or_empty(path, 1, Ok::<_, String>("Relevé\nJanvier".to_string())),
            page_or_empty(path, 2, Err("invalid content stream")),
            page_or_empty(path, 3, Ok::<_, String>("Solde".to_string())),
        ];

        assert!(pages[1].lines.is_empty());
        assert_eq!(flatten_pages(&pages), "Relevé\r\nJanvier  Solde");
    }

    #[test]
    fn test_corrupt_pdf_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = LopdfReader.extract_pages(&path).unwrap_err();
        assert_eq!(err.error_type(), "EXTRACTION_ERROR");
    }
}
