use crate::error::CorpusError;
use lopdf::Document;
use std::path::Path;

pub trait PdfExtractor {
    /// Returns the document text with pages in order, or an error when the file
    /// cannot be read. Text may be empty for image-only PDFs.
    fn extract_text(&self, path: &Path) -> Result<String, CorpusError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, CorpusError> {
        let document =
            Document::load(path).map_err(|error| CorpusError::PdfParse(error.to_string()))?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            let text = document
                .extract_text(&[page_no])
                .map_err(|error| CorpusError::PdfParse(format!("page {page_no}: {error}")))?;
            pages.push(text);
        }

        Ok(join_pages(pages))
    }
}

fn join_pages(pages: Vec<String>) -> String {
    if pages.iter().all(|page| page.trim().is_empty()) {
        return String::new();
    }
    pages.join("\n")
}
