// Whole-document text extraction - one bounded read, no streaming
use crate::csv_table::CsvTable;
use crate::pdf_extraction::lopdf_helper;
use crate::types::{DocumentFormat, RawDocument, Result, RevchonkError};
use log::debug;

/// What the extractor hands to the next stage.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedContent {
    /// Newline-joined page text, fed to the row recognizer.
    Text(String),
    /// Already-decoded table rows; no recognizer pass.
    Table(CsvTable),
}

/// Fail fast on oversized input. `max_bytes == 0` disables the check.
pub fn check_size(doc: &RawDocument, max_bytes: usize) -> Result<()> {
    if max_bytes > 0 && doc.len() > max_bytes {
        return Err(RevchonkError::DocumentTooLarge {
            len: doc.len(),
            max: max_bytes,
        });
    }
    Ok(())
}

/// Raw line-oriented text of a document.
///
/// PDF pages are joined with a newline in page order; a page without
/// extractable text contributes an empty string. CSV input is returned as
/// its decoded UTF-8 text.
pub fn extract_text(doc: &RawDocument) -> Result<String> {
    match doc.format() {
        DocumentFormat::Pdf => {
            let pages = lopdf_helper::with_pdf(doc, |document| Ok(lopdf_helper::page_texts(document)))?;
            let text = pages.join("\n");
            debug!("extracted {} chars from {} pages", text.len(), pages.len());
            Ok(text)
        }
        DocumentFormat::Csv => std::str::from_utf8(doc.bytes())
            .map(str::to_string)
            .map_err(|e| doc.unreadable(e)),
    }
}

/// Dispatch on the declared format.
pub fn extract_content(doc: &RawDocument) -> Result<ExtractedContent> {
    match doc.format() {
        DocumentFormat::Pdf => extract_text(doc).map(ExtractedContent::Text),
        DocumentFormat::Csv => CsvTable::parse(doc).map(ExtractedContent::Table),
    }
}
