// lopdf helper - Pure Rust PDF operations
use crate::types::{RawDocument, Result};
use log::{debug, warn};
use lopdf::Document;

/// Load a PDF held in memory. Corrupt bytes are `DocumentUnreadable`.
pub fn load_pdf(doc: &RawDocument) -> Result<Document> {
    Document::load_mem(doc.bytes()).map_err(|e| doc.unreadable(e))
}

/// Execute an operation with a PDF document
pub fn with_pdf<F, R>(doc: &RawDocument, f: F) -> Result<R>
where
    F: FnOnce(&Document) -> Result<R>,
{
    let document = load_pdf(doc)?;
    f(&document)
}

pub fn page_count(doc: &RawDocument) -> Result<usize> {
    with_pdf(doc, |document| Ok(document.get_pages().len()))
}

/// Text of every page, in page order. A page lopdf can't decode yields "".
pub fn page_texts(document: &Document) -> Vec<String> {
    let pages = document.get_pages();
    debug!("extracting text from {} pages", pages.len());

    // BTreeMap keys are page numbers, so iteration is already in document order
    pages
        .keys()
        .map(|&page_number| match document.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                warn!("page {} has no extractable text: {}", page_number, e);
                String::new()
            }
        })
        .collect()
}
