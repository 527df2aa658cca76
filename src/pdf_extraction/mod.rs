// PDF text extraction and row recognition
pub mod embedded_block;
pub mod extraction_router;
pub mod line_pattern;
pub mod lopdf_helper;
pub mod tabbed_lines;

pub use extraction_router::{ExtractionRouter, Strategy};
