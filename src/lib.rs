// revchonk - revenue/subscriber rows out of report PDFs and CSV exports
pub mod aggregate;
pub mod config;
pub mod content_extractor;
pub mod csv_table;
pub mod dedupe;
pub mod export;
pub mod numeric;
pub mod pdf_extraction;
pub mod pipeline;
pub mod rows;
pub mod types;

pub use config::RevchonkConfig;
pub use pipeline::{Extraction, Pipeline, Report};
pub use rows::{CandidateRow, CanonicalRow};
pub use types::{DocumentFormat, RawDocument, Result, RevchonkError};
