// Core types for revchonk
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Declared format of an uploaded report.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Csv,
}

impl DocumentFormat {
    /// Guess from a file extension; anything that isn't `.csv` is treated as PDF.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => DocumentFormat::Csv,
            _ => DocumentFormat::Pdf,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "csv" => Ok(DocumentFormat::Csv),
            other => Err(format!("unknown document format '{}'", other)),
        }
    }
}

/// Input bytes plus the format the caller claims they are in. Never mutated.
#[derive(Debug, Clone)]
pub struct RawDocument {
    bytes: Vec<u8>,
    format: DocumentFormat,
}

impl RawDocument {
    pub fn new(bytes: impl Into<Vec<u8>>, format: DocumentFormat) -> Self {
        Self {
            bytes: bytes.into(),
            format,
        }
    }

    pub fn pdf(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes, DocumentFormat::Pdf)
    }

    pub fn csv(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes, DocumentFormat::Csv)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Shorthand for building a `DocumentUnreadable` error about this document.
    pub(crate) fn unreadable(&self, reason: impl fmt::Display) -> RevchonkError {
        RevchonkError::DocumentUnreadable {
            format: self.format,
            len: self.len(),
            reason: reason.to_string(),
        }
    }
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum RevchonkError {
    #[error("document unreadable as {format} ({len} bytes): {reason}")]
    DocumentUnreadable {
        format: DocumentFormat,
        len: usize,
        reason: String,
    },

    #[error("document too large: {len} bytes exceeds limit of {max}")]
    DocumentTooLarge { len: usize, max: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for RevchonkError {
    fn from(err: csv::Error) -> Self {
        RevchonkError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RevchonkError>;
