use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TocError>;

#[derive(Debug, Error)]
pub enum TocError {
    /// Caller input rejected at the API boundary.
    #[error("{0}")]
    Validation(String),

    /// The archive is not a minimally conforming EPUB.
    #[error("{0}")]
    Structure(String),

    #[error("All extraction methods failed:\n{}", list_failures(.attempts))]
    Extraction { attempts: Vec<BackendFailure> },

    #[error("XML parse error: {0}")]
    Parsing(String),

    #[error("conversion error: {0}")]
    Conversion(String),

    #[error("output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TocError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }
}

/// Why a single backend did not produce an accepted TOC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    pub backend: &'static str,
    pub reason: String,
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.backend, self.reason)
    }
}

fn list_failures(attempts: &[BackendFailure]) -> String {
    attempts
        .iter()
        .map(|failure| format!("- {failure}"))
        .collect::<Vec<_>>()
        .join("\n")
}
