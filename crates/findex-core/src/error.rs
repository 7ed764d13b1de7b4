//! Error types for Findex

use thiserror::Error;

/// Result type alias using Findex's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Findex error types with helpful messages and suggestions
///
/// Query evaluation, ranking and saved-search restore never fail; these
/// errors only surface at the storage and input edges.
#[derive(Error, Debug)]
pub enum Error {
    // Corpus errors (E001-E099)
    #[error("Corpus file '{0}' not found. Pass --corpus or run `findex config set storage.corpus_path <path>`.")]
    CorpusNotFound(String),

    #[error("Corpus line {line} is not a valid entity: {message}")]
    CorpusLine { line: usize, message: String },

    // Saved search errors (E100-E199)
    #[error("Saved search #{0} not found. Run `findex saved list` to see all saved searches.")]
    SavedQueryNotFound(usize),

    #[error("No saved search named '{0}'. Run `findex saved list` to see all saved searches.")]
    SavedQueryNameNotFound(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::CorpusNotFound(_) => "E001",
            Self::CorpusLine { .. } => "E002",
            Self::SavedQueryNotFound(_) => "E100",
            Self::SavedQueryNameNotFound(_) => "E101",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
            Self::Serialization(_) => "E900",
            Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::CorpusNotFound(_) => {
                Some("findex config set storage.corpus_path <path>".to_string())
            }
            Self::CorpusLine { line, .. } => Some(format!("Fix or remove line {} of the corpus file", line)),
            Self::SavedQueryNotFound(_) | Self::SavedQueryNameNotFound(_) => {
                Some("findex saved list".to_string())
            }
            Self::ConfigError(_) => Some("findex config list".to_string()),
            _ => None,
        }
    }
}
