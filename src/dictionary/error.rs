//! Page dictionary error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while generating a page dictionary
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The template index could not be read
    #[error("Failed to read template index {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template index is not a valid JSON array of templates
    #[error("Invalid template index {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for dictionary operations
pub type DictionaryResult<T> = Result<T, DictionaryError>;
