//! Error types for mod_sorter
//!
//! This module provides structured error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sorter operations
pub type Result<T> = std::result::Result<T, SortError>;

/// Errors that can occur while sorting mods into archives
#[derive(Error, Debug)]
pub enum SortError {
    /// The mods directory does not exist
    #[error("Mods directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip writer or reader failure
    #[error("Archive error in {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// No free file name was found below the suffix limit
    #[error("No unique file name for {base} after {attempts} attempts")]
    PathExhausted { base: PathBuf, attempts: u32 },

    /// A mod manifest could not be read or parsed
    #[error("Invalid mod metadata in {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SortError>,
    },
}

impl SortError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SortError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        SortError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a metadata error for the given manifest location
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        SortError::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Strip context wrappers and return the underlying error
    pub fn root(&self) -> &SortError {
        match self {
            SortError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SortError>,
{
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(ctx))
    }
}
