//! Error types for the target catalog.

use thiserror::Error;

/// Errors that can occur in target catalog operations.
#[derive(Error, Debug)]
pub enum TargetError {
    /// Target not found in the registry
    #[error("target not found: {slug}")]
    NotFound {
        /// The slug that was looked up
        slug: String,
    },

    /// Failed to read a definition file
    #[error("failed to load target definitions from {path}: {source}")]
    LoadError {
        /// Path to the definition file
        path: String,
        /// Underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse definition TOML
    #[error("failed to parse target TOML in {path}: {source}")]
    ParseError {
        /// Path to the definition file, or `<built-in>`
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Invalid target definition (validation failed)
    #[error("invalid target definition for {slug}: {reason}")]
    ValidationError {
        /// Slug of the target being validated
        slug: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Definition directory not found
    #[error("target definitions directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// I/O error while accessing definitions
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid slug format
    #[error(transparent)]
    InvalidSlug(#[from] repscout_core::RepscoutError),
}

/// Result type for target catalog operations.
pub type Result<T> = std::result::Result<T, TargetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = TargetError::NotFound {
            slug: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "target not found: missing");
    }
}
