//! Error types shared by every repscout crate.

use thiserror::Error;

/// Errors raised by the shared types and configuration.
#[derive(Error, Debug)]
pub enum RepscoutError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A slug that is not 3-50 lowercase alphanumerics and hyphens
    #[error("invalid target slug '{slug}': {reason}")]
    InvalidSlug {
        /// The rejected input
        slug: String,
        /// What rule it broke
        reason: String,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Config file not found
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where config was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `RepscoutError`.
pub type Result<T> = std::result::Result<T, RepscoutError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RepscoutError::InvalidSlug {
            slug: "A".to_string(),
            reason: "too short".to_string(),
        };
        assert_eq!(err.to_string(), "invalid target slug 'A': too short");

        let err = ConfigError::InvalidValue {
            field: "retry.max_attempts".to_string(),
            reason: "must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for retry.max_attempts: must be at least 1"
        );
    }

    #[test]
    fn test_error_from_config() {
        let config_err = ConfigError::NoConfigDir;
        let err: RepscoutError = config_err.into();
        assert!(matches!(err, RepscoutError::Config(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: RepscoutError = io_err.into();
        assert!(matches!(err, RepscoutError::Io(_)));
    }
}
