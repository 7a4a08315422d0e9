//! Error types for configuration loading.

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was absent.
    #[error("missing environment variable")]
    MissingEnv {
        /// Name of the missing variable.
        name: &'static str,
    },
    /// Environment variable held a value that failed to parse.
    #[error("invalid environment variable")]
    InvalidEnv {
        /// Name of the offending variable.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
