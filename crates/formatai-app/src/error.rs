//! # Design
//!
//! - Centralize application-level errors for bootstrap and serving.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: formatai_config::ConfigError,
    },
    /// Telemetry setup failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying failure.
        cause: anyhow::Error,
    },
    /// Remote client construction failed.
    #[error("remote client operation failed")]
    Remote {
        /// Operation identifier.
        operation: &'static str,
        /// Source remote error.
        source: formatai_anthropic::RemoteError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: formatai_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: formatai_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(operation: &'static str, cause: anyhow::Error) -> Self {
        Self::Telemetry { operation, cause }
    }

    pub(crate) const fn remote(
        operation: &'static str,
        source: formatai_anthropic::RemoteError,
    ) -> Self {
        Self::Remote { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: formatai_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}
