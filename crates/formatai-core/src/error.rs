//! Error types for transformation orchestration.
//!
//! Validation failures are client errors and must surface before any remote
//! call; remote and extraction failures abort the request with context.

use formatai_anthropic::RemoteError;
use thiserror::Error;

/// Primary error type for the transformation flow.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Request preconditions were violated before any remote call.
    #[error("invalid transformation request")]
    Validation {
        /// Machine-readable reason for the rejection.
        reason: &'static str,
        /// Human-readable detail for the caller.
        detail: String,
    },
    /// A remote store or generation call failed.
    #[error("remote operation failed")]
    Remote {
        /// Operation identifier.
        operation: &'static str,
        /// Source remote error.
        #[source]
        source: RemoteError,
    },
    /// Generation completed without producing the required output artifact.
    #[error("generated output artifact missing")]
    Extraction {
        /// Diagnosis, including any text the model produced.
        detail: String,
    },
}

impl TransformError {
    pub(crate) fn validation(reason: &'static str, detail: impl Into<String>) -> Self {
        Self::Validation {
            reason,
            detail: detail.into(),
        }
    }

    pub(crate) const fn remote(operation: &'static str, source: RemoteError) -> Self {
        Self::Remote { operation, source }
    }
}

/// Convenience alias for transformation results.
pub type TransformResult<T> = Result<T, TransformError>;
