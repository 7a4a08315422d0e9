//! Error types for remote API calls.
//!
//! Messages stay constant; the operation name, URL, and identifiers live in
//! structured fields so call sites can log without re-wrapping.

use thiserror::Error;

/// Primary error type for remote Files/Messages API operations.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Building the HTTP client or a request payload failed.
    #[error("failed to construct remote client")]
    ClientBuild {
        /// Source reqwest error.
        source: reqwest::Error,
    },
    /// A request payload could not be assembled.
    #[error("invalid remote request")]
    InvalidRequest {
        /// Operation identifier.
        operation: &'static str,
        /// Human-readable detail.
        detail: String,
    },
    /// The HTTP transport failed before a response arrived.
    #[error("remote call failed")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// Source reqwest error.
        source: reqwest::Error,
    },
    /// The remote API answered with a non-success status.
    #[error("remote call returned error status")]
    Status {
        /// Operation identifier.
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
        /// Response body, when one was readable.
        body: String,
    },
    /// The response body could not be decoded into the expected shape.
    #[error("remote response could not be decoded")]
    Decode {
        /// Operation identifier.
        operation: &'static str,
        /// Source reqwest error.
        source: reqwest::Error,
    },
}

/// Convenience alias for remote call results.
pub type RemoteResult<T> = Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_constant_and_context_lives_in_fields() {
        let err = RemoteError::Status {
            operation: "files.upload",
            url: "http://localhost/v1/files".to_string(),
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "remote call returned error status");
        match err {
            RemoteError::Status { operation, status, .. } => {
                assert_eq!(operation, "files.upload");
                assert_eq!(status, 401);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
