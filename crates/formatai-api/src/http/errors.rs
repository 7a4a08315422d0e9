//! RFC9457-style API error wrapper.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use formatai_core::TransformError;
use tracing::{error, warn};

use crate::models::ProblemDetails;

const PROBLEM_BAD_REQUEST: &str = "https://formatai.dev/problems/bad-request";
const PROBLEM_INTERNAL: &str = "https://formatai.dev/problems/internal";
const PROBLEM_UPSTREAM: &str = "https://formatai.dev/problems/upstream-failure";

/// Structured API error rendered as a problem-details payload.
#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    kind: &'static str,
    title: &'static str,
    detail: Option<String>,
}

impl ApiError {
    const fn new(status: StatusCode, kind: &'static str, title: &'static str) -> Self {
        Self {
            status,
            kind,
            title,
            detail: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub(crate) fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, PROBLEM_BAD_REQUEST, "bad request").with_detail(detail)
    }

    pub(crate) fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            PROBLEM_INTERNAL,
            "internal server error",
        )
        .with_detail(detail)
    }

    pub(crate) fn bad_gateway(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            PROBLEM_UPSTREAM,
            "upstream service failure",
        )
        .with_detail(detail)
    }

    #[cfg(test)]
    pub(crate) const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<TransformError> for ApiError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Validation { reason, detail } => {
                warn!(reason, "transformation request rejected");
                Self::bad_request(detail)
            }
            TransformError::Remote { operation, source } => {
                error!(operation, error = %source, "remote operation failed");
                Self::bad_gateway(format!("remote operation {operation} failed"))
            }
            TransformError::Extraction { detail } => {
                error!("generation finished without the required artifact");
                Self::internal(detail)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}
