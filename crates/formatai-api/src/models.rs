//! Shared HTTP DTOs for the FormatAI public API.
//!
//! The conversions live close to the server so the mapping from domain
//! objects (`StoredFile`) remains a single source of truth.

use chrono::{DateTime, Utc};
use formatai_anthropic::StoredFile;
use serde::{Deserialize, Serialize};

/// RFC9457-compatible problem document surfaced on validation/runtime errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// File metadata surfaced by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileView {
    pub id: String,
    pub filename: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub downloadable: bool,
}

impl From<StoredFile> for FileView {
    fn from(file: StoredFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            size_bytes: file.size_bytes,
            created_at: file.created_at,
            downloadable: file.downloadable,
        }
    }
}

/// Envelope returned by `GET /api/v1/files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<FileView>,
}

/// JSON descriptor served at the root route.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDescriptor {
    pub service: &'static str,
    pub version: &'static str,
    pub files_url: &'static str,
    pub format_url: &'static str,
}

impl Default for ServiceDescriptor {
    fn default() -> Self {
        Self {
            service: "formatai",
            version: env!("CARGO_PKG_VERSION"),
            files_url: "/api/v1/files",
            format_url: "/api/v1/format",
        }
    }
}
