#![forbid(unsafe_code)]

//! Clients for the remote Anthropic Files and Messages APIs.
//!
//! Layout: `types.rs` (wire-level request/response models), `error.rs`
//! (`RemoteError`), `client.rs` (`AnthropicClient` reqwest implementation).
//! The `FileStore` and `Generator` traits are the seams the orchestration
//! core consumes; production wiring hands it an `AnthropicClient`, tests
//! substitute in-memory doubles.

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;
use bytes::Bytes;

pub use client::AnthropicClient;
pub use error::{RemoteError, RemoteResult};
pub use types::{
    ContentBlock, FileListResponse, MessageRequest, MessageResponse, PromptBlock, PromptMessage,
    ResultBlock, StoredFile, ToolDeclaration, ToolResultPayload,
};

/// Remote file store: uploads binary content, resolves metadata, lists the
/// workspace, and downloads content by identifier.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Upload a file and return its store-assigned metadata.
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        content: Bytes,
    ) -> RemoteResult<StoredFile>;

    /// Resolve metadata for a known identifier.
    async fn retrieve_metadata(&self, file_id: &str) -> RemoteResult<StoredFile>;

    /// List every file known to the store.
    async fn list_files(&self) -> RemoteResult<Vec<StoredFile>>;

    /// Download the binary content behind an identifier.
    async fn download(&self, file_id: &str) -> RemoteResult<Bytes>;
}

/// Remote generation client: submits a multi-block prompt with the
/// code-execution tool enabled and returns the ordered response blocks.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Execute a generation request.
    async fn generate(&self, request: MessageRequest) -> RemoteResult<MessageResponse>;
}
