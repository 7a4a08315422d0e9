//! Reqwest-backed implementation of the remote Files and Messages clients.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use tracing::{debug, info};

use crate::error::{RemoteError, RemoteResult};
use crate::types::{FileListResponse, MessageRequest, MessageResponse, StoredFile};
use crate::{FileStore, Generator};

/// API version header value required by the Messages API.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Beta features required for code execution and the Files API.
const ACTIVE_BETAS: &str = "code-execution-2025-08-25,files-api-2025-04-14";

const HEADER_API_KEY: &str = "x-api-key";
const HEADER_VERSION: &str = "anthropic-version";
const HEADER_BETA: &str = "anthropic-beta";

/// Client for the Anthropic Files and Messages APIs.
///
/// One instance is shared process-wide; it carries the authenticated
/// `reqwest::Client` and the API base URL.
#[derive(Clone)]
pub struct AnthropicClient {
    http: Client,
    base_url: String,
}

impl AnthropicClient {
    /// Construct an authenticated client against the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// underlying HTTP client cannot be built.
    pub fn new(
        api_key: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> RemoteResult<Self> {
        let mut headers = HeaderMap::new();
        let mut key_value =
            HeaderValue::from_str(api_key).map_err(|err| RemoteError::InvalidRequest {
                operation: "client.new",
                detail: format!("api key is not a valid header value: {err}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert(HEADER_API_KEY, key_value);
        headers.insert(HEADER_VERSION, HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(HEADER_BETA, HeaderValue::from_static(ACTIVE_BETAS));

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| RemoteError::ClientBuild { source })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn files_url(&self) -> String {
        format!("{}/v1/files", self.base_url)
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/v1/files/{file_id}", self.base_url)
    }

    fn file_content_url(&self, file_id: &str) -> String {
        format!("{}/v1/files/{file_id}/content", self.base_url)
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

async fn ensure_success(
    operation: &'static str,
    url: &str,
    response: Response,
) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        operation,
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl FileStore for AnthropicClient {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        content: Bytes,
    ) -> RemoteResult<StoredFile> {
        const OPERATION: &str = "files.upload";
        let url = self.files_url();
        debug!(filename = %filename, "uploading file to remote store");

        let part = reqwest::multipart::Part::stream(content)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|err| RemoteError::InvalidRequest {
                operation: OPERATION,
                detail: format!("content type '{content_type}' is invalid: {err}"),
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                operation: OPERATION,
                url: url.clone(),
                source,
            })?;
        let response = ensure_success(OPERATION, &url, response).await?;
        let stored: StoredFile =
            response
                .json()
                .await
                .map_err(|source| RemoteError::Decode {
                    operation: OPERATION,
                    source,
                })?;
        info!(file_id = %stored.id, filename = %stored.filename, "file upload complete");
        Ok(stored)
    }

    async fn retrieve_metadata(&self, file_id: &str) -> RemoteResult<StoredFile> {
        const OPERATION: &str = "files.retrieve_metadata";
        let url = self.file_url(file_id);
        debug!(file_id = %file_id, "fetching file metadata");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                operation: OPERATION,
                url: url.clone(),
                source,
            })?;
        let response = ensure_success(OPERATION, &url, response).await?;
        response
            .json()
            .await
            .map_err(|source| RemoteError::Decode {
                operation: OPERATION,
                source,
            })
    }

    async fn list_files(&self) -> RemoteResult<Vec<StoredFile>> {
        const OPERATION: &str = "files.list";
        let url = self.files_url();

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                operation: OPERATION,
                url: url.clone(),
                source,
            })?;
        let response = ensure_success(OPERATION, &url, response).await?;
        let listing: FileListResponse =
            response
                .json()
                .await
                .map_err(|source| RemoteError::Decode {
                    operation: OPERATION,
                    source,
                })?;
        debug!(count = listing.data.len(), "listed remote files");
        Ok(listing.data)
    }

    async fn download(&self, file_id: &str) -> RemoteResult<Bytes> {
        const OPERATION: &str = "files.download";
        let url = self.file_content_url(file_id);
        debug!(file_id = %file_id, "downloading file content");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                operation: OPERATION,
                url: url.clone(),
                source,
            })?;
        let response = ensure_success(OPERATION, &url, response).await?;
        response
            .bytes()
            .await
            .map_err(|source| RemoteError::Decode {
                operation: OPERATION,
                source,
            })
    }
}

#[async_trait]
impl Generator for AnthropicClient {
    async fn generate(&self, request: MessageRequest) -> RemoteResult<MessageResponse> {
        const OPERATION: &str = "messages.create";
        let url = self.messages_url();
        let block_count = request
            .messages
            .first()
            .map_or(0, |message| message.content.len());
        info!(model = %request.model, blocks = block_count, "submitting generation request");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                operation: OPERATION,
                url: url.clone(),
                source,
            })?;
        let response = ensure_success(OPERATION, &url, response).await?;
        response
            .json()
            .await
            .map_err(|source| RemoteError::Decode {
                operation: OPERATION,
                source,
            })
    }
}
