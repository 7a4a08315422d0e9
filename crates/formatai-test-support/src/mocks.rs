//! In-memory doubles for the remote file store and generation clients.
//!
//! Every call is recorded so tests can assert on call counts and ordering;
//! uploads can be given per-call latency to prove that recombination happens
//! by input order rather than completion order.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use formatai_anthropic::{
    FileStore, Generator, MessageRequest, MessageResponse, RemoteError, RemoteResult, StoredFile,
};
use tokio::sync::Mutex;

/// In-memory [`FileStore`] double.
///
/// Uploaded files receive the identifier `up-<filename>`; pre-seeded files
/// keep whatever identifier they were inserted with. Listings return files
/// in insertion order so tests can assert that consumers preserve the order
/// the store handed back.
#[derive(Default)]
pub struct MemoryFileStore {
    files: Mutex<Vec<StoredFile>>,
    contents: Mutex<HashMap<String, Bytes>>,
    upload_delays: Mutex<VecDeque<Duration>>,
    uploads: Mutex<Vec<String>>,
    metadata_lookups: Mutex<Vec<String>>,
    downloads: Mutex<Vec<String>>,
    list_calls: Mutex<u32>,
}

impl MemoryFileStore {
    /// Construct an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file that "already exists" in the remote store.
    pub async fn seed_file(&self, file: StoredFile, content: Bytes) {
        self.contents
            .lock()
            .await
            .insert(file.id.clone(), content);
        Self::insert_file(&mut *self.files.lock().await, file);
    }

    /// Replace any file sharing the identifier, appending otherwise.
    fn insert_file(files: &mut Vec<StoredFile>, file: StoredFile) {
        files.retain(|existing| existing.id != file.id);
        files.push(file);
    }

    /// Queue per-upload latencies, consumed in upload-invocation order.
    pub async fn set_upload_delays(&self, delays: Vec<Duration>) {
        *self.upload_delays.lock().await = delays.into();
    }

    /// Filenames passed to `upload`, in invocation order.
    pub async fn uploaded_filenames(&self) -> Vec<String> {
        self.uploads.lock().await.clone()
    }

    /// Number of `upload` invocations.
    pub async fn upload_calls(&self) -> usize {
        self.uploads.lock().await.len()
    }

    /// Identifiers passed to `retrieve_metadata`, in invocation order.
    pub async fn metadata_lookups(&self) -> Vec<String> {
        self.metadata_lookups.lock().await.clone()
    }

    /// Identifiers passed to `download`, in invocation order.
    pub async fn download_calls(&self) -> Vec<String> {
        self.downloads.lock().await.clone()
    }

    /// Total number of remote calls observed by this double.
    pub async fn total_calls(&self) -> usize {
        self.uploads.lock().await.len()
            + self.metadata_lookups.lock().await.len()
            + self.downloads.lock().await.len()
            + *self.list_calls.lock().await as usize
    }

    fn missing(operation: &'static str, file_id: &str) -> RemoteError {
        RemoteError::Status {
            operation,
            url: format!("memory:///{file_id}"),
            status: 404,
            body: "file not found".to_string(),
        }
    }
}

/// Build a [`StoredFile`] fixture with the given identity and timestamp.
#[must_use]
pub fn stored_file(id: &str, filename: &str, created_at: DateTime<Utc>) -> StoredFile {
    StoredFile {
        id: id.to_string(),
        filename: filename.to_string(),
        size_bytes: 64,
        created_at,
        downloadable: true,
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn upload(
        &self,
        filename: &str,
        _content_type: &str,
        content: Bytes,
    ) -> RemoteResult<StoredFile> {
        self.uploads.lock().await.push(filename.to_string());
        let delay = self.upload_delays.lock().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let file = StoredFile {
            id: format!("up-{filename}"),
            filename: filename.to_string(),
            size_bytes: u64::try_from(content.len()).unwrap_or(u64::MAX),
            created_at: Utc::now(),
            downloadable: true,
        };
        self.contents
            .lock()
            .await
            .insert(file.id.clone(), content);
        Self::insert_file(&mut *self.files.lock().await, file.clone());
        Ok(file)
    }

    async fn retrieve_metadata(&self, file_id: &str) -> RemoteResult<StoredFile> {
        self.metadata_lookups.lock().await.push(file_id.to_string());
        self.files
            .lock()
            .await
            .iter()
            .find(|file| file.id == file_id)
            .cloned()
            .ok_or_else(|| Self::missing("files.retrieve_metadata", file_id))
    }

    async fn list_files(&self) -> RemoteResult<Vec<StoredFile>> {
        *self.list_calls.lock().await += 1;
        Ok(self.files.lock().await.clone())
    }

    async fn download(&self, file_id: &str) -> RemoteResult<Bytes> {
        self.downloads.lock().await.push(file_id.to_string());
        self.contents
            .lock()
            .await
            .get(file_id)
            .cloned()
            .ok_or_else(|| Self::missing("files.download", file_id))
    }
}

/// [`Generator`] double that replays a queue of scripted responses.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<RemoteResult<MessageResponse>>>,
    requests: Mutex<Vec<MessageRequest>>,
}

impl ScriptedGenerator {
    /// Construct a generator with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next response to replay.
    pub async fn push_response(&self, response: RemoteResult<MessageResponse>) {
        self.responses.lock().await.push_back(response);
    }

    /// Requests observed so far, in invocation order.
    pub async fn requests(&self) -> Vec<MessageRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of `generate` invocations.
    pub async fn calls(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, request: MessageRequest) -> RemoteResult<MessageResponse> {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Err(RemoteError::InvalidRequest {
                    operation: "messages.create",
                    detail: "no scripted response queued".to_string(),
                })
            })
    }
}
