//! The transformation orchestrator.
//!
//! Drives one transformation end to end: validate inputs, stage files in the
//! remote store, run a single generation turn with the code-execution tool,
//! extract the produced artifact, and download it.

use std::sync::Arc;

use futures_util::future::try_join_all;
use futures_util::try_join;
use tracing::info;

use formatai_anthropic::{
    ContentBlock, FileStore, Generator, MessageRequest, RemoteError, ResultBlock, StoredFile,
    ToolResultPayload,
};

use crate::error::{TransformError, TransformResult};
use crate::model::{
    FileRef, NewFile, TransformationInputs, TransformationResult, RESULT_FILENAME,
};
use crate::prompt::formatting_blocks;

/// Generation parameters applied to every transformation.
#[derive(Debug, Clone)]
pub struct TransformerConfig {
    /// Model identifier.
    pub model: String,
    /// Output-token budget per request.
    pub max_output_tokens: u32,
}

/// Orchestrates transformations against a file store and a generator.
#[derive(Clone)]
pub struct Transformer {
    store: Arc<dyn FileStore>,
    generator: Arc<dyn Generator>,
    config: TransformerConfig,
}

impl Transformer {
    /// Wire the orchestrator to its remote clients.
    #[must_use]
    pub fn new(
        store: Arc<dyn FileStore>,
        generator: Arc<dyn Generator>,
        config: TransformerConfig,
    ) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    /// List every file in the remote store, newest first.
    ///
    /// The sort is stable, so files sharing a timestamp keep the order the
    /// store returned them in.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Remote`] when the store listing fails.
    pub async fn list_files(&self) -> TransformResult<Vec<StoredFile>> {
        let mut files = self
            .store
            .list_files()
            .await
            .map_err(|err| TransformError::remote("files.list", err))?;
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    /// Run one transformation end to end.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Validation`] when the inputs are rejected
    /// before any remote call, [`TransformError::Remote`] when staging,
    /// generation, or retrieval fails upstream, and
    /// [`TransformError::Extraction`] when the generation turn finishes
    /// without producing the required output file.
    pub async fn transform(
        &self,
        inputs: &TransformationInputs,
    ) -> TransformResult<TransformationResult> {
        inputs.validate()?;

        let (uploaded, resolved) = try_join!(
            try_join_all(
                inputs
                    .new_source_files
                    .iter()
                    .map(|file| self.upload_file(file)),
            ),
            try_join_all(
                inputs
                    .existing_source_ids
                    .iter()
                    .map(|id| self.resolve_file(id)),
            ),
        )
        .map_err(|(operation, err)| TransformError::remote(operation, err))?;

        let template = self
            .resolve_template(inputs)
            .await
            .map_err(|(operation, err)| TransformError::remote(operation, err))?;

        let mut sources = uploaded;
        sources.extend(resolved);
        info!(
            source_count = sources.len(),
            template_id = %template.id,
            "staged transformation inputs"
        );

        let request = MessageRequest::single_user_turn(
            self.config.model.clone(),
            self.config.max_output_tokens,
            formatting_blocks(&sources, &template),
        );
        let response = self
            .generator
            .generate(request)
            .await
            .map_err(|err| TransformError::remote("messages.create", err))?;

        let output_id = extract_output_file_id(&response.content)?;
        info!(file_id = %output_id, "generation produced the expected artifact");

        let (metadata, content) = try_join!(
            async {
                self.store
                    .retrieve_metadata(&output_id)
                    .await
                    .map_err(|err| TransformError::remote("files.retrieve_metadata", err))
            },
            async {
                self.store
                    .download(&output_id)
                    .await
                    .map_err(|err| TransformError::remote("files.download", err))
            },
        )?;

        Ok(TransformationResult {
            content,
            filename: metadata.filename,
        })
    }

    async fn upload_file(&self, file: &NewFile) -> Result<FileRef, (&'static str, RemoteError)> {
        let stored = self
            .store
            .upload(&file.filename, &file.content_type, file.content.clone())
            .await
            .map_err(|err| ("files.upload", err))?;
        Ok(FileRef {
            id: stored.id,
            filename: stored.filename,
        })
    }

    async fn resolve_file(&self, file_id: &str) -> Result<FileRef, (&'static str, RemoteError)> {
        let stored = self
            .store
            .retrieve_metadata(file_id)
            .await
            .map_err(|err| ("files.retrieve_metadata", err))?;
        Ok(FileRef {
            id: stored.id,
            filename: stored.filename,
        })
    }

    async fn resolve_template(
        &self,
        inputs: &TransformationInputs,
    ) -> Result<FileRef, (&'static str, RemoteError)> {
        if let Some(file) = &inputs.new_template_file {
            return self.upload_file(file).await;
        }
        // validate() guarantees exactly one branch is populated.
        let id = inputs
            .existing_template_id
            .as_deref()
            .unwrap_or_default();
        self.resolve_file(id).await
    }
}

/// Find the identifier of the first output file named [`RESULT_FILENAME`].
///
/// When no such file exists, the error carries every text block the model
/// emitted so the caller can see what went wrong.
fn extract_output_file_id(blocks: &[ContentBlock]) -> TransformResult<String> {
    for block in blocks {
        let ContentBlock::CodeExecutionToolResult {
            content: ToolResultPayload::Result { content },
        } = block
        else {
            continue;
        };
        for result in content {
            if let ResultBlock::OutputFile { filename, file_id } = result
                && filename == RESULT_FILENAME
            {
                return Ok(file_id.clone());
            }
        }
    }

    let commentary: Vec<&str> = blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    Err(TransformError::Extraction {
        detail: format!(
            "no output file named {RESULT_FILENAME} was produced; model said: {}",
            commentary.join(" ")
        ),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use chrono::{TimeZone, Utc};
    use formatai_anthropic::{MessageResponse, PromptBlock, RemoteError};
    use formatai_test_support::mocks::stored_file;
    use formatai_test_support::{MemoryFileStore, ScriptedGenerator};

    use super::*;

    fn config() -> TransformerConfig {
        TransformerConfig {
            model: "claude-haiku-4-5".to_string(),
            max_output_tokens: 4096,
        }
    }

    fn new_file(filename: &str) -> NewFile {
        NewFile {
            filename: filename.to_string(),
            content_type: "text/csv".to_string(),
            content: Bytes::from_static(b"col_a,col_b\n1,2\n"),
        }
    }

    fn success_response(output_id: &str) -> MessageResponse {
        MessageResponse {
            content: vec![
                ContentBlock::Text {
                    text: "File generated successfully.".to_string(),
                },
                ContentBlock::CodeExecutionToolResult {
                    content: ToolResultPayload::Result {
                        content: vec![
                            ResultBlock::Other,
                            ResultBlock::OutputFile {
                                filename: RESULT_FILENAME.to_string(),
                                file_id: output_id.to_string(),
                            },
                        ],
                    },
                },
            ],
        }
    }

    fn harness() -> (Arc<MemoryFileStore>, Arc<ScriptedGenerator>, Transformer) {
        let store = Arc::new(MemoryFileStore::new());
        let generator = Arc::new(ScriptedGenerator::new());
        let transformer = Transformer::new(store.clone(), generator.clone(), config());
        (store, generator, transformer)
    }

    async fn seed_output(store: &MemoryFileStore, id: &str) {
        store
            .seed_file(
                stored_file(id, RESULT_FILENAME, Utc::now()),
                Bytes::from_static(b"xlsx-bytes"),
            )
            .await;
    }

    #[tokio::test]
    async fn validation_failure_makes_no_remote_calls() {
        let (store, generator, transformer) = harness();

        let inputs = TransformationInputs {
            new_source_files: vec![new_file("a.csv")],
            new_template_file: Some(new_file("t.xlsx")),
            existing_template_id: Some("file_t".to_string()),
            ..TransformationInputs::default()
        };
        let err = transformer.transform(&inputs).await.expect_err("must fail");

        assert!(matches!(err, TransformError::Validation { .. }));
        assert_eq!(store.total_calls().await, 0);
        assert_eq!(generator.calls().await, 0);
    }

    #[tokio::test]
    async fn empty_sources_make_no_remote_calls() {
        let (store, generator, transformer) = harness();

        let inputs = TransformationInputs {
            new_template_file: Some(new_file("t.xlsx")),
            ..TransformationInputs::default()
        };
        let err = transformer.transform(&inputs).await.expect_err("must fail");

        assert!(
            matches!(err, TransformError::Validation { reason, .. } if reason == "empty_sources")
        );
        assert_eq!(store.total_calls().await, 0);
        assert_eq!(generator.calls().await, 0);
    }

    #[tokio::test]
    async fn prompt_preserves_input_order_despite_upload_skew() -> TransformResult<()> {
        let (store, generator, transformer) = harness();
        // First upload finishes last.
        store
            .set_upload_delays(vec![
                Duration::from_millis(40),
                Duration::from_millis(5),
                Duration::from_millis(1),
            ])
            .await;
        store
            .seed_file(
                stored_file("file_c", "c.csv", Utc::now()),
                Bytes::from_static(b"seeded"),
            )
            .await;
        seed_output(&store, "file_out").await;
        generator.push_response(Ok(success_response("file_out"))).await;

        let inputs = TransformationInputs {
            new_source_files: vec![new_file("a.csv"), new_file("b.csv")],
            new_template_file: Some(new_file("template.xlsx")),
            existing_source_ids: vec!["file_c".to_string()],
            ..TransformationInputs::default()
        };
        transformer.transform(&inputs).await?;

        let requests = generator.requests().await;
        assert_eq!(requests.len(), 1);
        let uploads: Vec<String> = requests[0].messages[0]
            .content
            .iter()
            .filter_map(|block| match block {
                PromptBlock::ContainerUpload { file_id } => Some(file_id.clone()),
                PromptBlock::Text { .. } => None,
            })
            .collect();
        assert_eq!(uploads, vec!["up-a.csv", "up-b.csv", "file_c", "up-template.xlsx"]);
        Ok(())
    }

    #[tokio::test]
    async fn success_returns_downloaded_bytes_and_stored_filename() -> TransformResult<()> {
        let (store, generator, transformer) = harness();
        seed_output(&store, "file_out").await;
        generator.push_response(Ok(success_response("file_out"))).await;

        let inputs = TransformationInputs {
            new_source_files: vec![new_file("a.csv")],
            new_template_file: Some(new_file("template.xlsx")),
            ..TransformationInputs::default()
        };
        let result = transformer.transform(&inputs).await?;

        assert_eq!(result.content, Bytes::from_static(b"xlsx-bytes"));
        assert_eq!(result.filename, RESULT_FILENAME);
        assert_eq!(store.download_calls().await, vec!["file_out".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn existing_template_resolves_via_metadata() -> TransformResult<()> {
        let (store, generator, transformer) = harness();
        store
            .seed_file(
                stored_file("file_t", "template.xlsx", Utc::now()),
                Bytes::from_static(b"seeded"),
            )
            .await;
        seed_output(&store, "file_out").await;
        generator.push_response(Ok(success_response("file_out"))).await;

        let inputs = TransformationInputs {
            new_source_files: vec![new_file("a.csv")],
            existing_template_id: Some("file_t".to_string()),
            ..TransformationInputs::default()
        };
        transformer.transform(&inputs).await?;

        let lookups = store.metadata_lookups().await;
        assert!(lookups.contains(&"file_t".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn missing_artifact_reports_model_commentary() {
        let (store, generator, transformer) = harness();
        generator
            .push_response(Ok(MessageResponse {
                content: vec![
                    ContentBlock::Text {
                        text: "I could not read the template.".to_string(),
                    },
                    ContentBlock::Text {
                        text: "The file appears corrupted.".to_string(),
                    },
                ],
            }))
            .await;

        let inputs = TransformationInputs {
            new_source_files: vec![new_file("a.csv")],
            new_template_file: Some(new_file("template.xlsx")),
            ..TransformationInputs::default()
        };
        let err = transformer.transform(&inputs).await.expect_err("must fail");

        match err {
            TransformError::Extraction { detail } => {
                assert!(detail.contains(RESULT_FILENAME));
                assert!(detail.contains("could not read the template"));
                assert!(detail.contains("appears corrupted"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.download_calls().await, Vec::<String>::new());
    }

    #[tokio::test]
    async fn wrong_filename_is_not_extracted() {
        let (_store, generator, transformer) = harness();
        generator
            .push_response(Ok(MessageResponse {
                content: vec![ContentBlock::CodeExecutionToolResult {
                    content: ToolResultPayload::Result {
                        content: vec![ResultBlock::OutputFile {
                            filename: "other.xlsx".to_string(),
                            file_id: "file_wrong".to_string(),
                        }],
                    },
                }],
            }))
            .await;

        let inputs = TransformationInputs {
            new_source_files: vec![new_file("a.csv")],
            new_template_file: Some(new_file("template.xlsx")),
            ..TransformationInputs::default()
        };
        let err = transformer.transform(&inputs).await.expect_err("must fail");

        assert!(matches!(err, TransformError::Extraction { .. }));
    }

    #[tokio::test]
    async fn generation_failure_surfaces_as_remote_error() {
        let (_store, generator, transformer) = harness();
        generator
            .push_response(Err(RemoteError::Status {
                operation: "messages.create",
                url: "https://api.example/v1/messages".to_string(),
                status: 529,
                body: "overloaded".to_string(),
            }))
            .await;

        let inputs = TransformationInputs {
            new_source_files: vec![new_file("a.csv")],
            new_template_file: Some(new_file("template.xlsx")),
            ..TransformationInputs::default()
        };
        let err = transformer.transform(&inputs).await.expect_err("must fail");

        assert!(
            matches!(err, TransformError::Remote { operation, .. } if operation == "messages.create")
        );
    }

    #[tokio::test]
    async fn repeated_runs_re_stage_everything() -> TransformResult<()> {
        let (store, generator, transformer) = harness();
        seed_output(&store, "file_out").await;
        generator.push_response(Ok(success_response("file_out"))).await;
        generator.push_response(Ok(success_response("file_out"))).await;

        let inputs = TransformationInputs {
            new_source_files: vec![new_file("a.csv")],
            new_template_file: Some(new_file("template.xlsx")),
            ..TransformationInputs::default()
        };
        transformer.transform(&inputs).await?;
        let uploads_after_first = store.upload_calls().await;
        transformer.transform(&inputs).await?;

        assert_eq!(store.upload_calls().await, uploads_after_first * 2);
        assert_eq!(generator.calls().await, 2);
        Ok(())
    }

    #[tokio::test]
    async fn listing_sorts_newest_first() -> TransformResult<()> {
        let (store, _generator, transformer) = harness();
        let older = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap();
        let newer = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().unwrap();
        store
            .seed_file(stored_file("file_old", "old.csv", older), Bytes::new())
            .await;
        store
            .seed_file(stored_file("file_new", "new.csv", newer), Bytes::new())
            .await;

        let files = transformer.list_files().await?;

        let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["file_new", "file_old"]);
        Ok(())
    }

    #[tokio::test]
    async fn listing_keeps_store_order_for_equal_timestamps() -> TransformResult<()> {
        let (store, _generator, transformer) = harness();
        let shared = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).single().unwrap();
        let newer = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().unwrap();
        store
            .seed_file(stored_file("file_tie_a", "a.csv", shared), Bytes::new())
            .await;
        store
            .seed_file(stored_file("file_tie_b", "b.csv", shared), Bytes::new())
            .await;
        store
            .seed_file(stored_file("file_new", "new.csv", newer), Bytes::new())
            .await;

        let files = transformer.list_files().await?;

        let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["file_new", "file_tie_a", "file_tie_b"]);
        Ok(())
    }
}
