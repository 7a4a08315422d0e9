//! Wire-level models for the Files API and Messages API.
//!
//! Response content is modelled as tagged unions so the orchestrator can
//! pattern-match instead of probing loosely-typed fields; unknown block
//! shapes deserialize into `Other` rather than failing the whole response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing a file held by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Store-assigned opaque identifier.
    pub id: String,
    /// Original filename, informational only.
    pub filename: String,
    /// Size of the stored content in bytes.
    pub size_bytes: u64,
    /// Creation timestamp assigned by the store.
    pub created_at: DateTime<Utc>,
    /// Whether the store allows downloading this file.
    pub downloadable: bool,
}

/// Envelope returned by the file listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    /// Files known to the store, in the order the API returned them.
    pub data: Vec<StoredFile>,
}

/// One block of a user prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromptBlock {
    /// Plain instruction text.
    Text {
        /// The instruction body.
        text: String,
    },
    /// Reference to a previously uploaded file, mounted into the
    /// code-execution container.
    ContainerUpload {
        /// Store identifier of the referenced file.
        file_id: String,
    },
}

/// A single prompt message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Message role; always `user` for transformation requests.
    pub role: String,
    /// Ordered content blocks.
    pub content: Vec<PromptBlock>,
}

/// Tool made available to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    /// Versioned tool type identifier.
    #[serde(rename = "type")]
    pub kind: String,
    /// Tool name referenced by the model.
    pub name: String,
}

impl ToolDeclaration {
    /// The sandboxed code-execution tool used for every transformation.
    #[must_use]
    pub fn code_execution() -> Self {
        Self {
            kind: "code_execution_20250825".to_string(),
            name: "code_execution".to_string(),
        }
    }
}

/// A complete generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    /// Model identifier.
    pub model: String,
    /// Output-token budget.
    pub max_tokens: u32,
    /// Prompt messages.
    pub messages: Vec<PromptMessage>,
    /// Tools enabled for this request.
    pub tools: Vec<ToolDeclaration>,
}

impl MessageRequest {
    /// Build a single-turn user request with the code-execution tool enabled.
    #[must_use]
    pub fn single_user_turn(model: String, max_tokens: u32, content: Vec<PromptBlock>) -> Self {
        Self {
            model,
            max_tokens,
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content,
            }],
            tools: vec![ToolDeclaration::code_execution()],
        }
    }
}

/// One block of a generation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Plain text emitted by the model.
    #[serde(rename = "text")]
    Text {
        /// The text body.
        text: String,
    },
    /// Result of a sandboxed code-execution tool call.
    #[serde(rename = "bash_code_execution_tool_result")]
    CodeExecutionToolResult {
        /// Nested execution payload.
        content: ToolResultPayload,
    },
    /// Any block shape this client does not interpret.
    #[serde(other)]
    Other,
}

/// Payload nested inside a code-execution tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolResultPayload {
    /// A completed execution with its emitted blocks.
    #[serde(rename = "bash_code_execution_result")]
    Result {
        /// Blocks produced by the execution, in order.
        content: Vec<ResultBlock>,
    },
    /// Any payload shape this client does not interpret.
    #[serde(other)]
    Other,
}

/// One block emitted by a code execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResultBlock {
    /// A file written by the executed script and persisted to the store.
    #[serde(rename = "bash_code_execution_output_file")]
    OutputFile {
        /// Filename the script wrote.
        filename: String,
        /// Store identifier of the persisted file.
        file_id: String,
    },
    /// Any block shape this client does not interpret.
    #[serde(other)]
    Other,
}

/// A complete generation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Ordered response blocks.
    pub content: Vec<ContentBlock>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serialises_with_tagged_blocks() -> serde_json::Result<()> {
        let request = MessageRequest::single_user_turn(
            "claude-haiku-4-5".to_string(),
            4096,
            vec![
                PromptBlock::Text {
                    text: "convert these".to_string(),
                },
                PromptBlock::ContainerUpload {
                    file_id: "file_abc".to_string(),
                },
            ],
        );

        let value = serde_json::to_value(&request)?;
        assert_eq!(value["model"], "claude-haiku-4-5");
        assert_eq!(value["max_tokens"], 4096);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"][0]["type"], "text");
        assert_eq!(
            value["messages"][0]["content"][1],
            json!({"type": "container_upload", "file_id": "file_abc"})
        );
        assert_eq!(value["tools"][0]["type"], "code_execution_20250825");
        assert_eq!(value["tools"][0]["name"], "code_execution");
        Ok(())
    }

    #[test]
    fn response_blocks_deserialize_into_variants() -> serde_json::Result<()> {
        let payload = json!({
            "content": [
                {"type": "text", "text": "done"},
                {
                    "type": "bash_code_execution_tool_result",
                    "content": {
                        "type": "bash_code_execution_result",
                        "content": [
                            {"type": "bash_code_execution_output_file",
                             "filename": "resultado_formatado.xlsx",
                             "file_id": "file_out"},
                            {"type": "bash_code_execution_output", "stdout": "ok"}
                        ]
                    }
                },
                {"type": "server_tool_use", "id": "tool_1"}
            ]
        });

        let response: MessageResponse = serde_json::from_value(payload)?;
        assert_eq!(response.content.len(), 3);
        assert!(matches!(&response.content[0], ContentBlock::Text { text } if text == "done"));
        match &response.content[1] {
            ContentBlock::CodeExecutionToolResult {
                content: ToolResultPayload::Result { content },
            } => {
                assert!(matches!(
                    &content[0],
                    ResultBlock::OutputFile { filename, file_id }
                        if filename == "resultado_formatado.xlsx" && file_id == "file_out"
                ));
                assert!(matches!(&content[1], ResultBlock::Other));
            }
            other => panic!("unexpected block: {other:?}"),
        }
        assert!(matches!(&response.content[2], ContentBlock::Other));
        Ok(())
    }
}
