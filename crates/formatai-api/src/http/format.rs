//! Transformation endpoint: multipart intake and spreadsheet delivery.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::Response,
};
use formatai_core::{NewFile, TransformError, TransformationInputs};
use tracing::{error, info};

use crate::http::errors::ApiError;
use crate::state::ApiState;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub(crate) async fn format_spreadsheets(
    State(state): State<Arc<ApiState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let inputs = collect_inputs(multipart).await?;
    let upload_count =
        inputs.new_source_files.len() + usize::from(inputs.new_template_file.is_some());

    match state.transformer.transform(&inputs).await {
        Ok(result) => {
            for _ in 0..upload_count {
                state.telemetry.inc_file_uploaded();
            }
            state.telemetry.inc_transformation("success");
            info!(
                filename = %result.filename,
                size_bytes = result.content.len(),
                "transformation completed"
            );
            attachment_response(&result.filename, result.content)
        }
        Err(err) => {
            state.telemetry.inc_transformation(outcome_label(&err));
            Err(err.into())
        }
    }
}

const fn outcome_label(err: &TransformError) -> &'static str {
    match err {
        TransformError::Validation { .. } => "validation_rejected",
        TransformError::Remote { .. } => "remote_failed",
        TransformError::Extraction { .. } => "extraction_failed",
    }
}

fn attachment_response(filename: &str, content: bytes::Bytes) -> Result<Response, ApiError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(content))
        .map_err(|err| {
            error!(error = %err, "failed to build attachment response");
            ApiError::internal("failed to build attachment response")
        })
}

/// Drain the multipart stream into transformation inputs.
///
/// File parts without a filename are skipped, matching the behaviour of an
/// empty optional upload field in browser forms. Unknown part names are
/// ignored.
pub(crate) async fn collect_inputs(
    mut multipart: Multipart,
) -> Result<TransformationInputs, ApiError> {
    let mut inputs = TransformationInputs::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("malformed multipart payload: {err}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "source_files" => {
                if let Some(file) = read_file_part(field).await? {
                    inputs.new_source_files.push(file);
                }
            }
            "template_file" => {
                if let Some(file) = read_file_part(field).await? {
                    inputs.new_template_file = Some(file);
                }
            }
            "existing_source_ids" => {
                let value = read_text_part(&name, field).await?;
                if !value.is_empty() {
                    inputs.existing_source_ids.push(value);
                }
            }
            "existing_template_id" => {
                let value = read_text_part(&name, field).await?;
                if !value.is_empty() {
                    inputs.existing_template_id = Some(value);
                }
            }
            _ => {}
        }
    }

    Ok(inputs)
}

async fn read_file_part(field: axum::extract::multipart::Field<'_>) -> Result<Option<NewFile>, ApiError> {
    let filename = field
        .file_name()
        .map(str::to_string)
        .filter(|name| !name.is_empty());
    let Some(filename) = filename else {
        return Ok(None);
    };
    let content_type = field
        .content_type()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string();
    let content = field.bytes().await.map_err(|err| {
        ApiError::bad_request(format!("failed to read uploaded file {filename}: {err}"))
    })?;
    Ok(Some(NewFile {
        filename,
        content_type,
        content,
    }))
}

async fn read_text_part(
    name: &str,
    field: axum::extract::multipart::Field<'_>,
) -> Result<String, ApiError> {
    let value = field
        .text()
        .await
        .map_err(|err| ApiError::bad_request(format!("failed to read field {name}: {err}")))?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{Request, header};

    use super::*;

    const BOUNDARY: &str = "collect-inputs-boundary";

    async fn parse(body: String) -> Result<TransformationInputs, ApiError> {
        let request = Request::builder()
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request");
        let multipart = Multipart::from_request(request, &())
            .await
            .expect("multipart extractor");
        collect_inputs(multipart).await
    }

    fn file_part(name: &str, filename: &str, content: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
        )
    }

    fn text_part(name: &str, value: &str) -> String {
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
    }

    fn closing() -> String {
        format!("--{BOUNDARY}--\r\n")
    }

    #[tokio::test]
    async fn collects_files_ids_and_template() {
        let body = [
            file_part("source_files", "a.csv", "one"),
            file_part("source_files", "b.csv", "two"),
            text_part("existing_source_ids", "file_c"),
            file_part("template_file", "modelo.xlsx", "tpl"),
            text_part("ignored_field", "noise"),
        ]
        .concat()
            + &closing();

        let inputs = parse(body).await.expect("inputs");

        let names: Vec<&str> = inputs
            .new_source_files
            .iter()
            .map(|file| file.filename.as_str())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
        assert_eq!(inputs.new_source_files[0].content_type, "text/csv");
        assert_eq!(inputs.existing_source_ids, vec!["file_c".to_string()]);
        assert_eq!(
            inputs
                .new_template_file
                .as_ref()
                .map(|file| file.filename.as_str()),
            Some("modelo.xlsx")
        );
        assert!(inputs.existing_template_id.is_none());
    }

    #[tokio::test]
    async fn skips_file_parts_without_filenames_and_blank_ids() {
        let body = [
            file_part("source_files", "", "empty"),
            text_part("existing_source_ids", "   "),
            text_part("existing_template_id", " file_t "),
        ]
        .concat()
            + &closing();

        let inputs = parse(body).await.expect("inputs");

        assert!(inputs.new_source_files.is_empty());
        assert!(inputs.existing_source_ids.is_empty());
        assert_eq!(inputs.existing_template_id.as_deref(), Some("file_t"));
    }
}
