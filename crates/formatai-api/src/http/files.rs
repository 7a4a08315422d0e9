//! File listing endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::http::errors::ApiError;
use crate::models::{FileListResponse, FileView};
use crate::state::ApiState;

pub(crate) async fn list_files(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.transformer.list_files().await?;
    Ok(Json(FileListResponse {
        files: files.into_iter().map(FileView::from).collect(),
    }))
}
