//! Domain types for transformation requests and results.

use bytes::Bytes;

use crate::error::{TransformError, TransformResult};

/// Filename the generated artifact must carry. Extraction rejects any
/// output file with a different name.
pub const RESULT_FILENAME: &str = "resultado_formatado.xlsx";

/// Reference to a file already present in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Store-assigned identifier.
    pub id: String,
    /// Filename recorded by the store.
    pub filename: String,
}

/// A file submitted with the request, not yet uploaded.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Client-supplied filename.
    pub filename: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Raw file bytes.
    pub content: Bytes,
}

/// Everything a transformation request can carry: fresh uploads and
/// references to files already in the store, for both sources and template.
#[derive(Debug, Clone, Default)]
pub struct TransformationInputs {
    /// Source files to upload.
    pub new_source_files: Vec<NewFile>,
    /// Template file to upload, if the caller sent one.
    pub new_template_file: Option<NewFile>,
    /// Identifiers of already-stored source files.
    pub existing_source_ids: Vec<String>,
    /// Identifier of an already-stored template, if the caller chose one.
    pub existing_template_id: Option<String>,
}

impl TransformationInputs {
    /// Check request preconditions. Runs before any remote call.
    ///
    /// Exactly one template must be designated, and at least one source must
    /// be present across the new and existing sets.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Validation`] when the template selection is
    /// ambiguous or absent, or when no source files were supplied.
    pub fn validate(&self) -> TransformResult<()> {
        match (&self.new_template_file, &self.existing_template_id) {
            (Some(_), Some(_)) => {
                return Err(TransformError::validation(
                    "template_selection",
                    "provide either a new template file or an existing template id, not both",
                ));
            }
            (None, None) => {
                return Err(TransformError::validation(
                    "template_selection",
                    "a template is required: upload one or reference an existing id",
                ));
            }
            _ => {}
        }

        if self.new_source_files.is_empty() && self.existing_source_ids.is_empty() {
            return Err(TransformError::validation(
                "empty_sources",
                "at least one source file is required",
            ));
        }

        Ok(())
    }
}

/// Outcome of a successful transformation.
#[derive(Debug, Clone)]
pub struct TransformationResult {
    /// Bytes of the generated spreadsheet.
    pub content: Bytes,
    /// Filename reported by the store for the generated file.
    pub filename: String,
}
