//! Prompt construction for transformation requests.
//!
//! The prompt is one instruction text block followed by a `container_upload`
//! block per source file (in input order) and one for the template, last.

use formatai_anthropic::PromptBlock;

use crate::model::{FileRef, RESULT_FILENAME};

/// Build the instruction text sent with every transformation request.
fn instruction_text() -> String {
    format!(
        "You are a data transformation specialist. Convert the data in the \
         source files into the format defined by the template file, using the \
         code-execution tool.\n\
         \n\
         Detailed instructions:\n\
         1. Analysis: examine the content and structure of every source file \
         and of the template file.\n\
         2. Mapping: decide how the columns of the source files map onto the \
         template columns. When names differ (for example \"Total Value\" vs \
         \"VLR_TOTAL\"), map them by meaning.\n\
         3. Script: write and run a Python script with `pandas` to read the \
         sources, process the data, and build a DataFrame matching the \
         template structure exactly. `openpyxl` and `xlrd` are available for \
         Excel files; use `xlrd` for legacy .xls and `openpyxl` for .xlsx.\n\
         4. Consolidation: when there are multiple source files, consolidate \
         everything into a single output file.\n\
         5. Output: save the final result as a file named `{RESULT_FILENAME}`. \
         This name is mandatory.\n\
         6. Completion: reply with only a short success message; producing \
         the file is what matters."
    )
}

/// Assemble the content blocks for a transformation: instruction text,
/// then every source (in order), then the template.
#[must_use]
pub fn formatting_blocks(sources: &[FileRef], template: &FileRef) -> Vec<PromptBlock> {
    let mut blocks = Vec::with_capacity(sources.len() + 2);
    blocks.push(PromptBlock::Text {
        text: instruction_text(),
    });
    for source in sources {
        blocks.push(PromptBlock::ContainerUpload {
            file_id: source.id.clone(),
        });
    }
    blocks.push(PromptBlock::ContainerUpload {
        file_id: template.id.clone(),
    });
    blocks
}
