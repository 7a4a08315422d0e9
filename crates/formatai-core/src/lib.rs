#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Transformation orchestration for the FormatAI service.
//!
//! Layout: `model.rs` (domain types), `prompt.rs` (instruction/prompt
//! construction), `transformer.rs` (the orchestrator), `error.rs`
//! (`TransformError`).

pub mod error;
pub mod model;
pub mod prompt;
pub mod transformer;

pub use error::{TransformError, TransformResult};
pub use model::{FileRef, NewFile, TransformationInputs, TransformationResult, RESULT_FILENAME};
pub use transformer::{Transformer, TransformerConfig};
