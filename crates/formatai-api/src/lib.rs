#![forbid(unsafe_code)]

//! HTTP delivery surface for the FormatAI service.
//!
//! Layout: `models.rs` (shared DTOs), `state.rs` (application state),
//! `error.rs` (`ApiServerError`), `http/` (router, handlers, problem-details
//! mapping, metrics layer).

pub mod error;
pub mod models;
pub mod state;

mod http;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use state::ApiState;
