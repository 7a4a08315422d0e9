//! Shared application state handed to every handler.

use formatai_core::Transformer;
use formatai_telemetry::Metrics;

/// Dependencies shared across the HTTP handlers.
pub struct ApiState {
    pub(crate) transformer: Transformer,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    /// Bundle the orchestrator and telemetry for the router.
    #[must_use]
    pub const fn new(transformer: Transformer, telemetry: Metrics) -> Self {
        Self {
            transformer,
            telemetry,
        }
    }
}
