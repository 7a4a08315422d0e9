//! HTTP internals: router, handlers, error mapping, and metrics plumbing.

pub(crate) mod errors;
pub(crate) mod files;
pub(crate) mod format;
pub(crate) mod health;
pub(crate) mod router;
pub(crate) mod telemetry;
