//! Typed settings consumed by the application bootstrap.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Serialize;

/// Default Anthropic API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.anthropic.com";

/// Default model used for transformation requests.
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5";

/// Default output-token budget for a single generation.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;

/// Default HTTP client timeout for remote calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Default listener address for the HTTP surface.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Settings governing the remote Anthropic clients.
#[derive(Debug, Clone)]
pub struct AnthropicSettings {
    /// API key presented on every remote call.
    pub api_key: String,
    /// Base URL of the remote API.
    pub base_url: String,
    /// Model identifier submitted with generation requests.
    pub model: String,
    /// Output-token budget for a single generation.
    pub max_output_tokens: u32,
    /// Timeout applied to each remote call.
    pub request_timeout: Duration,
}

/// Settings governing the inbound HTTP listener.
#[derive(Debug, Clone, Serialize)]
pub struct HttpSettings {
    /// Socket address the API listener binds to.
    pub bind_addr: SocketAddr,
}

/// Aggregate application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Remote client settings.
    pub anthropic: AnthropicSettings,
    /// Inbound listener settings.
    pub http: HttpSettings,
}
