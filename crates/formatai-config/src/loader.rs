//! Environment parsing for application settings.
//!
//! A `.env` file in the working directory is honoured when present; process
//! environment variables always win.

use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{
    AnthropicSettings, DEFAULT_API_BASE_URL, DEFAULT_BIND_ADDR, DEFAULT_MAX_OUTPUT_TOKENS,
    DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT, HttpSettings, Settings,
};

const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
const ENV_BASE_URL: &str = "FORMATAI_API_BASE_URL";
const ENV_MODEL: &str = "FORMATAI_MODEL";
const ENV_MAX_OUTPUT_TOKENS: &str = "FORMATAI_MAX_OUTPUT_TOKENS";
const ENV_REQUEST_TIMEOUT_SECS: &str = "FORMATAI_REQUEST_TIMEOUT_SECS";
const ENV_BIND_ADDR: &str = "FORMATAI_BIND_ADDR";

/// Load settings from the process environment, consulting `.env` first.
///
/// # Errors
///
/// Returns an error if the API key is absent or any override fails to parse.
pub fn load_settings() -> ConfigResult<Settings> {
    let _ = dotenvy::dotenv();
    settings_from_lookup(|name| std::env::var(name).ok())
}

fn settings_from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> ConfigResult<Settings> {
    let api_key = lookup(ENV_API_KEY)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingEnv { name: ENV_API_KEY })?;

    let base_url = lookup(ENV_BASE_URL)
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let model = lookup(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let max_output_tokens = match lookup(ENV_MAX_OUTPUT_TOKENS) {
        Some(raw) => parse_env(ENV_MAX_OUTPUT_TOKENS, &raw, "not_a_u32")?,
        None => DEFAULT_MAX_OUTPUT_TOKENS,
    };

    let request_timeout = match lookup(ENV_REQUEST_TIMEOUT_SECS) {
        Some(raw) => Duration::from_secs(parse_env(ENV_REQUEST_TIMEOUT_SECS, &raw, "not_a_u64")?),
        None => DEFAULT_REQUEST_TIMEOUT,
    };

    let bind_raw = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let bind_addr = bind_raw
        .parse()
        .map_err(|_| ConfigError::InvalidEnv {
            name: ENV_BIND_ADDR,
            value: bind_raw,
            reason: "not_a_socket_addr",
        })?;

    Ok(Settings {
        anthropic: AnthropicSettings {
            api_key,
            base_url,
            model,
            max_output_tokens,
            request_timeout,
        },
        http: HttpSettings { bind_addr },
    })
}

fn parse_env<T: std::str::FromStr>(
    name: &'static str,
    raw: &str,
    reason: &'static str,
) -> ConfigResult<T> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: raw.to_string(),
        reason,
    })
}
