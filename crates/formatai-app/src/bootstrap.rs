//! Environment loading and service wiring for the FormatAI binary.

use std::sync::Arc;

use formatai_anthropic::{AnthropicClient, FileStore, Generator};
use formatai_api::ApiServer;
use formatai_config::{Settings, load_settings};
use formatai_core::{Transformer, TransformerConfig};
use formatai_telemetry::{LoggingConfig, Metrics};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Dependencies required to bootstrap the FormatAI application.
pub(crate) struct BootstrapDependencies {
    logging: LoggingConfig<'static>,
    settings: Settings,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment.
    pub(crate) fn from_env() -> AppResult<Self> {
        let logging = LoggingConfig::default();
        let settings =
            load_settings().map_err(|err| AppError::config("settings.load", err))?;
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;

        Ok(Self {
            logging,
            settings,
            telemetry,
        })
    }
}

/// Entry point for the FormatAI application boot sequence.
///
/// # Errors
///
/// Returns an error if dependency construction or application startup fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies to simplify testing.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let BootstrapDependencies {
        logging,
        settings,
        telemetry,
    } = dependencies;

    formatai_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    info!(
        model = %settings.anthropic.model,
        bind_addr = %settings.http.bind_addr,
        "FormatAI application bootstrap starting"
    );

    let client = AnthropicClient::new(
        &settings.anthropic.api_key,
        settings.anthropic.base_url.clone(),
        settings.anthropic.request_timeout,
    )
    .map_err(|err| AppError::remote("client.new", err))?;

    let store: Arc<dyn FileStore> = Arc::new(client.clone());
    let generator: Arc<dyn Generator> = Arc::new(client);
    let transformer = Transformer::new(
        store,
        generator,
        TransformerConfig {
            model: settings.anthropic.model.clone(),
            max_output_tokens: settings.anthropic.max_output_tokens,
        },
    );

    ApiServer::new(transformer, telemetry)
        .serve(settings.http.bind_addr)
        .await
        .map_err(|err| AppError::api_server("api.serve", err))
}
