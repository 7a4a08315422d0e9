//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, Request, header::CONTENT_TYPE},
    routing::{get, post},
};
use formatai_core::Transformer;
use formatai_telemetry::{Metrics, build_sha};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Span, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::files::list_files;
use crate::http::format::format_spreadsheets;
use crate::http::health::{health, metrics, root_descriptor};
use crate::http::telemetry::HttpMetricsLayer;
use crate::state::ApiState;

const HEADER_REQUEST_ID: &str = "x-request-id";
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Axum router wrapper that hosts the FormatAI API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct the server with its dependencies wired through shared state.
    #[must_use]
    pub fn new(transformer: Transformer, telemetry: Metrics) -> Self {
        let state = Arc::new(ApiState::new(transformer, telemetry.clone()));

        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let method = request.method().clone();
                let uri_path = request.uri().path();
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %method,
                    route = %uri_path,
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(formatai_telemetry::propagate_request_id_layer())
            .layer(formatai_telemetry::set_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry));

        let router = Router::new()
            .route("/", get(root_descriptor))
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route("/api/v1/files", get(list_files))
            .route(
                "/api/v1/format",
                post(format_spreadsheets).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
            )
            .layer(cors_layer)
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    /// Bind the listener and serve until the process terminates.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or serving fails.
    pub async fn serve(self, addr: SocketAddr) -> ApiServerResult<()> {
        info!(%addr, "starting api listener");
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| ApiServerError::Serve { source })?;
        Ok(())
    }
}
