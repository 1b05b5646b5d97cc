//! HTTP server: routing, body limits, CORS and per-request tracing spans.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Request};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::Instrument;

use crate::handlers::{analyze, describe, identify, info, navigate};
use crate::state::AppState;
use crate::types::ApiResult;

/// Build the router with every endpoint.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(info::root))
        .route("/health", get(info::health))
        .route("/identify", post(identify::identify))
        .route("/identify_base64", post(identify::identify_base64))
        .route("/navigate", post(navigate::navigate))
        .route("/describe", post(describe::describe))
        .route("/analyze", post(analyze::analyze))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(request_span))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Wrap each request in a span tagged with a fresh request id, and echo the
/// id back in `x-request-id`.
async fn request_span(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path()
    );

    async move {
        let mut response = next.run(request).await;
        tracing::info!(status = response.status().as_u16(), "Request finished");
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }
        response
    }
    .instrument(span)
    .await
}

/// HTTP server bound to one address.
pub struct HttpTransport {
    state: Arc<AppState>,
    max_upload_bytes: usize,
}

impl HttpTransport {
    pub fn new(state: AppState, max_upload_bytes: usize) -> Self {
        Self {
            state: Arc::new(state),
            max_upload_bytes,
        }
    }

    /// Serve until Ctrl-C.
    pub async fn run(&self, addr: &str) -> ApiResult<()> {
        let app = router(self.state.clone(), self.max_upload_bytes);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for shutdown signal: {e}");
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
