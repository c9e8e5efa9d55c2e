//! Farm2Hand seller dashboard library.
//!
//! Server-rendered dashboard for one seller: product catalog, order
//! processing, customer chat, loyalty points and a quick sales desk. All data
//! lives in memory for the life of the process, seeded at startup.
//!
//! The binary in `main.rs` adds telemetry and serving; [`app`] builds the
//! complete router so tests can drive it in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

use axum::Router;
use axum::http::{Request, Response};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the full dashboard router: pages, JSON API, static files, request
/// tracing and security headers.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();
    let max_upload_bytes = state.config().max_upload_bytes;

    Router::new()
        .merge(routes::routes(max_upload_bytes))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
