// ABOUTME: Axum router exposing the request handler over HTTP
// ABOUTME: Serves the JSON envelope on /invoke, the raw body on / and a health probe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::handler::{handle_event, HandlerResponse, HandlerSettings, RequestEvent};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::future;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Build the handler router
pub fn router(settings: HandlerSettings) -> Router {
    Router::new()
        .route("/", post(raw_body))
        .route("/invoke", post(invoke))
        .route("/health", get(health))
        .with_state(Arc::new(settings))
}

/// Serve the router until the process is stopped
///
/// # Errors
///
/// Returns an error if the listener fails
pub async fn serve(listener: TcpListener, settings: HandlerSettings) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("WHOOP handler listening on {addr}");
    }
    axum::serve(listener, router(settings))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn invoke(
    State(settings): State<Arc<HandlerSettings>>,
    Json(event): Json<RequestEvent>,
) -> Json<HandlerResponse> {
    Json(handle_event(&event, &settings).await)
}

async fn raw_body(State(settings): State<Arc<HandlerSettings>>, body: String) -> Response {
    let response = handle_event(&RequestEvent::with_body(body), &settings).await;
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = if status == StatusCode::OK {
        "text/plain; charset=utf-8"
    } else {
        "application/json"
    };
    (status, [(header::CONTENT_TYPE, content_type)], response.body).into_response()
}

async fn health() -> &'static str {
    "ok"
}
