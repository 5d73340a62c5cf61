// ABOUTME: Serverless-style request handler turning a JSON envelope into line-protocol output
// ABOUTME: Maps malformed input to a 400 JSON message and run failures to a single error record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Request handler
//!
//! Input is a proxy-style envelope whose `body` is a JSON string:
//!
//! ```json
//! {"body": "{\"whoop_username\": \"me@example.com\", \"whoop_password\": \"...\"}"}
//! ```
//!
//! The response is `{"statusCode": 200, "body": "<records joined by \n>"}`.
//! A failed run still answers 200, its body being the single error record.
//! Only malformed input answers 400 with `{"message": "..."}`.

use crate::config::{
    parse_anchor_date, Credentials, HttpClientConfig, MetricSelection, ScraperConfig,
};
use crate::constants::{api, env_config};
use crate::errors::{AppResult, ScraperError};
use crate::session::{lines_or_error, Session};
use crate::window::MetricKind;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use tracing::{info, warn};

/// Incoming envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestEvent {
    /// JSON-encoded request body
    #[serde(default)]
    pub body: Option<String>,
}

impl RequestEvent {
    /// Envelope carrying `body`
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }
}

/// Fields accepted in the request body
#[derive(Debug, Deserialize)]
struct HandlerRequest {
    whoop_username: Option<String>,
    whoop_password: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    window_seconds: Option<u64>,
    #[serde(default)]
    interval_seconds: Option<u64>,
    #[serde(default)]
    metrics: Option<Vec<MetricKind>>,
}

/// Outgoing envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    /// HTTP-equivalent status
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Newline-joined records, or a JSON error message
    pub body: String,
}

impl HandlerResponse {
    /// 200 response joining `lines` with newlines
    #[must_use]
    pub fn from_lines(lines: &[String]) -> Self {
        Self {
            status_code: 200,
            body: lines.join("\n"),
        }
    }

    /// 400 response carrying `{"message": ...}`
    #[must_use]
    pub fn bad_request(message: &str) -> Self {
        Self {
            status_code: 400,
            body: json!({ "message": message }).to_string(),
        }
    }
}

/// Settings the handler applies to every request
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    /// WHOOP API base URL
    pub api_base_url: String,
    /// Outbound HTTP settings
    pub http: HttpClientConfig,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            api_base_url: api::DEFAULT_BASE_URL.to_owned(),
            http: HttpClientConfig::default(),
        }
    }
}

impl HandlerSettings {
    /// Settings with the API base URL and HTTP timeouts taken from the
    /// environment when set
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a timeout fails to parse
    pub fn from_env() -> AppResult<Self> {
        let mut settings = Self {
            http: HttpClientConfig::from_env()?,
            ..Self::default()
        };
        if let Ok(url) = env::var(env_config::API_BASE_URL) {
            if !url.is_empty() {
                settings.api_base_url = url;
            }
        }
        Ok(settings)
    }
}

/// Build the run configuration from an envelope
///
/// # Errors
///
/// Returns an invalid-input error on a missing or non-JSON body, missing
/// credentials or unparsable tunables
pub fn parse_event(event: &RequestEvent, settings: &HandlerSettings) -> AppResult<ScraperConfig> {
    let body = event
        .body
        .as_deref()
        .ok_or_else(|| ScraperError::invalid_input("Request body is missing"))?;
    let request: HandlerRequest = serde_json::from_str(body)
        .map_err(|e| ScraperError::invalid_input(format!("Invalid request body: {e}")))?;

    let username = request
        .whoop_username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ScraperError::invalid_input("whoop_username is required"))?;
    let password = request
        .whoop_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ScraperError::invalid_input("whoop_password is required"))?;

    let mut config = ScraperConfig::new(Credentials::new(username, password))
        .with_api_base_url(settings.api_base_url.clone());
    config.http = settings.http;

    if let Some(raw) = request.start_date.as_deref() {
        config.anchor_date = Some(parse_anchor_date(raw)?);
    }
    if let Some(seconds) = request.window_seconds {
        config.window_seconds = seconds;
    }
    if let Some(seconds) = request.interval_seconds {
        config.interval_seconds = seconds;
    }
    if let Some(kinds) = request.metrics.as_deref() {
        config.metrics = MetricSelection::from_kinds(kinds)?;
    }
    Ok(config)
}

/// Handle one envelope end to end
pub async fn handle_event(event: &RequestEvent, settings: &HandlerSettings) -> HandlerResponse {
    let config = match parse_event(event, settings) {
        Ok(config) => config,
        Err(e) => {
            warn!("Rejected handler request: {e}");
            return HandlerResponse::bad_request(&e.to_string());
        }
    };

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) if e.kind().http_status() == 400 => {
            warn!("Rejected handler request: {e}");
            return HandlerResponse::bad_request(&e.to_string());
        }
        Err(e) => return HandlerResponse::from_lines(&lines_or_error(Err(e))),
    };

    let lines = session.collect_lines().await;
    info!(lines = lines.len(), "Handler request completed");
    HandlerResponse::from_lines(&lines)
}
