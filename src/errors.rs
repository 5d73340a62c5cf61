// ABOUTME: Unified error taxonomy for the scraper stages and harnesses
// ABOUTME: Renders every failure as a single timestamped line-protocol error record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! Every stage of a run (authentication, fetch, formatting) returns an
//! [`AppResult`]. Failures are terminal for the run: the harness either exits
//! the process or turns the error into a response body, in both cases as one
//! `error msg="..." <ns>` line.

use crate::constants::records;
use crate::window::MetricKind;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a [`ScraperError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Credentials rejected by the token endpoint
    Authentication,
    /// Token or user id rejected by a metric endpoint
    Authorization,
    /// Payload missing or carrying a malformed field
    DataShape,
    /// Malformed request envelope or tunable value
    InvalidInput,
    /// HTTP transport failure
    Transport,
    /// Missing or invalid configuration
    Config,
}

impl ErrorKind {
    /// HTTP status a handler would associate with this kind
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::Config => 400,
            Self::Authentication => 401,
            Self::Authorization => 403,
            Self::DataShape | Self::Transport => 502,
        }
    }
}

/// Errors raised while scraping WHOOP data
#[derive(Debug, Error)]
pub enum ScraperError {
    /// Token endpoint answered with a non-200 status
    #[error("Fail - Credentials rejected.")]
    Authentication {
        /// Status returned by the token endpoint
        status: u16,
    },

    /// A metric endpoint answered with a non-200 status
    #[error("Fail - User ID / auth token rejected.")]
    Authorization {
        /// Metric being fetched
        metric: MetricKind,
        /// Status returned by the endpoint
        status: u16,
    },

    /// A metric fetch was attempted before authenticating
    #[error("Session is not authenticated")]
    NotAuthenticated,

    /// Expected field absent or malformed
    #[error("{0}")]
    DataShape(String),

    /// Malformed handler input
    #[error("{0}")]
    InvalidInput(String),

    /// Request could not be sent or its body read
    #[error("HTTP transport failure: {0}")]
    Transport(String),

    /// Missing or invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, ScraperError>;

impl ScraperError {
    /// Data-shape failure
    pub fn data_shape(message: impl Into<String>) -> Self {
        Self::DataShape(message.into())
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Classification of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } | Self::NotAuthenticated => ErrorKind::Authentication,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::DataShape(_) => ErrorKind::DataShape,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Render as an error record stamped with the given nanosecond timestamp
    #[must_use]
    pub fn to_error_line_at(&self, timestamp_ns: i64) -> String {
        error_line_at(&self.to_string(), timestamp_ns)
    }

    /// Render as an error record stamped with the current wall-clock time
    #[must_use]
    pub fn to_error_line(&self) -> String {
        self.to_error_line_at(now_nanos())
    }
}

impl From<reqwest::Error> for ScraperError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

/// Build an `error msg="<message>" <timestamp_ns>` record
#[must_use]
pub fn error_line_at(message: &str, timestamp_ns: i64) -> String {
    format!(
        "{} msg=\"{}\" {timestamp_ns}",
        records::ERROR,
        escape_string_field(message)
    )
}

/// Current wall-clock time in epoch nanoseconds
#[must_use]
pub fn now_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

/// Escape a line-protocol string field value
fn escape_string_field(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\n' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_error_line() {
        let error = ScraperError::Authentication { status: 401 };
        assert_eq!(
            error.to_error_line_at(42),
            "error msg=\"Fail - Credentials rejected.\" 42"
        );
        assert_eq!(error.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_authorization_error_message() {
        let error = ScraperError::Authorization {
            metric: MetricKind::HeartRate,
            status: 403,
        };
        assert_eq!(error.to_string(), "Fail - User ID / auth token rejected.");
        assert_eq!(error.kind().http_status(), 403);
    }

    #[test]
    fn test_error_line_escapes_quotes() {
        let line = error_line_at("missing field `values` at \"root\"", 7);
        assert_eq!(line, "error msg=\"missing field `values` at \\\"root\\\"\" 7");
    }

    #[test]
    fn test_error_line_uses_current_time() {
        let before = now_nanos();
        let line = ScraperError::data_shape("boom").to_error_line();
        let ts: i64 = line.rsplit(' ').next().unwrap().parse().unwrap();
        assert!(ts >= before);
    }
}
