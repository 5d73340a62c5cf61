// ABOUTME: Logging configuration and structured logging setup for the scraper binaries
// ABOUTME: Routes tracing output to stderr so stdout only carries line-protocol records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration

use crate::constants::service_names;
use anyhow::{anyhow, Result};
use std::env;
use std::io;
use tracing::{debug, Level};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include span enter/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for log shippers
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for cron and function logs
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Compact,
            include_location: false,
            include_spans: false,
            service_name: service_names::WHOOP_SCRAPER.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") => LogFormat::Pretty,
            _ => LogFormat::Compact,
        };

        Self {
            level,
            format,
            include_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::WHOOP_SCRAPER.into()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }

    /// Build the filter, keeping HTTP stack noise down regardless of `RUST_LOG`
    fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").map_or_else(
            |_| EnvFilter::new(&self.level),
            |directive| EnvFilter::new(&directive),
        );
        ["hyper=warn", "hyper_util=warn", "reqwest=warn", "tower_http=info"]
            .into_iter()
            .fold(base, |filter, directive| {
                filter.add_directive(directive.parse().unwrap_or_else(|_| Level::WARN.into()))
            })
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());

        let result = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true)
                        .with_writer(io::stderr)
                        .with_span_events(self.span_events())
                        .json(),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true)
                        .with_writer(io::stderr)
                        .with_span_events(self.span_events()),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(io::stderr)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init(),
        };
        result.map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

        debug!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            log.level = %self.level,
            log.format = ?self.format,
            "Logging initialized"
        );
        Ok(())
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
