// ABOUTME: Scraper configuration: credentials, window tunables, metric selection and HTTP settings
// ABOUTME: Built explicitly for sessions, or loaded from the environment and an optional .env file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration injected into a [`Session`](crate::session::Session).
//!
//! The core never reads ambient state. Harnesses build a [`ScraperConfig`]
//! either from the process environment ([`ScraperConfig::from_env`]) or from a
//! handler request body, then hand it to the session.

use crate::constants::{api, env_config, http, window};
use crate::errors::{AppResult, ScraperError};
use crate::window::MetricKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// WHOOP login credentials
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Login username (usually an email address)
    pub username: String,
    /// Login password
    pub password: String,
}

impl Credentials {
    /// Create credentials from a username/password pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Timeouts for the outbound HTTP client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl HttpClientConfig {
    /// Request timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout as a [`Duration`]
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Timeouts from `WHOOP_HTTP_TIMEOUT_SECS` and
    /// `WHOOP_HTTP_CONNECT_TIMEOUT_SECS`, defaulting when unset
    ///
    /// # Errors
    ///
    /// Returns an error if a value is not a whole number of seconds
    pub fn from_env() -> AppResult<Self> {
        let mut http = Self::default();
        if let Some(raw) = optional_env(env_config::HTTP_TIMEOUT_SECS) {
            http.timeout_secs = parse_seconds(env_config::HTTP_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = optional_env(env_config::HTTP_CONNECT_TIMEOUT_SECS) {
            http.connect_timeout_secs =
                parse_seconds(env_config::HTTP_CONNECT_TIMEOUT_SECS, &raw)?;
        }
        Ok(http)
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: http::DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: http::DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Which metric kinds a run fetches, in fetch order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSelection(Vec<MetricKind>);

impl MetricSelection {
    /// Heart rate followed by cycles
    #[must_use]
    pub fn all() -> Self {
        Self(vec![MetricKind::HeartRate, MetricKind::Cycles])
    }

    /// Heart rate only
    #[must_use]
    pub fn heart_rate_only() -> Self {
        Self(vec![MetricKind::HeartRate])
    }

    /// Build a selection from arbitrary kinds, keeping the canonical fetch order
    ///
    /// # Errors
    ///
    /// Returns an error if no kind is selected
    pub fn from_kinds(kinds: &[MetricKind]) -> AppResult<Self> {
        let ordered: Vec<MetricKind> = [MetricKind::HeartRate, MetricKind::Cycles]
            .into_iter()
            .filter(|kind| kinds.contains(kind))
            .collect();
        if ordered.is_empty() {
            return Err(ScraperError::invalid_input(
                "at least one metric must be selected",
            ));
        }
        Ok(Self(ordered))
    }

    /// Selected kinds in fetch order
    #[must_use]
    pub fn kinds(&self) -> &[MetricKind] {
        &self.0
    }
}

impl Default for MetricSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Everything a session needs to run
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Login credentials
    pub credentials: Credentials,
    /// Day whose UTC midnight anchors the window, `None` for now
    pub anchor_date: Option<NaiveDate>,
    /// Heart-rate lookback in seconds
    pub window_seconds: u64,
    /// Heart-rate sample interval in seconds
    pub interval_seconds: u64,
    /// Metrics to fetch
    pub metrics: MetricSelection,
    /// WHOOP API base URL
    pub api_base_url: String,
    /// Outbound HTTP settings
    pub http: HttpClientConfig,
}

impl ScraperConfig {
    /// Configuration with default tunables for the given credentials
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            anchor_date: None,
            window_seconds: window::DEFAULT_WINDOW_SECONDS,
            interval_seconds: window::DEFAULT_INTERVAL_SECONDS,
            metrics: MetricSelection::all(),
            api_base_url: api::DEFAULT_BASE_URL.to_owned(),
            http: HttpClientConfig::default(),
        }
    }

    /// Anchor the window at midnight UTC of `date`
    #[must_use]
    pub fn with_anchor_date(mut self, date: Option<NaiveDate>) -> Self {
        self.anchor_date = date;
        self
    }

    /// Override the heart-rate window length
    #[must_use]
    pub const fn with_window_seconds(mut self, seconds: u64) -> Self {
        self.window_seconds = seconds;
        self
    }

    /// Override the heart-rate sample interval
    #[must_use]
    pub const fn with_interval_seconds(mut self, seconds: u64) -> Self {
        self.interval_seconds = seconds;
        self
    }

    /// Override the metric selection
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricSelection) -> Self {
        self.metrics = metrics;
        self
    }

    /// Override the API base URL
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory or its parents is loaded first
    /// when present. Values are not range-checked here so that later
    /// overrides can still replace them; [`ScraperConfig::validate`] runs when
    /// the session is built.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is missing or a tunable fails to parse
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        let credentials = Credentials::new(
            required_env(env_config::USERNAME)?,
            required_env(env_config::PASSWORD)?,
        );

        let mut config = Self::new(credentials);

        if let Some(raw) = optional_env(env_config::START_DATE) {
            config.anchor_date = Some(parse_anchor_date(&raw)?);
        }
        if let Some(raw) = optional_env(env_config::WINDOW_SECONDS) {
            config.window_seconds = parse_seconds(env_config::WINDOW_SECONDS, &raw)?;
        }
        if let Some(raw) = optional_env(env_config::INTERVAL_SECONDS) {
            config.interval_seconds = parse_seconds(env_config::INTERVAL_SECONDS, &raw)?;
        }
        if let Some(raw) = optional_env(env_config::API_BASE_URL) {
            config.api_base_url = raw;
        }
        config.http = HttpClientConfig::from_env()?;

        Ok(config)
    }

    /// Check tunables for values the API cannot serve
    ///
    /// # Errors
    ///
    /// Returns an error on a zero window or interval, an empty base URL or
    /// empty credentials
    pub fn validate(&self) -> AppResult<()> {
        if self.credentials.username.is_empty() || self.credentials.password.is_empty() {
            return Err(ScraperError::config("WHOOP username and password are required"));
        }
        if self.window_seconds == 0 {
            return Err(ScraperError::config("window_seconds must be positive"));
        }
        if self.interval_seconds == 0 {
            return Err(ScraperError::config("interval_seconds must be positive"));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ScraperError::config("API base URL must not be empty"));
        }
        if self.interval_seconds > self.window_seconds {
            warn!(
                interval_seconds = self.interval_seconds,
                window_seconds = self.window_seconds,
                "Sample interval exceeds the window, at most one sample will be returned"
            );
        }
        Ok(())
    }

    /// One-line summary safe to log
    #[must_use]
    pub fn summary(&self) -> String {
        let anchor = self
            .anchor_date
            .map_or_else(|| "now".to_owned(), |d| d.to_string());
        let metrics: Vec<&str> = self.metrics.kinds().iter().map(|k| k.as_str()).collect();
        format!(
            "user={} anchor={anchor} window={}s interval={}s metrics={} api={}",
            self.credentials.username,
            self.window_seconds,
            self.interval_seconds,
            metrics.join(","),
            self.api_base_url
        )
    }
}

/// Parse a `YYYY-MM-DD` anchor date
///
/// # Errors
///
/// Returns an invalid-input error when the string is not a calendar date
pub fn parse_anchor_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), window::DATE_FORMAT)
        .map_err(|e| ScraperError::invalid_input(format!("Invalid start date '{raw}': {e}")))
}

fn parse_seconds(key: &str, raw: &str) -> AppResult<u64> {
    raw.trim()
        .parse()
        .map_err(|e| ScraperError::config(format!("Invalid {key} value '{raw}': {e}")))
}

fn required_env(key: &str) -> AppResult<String> {
    optional_env(key).ok_or_else(|| ScraperError::config(format!("{key} is not set")))
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
