// ABOUTME: Session orchestrating authentication, window computation, metric fetches and formatting
// ABOUTME: One session per invocation; stages run strictly in sequence and any failure ends the run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session
//!
//! A [`Session`] owns the configuration of one run, the identity obtained from
//! the token endpoint and the raw payloads fetched afterwards:
//!
//! 1. [`Session::authenticate`] exchanges credentials for a token and user id
//! 2. [`Session::fetch`] computes the window for a metric kind and fetches it
//! 3. [`Session::records`] formats everything fetched so far
//!
//! [`Session::run`] chains the three and [`Session::collect_lines`] turns the
//! outcome into output lines, a failure becoming one error record.

use crate::client::{WhoopApi, WhoopClient};
use crate::config::ScraperConfig;
use crate::errors::{AppResult, ScraperError};
use crate::line_protocol::{self, LineRecord};
use crate::models::{FetchedPayloads, Identity};
use crate::window::{MetricKind, TimeWindow};
use tracing::{info, instrument, warn};

/// State of a single scrape
pub struct Session<A = WhoopClient> {
    config: ScraperConfig,
    api: A,
    identity: Option<Identity>,
    payloads: FetchedPayloads,
}

impl Session<WhoopClient> {
    /// Create a session talking to the configured WHOOP API
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built
    pub fn new(config: ScraperConfig) -> AppResult<Self> {
        config.validate()?;
        let client = WhoopClient::new(config.api_base_url.clone(), &config.http)?;
        Ok(Self::with_api(config, client))
    }
}

impl<A: WhoopApi> Session<A> {
    /// Create a session on top of any [`WhoopApi`] implementation
    #[must_use]
    pub fn with_api(config: ScraperConfig, api: A) -> Self {
        Self {
            config,
            api,
            identity: None,
            payloads: FetchedPayloads::default(),
        }
    }

    /// Configuration of this run
    #[must_use]
    pub const fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Identity obtained by [`Session::authenticate`]
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Raw payloads fetched so far
    #[must_use]
    pub const fn payloads(&self) -> &FetchedPayloads {
        &self.payloads
    }

    /// Exchange the configured credentials for a token and user id
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Authentication`] when the credentials are rejected
    pub async fn authenticate(&mut self) -> AppResult<&Identity> {
        let identity = self.api.authenticate(&self.config.credentials).await?;
        Ok(self.identity.insert(identity))
    }

    /// Fetch one metric kind within a window anchored now or at the configured date
    ///
    /// The window is recomputed on every call, so two fetches without an
    /// anchor date use slightly different end instants.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::NotAuthenticated`] before authentication and
    /// [`ScraperError::Authorization`] when the endpoint rejects the token
    #[instrument(skip(self), fields(metric = %kind))]
    pub async fn fetch(&mut self, kind: MetricKind) -> AppResult<()> {
        let identity = self.identity.as_ref().ok_or(ScraperError::NotAuthenticated)?;
        let window =
            TimeWindow::compute_now(self.config.anchor_date, self.config.window_seconds, kind);

        let payload = self
            .api
            .fetch_metric(identity, kind, &window, self.config.interval_seconds)
            .await?;

        info!(
            window.start = %window.start_param(),
            window.end = %window.end_param(),
            "Fetched WHOOP {kind} data"
        );

        match kind {
            MetricKind::HeartRate => self.payloads.heart_rate = Some(payload),
            MetricKind::Cycles => self.payloads.cycles = Some(payload),
        }
        Ok(())
    }

    /// Fetch every selected metric kind in order, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns the first fetch error
    pub async fn fetch_all(&mut self) -> AppResult<()> {
        let kinds = self.config.metrics.kinds().to_vec();
        for kind in kinds {
            self.fetch(kind).await?;
        }
        Ok(())
    }

    /// Format the fetched payloads
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::NotAuthenticated`] before authentication and a
    /// data-shape error on malformed payloads
    pub fn records(&self) -> AppResult<Vec<LineRecord>> {
        let identity = self.identity.as_ref().ok_or(ScraperError::NotAuthenticated)?;
        line_protocol::format_payloads(&self.payloads, &identity.user_id)
    }

    /// Authenticate, fetch every selected metric and format the records
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage
    pub async fn run(&mut self) -> AppResult<Vec<String>> {
        self.authenticate().await?;
        self.fetch_all().await?;
        let records = self.records()?;
        info!(records = records.len(), "Formatted WHOOP records");
        Ok(line_protocol::render(&records))
    }

    /// Run and return the output lines, a failure becoming one error record
    pub async fn collect_lines(&mut self) -> Vec<String> {
        lines_or_error(self.run().await)
    }
}

/// Output lines of a run outcome
///
/// An error yields exactly one `error msg="..."` line stamped with the
/// current time.
#[must_use]
pub fn lines_or_error(outcome: AppResult<Vec<String>>) -> Vec<String> {
    match outcome {
        Ok(lines) => lines,
        Err(e) => {
            warn!(error.kind = ?e.kind(), "WHOOP scrape failed: {e}");
            vec![e.to_error_line()]
        }
    }
}
