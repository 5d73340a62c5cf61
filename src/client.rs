// ABOUTME: WHOOP HTTP client for the password token exchange and metric endpoints
// ABOUTME: Defines the WhoopApi seam used by sessions and its reqwest-backed implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # WHOOP API access
//!
//! [`WhoopApi`] is the seam between a [`Session`](crate::session::Session) and
//! the network. [`WhoopClient`] implements it with `reqwest`; tests can swap
//! in an in-memory implementation.
//!
//! Every call is a single request. Anything but HTTP 200 is terminal: the
//! token endpoint maps to [`ScraperError::Authentication`], the metric
//! endpoints to [`ScraperError::Authorization`].

use crate::config::{Credentials, HttpClientConfig};
use crate::constants::api;
use crate::errors::{AppResult, ScraperError};
use crate::models::{Identity, TokenRequest, TokenResponse};
use crate::window::{MetricKind, TimeWindow};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

/// Operations a session needs from the WHOOP API
#[async_trait]
pub trait WhoopApi: Send + Sync {
    /// Exchange credentials for a bearer token and user id
    async fn authenticate(&self, credentials: &Credentials) -> AppResult<Identity>;

    /// Fetch the raw body of one metric endpoint within `window`
    ///
    /// `interval_seconds` is only sent for heart rate.
    async fn fetch_metric(
        &self,
        identity: &Identity,
        kind: MetricKind,
        window: &TimeWindow,
        interval_seconds: u64,
    ) -> AppResult<Value>;
}

/// `reqwest`-backed WHOOP client
#[derive(Debug, Clone)]
pub struct WhoopClient {
    base_url: String,
    client: Client,
}

impl WhoopClient {
    /// Create a client for `base_url` with the given timeouts
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, http: &HttpClientConfig) -> AppResult<Self> {
        let client = ClientBuilder::new()
            .timeout(http.timeout())
            .connect_timeout(http.connect_timeout())
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a client reusing an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn metric_path(kind: MetricKind, user_id: &str) -> String {
        match kind {
            MetricKind::HeartRate => api::heart_rate_path(user_id),
            MetricKind::Cycles => api::cycles_path(user_id),
        }
    }

    fn metric_query(
        kind: MetricKind,
        window: &TimeWindow,
        interval_seconds: u64,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![("start", window.start_param()), ("end", window.end_param())];
        if kind == MetricKind::HeartRate {
            query.push(("step", interval_seconds.to_string()));
        }
        query
    }
}

#[async_trait]
impl WhoopApi for WhoopClient {
    #[instrument(skip_all, fields(username = %credentials.username))]
    async fn authenticate(&self, credentials: &Credentials) -> AppResult<Identity> {
        let url = self.url(api::TOKEN_PATH);
        debug!("Requesting WHOOP token from {url}");

        let response = self
            .client
            .post(&url)
            .json(&TokenRequest::password_grant(
                &credentials.username,
                &credentials.password,
            ))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(http.status = status.as_u16(), "WHOOP credentials rejected");
            return Err(ScraperError::Authentication {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ScraperError::data_shape(format!("Failed to parse token response: {e}"))
        })?;
        let identity = Identity::from(token);
        info!(user.id = %identity.user_id, "WHOOP authentication succeeded");
        Ok(identity)
    }

    #[instrument(skip_all, fields(metric = %kind, user.id = %identity.user_id))]
    async fn fetch_metric(
        &self,
        identity: &Identity,
        kind: MetricKind,
        window: &TimeWindow,
        interval_seconds: u64,
    ) -> AppResult<Value> {
        let url = self.url(&Self::metric_path(kind, &identity.user_id));
        let query = Self::metric_query(kind, window, interval_seconds);
        debug!(
            window.start = %window.start_param(),
            window.end = %window.end_param(),
            "Fetching WHOOP metric"
        );

        let response = self
            .client
            .get(&url)
            .query(&query)
            .header(AUTHORIZATION, format!("bearer {}", identity.access_token))
            .send()
            .await?;

        let status = response.status();
        debug!(http.status = status.as_u16(), "WHOOP metric response");
        if status != StatusCode::OK {
            error!(http.status = status.as_u16(), "WHOOP user id or token rejected");
            return Err(ScraperError::Authorization {
                metric: kind,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            ScraperError::data_shape(format!("Failed to parse {kind} response: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window(kind: MetricKind) -> TimeWindow {
        let date = NaiveDate::from_ymd_opt(2022, 1, 1);
        TimeWindow::compute(date, 480, kind, chrono::Utc::now())
    }

    #[test]
    fn test_heart_rate_query_carries_step() {
        let hr_window = window(MetricKind::HeartRate);
        let query = WhoopClient::metric_query(MetricKind::HeartRate, &hr_window, 6);
        assert_eq!(
            query,
            vec![
                ("start", "2021-12-31T23:52:00.000000Z".to_owned()),
                ("end", "2022-01-01T00:00:00.000000Z".to_owned()),
                ("step", "6".to_owned()),
            ]
        );
    }

    #[test]
    fn test_cycles_query_has_no_step() {
        let query = WhoopClient::metric_query(MetricKind::Cycles, &window(MetricKind::Cycles), 6);
        assert_eq!(query.len(), 2);
        assert_eq!(query[0].1, "2021-12-27T00:00:00.000000Z");
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = WhoopClient::with_client("https://api-7.whoop.com/", Client::new());
        assert_eq!(client.base_url(), "https://api-7.whoop.com");
        assert_eq!(
            client.url(&api::cycles_path("42")),
            "https://api-7.whoop.com/users/42/cycles"
        );
    }
}
