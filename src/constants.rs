// ABOUTME: Constants for the WHOOP API contract, window defaults and environment keys
// ABOUTME: Keeps endpoint paths, record names and tunable defaults in one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain: upstream API, time window defaults,
//! line-protocol names and environment variable keys.

/// WHOOP API endpoints and request constants
pub mod api {
    /// Default base URL of the WHOOP API
    pub const DEFAULT_BASE_URL: &str = "https://api-7.whoop.com";

    /// Token endpoint path
    pub const TOKEN_PATH: &str = "/oauth/token";

    /// Grant type sent in the password exchange
    pub const PASSWORD_GRANT_TYPE: &str = "password";

    /// Heart-rate endpoint path for a user
    #[must_use]
    pub fn heart_rate_path(user_id: &str) -> String {
        format!("/users/{user_id}/metrics/heart_rate")
    }

    /// Cycles endpoint path for a user
    #[must_use]
    pub fn cycles_path(user_id: &str) -> String {
        format!("/users/{user_id}/cycles")
    }
}

/// Time window defaults
pub mod window {
    /// Default lookback window in seconds (8 minutes of heart-rate data)
    pub const DEFAULT_WINDOW_SECONDS: u64 = 480;

    /// Default interval between heart-rate samples in seconds
    pub const DEFAULT_INTERVAL_SECONDS: u64 = 6;

    /// Fixed lookback for cycle data (5 days)
    pub const CYCLE_WINDOW_SECONDS: u64 = 432_000;

    /// Query timestamp format, microsecond precision with a literal `Z`
    pub const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

    /// Format of the anchor date and of cycle day strings
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}

/// Line-protocol measurement and field names
pub mod records {
    /// Heart-rate measurement name
    pub const HEARTRATE: &str = "heartrate";
    /// Sleep measurement name
    pub const SLEEP: &str = "sleep";
    /// Workout measurement name
    pub const WORKOUT: &str = "workout";
    /// Error measurement name
    pub const ERROR: &str = "error";

    /// Tag carrying the WHOOP user id
    pub const USER_ID_TAG: &str = "user_id";

    /// Heart-rate field
    pub const BPM_FIELD: &str = "bpm";
    /// Sleep score field
    pub const SLEEP_SCORE_FIELD: &str = "sleep_score";
    /// Workout max heart rate field
    pub const MAX_HEARTRATE_FIELD: &str = "max_heartrate";

    /// Sleep state that produces a sleep record
    pub const SLEEP_STATE_COMPLETE: &str = "complete";

    /// Nanoseconds per millisecond
    pub const NANOS_PER_MILLI: i64 = 1_000_000;
}

/// Environment variable names
pub mod env_config {
    /// WHOOP login username
    pub const USERNAME: &str = "WHOOP_USERNAME";
    /// WHOOP login password
    pub const PASSWORD: &str = "WHOOP_PASSWORD";
    /// Optional anchor date (`YYYY-MM-DD`)
    pub const START_DATE: &str = "WHOOP_START_DATE";
    /// Optional window length in seconds
    pub const WINDOW_SECONDS: &str = "WHOOP_WINDOW_SECONDS";
    /// Optional heart-rate sample interval in seconds
    pub const INTERVAL_SECONDS: &str = "WHOOP_INTERVAL_SECONDS";
    /// Optional API base URL override
    pub const API_BASE_URL: &str = "WHOOP_API_BASE_URL";
    /// Optional HTTP request timeout in seconds
    pub const HTTP_TIMEOUT_SECS: &str = "WHOOP_HTTP_TIMEOUT_SECS";
    /// Optional HTTP connect timeout in seconds
    pub const HTTP_CONNECT_TIMEOUT_SECS: &str = "WHOOP_HTTP_CONNECT_TIMEOUT_SECS";
    /// Bind address of the handler server
    pub const HANDLER_BIND: &str = "WHOOP_HANDLER_BIND";
}

/// HTTP client and server defaults
pub mod http {
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connection timeout in seconds
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Default bind address of the handler server
    pub const DEFAULT_HANDLER_BIND: &str = "127.0.0.1:8080";
}

/// Service names used in logs
pub mod service_names {
    /// Name reported by the logging setup
    pub const WHOOP_SCRAPER: &str = "whoop-scraper";
}
