// ABOUTME: Data models for the WHOOP token exchange and metric payloads
// ABOUTME: Serde types for heart-rate series and cycle days plus the authenticated identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::api::PASSWORD_GRANT_TYPE;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

// ============================================================================
// Token exchange
// ============================================================================

/// Body of the password grant POST
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    /// Always `password`
    pub grant_type: &'static str,
    /// Refresh tokens are never requested
    #[serde(rename = "issueRefresh")]
    pub issue_refresh: bool,
    /// Login password
    pub password: &'a str,
    /// Login username
    pub username: &'a str,
}

impl<'a> TokenRequest<'a> {
    /// Password grant for the given credentials
    #[must_use]
    pub const fn password_grant(username: &'a str, password: &'a str) -> Self {
        Self {
            grant_type: PASSWORD_GRANT_TYPE,
            issue_refresh: false,
            password,
            username,
        }
    }
}

/// Subset of the token response this crate reads
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Authenticated user
    pub user: TokenUser,
    /// Bearer token for metric requests
    pub access_token: String,
}

/// User object embedded in the token response
#[derive(Debug, Deserialize)]
pub struct TokenUser {
    /// WHOOP user id, numeric or string on the wire
    #[serde(deserialize_with = "deserialize_user_id")]
    pub id: String,
}

fn deserialize_user_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) if !s.is_empty() => Ok(s),
        other => Err(de::Error::custom(format!(
            "user.id must be a number or non-empty string, got {other}"
        ))),
    }
}

/// Identity established by a successful token exchange
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    /// WHOOP user id
    pub user_id: String,
    /// Bearer token
    pub access_token: String,
}

impl From<TokenResponse> for Identity {
    fn from(response: TokenResponse) -> Self {
        Self {
            user_id: response.user.id,
            access_token: response.access_token,
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("user_id", &self.user_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Metric payloads
// ============================================================================

/// Heart-rate endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct HeartRateSeries {
    /// Samples in the requested window
    pub values: Vec<HeartRateSample>,
}

/// One heart-rate reading
#[derive(Debug, Clone, Deserialize)]
pub struct HeartRateSample {
    /// Epoch milliseconds
    pub time: i64,
    /// Beats per minute
    pub data: Number,
}

/// Day-level aggregate returned by the cycles endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CycleDay {
    /// Dates covered by the cycle; the first one keys the records
    #[serde(default)]
    pub days: Vec<String>,
    /// Sleep summary, absent or null while none is recorded
    #[serde(default)]
    pub sleep: Option<SleepSummary>,
    /// Strain summary holding the day's workouts
    #[serde(default)]
    pub strain: Option<StrainSummary>,
}

/// Sleep portion of a cycle
#[derive(Debug, Clone, Deserialize)]
pub struct SleepSummary {
    /// Processing state, `complete` once scored; the key must be present
    #[serde(deserialize_with = "present_or_null")]
    pub state: Option<String>,
    /// Sleep score
    #[serde(default)]
    pub score: Option<Number>,
}

/// Strain portion of a cycle
#[derive(Debug, Clone, Deserialize)]
pub struct StrainSummary {
    /// Workouts recorded during the cycle; the key must be present
    #[serde(deserialize_with = "present_or_null")]
    pub workouts: Option<Vec<Workout>>,
}

/// Field that may be `null` but not absent
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::deserialize(deserializer)
}

/// Single workout
#[derive(Debug, Clone, Deserialize)]
pub struct Workout {
    /// Highest heart rate reached
    #[serde(rename = "maxHeartRate")]
    pub max_heart_rate: Number,
}

/// Raw bodies returned by the metric endpoints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedPayloads {
    /// Heart-rate body, when fetched
    pub heart_rate: Option<Value>,
    /// Cycles body, when fetched
    pub cycles: Option<Value>,
}
