// ABOUTME: Time window calculation for WHOOP metric queries
// ABOUTME: Derives UTC start/end query timestamps from an anchor date and a lookback length
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::window::{API_TIMESTAMP_FORMAT, CYCLE_WINDOW_SECONDS};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of metric a window is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Heart-rate samples
    HeartRate,
    /// Day-level cycles carrying sleep and workout summaries
    #[serde(alias = "cycle")]
    Cycles,
}

impl MetricKind {
    /// Window length actually used for this kind
    ///
    /// Cycle aggregates are reported per day, so they always look back five
    /// days whatever the configured window is.
    #[must_use]
    pub const fn effective_window_seconds(self, configured: u64) -> u64 {
        match self {
            Self::HeartRate => configured,
            Self::Cycles => CYCLE_WINDOW_SECONDS,
        }
    }

    /// Name used in logs and error context
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeartRate => "heart_rate",
            Self::Cycles => "cycles",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open UTC interval `[start, end)` used as query bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive start
    pub start: DateTime<Utc>,
    /// Exclusive end, the anchor instant
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Compute the window for `kind` ending at the anchor
    ///
    /// The anchor is midnight UTC of `anchor_date` when given, `now` otherwise.
    #[must_use]
    pub fn compute(
        anchor_date: Option<NaiveDate>,
        window_seconds: u64,
        kind: MetricKind,
        now: DateTime<Utc>,
    ) -> Self {
        let end = anchor_date.map_or(now, |date| date.and_time(NaiveTime::MIN).and_utc());
        let seconds = kind.effective_window_seconds(window_seconds);
        let span = Duration::try_seconds(i64::try_from(seconds).unwrap_or(i64::MAX))
            .unwrap_or(Duration::MAX);
        let start = end
            .checked_sub_signed(span)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end }
    }

    /// Compute the window anchored at the current instant when no date is given
    #[must_use]
    pub fn compute_now(
        anchor_date: Option<NaiveDate>,
        window_seconds: u64,
        kind: MetricKind,
    ) -> Self {
        Self::compute(anchor_date, window_seconds, kind, Utc::now())
    }

    /// Start formatted as a query parameter
    #[must_use]
    pub fn start_param(&self) -> String {
        format_api_timestamp(self.start)
    }

    /// End formatted as a query parameter
    #[must_use]
    pub fn end_param(&self) -> String {
        format_api_timestamp(self.end)
    }

    /// Length of the window in whole seconds
    #[must_use]
    pub fn length_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// Render a UTC instant as `YYYY-MM-DDTHH:MM:SS.ffffffZ`
#[must_use]
pub fn format_api_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(API_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_anchor_date_is_utc_midnight() {
        let window = TimeWindow::compute(
            Some(date(2022, 1, 1)),
            480,
            MetricKind::HeartRate,
            Utc::now(),
        );
        assert_eq!(window.end_param(), "2022-01-01T00:00:00.000000Z");
        assert_eq!(window.start_param(), "2021-12-31T23:52:00.000000Z");
        assert_eq!(window.length_seconds(), 480);
    }

    #[test]
    fn test_cycle_window_ignores_configured_length() {
        for configured in [1, 480, 86_400, 1_000_000] {
            let window = TimeWindow::compute(
                Some(date(2022, 3, 10)),
                configured,
                MetricKind::Cycles,
                Utc::now(),
            );
            assert_eq!(window.length_seconds(), 432_000);
            assert_eq!(window.start_param(), "2022-03-05T00:00:00.000000Z");
        }
    }

    #[test]
    fn test_no_anchor_uses_now_with_microseconds() {
        let now = Utc.with_ymd_and_hms(2023, 6, 15, 12, 30, 45).unwrap()
            + Duration::microseconds(123_456);
        let window = TimeWindow::compute(None, 60, MetricKind::HeartRate, now);
        assert_eq!(window.end_param(), "2023-06-15T12:30:45.123456Z");
        assert_eq!(window.start_param(), "2023-06-15T12:29:45.123456Z");
    }

    #[test]
    fn test_metric_kind_names() {
        assert_eq!(MetricKind::HeartRate.to_string(), "heart_rate");
        assert_eq!(MetricKind::Cycles.to_string(), "cycles");
        let parsed: MetricKind = serde_json::from_str("\"cycle\"").unwrap();
        assert_eq!(parsed, MetricKind::Cycles);
    }
}
