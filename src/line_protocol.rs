// ABOUTME: InfluxDB line-protocol rendering for heart-rate, sleep and workout records
// ABOUTME: Flattens raw WHOOP payloads into ordered records, failing atomically on malformed data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Record Formatter
//!
//! Every record has the shape
//! `<measurement>,user_id=<id> <field>=<value> <timestamp_ns>`:
//!
//! | measurement | field           | timestamp                          |
//! |-------------|-----------------|------------------------------------|
//! | `heartrate` | `bpm`           | sample time (ms) × 10⁶             |
//! | `sleep`     | `sleep_score`   | UTC midnight of the cycle day (ns) |
//! | `workout`   | `max_heartrate` | UTC midnight of the cycle day (ns) |
//!
//! Formatting is pure and all-or-nothing: a malformed field anywhere yields a
//! single [`ScraperError::DataShape`] and no records.

use crate::constants::records;
use crate::constants::window::DATE_FORMAT;
use crate::errors::{AppResult, ScraperError};
use crate::models::{CycleDay, FetchedPayloads, HeartRateSeries};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{Number, Value};
use std::fmt;

/// One line-protocol record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// Measurement name
    pub measurement: &'static str,
    /// Value of the `user_id` tag
    pub user_id: String,
    /// Field name
    pub field: &'static str,
    /// Field value, exactly as received
    pub value: Number,
    /// Epoch nanoseconds
    pub timestamp_ns: i64,
}

impl fmt::Display for LineRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}={} {}={} {}",
            self.measurement,
            records::USER_ID_TAG,
            self.user_id,
            self.field,
            self.value,
            self.timestamp_ns
        )
    }
}

/// Format heart-rate samples
///
/// # Errors
///
/// Returns a data-shape error when `values` is missing or a sample is malformed
pub fn format_heart_rate(payload: &Value, user_id: &str) -> AppResult<Vec<LineRecord>> {
    let series = HeartRateSeries::deserialize(payload)
        .map_err(|e| ScraperError::data_shape(format!("Invalid heart rate payload: {e}")))?;

    series
        .values
        .into_iter()
        .map(|sample| {
            let timestamp_ns = sample
                .time
                .checked_mul(records::NANOS_PER_MILLI)
                .ok_or_else(|| {
                    ScraperError::data_shape(format!(
                        "Heart rate timestamp {} out of range",
                        sample.time
                    ))
                })?;
            Ok(LineRecord {
                measurement: records::HEARTRATE,
                user_id: user_id.to_owned(),
                field: records::BPM_FIELD,
                value: sample.data,
                timestamp_ns,
            })
        })
        .collect()
}

/// Format sleep and workout records from cycle days
///
/// Per day, the sleep record (when the sleep is complete) comes before that
/// day's workout records.
///
/// # Errors
///
/// Returns a data-shape error when the payload is not a list of days, a needed
/// date is missing or unparsable, or a complete sleep has no score
pub fn format_cycles(payload: &Value, user_id: &str) -> AppResult<Vec<LineRecord>> {
    let days = Vec::<CycleDay>::deserialize(payload)
        .map_err(|e| ScraperError::data_shape(format!("Invalid cycles payload: {e}")))?;

    let mut lines = Vec::new();
    for day in &days {
        if let Some(sleep) = day
            .sleep
            .as_ref()
            .filter(|s| s.state.as_deref() == Some(records::SLEEP_STATE_COMPLETE))
        {
            let score = sleep
                .score
                .clone()
                .ok_or_else(|| ScraperError::data_shape("Complete sleep is missing its score"))?;
            lines.push(LineRecord {
                measurement: records::SLEEP,
                user_id: user_id.to_owned(),
                field: records::SLEEP_SCORE_FIELD,
                value: score,
                timestamp_ns: day_timestamp_ns(day)?,
            });
        }

        let workouts = day
            .strain
            .as_ref()
            .and_then(|strain| strain.workouts.as_deref())
            .unwrap_or_default();
        if !workouts.is_empty() {
            let timestamp_ns = day_timestamp_ns(day)?;
            lines.extend(workouts.iter().map(|workout| LineRecord {
                measurement: records::WORKOUT,
                user_id: user_id.to_owned(),
                field: records::MAX_HEARTRATE_FIELD,
                value: workout.max_heart_rate.clone(),
                timestamp_ns,
            }));
        }
    }
    Ok(lines)
}

/// Format every fetched payload, heart rate first
///
/// # Errors
///
/// Returns the first data-shape error; no partial output is produced
pub fn format_payloads(payloads: &FetchedPayloads, user_id: &str) -> AppResult<Vec<LineRecord>> {
    let mut lines = Vec::new();
    if let Some(heart_rate) = &payloads.heart_rate {
        lines.extend(format_heart_rate(heart_rate, user_id)?);
    }
    if let Some(cycles) = &payloads.cycles {
        lines.extend(format_cycles(cycles, user_id)?);
    }
    Ok(lines)
}

/// Render records as text lines
#[must_use]
pub fn render(records: &[LineRecord]) -> Vec<String> {
    records.iter().map(ToString::to_string).collect()
}

/// Epoch nanoseconds of UTC midnight of the day's first date
fn day_timestamp_ns(day: &CycleDay) -> AppResult<i64> {
    let raw = day
        .days
        .first()
        .ok_or_else(|| ScraperError::data_shape("Cycle is missing its day"))?;
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| ScraperError::data_shape(format!("Invalid cycle day '{raw}': {e}")))?;
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
        .checked_mul(records::NANOS_PER_MILLI)
        .ok_or_else(|| ScraperError::data_shape(format!("Cycle day '{raw}' out of range")))
}
