// ABOUTME: Command-line arguments and output contract of the whoop-scraper binary
// ABOUTME: Applies flag overrides over the environment and writes records or one error record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Scraper CLI
//!
//! Flags take precedence over `WHOOP_*` environment variables. Records go to
//! stdout one per line; a failed run writes exactly one `error msg=...` line
//! and exits with status 1.

use crate::config::{parse_anchor_date, MetricSelection, ScraperConfig};
use crate::errors::AppResult;
use crate::logging::LoggingConfig;
use crate::session::Session;
use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use tracing::{error, info};

/// Exit status of a successful run
pub const EXIT_SUCCESS: u8 = 0;

/// Exit status of a failed run
pub const EXIT_FAILURE: u8 = 1;

/// Flags accepted by `whoop-scraper`
#[derive(Parser, Debug, Default)]
#[command(name = "whoop-scraper", version)]
#[command(about = "Print WHOOP heart rate, sleep and workout data as InfluxDB line protocol")]
pub struct ScrapeArgs {
    /// Anchor the window at midnight UTC of this day (YYYY-MM-DD) instead of now
    #[arg(long)]
    pub start_date: Option<String>,

    /// Heart-rate lookback window in seconds
    #[arg(long)]
    pub window_seconds: Option<u64>,

    /// Interval between heart-rate samples in seconds
    #[arg(long)]
    pub interval_seconds: Option<u64>,

    /// WHOOP API base URL
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Only fetch heart-rate data
    #[arg(long)]
    pub heart_rate_only: bool,
}

impl ScrapeArgs {
    /// Overlay the flags on a configuration loaded from the environment
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if `--start-date` is not a calendar date
    pub fn apply(self, mut config: ScraperConfig) -> AppResult<ScraperConfig> {
        if let Some(raw) = self.start_date.as_deref() {
            config.anchor_date = Some(parse_anchor_date(raw)?);
        }
        if let Some(seconds) = self.window_seconds {
            config.window_seconds = seconds;
        }
        if let Some(seconds) = self.interval_seconds {
            config.interval_seconds = seconds;
        }
        if let Some(url) = self.api_base_url {
            config.api_base_url = url;
        }
        if self.heart_rate_only {
            config.metrics = MetricSelection::heart_rate_only();
        }
        Ok(config)
    }
}

/// Load a `.env` file, then read the logging configuration
///
/// `env_file` selects a specific file; `None` searches the working directory
/// and its parents. A missing file is not an error, and variables already set
/// in the process environment win over the file.
#[must_use]
pub fn load_environment(env_file: Option<&Path>) -> LoggingConfig {
    let loaded = env_file.map_or_else(|| dotenvy::dotenv().map(drop), dotenvy::from_path);
    if let Err(e) = loaded {
        if !e.not_found() {
            eprintln!("Failed to load .env file: {e}");
        }
    }
    LoggingConfig::from_env()
}

/// Load the environment, apply the flags and run one session
///
/// # Errors
///
/// Returns the first configuration, authentication, fetch or formatting error
pub async fn scrape(args: ScrapeArgs) -> AppResult<Vec<String>> {
    let config = args.apply(ScraperConfig::from_env()?)?;
    info!("{}", config.summary());
    let mut session = Session::new(config)?;
    session.run().await
}

/// Write a run outcome and return the process exit status
///
/// # Errors
///
/// Returns an error if writing to `out` fails
pub fn write_outcome<W: Write>(outcome: &AppResult<Vec<String>>, out: &mut W) -> io::Result<u8> {
    match outcome {
        Ok(lines) => {
            for line in lines {
                writeln!(out, "{line}")?;
            }
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            error!(error.kind = ?e.kind(), "{e}");
            writeln!(out, "{}", e.to_error_line())?;
            Ok(EXIT_FAILURE)
        }
    }
}
