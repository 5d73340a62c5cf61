// ABOUTME: Library entry point for the WHOOP line-protocol scraper
// ABOUTME: Exposes the session pipeline, request handler and supporting modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # WHOOP Scraper
//!
//! Authenticates against the WHOOP API with a username and password, fetches
//! heart-rate samples and day cycles (sleep and workouts) for a time window,
//! and renders them as InfluxDB line protocol:
//!
//! ```text
//! heartrate,user_id=12345 bpm=72 1640995200000000000
//! sleep,user_id=12345 sleep_score=85 1640995200000000000
//! workout,user_id=12345 max_heartrate=171 1640995200000000000
//! ```
//!
//! ## Architecture
//!
//! - **Session**: authenticate → compute window → fetch → format
//! - **Client**: the `WhoopApi` seam and its `reqwest` implementation
//! - **Line protocol**: pure, all-or-nothing record formatting
//! - **Handler / server**: serverless-style envelope served with `axum`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use whoop_scraper::config::ScraperConfig;
//! use whoop_scraper::errors::AppResult;
//! use whoop_scraper::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ScraperConfig::from_env()?;
//!     let mut session = Session::new(config)?;
//!     for line in session.collect_lines().await {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

/// Command-line arguments and output of the scraper binary
pub mod cli;

/// `WhoopApi` trait and `reqwest` client
pub mod client;

/// Configuration injected into sessions
pub mod config;

/// API, window, record and environment constants
pub mod constants;

/// Error taxonomy and error records
pub mod errors;

/// Serverless-style request handler
pub mod handler;

/// Line-protocol record formatting
pub mod line_protocol;

/// Tracing subscriber setup
pub mod logging;

/// WHOOP payload and identity models
pub mod models;

/// HTTP server for the handler
pub mod server;

/// Session orchestrating a scrape
pub mod session;

/// Query window computation
pub mod window;
