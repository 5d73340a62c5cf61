// ABOUTME: Command-line entry point printing WHOOP metrics as line protocol on stdout
// ABOUTME: Reads credentials from the environment; any failure prints one error record and exits 1
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # WHOOP Scraper CLI
//!
//! Intended to run from a collector such as Telegraf's `exec` input: records go
//! to stdout, diagnostics to stderr.

use clap::Parser;
use std::io;
use std::process::ExitCode;
use whoop_scraper::cli::{self, ScrapeArgs, EXIT_FAILURE};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let logging = cli::load_environment(None);
    let args = ScrapeArgs::parse();

    if let Err(e) = logging.init() {
        eprintln!("{e}");
    }

    let outcome = cli::scrape(args).await;
    let status = cli::write_outcome(&outcome, &mut io::stdout().lock()).unwrap_or_else(|e| {
        eprintln!("Failed to write output: {e}");
        EXIT_FAILURE
    });
    ExitCode::from(status)
}
