// ABOUTME: HTTP server binary exposing the WHOOP request handler
// ABOUTME: Each request runs an independent scrape session and answers with its envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::debug;
use whoop_scraper::{
    constants::{env_config, http},
    handler::HandlerSettings,
    logging, server,
};

#[derive(Parser, Debug)]
#[command(name = "whoop-handler", version)]
#[command(about = "Serve the WHOOP line-protocol handler over HTTP")]
struct Args {
    /// Address to bind
    #[arg(long, env = env_config::HANDLER_BIND, default_value = http::DEFAULT_HANDLER_BIND)]
    bind: String,

    /// WHOOP API base URL (defaults to WHOOP_API_BASE_URL or the public API)
    #[arg(long)]
    api_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();
    logging::init_from_env()?;
    if let Err(e) = dotenv {
        debug!("No .env file loaded: {e}");
    }

    let mut settings = HandlerSettings::from_env()?;
    if let Some(url) = args.api_base_url {
        settings.api_base_url = url;
    }

    let listener = TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    server::serve(listener, settings).await?;
    Ok(())
}
