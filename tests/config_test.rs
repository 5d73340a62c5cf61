// ABOUTME: Tests for environment-driven scraper and handler configuration
// ABOUTME: Runs serially since every test mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use whoop_scraper::{
    config::{Credentials, HttpClientConfig, ScraperConfig},
    constants::env_config,
    errors::ScraperError,
    handler::HandlerSettings,
};

const ALL_VARS: [&str; 8] = [
    env_config::USERNAME,
    env_config::PASSWORD,
    env_config::START_DATE,
    env_config::WINDOW_SECONDS,
    env_config::INTERVAL_SECONDS,
    env_config::API_BASE_URL,
    env_config::HTTP_TIMEOUT_SECS,
    env_config::HTTP_CONNECT_TIMEOUT_SECS,
];

fn clear_env() {
    for key in ALL_VARS {
        env::remove_var(key);
    }
}

fn set_credentials() {
    env::set_var(env_config::USERNAME, "ryan@example.com");
    env::set_var(env_config::PASSWORD, "secret");
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    set_credentials();

    let config = ScraperConfig::from_env().unwrap();
    assert_eq!(
        config.credentials,
        Credentials::new("ryan@example.com", "secret")
    );
    assert_eq!(config.window_seconds, 480);
    assert_eq!(config.interval_seconds, 6);
    assert!(config.anchor_date.is_none());
    assert_eq!(config.api_base_url, "https://api-7.whoop.com");
    assert_eq!(config.http.timeout_secs, 30);

    clear_env();
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    set_credentials();
    env::set_var(env_config::START_DATE, "2022-01-01");
    env::set_var(env_config::WINDOW_SECONDS, "900");
    env::set_var(env_config::INTERVAL_SECONDS, "30");
    env::set_var(env_config::API_BASE_URL, "http://localhost:9000");
    env::set_var(env_config::HTTP_TIMEOUT_SECS, "5");

    let config = ScraperConfig::from_env().unwrap();
    assert_eq!(config.anchor_date.unwrap().to_string(), "2022-01-01");
    assert_eq!(config.window_seconds, 900);
    assert_eq!(config.interval_seconds, 30);
    assert_eq!(config.api_base_url, "http://localhost:9000");
    assert_eq!(config.http.timeout_secs, 5);
    assert!(config.summary().contains("anchor=2022-01-01"));
    assert!(!config.summary().contains("secret"));

    clear_env();
}

#[test]
#[serial]
fn test_from_env_requires_credentials() {
    clear_env();
    env::set_var(env_config::USERNAME, "ryan@example.com");

    let err = ScraperConfig::from_env().unwrap_err();
    assert!(matches!(err, ScraperError::Config(_)));
    assert!(err.to_string().contains(env_config::PASSWORD));

    clear_env();
}

#[test]
#[serial]
fn test_from_env_rejects_unparsable_window() {
    clear_env();
    set_credentials();
    env::set_var(env_config::WINDOW_SECONDS, "eight minutes");

    let err = ScraperConfig::from_env().unwrap_err();
    assert!(matches!(err, ScraperError::Config(_)));

    clear_env();
}

#[test]
#[serial]
fn test_zero_window_from_env_fails_validation_not_loading() {
    clear_env();
    set_credentials();
    env::set_var(env_config::WINDOW_SECONDS, "0");

    let config = ScraperConfig::from_env().unwrap();
    assert_eq!(config.window_seconds, 0);
    assert!(matches!(config.validate(), Err(ScraperError::Config(_))));
    assert!(config.with_window_seconds(60).validate().is_ok());

    clear_env();
}

#[test]
#[serial]
fn test_from_env_rejects_bad_start_date() {
    clear_env();
    set_credentials();
    env::set_var(env_config::START_DATE, "2022-13-01");

    let err = ScraperConfig::from_env().unwrap_err();
    assert!(matches!(err, ScraperError::InvalidInput(_)));

    clear_env();
}

#[test]
#[serial]
fn test_handler_settings_from_env() {
    clear_env();
    let defaults = HandlerSettings::from_env().unwrap();
    assert_eq!(defaults.api_base_url, "https://api-7.whoop.com");
    assert_eq!(defaults.http, HttpClientConfig::default());

    env::set_var(env_config::API_BASE_URL, "http://127.0.0.1:9999");
    env::set_var(env_config::HTTP_TIMEOUT_SECS, "5");
    env::set_var(env_config::HTTP_CONNECT_TIMEOUT_SECS, "2");
    let settings = HandlerSettings::from_env().unwrap();
    assert_eq!(settings.api_base_url, "http://127.0.0.1:9999");
    assert_eq!(settings.http.timeout_secs, 5);
    assert_eq!(settings.http.connect_timeout_secs, 2);

    env::set_var(env_config::HTTP_TIMEOUT_SECS, "soon");
    assert!(matches!(
        HandlerSettings::from_env(),
        Err(ScraperError::Config(_))
    ));

    clear_env();
}
