// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Provides quiet logging and an axum stub of the WHOOP token and metric endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `whoop_scraper`

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::env;
use std::sync::{Arc, Mutex, Once};
use tokio::net::TcpListener;
use whoop_scraper::config::{Credentials, ScraperConfig};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub const TEST_USERNAME: &str = "ryan@example.com";
pub const TEST_PASSWORD: &str = "correct-horse";
pub const TEST_USER_ID: i64 = 12345;
pub const TEST_TOKEN: &str = "stub-access-token";

/// One request seen by the stub
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Decoded value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.replace("%3A", ":"))
        })
    }
}

/// Canned response for one endpoint
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: Value,
}

impl StubResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: json!({"error": "rejected"}),
        }
    }
}

/// Behaviour and request log of the stub WHOOP API
#[derive(Debug)]
pub struct StubState {
    pub token: StubResponse,
    pub heart_rate: StubResponse,
    pub cycles: StubResponse,
    pub requests: Vec<RecordedRequest>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            token: StubResponse::ok(json!({
                "access_token": TEST_TOKEN,
                "expires_in": 86400,
                "user": {"id": TEST_USER_ID, "firstName": "Ryan"}
            })),
            heart_rate: StubResponse::ok(sample_heart_rate()),
            cycles: StubResponse::ok(sample_cycles()),
            requests: Vec::new(),
        }
    }
}

type SharedStub = Arc<Mutex<StubState>>;

/// Running stub server
pub struct StubWhoop {
    pub base_url: String,
    pub state: SharedStub,
}

impl StubWhoop {
    /// Start a stub with default, successful responses
    pub async fn start() -> Self {
        Self::start_with(StubState::default()).await
    }

    /// Start a stub with the given behaviour
    pub async fn start_with(state: StubState) -> Self {
        init_test_logging();
        let state = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/oauth/token", post(token))
            .route("/users/:id/metrics/heart_rate", get(heart_rate))
            .route("/users/:id/cycles", get(cycles))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Paths requested so far
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    /// Scraper configuration pointing at this stub
    pub fn config(&self) -> ScraperConfig {
        ScraperConfig::new(Credentials::new(TEST_USERNAME, TEST_PASSWORD))
            .with_api_base_url(self.base_url.clone())
    }
}

fn record(
    state: &SharedStub,
    path: String,
    query: Option<String>,
    headers: &HeaderMap,
    body: Option<Value>,
) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.lock().unwrap().requests.push(RecordedRequest {
        path,
        query,
        authorization,
        body,
    });
}

fn reply(response: &StubResponse) -> (StatusCode, Json<Value>) {
    (
        StatusCode::from_u16(response.status).unwrap(),
        Json(response.body.clone()),
    )
}

async fn token(
    State(state): State<SharedStub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(&state, "/oauth/token".to_owned(), None, &headers, Some(body.clone()));
    let mut response = state.lock().unwrap().token.clone();
    let accepted = body["username"] == TEST_USERNAME && body["password"] == TEST_PASSWORD;
    if response.status == 200 && !accepted {
        response = StubResponse::status(401);
    }
    reply(&response)
}

async fn heart_rate(
    State(state): State<SharedStub>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let path = format!("/users/{id}/metrics/heart_rate");
    record(&state, path, query, &headers, None);
    let response = state.lock().unwrap().heart_rate.clone();
    reply(&response)
}

async fn cycles(
    State(state): State<SharedStub>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let path = format!("/users/{id}/cycles");
    record(&state, path, query, &headers, None);
    let response = state.lock().unwrap().cycles.clone();
    reply(&response)
}

/// Two heart-rate samples
pub fn sample_heart_rate() -> Value {
    json!({
        "values": [
            {"time": 1_640_995_200_000_i64, "data": 62},
            {"time": 1_640_995_206_000_i64, "data": 64}
        ]
    })
}

/// Three cycle days: complete sleep with workouts, in-progress sleep, empty strain
pub fn sample_cycles() -> Value {
    json!([
        {
            "days": ["2022-01-01"],
            "sleep": {"state": "complete", "score": 85},
            "strain": {"workouts": [{"maxHeartRate": 171}, {"maxHeartRate": 158}]}
        },
        {
            "days": ["2022-01-02"],
            "sleep": {"state": "in_progress", "score": null},
            "strain": null
        },
        {
            "days": ["2022-01-03"],
            "sleep": null,
            "strain": {"workouts": []}
        }
    ])
}
