//! A local stand-in for the upstream option-chain API.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};

use option_chain_proxy::config::Config;

pub const SESSION_COOKIE: &str = "nsit=session-token";

#[derive(Default)]
pub struct MockState {
    /// Data requests received, per symbol.
    pub hits: Mutex<HashMap<String, usize>>,
    pub root_hits: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    /// Data requests that carried the bootstrap cookie.
    pub with_cookie: AtomicUsize,
    /// Symbols that always answer 503.
    pub failing: Mutex<HashSet<String>>,
    /// Symbols that answer 503 for their first N requests.
    pub flaky: Mutex<HashMap<String, usize>>,
    pub root_fails: AtomicBool,
    pub delay: Mutex<Duration>,
}

impl MockState {
    pub fn hits(&self, symbol: &str) -> usize {
        self.hits.lock().unwrap().get(symbol).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }

    pub fn fail_always(&self, symbol: &str) {
        self.failing.lock().unwrap().insert(symbol.to_string());
    }

    pub fn fail_first(&self, symbol: &str, times: usize) {
        self.flaky.lock().unwrap().insert(symbol.to_string(), times);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }
}

pub struct MockUpstream {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockUpstream {
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/", get(root))
            .route("/api/option-chain-equities", get(chain))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Config pointed at this mock, with short timings.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.upstream.base_url = self.base_url.clone();
        config.upstream.backoff_step_ms = 10;
        config.upstream.request_timeout_ms = 5_000;
        config.upstream.bootstrap_timeout_ms = 5_000;
        config.batch.throttle_ms = 5;
        config
    }
}

async fn root(State(state): State<Arc<MockState>>) -> Response {
    state.root_hits.fetch_add(1, Ordering::SeqCst);
    if state.root_fails.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
        "<html></html>",
    )
        .into_response()
}

async fn chain(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let symbol = params.get("symbol").cloned().unwrap_or_default();
    *state.hits.lock().unwrap().entry(symbol.clone()).or_default() += 1;

    let has_cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(SESSION_COOKIE));
    if has_cookie {
        state.with_cookie.fetch_add(1, Ordering::SeqCst);
    }

    let browser_like = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ua| ua.starts_with("Mozilla/5.0"));
    if !browser_like {
        return StatusCode::FORBIDDEN.into_response();
    }

    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.max_in_flight.fetch_max(now, Ordering::SeqCst);
    let delay = *state.delay.lock().unwrap();
    tokio::time::sleep(delay).await;
    state.in_flight.fetch_sub(1, Ordering::SeqCst);

    if state.failing.lock().unwrap().contains(&symbol) {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    {
        let mut flaky = state.flaky.lock().unwrap();
        if let Some(remaining) = flaky.get_mut(&symbol) {
            if *remaining > 0 {
                *remaining -= 1;
                return StatusCode::SERVICE_UNAVAILABLE.into_response();
            }
        }
    }

    Json(payload(&symbol)).into_response()
}

/// Three strikes across two expiries; the underlying encodes the symbol length
/// so tests can tell payloads apart.
pub fn payload(symbol: &str) -> Value {
    json!({
        "records": {
            "underlyingValue": 100.0 + symbol.len() as f64,
            "expiryDates": ["25-Nov-2025", "30-Dec-2025"],
            "data": [
                {
                    "strikePrice": 100,
                    "CE": { "expiryDate": "25-Nov-2025", "lastPrice": 5.5, "openInterest": 120,
                            "changeinOpenInterest": 10, "totalTradedVolume": 900,
                            "impliedVolatility": 21.5, "bidprice": 5.4, "askPrice": 5.6 },
                    "PE": { "expiryDate": "25-Nov-2025", "lastPrice": 1.1, "openInterest": 80,
                            "bidPrice": 1.0, "askPrice": 1.2 }
                },
                {
                    "strikePrice": 110,
                    "CE": { "expiryDate": "30-Dec-2025", "lastPrice": 2.0, "openInterest": 50 },
                    "PE": null
                },
                {
                    "strikePrice": 120,
                    "PE": { "expiryDate": "25-Nov-2025", "openInterest": 300 }
                }
            ]
        }
    })
}
