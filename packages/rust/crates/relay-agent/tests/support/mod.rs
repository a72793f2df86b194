#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use serde_json::{Value, json};
use tokio::sync::Mutex;

pub const FAKE_TOKEN: &str = "fake-token";

/// Scripted stand-in for the Bot API. Unscripted calls succeed, except `getUpdates`,
/// which answers 401 so polling loops end deterministically.
#[derive(Clone, Default)]
pub struct MockTelegramState {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
    scripted: Arc<Mutex<HashMap<String, VecDeque<(StatusCode, Value)>>>>,
}

impl MockTelegramState {
    pub async fn script(&self, method: &str, response: (StatusCode, Value)) {
        self.scripted
            .lock()
            .await
            .entry(method.to_string())
            .or_default()
            .push_back(response);
    }

    pub async fn requests_for(&self, method: &str) -> Vec<Value> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|(name, _)| name == method)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

pub fn rate_limited(retry_after: u64) -> (StatusCode, Value) {
    (
        StatusCode::TOO_MANY_REQUESTS,
        json!({
            "ok": false,
            "error_code": 429,
            "description": format!("Too Many Requests: retry after {retry_after}"),
            "parameters": {"retry_after": retry_after}
        }),
    )
}

pub fn ok(result: Value) -> (StatusCode, Value) {
    (StatusCode::OK, json!({"ok": true, "result": result}))
}

async fn handle_method(
    State(state): State<MockTelegramState>,
    Path(method): Path<String>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .requests
        .lock()
        .await
        .push((method.clone(), payload));

    let scripted = state
        .scripted
        .lock()
        .await
        .get_mut(&method)
        .and_then(VecDeque::pop_front);
    let (status, body) = scripted.unwrap_or_else(|| match method.as_str() {
        "getUpdates" => (
            StatusCode::UNAUTHORIZED,
            json!({"ok": false, "error_code": 401, "description": "Unauthorized"}),
        ),
        "sendMessage" => ok(json!({"message_id": 1})),
        _ => ok(json!({})),
    });
    (status, Json(body))
}

pub async fn spawn_mock_telegram_api()
-> Result<Option<(String, MockTelegramState, tokio::task::JoinHandle<()>)>> {
    let state = MockTelegramState::default();
    let app = Router::new()
        .route(&format!("/bot{FAKE_TOKEN}/{{method}}"), post(handle_method))
        .with_state(state.clone());
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            eprintln!("skipping telegram mock tests: local socket bind is not permitted");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    wait_for_listener(addr).await;

    Ok(Some((format!("http://{addr}"), state, handle)))
}

async fn wait_for_listener(addr: std::net::SocketAddr) {
    for _ in 0..20 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
