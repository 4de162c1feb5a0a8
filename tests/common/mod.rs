// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use playground_map::config::Config;
use playground_map::Projection;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Canned reply of the fake service map API.
#[allow(dead_code)]
#[derive(Clone)]
pub enum Reply {
    /// JSON body; `{base}` in string values is replaced by the endpoint URL
    Json(Value),
    Status(u16, String),
    /// 200 with an arbitrary body
    Raw(String),
}

struct FakeState {
    base: String,
    replies: Vec<Reply>,
    delay: Duration,
    hits: AtomicUsize,
    queries: Mutex<Vec<HashMap<String, String>>>,
}

/// Running fake API. Page N of the reply list is served for `?page=N`.
#[allow(dead_code)]
pub struct FakeApi {
    pub url: String,
    state: Arc<FakeState>,
}

#[allow(dead_code)]
impl FakeApi {
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.state.queries.lock().unwrap().clone()
    }
}

/// Start a fake API on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_fake_api(replies: Vec<Reply>) -> FakeApi {
    spawn_fake_api_with_delay(replies, Duration::ZERO).await
}

#[allow(dead_code)]
pub async fn spawn_fake_api_with_delay(replies: Vec<Reply>, delay: Duration) -> FakeApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake API");
    let addr = listener.local_addr().unwrap();
    let url = format!("http://{}/unit/", addr);

    let state = Arc::new(FakeState {
        base: url.clone(),
        replies,
        delay,
        hits: AtomicUsize::new(0),
        queries: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/unit/", get(serve_units))
        .with_state(Arc::clone(&state));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeApi { url, state }
}

async fn serve_units(
    State(state): State<Arc<FakeState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.queries.lock().unwrap().push(query.clone());

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let page: usize = query
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);

    match state.replies.get(page.saturating_sub(1)) {
        Some(Reply::Json(body)) => {
            let body = body.to_string().replace("{base}", &state.base);
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Some(Reply::Status(code, body)) => {
            (StatusCode::from_u16(*code).unwrap(), body.clone()).into_response()
        }
        Some(Reply::Raw(body)) => body.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A unit record in wire format.
#[allow(dead_code)]
pub fn unit_json(id: u64, name: &str, lat_lon: Option<(f64, f64)>) -> Value {
    let location = match lat_lon {
        Some((lat, lon)) => json!({"type": "Point", "coordinates": [lon, lat]}),
        None => Value::Null,
    };
    json!({
        "id": id,
        "name": {"fi": name},
        "location": location,
        "municipality": "helsinki",
        "service_nodes": [1081],
    })
}

/// A response envelope in wire format.
#[allow(dead_code)]
pub fn page_json(count: usize, results: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "count": count,
        "next": next,
        "previous": null,
        "results": results,
    })
}

/// Config pointing at `url` with a short timeout.
#[allow(dead_code)]
pub fn test_config(url: &str) -> Config {
    Config {
        units_api_url: url.to_string(),
        request_timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

/// URL where nothing listens, for transport failures.
#[allow(dead_code)]
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/unit/", addr)
}

/// Wait until a published projection satisfies `pred`.
#[allow(dead_code)]
pub async fn wait_for<F>(rx: &mut watch::Receiver<Projection>, pred: F) -> Projection
where
    F: FnMut(&Projection) -> bool,
{
    tokio::time::timeout(Duration::from_secs(10), rx.wait_for(pred))
        .await
        .expect("Timed out waiting for projection")
        .expect("Session closed")
        .clone()
}
