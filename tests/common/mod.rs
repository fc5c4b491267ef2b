#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use reqwest::Client;
use serde_json::{json, Value};

use sheet_relay::config::{Config, Encoding, RelayConfig};

/// A request the stub sheet service received.
#[derive(Debug, Clone)]
pub struct Received {
    pub content_type: String,
    pub body: String,
}

impl Received {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("stub received non-JSON body")
    }

    pub fn form(&self) -> Vec<(String, String)> {
        form_urlencoded::parse(self.body.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// What the stub sheet service answers with.
#[derive(Debug, Clone)]
pub struct StubReply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub delay: Option<Duration>,
}

impl StubReply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn ok() -> Self {
        Self::json(200, json!({ "success": true, "message": "Data saved successfully" }))
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    received: Arc<Mutex<Vec<Received>>>,
}

/// A stand-in for the external sheet script, listening on a random port.
pub struct SheetStub {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<Received>>>,
}

impl SheetStub {
    pub fn url(&self) -> String {
        format!("http://{}/exec", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn stub_exec(State(stub): State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    stub.received.lock().unwrap().push(Received {
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    if let Some(delay) = stub.reply.delay {
        tokio::time::sleep(delay).await;
    }

    (
        StatusCode::from_u16(stub.reply.status).unwrap(),
        [("content-type", stub.reply.content_type)],
        stub.reply.body.clone(),
    )
        .into_response()
}

pub async fn spawn_sheet_stub(reply: StubReply) -> SheetStub {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        reply,
        received: received.clone(),
    };
    let app = Router::new().route("/exec", post(stub_exec)).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server failed");
    });

    SheetStub { addr, received }
}

/// A URL nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/exec")
}

pub fn test_config(target: &str) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        relay: RelayConfig::new(target, Encoding::Json),
        relay_paths: vec![
            "/api/submit-form".to_string(),
            "/api/webhook".to_string(),
        ],
        allowed_origins: vec![],
        max_body_size: 65_536,
        default_form_type: None,
        log_level: "warn".to_string(),
    }
}

/// A running relay instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST JSON to the relay, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, reqwest::StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/submit-form"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST form-urlencoded data to the relay, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, reqwest::StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/submit-form"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub async fn spawn_app(config: Config) -> TestApp {
    let app = sheet_relay::build_app(config).expect("Failed to build app");
    serve(app).await
}

pub async fn serve(app: Router) -> TestApp {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}
