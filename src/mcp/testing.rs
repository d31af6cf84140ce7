//! In-process stand-in for BambooHR used by the unit tests.
//!
//! Responses are registered per method and path; anything unregistered gets
//! a 404. Every request is recorded so tests can assert on what went out.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use reqwest::Url;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::mcp::http::BambooClient;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let query = self.query.clone().unwrap_or_default();
        let url = Url::parse(&format!("http://mock/?{query}")).expect("query parses");
        url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
    }

    pub fn body_json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(Method, String), Canned>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockUpstream {
    base_url: Url,
    state: Arc<MockState>,
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().expect("requests lock").push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    let canned = state
        .routes
        .lock()
        .expect("routes lock")
        .get(&(method, path))
        .cloned();
    match canned {
        Some(canned) => (canned.status, [(CONTENT_TYPE, canned.content_type)], canned.body).into_response(),
        None => (StatusCode::NOT_FOUND, "no such route").into_response(),
    }
}

impl MockUpstream {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let router = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock upstream");
        let address = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock upstream serves");
        });

        Self {
            base_url: Url::parse(&format!("http://{address}/v1")).expect("base url"),
            state,
        }
    }

    /// An upstream that refuses connections, for transport failures.
    pub async fn unreachable_client() -> BambooClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local addr");
        drop(listener);
        let base_url = Url::parse(&format!("http://{address}/v1")).expect("base url");
        BambooClient::new(base_url, "test-key").expect("client")
    }

    pub fn client(&self) -> BambooClient {
        BambooClient::new(self.base_url.clone(), "test-key").expect("client")
    }

    fn route(&self, method: Method, path: &str, status: StatusCode, content_type: &'static str, body: String) {
        self.state.routes.lock().expect("routes lock").insert(
            (method, format!("/v1{path}")),
            Canned {
                status,
                content_type,
                body,
            },
        );
    }

    pub fn json(&self, method: Method, path: &str, body: Value) {
        self.route(method, path, StatusCode::OK, "application/json", body.to_string());
    }

    pub fn xml(&self, method: Method, path: &str, body: &str) {
        self.route(method, path, StatusCode::OK, "application/xml", body.to_string());
    }

    pub fn text(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.route(method, path, status, "text/plain", body.to_string());
    }

    /// Recorded requests with the `/v1` prefix stripped from their paths.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("requests lock")
            .iter()
            .cloned()
            .map(|mut request| {
                if let Some(stripped) = request.path.strip_prefix("/v1") {
                    request.path = stripped.to_string();
                }
                request
            })
            .collect()
    }

    pub fn single_request(&self) -> RecordedRequest {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        requests.remove(0)
    }
}

/// Text of the first content block of a tool envelope.
pub fn envelope_text(result: &rmcp::model::CallToolResult) -> String {
    let value = serde_json::to_value(result).expect("envelope serializes");
    value["content"][0]["text"]
        .as_str()
        .expect("text content")
        .to_string()
}

pub fn is_error_flagged(result: &rmcp::model::CallToolResult) -> bool {
    let value = serde_json::to_value(result).expect("envelope serializes");
    value["isError"].as_bool().unwrap_or(false)
}
