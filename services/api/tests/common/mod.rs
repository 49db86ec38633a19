//! Shared fixtures for the service integration tests.

#![allow(dead_code)]

use api_lib::config::Config;
use api_lib::web::{self, AppState};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storyland_core::ports::{PortError, PortResult, TranslationService};
use storyland_core::{Language, MemoryStore};
use tower::ServiceExt;

/// Prefixes every text with its language code, or fails when offline.
pub struct FakeTranslator {
    pub calls: AtomicUsize,
    offline: bool,
}

impl FakeTranslator {
    pub fn online() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            offline: false,
        })
    }

    pub fn offline() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            offline: true,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationService for FakeTranslator {
    async fn translate(&self, text: &str, target: Language) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(PortError::Unexpected("connection refused".to_string()));
        }
        Ok(format!("[{}] {}", target.code(), text))
    }
}

pub async fn app_state(remote: Arc<FakeTranslator>) -> Arc<AppState> {
    let state = AppState::build(Config::default(), Arc::new(MemoryStore::new()), remote)
        .await
        .unwrap();
    Arc::new(state)
}

pub async fn app(remote: Arc<FakeTranslator>) -> Router {
    web::router(app_state(remote).await)
}

/// Sends one request and returns the status with the raw body text.
pub async fn send_text(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Sends one request and returns the status with the body parsed as JSON
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = send_text(app, method, uri, body).await;
    (status, serde_json::from_str(&text).unwrap_or(Value::Null))
}

pub fn signup_body(name: &str, age: u8, pin: &str, confirm_pin: &str) -> Value {
    serde_json::json!({
        "name": name,
        "age": age,
        "pin": pin,
        "confirmPin": confirm_pin,
    })
}

/// Creates the device profile and logs it in.
pub async fn signed_in(app: &Router) {
    let (status, _) = send(app, "POST", "/auth/signup", Some(signup_body("Mona", 6, "1234", "1234"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        app,
        "POST",
        "/auth/login",
        Some(serde_json::json!({ "name": "mona", "pin": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
