//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - An app over a fresh in-memory store (no database needed)
//! - Request helpers that drive the router with `tower::Service::call`
//! - Register/login helpers that hand back the credential cookie

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tickoff_api::{
    app::{build_router, AppState},
    config::{ApiConfig, AuthConfig, Config, DatabaseConfig},
};
use tickoff_shared::store::{memory::MemoryStore, Store};
use tower::Service as _;

pub const SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

/// Status, headers and decoded body of one response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body, or the raw text as a JSON string when the body isn't JSON
    pub body: Value,
}

impl TestResponse {
    /// `name=value` part of the `Set-Cookie` header, if any
    pub fn cookie_pair(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|pair| pair.trim().to_string())
    }

    /// Full `Set-Cookie` header value, if any
    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

pub fn test_config(token_ttl_seconds: Option<i64>) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            cookie_secure: false,
        },
        database: DatabaseConfig {
            url: "memory://".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig {
            secret: SECRET.to_string(),
            token_ttl_seconds,
        },
    }
}

impl TestContext {
    /// Creates a new test context over an empty store
    pub fn new() -> Self {
        Self::with_config(test_config(None))
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone() as Arc<dyn Store>, config);
        let app = build_router(state.clone());

        Self { app, store, state }
    }

    /// Sends one request through the router
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .call(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({
                "username": username,
                "email": email,
                "password": password,
            })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers `name` (email `name@x.com`, password `pw-name`) and logs in
    ///
    /// Returns the `token=...` cookie pair.
    pub async fn signed_in(&self, name: &str) -> String {
        let email = format!("{}@x.com", name);
        let password = format!("pw-{}", name);

        let registered = self.register(name, &email, &password).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{:?}", registered.body);

        let logged_in = self.login(&email, &password).await;
        assert_eq!(logged_in.status, StatusCode::OK, "{:?}", logged_in.body);

        logged_in.cookie_pair().unwrap()
    }

    /// Creates a todo as the cookie's owner and returns its id
    pub async fn create_todo(&self, cookie: &str, title: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/todos",
                Some(cookie),
                Some(json!({ "title": title })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        response.body["todo"]["id"].as_str().unwrap().to_string()
    }

    pub async fn list_todos(&self, cookie: &str) -> TestResponse {
        self.request(Method::GET, "/api/todos", Some(cookie), None)
            .await
    }
}
