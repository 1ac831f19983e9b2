//! Shared fixtures for router and handler tests.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::password::hash_password;
use crate::config::{AppConfig, JwtConfig};
use crate::db;
use crate::state::AppState;
use crate::users::{NewUser, SqliteUserRepository, Status, UserRepository};

pub const PASSWORD: &str = "password123";

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        },
    }
}

/// In-memory state seeded with the given users, all sharing `PASSWORD`.
pub async fn seeded(members: &[(&str, &str, Status)]) -> (AppState, SqliteUserRepository) {
    let pool = db::connect_in_memory().await.expect("memory pool");
    let repo = SqliteUserRepository::new(pool);
    let hash = hash_password(PASSWORD).expect("hash");
    for (username, full_name, status) in members {
        repo.create(NewUser {
            username: *username,
            password_hash: &hash,
            full_name: *full_name,
            status: *status,
        })
        .await
        .expect("seed user");
    }
    let state = AppState::from_parts(
        Arc::new(repo.clone()) as Arc<dyn UserRepository>,
        Arc::new(test_config()),
    );
    (state, repo)
}

/// Send one request through the router and decode the JSON reply
/// (`Value::Null` when the body is empty).
pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
