#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;
use trackani::IdentityVerifier;
use trackani::UserId;
use trackani::db::DbActorHandle;
use trackani::error::IdentityError;
use trackani::server::router::{TrackaniState, trackani_router};

pub const TOKEN_A: &str = "token-user-a";
pub const TOKEN_B: &str = "token-user-b";
pub const USER_A: &str = "user_a";
pub const USER_B: &str = "user_b";

/// SQLite file under the temp dir, removed (with WAL/SHM siblings) on drop.
pub struct TempDb {
    path: PathBuf,
}

impl TempDb {
    pub fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "trackani-{prefix}-{}-{nanos}.sqlite",
            std::process::id()
        ));
        Self { path }
    }

    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    pub async fn spawn(&self) -> DbActorHandle {
        trackani::db::spawn(&self.url())
            .await
            .expect("failed to spawn DbActor")
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let base = self.path.to_string_lossy().into_owned();
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{base}{suffix}"));
        }
    }
}

/// Identity provider stand-in with a fixed token table.
pub struct StaticIdentity {
    tokens: HashMap<String, UserId>,
}

impl StaticIdentity {
    pub fn two_users() -> Self {
        let tokens = [(TOKEN_A, USER_A), (TOKEN_B, USER_B)]
            .into_iter()
            .map(|(token, user)| (token.to_string(), UserId::new(user)))
            .collect();
        Self { tokens }
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentity {
    async fn verify(&self, token: &str) -> Result<UserId, IdentityError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(IdentityError::Rejected(StatusCode::UNAUTHORIZED))
    }
}

pub async fn test_app(db: &TempDb) -> Router {
    let state = TrackaniState::new(db.spawn().await, Arc::new(StaticIdentity::two_users()));
    trackani_router(state, &["http://localhost:5173".to_string()])
}

/// Sends one request through the router and decodes the JSON response body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body was not JSON")
    };
    (status, json)
}
