use super::{IdentityVerifier, UserId};
use crate::config::IdentityConfig;
use crate::error::IdentityError;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use moka::sync::Cache;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const SESSION_VERIFY_USER_AGENT: &str = concat!("trackani/", env!("CARGO_PKG_VERSION"));
const BODY_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Serialize)]
struct SessionVerifyRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionVerifyResponse {
    user_id: String,
}

/// Verifies session tokens against a hosted identity provider
/// (Clerk-style `POST /v1/sessions/verify`).
#[derive(Clone)]
pub struct SessionVerifier {
    client: reqwest::Client,
    verify_url: Url,
    secret_key: Arc<str>,
    retry_policy: ExponentialBuilder,
    cache: Option<Cache<String, UserId>>,
}

impl SessionVerifier {
    pub fn new(cfg: &IdentityConfig) -> Result<Self, IdentityError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(SESSION_VERIFY_USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(5))
            .timeout(cfg.timeout());

        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }

        let retry_policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(500))
            .with_max_times(cfg.retry_max_times)
            .with_jitter();

        let cache = cfg.cache_ttl().map(|ttl| {
            Cache::builder()
                .max_capacity(cfg.cache_max_capacity)
                .time_to_live(ttl)
                .build()
        });

        Ok(Self {
            client: builder.build()?,
            verify_url: cfg.verify_url.clone(),
            secret_key: Arc::from(cfg.secret_key.as_str()),
            retry_policy,
            cache,
        })
    }

    async fn verify_once(&self, token: &str) -> Result<UserId, IdentityError> {
        let resp = self
            .client
            .post(self.verify_url.clone())
            .bearer_auth(self.secret_key.as_ref())
            .json(&SessionVerifyRequest { token })
            .send()
            .await?;

        let status = resp.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(IdentityError::UpstreamStatus(status));
        }
        if !status.is_success() {
            return Err(IdentityError::Rejected(status));
        }

        let bytes = resp.bytes().await?;
        let session: SessionVerifyResponse =
            serde_json::from_slice(&bytes).map_err(|e| IdentityError::Parse {
                message: e.to_string(),
                body: preview(&bytes),
            })?;

        if session.user_id.trim().is_empty() {
            return Err(IdentityError::Parse {
                message: "empty user_id".to_string(),
                body: preview(&bytes),
            });
        }

        Ok(UserId::new(session.user_id))
    }
}

#[async_trait]
impl IdentityVerifier for SessionVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, IdentityError> {
        if let Some(cache) = &self.cache {
            if let Some(user) = cache.get(token) {
                return Ok(user);
            }
        }

        let user = (|| self.verify_once(token))
            .retry(self.retry_policy)
            .when(IdentityError::is_retryable)
            .notify(|err: &IdentityError, after: Duration| {
                warn!(
                    error = %err,
                    retry_after_ms = after.as_millis() as u64,
                    "Session verification failed (will retry)"
                );
            })
            .await?;

        debug!(user_id = %user, "Session verified");

        if let Some(cache) = &self.cache {
            cache.insert(token.to_string(), user.clone());
        }
        Ok(user)
    }
}

fn preview(bytes: &[u8]) -> String {
    let body = String::from_utf8_lossy(bytes);
    body.char_indices()
        .nth(BODY_PREVIEW_CHARS)
        .map(|(idx, _)| format!("{}...<truncated>", &body[..idx]))
        .unwrap_or_else(|| body.into_owned())
}
