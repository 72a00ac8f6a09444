use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

pub static DEFAULT_SESSION_VERIFY_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://api.clerk.com/v1/sessions/verify").expect("valid session verify url")
});

/// Identity provider settings used by the bearer-token gate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Session verification endpoint. Receives `{"token": ...}` and answers with `user_id`.
    /// TOML: `identity.verify_url`. Default: Clerk's `/v1/sessions/verify`.
    #[serde(default = "default_verify_url")]
    pub verify_url: Url,

    /// Backend secret presented to the identity provider (required, non-empty).
    /// TOML: `identity.secret_key`.
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_lax")]
    pub secret_key: String,

    /// Optional HTTP proxy for identity provider calls.
    /// TOML: `identity.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Per-request timeout for verification calls, in seconds.
    /// TOML: `identity.timeout_secs`. Default: `10`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Max retry attempts when the provider answers 5xx or the connection fails.
    /// TOML: `identity.retry_max_times`. Default: `2`.
    #[serde(default = "default_retry_max_times")]
    pub retry_max_times: usize,

    /// How long a verified token maps to its user without asking the provider again.
    /// `0` disables the cache.
    /// TOML: `identity.cache_ttl_secs`. Default: `30`.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Upper bound on cached tokens.
    /// TOML: `identity.cache_max_capacity`. Default: `10000`.
    #[serde(default = "default_cache_max_capacity")]
    pub cache_max_capacity: u64,
}

impl IdentityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            verify_url: default_verify_url(),
            // No insecure default. `Config::load()` enforces non-empty.
            secret_key: String::new(),
            proxy: None,
            timeout_secs: default_timeout_secs(),
            retry_max_times: default_retry_max_times(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_capacity: default_cache_max_capacity(),
        }
    }
}

fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for identity.secret_key",
        )),
    }
}

fn default_verify_url() -> Url {
    DEFAULT_SESSION_VERIFY_URL.clone()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retry_max_times() -> usize {
    2
}

fn default_cache_ttl_secs() -> u64 {
    30
}

fn default_cache_max_capacity() -> u64 {
    10_000
}
