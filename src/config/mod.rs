mod basic;
mod identity;

pub use basic::BasicConfig;
pub use identity::{DEFAULT_SESSION_VERIFY_URL, IdentityConfig};

use crate::error::ConfigError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Identity provider settings (see `identity` table in config.toml).
    #[serde(default)]
    pub identity: IdentityConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "TRACKANI_";

impl Config {
    /// Builds a Figment that merges defaults, an optional `config.toml`, then
    /// `TRACKANI_`-prefixed environment variables (`__` separates tables, e.g.
    /// `TRACKANI_BASIC__LISTEN_PORT=8080`).
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration and validates required fields.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let cfg: Self = figment.extract().map_err(Box::new)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.secret_key.trim().is_empty() {
            return Err(ConfigError::Missing("identity.secret_key"));
        }
        if self.basic.database_url.trim().is_empty() {
            return Err(ConfigError::Missing("basic.database_url"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figment_with(toml: &str) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml))
    }

    #[test]
    fn defaults_fill_unset_fields() {
        let cfg = Config::from_figment(figment_with(
            r#"
            [identity]
            secret_key = "sk_test"
            "#,
        ))
        .expect("config loads");

        assert_eq!(cfg.basic.listen_port, 5000);
        assert_eq!(cfg.basic.database_url, "sqlite://trackani.db");
        assert_eq!(cfg.basic.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(cfg.identity.verify_url, *DEFAULT_SESSION_VERIFY_URL);
        assert_eq!(cfg.identity.cache_ttl_secs, 30);
    }

    #[test]
    fn missing_secret_key_is_rejected() {
        let err = Config::from_figment(figment_with("")).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("identity.secret_key")));
    }

    #[test]
    fn numeric_secret_key_is_accepted() {
        let cfg = Config::from_figment(figment_with(
            r#"
            [identity]
            secret_key = 12345
            cache_ttl_secs = 0
            "#,
        ))
        .expect("config loads");

        assert_eq!(cfg.identity.secret_key, "12345");
        assert!(cfg.identity.cache_ttl().is_none());
    }

    #[test]
    fn unknown_identity_keys_are_rejected() {
        let res = Config::from_figment(figment_with(
            r#"
            [identity]
            secret_key = "sk_test"
            secret = "typo"
            "#,
        ));
        assert!(matches!(res, Err(ConfigError::Figment(_))));
    }
}
