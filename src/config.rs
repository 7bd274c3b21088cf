//! Server configuration
//!
//! Combines the `serve` flags with settings read from environment variables.

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::calling_codes::{DEFAULT_DIRECTORY_URL, DEFAULT_TIMEOUT};
use crate::db::Database;
use crate::web::generate_secret;

// Environment variable names
pub const ENV_SECRET: &str = "CONTACT_ADMIN_SECRET";
pub const ENV_CALLING_CODES_URL: &str = "CONTACT_ADMIN_CALLING_CODES_URL";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "CONTACT_ADMIN_FETCH_TIMEOUT_SECS";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "127.0.0.1";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub secret: String,
    pub calling_codes_url: String,
    pub fetch_timeout: Duration,
}

impl ServerConfig {
    /// Build from CLI values and the process environment.
    pub fn from_env(bind: &str, port: u16, db_path: Option<PathBuf>) -> Result<Self> {
        Self::from_lookup(bind, port, db_path, |key| env::var(key).ok())
    }

    /// Build from CLI values and an arbitrary variable lookup.
    pub fn from_lookup<F>(bind: &str, port: u16, db_path: Option<PathBuf>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = match db_path {
            Some(path) => path,
            None => Database::default_path()?,
        };

        let secret = match lookup(ENV_SECRET).filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None => {
                warn!(
                    "{} not set; using a random secret, forms expire when the server restarts",
                    ENV_SECRET
                );
                generate_secret()
            }
        };

        let calling_codes_url = lookup(ENV_CALLING_CODES_URL)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DIRECTORY_URL.to_string());

        let fetch_timeout = match lookup(ENV_FETCH_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("{} must be a whole number of seconds, got {:?}", ENV_FETCH_TIMEOUT_SECS, raw))?;
                if secs == 0 {
                    return Err(anyhow!("{} must be greater than zero", ENV_FETCH_TIMEOUT_SECS));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            bind: bind.to_string(),
            port,
            db_path,
            secret,
            calling_codes_url,
            fetch_timeout,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(
            DEFAULT_BIND,
            DEFAULT_PORT,
            Some(PathBuf::from("/tmp/contacts.db")),
            lookup_from(&[]),
        )
        .unwrap();

        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.db_path, PathBuf::from("/tmp/contacts.db"));
        assert_eq!(config.calling_codes_url, DEFAULT_DIRECTORY_URL);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.secret.len(), 64);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ServerConfig::from_lookup(
            "0.0.0.0",
            9000,
            Some(PathBuf::from("contacts.db")),
            lookup_from(&[
                (ENV_SECRET, "s3cret"),
                (ENV_CALLING_CODES_URL, "http://localhost:9999/all"),
                (ENV_FETCH_TIMEOUT_SECS, "12"),
            ]),
        )
        .unwrap();

        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.calling_codes_url, "http://localhost:9999/all");
        assert_eq!(config.fetch_timeout, Duration::from_secs(12));
        assert_eq!(config.address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_blank_secret_falls_back_to_random() {
        let config = ServerConfig::from_lookup(
            DEFAULT_BIND,
            DEFAULT_PORT,
            Some(PathBuf::from("contacts.db")),
            lookup_from(&[(ENV_SECRET, "   ")]),
        )
        .unwrap();
        assert_ne!(config.secret.trim(), "");
    }

    #[test]
    fn test_invalid_timeout() {
        for raw in ["soon", "0", "-1"] {
            let result = ServerConfig::from_lookup(
                DEFAULT_BIND,
                DEFAULT_PORT,
                Some(PathBuf::from("contacts.db")),
                lookup_from(&[(ENV_FETCH_TIMEOUT_SECS, raw)]),
            );
            assert!(result.is_err(), "{} should be rejected", raw);
        }
    }
}
