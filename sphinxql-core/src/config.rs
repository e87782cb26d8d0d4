//! Connection settings for `searchd`

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Where the daemon listens and how many connections to keep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphinxConfig {
    pub host: String,
    /// SphinxQL listener port, 9306 by default
    pub port: u16,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for SphinxConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9306,
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

impl SphinxConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// `mysql://host:port` form of the listener address
    pub fn url(&self) -> String {
        format!("mysql://{}:{}", self.host, self.port)
    }

    /// Read `SPHINX_HOST`, `SPHINX_PORT`, `SPHINX_MAX_CONNECTIONS` and
    /// `SPHINX_ACQUIRE_TIMEOUT_SECS`, falling back to the defaults for unset
    /// variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SphinxConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup("SPHINX_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("SPHINX_PORT") {
            config.port = parse_var("SPHINX_PORT", &port)?;
        }
        if let Some(max) = lookup("SPHINX_MAX_CONNECTIONS") {
            config.max_connections = parse_var("SPHINX_MAX_CONNECTIONS", &max)?;
        }
        if let Some(secs) = lookup("SPHINX_ACQUIRE_TIMEOUT_SECS") {
            config.acquire_timeout_secs = parse_var("SPHINX_ACQUIRE_TIMEOUT_SECS", &secs)?;
        }
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::config(format!("{key} has an invalid value: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SphinxConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9306);
        assert_eq!(config.url(), "mysql://127.0.0.1:9306");
        assert_eq!(config.acquire_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = SphinxConfig::from_lookup(lookup(&[
            ("SPHINX_HOST", "search.internal"),
            ("SPHINX_PORT", " 9312 "),
            ("SPHINX_MAX_CONNECTIONS", "20"),
        ]))
        .unwrap();
        assert_eq!(config.host, "search.internal");
        assert_eq!(config.port, 9312);
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.acquire_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_port() {
        let err = SphinxConfig::from_lookup(lookup(&[("SPHINX_PORT", "http")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("SPHINX_PORT"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SphinxConfig = serde_json::from_str(r#"{"host": "10.0.0.5"}"#).unwrap();
        assert_eq!(config, SphinxConfig::new("10.0.0.5", 9306));
    }

    #[test]
    fn test_builder_style() {
        let config = SphinxConfig::new("localhost", 9307).max_connections(2);
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.url(), "mysql://localhost:9307");
    }
}
