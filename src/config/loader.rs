//! Load settings from the process environment (after `.env`) or any key lookup.

use crate::config::types::*;
use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

impl AppConfig {
    /// Read `HOST`, `PORT`, `DATABASE_PATH`, `PUBLIC_DIR`, `BODY_LIMIT`. Missing or empty keys use defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();
        Ok(AppConfig {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            database_path: get("DATABASE_PATH").map(PathBuf::from).unwrap_or(defaults.database_path),
            public_dir: get("PUBLIC_DIR").map(PathBuf::from).unwrap_or(defaults.public_dir),
            body_limit: parse_or("BODY_LIMIT", get("BODY_LIMIT"), defaults.body_limit)?,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn values_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_PATH", "/tmp/notes.sqlite"),
            ("PUBLIC_DIR", "assets"),
            ("BODY_LIMIT", " 1024 "),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.database_path, PathBuf::from("/tmp/notes.sqlite"));
        assert_eq!(config.public_dir, PathBuf::from("assets"));
        assert_eq!(config.body_limit, 1024);
    }

    #[test]
    fn blank_value_falls_back_to_default() {
        let config = AppConfig::from_lookup(lookup(&[("PORT", "  ")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        match err {
            ConfigError::Invalid { key, value } => {
                assert_eq!(key, "PORT");
                assert_eq!(value, "http");
            }
        }
    }
}
