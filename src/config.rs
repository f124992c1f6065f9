//! Runtime configuration
//!
//! Everything the service needs from its environment is read once at startup
//! into a `Config` and handed down explicitly.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_API_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Connection details for the remote nutrition backend
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. "https://nutri.example.com" (no trailing slash)
    pub base_url: String,
    /// Bearer token issued by the backend's login endpoint
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// None when no backend is configured; remote tools then refuse to run
    pub api: Option<ApiConfig>,
    pub dark_mode: bool,
}

impl Config {
    /// Build the configuration from `NUTRILOG_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("NUTRILOG_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let timeout_secs = match lookup("NUTRILOG_API_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "NUTRILOG_API_TIMEOUT_SECS",
                value: raw,
            })?,
            None => DEFAULT_API_TIMEOUT_SECS,
        };

        let api = lookup("NUTRILOG_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .map(|base_url| ApiConfig {
                base_url,
                token: lookup("NUTRILOG_API_TOKEN").filter(|t| !t.trim().is_empty()),
                timeout: Duration::from_secs(timeout_secs),
            });

        let dark_mode = match lookup("NUTRILOG_DARK_MODE") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                name: "NUTRILOG_DARK_MODE",
                value: raw,
            })?,
            None => false,
        };

        Ok(Self {
            database_path,
            api,
            dark_mode,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// `<project>/data/nutrilog.db`, resolved relative to the executable
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutrilog.db");
    path
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_api() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.api.is_none());
        assert!(!config.dark_mode);
        assert!(config.database_path.ends_with("data/nutrilog.db"));
    }

    #[test]
    fn test_api_url_and_token() {
        let config = Config::from_lookup(lookup_from(&[
            ("NUTRILOG_API_URL", "http://localhost:8001/"),
            ("NUTRILOG_API_TOKEN", "abc"),
            ("NUTRILOG_API_TIMEOUT_SECS", "5"),
            ("NUTRILOG_DATABASE_PATH", "/tmp/n.db"),
        ]))
        .unwrap();
        let api = config.api.unwrap();
        assert_eq!(api.base_url, "http://localhost:8001");
        assert_eq!(api.token.as_deref(), Some("abc"));
        assert_eq!(api.timeout, Duration::from_secs(5));
        assert_eq!(config.database_path, PathBuf::from("/tmp/n.db"));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let result = Config::from_lookup(lookup_from(&[("NUTRILOG_API_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_dark_mode_flag() {
        let config = Config::from_lookup(lookup_from(&[("NUTRILOG_DARK_MODE", "yes")])).unwrap();
        assert!(config.dark_mode);
    }
}
