//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Upstream credentials are referenced by env-var name in the config
//! and resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub scanner: ScannerConfig,
    pub markets: MarketsConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Env-var names holding the provider credentials.
    pub user_env: String,
    pub token_env: String,
    pub timeout_secs: u64,
    /// Schedule query spans today through today + this many days.
    pub schedule_days_ahead: u64,
    pub per_page: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScannerConfig {
    pub window_hours: i64,
    /// Epoch interpretation for numeric kickoff values:
    /// "millis" | "seconds" | "auto".
    #[serde(default = "default_epoch_unit")]
    pub epoch_unit: String,
    /// Fixed offset applied to kickoff times for HH:MM display.
    pub display_offset_hours: i32,
}

fn default_epoch_unit() -> String {
    "auto".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketsConfig {
    pub over05_min_price: f64,
    pub over15_min_price: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub cache_ttl_secs: u64,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [upstream]
        base_url = "https://api.soccersapi.com/v2.2"
        user_env = "SOCCERSAPI_USER"
        token_env = "SOCCERSAPI_TOKEN"
        timeout_secs = 10
        schedule_days_ahead = 2
        per_page = 30

        [scanner]
        window_hours = 24
        epoch_unit = "auto"
        display_offset_hours = -3

        [markets]
        over05_min_price = 1.10
        over15_min_price = 1.50

        [server]
        port = 3000
        cache_ttl_secs = 900
    "#;

    #[test]
    fn test_parse_sample_config() {
        let cfg: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.upstream.per_page, 30);
        assert_eq!(cfg.scanner.window_hours, 24);
        assert_eq!(cfg.scanner.display_offset_hours, -3);
        assert!((cfg.markets.over05_min_price - 1.10).abs() < 1e-10);
        assert!((cfg.markets.over15_min_price - 1.50).abs() < 1e-10);
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.cache_ttl_secs, 900);
    }

    #[test]
    fn test_epoch_unit_defaults_to_auto() {
        let trimmed = SAMPLE.replace("epoch_unit = \"auto\"\n", "");
        let cfg: AppConfig = toml::from_str(&trimmed).unwrap();
        assert_eq!(cfg.scanner.epoch_unit, "auto");
    }

    #[test]
    fn test_load_config_file() {
        // This test requires config.toml in the working directory.
        // If it isn't found, that's acceptable in some test environments.
        if let Ok(cfg) = AppConfig::load("config.toml") {
            assert_eq!(cfg.upstream.user_env, "SOCCERSAPI_USER");
            assert!(cfg.scanner.window_hours > 0);
            assert!(cfg.markets.over05_min_price > 1.0);
        }
    }

    #[test]
    fn test_resolve_env_missing() {
        assert!(AppConfig::resolve_env("OVERSCAN_DEFINITELY_NOT_SET").is_err());
    }
}
