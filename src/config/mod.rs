//! Configuration management

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::analytics::TimeRange;

const DEFAULT_PORT: u16 = 8090;
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Load the built-in sample incidents at startup
    #[serde(default = "default_true")]
    pub seed_sample_data: bool,

    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Backend API root; the client appends `/analytics`
    #[serde(default = "default_api_url")]
    pub base_url: String,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub default_range: TimeRange,

    /// Start with auto-refresh enabled
    #[serde(default)]
    pub auto_refresh: bool,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            refresh_interval_secs: default_refresh_interval(),
            request_timeout_secs: default_request_timeout(),
            default_range: TimeRange::default(),
            auto_refresh: false,
        }
    }
}

/// Get config directory (AEGIS_CONFIG_DIR, XDG_CONFIG_HOME or platform default)
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("AEGIS_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/aegis-console");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("aegis-console");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config/aegis-console");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("aegis-console");
        }
    }

    // Fallback to current directory
    PathBuf::from(".")
}

/// Read the first set variable among `names`
fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .filter(|v| !v.trim().is_empty())
}

pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir();

    let mut builder = ::config::Config::builder()
        // Start with defaults
        .set_default("port", DEFAULT_PORT as i64)?
        // Load from config file if it exists (config.toml, config.json, ...)
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy()).required(false),
        )
        // Override with environment variables (AEGIS_PORT, AEGIS_ANALYTICS__BASE_URL, etc.)
        .add_source(
            ::config::Environment::with_prefix("AEGIS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    // Explicit precedence: AEGIS_PORT > PORT > config > default
    if let Some(port) = first_env(&["AEGIS_PORT", "PORT"]) {
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("port", port_num as i64)?;
        }
    }

    // Explicit precedence: AEGIS_API_URL > API_URL > config > default
    if let Some(url) = first_env(&["AEGIS_API_URL", "API_URL"]) {
        builder = builder.set_override("analytics.base_url", url)?;
    }

    let config = builder.build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const ENV_VARS: &[&str] = &[
        "AEGIS_CONFIG_DIR",
        "AEGIS_PORT",
        "PORT",
        "AEGIS_API_URL",
        "API_URL",
        "AEGIS_ANALYTICS__AUTO_REFRESH",
        "AEGIS_ANALYTICS__DEFAULT_RANGE",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_file() {
        clear_env();
        env::set_var("AEGIS_CONFIG_DIR", "/tmp/aegis-test-nonexistent");

        let config = load_config().expect("config should load");
        clear_env();

        assert_eq!(config.port, 8090);
        assert!(config.seed_sample_data);
        assert_eq!(config.analytics.base_url, "http://127.0.0.1:5000/api");
        assert_eq!(config.analytics.refresh_interval_secs, 30);
        assert_eq!(config.analytics.request_timeout_secs, 10);
        assert_eq!(config.analytics.default_range, TimeRange::Days7);
        assert!(!config.analytics.auto_refresh);
    }

    #[test]
    #[serial]
    fn test_port_precedence() {
        clear_env();
        env::set_var("AEGIS_CONFIG_DIR", "/tmp/aegis-test-nonexistent");
        env::set_var("PORT", "9100");

        let legacy = load_config().expect("config should load");

        env::set_var("AEGIS_PORT", "9200");
        let explicit = load_config().expect("config should load");
        clear_env();

        assert_eq!(legacy.port, 9100);
        assert_eq!(explicit.port, 9200);
    }

    #[test]
    #[serial]
    fn test_api_url_env_overrides_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            r#"
port = 8181
seed_sample_data = false

[analytics]
base_url = "http://file-host/api"
default_range = "30d"
refresh_interval_secs = 60
"#,
        )
        .unwrap();
        env::set_var("AEGIS_CONFIG_DIR", dir.path());

        let from_file = load_config().expect("config should load");

        env::set_var("API_URL", "http://legacy-host/api");
        let legacy = load_config().expect("config should load");

        env::set_var("AEGIS_API_URL", "http://env-host/api");
        let explicit = load_config().expect("config should load");
        clear_env();

        assert_eq!(from_file.port, 8181);
        assert!(!from_file.seed_sample_data);
        assert_eq!(from_file.analytics.base_url, "http://file-host/api");
        assert_eq!(from_file.analytics.default_range, TimeRange::Days30);
        assert_eq!(from_file.analytics.refresh_interval_secs, 60);
        assert_eq!(legacy.analytics.base_url, "http://legacy-host/api");
        assert_eq!(explicit.analytics.base_url, "http://env-host/api");
    }

    #[test]
    #[serial]
    fn test_nested_env_overrides() {
        clear_env();
        env::set_var("AEGIS_CONFIG_DIR", "/tmp/aegis-test-nonexistent");
        env::set_var("AEGIS_ANALYTICS__AUTO_REFRESH", "true");
        env::set_var("AEGIS_ANALYTICS__DEFAULT_RANGE", "24h");

        let config = load_config().expect("config should load");
        clear_env();

        assert!(config.analytics.auto_refresh);
        assert_eq!(config.analytics.default_range, TimeRange::Hours24);
    }
}
