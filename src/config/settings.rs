//! Configuration settings structures for dapur-buzzer
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "dapur-buzzer".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_influencers_path() -> String {
    "/api/influencers".to_string()
}

fn default_packages_path() -> String {
    "/api/packages".to_string()
}

fn default_users_path() -> String {
    "/api/users".to_string()
}

fn default_auth_path() -> String {
    "/api/auth".to_string()
}

fn default_session_path() -> String {
    "/api/auth/session".to_string()
}

fn default_roles_path() -> String {
    "/rest/v1/user_roles".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_pool_idle_timeout_seconds() -> u64 {
    90
}

fn default_cache_ttl_seconds() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/dapur-buzzer.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Backend Configuration
// ============================================================================

/// Remote REST/auth backend endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL every path below is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Project key sent as the `apikey` header
    /// Keep this out of committed files (use `DAPUR_BACKEND__API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_influencers_path")]
    pub influencers_path: String,

    #[serde(default = "default_packages_path")]
    pub packages_path: String,

    #[serde(default = "default_users_path")]
    pub users_path: String,

    /// Register (POST), login (PUT) and logout (DELETE)
    #[serde(default = "default_auth_path")]
    pub auth_path: String,

    /// Session check (GET with bearer token)
    #[serde(default = "default_session_path")]
    pub session_path: String,

    /// Role table, queried with `?user_id=eq.<id>&select=role`
    #[serde(default = "default_roles_path")]
    pub roles_path: String,
}

impl BackendConfig {
    /// Join `path` onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            influencers_path: default_influencers_path(),
            packages_path: default_packages_path(),
            users_path: default_users_path(),
            auth_path: default_auth_path(),
            session_path: default_session_path(),
            roles_path: default_roles_path(),
        }
    }
}

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Outbound HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Total request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TCP/TLS connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Idle pooled connections are closed after this many seconds
    #[serde(default = "default_pool_idle_timeout_seconds")]
    pub pool_idle_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            pool_idle_timeout_seconds: default_pool_idle_timeout_seconds(),
        }
    }
}

// ============================================================================
// Cache Configuration
// ============================================================================

/// Request cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a successful GET response is served from memory
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl_seconds(),
        }
    }
}

// ============================================================================
// Logger Settings (compatible with existing LoggerConfig)
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to LoggerConfig
    ///
    /// This method transforms the configuration file representation into
    /// the runtime LoggerConfig used by the logger module.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = self.console.into_console_config();
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::Invalid {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl ConsoleSettings {
    /// Convert ConsoleSettings to ConsoleConfig
    pub fn into_console_config(self) -> ConsoleConfig {
        ConsoleConfig::new(self.enabled, self.colored)
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self.parse_format()?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::Invalid {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }

    fn parse_format(&self) -> Result<LogFormat, ConfigError> {
        self.format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::Invalid {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application information
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Remote backend endpoints
    #[serde(default)]
    pub backend: BackendConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Request cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_backend_config() -> impl Strategy<Value = BackendConfig> {
        (
            "https?://[a-z]{3,10}\\.[a-z]{2,3}",
            proptest::option::of("[A-Za-z0-9]{8,32}"),
            "/[a-z]{1,10}",
        )
            .prop_map(|(base_url, api_key, path)| BackendConfig {
                base_url,
                api_key,
                influencers_path: path.clone(),
                ..BackendConfig::default()
            })
    }

    fn arb_http_config() -> impl Strategy<Value = HttpConfig> {
        (1u64..300, 1u64..60, 1u64..600).prop_map(|(timeout, connect, idle)| HttpConfig {
            timeout_seconds: timeout,
            connect_timeout_seconds: connect,
            pool_idle_timeout_seconds: idle,
        })
    }

    fn arb_logger_settings() -> impl Strategy<Value = LoggerSettings> {
        (
            prop_oneof![
                Just("trace"),
                Just("debug"),
                Just("info"),
                Just("warn"),
                Just("error")
            ],
            any::<bool>(),
            prop_oneof![Just("full"), Just("compact"), Just("json")],
        )
            .prop_map(|(level, colored, format)| LoggerSettings {
                level: level.to_string(),
                console: ConsoleSettings {
                    enabled: true,
                    colored,
                },
                file: FileSettings {
                    format: format.to_string(),
                    ..FileSettings::default()
                },
            })
    }

    fn arb_settings() -> impl Strategy<Value = Settings> {
        (
            arb_backend_config(),
            arb_http_config(),
            1u64..3600,
            arb_logger_settings(),
        )
            .prop_map(|(backend, http, ttl_seconds, logger)| Settings {
                application: ApplicationConfig::default(),
                backend,
                http,
                cache: CacheConfig { ttl_seconds },
                logger,
            })
    }

    proptest! {
        #[test]
        fn prop_settings_round_trip_serialization(settings in arb_settings()) {
            let toml = toml_string(&settings);
            let parsed: Settings = config::Config::builder()
                .add_source(config::File::from_str(&toml, config::FileFormat::Toml))
                .build()
                .unwrap()
                .try_deserialize()
                .unwrap();
            prop_assert_eq!(parsed, settings);
        }
    }

    fn toml_string(settings: &Settings) -> String {
        let json = serde_json::to_value(settings).unwrap();
        let mut out = String::new();
        if let serde_json::Value::Object(sections) = json {
            for (name, section) in sections {
                write_table(&mut out, &name, &section);
            }
        }
        out
    }

    fn write_table(out: &mut String, name: &str, value: &serde_json::Value) {
        let serde_json::Value::Object(fields) = value else {
            return;
        };
        out.push_str(&format!("[{}]\n", name));
        let mut nested = Vec::new();
        for (key, field) in fields {
            match field {
                serde_json::Value::Object(_) => nested.push((key, field)),
                serde_json::Value::Null => {}
                other => out.push_str(&format!("{} = {}\n", key, other)),
            }
        }
        for (key, field) in nested {
            write_table(out, &format!("{}.{}", name, key), field);
        }
    }

    #[test]
    fn test_application_config_defaults() {
        let config = ApplicationConfig::default();
        assert_eq!(config.name, "dapur-buzzer");
        assert_eq!(config.version, crate::pkg_version());
    }

    #[test]
    fn test_backend_config_defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(config.api_key.is_none());
        assert_eq!(config.influencers_path, "/api/influencers");
        assert_eq!(config.auth_path, "/api/auth");
        assert_eq!(config.roles_path, "/rest/v1/user_roles");
    }

    #[test]
    fn test_backend_url_join() {
        let config = BackendConfig {
            base_url: "https://api.test/".to_string(),
            ..BackendConfig::default()
        };
        assert_eq!(config.url("/api/packages"), "https://api.test/api/packages");
        assert_eq!(config.url("api/users"), "https://api.test/api/users");
    }

    #[test]
    fn test_http_and_cache_defaults() {
        let http = HttpConfig::default();
        assert_eq!(http.timeout_seconds, 30);
        assert_eq!(http.connect_timeout_seconds, 10);
        assert_eq!(http.pool_idle_timeout_seconds, 90);
        assert_eq!(CacheConfig::default().ttl_seconds, 30);
    }

    #[test]
    fn test_logger_settings_defaults() {
        let settings = LoggerSettings::default();
        assert_eq!(settings.level, "info");
        assert!(settings.console.enabled);
        assert!(!settings.file.enabled);
        assert_eq!(settings.file.format, "json");
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "backend": {"base_url": "https://backend.test"},
            "cache": {"ttl_seconds": 10}
        }))
        .unwrap();

        assert_eq!(settings.backend.base_url, "https://backend.test");
        assert_eq!(settings.backend.users_path, "/api/users");
        assert_eq!(settings.cache.ttl_seconds, 10);
        assert_eq!(settings.http, HttpConfig::default());
    }

    #[test]
    fn test_logger_settings_into_logger_config() {
        let settings = LoggerSettings {
            level: "debug".to_string(),
            ..LoggerSettings::default()
        };
        let config = settings.into_logger_config().unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.console.enabled);
        assert!(!config.file.enabled);
        assert_eq!(config.file.format, LogFormat::Json);
    }

    #[test]
    fn test_file_settings_into_file_config_all_formats() {
        for (format, expected) in [
            ("full", LogFormat::Full),
            ("compact", LogFormat::Compact),
            ("JSON", LogFormat::Json),
        ] {
            let settings = FileSettings {
                format: format.to_string(),
                ..FileSettings::default()
            };
            assert_eq!(settings.into_file_config().unwrap().format, expected);
        }
    }

    #[test]
    fn test_file_settings_into_file_config_invalid_format() {
        let settings = FileSettings {
            format: "xml".to_string(),
            ..FileSettings::default()
        };
        let err = settings.into_file_config().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "logger.file.format"));
    }

    #[test]
    fn test_logger_settings_into_logger_config_invalid_level() {
        let settings = LoggerSettings {
            level: "verbose".to_string(),
            ..LoggerSettings::default()
        };
        assert!(settings.into_logger_config().is_err());
    }

    #[test]
    fn test_logger_settings_into_logger_config_both_disabled() {
        let settings = LoggerSettings {
            console: ConsoleSettings {
                enabled: false,
                colored: false,
            },
            ..LoggerSettings::default()
        };
        assert!(settings.into_logger_config().is_err());
    }
}
