//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use reqwest::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{
    BackendConfig, CacheConfig, FileSettings, HttpConfig, LoggerSettings, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl BackendConfig {
    /// Validate backend configuration
    ///
    /// # Validation Rules
    /// - Base URL must be an absolute `http` or `https` URL
    /// - Every endpoint path must start with `/`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            field: "backend.base_url".to_string(),
            message: format!("Invalid base URL '{}': {}", self.base_url, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "backend.base_url".to_string(),
                message: format!(
                    "Unsupported scheme '{}'. Expected http or https.",
                    url.scheme()
                ),
            });
        }

        let paths = [
            ("backend.influencers_path", &self.influencers_path),
            ("backend.packages_path", &self.packages_path),
            ("backend.users_path", &self.users_path),
            ("backend.auth_path", &self.auth_path),
            ("backend.session_path", &self.session_path),
            ("backend.roles_path", &self.roles_path),
        ];
        for (field, path) in paths {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid {
                    field: field.to_string(),
                    message: format!("Endpoint path '{}' must start with '/'.", path),
                });
            }
        }

        Ok(())
    }
}

impl HttpConfig {
    /// Validate HTTP client configuration
    ///
    /// # Validation Rules
    /// - All timeouts must be greater than 0
    /// - Connect timeout must not exceed the total request timeout
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "http.timeout_seconds",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "http.connect_timeout_seconds",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_seconds > self.timeout_seconds {
            return Err(ConfigError::Invalid {
                field: "http.connect_timeout_seconds".to_string(),
                message: format!(
                    "Connect timeout ({}s) cannot exceed request timeout ({}s).",
                    self.connect_timeout_seconds, self.timeout_seconds
                ),
            });
        }

        if self.pool_idle_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "http.pool_idle_timeout_seconds",
                "Pool idle timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl CacheConfig {
    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_seconds == 0 {
            return Err(ConfigError::validation(
                "cache.ttl_seconds",
                "Cache TTL must be greater than 0 seconds.",
            ));
        }
        Ok(())
    }
}

impl FileSettings {
    /// Validate file settings
    fn validate(&self) -> Result<(), ConfigError> {
        // If file logging is enabled, path must not be empty
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()?;

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// This method validates all sub-configurations and returns the first
    /// validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend.validate()?;
        self.http.validate()?;
        self.cache.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // BackendConfig validation tests
    // ========================================================================

    #[test]
    fn test_backend_config_valid() {
        assert!(BackendConfig::default().validate().is_ok());
    }

    #[test]
    fn test_backend_config_invalid_base_url() {
        let config = BackendConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "backend.base_url")
        );
    }

    #[test]
    fn test_backend_config_rejects_non_http_scheme() {
        let config = BackendConfig {
            base_url: "ftp://backend.test".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "backend.base_url")
        );
    }

    #[test]
    fn test_backend_config_relative_path() {
        let config = BackendConfig {
            roles_path: "rest/v1/user_roles".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "backend.roles_path")
        );
    }

    // ========================================================================
    // HttpConfig / CacheConfig validation tests
    // ========================================================================

    #[test]
    fn test_http_config_valid() {
        assert!(HttpConfig::default().validate().is_ok());
    }

    #[test]
    fn test_http_config_zero_timeout() {
        let config = HttpConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "http.timeout_seconds")
        );
    }

    #[test]
    fn test_http_config_connect_exceeds_total() {
        let config = HttpConfig {
            timeout_seconds: 5,
            connect_timeout_seconds: 10,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "http.connect_timeout_seconds")
        );
    }

    #[test]
    fn test_cache_config_zero_ttl() {
        let err = CacheConfig { ttl_seconds: 0 }.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "cache.ttl_seconds")
        );
    }

    // ========================================================================
    // LoggerSettings validation tests
    // ========================================================================

    #[test]
    fn test_logger_settings_valid_levels() {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "INFO", "Debug"];

        for level in valid_levels {
            let settings = LoggerSettings {
                level: level.to_string(),
                ..Default::default()
            };
            assert!(
                settings.validate().is_ok(),
                "Level should be valid: {}",
                level
            );
        }
    }

    #[test]
    fn test_logger_settings_invalid_level() {
        let settings = LoggerSettings {
            level: "invalid".to_string(),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "logger.level")
        );
    }

    #[test]
    fn test_logger_settings_file_enabled_empty_path() {
        let settings = LoggerSettings {
            file: FileSettings {
                enabled: true,
                path: "".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "logger.file.path")
        );
    }

    #[test]
    fn test_logger_settings_invalid_format() {
        let settings = LoggerSettings {
            file: FileSettings {
                format: "invalid".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "logger.file.format")
        );
    }

    // ========================================================================
    // Settings validation tests
    // ========================================================================

    #[test]
    fn test_settings_default_is_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_settings_reports_first_invalid_section() {
        let settings = Settings {
            cache: CacheConfig { ttl_seconds: 0 },
            logger: LoggerSettings {
                level: "invalid".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "cache.ttl_seconds")
        );
    }
}
