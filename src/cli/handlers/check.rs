//! Check command handler
//!
//! Validates the merged configuration without contacting the backend.

use serde_json::{Value, json};

use crate::config::Settings;
use crate::error::AppResult;
use crate::external::build_http_client;

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    /// Create a new check command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validate configuration and build the HTTP client, then report what
    /// a real run would use.
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - HTTP client construction errors
    pub fn execute(&self) -> AppResult<Value> {
        self.config.validate()?;
        build_http_client(&self.config.http)?;

        let backend = &self.config.backend;
        tracing::info!(base_url = %backend.base_url, "configuration is valid");

        Ok(json!({
            "valid": true,
            "application": self.config.application.name,
            "backend": {
                "base_url": backend.base_url,
                "api_key_configured": backend.api_key.as_deref().is_some_and(|k| !k.is_empty()),
                "influencers": backend.url(&backend.influencers_path),
                "packages": backend.url(&backend.packages_path),
                "users": backend.url(&backend.users_path),
                "auth": backend.url(&backend.auth_path),
            },
            "cache_ttl_seconds": self.config.cache.ttl_seconds,
            "log_level": self.config.logger.level,
        }))
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_check_reports_endpoints() {
        let handler = CheckCommandHandler::new(Settings::default());
        let output = handler.execute().unwrap();

        assert_eq!(output["valid"], true);
        assert_eq!(output["backend"]["api_key_configured"], false);
        assert_eq!(output["cache_ttl_seconds"], 30);
        assert!(
            output["backend"]["influencers"]
                .as_str()
                .unwrap()
                .ends_with("/api/influencers")
        );
    }

    #[test]
    fn test_check_rejects_invalid_config() {
        let mut config = Settings::default();
        config.backend.base_url = "not a url".to_string();

        let err = CheckCommandHandler::new(config).execute().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
