//! Errors raised while loading or validating settings.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required TOML layer is missing
    #[error("Required configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The merged sources do not deserialize into `Settings`
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A setting is present but unusable
    #[error("Invalid setting {field}: {message}")]
    Invalid { field: String, message: String },

    /// `DAPUR_APP_ENV` or `--env` names no known environment
    #[error("Unknown environment '{0}'. Valid values are: development, test, staging, production")]
    UnknownEnvironment(String),

    /// Two sources were selected that cannot be combined
    #[error("Conflicting configuration sources: {0}")]
    ConflictingSources(String),

    #[error("Configuration error: {0}")]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: &Path) -> Self {
        ConfigError::FileNotFound {
            path: path.to_path_buf(),
        }
    }

    pub fn conflicting_sources<S: Into<String>>(message: S) -> Self {
        ConfigError::ConflictingSources(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = ConfigError::validation("cache.ttl_seconds", "must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Invalid setting cache.ttl_seconds: must be greater than 0"
        );

        let err = ConfigError::file_not_found(Path::new("config/default.toml"));
        assert_eq!(
            err.to_string(),
            "Required configuration file not found: config/default.toml"
        );
    }

    #[test]
    fn test_unknown_environment_lists_choices() {
        let err = "qa".parse::<crate::config::Environment>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEnvironment(ref name) if name == "qa"));
        assert!(err.to_string().contains("staging"));
    }
}
