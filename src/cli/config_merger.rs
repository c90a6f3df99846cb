//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use super::parser::Cli;
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

/// Configuration merger that handles CLI argument integration with file-based configuration
///
/// CLI arguments override configuration file and environment values.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration the way the CLI asks for it
    ///
    /// `--config` loads that single file, `--env` picks the environment
    /// layer; otherwise the loader reads `DAPUR_*` variables as usual.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(env) = cli.env.clone() {
            loader = loader.with_environment(env.into());
        }
        if let Some(path) = cli.config.as_ref() {
            loader = loader.with_file(path);
        }
        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// # Returns
    /// A new, validated Settings instance with CLI overrides applied
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(base_url) = cli.base_url.as_ref() {
            config.backend.base_url = base_url.clone();
        }

        config.validate()?;

        Ok(config)
    }

    /// Get the current configuration (useful for inspection)
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::tests::{EnvGuard, TEST_MUTEX, setup_config_dir};
    use clap::Parser;

    #[test]
    fn test_configuration_merger_new() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_merge_verbose_flag() {
        let merger = ConfigurationMerger::new(Settings::default());

        let cli = Cli::try_parse_from(["dapur-buzzer", "--verbose"]).unwrap();
        let merged_config = merger.merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.logger.level, "debug");
    }

    #[test]
    fn test_merge_quiet_flag() {
        let merger = ConfigurationMerger::new(Settings::default());

        let cli = Cli::try_parse_from(["dapur-buzzer", "--quiet"]).unwrap();
        let merged_config = merger.merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.logger.level, "error");
    }

    #[test]
    fn test_merge_base_url() {
        let merger = ConfigurationMerger::new(Settings::default());

        let cli = Cli::try_parse_from([
            "dapur-buzzer",
            "--base-url",
            "https://staging.dapurbuzzer.id/",
            "check",
        ])
        .unwrap();
        let merged_config = merger.merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.backend.base_url, "https://staging.dapurbuzzer.id");
        assert_eq!(
            merged_config.backend.url(&merged_config.backend.influencers_path),
            "https://staging.dapurbuzzer.id/api/influencers"
        );
    }

    #[test]
    fn test_from_cli_uses_config_file() {
        let _lock = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut guard = EnvGuard::new();
        guard.clear_loader_vars();

        let dir = setup_config_dir(&[(
            "custom.toml",
            r#"
[backend]
base_url = "http://custom.test"

[cache]
ttl_seconds = 5
"#,
        )]);
        let path = dir.path().join("custom.toml");

        let cli = Cli::try_parse_from(["dapur-buzzer", "--config", path.to_str().unwrap(), "check"])
            .unwrap();
        let merger = ConfigurationMerger::from_cli(&cli).unwrap();

        assert_eq!(merger.config().backend.base_url, "http://custom.test");
        assert_eq!(merger.config().cache.ttl_seconds, 5);
    }
}
