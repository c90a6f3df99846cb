//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::auth::Role;
use crate::build;
use crate::models::PaginationParams;
use crate::services::{InfluencerFilter, PackageFilter};

/// Command-line client for the Dapur Buzzer influencer marketplace
#[derive(Parser, Debug)]
#[command(name = "dapur-buzzer")]
#[command(about = "Command-line client for the Dapur Buzzer influencer marketplace")]
#[command(long_about = "
Dapur Buzzer connects businesses with influencers. This client browses the
influencer and package catalogs, manages user accounts and signs in against
the marketplace backend. Results are printed as JSON on stdout.

EXAMPLES:
    # Browse food influencers under Rp 5.000.000
    dapur-buzzer influencers --category food --max-price 5000000

    # Search by handle
    dapur-buzzer influencers --search @sarimakan

    # Second page of packages, 10 per page
    dapur-buzzer packages --page 2 --page-size 10

    # Register a new influencer account
    dapur-buzzer register --email rina@example.com --password secret123 --role influencer

    # Point at a staging backend
    dapur-buzzer --base-url https://staging.dapurbuzzer.id influencers

    # Check configuration without contacting the backend
    dapur-buzzer check

For more information about configuration options, see the documentation.
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load a single TOML file instead of the layered config/ directory.
    /// The file must exist and be readable.
    ///
    /// Example: --config /etc/dapur-buzzer/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which config/{environment}.toml is layered over the defaults.
    ///
    /// Available values: development (dev), staging, production (prod), test
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Raises log output to debug level, including cache hits and misses.
    /// Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Reduces log output to error level only.
    /// Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Backend base URL override
    ///
    /// Must be an absolute http or https URL.
    #[arg(long, value_name = "URL", value_parser = super::validation::validate_base_url)]
    pub base_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List influencers
    ///
    /// Examples:
    ///   dapur-buzzer influencers --platform tiktok --min-followers 100000
    ///   dapur-buzzer influencers --search rina --page 2
    Influencers {
        /// Category to match; "all" matches every category
        #[arg(long)]
        category: Option<String>,

        /// Platform to match (Instagram, TikTok, YouTube, ...)
        #[arg(long)]
        platform: Option<String>,

        /// Minimum follower count
        #[arg(long, value_name = "COUNT")]
        min_followers: Option<u64>,

        /// Maximum price per post, in rupiah
        #[arg(long, value_name = "RUPIAH")]
        max_price: Option<u64>,

        /// Text to look for in the name or @username
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },
    /// List service packages
    Packages {
        /// Category to match; "all" matches every category
        #[arg(long)]
        category: Option<String>,

        /// Maximum package price, in rupiah
        #[arg(long, value_name = "RUPIAH")]
        max_price: Option<u64>,

        #[command(flatten)]
        page: PageArgs,
    },
    /// List user accounts
    Users {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Register a new account
    Register {
        #[arg(long, value_parser = super::validation::validate_email)]
        email: String,

        /// At least 6 characters
        #[arg(long, value_parser = super::validation::validate_password)]
        password: String,

        /// Account role (admin accounts are created by administrators)
        #[arg(long, value_enum, default_value = "client")]
        role: RoleArg,
    },
    /// Sign in and print the resolved role
    Login {
        #[arg(long, value_parser = super::validation::validate_email)]
        email: String,

        #[arg(long)]
        password: String,
    },
    /// Validate configuration and exit
    ///
    /// Loads and validates the merged configuration without contacting the
    /// backend. Returns exit code 0 if valid, non-zero if invalid.
    Check,
}

/// Pagination flags shared by the listing commands
#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long, default_value_t = 1, value_parser = super::validation::validate_page)]
    pub page: u32,

    /// Items per page (1-100)
    #[arg(long, default_value_t = 20, value_parser = super::validation::validate_page_size)]
    pub page_size: u32,
}

impl From<PageArgs> for PaginationParams {
    fn from(args: PageArgs) -> Self {
        PaginationParams::new(args.page, args.page_size)
    }
}

/// Environment options
#[derive(ValueEnum, Clone, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
}

/// Roles an account can register with
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    Client,
    Influencer,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Client => Role::Client,
            RoleArg::Influencer => Role::Influencer,
        }
    }
}

impl Commands {
    pub fn influencer_filter(&self) -> Option<InfluencerFilter> {
        match self {
            Commands::Influencers {
                category,
                platform,
                min_followers,
                max_price,
                search,
                ..
            } => Some(InfluencerFilter {
                category: category.clone(),
                platform: platform.clone(),
                min_followers: *min_followers,
                max_price: *max_price,
                search: search.clone(),
            }),
            _ => None,
        }
    }

    pub fn package_filter(&self) -> Option<PackageFilter> {
        match self {
            Commands::Packages {
                category,
                max_price,
                ..
            } => Some(PackageFilter {
                category: category.clone(),
                max_price: *max_price,
            }),
            _ => None,
        }
    }
}

impl Cli {
    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        if let Some(Commands::Influencers {
            search: Some(search),
            ..
        }) = &self.command
            && search.trim().trim_start_matches('@').is_empty()
        {
            return Err("--search needs at least one character besides '@'".to_string());
        }

        Ok(())
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}
