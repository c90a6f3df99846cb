//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use std::fs;
use std::path::PathBuf;

use validator::ValidateEmail;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration file '{}': {}", path_str, e)),
    }
}

/// Validate an absolute http(s) URL
pub fn validate_base_url(url_str: &str) -> Result<String, String> {
    let url = reqwest::Url::parse(url_str.trim())
        .map_err(|e| format!("Invalid URL '{}': {}", url_str, e))?;

    match url.scheme() {
        "http" | "https" => Ok(url_str.trim().trim_end_matches('/').to_string()),
        other => Err(format!("URL scheme must be http or https, got: '{}'", other)),
    }
}

/// Validate page number is at least 1
pub fn validate_page(page_str: &str) -> Result<u32, String> {
    let page: u32 = page_str
        .parse()
        .map_err(|_| format!("Page must be a positive number, got: '{}'", page_str))?;

    if page == 0 {
        return Err("Page must be at least 1".to_string());
    }

    Ok(page)
}

/// Validate page size is within 1-100
pub fn validate_page_size(size_str: &str) -> Result<u32, String> {
    let size: u32 = size_str
        .parse()
        .map_err(|_| format!("Page size must be a number between 1 and 100, got: '{}'", size_str))?;

    if !(1..=100).contains(&size) {
        return Err("Page size must be between 1 and 100".to_string());
    }

    Ok(size)
}

pub fn validate_email(email_str: &str) -> Result<String, String> {
    let email = email_str.trim();
    if email.validate_email() {
        Ok(email.to_string())
    } else {
        Err(format!("Invalid email address: '{}'", email_str))
    }
}

pub fn validate_password(password: &str) -> Result<String, String> {
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    Ok(password.to_string())
}
