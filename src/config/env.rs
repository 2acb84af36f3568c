//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        // Try to load .env from current directory
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Internet Speed Monitor Configuration
#
# This file contains environment variables that can be used to configure
# the internet speed monitor. Values specified here will be used as defaults,
# but can be overridden by command-line arguments.

# Speed test page loaded by the headless browser
# SPEED_URL=https://fast.com/

# CSS selector of the element holding the measured speed value
# SPEED_SELECTOR=#speed-value

# Placeholder text the page shows before a real value arrives
# SPEED_PLACEHOLDER=0

# Speed engine: "browser" (headless scrape) or "http" (payload download)
# SPEED_ENGINE=browser

# Browser executable path, overriding auto-detection
# BROWSER_PATH=/usr/bin/chromium

# Per-phase timeout in seconds
# TIMEOUT_SECONDS=60

# Host to ping for latency statistics
# PING_HOST=8.8.8.8

# Echo requests per ping run
# PING_COUNT=10

# OpenWeatherMap API key for the --weather lookup
# WEATHER_API_KEY=0123456789abcdef

# Measurement journal file path
# JOURNAL_FILE=speed_log.json

# Seconds between measurement cycles in watch mode
# WATCH_INTERVAL_SECONDS=1800

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Example configurations for different scenarios:
#
# Monitoring a self-hosted speed test page:
# SPEED_URL=https://speedtest.home.lan/
# SPEED_SELECTOR=#download-value
#
# Frequent lightweight checks without a browser:
# SPEED_ENGINE=http
# WATCH_INTERVAL_SECONDS=300
#
# Latency-only monitoring against Cloudflare:
# PING_HOST=1.1.1.1
# PING_COUNT=20
"#.to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        use std::fs;

        let content = Self::create_example_env_content();
        fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "SPEED_URL" => {
                url::Url::parse(value)
                    .map_err(|e| AppError::config(format!("Invalid SPEED_URL value '{}': {}", value, e)))?;
            }
            "SPEED_SELECTOR" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("SPEED_SELECTOR cannot be empty"));
                }
            }
            "SPEED_ENGINE" => {
                if value != "browser" && value != "http" {
                    return Err(AppError::config(format!(
                        "SPEED_ENGINE must be 'browser' or 'http', got: {}", value
                    )));
                }
            }
            "TIMEOUT_SECONDS" => {
                let timeout: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", value, e)))?;
                if timeout == 0 || timeout > 600 {
                    return Err(AppError::config(format!("TIMEOUT_SECONDS must be between 1 and 600, got: {}", timeout)));
                }
            }
            "PING_HOST" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("PING_HOST cannot be empty"));
                }
                if value.chars().any(char::is_whitespace) {
                    return Err(AppError::config(format!("PING_HOST cannot contain whitespace: '{}'", value)));
                }
            }
            "PING_COUNT" => {
                let count: u32 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid PING_COUNT value '{}': {}", value, e)))?;
                if count == 0 || count > 100 {
                    return Err(AppError::config(format!("PING_COUNT must be between 1 and 100, got: {}", count)));
                }
            }
            "JOURNAL_FILE" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("JOURNAL_FILE cannot be empty"));
                }
            }
            "WATCH_INTERVAL_SECONDS" => {
                let interval: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid WATCH_INTERVAL_SECONDS value '{}': {}", value, e)))?;
                if interval < 5 {
                    return Err(AppError::config(format!("WATCH_INTERVAL_SECONDS must be at least 5, got: {}", interval)));
                }
            }
            "ENABLE_COLOR" => {
                value.parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("SPEED_URL", "Speed test page loaded by the headless browser", "https://fast.com/"),
            ("SPEED_SELECTOR", "CSS selector of the speed value element", "#speed-value"),
            ("SPEED_PLACEHOLDER", "Placeholder text shown before a value arrives", "0"),
            ("SPEED_ENGINE", "Speed engine to use (browser or http)", "browser"),
            ("BROWSER_PATH", "Browser executable path overriding auto-detection", "/usr/bin/chromium"),
            ("TIMEOUT_SECONDS", "Per-phase timeout in seconds (1-600)", "60"),
            ("PING_HOST", "Host to ping for latency statistics", "8.8.8.8"),
            ("PING_COUNT", "Echo requests per ping run (1-100)", "10"),
            ("WEATHER_API_KEY", "OpenWeatherMap API key for weather lookups", "0123456789abcdef"),
            ("JOURNAL_FILE", "Measurement journal file path", "speed_log.json"),
            ("WATCH_INTERVAL_SECONDS", "Seconds between cycles in watch mode (>= 5)", "1800"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<24} {}\n", var, description));
            help.push_str(&format!("  {:<24} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(format!("Warning: {}", e));
                }
            }
        }

        Ok(warnings)
    }

    /// Check if .env file exists and validate its contents
    pub fn check_env_file() -> Result<Option<Vec<String>>> {
        if !Path::new(".env").exists() {
            return Ok(None);
        }

        // Load the .env file temporarily to validate
        let content = std::fs::read_to_string(".env")
            .map_err(|e| AppError::config(format!("Failed to read .env file: {}", e)))?;

        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                if let Err(e) = Self::validate_env_var(key, value) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        Ok(Some(warnings))
    }
}
