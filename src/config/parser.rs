//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::{AppError, Result},
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // Start with default configuration
        let mut config = Config::default();

        // Load from environment file if it exists
        self.load_env_file()?;

        // Merge environment variables into config
        config.merge_from_env()?;

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config)?;

        // Validate the final configuration. Export mode only reads the
        // journal, so the measurement-phase checks do not apply there.
        if !self.cli.is_export_mode() {
            config.validate()?;
        }

        Ok(config)
    }

    /// Load .env file if it exists
    fn load_env_file(&self) -> Result<()> {
        EnvManager::load_env_file(self.cli.debug)
    }

    /// Apply CLI argument overrides to configuration
    ///
    /// Options with defaults only override when they differ from the default,
    /// so environment values survive an unspecified flag.
    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        if self.cli.url != crate::defaults::DEFAULT_SPEED_URL {
            config.speed_url = self.cli.url.clone();
        }

        if self.cli.selector != crate::defaults::DEFAULT_SPEED_SELECTOR {
            config.speed_selector = self.cli.selector.clone();
        }

        if self.cli.unit_selector != crate::defaults::DEFAULT_UNIT_SELECTOR {
            config.unit_selector = self.cli.unit_selector.clone();
        }

        if self.cli.placeholder != crate::defaults::DEFAULT_PLACEHOLDER {
            config.placeholder = self.cli.placeholder.clone();
        }

        if self.cli.engine != "browser" {
            config.engine = self.cli.engine.parse().map_err(|e: AppError| {
                AppError::config(format!("Invalid --engine value '{}': {}", self.cli.engine, e))
            })?;
        }

        if let Some(ref path) = self.cli.browser_path {
            config.browser_path = Some(path.clone());
        }

        if self.cli.stable_reads != crate::defaults::DEFAULT_STABLE_READS {
            config.stable_reads = self.cli.stable_reads;
        }

        if self.cli.poll_interval != crate::defaults::DEFAULT_POLL_INTERVAL.as_millis() as u64 {
            config.poll_interval_ms = self.cli.poll_interval;
        }

        if self.cli.timeout != crate::defaults::DEFAULT_TIMEOUT.as_secs() {
            config.timeout_seconds = self.cli.timeout;
        }

        if self.cli.ping_host != crate::defaults::DEFAULT_PING_HOST {
            config.ping_host = self.cli.ping_host.clone();
        }

        if self.cli.ping_count != crate::defaults::DEFAULT_PING_COUNT {
            config.ping_count = self.cli.ping_count;
        }

        if self.cli.interval != crate::defaults::DEFAULT_WATCH_INTERVAL.as_secs() {
            config.interval_seconds = self.cli.interval;
        }

        if let Some(ref key) = self.cli.api_key {
            config.weather_api_key = Some(key.clone());
        }

        if let Some(ref journal) = self.cli.journal {
            config.journal_path = journal.clone();
        }

        if self.cli.no_journal {
            config.journal_enabled = false;
        }

        // Override color setting when explicitly requested
        if self.cli.no_color {
            config.enable_color = false;
        }

        if self.cli.color {
            config.enable_color = true;
        }

        // CLI-only flags
        config.skip_speed = self.cli.skip_speed;
        config.skip_ping = self.cli.skip_ping;
        config.weather_enabled = self.cli.weather || config.weather_enabled;
        config.watch = self.cli.watch;
        config.max_runs = self.cli.runs;
        config.notify = self.cli.notify;
        config.json_output = self.cli.json;
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!(
                "Final config: engine={}, timeout={}s, ping_host={}, enable_color={}",
                config.engine, config.timeout_seconds, config.ping_host, config.enable_color
            );
        }

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Speed Engine: {}", config.engine));
    summary.push(format!("Speed URL: {}", config.speed_url));
    summary.push(format!("Value Selector: {}", config.speed_selector));
    summary.push(format!(
        "Stability: {} reads every {}ms",
        config.stable_reads, config.poll_interval_ms
    ));
    summary.push(format!("Timeout: {}s", config.timeout_seconds));
    summary.push(format!(
        "Ping: {} ({} packets)",
        config.ping_host, config.ping_count
    ));
    summary.push(format!("Weather Lookup: {}", config.weather_enabled));
    summary.push(format!(
        "Journal: {} ({})",
        config.journal_path,
        if config.journal_enabled { "enabled" } else { "disabled" }
    ));
    summary.push(format!("Watch Mode: {}", config.watch));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpeedEngine;
    use clap::Parser;
    use std::env;
    use std::sync::Mutex;

    // One lock for every test that touches process environment or .env
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_monitor_env_vars() {
        for var in [
            "SPEED_URL",
            "SPEED_SELECTOR",
            "SPEED_PLACEHOLDER",
            "SPEED_ENGINE",
            "BROWSER_PATH",
            "TIMEOUT_SECONDS",
            "PING_HOST",
            "PING_COUNT",
            "WEATHER_API_KEY",
            "JOURNAL_FILE",
            "WATCH_INTERVAL_SECONDS",
            "ENABLE_COLOR",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_config_parser_defaults() {
        // Test that default configuration values are correctly set without environment interference
        // This test doesn't use ConfigParser to avoid environment variable issues
        let config = Config::default();

        assert_eq!(config.speed_url, crate::defaults::DEFAULT_SPEED_URL);
        assert_eq!(config.speed_selector, crate::defaults::DEFAULT_SPEED_SELECTOR);
        assert_eq!(config.timeout_seconds, crate::defaults::DEFAULT_TIMEOUT.as_secs());
        assert_eq!(config.ping_host, crate::defaults::DEFAULT_PING_HOST);
        assert_eq!(config.ping_count, crate::defaults::DEFAULT_PING_COUNT);
        assert_eq!(config.enable_color, crate::defaults::DEFAULT_ENABLE_COLOR);
        assert!(config.journal_enabled);
        assert!(!config.verbose);
        assert!(!config.debug);

        // Test that default config is valid
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap(); // Ensure exclusive access

        clear_monitor_env_vars();

        // Temporarily move .env file to avoid interference
        let env_file_exists = std::path::Path::new(".env").exists();
        if env_file_exists {
            let _ = std::fs::rename(".env", ".env.test_backup_cli_overrides");
        }

        let cli = Cli::parse_from(&[
            "test",
            "--timeout", "5",
            "--ping-count", "4",
            "--no-color",
            "--verbose",
        ]);
        let parser = ConfigParser::new(cli);
        let config = parser.parse().unwrap();

        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.ping_count, 4);
        assert!(!config.enable_color);
        assert!(config.verbose);

        // Restore .env file
        if env_file_exists {
            let _ = std::fs::rename(".env.test_backup_cli_overrides", ".env");
        }
    }

    #[test]
    fn test_engine_override() {
        let _guard = ENV_MUTEX.lock().unwrap(); // Ensure exclusive access

        clear_monitor_env_vars();

        // Temporarily move .env file to avoid interference
        let env_file_exists = std::path::Path::new(".env").exists();
        if env_file_exists {
            let _ = std::fs::rename(".env", ".env.test_backup_engine");
        }

        let cli = Cli::parse_from(&["test", "--engine", "http"]);
        let parser = ConfigParser::new(cli);
        let config = parser.parse().unwrap();

        assert_eq!(config.engine, SpeedEngine::Http);

        // Restore .env file
        if env_file_exists {
            let _ = std::fs::rename(".env.test_backup_engine", ".env");
        }
    }

    #[test]
    fn test_journal_flags() {
        let _guard = ENV_MUTEX.lock().unwrap(); // Ensure exclusive access

        clear_monitor_env_vars();

        let env_file_exists = std::path::Path::new(".env").exists();
        if env_file_exists {
            let _ = std::fs::rename(".env", ".env.test_backup_journal");
        }

        let cli = Cli::parse_from(&["test", "--journal", "/tmp/custom.jsonl"]);
        let config = ConfigParser::new(cli).parse().unwrap();
        assert_eq!(config.journal_path, "/tmp/custom.jsonl");
        assert!(config.journal_enabled);

        let cli = Cli::parse_from(&["test", "--no-journal"]);
        let config = ConfigParser::new(cli).parse().unwrap();
        assert!(!config.journal_enabled);

        if env_file_exists {
            let _ = std::fs::rename(".env.test_backup_journal", ".env");
        }
    }

    #[test]
    fn test_config_summary() {
        let config = Config::default();
        let summary = display_config_summary(&config);

        assert!(summary.contains("Speed Engine:"));
        assert!(summary.contains("Speed URL:"));
        assert!(summary.contains("Ping:"));
        assert!(summary.contains("Timeout:"));
        assert!(summary.contains("Journal:"));
    }

    // Unit test for environment variable parsing logic
    #[test]
    fn test_config_merge_from_env_logic() {
        // Test the merge_from_env logic without relying on actual environment variables
        // This avoids the concurrency issues with global environment state

        let mut config = Config::default();

        // Test that the config starts with defaults
        assert_eq!(config.speed_url, crate::defaults::DEFAULT_SPEED_URL);
        assert_eq!(config.ping_host, crate::defaults::DEFAULT_PING_HOST);
        assert_eq!(config.enable_color, crate::defaults::DEFAULT_ENABLE_COLOR);

        // Test direct field modification to simulate environment variable parsing
        config.speed_url = "https://speedtest.home.lan/".to_string();
        config.ping_host = "1.1.1.1".to_string();
        config.enable_color = false;

        // Verify the changes
        assert_eq!(config.speed_url, "https://speedtest.home.lan/");
        assert_eq!(config.ping_host, "1.1.1.1");
        assert!(!config.enable_color);

        // Test that validation still works
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_env_vars() {
        let _guard = ENV_MUTEX.lock().unwrap(); // Ensure exclusive access

        clear_monitor_env_vars();

        // Temporarily move .env file to avoid interference
        let env_file_exists = std::path::Path::new(".env").exists();
        if env_file_exists {
            let _ = std::fs::rename(".env", ".env.test_backup_cli_overrides_env_vars");
        }

        // Set environment variable
        env::set_var("PING_COUNT", "8");

        // Override with CLI
        let cli = Cli::parse_from(&["test", "--ping-count", "12"]);
        let parser = ConfigParser::new(cli);
        let config = parser.parse().unwrap();

        // CLI should override environment
        assert_eq!(config.ping_count, 12);

        // Clean up
        env::remove_var("PING_COUNT");

        // Restore .env file
        if env_file_exists {
            let _ = std::fs::rename(".env.test_backup_cli_overrides_env_vars", ".env");
        }
    }

    #[test]
    fn test_env_var_survives_default_cli_flag() {
        let _guard = ENV_MUTEX.lock().unwrap(); // Ensure exclusive access

        clear_monitor_env_vars();

        let env_file_exists = std::path::Path::new(".env").exists();
        if env_file_exists {
            let _ = std::fs::rename(".env", ".env.test_backup_env_survives");
        }

        // Environment sets a host; CLI leaves --ping-host at its default
        env::set_var("PING_HOST", "9.9.9.9");

        let cli = Cli::parse_from(&["test"]);
        let config = ConfigParser::new(cli).parse().unwrap();

        assert_eq!(config.ping_host, "9.9.9.9");

        env::remove_var("PING_HOST");

        if env_file_exists {
            let _ = std::fs::rename(".env.test_backup_env_survives", ".env");
        }
    }
}
