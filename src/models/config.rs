//! Configuration data model and validation

use crate::types::{AppError, Result, SpeedEngine};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Speed test page to load in the headless browser
    #[serde(default = "default_speed_url")]
    pub speed_url: String,

    /// CSS selector of the element holding the measured speed value
    #[serde(default = "default_speed_selector")]
    pub speed_selector: String,

    /// CSS selector of the element holding the speed unit
    #[serde(default = "default_unit_selector")]
    pub unit_selector: String,

    /// Placeholder text the page shows before a real value arrives
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Number of identical consecutive reads required to accept a value
    #[serde(default = "default_stable_reads")]
    pub stable_reads: u32,

    /// Delay between DOM polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Engine used for the speed phase
    #[serde(default = "default_engine")]
    pub engine: SpeedEngine,

    /// Explicit browser executable path, overriding auto-detection
    #[serde(default)]
    pub browser_path: Option<String>,

    /// URL of the payload downloaded by the HTTP engine
    #[serde(default = "default_throughput_url")]
    pub throughput_url: String,

    /// Per-phase timeout duration in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Disable the speed phase entirely
    #[serde(default)]
    pub skip_speed: bool,

    /// Host to ping for latency statistics
    #[serde(default = "default_ping_host")]
    pub ping_host: String,

    /// Number of echo requests per ping run
    #[serde(default = "default_ping_count")]
    pub ping_count: u32,

    /// Disable the ping phase entirely
    #[serde(default)]
    pub skip_ping: bool,

    /// Fetch local weather conditions alongside measurements
    #[serde(default)]
    pub weather_enabled: bool,

    /// OpenWeatherMap API key
    #[serde(default)]
    pub weather_api_key: Option<String>,

    /// Path of the measurement journal file
    #[serde(default = "default_journal_path")]
    pub journal_path: String,

    /// Append measurement records to the journal
    #[serde(default = "default_journal_enabled")]
    pub journal_enabled: bool,

    /// Keep measuring on an interval instead of running once
    #[serde(default)]
    pub watch: bool,

    /// Seconds between measurement cycles in watch mode
    #[serde(default = "default_interval_secs")]
    pub interval_seconds: u64,

    /// Stop watch mode after this many cycles
    #[serde(default)]
    pub max_runs: Option<u32>,

    /// Send a desktop notification after each cycle
    #[serde(default)]
    pub notify: bool,

    /// Emit results as JSON instead of formatted text
    #[serde(default)]
    pub json_output: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed_url: default_speed_url(),
            speed_selector: default_speed_selector(),
            unit_selector: default_unit_selector(),
            placeholder: default_placeholder(),
            stable_reads: default_stable_reads(),
            poll_interval_ms: default_poll_interval_ms(),
            engine: default_engine(),
            browser_path: None,
            throughput_url: default_throughput_url(),
            timeout_seconds: default_timeout_secs(),
            skip_speed: false,
            ping_host: default_ping_host(),
            ping_count: default_ping_count(),
            skip_ping: false,
            weather_enabled: false,
            weather_api_key: None,
            journal_path: default_journal_path(),
            journal_enabled: default_journal_enabled(),
            watch: false,
            interval_seconds: default_interval_secs(),
            max_runs: None,
            notify: false,
            json_output: false,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the per-phase timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Get the DOM poll delay as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Get the watch-mode interval as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.skip_speed && self.skip_ping {
            return Err(AppError::config(
                "Nothing to measure: both the speed and ping phases are disabled",
            ));
        }

        // Validate speed phase settings
        if !self.skip_speed {
            if self.speed_url.is_empty() {
                return Err(AppError::config("Speed test URL cannot be empty"));
            }

            if let Err(e) = url::Url::parse(&self.speed_url) {
                return Err(AppError::config(format!(
                    "Invalid speed test URL '{}': {}",
                    self.speed_url, e
                )));
            }

            if self.speed_selector.is_empty() {
                return Err(AppError::config("Speed value selector cannot be empty"));
            }

            if self.engine == SpeedEngine::Http {
                if let Err(e) = url::Url::parse(&self.throughput_url) {
                    return Err(AppError::config(format!(
                        "Invalid throughput URL '{}': {}",
                        self.throughput_url, e
                    )));
                }
            }
        }

        // Validate ping phase settings
        if !self.skip_ping {
            if self.ping_host.is_empty() {
                return Err(AppError::config("Ping host cannot be empty"));
            }

            if self.ping_host.chars().any(char::is_whitespace) {
                return Err(AppError::config(format!(
                    "Ping host cannot contain whitespace: '{}'",
                    self.ping_host
                )));
            }

            if self.ping_count == 0 {
                return Err(AppError::config("Ping count must be greater than 0"));
            }

            if self.ping_count > 100 {
                return Err(AppError::config("Ping count cannot exceed 100"));
            }
        }

        // Validate numeric parameters
        if self.stable_reads == 0 {
            return Err(AppError::config("Stable read count must be greater than 0"));
        }

        if self.stable_reads > 50 {
            return Err(AppError::config("Stable read count cannot exceed 50"));
        }

        if self.poll_interval_ms < 50 {
            return Err(AppError::config("Poll interval must be at least 50ms"));
        }

        if self.poll_interval_ms > 60_000 {
            return Err(AppError::config("Poll interval cannot exceed 60000ms"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 600 {
            return Err(AppError::config("Timeout cannot exceed 600 seconds"));
        }

        if self.watch && self.interval_seconds < 1 {
            return Err(AppError::config("Watch interval must be at least 1 second"));
        }

        if let Some(runs) = self.max_runs {
            if runs == 0 {
                return Err(AppError::config("Run limit must be greater than 0"));
            }
        }

        if self.journal_enabled && self.journal_path.is_empty() {
            return Err(AppError::config("Journal path cannot be empty"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("SPEED_URL") {
            self.speed_url = url;
        }

        if let Ok(selector) = std::env::var("SPEED_SELECTOR") {
            self.speed_selector = selector;
        }

        if let Ok(placeholder) = std::env::var("SPEED_PLACEHOLDER") {
            self.placeholder = placeholder;
        }

        if let Ok(engine) = std::env::var("SPEED_ENGINE") {
            self.engine = engine.parse().map_err(|e| {
                AppError::config(format!("Invalid SPEED_ENGINE value '{}': {}", engine, e))
            })?;
        }

        if let Ok(path) = std::env::var("BROWSER_PATH") {
            if !path.is_empty() {
                self.browser_path = Some(path);
            }
        }

        if let Ok(timeout) = std::env::var("TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.parse().map_err(|e| {
                AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", timeout, e))
            })?;
        }

        if let Ok(host) = std::env::var("PING_HOST") {
            self.ping_host = host;
        }

        if let Ok(count) = std::env::var("PING_COUNT") {
            self.ping_count = count.parse().map_err(|e| {
                AppError::config(format!("Invalid PING_COUNT value '{}': {}", count, e))
            })?;
        }

        if let Ok(key) = std::env::var("WEATHER_API_KEY") {
            if !key.is_empty() {
                self.weather_api_key = Some(key);
            }
        }

        if let Ok(path) = std::env::var("JOURNAL_FILE") {
            self.journal_path = path;
        }

        if let Ok(interval) = std::env::var("WATCH_INTERVAL_SECONDS") {
            self.interval_seconds = interval.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid WATCH_INTERVAL_SECONDS value '{}': {}",
                    interval, e
                ))
            })?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid ENABLE_COLOR value '{}': {}",
                    enable_color, e
                ))
            })?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_speed_url() -> String {
    crate::defaults::DEFAULT_SPEED_URL.to_string()
}

fn default_speed_selector() -> String {
    crate::defaults::DEFAULT_SPEED_SELECTOR.to_string()
}

fn default_unit_selector() -> String {
    crate::defaults::DEFAULT_UNIT_SELECTOR.to_string()
}

fn default_placeholder() -> String {
    crate::defaults::DEFAULT_PLACEHOLDER.to_string()
}

fn default_stable_reads() -> u32 {
    crate::defaults::DEFAULT_STABLE_READS
}

fn default_poll_interval_ms() -> u64 {
    crate::defaults::DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_engine() -> SpeedEngine {
    SpeedEngine::Browser
}

fn default_throughput_url() -> String {
    crate::defaults::DEFAULT_THROUGHPUT_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_ping_host() -> String {
    crate::defaults::DEFAULT_PING_HOST.to_string()
}

fn default_ping_count() -> u32 {
    crate::defaults::DEFAULT_PING_COUNT
}

fn default_journal_path() -> String {
    crate::defaults::DEFAULT_JOURNAL_FILE.to_string()
}

fn default_journal_enabled() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    crate::defaults::DEFAULT_WATCH_INTERVAL.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
