//! Internet Speed Monitor
//!
//! Measures internet connection quality and reports it through the
//! console, an append-only measurement journal, and optional desktop
//! notifications. A measurement cycle combines a download-speed reading
//! (scraped from a speed-test page in a headless browser, or measured
//! directly over HTTP), ICMP ping statistics from the system `ping`
//! command, and an optional weather snapshot for context.

pub mod app;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod journal;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod notify;
pub mod output;
pub mod ping;
pub mod scraper;
pub mod stats;
pub mod throughput;
pub mod types;
pub mod weather;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{
    Config, MeasurementCycle, MeasurementRecord, PingSample, SpeedSample, WeatherSnapshot,
};
pub use output::{
    ColoredFormatter, OutputCoordinator, OutputFormatter, OutputFormatterFactory, PlainFormatter,
};
pub use stats::{SessionStats, SessionSummary};
pub use types::{MeasurementStatus, PhaseStatus, SpeedEngine, SpeedQuality};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_SPEED_URL: &str = "https://fast.com/";
    pub const DEFAULT_SPEED_SELECTOR: &str = "#speed-value";
    pub const DEFAULT_UNIT_SELECTOR: &str = "#speed-units";
    pub const DEFAULT_PLACEHOLDER: &str = "0";
    pub const DEFAULT_STABLE_READS: u32 = 3;
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
    pub const DEFAULT_THROUGHPUT_URL: &str = "https://speed.cloudflare.com/__down?bytes=25000000";
    pub const DEFAULT_PING_HOST: &str = "8.8.8.8";
    pub const DEFAULT_PING_COUNT: u32 = 10;
    pub const DEFAULT_JOURNAL_FILE: &str = "speed_log.json";
    pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(1800);
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    pub const GEO_API_URL: &str = "http://ip-api.com/json";
    pub const GEO_TIMEOUT: Duration = Duration::from_secs(3);
    pub const WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
    pub const WEATHER_TIMEOUT: Duration = Duration::from_secs(10);
}
