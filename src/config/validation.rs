//! Configuration validation utilities and rules

use crate::{
    error::Result,
    models::Config,
    types::SpeedEngine,
};
use std::net::IpAddr;
use std::path::Path;

/// Configuration validator with advanced validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        // Basic validation (already done in Config::validate)
        config.validate()?;

        // Advanced validation checks
        warnings.extend(Self::validate_speed_settings(config)?);
        warnings.extend(Self::validate_ping_settings(config)?);
        warnings.extend(Self::validate_weather_settings(config)?);
        warnings.extend(Self::validate_journal_settings(config)?);
        warnings.extend(Self::validate_watch_settings(config)?);

        Ok(warnings)
    }

    /// Validate speed measurement settings
    fn validate_speed_settings(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        if config.skip_speed {
            return Ok(warnings);
        }

        if let Ok(parsed) = url::Url::parse(&config.speed_url) {
            if parsed.scheme() == "http" {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!(
                        "Speed test URL '{}' uses HTTP; the page may redirect to HTTPS before it loads",
                        config.speed_url
                    ),
                ));
            }
        }

        // The stabilization window must fit inside the timeout, or every
        // measurement ends as a timeout before the value can settle.
        let settle_ms = u64::from(config.stable_reads) * config.poll_interval_ms;
        let timeout_ms = config.timeout_seconds * 1000;
        if settle_ms >= timeout_ms {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "{} stable reads at {}ms need {}ms to settle, which exceeds the {}s timeout",
                    config.stable_reads, config.poll_interval_ms, settle_ms, config.timeout_seconds
                ),
            ));
        } else if settle_ms * 2 >= timeout_ms {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Stabilization window of {}ms leaves little headroom before the {}s timeout",
                    settle_ms, config.timeout_seconds
                ),
            ));
        }

        if config.poll_interval_ms > 5000 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Poll interval of {}ms is long; the value may settle and change again between reads",
                    config.poll_interval_ms
                ),
            ));
        }

        if !config.speed_selector.starts_with('#') && !config.speed_selector.starts_with('.') {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Selector '{}' is neither an id nor a class selector and may match multiple elements",
                    config.speed_selector
                ),
            ));
        }

        if config.placeholder.is_empty() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "Empty placeholder means the first non-empty reading is accepted immediately"
                    .to_string(),
            ));
        }

        if config.engine == SpeedEngine::Browser {
            if let Some(ref path) = config.browser_path {
                if !Path::new(path).exists() {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("Configured browser path '{}' does not exist on this machine", path),
                    ));
                }
            }
        }

        Ok(warnings)
    }

    /// Validate ping settings
    fn validate_ping_settings(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        if config.skip_ping {
            return Ok(warnings);
        }

        if let Ok(ip) = config.ping_host.parse::<IpAddr>() {
            if Self::is_well_known_ping_host(&ip) {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Pinging well-known public resolver: {}", ip),
                ));
            }

            let is_private = match ip {
                IpAddr::V4(ipv4) => ipv4.is_private(),
                IpAddr::V6(ipv6) => ipv6.is_loopback(),
            };

            if is_private {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "Ping host {} is in a private range and only measures LAN latency",
                        ip
                    ),
                ));
            }

            let is_loopback = match ip {
                IpAddr::V4(ipv4) => ipv4.is_loopback(),
                IpAddr::V6(ipv6) => ipv6.is_loopback(),
            };

            if is_loopback {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Ping host {} is the loopback address (localhost)", ip),
                ));
            }
        }

        if config.ping_count < 3 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Ping count of {} gives unreliable jitter and packet loss figures (recommended: >= 3)",
                    config.ping_count
                ),
            ));
        } else if config.ping_count > 30 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "High ping count of {} adds roughly {}s to every cycle",
                    config.ping_count, config.ping_count
                ),
            ));
        }

        Ok(warnings)
    }

    /// Validate weather lookup settings
    fn validate_weather_settings(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        if config.weather_enabled && config.weather_api_key.is_none() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "Weather lookup is enabled but no API key is set; the lookup will be skipped at runtime"
                    .to_string(),
            ));
        }

        if !config.weather_enabled && config.weather_api_key.is_some() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "A weather API key is set but weather lookup is disabled (use --weather to enable)"
                    .to_string(),
            ));
        }

        Ok(warnings)
    }

    /// Validate journal settings
    fn validate_journal_settings(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        if !config.journal_enabled {
            return Ok(warnings);
        }

        let path = Path::new(&config.journal_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "Journal directory '{}' does not exist and will be created on first write",
                        parent.display()
                    ),
                ));
            }
        }

        Ok(warnings)
    }

    /// Validate watch mode settings
    fn validate_watch_settings(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        if !config.watch {
            return Ok(warnings);
        }

        // Worst-case cycle length: speed runs to its timeout, ping replies
        // arrive about once per second.
        let worst_case = Self::estimated_cycle_seconds(config);
        if config.interval_seconds <= worst_case {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Watch interval of {}s is shorter than a worst-case cycle (~{}s); ticks will be skipped while a cycle runs",
                    config.interval_seconds, worst_case
                ),
            ));
        }

        if let Some(runs) = config.max_runs {
            if runs == 1 {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    "Watch mode with --runs 1 performs a single cycle, same as a one-shot run"
                        .to_string(),
                ));
            }
        }

        Ok(warnings)
    }

    /// Estimate the worst-case duration of one measurement cycle in seconds
    fn estimated_cycle_seconds(config: &Config) -> u64 {
        let speed = if config.skip_speed { 0 } else { config.timeout_seconds };
        let ping = if config.skip_ping { 0 } else { u64::from(config.ping_count) };
        speed + ping
    }

    /// Check if IP is a well-known public resolver commonly used as a ping target
    fn is_well_known_ping_host(ip: &IpAddr) -> bool {
        let known_hosts = [
            "8.8.8.8",   // Google DNS
            "8.8.4.4",   // Google DNS
            "1.1.1.1",   // Cloudflare DNS
            "1.0.0.1",   // Cloudflare DNS
            "9.9.9.9",   // Quad9 DNS
            "208.67.222.222", // OpenDNS
            "2001:4860:4860::8888", // Google IPv6 DNS
            "2606:4700:4700::1111", // Cloudflare IPv6 DNS
        ];

        known_hosts
            .iter()
            .filter_map(|known| known.parse::<IpAddr>().ok())
            .any(|known| known == *ip)
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> &'static str {
        match self {
            Self::Info => "blue",
            Self::Warning => "yellow",
            Self::Error => "red",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, _use_color: bool) -> String {
        format!("[{}] {}", self.level.as_str(), self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
