//! Command-line interface module with comprehensive help system

pub mod help;

pub use help::HelpSystem;

use clap::Parser;

/// Internet Speed Monitor - measure download speed, latency and connection quality
#[derive(Parser, Debug, Clone)]
#[command(name = "ism")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Speed test page to load in the headless browser
    #[arg(long, default_value = crate::defaults::DEFAULT_SPEED_URL)]
    pub url: String,

    /// CSS selector of the element holding the speed value
    #[arg(long, default_value = crate::defaults::DEFAULT_SPEED_SELECTOR)]
    pub selector: String,

    /// CSS selector of the element holding the speed unit
    #[arg(long, default_value = crate::defaults::DEFAULT_UNIT_SELECTOR)]
    pub unit_selector: String,

    /// Placeholder text the page shows before a real value arrives
    #[arg(long, default_value = crate::defaults::DEFAULT_PLACEHOLDER, allow_hyphen_values = true)]
    pub placeholder: String,

    /// Speed engine to use: "browser" or "http"
    #[arg(long, default_value = "browser")]
    pub engine: String,

    /// Browser executable path, overriding auto-detection
    #[arg(long, value_name = "PATH")]
    pub browser_path: Option<String>,

    /// Consecutive identical reads required to accept a speed value
    #[arg(long, default_value_t = crate::defaults::DEFAULT_STABLE_READS)]
    pub stable_reads: u32,

    /// Delay between DOM polls in milliseconds
    #[arg(long, value_parser = parse_poll_interval, default_value_t = crate::defaults::DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub poll_interval: u64,

    /// Per-phase timeout in seconds
    #[arg(short, long, value_parser = parse_duration, default_value_t = crate::defaults::DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Skip the download speed phase
    #[arg(long)]
    pub skip_speed: bool,

    /// Host to ping for latency statistics
    #[arg(long, default_value = crate::defaults::DEFAULT_PING_HOST)]
    pub ping_host: String,

    /// Number of echo requests per ping run
    #[arg(long, default_value_t = crate::defaults::DEFAULT_PING_COUNT)]
    pub ping_count: u32,

    /// Skip the ping phase
    #[arg(long)]
    pub skip_ping: bool,

    /// Fetch local weather conditions alongside measurements
    #[arg(long)]
    pub weather: bool,

    /// OpenWeatherMap API key (or set WEATHER_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Measurement journal file path
    #[arg(long, value_name = "FILE")]
    pub journal: Option<String>,

    /// Disable journal writes
    #[arg(long)]
    pub no_journal: bool,

    /// Export the journal to CSV at this path and exit
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<String>,

    /// Keep measuring on an interval instead of running once
    #[arg(short, long)]
    pub watch: bool,

    /// Seconds between measurement cycles in watch mode
    #[arg(short, long, value_parser = parse_interval, default_value_t = crate::defaults::DEFAULT_WATCH_INTERVAL.as_secs())]
    pub interval: u64,

    /// Stop watch mode after this many cycles
    #[arg(long, value_name = "N", requires = "watch")]
    pub runs: Option<u32>,

    /// Send a desktop notification after each measurement cycle
    #[arg(long)]
    pub notify: bool,

    /// Emit results as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Show help for specific topic (config, browser, ping, weather, export, watch, examples)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting color flags
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.journal.is_some() && self.no_journal {
            return Err("Cannot specify both --journal and --no-journal".to_string());
        }

        if self.engine != "browser" && self.engine != "http" {
            return Err(format!(
                "Unknown speed engine '{}' (expected 'browser' or 'http')",
                self.engine
            ));
        }

        // Skip phase validation if only exporting the journal
        if !self.is_export_mode() && self.skip_speed && self.skip_ping {
            return Err(
                "Nothing to measure: both the speed and ping phases are disabled".to_string(),
            );
        }

        if self.stable_reads == 0 {
            return Err("Stable read count must be greater than 0".to_string());
        }

        if self.ping_count == 0 || self.ping_count > 100 {
            return Err("Ping count must be between 1 and 100".to_string());
        }

        Ok(())
    }

    /// Check if the invocation only exports the journal to CSV
    pub fn is_export_mode(&self) -> bool {
        self.export_csv.is_some()
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Get the help topic if specified
    pub fn get_help_topic(&self) -> Option<&str> {
        self.help_topic.as_deref()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true  // Force color output when --color is specified
        } else if self.no_color {
            false // Disable color output when --no-color is specified
        } else {
            supports_color() // Use automatic detection
        }
    }

    /// Display help for the specified topic or main help
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        if let Some(topic) = &self.help_topic {
            help_system.display_topic_help(topic, use_colors)
                .unwrap_or_else(|| {
                    format!("Unknown help topic: '{}'\n\nAvailable topics: config, browser, ping, weather, export, watch, examples\n\n{}",
                        topic, help_system.display_main_help(use_colors))
                })
        } else {
            help_system.display_main_help(use_colors)
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Configuration Summary:\n");
        summary.push_str(&format!("  Speed engine: {}\n", self.engine));
        summary.push_str(&format!("  Speed URL: {}\n", self.url));
        summary.push_str(&format!("  Value selector: {}\n", self.selector));
        summary.push_str(&format!("  Timeout: {}s\n", self.timeout));
        summary.push_str(&format!(
            "  Ping host: {} ({} packets)\n",
            self.ping_host, self.ping_count
        ));
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        if self.skip_speed {
            summary.push_str("  Speed phase: skipped\n");
        }

        if self.skip_ping {
            summary.push_str("  Ping phase: skipped\n");
        }

        if self.weather {
            summary.push_str("  Weather lookup: enabled\n");
        }

        if let Some(ref journal) = self.journal {
            summary.push_str(&format!("  Journal file: {}\n", journal));
        }

        if self.watch {
            summary.push_str(&format!("  Watch interval: {}s\n", self.interval));
            if let Some(runs) = self.runs {
                summary.push_str(&format!("  Run limit: {}\n", runs));
            }
        }

        summary
    }
}

/// Parse timeout from seconds string
fn parse_duration(s: &str) -> Result<u64, String> {
    // Reject strings with leading + sign or other invalid formats
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > 600 {
                Err("Duration cannot exceed 600 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Parse watch interval from seconds string
fn parse_interval(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid interval: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid interval: {}", s))
        .and_then(|secs| {
            if secs < 1 {
                Err("Interval must be at least 1 second".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Parse DOM poll delay from milliseconds string
fn parse_poll_interval(s: &str) -> Result<u64, String> {
    s.parse::<u64>()
        .map_err(|_| format!("Invalid poll interval: {}", s))
        .and_then(|ms| {
            if ms < 50 {
                Err("Poll interval must be at least 50ms".to_string())
            } else if ms > 60_000 {
                Err("Poll interval cannot exceed 60000ms".to_string())
            } else {
                Ok(ms)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    // Check for common environment variables that indicate color support
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    // Check for NO_COLOR environment variable
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check for FORCE_COLOR environment variable
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    // On Windows, check for ANSICON or ConEmu
    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    // Default to true on Unix-like systems, false on Windows
    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing_basic() {
        let cli = Cli::parse_from(&["test", "--timeout", "10", "--ping-count", "5"]);
        assert_eq!(cli.timeout, 10);
        assert_eq!(cli.ping_count, 5);
        assert!(!cli.verbose);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(&["test"]);
        assert_eq!(cli.url, crate::defaults::DEFAULT_SPEED_URL);
        assert_eq!(cli.selector, crate::defaults::DEFAULT_SPEED_SELECTOR);
        assert_eq!(cli.placeholder, crate::defaults::DEFAULT_PLACEHOLDER);
        assert_eq!(cli.engine, "browser");
        assert_eq!(cli.stable_reads, 3);
        assert_eq!(cli.poll_interval, 500);
        assert_eq!(cli.timeout, 60);
        assert_eq!(cli.ping_host, "8.8.8.8");
        assert_eq!(cli.ping_count, 10);
        assert_eq!(cli.interval, 1800);
        assert!(!cli.watch);
        assert!(!cli.weather);
        assert!(!cli.notify);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parsing_all_options() {
        let cli = Cli::parse_from(&[
            "test",
            "--url", "https://speed.example.com/",
            "--selector", "#download",
            "--unit-selector", "#download-units",
            "--placeholder", "--",
            "--engine", "http",
            "--stable-reads", "5",
            "--poll-interval", "250",
            "--timeout", "30",
            "--ping-host", "1.1.1.1",
            "--ping-count", "20",
            "--weather",
            "--api-key", "abc123",
            "--journal", "/tmp/journal.jsonl",
            "--watch",
            "--interval", "600",
            "--runs", "4",
            "--notify",
            "--no-color",
            "--verbose",
            "--debug",
            "--help-topic", "config",
        ]);

        assert_eq!(cli.url, "https://speed.example.com/");
        assert_eq!(cli.selector, "#download");
        assert_eq!(cli.unit_selector, "#download-units");
        assert_eq!(cli.placeholder, "--");
        assert_eq!(cli.engine, "http");
        assert_eq!(cli.stable_reads, 5);
        assert_eq!(cli.poll_interval, 250);
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.ping_host, "1.1.1.1");
        assert_eq!(cli.ping_count, 20);
        assert!(cli.weather);
        assert_eq!(cli.api_key.as_ref().unwrap(), "abc123");
        assert_eq!(cli.journal.as_ref().unwrap(), "/tmp/journal.jsonl");
        assert!(cli.watch);
        assert_eq!(cli.interval, 600);
        assert_eq!(cli.runs, Some(4));
        assert!(cli.notify);
        assert!(cli.no_color);
        assert!(cli.verbose);
        assert!(cli.debug);
        assert_eq!(cli.help_topic.as_ref().unwrap(), "config");
    }

    #[test]
    fn test_cli_help_topic_methods() {
        let cli_with_topic = Cli::parse_from(&["test", "--help-topic", "ping"]);
        assert!(cli_with_topic.should_show_topic_help());
        assert_eq!(cli_with_topic.get_help_topic(), Some("ping"));

        let cli_without_topic = Cli::parse_from(&["test"]);
        assert!(!cli_without_topic.should_show_topic_help());
        assert_eq!(cli_without_topic.get_help_topic(), None);
    }

    #[test]
    fn test_color_support_detection() {
        // Test NO_COLOR environment variable
        std::env::set_var("NO_COLOR", "1");
        assert!(!supports_color());
        std::env::remove_var("NO_COLOR");

        // Test FORCE_COLOR environment variable
        std::env::set_var("FORCE_COLOR", "1");
        assert!(supports_color());
        std::env::remove_var("FORCE_COLOR");
    }

    #[test]
    fn test_duration_parsing() {
        // Valid durations
        assert_eq!(parse_duration("10").unwrap(), 10);
        assert_eq!(parse_duration("600").unwrap(), 600);
        assert_eq!(parse_duration("1").unwrap(), 1);

        // Invalid durations
        assert!(parse_duration("0").is_err());
        assert!(parse_duration("601").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("-5").is_err());
    }

    #[test]
    fn test_duration_parsing_edge_cases() {
        // Test boundary values
        assert_eq!(parse_duration("1").unwrap(), 1);     // Minimum valid
        assert_eq!(parse_duration("600").unwrap(), 600); // Maximum valid

        // Test edge cases around boundaries
        assert!(parse_duration("0").is_err());   // Just below minimum
        assert!(parse_duration("601").is_err()); // Just above maximum

        // Test numeric edge cases - u64::MAX will overflow or be > 600, so should error
        assert!(parse_duration("18446744073709551615").is_err()); // u64::MAX (> 600)
        assert!(parse_duration("").is_err());                      // Empty string
        assert!(parse_duration("abc").is_err());                  // Non-numeric
        assert!(parse_duration("10.5").is_err());                 // Decimal
        assert!(parse_duration("+10").is_err());                  // Positive sign
        assert!(parse_duration("0x10").is_err());                 // Hex format
        assert!(parse_duration("-5").is_err());                   // Negative number
    }

    #[test]
    fn test_interval_parsing() {
        assert_eq!(parse_interval("1").unwrap(), 1);
        assert_eq!(parse_interval("1800").unwrap(), 1800);
        assert!(parse_interval("0").is_err());
        assert!(parse_interval("+60").is_err());
        assert!(parse_interval("abc").is_err());
    }

    #[test]
    fn test_poll_interval_parsing() {
        assert_eq!(parse_poll_interval("50").unwrap(), 50);
        assert_eq!(parse_poll_interval("500").unwrap(), 500);
        assert_eq!(parse_poll_interval("60000").unwrap(), 60000);
        assert!(parse_poll_interval("49").is_err());
        assert!(parse_poll_interval("60001").is_err());
        assert!(parse_poll_interval("fast").is_err());
    }

    #[test]
    fn test_config_summary() {
        let cli = Cli::parse_from(&[
            "test",
            "--engine", "http",
            "--timeout", "20",
            "--verbose",
            "--journal", "/tmp/log.jsonl",
        ]);

        let summary = cli.get_config_summary();
        assert!(summary.contains("Speed engine: http"));
        assert!(summary.contains("Timeout: 20s"));
        assert!(summary.contains("Verbose mode: true"));
        assert!(summary.contains("Journal file: /tmp/log.jsonl"));
    }

    #[test]
    fn test_help_display() {
        let cli = Cli::parse_from(&["test"]);
        let help = cli.display_help();
        assert!(help.contains("Internet Speed Monitor"));
        assert!(help.contains("USAGE:"));

        let cli_with_topic = Cli::parse_from(&["test", "--help-topic", "config"]);
        let topic_help = cli_with_topic.display_help();
        assert!(topic_help.contains("CONFIGURATION REFERENCE"));

        let cli_invalid_topic = Cli::parse_from(&["test", "--help-topic", "invalid"]);
        let invalid_help = cli_invalid_topic.display_help();
        assert!(invalid_help.contains("Unknown help topic"));
    }

    #[test]
    fn test_use_colors_method() {
        let cli_no_color = Cli::parse_from(&["test", "--no-color"]);
        assert!(!cli_no_color.use_colors());

        let cli_color = Cli::parse_from(&["test", "--color"]);
        assert!(cli_color.use_colors());

        let cli_default = Cli::parse_from(&["test"]);
        // Result depends on environment, but should not panic
        let _uses_colors = cli_default.use_colors();
    }

    #[test]
    fn test_help_topic_edge_cases() {
        // Test all valid help topics
        for topic in &["config", "browser", "ping", "weather", "export", "watch", "examples"] {
            let cli = Cli::parse_from(&["test", "--help-topic", topic]);
            assert!(cli.should_show_topic_help());
            assert_eq!(cli.get_help_topic(), Some(*topic));

            // Verify each topic actually generates help content
            let help = cli.display_help();
            assert!(!help.is_empty());
            // Each valid topic should not contain "Unknown help topic"
            assert!(!help.contains("Unknown help topic"));
        }

        // Test case insensitivity - uppercase should work (function converts to lowercase)
        let cli = Cli::parse_from(&["test", "--help-topic", "CONFIG"]);
        let help = cli.display_help();
        assert!(!help.contains("Unknown help topic")); // Should be case insensitive
        // Check for content from config help
        assert!(help.contains("CONFIGURATION REFERENCE")); // Should show config help

        // Test completely invalid topic
        let cli = Cli::parse_from(&["test", "--help-topic", "invalid_topic"]);
        let help = cli.display_help();
        assert!(help.contains("Unknown help topic"));
        assert!(help.contains("invalid_topic"));
        assert!(help.contains("Available topics:"));
    }

    #[test]
    fn test_cli_validation() {
        // Test conflicting color flags
        let cli_conflict = Cli::parse_from(&["test", "--color", "--no-color"]);
        assert!(cli_conflict.validate().is_err());
        assert!(cli_conflict.validate().unwrap_err().contains("Cannot specify both --color and --no-color"));

        // Test conflicting journal flags
        let cli_journal = Cli::parse_from(&["test", "--journal", "log.jsonl", "--no-journal"]);
        assert!(cli_journal.validate().is_err());

        // Test unknown engine
        let cli_engine = Cli::parse_from(&["test", "--engine", "quantum"]);
        assert!(cli_engine.validate().is_err());
        assert!(cli_engine.validate().unwrap_err().contains("Unknown speed engine"));

        // Test both phases disabled
        let cli_nothing = Cli::parse_from(&["test", "--skip-speed", "--skip-ping"]);
        assert!(cli_nothing.validate().is_err());
        assert!(cli_nothing.validate().unwrap_err().contains("Nothing to measure"));

        // Test valid configurations
        let cli_valid = Cli::parse_from(&["test"]);
        assert!(cli_valid.validate().is_ok());

        let cli_skip_speed = Cli::parse_from(&["test", "--skip-speed"]);
        assert!(cli_skip_speed.validate().is_ok());

        let cli_color_only = Cli::parse_from(&["test", "--color"]);
        assert!(cli_color_only.validate().is_ok());
    }

    #[test]
    fn test_export_mode_skips_phase_validation() {
        // Exporting the journal does not need any measurement phase
        let cli = Cli::parse_from(&[
            "test",
            "--export-csv", "out.csv",
            "--skip-speed",
            "--skip-ping",
        ]);
        assert!(cli.is_export_mode());
        assert!(cli.validate().is_ok());

        let cli_normal = Cli::parse_from(&["test"]);
        assert!(!cli_normal.is_export_mode());
    }

    #[test]
    fn test_runs_requires_watch() {
        // --runs without --watch should be rejected by clap
        let result = Cli::try_parse_from(&["test", "--runs", "3"]);
        assert!(result.is_err());

        let cli = Cli::parse_from(&["test", "--watch", "--runs", "3"]);
        assert_eq!(cli.runs, Some(3));
    }

    #[test]
    fn test_cli_argument_combinations() {
        // Test all boolean flags together
        let cli = Cli::parse_from(&["test", "--verbose", "--debug", "--no-color", "--notify"]);
        assert!(cli.verbose);
        assert!(cli.debug);
        assert!(cli.no_color);
        assert!(cli.notify);

        // Short flags
        let cli = Cli::parse_from(&["test", "-w", "-i", "300", "-t", "45"]);
        assert!(cli.watch);
        assert_eq!(cli.interval, 300);
        assert_eq!(cli.timeout, 45);
    }

    #[test]
    fn test_ping_count_boundary_validation() {
        let cli = Cli::parse_from(&["test", "--ping-count", "1"]);
        assert!(cli.validate().is_ok());

        let cli = Cli::parse_from(&["test", "--ping-count", "100"]);
        assert!(cli.validate().is_ok());

        let cli = Cli::parse_from(&["test", "--ping-count", "0"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(&["test", "--ping-count", "101"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_zero_stable_reads_rejected() {
        let cli = Cli::parse_from(&["test", "--stable-reads", "0"]);
        assert!(cli.validate().is_err());
        assert!(cli.validate().unwrap_err().contains("Stable read count"));
    }
}
