//! Comprehensive command-line help system with examples and detailed guidance
//!
//! This module provides detailed help text, usage examples, and contextual guidance
//! to help users effectively use the internet speed monitor.

use crate::{
    config::env::EnvManager,
    ping::platform::get_platform_name,
};
use colored::*;

/// Comprehensive help system for the CLI application
pub struct HelpSystem {
    platform: String,
}

impl HelpSystem {
    /// Create a new help system
    pub fn new() -> Self {
        Self {
            platform: get_platform_name(),
        }
    }

    /// Display the main help message with all available options
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = String::new();

        // Header
        help.push_str(&self.format_header(use_colors));
        help.push_str("\n");

        // Usage section
        help.push_str(&self.format_usage_section(use_colors));
        help.push_str("\n");

        // Options section
        help.push_str(&self.format_options_section(use_colors));
        help.push_str("\n");

        // Examples section
        help.push_str(&self.format_examples_section(use_colors));
        help.push_str("\n");

        // Environment variables section
        help.push_str(&self.format_environment_section(use_colors));
        help.push_str("\n");

        // Configuration section
        help.push_str(&self.format_configuration_section(use_colors));
        help.push_str("\n");

        // Footer with additional resources
        help.push_str(&self.format_footer(use_colors));

        help
    }

    /// Display quick help for specific topics
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "config" | "configuration" => Some(self.format_configuration_help(use_colors)),
            "env" | "environment" => Some(self.format_environment_help(use_colors)),
            "browser" => Some(self.format_browser_help(use_colors)),
            "ping" => Some(self.format_ping_help(use_colors)),
            "weather" => Some(self.format_weather_help(use_colors)),
            "export" | "journal" => Some(self.format_export_help(use_colors)),
            "watch" | "monitor" => Some(self.format_watch_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            _ => None,
        }
    }

    /// Format the main header
    fn format_header(&self, use_colors: bool) -> String {
        let title = "Internet Speed Monitor";
        let subtitle = "Measure download speed, latency and connection quality from the command line";
        let version = env!("CARGO_PKG_VERSION");

        if use_colors {
            format!(
                "{}\n{}\nVersion: {} | Platform: {}\n",
                title.bright_cyan().bold(),
                subtitle.bright_blue(),
                version.green(),
                self.platform.yellow()
            )
        } else {
            format!(
                "{}\n{}\nVersion: {} | Platform: {}\n",
                title, subtitle, version, self.platform
            )
        }
    }

    /// Format the usage section
    fn format_usage_section(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "USAGE:".bright_green().bold().to_string()
        } else {
            "USAGE:".to_string()
        };

        let usage_patterns = vec![
            "ism [OPTIONS]",
            "ism --watch [OPTIONS]",
            "ism --export-csv <FILE>",
            "ism --help-topic <TOPIC>",
        ];

        let mut usage = format!("{}\n", header);
        for pattern in usage_patterns {
            if use_colors {
                usage.push_str(&format!("  {}\n", pattern.bright_white()));
            } else {
                usage.push_str(&format!("  {}\n", pattern));
            }
        }

        usage
    }

    /// Format the options section
    fn format_options_section(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "OPTIONS:".bright_green().bold().to_string()
        } else {
            "OPTIONS:".to_string()
        };

        let options = vec![
            OptionHelp {
                short: None,
                long: "url",
                value: "<URL>",
                description: "Speed test page to load in the headless browser",
                example: Some("--url https://fast.com/"),
            },
            OptionHelp {
                short: None,
                long: "selector",
                value: "<CSS>",
                description: "CSS selector of the element holding the speed value",
                example: Some("--selector '#speed-value'"),
            },
            OptionHelp {
                short: None,
                long: "engine",
                value: "<NAME>",
                description: "Speed engine: \"browser\" (scrape) or \"http\" (download)",
                example: Some("--engine http"),
            },
            OptionHelp {
                short: Some("t"),
                long: "timeout",
                value: "<SECONDS>",
                description: "Per-phase timeout in seconds (1-600)",
                example: Some("--timeout 30"),
            },
            OptionHelp {
                short: None,
                long: "ping-host",
                value: "<HOST>",
                description: "Host to ping for latency statistics",
                example: Some("--ping-host 1.1.1.1"),
            },
            OptionHelp {
                short: None,
                long: "ping-count",
                value: "<NUMBER>",
                description: "Echo requests per ping run (1-100)",
                example: Some("--ping-count 20"),
            },
            OptionHelp {
                short: None,
                long: "skip-speed",
                value: "",
                description: "Skip the download speed phase",
                example: Some("--skip-speed"),
            },
            OptionHelp {
                short: None,
                long: "skip-ping",
                value: "",
                description: "Skip the ping phase",
                example: Some("--skip-ping"),
            },
            OptionHelp {
                short: None,
                long: "weather",
                value: "",
                description: "Fetch local weather conditions alongside measurements",
                example: Some("--weather --api-key <KEY>"),
            },
            OptionHelp {
                short: None,
                long: "journal",
                value: "<FILE>",
                description: "Measurement journal file path",
                example: Some("--journal ~/speed_log.json"),
            },
            OptionHelp {
                short: None,
                long: "export-csv",
                value: "<FILE>",
                description: "Export the journal to CSV and exit",
                example: Some("--export-csv measurements.csv"),
            },
            OptionHelp {
                short: Some("w"),
                long: "watch",
                value: "",
                description: "Keep measuring on an interval instead of running once",
                example: Some("--watch --interval 600"),
            },
            OptionHelp {
                short: Some("i"),
                long: "interval",
                value: "<SECONDS>",
                description: "Seconds between measurement cycles in watch mode",
                example: Some("--interval 900"),
            },
            OptionHelp {
                short: None,
                long: "runs",
                value: "<N>",
                description: "Stop watch mode after this many cycles",
                example: Some("--watch --runs 10"),
            },
            OptionHelp {
                short: None,
                long: "notify",
                value: "",
                description: "Send a desktop notification after each cycle",
                example: Some("--notify"),
            },
            OptionHelp {
                short: None,
                long: "json",
                value: "",
                description: "Emit results as JSON instead of formatted text",
                example: Some("--json"),
            },
            OptionHelp {
                short: None,
                long: "verbose",
                value: "",
                description: "Enable verbose output with per-phase detail",
                example: Some("--verbose"),
            },
            OptionHelp {
                short: None,
                long: "no-color",
                value: "",
                description: "Disable colored output",
                example: Some("--no-color"),
            },
            OptionHelp {
                short: None,
                long: "help-topic",
                value: "<TOPIC>",
                description: "Show help for a specific topic",
                example: Some("--help-topic ping"),
            },
        ];

        let mut output = format!("{}\n", header);
        for option in options {
            output.push_str(&option.format(use_colors));
            output.push_str("\n");
        }

        output
    }

    /// Format the examples section
    fn format_examples_section(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "EXAMPLES:".bright_green().bold().to_string()
        } else {
            "EXAMPLES:".to_string()
        };

        let examples = vec![
            ExampleHelp {
                title: "Single measurement",
                command: "ism",
                description: "Measure download speed and ping once with default settings",
            },
            ExampleHelp {
                title: "Continuous monitoring",
                command: "ism --watch --interval 600",
                description: "Measure every 10 minutes until interrupted with Ctrl-C",
            },
            ExampleHelp {
                title: "Bounded watch session",
                command: "ism --watch --runs 5 --notify",
                description: "Run 5 cycles with a desktop notification after each one",
            },
            ExampleHelp {
                title: "Weather-annotated measurement",
                command: "ism --weather --api-key $WEATHER_API_KEY",
                description: "Include local weather conditions in the console report",
            },
            ExampleHelp {
                title: "HTTP engine without a browser",
                command: "ism --engine http --timeout 30",
                description: "Measure throughput by downloading a payload instead of scraping",
            },
            ExampleHelp {
                title: "Export history for a spreadsheet",
                command: "ism --export-csv measurements.csv",
                description: "Convert the measurement journal to CSV and exit",
            },
            ExampleHelp {
                title: "Scripting with JSON output",
                command: "ism --json --skip-speed",
                description: "Emit a machine-readable ping-only result on stdout",
            },
        ];

        let mut output = format!("{}\n", header);
        for example in examples {
            output.push_str(&example.format(use_colors));
            output.push_str("\n");
        }

        output
    }

    /// Format the environment variables section
    fn format_environment_section(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "ENVIRONMENT VARIABLES:".bright_green().bold().to_string()
        } else {
            "ENVIRONMENT VARIABLES:".to_string()
        };

        let env_vars = EnvManager::get_supported_env_vars();

        let mut output = format!("{}\n", header);
        output.push_str("Configuration priority: CLI arguments > Environment variables > Defaults\n\n");

        for (var_name, description, _example) in env_vars {
            if use_colors {
                output.push_str(&format!("  {}: {}\n",
                    var_name.bright_yellow().bold(),
                    description.white()
                ));
            } else {
                output.push_str(&format!("  {}: {}\n", var_name, description));
            }
        }

        output.push_str("\nExample .env file:\n");
        if use_colors {
            output.push_str(&format!("  {}\n", "SPEED_URL=https://fast.com/".bright_blue()));
            output.push_str(&format!("  {}\n", "PING_HOST=1.1.1.1".bright_blue()));
            output.push_str(&format!("  {}\n", "WEATHER_API_KEY=0123456789abcdef".bright_blue()));
            output.push_str(&format!("  {}\n", "JOURNAL_FILE=speed_log.json".bright_blue()));
        } else {
            output.push_str("  SPEED_URL=https://fast.com/\n");
            output.push_str("  PING_HOST=1.1.1.1\n");
            output.push_str("  WEATHER_API_KEY=0123456789abcdef\n");
            output.push_str("  JOURNAL_FILE=speed_log.json\n");
        }

        output
    }

    /// Format the configuration section
    fn format_configuration_section(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "CONFIGURATION:".bright_green().bold().to_string()
        } else {
            "CONFIGURATION:".to_string()
        };

        let mut output = format!("{}\n", header);
        output.push_str("The application supports multiple configuration methods:\n\n");

        let config_methods = vec![
            ("Command-line arguments", "Highest priority, override all other settings"),
            ("Environment variables", "Medium priority, can be set in shell or .env file"),
            ("Default values", "Lowest priority, sensible defaults for all platforms"),
        ];

        for (method, description) in config_methods {
            if use_colors {
                output.push_str(&format!("  {}: {}\n",
                    method.bright_cyan().bold(),
                    description.white()
                ));
            } else {
                output.push_str(&format!("  {}: {}\n", method, description));
            }
        }

        output.push_str(&format!("\nPlatform-specific behavior on {}:\n", self.platform));
        output.push_str("  - Browser detection searches the platform's usual install locations\n");
        output.push_str("  - Ping flags match the platform's ping binary\n");
        output.push_str("  - Desktop notifications use the native notification service\n");

        output
    }

    /// Format the footer with additional resources
    fn format_footer(&self, use_colors: bool) -> String {
        let mut footer = String::new();

        if use_colors {
            footer.push_str(&format!("{}\n", "ADDITIONAL HELP:".bright_green().bold()));
        } else {
            footer.push_str("ADDITIONAL HELP:\n");
        }

        let help_topics = vec![
            ("--help-topic config", "Configuration options and parameter limits"),
            ("--help-topic browser", "Browser detection and headless scraping"),
            ("--help-topic ping", "Ping statistics and platform differences"),
            ("--help-topic weather", "Weather lookup setup"),
            ("--help-topic export", "Journal format and CSV export"),
            ("--help-topic watch", "Continuous monitoring mode"),
        ];

        for (command, description) in help_topics {
            if use_colors {
                footer.push_str(&format!("  {}: {}\n",
                    command.bright_yellow(),
                    description.white()
                ));
            } else {
                footer.push_str(&format!("  {}: {}\n", command, description));
            }
        }

        footer.push_str("\nFor more information, visit the project documentation or GitHub repository.\n");

        footer
    }

    /// Format detailed configuration help
    fn format_configuration_help(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "CONFIGURATION REFERENCE:".bright_green().bold().to_string()
        } else {
            "CONFIGURATION REFERENCE:".to_string()
        };

        let mut help = format!("{}\n\n", header);

        help.push_str("CONFIGURATION PRIORITY (highest to lowest):\n");
        help.push_str("1. Command-line arguments\n");
        help.push_str("2. Environment variables\n");
        help.push_str("3. Default values\n\n");

        help.push_str("PARAMETER LIMITS:\n");
        help.push_str("- Timeout: 1-600 seconds per phase\n");
        help.push_str("- Stable reads: 1-50 identical consecutive polls\n");
        help.push_str("- Poll interval: 50-60000 milliseconds\n");
        help.push_str("- Ping count: 1-100 echo requests\n");
        help.push_str("- Watch interval: at least 5 seconds\n\n");

        help.push_str(&format!("PLATFORM-SPECIFIC BEHAVIOR ({}):\n", self.platform));
        match self.platform.as_str() {
            "Windows" => {
                help.push_str("- Browser detected under Program Files and LOCALAPPDATA\n");
                help.push_str("- Ping uses -n for count and -w for timeout\n");
                help.push_str("- Notifications appear as toast messages\n");
            }
            "macOS" => {
                help.push_str("- Browser detected inside /Applications app bundles\n");
                help.push_str("- Ping uses -c for count\n");
                help.push_str("- Notifications use Notification Center\n");
            }
            "Linux" => {
                help.push_str("- Browser detected under /usr/bin and snap locations\n");
                help.push_str("- Ping uses -c for count and -W for timeout\n");
                help.push_str("- Notifications are delivered over D-Bus\n");
            }
            _ => {
                help.push_str("- Conservative defaults for unknown platform\n");
            }
        }

        help
    }

    /// Format detailed environment help
    fn format_environment_help(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "ENVIRONMENT VARIABLES REFERENCE:".bright_green().bold().to_string()
        } else {
            "ENVIRONMENT VARIABLES REFERENCE:".to_string()
        };

        let mut help = format!("{}\n\n", header);

        help.push_str("LOADING ORDER:\n");
        help.push_str("1. System environment variables\n");
        help.push_str("2. .env file in current directory (if present)\n");
        help.push_str("3. Command-line arguments (override both)\n\n");

        help.push_str("SUPPORTED VARIABLES:\n");
        let env_vars = EnvManager::get_supported_env_vars();
        for (var_name, description, example) in env_vars {
            if use_colors {
                help.push_str(&format!("{}:\n  {}\n  Example: {}\n\n",
                    var_name.bright_yellow().bold(),
                    description.white(),
                    example.bright_blue().italic()
                ));
            } else {
                help.push_str(&format!("{}:\n  {}\n  Example: {}\n\n", var_name, description, example));
            }
        }

        help.push_str("EXAMPLE .env FILE:\n");
        help.push_str(&EnvManager::create_example_env_content());

        help
    }

    /// Format browser-specific help
    fn format_browser_help(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "BROWSER REFERENCE:".bright_green().bold().to_string()
        } else {
            "BROWSER REFERENCE:".to_string()
        };

        let mut help = format!("{}\n\n", header);

        help.push_str("HOW THE BROWSER ENGINE WORKS:\n");
        help.push_str("1. A headless Chrome or Chromium instance loads the speed test page\n");
        help.push_str("2. The page runs its own measurement while the monitor polls the\n");
        help.push_str("   value element until it differs from the placeholder\n");
        help.push_str("3. The value is accepted once it stays identical for the configured\n");
        help.push_str("   number of consecutive reads\n\n");

        help.push_str("BROWSER DETECTION ORDER:\n");
        help.push_str("1. --browser-path command-line argument\n");
        help.push_str("2. BROWSER_PATH environment variable\n");
        help.push_str("3. Common install locations for the platform\n\n");

        help.push_str(&format!("SEARCHED LOCATIONS ({}):\n", self.platform));
        match self.platform.as_str() {
            "Windows" => {
                help.push_str("- %ProgramFiles%\\Google\\Chrome\\Application\\chrome.exe\n");
                help.push_str("- %ProgramFiles(x86)%\\Google\\Chrome\\Application\\chrome.exe\n");
                help.push_str("- %LOCALAPPDATA%\\Google\\Chrome\\Application\\chrome.exe\n");
            }
            "macOS" => {
                help.push_str("- /Applications/Google Chrome.app\n");
                help.push_str("- /Applications/Chromium.app\n");
                help.push_str("- /Applications/Microsoft Edge.app\n");
            }
            "Linux" => {
                help.push_str("- /usr/bin/google-chrome, /usr/bin/google-chrome-stable\n");
                help.push_str("- /usr/bin/chromium, /usr/bin/chromium-browser\n");
                help.push_str("- /snap/bin/chromium\n");
            }
            _ => {
                help.push_str("- No known locations; set BROWSER_PATH explicitly\n");
            }
        }

        help.push_str("\nTROUBLESHOOTING:\n");
        help.push_str("- \"No Chrome or Chromium installation found\": install a browser or\n");
        help.push_str("  point BROWSER_PATH at the executable\n");
        help.push_str("- Pages that never stabilize: adjust --selector and --placeholder to\n");
        help.push_str("  match the page markup\n");
        help.push_str("- No browser available at all: use --engine http to measure by\n");
        help.push_str("  downloading a payload instead\n");

        help
    }

    /// Format ping-specific help
    fn format_ping_help(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "PING REFERENCE:".bright_green().bold().to_string()
        } else {
            "PING REFERENCE:".to_string()
        };

        let mut help = format!("{}\n\n", header);

        help.push_str("The ping phase shells out to the system ping binary and parses its\n");
        help.push_str("output, so no raw-socket privileges are required.\n\n");

        help.push_str("REPORTED STATISTICS:\n");
        help.push_str("- Average: taken verbatim from the ping summary line\n");
        help.push_str("- Jitter: spread between the slowest and fastest reply\n");
        help.push_str("- Packet loss: percentage computed from sent/received counters\n\n");

        help.push_str("POPULAR TARGETS:\n");
        help.push_str("- Google DNS: 8.8.8.8\n");
        help.push_str("- Cloudflare DNS: 1.1.1.1\n");
        help.push_str("- Quad9 DNS: 9.9.9.9\n\n");

        help.push_str(&format!("PLATFORM FLAGS ({}):\n", self.platform));
        match self.platform.as_str() {
            "Windows" => {
                help.push_str("- Count: -n, per-reply timeout: -w (milliseconds)\n");
                help.push_str("- Summary line reads \"Average = Nms\"\n");
            }
            "macOS" => {
                help.push_str("- Count: -c\n");
                help.push_str("- Summary line reads \"round-trip min/avg/max/stddev\"\n");
            }
            "Linux" => {
                help.push_str("- Count: -c, per-reply timeout: -W (seconds)\n");
                help.push_str("- Summary line reads \"rtt min/avg/max/mdev\"\n");
            }
            _ => {
                help.push_str("- Unix-style -c flag is assumed\n");
            }
        }

        help
    }

    /// Format weather-specific help
    fn format_weather_help(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "WEATHER LOOKUP REFERENCE:".bright_green().bold().to_string()
        } else {
            "WEATHER LOOKUP REFERENCE:".to_string()
        };

        let mut help = format!("{}\n\n", header);

        help.push_str("HOW IT WORKS:\n");
        help.push_str("1. The public IP is geolocated via ip-api.com (3 second timeout)\n");
        help.push_str("2. Current conditions for that location are fetched from\n");
        help.push_str("   OpenWeatherMap in metric units\n\n");

        help.push_str("SETUP:\n");
        help.push_str("1. Create a free API key at https://openweathermap.org/api\n");
        help.push_str("2. Pass it with --api-key or set WEATHER_API_KEY\n");
        help.push_str("3. Enable the lookup with --weather\n\n");

        help.push_str("NOTES:\n");
        help.push_str("- Without an API key the weather phase is skipped with a notice\n");
        help.push_str("- Weather never affects the measurement status or the journal\n");
        help.push_str("- Lookup failures are logged and the cycle continues\n");

        help
    }

    /// Format journal and export help
    fn format_export_help(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "JOURNAL AND EXPORT REFERENCE:".bright_green().bold().to_string()
        } else {
            "JOURNAL AND EXPORT REFERENCE:".to_string()
        };

        let mut help = format!("{}\n\n", header);

        help.push_str("JOURNAL FORMAT:\n");
        help.push_str("Each measurement cycle appends one JSON object per line:\n\n");
        help.push_str("  {\"timestamp\":\"2026-08-21T09:30:00Z\",\"speed\":\"48.3 Mbps\",\n");
        help.push_str("   \"ping\":\"23.410 ms\",\"status\":\"complete\"}\n\n");

        help.push_str("- speed and ping are null when the phase produced no value\n");
        help.push_str("- status is \"complete\", \"partial\" or \"failed\"\n");
        help.push_str("- the file is append-only; history is never rewritten\n\n");

        help.push_str("CSV EXPORT:\n");
        help.push_str("- --export-csv <FILE> converts the journal and exits\n");
        help.push_str("- Columns: timestamp, speed, ping, status\n");
        help.push_str("- Rows keep the journal order, one row per valid line\n");
        help.push_str("- Corrupt lines are skipped with a warning instead of aborting\n");

        help
    }

    /// Format watch mode help
    fn format_watch_help(&self, use_colors: bool) -> String {
        let header = if use_colors {
            "WATCH MODE REFERENCE:".bright_green().bold().to_string()
        } else {
            "WATCH MODE REFERENCE:".to_string()
        };

        let mut help = format!("{}\n\n", header);

        help.push_str("BEHAVIOR:\n");
        help.push_str("- The first cycle starts immediately, then one cycle per interval\n");
        help.push_str("- If a cycle is still running when the next tick arrives, the tick\n");
        help.push_str("  is skipped and a warning is logged\n");
        help.push_str("- Ctrl-C stops the loop and prints a session summary\n");
        help.push_str("- --runs <N> stops automatically after N cycles\n\n");

        help.push_str("SESSION SUMMARY:\n");
        help.push_str("- Cycle counts by outcome (complete, partial, failed)\n");
        help.push_str("- Average, minimum and maximum of the numeric speed readings\n");
        help.push_str("- Average ping across successful runs\n\n");

        help.push_str("TIPS:\n");
        help.push_str("- Combine with --notify to get a desktop notification per cycle\n");
        help.push_str("- Keep the interval longer than a typical cycle (about a minute\n");
        help.push_str("  with the browser engine) to avoid skipped ticks\n");

        help
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for formatting individual options
struct OptionHelp {
    short: Option<&'static str>,
    long: &'static str,
    value: &'static str,
    description: &'static str,
    example: Option<&'static str>,
}

impl OptionHelp {
    fn format(&self, use_colors: bool) -> String {
        let mut option_str = String::new();

        // Format the option flags
        if let Some(short) = self.short {
            if use_colors {
                option_str.push_str(&format!("  {}, ", format!("-{}", short).bright_cyan()));
            } else {
                option_str.push_str(&format!("  -{}, ", short));
            }
        } else {
            option_str.push_str("      ");
        }

        let long_with_value = if self.value.is_empty() {
            format!("--{}", self.long)
        } else {
            format!("--{} {}", self.long, self.value)
        };

        if use_colors {
            option_str.push_str(&format!("{:<30} {}",
                long_with_value.bright_cyan(),
                self.description.white()
            ));
        } else {
            option_str.push_str(&format!("{:<30} {}", long_with_value, self.description));
        }

        // Add example if provided
        if let Some(example) = self.example {
            if use_colors {
                option_str.push_str(&format!("\n{}{}", " ".repeat(36),
                    format!("Example: {}", example).bright_blue().italic()
                ));
            } else {
                option_str.push_str(&format!("\n{}Example: {}", " ".repeat(36), example));
            }
        }

        option_str
    }
}

/// Helper struct for formatting examples
struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!("  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic()
            )
        } else {
            format!("  {}:\n    {}\n    {}\n",
                self.title, self.command, self.description
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_system_creation() {
        let help_system = HelpSystem::new();
        assert!(!help_system.platform.is_empty());
    }

    #[test]
    fn test_main_help_display() {
        let help_system = HelpSystem::new();

        let colored_help = help_system.display_main_help(true);
        let plain_help = help_system.display_main_help(false);

        // Both should contain essential sections
        assert!(colored_help.contains("Internet Speed Monitor"));
        assert!(colored_help.contains("USAGE:"));
        assert!(colored_help.contains("OPTIONS:"));
        assert!(colored_help.contains("EXAMPLES:"));

        assert!(plain_help.contains("Internet Speed Monitor"));
        assert!(plain_help.contains("USAGE:"));
        assert!(plain_help.contains("OPTIONS:"));
        assert!(plain_help.contains("EXAMPLES:"));

        // Colored version should be longer due to ANSI codes
        assert!(colored_help.len() >= plain_help.len());
    }

    #[test]
    fn test_topic_help() {
        let help_system = HelpSystem::new();

        // Valid topics
        assert!(help_system.display_topic_help("config", true).is_some());
        assert!(help_system.display_topic_help("browser", false).is_some());
        assert!(help_system.display_topic_help("ping", true).is_some());
        assert!(help_system.display_topic_help("weather", false).is_some());
        assert!(help_system.display_topic_help("export", true).is_some());
        assert!(help_system.display_topic_help("watch", false).is_some());
        assert!(help_system.display_topic_help("examples", true).is_some());

        // Aliases
        assert!(help_system.display_topic_help("journal", false).is_some());
        assert!(help_system.display_topic_help("monitor", false).is_some());
        assert!(help_system.display_topic_help("environment", false).is_some());

        // Invalid topic
        assert!(help_system.display_topic_help("invalid", true).is_none());
    }

    #[test]
    fn test_configuration_help() {
        let help_system = HelpSystem::new();

        let config_help = help_system.format_configuration_help(false);

        assert!(config_help.contains("CONFIGURATION REFERENCE"));
        assert!(config_help.contains("CONFIGURATION PRIORITY"));
        assert!(config_help.contains("PARAMETER LIMITS"));
        assert!(config_help.contains("PLATFORM-SPECIFIC BEHAVIOR"));
    }

    #[test]
    fn test_environment_help() {
        let help_system = HelpSystem::new();

        let env_help = help_system.format_environment_help(false);

        assert!(env_help.contains("ENVIRONMENT VARIABLES REFERENCE"));
        assert!(env_help.contains("LOADING ORDER"));
        assert!(env_help.contains("SUPPORTED VARIABLES"));
        assert!(env_help.contains("EXAMPLE .env FILE"));
    }

    #[test]
    fn test_browser_help() {
        let help_system = HelpSystem::new();

        let browser_help = help_system.format_browser_help(false);

        assert!(browser_help.contains("BROWSER REFERENCE"));
        assert!(browser_help.contains("BROWSER DETECTION ORDER"));
        assert!(browser_help.contains("SEARCHED LOCATIONS"));
        assert!(browser_help.contains("TROUBLESHOOTING"));
    }

    #[test]
    fn test_ping_help() {
        let help_system = HelpSystem::new();

        let ping_help = help_system.format_ping_help(false);

        assert!(ping_help.contains("PING REFERENCE"));
        assert!(ping_help.contains("REPORTED STATISTICS"));
        assert!(ping_help.contains("POPULAR TARGETS"));
        assert!(ping_help.contains("PLATFORM FLAGS"));
    }

    #[test]
    fn test_weather_help() {
        let help_system = HelpSystem::new();

        let weather_help = help_system.format_weather_help(false);

        assert!(weather_help.contains("WEATHER LOOKUP REFERENCE"));
        assert!(weather_help.contains("HOW IT WORKS"));
        assert!(weather_help.contains("SETUP"));
        assert!(weather_help.contains("WEATHER_API_KEY"));
    }

    #[test]
    fn test_export_help() {
        let help_system = HelpSystem::new();

        let export_help = help_system.format_export_help(false);

        assert!(export_help.contains("JOURNAL AND EXPORT REFERENCE"));
        assert!(export_help.contains("JOURNAL FORMAT"));
        assert!(export_help.contains("CSV EXPORT"));
        assert!(export_help.contains("status"));
    }

    #[test]
    fn test_watch_help() {
        let help_system = HelpSystem::new();

        let watch_help = help_system.format_watch_help(false);

        assert!(watch_help.contains("WATCH MODE REFERENCE"));
        assert!(watch_help.contains("BEHAVIOR"));
        assert!(watch_help.contains("SESSION SUMMARY"));
        assert!(watch_help.contains("Ctrl-C"));
    }

    #[test]
    fn test_option_help_formatting() {
        let option = OptionHelp {
            short: Some("t"),
            long: "timeout",
            value: "<SECONDS>",
            description: "Per-phase timeout in seconds",
            example: Some("--timeout 30"),
        };

        let formatted = option.format(false);
        assert!(formatted.contains("-t"));
        assert!(formatted.contains("--timeout"));
        assert!(formatted.contains("Per-phase timeout in seconds"));
        assert!(formatted.contains("Example: --timeout 30"));
    }

    #[test]
    fn test_example_help_formatting() {
        let example = ExampleHelp {
            title: "Basic measurement",
            command: "ism --watch",
            description: "Measure continuously",
        };

        let formatted = example.format(false);
        assert!(formatted.contains("Basic measurement"));
        assert!(formatted.contains("ism --watch"));
        assert!(formatted.contains("Measure continuously"));
    }

    #[test]
    fn test_platform_specific_content() {
        let help_system = HelpSystem::new();

        let config_help = help_system.format_configuration_help(false);
        let browser_help = help_system.format_browser_help(false);
        let ping_help = help_system.format_ping_help(false);

        // Should contain platform-specific information
        assert!(config_help.contains(&help_system.platform));
        assert!(browser_help.contains(&help_system.platform));
        assert!(ping_help.contains(&help_system.platform));
    }

    #[test]
    fn test_color_formatting_differences() {
        let help_system = HelpSystem::new();

        let colored = help_system.display_main_help(true);
        let plain = help_system.display_main_help(false);

        // Both should contain essential content
        assert!(colored.contains("Internet Speed Monitor"));
        assert!(plain.contains("Internet Speed Monitor"));

        // Plain version should not contain ANSI escape codes
        let plain_has_ansi = plain.contains("\u{1b}[");
        assert!(!plain_has_ansi);

        // Colored version might or might not contain ANSI codes depending on colored crate behavior
        // Just verify that the colored version is either same or longer than plain
        assert!(colored.len() >= plain.len());
    }

    #[test]
    fn test_all_topics_nonempty() {
        let help_system = HelpSystem::new();

        for topic in &["config", "env", "browser", "ping", "weather", "export", "watch", "examples"] {
            let help = help_system.display_topic_help(topic, false);
            assert!(help.is_some(), "topic {} missing", topic);
            assert!(!help.unwrap().is_empty());
        }
    }
}
