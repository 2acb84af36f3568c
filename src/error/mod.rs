//! Error handling for the internet speed monitor

use thiserror::Error;

/// Custom error types for the internet speed monitor
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Headless browser launch or protocol errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// Speed page scraping errors
    #[error("Scrape error: {0}")]
    Scrape(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// ICMP ping execution or parsing errors
    #[error("Ping error: {0}")]
    Ping(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(String),

    /// Weather or geolocation lookup errors
    #[error("Weather error: {0}")]
    Weather(String),

    /// Measurement journal read/write errors
    #[error("Journal error: {0}")]
    Journal(String),

    /// Parsing errors (URLs, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new browser error
    pub fn browser<S: Into<String>>(message: S) -> Self {
        Self::Browser(message.into())
    }

    /// Create a new scrape error
    pub fn scrape<S: Into<String>>(message: S) -> Self {
        Self::Scrape(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new ping error
    pub fn ping<S: Into<String>>(message: S) -> Self {
        Self::Ping(message.into())
    }

    /// Create a new HTTP request error
    pub fn http_request<S: Into<String>>(message: S) -> Self {
        Self::HttpRequest(message.into())
    }

    /// Create a new weather error
    pub fn weather<S: Into<String>>(message: S) -> Self {
        Self::Weather(message.into())
    }

    /// Create a new journal error
    pub fn journal<S: Into<String>>(message: S) -> Self {
        Self::Journal(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Browser(_) => "BROWSER",
            Self::Scrape(_) => "SCRAPE",
            Self::Timeout(_) => "TIMEOUT",
            Self::Ping(_) => "PING",
            Self::HttpRequest(_) => "HTTP",
            Self::Weather(_) => "WEATHER",
            Self::Journal(_) => "JOURNAL",
            Self::Parse(_) => "PARSE",
            Self::Validation(_) => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if error is recoverable (can retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Scrape(_) | Self::Timeout(_) | Self::Ping(_) | Self::HttpRequest(_) | Self::Weather(_) => true,
            Self::Config(_) | Self::Browser(_) | Self::Validation(_) | Self::Parse(_) => false,
            Self::Journal(_) | Self::Io(_) | Self::Internal(_) => false,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::Browser(msg) => {
                format!("Browser problem: {}\n\nSuggestion: Install Google Chrome or Chromium, or point BROWSER_PATH at an existing installation.", msg)
            }
            Self::Scrape(msg) => {
                format!("Speed page scrape failed: {}\n\nSuggestion: The page layout may have changed. Check --selector, or switch to the direct download engine with --engine http.", msg)
            }
            Self::Timeout(msg) => {
                format!("Operation timed out: {}\n\nSuggestion: Increase the timeout value using --timeout or check your network connection.", msg)
            }
            Self::Ping(msg) => {
                format!("Ping measurement failed: {}\n\nSuggestion: Make sure the system ping utility is available and the host is reachable, or skip it with --skip-ping.", msg)
            }
            Self::HttpRequest(msg) => {
                format!("HTTP request failed: {}\n\nSuggestion: The target server may be down or blocking requests. Try a different URL.", msg)
            }
            Self::Weather(msg) => {
                format!("Weather lookup failed: {}\n\nSuggestion: Check your WEATHER_API_KEY and network connection. Weather is optional and off by default.", msg)
            }
            Self::Journal(msg) => {
                format!("Journal operation failed: {}\n\nSuggestion: Check file permissions and disk space for the journal file, or disable journaling with --no-journal.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check the format of your input data or configuration files.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Check the format of your URLs, hosts, or other configuration values.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and disk space.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,  // Invalid configuration/usage
            Self::Ping(_) | Self::HttpRequest(_) | Self::Weather(_) => 2,  // Network issues
            Self::Timeout(_) => 3,  // Timeout issues
            Self::Browser(_) | Self::Scrape(_) => 4,  // Browser engine issues
            Self::Journal(_) | Self::Io(_) => 5,  // I/O issues
            Self::Internal(_) => 99,  // Internal/unexpected errors
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Ping(_) | Self::HttpRequest(_) | Self::Weather(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Timeout(_) => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::Browser(_) | Self::Scrape(_) => {
                    format!("[{}] {}", category.magenta().bold(), message.magenta())
                }
                Self::Journal(_) | Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else {
            Self::http_request(error.to_string())
        }
    }
}

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(error: chromiumoxide::error::CdpError) -> Self {
        Self::browser(error.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        Self::io(format!("CSV error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("Float parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let original_error = e.into();
            let context = f();
            AppError::internal(format!("{}: {}", context, original_error))
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Helper function to create context for errors
pub fn context<T>(message: &'static str) -> impl Fn(AppError) -> AppError {
    let msg = message.to_string();
    move |error| AppError::internal(format!("{}: {}", msg, error))
}

/// Error reporter for structured error logging and user feedback
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", error.format_for_console(self.use_color));

        if self.verbose {
            eprintln!();
            eprintln!("{}", error.user_friendly_message());

            if error.is_recoverable() {
                eprintln!();
                if self.use_color {
                    use colored::Colorize;
                    eprintln!("{}", "This error might be temporary. You can try running the command again.".green());
                } else {
                    eprintln!("This error might be temporary. You can try running the command again.");
                }
            }
        }
    }

    /// Report multiple errors
    pub fn report_errors(&self, errors: &[AppError]) {
        for (i, error) in errors.iter().enumerate() {
            if i > 0 {
                eprintln!();
            }
            self.report_error(error);
        }
    }

    /// Get formatted error summary
    pub fn format_error_summary(&self, errors: &[AppError]) -> String {
        if errors.is_empty() {
            return "No errors".to_string();
        }

        let mut summary = format!("Found {} error(s):", errors.len());

        // Group errors by category
        let mut error_groups: std::collections::HashMap<&'static str, Vec<&AppError>> = std::collections::HashMap::new();
        for error in errors {
            error_groups.entry(error.category()).or_default().push(error);
        }

        for (category, group_errors) in error_groups {
            summary.push_str(&format!("\n  {}: {} error(s)", category, group_errors.len()));
            if self.verbose {
                for error in group_errors {
                    summary.push_str(&format!("\n    - {}", error));
                }
            }
        }

        summary
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}
