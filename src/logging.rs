//! Structured logging system for the internet speed monitor
//!
//! This module provides comprehensive logging functionality including:
//! - Structured logging with multiple levels and contexts
//! - Debug mode detailed tracing
//! - Performance timing logging for measurement cycles
//! - Error event logging with correlation IDs
//! - JSON structured output for integration with log aggregators

use crate::error::{AppError, Result};
use crate::models::{Config, MeasurementCycle, PingSample, SpeedSample};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events but application can continue
    Error = 4,
    /// Fatal level - severe error events that cause application termination
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",    // White
            LogLevel::Debug => "\x1b[36m",    // Cyan
            LogLevel::Info => "\x1b[32m",     // Green
            LogLevel::Warn => "\x1b[33m",     // Yellow
            LogLevel::Error => "\x1b[31m",    // Red
            LogLevel::Fatal => "\x1b[35m",    // Magenta
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
    /// Thread ID if available
    pub thread_id: Option<String>,
    /// File and line information
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    /// Source file name
    pub file: String,
    /// Line number
    pub line: u32,
    /// Module path
    pub module: Option<String>,
}

/// Logger implementation with multiple output formats
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Whether to include location information
    include_location: bool,
    /// Route every entry to stderr regardless of level
    stderr_only: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
    /// Shared context storage
    context: Arc<RwLock<LogContext>>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

/// Shared logging context for correlation and session tracking
#[derive(Debug, Default)]
struct LogContext {
    /// Global correlation ID for the session
    session_id: Option<String>,
    /// Current operation correlation ID
    current_correlation_id: Option<String>,
    /// Additional context fields
    context_fields: HashMap<String, serde_json::Value>,
}

/// Performance timing logger for detailed execution tracking
pub struct PerformanceLogger {
    logger: Logger,
    start_times: HashMap<String, DateTime<Utc>>,
    operation_stack: Vec<String>,
}

/// Specialized logger for network operations
pub struct NetworkLogger {
    logger: Logger,
}

/// Error event logger with enhanced context
pub struct ErrorEventLogger {
    logger: Logger,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            include_location: false,
            stderr_only: false,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with specific configuration
    ///
    /// When JSON result output is enabled, every entry goes to stderr so
    /// stdout carries nothing but the result document.
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            include_location: config.debug,
            stderr_only: config.json_output,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Set output format
    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    /// Enable or disable colored output
    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key, json_value);
        }
    }

    /// Start a correlated operation
    pub async fn start_operation(&self, operation_name: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        {
            let mut context = self.context.write().await;
            context.current_correlation_id = Some(correlation_id.clone());
        }

        self.info(&format!("Started operation: {}", operation_name))
            .correlation_id(&correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "start")
            .log()
            .await;

        correlation_id
    }

    /// End a correlated operation
    pub async fn end_operation(&self, correlation_id: &str, operation_name: &str, success: bool) {
        self.info(&format!("Completed operation: {} (success: {})", operation_name, success))
            .correlation_id(correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "end")
            .field("success", success)
            .log()
            .await;

        // Clear current correlation ID if it matches
        let mut context = self.context.write().await;
        if context.current_correlation_id.as_ref() == Some(&correlation_id.to_string()) {
            context.current_correlation_id = None;
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    /// Convenience methods for different log levels
    pub fn trace(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Fatal, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Write log entry to output
    async fn write_entry(&self, mut entry: LogEntry) {
        // Don't output if below minimum level
        if entry.level < self.min_level {
            return;
        }

        // Add context fields
        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }

        for (key, value) in &context.context_fields {
            entry.fields.insert(key.clone(), value.clone());
        }
        drop(context);

        // Format and write the entry
        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
            LogFormat::Compact => self.format_compact(&entry),
        };

        // Write to stderr for errors/warnings (or always in stderr-only mode),
        // stdout for others
        if self.stderr_only || entry.level >= LogLevel::Warn {
            let _ = writeln!(io::stderr(), "{}", output);
        } else {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}",
            timestamp,
            formatted_level,
            entry.logger,
            entry.message
        );

        // Add correlation ID if present
        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect(); // Show first 8 chars
            output.push_str(&format!(" [{}]", short));
        }

        // Add fields if any
        if !entry.fields.is_empty() {
            let fields_str: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        // Add location if available and enabled
        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }

    /// Format log entry in compact format
    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!("{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
                thread_id: std::thread::current().name().map(String::from),
                location: None,
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add location information
    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Add speed sample information
    pub fn speed(self, sample: &SpeedSample) -> Self {
        self.field("engine", sample.engine.to_string())
            .field("mbps", sample.mbps)
            .field("display", &sample.display)
            .field("polls", sample.polls)
            .field("duration_ms", sample.duration_ms())
            .field("success", sample.is_successful())
    }

    /// Add ping sample information
    pub fn ping(self, sample: &PingSample) -> Self {
        self.field("host", &sample.host)
            .field("avg_ms", sample.avg_ms)
            .field("min_ms", sample.min_ms)
            .field("max_ms", sample.max_ms)
            .field("jitter_ms", sample.jitter_ms)
            .field("packet_loss_pct", sample.packet_loss_pct)
            .field("success", sample.is_successful())
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

impl PerformanceLogger {
    /// Create a new performance logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("PERF".to_string(), config),
            start_times: HashMap::new(),
            operation_stack: Vec::new(),
        }
    }

    /// Start timing an operation
    pub async fn start_timing(&mut self, operation: &str) {
        let start_time = Utc::now();
        self.start_times.insert(operation.to_string(), start_time);
        self.operation_stack.push(operation.to_string());

        self.logger.debug(&format!("Started timing: {}", operation))
            .field("operation", operation)
            .field("start_time", start_time)
            .log()
            .await;
    }

    /// End timing an operation and log the duration
    pub async fn end_timing(&mut self, operation: &str) -> Option<chrono::Duration> {
        if let Some(start_time) = self.start_times.remove(operation) {
            let end_time = Utc::now();
            let duration = end_time - start_time;

            // Remove from operation stack
            if let Some(pos) = self.operation_stack.iter().position(|x| x == operation) {
                self.operation_stack.remove(pos);
            }

            self.logger.info(&format!("Completed timing: {} in {}ms", operation, duration.num_milliseconds()))
                .field("operation", operation)
                .field("start_time", start_time)
                .field("end_time", end_time)
                .field("duration_ms", duration.num_milliseconds())
                .log()
                .await;

            Some(duration)
        } else {
            self.logger.warn(&format!("Attempted to end timing for unknown operation: {}", operation))
                .field("operation", operation)
                .log()
                .await;
            None
        }
    }

    /// Log a completed measurement cycle with per-phase detail
    pub async fn log_cycle(&self, cycle: &MeasurementCycle) {
        self.logger.debug(&format!("Speed phase for cycle {}", cycle.run))
            .field("run", cycle.run)
            .speed(&cycle.speed)
            .log()
            .await;

        self.logger.debug(&format!("Ping phase for cycle {}", cycle.run))
            .field("run", cycle.run)
            .ping(&cycle.ping)
            .log()
            .await;

        self.logger.info(&format!("Cycle {} finished: status={}, speed={}, ping={}",
            cycle.run,
            cycle.status(),
            cycle.speed.label().unwrap_or_else(|| "n/a".to_string()),
            cycle.ping.label().unwrap_or_else(|| "n/a".to_string())))
            .field("run", cycle.run)
            .field("status", cycle.status().as_str())
            .field("duration_ms", cycle.duration().as_secs_f64() * 1000.0)
            .log()
            .await;
    }

    /// Get currently active operations
    pub fn active_operations(&self) -> &[String] {
        &self.operation_stack
    }

    /// Log session summary with aggregate timing information
    pub async fn log_session_summary(
        &self,
        cycle_count: usize,
        complete: usize,
        failed: usize,
        total_duration: std::time::Duration,
    ) {
        let avg_per_cycle = if cycle_count > 0 {
            total_duration.as_secs_f64() / cycle_count as f64
        } else {
            0.0
        };

        let message = format!(
            "Session summary: {} cycles in {:.1}s ({} complete, {} failed, avg {:.1}s per cycle)",
            cycle_count,
            total_duration.as_secs_f64(),
            complete,
            failed,
            avg_per_cycle
        );

        self.logger.info(&message)
            .field("cycle_count", cycle_count)
            .field("complete", complete)
            .field("failed", failed)
            .field("total_duration_seconds", total_duration.as_secs_f64())
            .field("avg_per_cycle_seconds", avg_per_cycle)
            .field("operation_type", "session_summary")
            .log()
            .await;
    }
}

impl NetworkLogger {
    /// Create a new network logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("NET".to_string(), config),
        }
    }

    /// Log a speed test page load attempt
    pub async fn log_page_load(&self, url: &str, success: bool, duration_ms: f64) {
        let level = if success { LogLevel::Debug } else { LogLevel::Warn };
        let message = format!("Page load for {}: {}",
            url, if success { "success" } else { "failed" });

        self.logger.log(level, &message)
            .field("url", url)
            .field("success", success)
            .field("duration_ms", duration_ms)
            .log()
            .await;
    }

    /// Log HTTP request
    pub async fn log_http_request(&self, url: &str, method: &str, status_code: Option<u16>, duration_ms: f64) {
        let success = status_code.map_or(false, |code| code >= 200 && code < 400);
        let level = if success { LogLevel::Debug } else { LogLevel::Warn };

        let message = format!("{} {} -> {} in {:.1}ms",
            method, url,
            status_code.map_or("FAILED".to_string(), |c| c.to_string()),
            duration_ms);

        self.logger.log(level, &message)
            .field("url", url)
            .field("method", method)
            .field("status_code", status_code)
            .field("success", success)
            .field("duration_ms", duration_ms)
            .log()
            .await;
    }

    /// Log a ping run
    pub async fn log_ping(&self, sample: &PingSample) {
        let level = if sample.is_successful() { LogLevel::Debug } else { LogLevel::Warn };
        let message = match (&sample.avg_display, &sample.error_message) {
            (Some(avg), _) => format!("Ping {}: avg {} ms over {} replies",
                sample.host, avg, sample.received),
            (None, Some(err)) => format!("Ping {} failed: {}", sample.host, err),
            (None, None) => format!("Ping {} produced no statistics", sample.host),
        };

        self.logger.log(level, &message)
            .ping(sample)
            .log()
            .await;
    }
}

impl ErrorEventLogger {
    /// Create a new error event logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("ERR".to_string(), config),
        }
    }

    /// Log an application error with full context
    pub async fn log_error(&self, error: &AppError, context: Option<&str>, correlation_id: Option<&str>) {
        let message = if let Some(ctx) = context {
            format!("{}: {}", ctx, error)
        } else {
            error.to_string()
        };

        let mut builder = self.logger.error(&message)
            .error_info(error);

        if let Some(id) = correlation_id {
            builder = builder.correlation_id(id);
        }

        if let Some(ctx) = context {
            builder = builder.field("context", ctx);
        }

        builder.log().await;
    }
}

/// Global logger factory and management
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    /// Create a new logger factory
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    /// Create a performance logger
    pub fn create_performance_logger(&self) -> PerformanceLogger {
        PerformanceLogger::new(&self.config)
    }

    /// Create a network logger
    pub fn create_network_logger(&self) -> NetworkLogger {
        NetworkLogger::new(&self.config)
    }

    /// Create an error event logger
    pub fn create_error_logger(&self) -> ErrorEventLogger {
        ErrorEventLogger::new(&self.config)
    }

    /// Get session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Convenience macros for logging with location information
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)*) => {
        $logger.trace(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PhaseStatus, SpeedEngine};
    use std::str::FromStr;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_log_level_strings() {
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Warn.as_str(), "WARN");
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
        assert_eq!(LogLevel::Fatal.as_str(), "FATAL");
    }

    #[tokio::test]
    async fn test_logger_creation() {
        let logger = Logger::new("TEST".to_string());
        assert_eq!(logger.name, "TEST");
        assert_eq!(logger.min_level, LogLevel::Info);
        assert!(logger.use_color);
    }

    #[tokio::test]
    async fn test_logger_with_config() {
        let config = Config {
            debug: true,
            verbose: true,
            enable_color: false,
            ..Default::default()
        };

        let logger = Logger::with_config("TEST".to_string(), &config);
        assert_eq!(logger.min_level, LogLevel::Debug);
        assert!(!logger.use_color);
        assert!(logger.include_location);
    }

    #[tokio::test]
    async fn test_json_output_routes_to_stderr() {
        let config = Config {
            json_output: true,
            ..Default::default()
        };

        let logger = Logger::with_config("TEST".to_string(), &config);
        assert!(logger.stderr_only);
    }

    #[tokio::test]
    async fn test_session_id_management() {
        let logger = Logger::new("TEST".to_string());
        logger.set_session_id("test-session".to_string()).await;

        let context = logger.context.read().await;
        assert_eq!(context.session_id.as_ref().unwrap(), "test-session");
    }

    #[tokio::test]
    async fn test_context_fields() {
        let logger = Logger::new("TEST".to_string());
        logger.add_context_field("test_key".to_string(), "test_value").await;

        let context = logger.context.read().await;
        assert!(context.context_fields.contains_key("test_key"));
    }

    #[tokio::test]
    async fn test_operation_correlation() {
        let logger = Logger::new("TEST".to_string());
        let correlation_id = logger.start_operation("test_operation").await;

        assert!(!correlation_id.is_empty());

        logger.end_operation(&correlation_id, "test_operation", true).await;
    }

    #[tokio::test]
    async fn test_would_log() {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_level(LogLevel::Warn);

        assert!(!logger.would_log(LogLevel::Debug));
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));
        assert!(logger.would_log(LogLevel::Error));
        assert!(logger.would_log(LogLevel::Fatal));
    }

    #[tokio::test]
    async fn test_log_entry_builder() {
        let logger = Logger::new("TEST".to_string());

        // Test that the builder pattern works without panicking
        logger.info("test message")
            .correlation_id("test-id")
            .field("test_field", "test_value")
            .location("test.rs", 123, Some("test::module"))
            .log()
            .await;
    }

    #[test]
    fn test_performance_logger_creation() {
        let config = Config::default();
        let perf_logger = PerformanceLogger::new(&config);
        assert_eq!(perf_logger.logger.name, "PERF");
    }

    #[test]
    fn test_network_logger_creation() {
        let config = Config::default();
        let net_logger = NetworkLogger::new(&config);
        assert_eq!(net_logger.logger.name, "NET");
    }

    #[test]
    fn test_error_logger_creation() {
        let config = Config::default();
        let err_logger = ErrorEventLogger::new(&config);
        assert_eq!(err_logger.logger.name, "ERR");
    }

    #[tokio::test]
    async fn test_logger_factory() {
        let config = Config::default();
        let factory = LoggerFactory::new(config);

        let logger = factory.create_logger("TEST").await;
        assert_eq!(logger.name, "TEST");

        let session_id = factory.session_id();
        assert!(!session_id.is_empty());
    }

    #[tokio::test]
    async fn test_performance_timing() {
        let config = Config::default();
        let mut perf_logger = PerformanceLogger::new(&config);

        perf_logger.start_timing("test_operation").await;

        // Simulate some work
        tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;

        let duration = perf_logger.end_timing("test_operation").await;
        assert!(duration.is_some());
        assert!(duration.unwrap().num_milliseconds() >= 0);

        // Test ending unknown operation
        let unknown_duration = perf_logger.end_timing("unknown_operation").await;
        assert!(unknown_duration.is_none());
    }

    #[test]
    fn test_log_formats() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            message: "Test message".to_string(),
            logger: "TEST".to_string(),
            correlation_id: Some("test-id-12345".to_string()),
            fields: {
                let mut map = HashMap::new();
                map.insert("key".to_string(), serde_json::Value::String("value".to_string()));
                map
            },
            thread_id: None,
            location: None,
        };

        let logger = Logger::new("TEST".to_string());

        // Test console format
        let console_output = logger.format_console(&entry);
        assert!(console_output.contains("INFO"));
        assert!(console_output.contains("Test message"));
        assert!(console_output.contains("test-id-"));

        // Test JSON format
        let json_output = logger.format_json(&entry);
        assert!(json_output.starts_with('{'));
        assert!(json_output.ends_with('}'));

        // Test compact format
        let compact_output = logger.format_compact(&entry);
        assert!(compact_output.contains('I')); // First character of INFO
        assert!(compact_output.contains("Test message"));
    }

    #[tokio::test]
    async fn test_speed_sample_logging() {
        use std::time::Duration;

        let config = Config::default();
        let perf_logger = PerformanceLogger::new(&config);

        let sample = SpeedSample::success(
            SpeedEngine::Browser,
            Some(87.2),
            "87.2".to_string(),
            Some("Mbps".to_string()),
            9,
            Duration::from_secs(14),
        );

        // Test that speed information can be logged
        perf_logger.logger.info("Test speed")
            .speed(&sample)
            .log()
            .await;
    }

    #[tokio::test]
    async fn test_error_logging() {
        let config = Config::default();
        let err_logger = ErrorEventLogger::new(&config);
        let error = AppError::scrape("Test scrape error");

        err_logger.log_error(&error, Some("During measurement cycle"), Some("test-correlation")).await;
    }

    #[tokio::test]
    async fn test_network_logging() {
        use std::time::Duration;

        let config = Config::default();
        let net_logger = NetworkLogger::new(&config);

        // Test page load logging
        net_logger.log_page_load("https://fast.com/", true, 1250.0).await;
        net_logger.log_page_load("https://invalid.example/", false, 5000.0).await;

        // Test HTTP request logging
        net_logger.log_http_request("https://example.com", "GET", Some(200), 150.0).await;
        net_logger.log_http_request("https://invalid.com", "GET", None, 10000.0).await;

        // Test ping logging
        let success = PingSample::success(
            "8.8.8.8".to_string(),
            "21.5".to_string(),
            21.5,
            18.0,
            27.0,
            10,
            10,
            Duration::from_secs(10),
        );
        net_logger.log_ping(&success).await;

        let failure = PingSample::failed("10.255.255.1".to_string(), "100% packet loss".to_string());
        assert_eq!(failure.status, PhaseStatus::Failed);
        net_logger.log_ping(&failure).await;
    }

    #[test]
    fn test_log_location() {
        let location = LogLocation {
            file: "test.rs".to_string(),
            line: 42,
            module: Some("test::module".to_string()),
        };

        assert_eq!(location.file, "test.rs");
        assert_eq!(location.line, 42);
        assert_eq!(location.module.as_ref().unwrap(), "test::module");
    }

    #[test]
    fn test_log_entry_serialization() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            message: "Test".to_string(),
            logger: "TEST".to_string(),
            correlation_id: None,
            fields: HashMap::new(),
            thread_id: None,
            location: None,
        };

        // Test that log entry can be serialized/deserialized
        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: LogEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.level, LogLevel::Info);
        assert_eq!(deserialized.message, "Test");
        assert_eq!(deserialized.logger, "TEST");
    }
}
