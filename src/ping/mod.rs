//! ICMP latency statistics via the system ping utility
//!
//! Shells out to the platform ping binary and parses its output. The
//! average round-trip time is kept exactly as the summary line printed
//! it; jitter is the spread between the slowest and fastest timed reply.

pub mod platform;

use crate::{
    error::{AppError, Result},
    log_debug, log_warn,
    logging::Logger,
    models::{Config, PingSample},
};
use once_cell::sync::Lazy;
use platform::PlatformPingCommand;
use regex::Regex;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Per-reply wait passed to ping on platforms that support it
const REPLY_WAIT: Duration = Duration::from_secs(2);

/// Individual reply timings: "time=23.4 ms", "time=23ms", "time<1ms"
static REPLY_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"time[=<]([0-9]+(?:\.[0-9]+)?)\s*ms").expect("regex: reply time"));

/// Linux and BSD summary: "rtt min/avg/max/mdev = a/b/c/d ms"
static UNIX_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:rtt|round-trip) min/avg/max/(?:mdev|stddev) = ([0-9.]+)/([0-9.]+)/([0-9.]+)/([0-9.]+)",
    )
    .expect("regex: unix summary")
});

/// Windows summary: "Minimum = 18ms, Maximum = 32ms, Average = 23ms"
static WINDOWS_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Minimum = ([0-9]+)ms, Maximum = ([0-9]+)ms, Average = ([0-9]+)ms")
        .expect("regex: windows summary")
});

/// Linux and BSD counters: "10 packets transmitted, 10 received" /
/// "10 packets transmitted, 10 packets received"
static UNIX_COUNTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+) packets transmitted, ([0-9]+)(?: packets)? received")
        .expect("regex: unix counts")
});

/// Windows counters: "Sent = 10, Received = 10"
static WINDOWS_COUNTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Sent = ([0-9]+), Received = ([0-9]+)").expect("regex: windows counts"));

/// Statistics summary line as parsed from ping output
#[derive(Debug, Clone, PartialEq)]
pub struct PingSummary {
    /// Minimum round-trip time in milliseconds
    pub min_ms: f64,
    /// Average round-trip time in milliseconds
    pub avg_ms: f64,
    /// Maximum round-trip time in milliseconds
    pub max_ms: f64,
    /// Average exactly as the summary printed it, e.g. "23.410"
    pub avg_display: String,
}

/// Everything extractable from one ping run's output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PingOutput {
    /// Round-trip time of each individual reply, in order
    pub reply_times_ms: Vec<f64>,
    /// (transmitted, received) counters from the statistics block
    pub counts: Option<(u32, u32)>,
    /// min/avg/max summary, when the run got far enough to print one
    pub summary: Option<PingSummary>,
}

/// Parse raw ping output into its timed replies, counters and summary
pub fn parse_ping_output(output: &str) -> PingOutput {
    let reply_times_ms = REPLY_TIME
        .captures_iter(output)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .collect();

    let counts = UNIX_COUNTS
        .captures(output)
        .or_else(|| WINDOWS_COUNTS.captures(output))
        .and_then(|caps| {
            let transmitted = caps.get(1)?.as_str().parse().ok()?;
            let received = caps.get(2)?.as_str().parse().ok()?;
            Some((transmitted, received))
        });

    let summary = UNIX_SUMMARY
        .captures(output)
        .and_then(|caps| {
            Some(PingSummary {
                min_ms: caps.get(1)?.as_str().parse().ok()?,
                avg_ms: caps.get(2)?.as_str().parse().ok()?,
                max_ms: caps.get(3)?.as_str().parse().ok()?,
                avg_display: caps.get(2)?.as_str().to_string(),
            })
        })
        .or_else(|| {
            WINDOWS_SUMMARY.captures(output).and_then(|caps| {
                Some(PingSummary {
                    min_ms: caps.get(1)?.as_str().parse().ok()?,
                    max_ms: caps.get(2)?.as_str().parse().ok()?,
                    avg_ms: caps.get(3)?.as_str().parse().ok()?,
                    avg_display: caps.get(3)?.as_str().to_string(),
                })
            })
        });

    PingOutput {
        reply_times_ms,
        counts,
        summary,
    }
}

/// Assemble a ping sample from parsed output
///
/// Timed replies take precedence over the summary for the min/max spread,
/// so jitter reflects the actual individual samples. The average always
/// comes from the summary when one exists.
pub fn sample_from_output(host: &str, parsed: &PingOutput, elapsed: Duration) -> PingSample {
    let times = &parsed.reply_times_ms;

    let (transmitted, received) = match parsed.counts {
        Some(counts) => counts,
        None if !times.is_empty() => (times.len() as u32, times.len() as u32),
        None => {
            return PingSample::failed(
                host.to_string(),
                "Could not parse ping output".to_string(),
            );
        }
    };

    if received == 0 {
        return PingSample::failed(
            host.to_string(),
            format!(
                "No replies received from {} ({} packets sent)",
                host, transmitted
            ),
        );
    }

    let (avg_display, avg_ms) = match &parsed.summary {
        Some(summary) => (summary.avg_display.clone(), summary.avg_ms),
        None if !times.is_empty() => {
            let avg = times.iter().sum::<f64>() / times.len() as f64;
            (format!("{:.3}", avg), avg)
        }
        None => {
            return PingSample::failed(
                host.to_string(),
                format!("Ping output for {} had no timing statistics", host),
            );
        }
    };

    let (min_ms, max_ms) = if times.is_empty() {
        match &parsed.summary {
            Some(summary) => (summary.min_ms, summary.max_ms),
            None => (avg_ms, avg_ms),
        }
    } else {
        let min = times.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = times.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        (min, max)
    };

    PingSample::success(
        host.to_string(),
        avg_display,
        avg_ms,
        min_ms,
        max_ms,
        transmitted,
        received,
        elapsed,
    )
}

/// Runs ping against a single host and turns the output into a sample
pub struct PingRunner {
    host: String,
    count: u32,
    timeout: Duration,
    command: PlatformPingCommand,
    logger: Logger,
}

impl PingRunner {
    /// Create a runner from the application configuration
    pub fn new(config: &Config) -> Self {
        Self {
            host: config.ping_host.clone(),
            count: config.ping_count,
            timeout: config.timeout(),
            command: PlatformPingCommand::for_current_platform(),
            logger: Logger::with_config("ping".to_string(), config),
        }
    }

    /// Host this runner pings
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Run one ping cycle
    ///
    /// Never returns an error: failures and timeouts become failed samples
    /// so the measurement cycle can carry on.
    pub async fn run(&self) -> PingSample {
        let started = Instant::now();

        log_debug!(
            self.logger,
            "Pinging {} with {} echo requests",
            self.host,
            self.count
        );

        match tokio::time::timeout(self.timeout, self.execute()).await {
            Ok(Ok(stdout)) => {
                let parsed = parse_ping_output(&stdout);
                let sample = sample_from_output(&self.host, &parsed, started.elapsed());

                if let Some(ref message) = sample.error_message {
                    log_warn!(self.logger, "Ping against {} failed: {}", self.host, message);
                }

                sample
            }
            Ok(Err(e)) => {
                log_warn!(self.logger, "Ping run failed: {}", e);
                PingSample::failed(self.host.clone(), e.to_string())
            }
            Err(_) => {
                log_warn!(
                    self.logger,
                    "Ping against {} timed out after {}s",
                    self.host,
                    self.timeout.as_secs()
                );
                PingSample::timeout(self.host.clone(), self.timeout)
            }
        }
    }

    /// Spawn the ping binary and collect its output
    async fn execute(&self) -> Result<String> {
        let args = self.command.build_args(&self.host, self.count, REPLY_WAIT);

        let output = Command::new(self.command.binary)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                AppError::ping(format!(
                    "Failed to run '{} {}': {}",
                    self.command.binary,
                    args.join(" "),
                    e
                ))
            })?;

        if !output.status.success() {
            // Exit status 1 usually just means lost packets; the statistics
            // block is still printed and worth parsing.
            log_debug!(self.logger, "ping exited with status {}", output.status);
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
