//! Measurement samples, cycles and journal record data models

use crate::types::{MeasurementStatus, PhaseStatus, SpeedEngine, SpeedQuality};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of a single download speed measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedSample {
    /// Parsed speed in megabits per second, when the reading was numeric
    pub mbps: Option<f64>,

    /// Value exactly as read from the page (or formatted by the HTTP engine)
    pub display: Option<String>,

    /// Unit string accompanying the value, e.g. "Mbps"
    pub unit: Option<String>,

    /// Engine that produced this sample
    pub engine: SpeedEngine,

    /// Number of DOM polls performed before the value stabilized
    pub polls: u32,

    /// How long the measurement took
    pub duration: Duration,

    /// Phase execution status
    pub status: PhaseStatus,

    /// Timestamp when the measurement finished
    pub timestamp: DateTime<Utc>,

    /// Error message if the measurement failed
    pub error_message: Option<String>,
}

impl SpeedSample {
    /// Create a successful speed sample
    pub fn success(
        engine: SpeedEngine,
        mbps: Option<f64>,
        display: String,
        unit: Option<String>,
        polls: u32,
        duration: Duration,
    ) -> Self {
        Self {
            mbps,
            display: Some(display),
            unit,
            engine,
            polls,
            duration,
            status: PhaseStatus::Success,
            timestamp: Utc::now(),
            error_message: None,
        }
    }

    /// Create a failed speed sample
    pub fn failed(engine: SpeedEngine, error_message: String) -> Self {
        Self {
            mbps: None,
            display: None,
            unit: None,
            engine,
            polls: 0,
            duration: Duration::ZERO,
            status: PhaseStatus::Failed,
            timestamp: Utc::now(),
            error_message: Some(error_message),
        }
    }

    /// Create a timed-out speed sample
    pub fn timeout(engine: SpeedEngine, timeout_duration: Duration) -> Self {
        Self {
            mbps: None,
            display: None,
            unit: None,
            engine,
            polls: 0,
            duration: timeout_duration,
            status: PhaseStatus::Timeout,
            timestamp: Utc::now(),
            error_message: Some(format!(
                "Speed measurement timed out after {}s",
                timeout_duration.as_secs()
            )),
        }
    }

    /// Create a skipped speed sample
    pub fn skipped(engine: SpeedEngine, reason: String) -> Self {
        Self {
            mbps: None,
            display: None,
            unit: None,
            engine,
            polls: 0,
            duration: Duration::ZERO,
            status: PhaseStatus::Skipped,
            timestamp: Utc::now(),
            error_message: Some(reason),
        }
    }

    /// Check if this measurement produced a value
    pub fn is_successful(&self) -> bool {
        matches!(self.status, PhaseStatus::Success) && self.display.is_some()
    }

    /// Check if this phase was disabled by configuration
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, PhaseStatus::Skipped)
    }

    /// Value and unit joined the way the journal stores them, e.g. "48.3 Mbps"
    pub fn label(&self) -> Option<String> {
        match (&self.display, &self.unit) {
            (Some(display), Some(unit)) => Some(format!("{} {}", display, unit)),
            (Some(display), None) => Some(display.clone()),
            _ => None,
        }
    }

    /// Connection quality classification, when the reading was numeric
    pub fn quality(&self) -> Option<SpeedQuality> {
        self.mbps.map(SpeedQuality::from_mbps)
    }

    /// Measurement duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Result of a single ICMP ping statistics run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingSample {
    /// Host that was pinged
    pub host: String,

    /// Average round-trip time exactly as printed by the ping summary
    pub avg_display: Option<String>,

    /// Average round-trip time in milliseconds
    pub avg_ms: Option<f64>,

    /// Fastest individual reply in milliseconds
    pub min_ms: Option<f64>,

    /// Slowest individual reply in milliseconds
    pub max_ms: Option<f64>,

    /// Jitter in milliseconds (slowest reply minus fastest reply)
    pub jitter_ms: Option<f64>,

    /// Packet loss percentage (0.0-100.0)
    pub packet_loss_pct: Option<f64>,

    /// Number of echo requests sent
    pub transmitted: u32,

    /// Number of echo replies received
    pub received: u32,

    /// How long the ping run took
    pub duration: Duration,

    /// Phase execution status
    pub status: PhaseStatus,

    /// Timestamp when the run finished
    pub timestamp: DateTime<Utc>,

    /// Error message if the run failed
    pub error_message: Option<String>,
}

impl PingSample {
    /// Create a successful ping sample
    ///
    /// Jitter and packet loss are derived here: jitter is the spread between
    /// the slowest and fastest reply, loss is computed from the sent/received
    /// counters of the summary line.
    pub fn success(
        host: String,
        avg_display: String,
        avg_ms: f64,
        min_ms: f64,
        max_ms: f64,
        transmitted: u32,
        received: u32,
        duration: Duration,
    ) -> Self {
        let packet_loss_pct = if transmitted > 0 {
            100.0 * (1.0 - received as f64 / transmitted as f64)
        } else {
            100.0
        };

        Self {
            host,
            avg_display: Some(avg_display),
            avg_ms: Some(avg_ms),
            min_ms: Some(min_ms),
            max_ms: Some(max_ms),
            jitter_ms: Some(max_ms - min_ms),
            packet_loss_pct: Some(packet_loss_pct),
            transmitted,
            received,
            duration,
            status: PhaseStatus::Success,
            timestamp: Utc::now(),
            error_message: None,
        }
    }

    /// Create a failed ping sample
    pub fn failed(host: String, error_message: String) -> Self {
        Self {
            host,
            avg_display: None,
            avg_ms: None,
            min_ms: None,
            max_ms: None,
            jitter_ms: None,
            packet_loss_pct: None,
            transmitted: 0,
            received: 0,
            duration: Duration::ZERO,
            status: PhaseStatus::Failed,
            timestamp: Utc::now(),
            error_message: Some(error_message),
        }
    }

    /// Create a timed-out ping sample
    pub fn timeout(host: String, timeout_duration: Duration) -> Self {
        Self {
            host,
            avg_display: None,
            avg_ms: None,
            min_ms: None,
            max_ms: None,
            jitter_ms: None,
            packet_loss_pct: None,
            transmitted: 0,
            received: 0,
            duration: timeout_duration,
            status: PhaseStatus::Timeout,
            timestamp: Utc::now(),
            error_message: Some(format!(
                "Ping run timed out after {}s",
                timeout_duration.as_secs()
            )),
        }
    }

    /// Create a skipped ping sample
    pub fn skipped(host: String, reason: String) -> Self {
        Self {
            host,
            avg_display: None,
            avg_ms: None,
            min_ms: None,
            max_ms: None,
            jitter_ms: None,
            packet_loss_pct: None,
            transmitted: 0,
            received: 0,
            duration: Duration::ZERO,
            status: PhaseStatus::Skipped,
            timestamp: Utc::now(),
            error_message: Some(reason),
        }
    }

    /// Check if this run produced a value
    pub fn is_successful(&self) -> bool {
        matches!(self.status, PhaseStatus::Success) && self.avg_display.is_some()
    }

    /// Check if this phase was disabled by configuration
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, PhaseStatus::Skipped)
    }

    /// Average latency the way the journal stores it, e.g. "23.410 ms"
    pub fn label(&self) -> Option<String> {
        self.avg_display.as_ref().map(|avg| format!("{} ms", avg))
    }

    /// Run duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Local weather conditions at measurement time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// City the IP geolocated to
    pub city: String,

    /// Two-letter country code
    pub country: String,

    /// Temperature in degrees Celsius
    pub temperature_c: f64,

    /// Short weather description, e.g. "scattered clouds"
    pub description: String,

    /// Relative humidity percentage
    pub humidity_pct: u8,

    /// Wind speed in meters per second
    pub wind_speed_ms: f64,

    /// When the snapshot was fetched
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// One-line summary for console display
    pub fn summary(&self) -> String {
        format!(
            "{:.1}°C, {} in {}, {}",
            self.temperature_c, self.description, self.city, self.country
        )
    }
}

/// One line of the measurement journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// When the record was appended
    pub timestamp: DateTime<Utc>,

    /// Download speed with unit, e.g. "48.3 Mbps", or null when unavailable
    pub speed: Option<String>,

    /// Average ping with unit, e.g. "23.410 ms", or null when unavailable
    pub ping: Option<String>,

    /// Cycle outcome
    pub status: MeasurementStatus,
}

/// Results of one full measurement cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementCycle {
    /// Cycle index within the session (1-based)
    pub run: u32,

    /// Download speed phase result
    pub speed: SpeedSample,

    /// Ping phase result
    pub ping: PingSample,

    /// Weather conditions, when lookup was enabled and succeeded
    pub weather: Option<WeatherSnapshot>,

    /// When the cycle started
    pub started_at: DateTime<Utc>,

    /// When the cycle completed
    pub completed_at: DateTime<Utc>,
}

impl MeasurementCycle {
    /// Create a completed cycle from its phase results
    pub fn new(
        run: u32,
        speed: SpeedSample,
        ping: PingSample,
        weather: Option<WeatherSnapshot>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run,
            speed,
            ping,
            weather,
            started_at,
            completed_at: Utc::now(),
        }
    }

    /// Derive the cycle outcome from the speed and ping phases
    ///
    /// Skipped phases do not count either way; weather does not participate.
    pub fn status(&self) -> MeasurementStatus {
        let mut enabled = 0u32;
        let mut successful = 0u32;

        for ok in [
            (!self.speed.is_skipped()).then(|| self.speed.is_successful()),
            (!self.ping.is_skipped()).then(|| self.ping.is_successful()),
        ]
        .into_iter()
        .flatten()
        {
            enabled += 1;
            if ok {
                successful += 1;
            }
        }

        if enabled == 0 || successful == 0 {
            MeasurementStatus::Failed
        } else if successful == enabled {
            MeasurementStatus::Complete
        } else {
            MeasurementStatus::Partial
        }
    }

    /// Build the journal record for this cycle
    ///
    /// The record timestamp is assigned here, at append time.
    pub fn to_record(&self) -> MeasurementRecord {
        MeasurementRecord {
            timestamp: Utc::now(),
            speed: self.speed.label(),
            ping: self.ping.label(),
            status: self.status(),
        }
    }

    /// Wall-clock duration of the cycle
    pub fn duration(&self) -> Duration {
        (self.completed_at - self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Check if any enabled phase failed
    pub fn has_failures(&self) -> bool {
        !matches!(self.status(), MeasurementStatus::Complete)
    }
}
