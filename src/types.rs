//! Type definitions and aliases

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Speed measurement engines supported by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedEngine {
    /// Scrape a speed-test web page with a headless browser
    Browser,
    /// Measure raw HTTP download throughput directly
    Http,
}

impl SpeedEngine {
    /// Get a human-readable name for this engine
    pub fn name(&self) -> &'static str {
        match self {
            SpeedEngine::Browser => "headless browser",
            SpeedEngine::Http => "HTTP download",
        }
    }
}

impl FromStr for SpeedEngine {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "browser" => Ok(SpeedEngine::Browser),
            "http" => Ok(SpeedEngine::Http),
            other => Err(AppError::config(format!(
                "Unknown speed engine '{}' (expected 'browser' or 'http')",
                other
            ))),
        }
    }
}

impl fmt::Display for SpeedEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedEngine::Browser => write!(f, "browser"),
            SpeedEngine::Http => write!(f, "http"),
        }
    }
}

/// A speed measurement engine
#[async_trait]
pub trait SpeedProbe: Send + Sync {
    /// Engine identifier used in logs and output
    fn engine(&self) -> SpeedEngine;

    /// Run one measurement. Failures and timeouts come back as samples,
    /// never as errors.
    async fn measure(&self) -> crate::models::SpeedSample;
}

/// Connection quality classification based on download speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedQuality {
    /// Excellent connection (>= 100 Mbps)
    Excellent,
    /// Good connection (25-100 Mbps)
    Good,
    /// Fair connection (5-25 Mbps)
    Fair,
    /// Poor connection (< 5 Mbps)
    Poor,
}

impl SpeedQuality {
    /// Classify connection quality from a download speed in Mbps
    pub fn from_mbps(mbps: f64) -> Self {
        if mbps >= 100.0 {
            Self::Excellent
        } else if mbps >= 25.0 {
            Self::Good
        } else if mbps >= 5.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Execution status of a single measurement phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhaseStatus {
    /// Phase completed and produced a value
    Success,
    /// Phase failed before producing a value
    Failed,
    /// Phase hit its timeout before producing a value
    Timeout,
    /// Phase was disabled by configuration
    Skipped,
}

/// Outcome of a single measurement cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementStatus {
    /// Every enabled phase produced a value
    Complete,
    /// At least one phase produced a value, at least one failed
    Partial,
    /// No phase produced a value
    Failed,
}

impl MeasurementStatus {
    /// Get the status string as written to the journal
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementStatus::Complete => "complete",
            MeasurementStatus::Partial => "partial",
            MeasurementStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for MeasurementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
