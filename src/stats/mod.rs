//! Session-level aggregation of measurement cycles
//!
//! Watch mode folds every finished cycle into a [`SessionStats`]
//! accumulator and prints a [`SessionSummary`] snapshot when the loop
//! ends, so a night of unattended runs condenses into a few lines.

use crate::{models::MeasurementCycle, types::MeasurementStatus};
use serde::Serialize;

/// Accumulates cycle outcomes over one monitoring session
#[derive(Debug, Default)]
pub struct SessionStats {
    /// Cycles where every enabled phase produced a value
    complete: u32,
    /// Cycles where some phases produced a value and some failed
    partial: u32,
    /// Cycles where no phase produced a value
    failed: u32,
    /// Numeric download speeds observed, in Mbps
    speeds_mbps: Vec<f64>,
    /// Average ping per cycle, in milliseconds
    pings_ms: Vec<f64>,
}

/// Spread of download speeds over a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedAggregate {
    pub min_mbps: f64,
    pub avg_mbps: f64,
    pub max_mbps: f64,
}

/// Snapshot of session statistics for the end-of-watch summary
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Total cycles run
    pub cycles: u32,

    /// Fully successful cycles
    pub complete: u32,

    /// Cycles with mixed phase outcomes
    pub partial: u32,

    /// Cycles where nothing was measured
    pub failed: u32,

    /// Percentage of cycles that completed fully (0.0-100.0)
    pub success_rate: f64,

    /// Download speed spread, when at least one cycle measured a speed
    pub speed: Option<SpeedAggregate>,

    /// Mean of the per-cycle ping averages, when any cycle measured one
    pub avg_ping_ms: Option<f64>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished cycle into the running aggregates
    pub fn record(&mut self, cycle: &MeasurementCycle) {
        match cycle.status() {
            MeasurementStatus::Complete => self.complete += 1,
            MeasurementStatus::Partial => self.partial += 1,
            MeasurementStatus::Failed => self.failed += 1,
        }

        if let Some(mbps) = cycle.speed.mbps {
            self.speeds_mbps.push(mbps);
        }
        if let Some(avg_ms) = cycle.ping.avg_ms {
            self.pings_ms.push(avg_ms);
        }
    }

    /// Total number of cycles recorded so far
    pub fn cycles(&self) -> u32 {
        self.complete + self.partial + self.failed
    }

    /// Check if any cycle has been recorded
    pub fn is_empty(&self) -> bool {
        self.cycles() == 0
    }

    /// Snapshot the aggregates for display
    pub fn summary(&self) -> SessionSummary {
        let cycles = self.cycles();
        let success_rate = if cycles > 0 {
            (self.complete as f64 / cycles as f64) * 100.0
        } else {
            0.0
        };

        let speed = if self.speeds_mbps.is_empty() {
            None
        } else {
            let min_mbps = self
                .speeds_mbps
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            let max_mbps = self
                .speeds_mbps
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let avg_mbps = self.speeds_mbps.iter().sum::<f64>() / self.speeds_mbps.len() as f64;
            Some(SpeedAggregate {
                min_mbps,
                avg_mbps,
                max_mbps,
            })
        };

        let avg_ping_ms = if self.pings_ms.is_empty() {
            None
        } else {
            Some(self.pings_ms.iter().sum::<f64>() / self.pings_ms.len() as f64)
        };

        SessionSummary {
            cycles,
            complete: self.complete,
            partial: self.partial,
            failed: self.failed,
            success_rate,
            speed,
            avg_ping_ms,
        }
    }
}
