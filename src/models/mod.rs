//! Data models and structures for internet speed monitoring

pub mod config;
pub mod record;

// Re-export main model types
pub use config::Config;
pub use record::{MeasurementCycle, MeasurementRecord, PingSample, SpeedSample, WeatherSnapshot};
