//! Desktop notifications for completed measurement cycles
//!
//! Delivery is best effort. A missing notification daemon or a rejected
//! show request is logged at debug level and otherwise ignored, so a
//! broken desktop session can never fail a measurement.

use crate::{
    log_debug,
    logging::Logger,
    models::{Config, MeasurementRecord},
};
use notify_rust::Notification;

const NOTIFICATION_TITLE: &str = "Internet Speed Monitor";

/// Sends one desktop notification per measurement cycle
pub struct Notifier {
    enabled: bool,
    logger: Logger,
}

impl Notifier {
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.notify,
            logger: Logger::with_config("notify".to_string(), config),
        }
    }

    /// Show a summary notification for one journal record
    pub async fn notify(&self, record: &MeasurementRecord) {
        if !self.enabled {
            return;
        }

        let body = notification_body(record);
        match Notification::new()
            .summary(NOTIFICATION_TITLE)
            .body(&body)
            .show()
        {
            Ok(_) => log_debug!(self.logger, "Desktop notification sent: {}", body),
            Err(e) => log_debug!(self.logger, "Desktop notification failed: {}", e),
        }
    }
}

/// Build the notification body for a record
///
/// Phases that produced no value show as "n/a" rather than being dropped,
/// so the notification shape stays constant across outcomes.
fn notification_body(record: &MeasurementRecord) -> String {
    let speed = record.speed.as_deref().unwrap_or("n/a");
    let ping = record.ping.as_deref().unwrap_or("n/a");
    format!("Speed: {} · Ping: {}", speed, ping)
}
