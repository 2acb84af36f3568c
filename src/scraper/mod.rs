//! Speed readings scraped from a measurement page
//!
//! Loads the speed-test page in a headless browser and polls the value
//! element until the number it shows stops changing. The page runs its
//! own measurement; all this module does is wait for the result to
//! settle and read it off the DOM.

use crate::{
    browser::BrowserSession,
    error::Result,
    log_debug, log_warn,
    logging::{Logger, NetworkLogger},
    models::{Config, SpeedSample},
    types::{SpeedEngine, SpeedProbe},
};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Scrapes the configured speed-test page with a fresh browser per run.
pub struct PageScraper {
    url: String,
    speed_selector: String,
    unit_selector: String,
    placeholder: String,
    stable_reads: u32,
    poll_interval: Duration,
    timeout: Duration,
    config: Config,
    logger: Logger,
    network: NetworkLogger,
}

/// A settled reading pulled off the page.
struct StableReading {
    display: String,
    unit: Option<String>,
    mbps: Option<f64>,
    polls: u32,
}

impl PageScraper {
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.speed_url.clone(),
            speed_selector: config.speed_selector.clone(),
            unit_selector: config.unit_selector.clone(),
            placeholder: config.placeholder.clone(),
            stable_reads: config.stable_reads,
            poll_interval: config.poll_interval(),
            timeout: config.timeout(),
            config: config.clone(),
            logger: Logger::with_config("scraper".to_string(), config),
            network: NetworkLogger::new(config),
        }
    }

    /// Run one scrape. The browser is closed before this returns, no
    /// matter how the measurement went.
    pub async fn run(&self) -> SpeedSample {
        let started = Instant::now();
        let session = BrowserSession::new(&self.config);

        let outcome = tokio::time::timeout(self.timeout, self.scrape(&session)).await;
        session.shutdown().await;

        let elapsed = started.elapsed();
        match outcome {
            Ok(Ok(reading)) => {
                self.network
                    .log_page_load(&self.url, true, elapsed.as_secs_f64() * 1000.0)
                    .await;
                log_debug!(
                    self.logger,
                    "Page settled on {} after {} polls",
                    reading.display,
                    reading.polls
                );
                SpeedSample::success(
                    SpeedEngine::Browser,
                    reading.mbps,
                    reading.display,
                    reading.unit,
                    reading.polls,
                    elapsed,
                )
            }
            Ok(Err(e)) => {
                self.network
                    .log_page_load(&self.url, false, elapsed.as_secs_f64() * 1000.0)
                    .await;
                log_warn!(self.logger, "Speed scrape failed: {}", e);
                SpeedSample::failed(SpeedEngine::Browser, e.to_string())
            }
            Err(_) => {
                self.network
                    .log_page_load(&self.url, false, elapsed.as_secs_f64() * 1000.0)
                    .await;
                log_warn!(
                    self.logger,
                    "Speed scrape timed out after {}s",
                    self.timeout.as_secs()
                );
                SpeedSample::timeout(SpeedEngine::Browser, self.timeout)
            }
        }
    }

    /// Poll the value element until it settles, then read the unit.
    async fn scrape(&self, session: &BrowserSession) -> Result<StableReading> {
        session.goto(&self.url).await?;

        let mut stabilizer = Stabilizer::new(&self.placeholder, self.stable_reads);
        let mut polls = 0u32;

        let display = loop {
            polls += 1;
            let text = session.element_text(&self.speed_selector).await?;

            if let Some(settled) = stabilizer.observe(text.as_deref()) {
                break settled;
            }

            tokio::time::sleep(self.poll_interval).await;
        };

        // The unit element is page furniture; a page without one still
        // yields a usable reading.
        let unit = session
            .element_text(&self.unit_selector)
            .await
            .ok()
            .flatten();

        let mbps = parse_mbps(&display);
        if mbps.is_none() {
            log_debug!(self.logger, "Reading '{}' is not numeric", display);
        }

        Ok(StableReading {
            display,
            unit,
            mbps,
            polls,
        })
    }

    /// Selector the scraper polls, used in error reporting.
    pub fn selector(&self) -> &str {
        &self.speed_selector
    }
}

#[async_trait]
impl SpeedProbe for PageScraper {
    fn engine(&self) -> SpeedEngine {
        SpeedEngine::Browser
    }

    async fn measure(&self) -> SpeedSample {
        self.run().await
    }
}

/// Tracks consecutive identical readings until the page settles.
///
/// A reading only counts once it differs from the placeholder the page
/// shows while measuring. Any change, or a fall back to the placeholder,
/// restarts the count.
struct Stabilizer {
    placeholder: String,
    required: u32,
    candidate: Option<String>,
    identical: u32,
}

impl Stabilizer {
    fn new(placeholder: &str, required: u32) -> Self {
        Self {
            placeholder: placeholder.to_string(),
            required: required.max(1),
            candidate: None,
            identical: 0,
        }
    }

    /// Feed one poll. Returns the settled value once it has repeated
    /// often enough.
    fn observe(&mut self, text: Option<&str>) -> Option<String> {
        match text {
            Some(value) if value != self.placeholder => {
                if self.candidate.as_deref() == Some(value) {
                    self.identical += 1;
                } else {
                    self.candidate = Some(value.to_string());
                    self.identical = 1;
                }

                if self.identical >= self.required {
                    return self.candidate.clone();
                }
            }
            _ => {
                self.candidate = None;
                self.identical = 0;
            }
        }

        None
    }
}

/// Parse a displayed reading into Mbps, tolerating thousands separators.
fn parse_mbps(display: &str) -> Option<f64> {
    display
        .parse::<f64>()
        .ok()
        .or_else(|| display.replace(',', "").parse::<f64>().ok())
        .filter(|mbps| mbps.is_finite() && *mbps >= 0.0)
}

/// Build the probe matching the configured engine.
pub fn probe_for(config: &Config) -> Box<dyn SpeedProbe> {
    match config.engine {
        SpeedEngine::Browser => Box::new(PageScraper::new(config)),
        SpeedEngine::Http => Box::new(crate::throughput::ThroughputProbe::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stabilizer_waits_for_placeholder_to_clear() {
        let mut stabilizer = Stabilizer::new("0", 3);
        assert_eq!(stabilizer.observe(Some("0")), None);
        assert_eq!(stabilizer.observe(Some("0")), None);
        assert_eq!(stabilizer.observe(Some("0")), None);
        assert_eq!(stabilizer.observe(Some("0")), None);
    }

    #[test]
    fn test_stabilizer_settles_after_required_identical_reads() {
        let mut stabilizer = Stabilizer::new("0", 3);
        assert_eq!(stabilizer.observe(Some("12.1")), None);
        assert_eq!(stabilizer.observe(Some("48.3")), None);
        assert_eq!(stabilizer.observe(Some("48.3")), None);
        assert_eq!(
            stabilizer.observe(Some("48.3")),
            Some("48.3".to_string())
        );
    }

    #[test]
    fn test_stabilizer_resets_on_changed_value() {
        let mut stabilizer = Stabilizer::new("0", 2);
        assert_eq!(stabilizer.observe(Some("10")), None);
        assert_eq!(stabilizer.observe(Some("20")), None);
        assert_eq!(stabilizer.observe(Some("20")), Some("20".to_string()));
    }

    #[test]
    fn test_stabilizer_resets_when_page_flickers_to_placeholder() {
        let mut stabilizer = Stabilizer::new("0", 2);
        assert_eq!(stabilizer.observe(Some("48.3")), None);
        assert_eq!(stabilizer.observe(Some("0")), None);
        assert_eq!(stabilizer.observe(Some("48.3")), None);
        assert_eq!(
            stabilizer.observe(Some("48.3")),
            Some("48.3".to_string())
        );
    }

    #[test]
    fn test_stabilizer_ignores_missing_element() {
        let mut stabilizer = Stabilizer::new("0", 2);
        assert_eq!(stabilizer.observe(None), None);
        assert_eq!(stabilizer.observe(Some("30")), None);
        assert_eq!(stabilizer.observe(None), None);
        assert_eq!(stabilizer.observe(Some("30")), None);
        assert_eq!(stabilizer.observe(Some("30")), None);
        assert_eq!(stabilizer.observe(Some("30")), Some("30".to_string()));
    }

    #[test]
    fn test_stabilizer_single_read_accepts_first_value() {
        let mut stabilizer = Stabilizer::new("0", 1);
        assert_eq!(stabilizer.observe(Some("99.9")), Some("99.9".to_string()));
    }

    #[test]
    fn test_stabilizer_required_floor_is_one() {
        let mut stabilizer = Stabilizer::new("0", 0);
        assert_eq!(stabilizer.observe(Some("5")), Some("5".to_string()));
    }

    #[test]
    fn test_empty_placeholder_accepts_first_reading_stream() {
        let mut stabilizer = Stabilizer::new("", 2);
        assert_eq!(stabilizer.observe(Some("7.2")), None);
        assert_eq!(stabilizer.observe(Some("7.2")), Some("7.2".to_string()));
    }

    #[test]
    fn test_parse_mbps_plain_number() {
        assert_eq!(parse_mbps("48.3"), Some(48.3));
        assert_eq!(parse_mbps("250"), Some(250.0));
    }

    #[test]
    fn test_parse_mbps_thousands_separator() {
        assert_eq!(parse_mbps("1,024.5"), Some(1024.5));
    }

    #[test]
    fn test_parse_mbps_rejects_text_and_negatives() {
        assert_eq!(parse_mbps("fast"), None);
        assert_eq!(parse_mbps(""), None);
        assert_eq!(parse_mbps("-3.0"), None);
    }

    #[test]
    fn test_scraper_takes_settings_from_config() {
        let mut config = Config::default();
        config.speed_url = "https://example.com/speed".to_string();
        config.stable_reads = 5;
        config.poll_interval_ms = 250;

        let scraper = PageScraper::new(&config);
        assert_eq!(scraper.url, "https://example.com/speed");
        assert_eq!(scraper.stable_reads, 5);
        assert_eq!(scraper.poll_interval, Duration::from_millis(250));
        assert_eq!(scraper.selector(), "#speed-value");
    }

    #[test]
    fn test_probe_for_picks_engine() {
        let mut config = Config::default();
        config.engine = SpeedEngine::Browser;
        assert_eq!(probe_for(&config).engine(), SpeedEngine::Browser);

        config.engine = SpeedEngine::Http;
        assert_eq!(probe_for(&config).engine(), SpeedEngine::Http);
    }

}
