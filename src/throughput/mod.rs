//! Raw HTTP download throughput
//!
//! The alternative speed engine: streams a sizeable payload over HTTP
//! and derives megabits per second from bytes moved over wall time. No
//! browser involved, so it also serves machines without Chrome.

use crate::{
    error::{AppError, Result},
    log_debug, log_warn,
    logging::{Logger, NetworkLogger},
    models::{Config, SpeedSample},
    types::{SpeedEngine, SpeedProbe},
};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::time::{Duration, Instant};

/// Downloads the configured payload and times the transfer.
pub struct ThroughputProbe {
    url: String,
    timeout: Duration,
    logger: Logger,
    network: NetworkLogger,
}

struct Download {
    bytes: u64,
    status: u16,
}

impl ThroughputProbe {
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.throughput_url.clone(),
            timeout: config.timeout(),
            logger: Logger::with_config("throughput".to_string(), config),
            network: NetworkLogger::new(config),
        }
    }

    /// Run one download. Failures and timeouts come back as samples.
    pub async fn run(&self) -> SpeedSample {
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.download()).await;
        let elapsed = started.elapsed();
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;

        match outcome {
            Ok(Ok(download)) => {
                self.network
                    .log_http_request(&self.url, "GET", Some(download.status), elapsed_ms)
                    .await;

                let mbps = mbps_from(download.bytes, elapsed);
                log_debug!(
                    self.logger,
                    "Downloaded {} bytes in {:.2}s ({:.1} Mbps)",
                    download.bytes,
                    elapsed.as_secs_f64(),
                    mbps
                );

                SpeedSample::success(
                    SpeedEngine::Http,
                    Some(mbps),
                    format!("{:.1}", mbps),
                    Some("Mbps".to_string()),
                    0,
                    elapsed,
                )
            }
            Ok(Err(e)) => {
                self.network
                    .log_http_request(&self.url, "GET", None, elapsed_ms)
                    .await;
                log_warn!(self.logger, "Throughput download failed: {}", e);
                SpeedSample::failed(SpeedEngine::Http, e.to_string())
            }
            Err(_) => {
                self.network
                    .log_http_request(&self.url, "GET", None, elapsed_ms)
                    .await;
                log_warn!(
                    self.logger,
                    "Throughput download timed out after {}s",
                    self.timeout.as_secs()
                );
                SpeedSample::timeout(SpeedEngine::Http, self.timeout)
            }
        }
    }

    /// Stream the payload to completion, counting bytes as they arrive.
    async fn download(&self) -> Result<Download> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AppError::http_request(format!("Failed to create HTTP client: {}", e)))?;

        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::http_request(format!("Download request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http_request(format!(
                "Download returned HTTP {}",
                status
            )));
        }

        let mut bytes: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                AppError::http_request(format!("Error reading download stream: {}", e))
            })?;
            bytes += chunk.len() as u64;
        }

        if bytes == 0 {
            return Err(AppError::http_request("Download produced no data"));
        }

        Ok(Download {
            bytes,
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl SpeedProbe for ThroughputProbe {
    fn engine(&self) -> SpeedEngine {
        SpeedEngine::Http
    }

    async fn measure(&self) -> SpeedSample {
        self.run().await
    }
}

/// Megabits per second from bytes moved over elapsed wall time.
fn mbps_from(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    (bytes as f64 * 8.0) / secs / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PhaseStatus;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn probe_for_url(url: String, timeout_seconds: u64) -> ThroughputProbe {
        let mut config = Config::default();
        config.throughput_url = url;
        config.timeout_seconds = timeout_seconds;
        ThroughputProbe::new(&config)
    }

    #[test]
    fn test_mbps_from_known_sizes() {
        // 1.25 MB in one second is 10 megabits per second
        assert_eq!(mbps_from(1_250_000, Duration::from_secs(1)), 10.0);
        assert_eq!(mbps_from(25_000_000, Duration::from_secs(2)), 100.0);
    }

    #[test]
    fn test_mbps_from_zero_duration() {
        assert_eq!(mbps_from(1_000_000, Duration::ZERO), 0.0);
    }

    #[tokio::test]
    async fn test_download_measures_mock_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payload"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 256 * 1024]))
            .mount(&server)
            .await;

        let probe = probe_for_url(format!("{}/payload", server.uri()), 10);
        let sample = probe.run().await;

        assert_eq!(sample.status, PhaseStatus::Success);
        assert_eq!(sample.engine, SpeedEngine::Http);
        assert!(sample.mbps.is_some());
        assert!(sample.mbps.unwrap() > 0.0);
        assert_eq!(sample.unit.as_deref(), Some("Mbps"));
        let display = sample.display.unwrap();
        assert!(display.parse::<f64>().is_ok(), "display: {}", display);
    }

    #[tokio::test]
    async fn test_http_error_becomes_failed_sample() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payload"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let probe = probe_for_url(format!("{}/payload", server.uri()), 10);
        let sample = probe.run().await;

        assert_eq!(sample.status, PhaseStatus::Failed);
        assert!(sample.mbps.is_none());
        let message = sample.error_message.unwrap();
        assert!(message.contains("500"), "got: {}", message);
    }

    #[tokio::test]
    async fn test_empty_body_becomes_failed_sample() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payload"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let probe = probe_for_url(format!("{}/payload", server.uri()), 10);
        let sample = probe.run().await;

        assert_eq!(sample.status, PhaseStatus::Failed);
        assert!(sample.error_message.unwrap().contains("no data"));
    }

    #[tokio::test]
    async fn test_slow_server_becomes_timeout_sample() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0u8; 1024])
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let probe = probe_for_url(format!("{}/payload", server.uri()), 1);
        let sample = probe.run().await;

        assert_eq!(sample.status, PhaseStatus::Timeout);
        assert!(sample.mbps.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_becomes_failed_sample() {
        // Port 9 on localhost is the discard service and is closed in practice
        let probe = probe_for_url("http://127.0.0.1:9/payload".to_string(), 2);
        let sample = probe.run().await;

        assert!(matches!(
            sample.status,
            PhaseStatus::Failed | PhaseStatus::Timeout
        ));
        assert!(sample.mbps.is_none());
    }
}
