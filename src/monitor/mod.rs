//! Measurement cycle execution and scheduled repetition
//!
//! `CycleRunner` performs one full measurement cycle (speed, ping,
//! weather) together with its side effects: rendering, journal append,
//! desktop notification. `Monitor` repeats cycles on a fixed interval
//! with an overlap guard so at most one cycle is ever in flight.

use crate::{
    error::Result,
    journal::MeasurementJournal,
    log_info, log_warn,
    logging::{Logger, PerformanceLogger},
    models::{Config, MeasurementCycle, PingSample, SpeedSample},
    notify::Notifier,
    output::OutputCoordinator,
    ping::PingRunner,
    scraper::probe_for,
    stats::SessionStats,
    types::SpeedProbe,
    weather::WeatherService,
};
use chrono::Utc;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

/// At-most-one-cycle-in-flight guard shared with spawned cycle tasks
#[derive(Debug, Default)]
struct InFlightGuard(AtomicBool);

impl InFlightGuard {
    /// Claim the slot; returns false when a cycle is already running
    fn try_begin(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    /// Release the slot once the cycle has finished
    fn finish(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Executes one full measurement cycle and its side effects
pub struct CycleRunner {
    config: Config,
    speed_probe: Box<dyn SpeedProbe>,
    ping_runner: PingRunner,
    weather: Option<WeatherService>,
    journal: Option<MeasurementJournal>,
    notifier: Notifier,
    coordinator: OutputCoordinator,
    perf: PerformanceLogger,
    logger: Logger,
}

impl CycleRunner {
    /// Build a runner with all phase components wired from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let weather = if config.weather_enabled {
            Some(WeatherService::new(config)?)
        } else {
            None
        };
        let journal = config
            .journal_enabled
            .then(|| MeasurementJournal::from_config(config));

        Ok(Self {
            speed_probe: probe_for(config),
            ping_runner: PingRunner::new(config),
            weather,
            journal,
            notifier: Notifier::new(config),
            coordinator: OutputCoordinator::from_config(config),
            perf: PerformanceLogger::new(config),
            logger: Logger::with_config("monitor".to_string(), config),
            config: config.clone(),
        })
    }

    /// The coordinator rendering this runner's results
    pub fn coordinator(&self) -> &OutputCoordinator {
        &self.coordinator
    }

    /// Run one measurement cycle: speed, then ping, then weather
    ///
    /// Phase failures fold into null phase results and never abort the
    /// cycle. An error here means a completed cycle could not be
    /// rendered or persisted.
    pub async fn run_cycle(&self, run: u32) -> Result<MeasurementCycle> {
        let started_at = Utc::now();
        log_info!(self.logger, "Starting measurement cycle {}", run);

        let speed = if self.config.skip_speed {
            SpeedSample::skipped(
                self.speed_probe.engine(),
                "disabled by configuration".to_string(),
            )
        } else {
            self.speed_probe.measure().await
        };

        let ping = if self.config.skip_ping {
            PingSample::skipped(
                self.ping_runner.host().to_string(),
                "disabled by configuration".to_string(),
            )
        } else {
            self.ping_runner.run().await
        };

        let weather = match &self.weather {
            Some(service) => service.fetch().await,
            None => None,
        };

        let cycle = MeasurementCycle::new(run, speed, ping, weather, started_at);
        self.perf.log_cycle(&cycle).await;

        let rendered = self.coordinator.display_cycle(&cycle)?;
        println!("{}", rendered);

        let record = cycle.to_record();
        if let Some(journal) = &self.journal {
            journal.append(&record).await?;
        }
        self.notifier.notify(&record).await;

        Ok(cycle)
    }
}

/// Repeats measurement cycles on a fixed schedule
pub struct Monitor {
    runner: Arc<CycleRunner>,
    interval: Duration,
    max_runs: Option<u32>,
    perf: PerformanceLogger,
    logger: Logger,
}

impl Monitor {
    /// Create a monitor around a cycle runner
    pub fn new(runner: CycleRunner, config: &Config) -> Self {
        Self {
            runner: Arc::new(runner),
            interval: config.interval(),
            max_runs: config.max_runs,
            perf: PerformanceLogger::new(config),
            logger: Logger::with_config("monitor".to_string(), config),
        }
    }

    /// Run a single measurement cycle
    pub async fn run_once(&self) -> Result<MeasurementCycle> {
        self.runner.run_cycle(1).await
    }

    /// Run cycles until Ctrl-C or the configured run limit
    ///
    /// The first cycle starts immediately; later cycles start on interval
    /// ticks. Each cycle runs as a spawned task so the schedule loop and
    /// Ctrl-C handling stay responsive. A tick that fires while a cycle
    /// is still in flight is skipped with a warning.
    pub async fn watch(&self) -> Result<()> {
        let session_start = Instant::now();
        let mut stats = SessionStats::default();
        let guard = Arc::new(InFlightGuard::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut next_run: u32 = 1;

        log_info!(
            self.logger,
            "Watch mode: one cycle every {}s{}",
            self.interval.as_secs(),
            self.max_runs
                .map(|runs| format!(", stopping after {} runs", runs))
                .unwrap_or_default()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !guard.try_begin() {
                        log_warn!(
                            self.logger,
                            "Previous cycle still in flight, skipping this tick"
                        );
                        continue;
                    }

                    let run = next_run;
                    next_run += 1;

                    let runner = Arc::clone(&self.runner);
                    let guard = Arc::clone(&guard);
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let result = runner.run_cycle(run).await;
                        guard.finish();
                        let _ = tx.send(result);
                    });
                }
                Some(result) = rx.recv() => {
                    let cycle = result?;
                    stats.record(&cycle);

                    if let Some(limit) = self.max_runs {
                        if stats.cycles() >= limit {
                            log_info!(self.logger, "Reached run limit of {}", limit);
                            break;
                        }
                    }
                }
                _ = &mut ctrl_c => {
                    log_info!(self.logger, "Interrupt received, stopping watch mode");
                    if guard.is_busy() {
                        let notice = self.runner.coordinator().display_warning(
                            "Interrupted, waiting for the in-flight cycle to finish",
                        )?;
                        println!("{}", notice);
                    }
                    break;
                }
            }
        }

        // Collect anything that finished while the loop was stopping. With
        // our sender dropped, recv drains queued results, waits for the
        // in-flight task if there is one, then yields None.
        drop(tx);
        while let Some(result) = rx.recv().await {
            let cycle = result?;
            stats.record(&cycle);
        }

        if !stats.is_empty() {
            let summary = stats.summary();
            self.perf
                .log_session_summary(
                    summary.cycles as usize,
                    summary.complete as usize,
                    summary.failed as usize,
                    session_start.elapsed(),
                )
                .await;

            let rendered = self
                .runner
                .coordinator()
                .display_session_summary(&summary)?;
            println!("\n{}", rendered);
        }

        Ok(())
    }
}
