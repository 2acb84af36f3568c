//! Main application orchestration and execution

use crate::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config},
    error::Result,
    journal::MeasurementJournal,
    monitor::{CycleRunner, Monitor},
    output::OutputCoordinator,
};
use std::path::Path;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        Ok(Self { cli })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        // Topic help short-circuits everything else
        if self.cli.should_show_topic_help() {
            println!("{}", self.cli.display_help());
            return Ok(());
        }

        // Load and validate configuration
        let config = load_config(self.cli.clone())?;

        if config.debug {
            println!(
                "{} v{} (commit {}, built {})",
                crate::PKG_NAME,
                crate::VERSION,
                option_env!("GIT_COMMIT").unwrap_or("unknown"),
                env!("BUILD_TIME"),
            );
            println!("\nConfiguration Summary:");
            println!("{}", display_config_summary(&config));
            println!();
        }

        // Export mode reads the existing journal and exits without
        // measuring, so the measurement-phase validation does not apply
        if let Some(ref csv_path) = self.cli.export_csv {
            let coordinator = OutputCoordinator::from_config(&config);
            let journal = MeasurementJournal::from_config(&config);
            let summary = journal.export_csv(Path::new(csv_path)).await?;

            let message = coordinator.display_success(&format!(
                "Exported {} records from {} to {}",
                summary.exported,
                journal.path().display(),
                csv_path
            ))?;
            println!("{}", message);

            if summary.skipped > 0 {
                let notice = coordinator.display_warning(&format!(
                    "{} corrupt journal lines were skipped",
                    summary.skipped
                ))?;
                eprintln!("{}", notice);
            }

            return Ok(());
        }

        let warnings = validate_config(&config)?;
        if !warnings.is_empty() {
            for warning in &warnings {
                eprintln!("{}", warning.format(config.enable_color));
            }
            eprintln!();
        }

        let runner = CycleRunner::from_config(&config)?;
        let monitor = Monitor::new(runner, &config);

        if config.watch {
            monitor.watch().await
        } else {
            monitor.run_once().await.map(|_| ())
        }
    }
}
