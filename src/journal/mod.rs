//! Measurement journal persistence and CSV export
//!
//! Every completed cycle is appended to a JSONL file, one record per
//! line, so the history survives crashes mid-session and stays greppable.
//! The CSV export derives a spreadsheet-friendly view from the same file.

use crate::{
    error::{AppError, Result},
    log_debug, log_warn,
    logging::Logger,
    models::{Config, MeasurementRecord},
};
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

/// Append-only journal of measurement records
pub struct MeasurementJournal {
    /// Path of the JSONL journal file
    path: PathBuf,

    /// Serializes writers so concurrent appends cannot interleave lines
    write_lock: Mutex<()>,

    logger: Logger,
}

/// Everything recovered from a journal file
#[derive(Debug)]
pub struct JournalContents {
    /// Records parsed in file order
    pub records: Vec<MeasurementRecord>,

    /// Number of corrupt lines that were skipped
    pub skipped: usize,
}

/// Outcome of a CSV export
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSummary {
    /// Rows written to the CSV file
    pub exported: usize,

    /// Corrupt journal lines that did not make it into the export
    pub skipped: usize,
}

impl MeasurementJournal {
    /// Create a journal backed by the given file path
    pub fn new(path: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            logger: Logger::with_config("journal".to_string(), config),
        }
    }

    /// Create a journal at the configured journal path
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.journal_path.clone(), config)
    }

    /// Path of the underlying journal file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line
    ///
    /// The file is opened in append mode and flushed before returning, and
    /// the parent directory is created on demand.
    pub async fn append(&self, record: &MeasurementRecord) -> Result<()> {
        let line = serde_json::to_string(record)
            .map_err(|e| AppError::journal(format!("Failed to serialize journal record: {}", e)))?;

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::journal(format!(
                        "Failed to create journal directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let mut file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                AppError::journal(format!(
                    "Failed to open journal file '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        file.write_all(line.as_bytes()).await.map_err(|e| {
            AppError::journal(format!(
                "Failed to write to journal file '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        file.write_all(b"\n").await.map_err(|e| {
            AppError::journal(format!(
                "Failed to write to journal file '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        file.flush().await.map_err(|e| {
            AppError::journal(format!(
                "Failed to flush journal file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        log_debug!(
            self.logger,
            "Appended {} record to {}",
            record.status,
            self.path.display()
        );
        Ok(())
    }

    /// Read every record from the journal file
    ///
    /// Lines that fail to parse are logged, counted, and skipped; blank
    /// lines are ignored. A missing journal file is an error.
    pub async fn read_all(&self) -> Result<JournalContents> {
        if !self.path.exists() {
            return Err(AppError::journal(format!(
                "Journal file '{}' does not exist",
                self.path.display()
            )));
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::journal(format!(
                "Failed to read journal file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<MeasurementRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    log_warn!(
                        self.logger,
                        "Skipping corrupt journal line {}: {}",
                        index + 1,
                        e
                    );
                }
            }
        }

        log_debug!(
            self.logger,
            "Read {} records from {} ({} corrupt lines skipped)",
            records.len(),
            self.path.display(),
            skipped
        );

        Ok(JournalContents { records, skipped })
    }

    /// Export the journal to CSV, one row per valid record in file order
    pub async fn export_csv(&self, output: &Path) -> Result<ExportSummary> {
        let contents = self.read_all().await?;

        let file = std::fs::File::create(output).map_err(|e| {
            AppError::journal(format!(
                "Failed to create CSV file '{}': {}",
                output.display(),
                e
            ))
        })?;

        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(["timestamp", "speed", "ping", "status"])
            .map_err(|e| AppError::journal(format!("Failed to write CSV header: {}", e)))?;

        for record in &contents.records {
            writer
                .write_record(&[
                    // Same RFC 3339 rendering serde_json writes to the
                    // journal line, so both files show identical text
                    record
                        .timestamp
                        .to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
                    record.speed.clone().unwrap_or_default(),
                    record.ping.clone().unwrap_or_default(),
                    record.status.to_string(),
                ])
                .map_err(|e| AppError::journal(format!("Failed to write CSV row: {}", e)))?;
        }

        writer.flush().map_err(|e| {
            AppError::journal(format!(
                "Failed to flush CSV file '{}': {}",
                output.display(),
                e
            ))
        })?;

        log_debug!(
            self.logger,
            "Exported {} records to {}",
            contents.records.len(),
            output.display()
        );

        Ok(ExportSummary {
            exported: contents.records.len(),
            skipped: contents.skipped,
        })
    }
}
