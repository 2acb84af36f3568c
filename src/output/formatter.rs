//! Core formatting trait and plain text implementation
//!
//! Defines the output formatting interface for measurement results and
//! provides a plain text implementation with table formatting for the
//! watch-session summary.

use crate::{
    error::{AppError, Result},
    models::{MeasurementCycle, PingSample, SpeedSample, WeatherSnapshot},
    stats::SessionSummary,
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter: Send + Sync {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the download speed block
    fn format_speed(&self, sample: &SpeedSample) -> Result<String>;

    /// Format the ping statistics block
    fn format_ping(&self, sample: &PingSample) -> Result<String>;

    /// Format the local weather block
    fn format_weather(&self, snapshot: &WeatherSnapshot) -> Result<String>;

    /// Format the one-line wrap-up of a finished cycle
    fn format_cycle_summary(&self, cycle: &MeasurementCycle) -> Result<String>;

    /// Format the end-of-watch session summary
    fn format_session_summary(&self, summary: &SessionSummary) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Maximum output width
    pub max_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_width: 100,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Show borders around table
    pub show_borders: bool,
    /// Show header row
    pub show_header: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header
    pub header: String,
    /// Column alignment
    pub alignment: Alignment,
    /// Minimum width
    pub min_width: usize,
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Create a table with the given format and data
    fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> Result<String> {
        if rows.is_empty() {
            return Ok(String::new());
        }

        let widths = self.column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.horizontal_border(&widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.horizontal_border(&widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.horizontal_border(&widths));
        }

        Ok(output)
    }

    /// Calculate column widths from headers and cell contents
    fn column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format
            .columns
            .len()
            .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

        let mut widths = Vec::with_capacity(num_columns);
        for col_idx in 0..num_columns {
            let mut width = if col_idx < format.columns.len() {
                let col = &format.columns[col_idx];
                col.min_width.max(col.header.chars().count())
            } else {
                0
            };

            for row in rows {
                if col_idx < row.len() {
                    width = width.max(row[col_idx].chars().count());
                }
            }

            widths.push(width.min(self.options.max_width));
        }

        widths
    }

    /// Create a table row
    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = if idx < format.columns.len() {
                &format.columns[idx].alignment
            } else {
                &Alignment::Left
            };

            let padded_cell = self.align_text(cell, width, alignment);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&padded_cell);
            if format.show_borders {
                row.push(' ');
                row.push('|');
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    /// Create horizontal border for table
    fn horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }

    /// Align text within specified width
    fn align_text(&self, text: &str, width: usize, alignment: &Alignment) -> String {
        let len = text.chars().count();
        if len >= width {
            return text.chars().take(width).collect();
        }

        let padding = width - len;
        match alignment {
            Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
            Alignment::Right => format!("{}{}", " ".repeat(padding), text),
            Alignment::Center => {
                let left_pad = padding / 2;
                let right_pad = padding - left_pad;
                format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
            }
        }
    }

    /// Format duration in human-readable format
    fn format_duration(&self, duration_ms: f64) -> String {
        if duration_ms < 1.0 {
            format!("{:.2}μs", duration_ms * 1000.0)
        } else if duration_ms < 1000.0 {
            format!("{:.1}ms", duration_ms)
        } else if duration_ms < 60000.0 {
            format!("{:.2}s", duration_ms / 1000.0)
        } else {
            let minutes = (duration_ms / 60000.0) as u32;
            let seconds = (duration_ms % 60000.0) / 1000.0;
            format!("{}m{:.1}s", minutes, seconds)
        }
    }

    /// Format percentage with appropriate precision
    fn format_percentage(&self, percentage: f64) -> String {
        if percentage >= 99.95 {
            "100.0%".to_string()
        } else if percentage < 0.05 {
            "0.0%".to_string()
        } else {
            format!("{:.1}%", percentage)
        }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(output, "  {}  ", title)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", border)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_speed(&self, sample: &SpeedSample) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Download Speed:")
            .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
        writeln!(output, "---------------")
            .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
        writeln!(output, "Engine:       {}", sample.engine)
            .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;

        if let Some(label) = sample.label() {
            writeln!(output, "Speed:        {}", label)
                .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
            if let Some(quality) = sample.quality() {
                writeln!(output, "Quality:      {:?}", quality)
                    .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
            }
            if sample.polls > 0 {
                writeln!(output, "Stabilized:   after {} polls", sample.polls)
                    .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
            }
            write!(output, "Duration:     {}", self.format_duration(sample.duration_ms()))
                .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
        } else {
            writeln!(output, "Speed:        unavailable")
                .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
            let reason = sample.error_message.as_deref().unwrap_or("unknown");
            write!(output, "Reason:       {}", reason)
                .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
        }

        Ok(output)
    }

    fn format_ping(&self, sample: &PingSample) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Ping Statistics:")
            .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
        writeln!(output, "----------------")
            .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
        writeln!(output, "Host:         {}", sample.host)
            .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;

        if let Some(label) = sample.label() {
            writeln!(output, "Average:      {}", label)
                .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
            if let (Some(min), Some(max)) = (sample.min_ms, sample.max_ms) {
                writeln!(
                    output,
                    "Min/Max:      {}/{}",
                    self.format_duration(min),
                    self.format_duration(max)
                )
                .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
            }
            if let Some(jitter) = sample.jitter_ms {
                writeln!(output, "Jitter:       {}", self.format_duration(jitter))
                    .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
            }
            if let Some(loss) = sample.packet_loss_pct {
                writeln!(output, "Packet Loss:  {}", self.format_percentage(loss))
                    .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
            }
            write!(output, "Replies:      {}/{}", sample.received, sample.transmitted)
                .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
        } else {
            writeln!(output, "Average:      unavailable")
                .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
            let reason = sample.error_message.as_deref().unwrap_or("unknown");
            write!(output, "Reason:       {}", reason)
                .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
        }

        Ok(output)
    }

    fn format_weather(&self, snapshot: &WeatherSnapshot) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Local Weather:")
            .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;
        writeln!(output, "--------------")
            .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;
        writeln!(output, "Location:     {}, {}", snapshot.city, snapshot.country)
            .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;
        writeln!(output, "Conditions:   {}", snapshot.description)
            .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;
        writeln!(output, "Temperature:  {:.1}°C", snapshot.temperature_c)
            .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;
        writeln!(output, "Humidity:     {}%", snapshot.humidity_pct)
            .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;
        write!(output, "Wind:         {:.1} m/s", snapshot.wind_speed_ms)
            .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;

        Ok(output)
    }

    fn format_cycle_summary(&self, cycle: &MeasurementCycle) -> Result<String> {
        let mut output = String::new();

        if let Some(label) = cycle.speed.label() {
            writeln!(output, "Your internet speed is {}", label)
                .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        }
        write!(
            output,
            "Run #{} {} in {}",
            cycle.run,
            cycle.status(),
            self.format_duration(cycle.duration().as_secs_f64() * 1000.0)
        )
        .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        Ok(output)
    }

    fn format_session_summary(&self, summary: &SessionSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Session Summary:")
            .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
        writeln!(output, "----------------")
            .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
        writeln!(output, "Cycles:       {}", summary.cycles)
            .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
        writeln!(
            output,
            "Complete:     {} ({})",
            summary.complete,
            self.format_percentage(summary.success_rate)
        )
        .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
        writeln!(output, "Partial:      {}", summary.partial)
            .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
        writeln!(output, "Failed:       {}", summary.failed)
            .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;

        let table_format = TableFormat {
            columns: vec![
                Column {
                    header: "Metric".to_string(),
                    alignment: Alignment::Left,
                    min_width: 6,
                },
                Column {
                    header: "Min".to_string(),
                    alignment: Alignment::Right,
                    min_width: 10,
                },
                Column {
                    header: "Average".to_string(),
                    alignment: Alignment::Right,
                    min_width: 10,
                },
                Column {
                    header: "Max".to_string(),
                    alignment: Alignment::Right,
                    min_width: 10,
                },
            ],
            show_borders: self.options.table_borders,
            show_header: true,
        };

        let mut rows: Vec<RowData> = Vec::new();
        if let Some(speed) = summary.speed {
            rows.push(vec![
                "Speed".to_string(),
                format!("{:.1} Mbps", speed.min_mbps),
                format!("{:.1} Mbps", speed.avg_mbps),
                format!("{:.1} Mbps", speed.max_mbps),
            ]);
        }
        if let Some(avg_ping) = summary.avg_ping_ms {
            rows.push(vec![
                "Ping".to_string(),
                "-".to_string(),
                self.format_duration(avg_ping),
                "-".to_string(),
            ]);
        }

        if !rows.is_empty() {
            writeln!(output)
                .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
            output.push_str(&self.create_table(&table_format, &rows)?);
        }

        Ok(output)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
