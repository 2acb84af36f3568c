//! Output formatting and display coordination
//!
//! Turns finished measurement cycles into terminal text or JSON. The
//! formatter trait has a plain and a colored implementation; the
//! coordinator picks sections based on which phases actually ran.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{
    Alignment, Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat,
};

use crate::{
    error::{AppError, Result},
    models::{Config, MeasurementCycle},
    stats::SessionSummary,
};

/// Factory for creating formatters based on configuration
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color and verbosity settings
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color: enable_color && ColoredFormatter::supports_color(),
            verbose_mode: verbose,
            ..Default::default()
        };

        if options.enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a formatter from application configuration
    pub fn from_config(config: &Config) -> Box<dyn OutputFormatter> {
        Self::create_formatter(config.enable_color, config.verbose)
    }
}

/// Coordinates output rendering for measurement cycles
///
/// Composes formatter sections into complete display strings. Callers
/// decide where the strings go, which keeps rendering testable.
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    json_output: bool,
}

impl OutputCoordinator {
    /// Create a new output coordinator
    pub fn new(formatter: Box<dyn OutputFormatter>, json_output: bool) -> Self {
        Self {
            formatter,
            json_output,
        }
    }

    /// Create a coordinator from application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(OutputFormatterFactory::from_config(config), config.json_output)
    }

    /// Render a finished measurement cycle for display
    ///
    /// Skipped phases produce no section. In JSON mode the whole cycle
    /// is serialized instead, with the derived status attached.
    pub fn display_cycle(&self, cycle: &MeasurementCycle) -> Result<String> {
        if self.json_output {
            return render_cycle_json(cycle);
        }

        let mut sections = Vec::new();
        sections.push(self.formatter.format_header("Internet Speed Test")?);
        if !cycle.speed.is_skipped() {
            sections.push(self.formatter.format_speed(&cycle.speed)?);
        }
        if !cycle.ping.is_skipped() {
            sections.push(self.formatter.format_ping(&cycle.ping)?);
        }
        if let Some(weather) = &cycle.weather {
            sections.push(self.formatter.format_weather(weather)?);
        }
        sections.push(self.formatter.format_cycle_summary(cycle)?);

        Ok(sections.join("\n\n"))
    }

    /// Render the end-of-watch session summary
    pub fn display_session_summary(&self, summary: &SessionSummary) -> Result<String> {
        if self.json_output {
            return serde_json::to_string_pretty(summary).map_err(|e| {
                AppError::io(format!("Failed to render session summary as JSON: {}", e))
            });
        }

        self.formatter.format_session_summary(summary)
    }

    /// Render an error message
    pub fn display_error(&self, error: &str) -> Result<String> {
        self.formatter.format_error(error)
    }

    /// Render a warning message
    pub fn display_warning(&self, warning: &str) -> Result<String> {
        self.formatter.format_warning(warning)
    }

    /// Render a success message
    pub fn display_success(&self, message: &str) -> Result<String> {
        self.formatter.format_success(message)
    }
}

/// Serialize a cycle as pretty JSON with its derived status attached
fn render_cycle_json(cycle: &MeasurementCycle) -> Result<String> {
    let mut value = serde_json::to_value(cycle)
        .map_err(|e| AppError::io(format!("Failed to render cycle as JSON: {}", e)))?;

    if let Some(object) = value.as_object_mut() {
        object.insert(
            "status".to_string(),
            serde_json::Value::String(cycle.status().to_string()),
        );
    }

    serde_json::to_string_pretty(&value)
        .map_err(|e| AppError::io(format!("Failed to render cycle as JSON: {}", e)))
}
