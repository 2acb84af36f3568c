//! Colored formatter implementation with terminal color support
//!
//! Rich colored output using ANSI colors and Unicode symbols. Falls back
//! to uncolored text when colors are disabled, so the layout survives
//! redirection into a file.

use super::formatter::{FormattingOptions, OutputFormatter};
use crate::{
    error::{AppError, Result},
    models::{MeasurementCycle, PingSample, SpeedSample, WeatherSnapshot},
    stats::SessionSummary,
    types::{MeasurementStatus, SpeedQuality},
};
use colored::*;
use std::fmt::Write as _;

impl SpeedQuality {
    /// Get color for this quality level
    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Red,
        }
    }

    /// Get Unicode symbol for this quality level
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Excellent => "🚀",
            Self::Good => "⚡",
            Self::Fair => "🔶",
            Self::Poor => "🐌",
        }
    }

    /// Get descriptive text
    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub highlight: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            highlight: Color::Magenta,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Apply dimmed formatting if colors are enabled
    fn dimmed(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.dimmed()
        } else {
            text.normal()
        }
    }

    /// Create a colored section header
    fn create_section_header(&self, title: &str, icon: &str) -> String {
        if self.options.enable_color {
            format!("{} {}", icon, title.bold().color(self.color_scheme.header))
        } else {
            format!("{} {}", icon, title)
        }
    }

    /// Format duration in human-readable format
    fn format_duration(&self, duration_ms: f64) -> String {
        if duration_ms < 1.0 {
            format!("{:.0}μs", duration_ms * 1000.0)
        } else if duration_ms < 1000.0 {
            format!("{:.0}ms", duration_ms)
        } else if duration_ms < 60000.0 {
            format!("{:.1}s", duration_ms / 1000.0)
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

    /// Color for a round-trip latency in milliseconds
    fn latency_color(&self, avg_ms: f64) -> Color {
        if avg_ms < 50.0 {
            Color::Green
        } else if avg_ms < 100.0 {
            Color::Cyan
        } else if avg_ms < 300.0 {
            Color::Yellow
        } else {
            Color::Red
        }
    }

    /// Color for a packet loss percentage
    fn loss_color(&self, loss_pct: f64) -> Color {
        if loss_pct >= 5.0 {
            self.color_scheme.error
        } else if loss_pct > 0.0 {
            self.color_scheme.warning
        } else {
            self.color_scheme.success
        }
    }

    /// Icon for a cycle outcome
    fn status_icon(&self, status: MeasurementStatus) -> &'static str {
        match status {
            MeasurementStatus::Complete => "✅",
            MeasurementStatus::Partial => "⚠️ ",
            MeasurementStatus::Failed => "❌",
        }
    }

    /// Color for a cycle outcome
    fn status_color(&self, status: MeasurementStatus) -> Color {
        match status {
            MeasurementStatus::Complete => self.color_scheme.success,
            MeasurementStatus::Partial => self.color_scheme.warning,
            MeasurementStatus::Failed => self.color_scheme.error,
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();

        let decorated_title = format!("🚀 {}", title);
        let border = "═".repeat(decorated_title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(
            output,
            "  {}  ",
            self.bold(&decorated_title).color(self.color_scheme.header)
        )
        .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_speed(&self, sample: &SpeedSample) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", self.create_section_header("Download Speed", "🚀"))
            .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;

        if let Some(label) = sample.label() {
            let quality = sample.quality();
            let icon = quality.map(|q| q.symbol()).unwrap_or("📊");
            let speed_display = match quality {
                Some(q) => self.bold(&label).color(q.color()).to_string(),
                None => self.bold(&label).to_string(),
            };

            writeln!(output, "{} Speed:       {}", icon, speed_display)
                .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
            if let Some(q) = quality {
                writeln!(
                    output,
                    "📊 Quality:     {}",
                    self.colorize(q.description(), q.color())
                )
                .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
            }
            writeln!(
                output,
                "🧪 Engine:      {}",
                self.colorize(&sample.engine.to_string(), self.color_scheme.info)
            )
            .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
            if sample.polls > 0 {
                write!(
                    output,
                    "⏱️  Stabilized:  after {} polls in {}",
                    sample.polls,
                    self.format_duration(sample.duration_ms())
                )
                .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
            } else {
                write!(
                    output,
                    "⏱️  Duration:    {}",
                    self.format_duration(sample.duration_ms())
                )
                .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
            }
        } else {
            writeln!(
                output,
                "❌ Speed:       {}",
                self.colorize("unavailable", self.color_scheme.error)
            )
            .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
            let reason = sample.error_message.as_deref().unwrap_or("unknown");
            write!(output, "   {}", self.dimmed(reason))
                .map_err(|e| AppError::io(format!("Failed to format speed: {}", e)))?;
        }

        Ok(output)
    }

    fn format_ping(&self, sample: &PingSample) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", self.create_section_header("Ping Statistics", "⚡"))
            .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
        writeln!(
            output,
            "🎯 Host:        {}",
            self.colorize(&sample.host, self.color_scheme.info)
        )
        .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;

        if let (Some(label), Some(avg_ms)) = (sample.label(), sample.avg_ms) {
            writeln!(
                output,
                "⏱️  Average:     {}",
                self.colorize(&label, self.latency_color(avg_ms))
            )
            .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
            if let (Some(min), Some(max)) = (sample.min_ms, sample.max_ms) {
                writeln!(
                    output,
                    "📊 Min/Max:     {}/{}",
                    self.format_duration(min),
                    self.format_duration(max)
                )
                .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
            }
            if let Some(jitter) = sample.jitter_ms {
                writeln!(output, "📈 Jitter:      {}", self.format_duration(jitter))
                    .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
            }
            if let Some(loss) = sample.packet_loss_pct {
                let icon = if loss > 0.0 { "⚠️ " } else { "✅" };
                writeln!(
                    output,
                    "{} Packet Loss: {} ({}/{} replies)",
                    icon,
                    self.colorize(&self.format_percentage(loss), self.loss_color(loss)),
                    sample.received,
                    sample.transmitted
                )
                .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
            }
        } else {
            writeln!(
                output,
                "❌ Average:     {}",
                self.colorize("unavailable", self.color_scheme.error)
            )
            .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
            let reason = sample.error_message.as_deref().unwrap_or("unknown");
            writeln!(output, "   {}", self.dimmed(reason))
                .map_err(|e| AppError::io(format!("Failed to format ping: {}", e)))?;
        }

        Ok(output.trim_end().to_string())
    }

    fn format_weather(&self, snapshot: &WeatherSnapshot) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", self.create_section_header("Local Weather", "🌤️"))
            .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;
        writeln!(
            output,
            "📍 Location:    {}",
            self.colorize(
                &format!("{}, {}", snapshot.city, snapshot.country),
                self.color_scheme.info
            )
        )
        .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;
        writeln!(output, "🌡️  Temperature: {:.1}°C", snapshot.temperature_c)
            .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;
        writeln!(output, "💧 Humidity:    {}%", snapshot.humidity_pct)
            .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;
        write!(
            output,
            "💨 Wind:        {:.1} m/s, {}",
            snapshot.wind_speed_ms,
            self.dimmed(&snapshot.description)
        )
        .map_err(|e| AppError::io(format!("Failed to format weather: {}", e)))?;

        Ok(output)
    }

    fn format_cycle_summary(&self, cycle: &MeasurementCycle) -> Result<String> {
        let mut output = String::new();

        if let Some(label) = cycle.speed.label() {
            let headline = format!("Your internet speed is {}", label);
            let colored_headline = match cycle.speed.quality() {
                Some(q) => self.bold(&headline).color(q.color()).to_string(),
                None => self.bold(&headline).to_string(),
            };
            writeln!(output, "✨ {}", colored_headline)
                .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        }

        let status = cycle.status();
        write!(
            output,
            "{} Run #{} {} in {}",
            self.status_icon(status),
            cycle.run,
            self.colorize(status.as_str(), self.status_color(status)),
            self.format_duration(cycle.duration().as_secs_f64() * 1000.0)
        )
        .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        Ok(output)
    }

    fn format_session_summary(&self, summary: &SessionSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{}", self.create_section_header("Session Summary", "📊"))
            .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
        writeln!(
            output,
            "🧪 Cycles:      {}",
            self.colorize(&summary.cycles.to_string(), self.color_scheme.info)
        )
        .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
        writeln!(
            output,
            "✅ Complete:    {} ({})",
            self.colorize(&summary.complete.to_string(), self.color_scheme.success),
            self.format_percentage(summary.success_rate)
        )
        .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;

        if summary.partial > 0 {
            writeln!(
                output,
                "⚠️  Partial:     {}",
                self.colorize(&summary.partial.to_string(), self.color_scheme.warning)
            )
            .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
        }
        if summary.failed > 0 {
            writeln!(
                output,
                "❌ Failed:      {}",
                self.colorize(&summary.failed.to_string(), self.color_scheme.error)
            )
            .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
        }

        if let Some(speed) = summary.speed {
            let quality = SpeedQuality::from_mbps(speed.avg_mbps);
            writeln!(
                output,
                "🚀 Speed:       min {:.1} / avg {} / max {:.1} Mbps",
                speed.min_mbps,
                self.bold(&format!("{:.1}", speed.avg_mbps))
                    .color(quality.color()),
                speed.max_mbps
            )
            .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
        }
        if let Some(avg_ping) = summary.avg_ping_ms {
            writeln!(
                output,
                "⚡ Ping:        {} average",
                self.colorize(
                    &self.format_duration(avg_ping),
                    self.latency_color(avg_ping)
                )
            )
            .map_err(|e| AppError::io(format!("Failed to format session: {}", e)))?;
        }

        Ok(output.trim_end().to_string())
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("❌ {}", self.colorize(error, self.color_scheme.error)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("⚠️  {}", self.colorize(warning, self.color_scheme.warning)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("✅ {}", self.colorize(message, self.color_scheme.success)))
    }
}

/// Helper functions for color management
impl ColoredFormatter {
    /// Check if terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && std::env::var("TERM").map(|term| term != "dumb").unwrap_or(true)
    }

    /// Enable or disable colors at runtime
    pub fn set_colors_enabled(&mut self, enabled: bool) {
        self.options.enable_color = enabled && Self::supports_color();
    }
}
