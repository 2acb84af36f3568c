//! Internet Speed Monitor - Main CLI Application
//!
//! Measures download speed and latency, journals every measurement, and
//! optionally repeats on a schedule with desktop notifications.

use clap::Parser;
use internet_speed_monitor::{
    app::App,
    cli::Cli,
    error::{AppError, Result},
};
use std::{error::Error, process};

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!(
            "Please report this issue at: https://github.com/MaurUppi/internet-speed-monitor/issues"
        );
        process::exit(1);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    // Handle the actual application logic
    if let Err(e) = run_application(cli).await {
        eprintln!("Error: {}", e);

        if let Some(source) = e.source() {
            eprintln!("Caused by: {}", source);
        }

        // Print suggestions for common errors
        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    // Cross-flag checks clap cannot express
    if let Err(message) = cli.validate() {
        return Err(AppError::validation(message));
    }

    let app = App::new(cli)?;
    app.run().await
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - Verify the speed page URL (must start with http:// or https://)");
            eprintln!("  - Run with --help-topic config for the full reference");
        }
        AppError::Browser(_) | AppError::Scrape(_) => {
            eprintln!();
            eprintln!("Browser troubleshooting:");
            eprintln!("  - Install Google Chrome or Chromium");
            eprintln!("  - Point --browser-path (or BROWSER_PATH) at the executable");
            eprintln!("  - Switch to the direct download engine with --engine http");
        }
        AppError::Timeout(_) => {
            eprintln!();
            eprintln!("Timeout troubleshooting:");
            eprintln!("  - Increase the limit with --timeout");
            eprintln!("  - Check your internet connection");
            eprintln!("  - The speed page may be slow; try --engine http");
        }
        AppError::Ping(_) => {
            eprintln!();
            eprintln!("Ping troubleshooting:");
            eprintln!("  - Make sure the system ping utility is installed");
            eprintln!("  - Try a different host with --ping-host (8.8.8.8, 1.1.1.1)");
            eprintln!("  - Skip the phase entirely with --skip-ping");
        }
        AppError::Journal(_) | AppError::Io(_) => {
            eprintln!();
            eprintln!("File troubleshooting:");
            eprintln!("  - Check permissions and free space for the journal path");
            eprintln!("  - Choose another location with --journal");
            eprintln!("  - Disable journaling with --no-journal");
        }
        _ => {}
    }
}
