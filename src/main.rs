// Entry point for the Minesweeper TUI application
// Loads preferences, optionally starts file logging, and launches the main UI

use std::error::Error;
use std::fs::OpenOptions;
use std::sync::Mutex;

// Module declarations
mod msw_color; // Palette matched to terminal colour depth
mod msw_ui; // Terminal UI rendering and event handling

use mswpr::msw_config::{load_or_create_config, Config};
use msw_ui::run as run_ui;

/// Install a plain-text subscriber writing to the configured log file, if any
/// Nothing is logged to the terminal because the UI owns the alternate screen
fn init_logging(cfg: &Config) -> Result<(), Box<dyn Error>> {
    let Some(path) = &cfg.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Load or create user preferences (icons, indicator, log file)
    let mut cfg = load_or_create_config();

    init_logging(&cfg)?;

    // Launch the main UI loop
    run_ui(&mut cfg)
}
