//! Setup for the application logging.
//!
//! Log records from the `log` macros are written to standard output by a
//! `tracing-subscriber` formatter, filtered by the configured [`LogLevel`].
use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;

use crate::config::LogLevel;

static INIT: Once = Once::new();

/// Installs the stdout subscriber once. `LogLevel::Off` installs nothing.
pub fn setup(log_level: LogLevel) {
    let level = map_to_level_filter(log_level);

    if level == LevelFilter::OFF {
        return;
    }

    INIT.call_once(|| {
        if let Err(e) = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(true)
            .try_init()
        {
            eprintln!("Failed to initialize logging: {e}");
            return;
        }

        log::info!("Logging initialized");
    });
}

fn map_to_level_filter(log_level: LogLevel) -> LevelFilter {
    match log_level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}
