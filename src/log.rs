use anyhow::Result;
use std::fs::File;
use tracing::level_filters::LevelFilter;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{filter::Targets, fmt, prelude::*, registry};

use crate::cli::Cli;
use crate::time::{LocalDateTime, LocalTimeOnly};

/// Default log file name under the user directory
const LOG_FILE_NAME: &str = "liveprobe.log";

/// Initialize the logger based on command-line arguments.
///
/// Console output goes through the indicatif writer so log lines do not
/// tear the progress bars. With `--log-file` the same events are appended
/// to a file, filtered by the same level.
pub fn init_logger(cli_args: &Cli) -> Result<()> {
    let indicatif_layer = IndicatifLayer::new();

    let console_fmt = fmt::layer()
        .with_target(false)
        .with_timer(LocalTimeOnly)
        .with_writer(indicatif_layer.get_stderr_writer());

    let level = if cli_args.quiet {
        tracing::Level::ERROR
    } else {
        cli_args.log_level.to_level_filter()
    };
    let console_level = if cli_args.no_stdout {
        LevelFilter::OFF
    } else {
        LevelFilter::from_level(level)
    };
    let console_filter = Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target("liveprobe", console_level);

    if !cli_args.log_file {
        registry()
            .with(indicatif_layer)
            .with(console_fmt.with_filter(console_filter))
            .init();
        return Ok(());
    }

    let log_file_path = match &cli_args.log_file_path {
        Some(path) => path.clone(),
        None => liveprobe::config::get_user_file_path(LOG_FILE_NAME)?,
    };

    // Append mode, so repeated runs share one file
    let file = File::options()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    let file_fmt = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_timer(LocalDateTime)
        .with_writer(file);

    let file_filter = Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target("liveprobe", level);

    registry()
        .with(indicatif_layer)
        .with(console_fmt.with_filter(console_filter))
        .with(file_fmt.with_filter(file_filter))
        .init();

    Ok(())
}
