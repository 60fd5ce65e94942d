//! Application initialization and configuration

use anyhow::{Context, Result};
use log::{debug, LevelFilter};
use std::str::FromStr;
use crate::{cli, config, logging};

/// Load the configuration file and apply command-line directory overrides
pub fn load_configuration(args: &cli::Args) -> Result<config::AnalystConfig> {
    if let Some(path) = &args.config {
        debug!("Loading configuration from explicit file: {}", path.display());
    }
    let mut config = config::AnalystConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(data_dir) = &args.data_dir {
        debug!("Input directory overridden: {}", data_dir.display());
        config.input.directory = data_dir.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        debug!("Output directory overridden: {}", output_dir.display());
        config.output.directory = output_dir.clone();
    }

    Ok(config)
}

/// Merge logging flags with the `logging` section; flags win
pub fn configure_logging(args: &cli::Args, logging_section: &config::LoggingSection) -> Result<logging::LogConfig> {
    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        match &logging_section.console_level {
            Some(level) => logging::parse_log_level(level)
                .context("Invalid logging.console-level in configuration")?,
            None => LevelFilter::Info,
        }
    };

    let format = match args.log_format.as_deref().or(logging_section.format.as_deref()) {
        Some(format) => logging::LogFormat::from_str(format).map_err(|e| anyhow::anyhow!(e))?,
        None => logging::LogFormat::Text,
    };

    let log_file_path = args.log_file.clone().or_else(|| logging_section.file.clone());

    let file_log_level = match (&args.log_file_level, &logging_section.file_level) {
        (Some(level), _) => Some(logging::parse_log_level(level)?),
        (None, Some(level)) => Some(
            logging::parse_log_level(level).context("Invalid logging.file-level in configuration")?,
        ),
        (None, None) => None,
    };

    let (destination, file_level) = match log_file_path {
        Some(file_path) => {
            let level = file_log_level.unwrap_or(console_level);
            (logging::LogDestination::Both(file_path), Some(level))
        }
        None => (logging::LogDestination::Console, None),
    };

    Ok(logging::LogConfig {
        console_level,
        file_level,
        format,
        destination,
    })
}
