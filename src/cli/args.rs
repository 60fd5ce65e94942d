use clap::Parser;
use anyhow::Result;
use std::path::PathBuf;
use log::debug;

/// Harbor registry push analytics
#[derive(Parser, Debug, Default)]
#[command(name = "harbor-analyst")]
#[command(about = "Turns Harbor registry CSV exports into push statistics, bar charts and a PDF report")]
#[command(version)]
pub struct Args {
    /// Configuration file path (defaults to discovery)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the CSV exports (overrides input.directory)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for charts and the report (overrides output.directory)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    /// Print a table per statistic after the report is written
    #[arg(long)]
    pub summary: bool,

    /// List the available statistics and their parameters, then exit
    #[arg(long)]
    pub list_stats: bool,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    let args = Args::parse();
    debug!("Parsed CLI arguments: {:?}", args);
    args
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    if let Some(format) = &args.log_format {
        match format.to_lowercase().as_str() {
            "text" | "json" => {}
            _ => return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Valid options: text, json", format
            )),
        }
    }

    if let Some(ref level) = args.log_file_level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => return Err(anyhow::anyhow!(
                "Invalid log file level '{}'. Valid levels: error, warn, info, debug, trace", level
            )),
        }
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(anyhow::anyhow!(
            "--log-file-level requires --log-file to be specified"
        ));
    }

    Ok(())
}
