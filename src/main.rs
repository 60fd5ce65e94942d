use anyhow::Result;
use chrono::Local;
use std::process;
use log::{error, info};
use harbor_analyst::{app, cli, logging};

fn main() {
    if let Err(e) = run() {
        error!("Application error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args();

    cli::validate_args(&args)?;

    if args.list_stats {
        print!("{}", app::format_stats_list());
        return Ok(());
    }

    let config = app::load_configuration(&args)?;

    let log_config = app::configure_logging(&args, &config.logging)?;
    logging::init_logger(log_config)?;

    if let Some(source) = config.source() {
        info!("Loaded configuration from {}", source.display());
    }

    let summary = app::run_report(&config, Local::now().naive_local())?;
    info!("Report written to {}", summary.report_path.display());

    if args.summary {
        app::print_summary(&summary);
    }

    Ok(())
}
