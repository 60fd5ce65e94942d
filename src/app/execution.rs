//! Report run: bind charts, build the registry, aggregate, render

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;
use log::{debug, info};
use crate::config::AnalystConfig;
use crate::diagnostics::Diagnostics;
use crate::input;
use crate::output::{self, ChartArtifact, ChartStyle, ReportHeader};
use crate::registry::{Operation, RegistryBuilder};
use crate::stats::{self, STATS_METHODS};

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report_path: PathBuf,
    pub charts: Vec<ChartArtifact>,
    /// Recoverable data problems seen while building and aggregating
    pub warnings: usize,
}

/// Run every configured chart and write the report
///
/// `now` anchors every chart's time period and the report's creation date.
pub fn run_report(config: &AnalystConfig, now: NaiveDateTime) -> Result<RunSummary> {
    let plan = stats::bind_charts(&config.charts, now)?;
    info!("Bound {} charts", plan.len());

    let records = input::read_record_sets(&config.input.directory, &config.input.files())?;
    let mut diagnostics = Diagnostics::new();
    let registry = RegistryBuilder::build(&records, &mut diagnostics)?;
    let mut warnings = diagnostics.warning_count();
    diagnostics.drain_to_log("build");
    info!(
        "Registry holds {} projects, {} repositories, {} pushes",
        registry.projects.len(),
        registry.repository_count(),
        registry.log_count(Operation::Push)
    );

    // every statistic succeeds before anything is written
    let mut results = Vec::with_capacity(plan.len());
    for chart in &plan {
        let chartable = chart.call(&registry, &mut diagnostics)?;
        warnings += diagnostics.warning_count();
        diagnostics.drain_to_log(chart.method().name());
        results.push((chartable.title()?.to_string(), chartable.ordered_bar_chart_values()));
    }

    let output_dir = &config.output.directory;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let style = ChartStyle {
        width: config.output.chart_width,
        height: config.output.chart_height,
        ..ChartStyle::default()
    };

    let mut charts = Vec::with_capacity(results.len());
    for (index, (title, values)) in results.into_iter().enumerate() {
        let image_path = output::write_bar_chart(&values, &style, output_dir, index)?;
        debug!("Chart {} '{}' has {} bars", index, title, values.len());
        charts.push(ChartArtifact {
            title,
            image_path,
            pixel_width: style.width,
            pixel_height: style.height,
            values,
        });
    }

    let header = ReportHeader {
        title: config.report.title.clone(),
        created: now,
        description: config.report.description.clone(),
    };
    let report_path = config.output.report_path();
    output::write_report(&report_path, &header, &charts)?;

    Ok(RunSummary {
        report_path,
        charts,
        warnings,
    })
}

/// Print one table per chart to stdout
pub fn print_summary(summary: &RunSummary) {
    for chart in &summary.charts {
        println!("{}", output::format_chart_summary(&chart.title, &chart.values));
    }
    println!("Report: {}", summary.report_path.display());
    if summary.warnings > 0 {
        println!("{} data warnings, see log for details", summary.warnings);
    }
}

/// Table of the statistics that charts can name
pub fn format_stats_list() -> String {
    let rows: Vec<Vec<String>> = STATS_METHODS
        .iter()
        .map(|method| {
            let parameters: Vec<String> = method
                .parameters
                .iter()
                .map(|p| {
                    if p.aliases.is_empty() {
                        p.name.to_string()
                    } else {
                        format!("{} ({})", p.name, p.aliases.join(", "))
                    }
                })
                .collect();
            vec![
                method.name.to_string(),
                method.aliases.join(", "),
                if parameters.is_empty() { "-".to_string() } else { parameters.join(", ") },
                method.description.to_string(),
            ]
        })
        .collect();

    output::format_compact_table(&["Statistic", "Aliases", "Parameters", "Description"], &rows)
}
