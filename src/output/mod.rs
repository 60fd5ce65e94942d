//! Chart data, chart images, the PDF report and console summaries

pub mod chart;
pub mod chartable;
pub mod pdf;
pub mod reports;

pub use chart::{render_bar_chart, write_bar_chart, ChartStyle};
pub use chartable::{BarChartValue, BarChartable, ChartTitle};
pub use pdf::{write_report, ChartArtifact, ReportHeader, DEFAULT_REPORT_TITLE};
pub use reports::{format_chart_summary, format_compact_table};
