//! Application orchestration module

pub mod initialization;
pub mod execution;

pub use initialization::{load_configuration, configure_logging};
pub use execution::{format_stats_list, print_summary, run_report, RunSummary};
