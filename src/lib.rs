//! Harbor registry push analytics
//!
//! Reads the CSV exports of a Harbor container registry, rebuilds the
//! project / repository / tag / access-log hierarchy in memory, computes
//! push statistics and renders them as bar charts in a PDF report.

pub mod app;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;
pub mod registry;
pub mod stats;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{AnalystError, AnalystResult};
pub use registry::{Registry, RegistryBuilder};
