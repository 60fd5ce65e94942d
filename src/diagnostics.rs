//! Recoverable diagnostics
//!
//! The registry builder and the statistics never log data-level events
//! themselves. They append to a [`Diagnostics`] collection that the caller
//! owns, and the orchestrator decides how to surface them.

use std::fmt;
use log::{debug, warn};

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Input was skipped or could not be resolved
    Warning,
    /// Informational, e.g. how many pushes a filter excluded
    Note,
}

/// What kind of event was recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnresolvedUser { user_id: i64 },
    UnresolvedProject { project_id: i64 },
    UnresolvedRepository { repository_name: String },
    SkippedOperation { operation: String },
    DuplicateRepositoryName { repository_name: String },
    ExcludedByStartDate { count: usize },
    IgnoredByName { name: String },
}

/// A single recorded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Append-only collection of diagnostics
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn<S: Into<String>>(&mut self, kind: DiagnosticKind, message: S) {
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        });
    }

    pub fn note<S: Into<String>>(&mut self, kind: DiagnosticKind, message: S) {
        self.entries.push(Diagnostic {
            severity: Severity::Note,
            kind,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Forward every entry to the logger and empty the collection
    pub fn drain_to_log(&mut self, phase: &str) {
        for diagnostic in self.entries.drain(..) {
            match diagnostic.severity {
                Severity::Warning => warn!("{}: {}", phase, diagnostic.message),
                Severity::Note => debug!("{}: {}", phase, diagnostic.message),
            }
        }
    }
}
