//! Analyst Error Types
//!
//! Every failure that aborts a report run. Recoverable problems (a log row
//! pointing at an unknown user or repository) are not errors; they are
//! collected as [`crate::diagnostics::Diagnostic`] values instead.

use thiserror::Error;

/// Result type for analyst operations
pub type AnalystResult<T> = Result<T, AnalystError>;

/// Fatal error taxonomy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalystError {
    /// A required field is missing, not numeric, or not a valid timestamp
    #[error("Malformed record in {source_name} line {line}: {message}")]
    MalformedRecord {
        source_name: String,
        line: usize,
        message: String,
    },

    /// Statistic parameters failed validation
    #[error("Invalid parameters for {method}: {message}")]
    InvalidParameters { method: String, message: String },

    /// A programming defect, e.g. reading a chart title that was never set
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// Configuration could not be loaded or bound
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// An input file could not be read
    #[error("Input error for {path}: {message}")]
    Input { path: String, message: String },

    /// Chart or report output failed
    #[error("Output error: {message}")]
    Output { message: String },
}

impl AnalystError {
    /// Create a malformed record error
    pub fn malformed_record<S: Into<String>, M: Into<String>>(source_name: S, line: usize, message: M) -> Self {
        Self::MalformedRecord {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid parameters error
    pub fn invalid_parameters<S: Into<String>, M: Into<String>>(method: S, message: M) -> Self {
        Self::InvalidParameters {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Create an invariant violation error
    pub fn invariant_violation<S: Into<String>>(message: S) -> Self {
        Self::InvariantViolation { message: message.into() }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create an input error
    pub fn input<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Input {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output<S: Into<String>>(message: S) -> Self {
        Self::Output { message: message.into() }
    }
}
