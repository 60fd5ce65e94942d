//! Chart-data contract
//!
//! Anything that can be drawn as a bar chart: an ordered series of labelled
//! values plus a title that the caller sets exactly once before it is read.

use std::fmt;
use serde::Serialize;
use crate::error::{AnalystError, AnalystResult};

/// One bar of a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChartValue {
    pub label: String,
    pub value: u64,
}

impl BarChartValue {
    pub fn new<S: Into<String>>(label: S, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Capability set required by the chart renderer and the report assembler
pub trait BarChartable: fmt::Debug {
    /// Bars in the order they must be drawn
    fn ordered_bar_chart_values(&self) -> Vec<BarChartValue>;

    /// Set the human-readable title; fails if already set or empty
    fn set_title(&mut self, title: &str) -> AnalystResult<()>;

    /// Read the title; fails if it was never set
    fn title(&self) -> AnalystResult<&str>;
}

/// Set-once title storage shared by every statistic result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartTitle(Option<String>);

impl ChartTitle {
    pub fn set(&mut self, title: &str) -> AnalystResult<()> {
        if title.trim().is_empty() {
            return Err(AnalystError::invariant_violation("chart title must not be empty"));
        }
        if let Some(existing) = &self.0 {
            return Err(AnalystError::invariant_violation(format!(
                "chart title already set to '{}'",
                existing
            )));
        }
        self.0 = Some(title.to_string());
        Ok(())
    }

    pub fn get(&self) -> AnalystResult<&str> {
        self.0
            .as_deref()
            .ok_or_else(|| AnalystError::invariant_violation("chart title read before it was set"))
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}
