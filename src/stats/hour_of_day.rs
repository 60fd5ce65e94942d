//! Pushes grouped by the hour of day they happened in

use std::collections::BTreeMap;
use chrono::{NaiveDateTime, Timelike};
use log::debug;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{AnalystError, AnalystResult};
use crate::output::chartable::{BarChartValue, BarChartable, ChartTitle};
use crate::registry::{Operation, Registry};
use super::{unbounded_start, ConfigValue, StatsParameters};

pub const METHOD_NAME: &str = "PushesByHourOfDay";

#[derive(Debug, Clone, PartialEq)]
pub struct HourOfDayParameters {
    pub start_date: NaiveDateTime,
}

impl Default for HourOfDayParameters {
    fn default() -> Self {
        Self { start_date: unbounded_start() }
    }
}

impl StatsParameters for HourOfDayParameters {
    fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    fn set_start_date(&mut self, start_date: NaiveDateTime) {
        self.start_date = start_date;
    }

    fn set_parameter(&mut self, name: &str, _value: ConfigValue) -> AnalystResult<()> {
        Err(AnalystError::configuration(format!(
            "{} does not accept parameter {}",
            METHOD_NAME, name
        )))
    }

    fn validate(&self) -> AnalystResult<()> {
        Ok(())
    }
}

/// Push count for one hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourCount {
    pub hour: u32,
    pub count: u64,
}

/// Hours with at least one push, ascending by hour
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushesByHourOfDay {
    data: Vec<HourCount>,
    title: ChartTitle,
}

impl PushesByHourOfDay {
    pub fn entries(&self) -> &[HourCount] {
        &self.data
    }

    pub fn total(&self) -> u64 {
        self.data.iter().map(|entry| entry.count).sum()
    }
}

impl BarChartable for PushesByHourOfDay {
    fn ordered_bar_chart_values(&self) -> Vec<BarChartValue> {
        self.data
            .iter()
            .map(|entry| BarChartValue::new(format!("{}:00", entry.hour), entry.count))
            .collect()
    }

    fn set_title(&mut self, title: &str) -> AnalystResult<()> {
        self.title.set(title)
    }

    fn title(&self) -> AnalystResult<&str> {
        self.title.get()
    }
}

impl Registry {
    /// Count pushes since the start date per hour of day
    pub fn pushes_by_hour_of_day(
        &self,
        params: &HourOfDayParameters,
        diagnostics: &mut Diagnostics,
    ) -> AnalystResult<PushesByHourOfDay> {
        debug!("Analyse :: {} :: {:?}", METHOD_NAME, params);
        params.validate()?;

        let mut per_hour: BTreeMap<u32, u64> = BTreeMap::new();
        let mut excluded = 0;

        for (_, push) in self.logs(Operation::Push) {
            if !push.is_since(params.start_date) {
                excluded += 1;
                continue;
            }
            *per_hour.entry(push.timestamp.hour()).or_insert(0) += 1;
        }

        if excluded > 0 {
            diagnostics.note(
                DiagnosticKind::ExcludedByStartDate { count: excluded },
                format!("{}: ignored {} pushes before {}", METHOD_NAME, excluded, params.start_date),
            );
        }

        Ok(PushesByHourOfDay {
            data: per_hour
                .into_iter()
                .map(|(hour, count)| HourCount { hour, count })
                .collect(),
            title: ChartTitle::default(),
        })
    }
}
