//! Binding chart configuration onto statistics
//!
//! A chart entry names a statistic, a title template and a lookback period;
//! any other key is a parameter of the named statistic. Binding resolves
//! everything up front so that a bad configuration aborts before the first
//! statistic runs.

use chrono::{Duration, NaiveDateTime};
use log::debug;
use serde_yaml::{Mapping, Value};
use crate::diagnostics::Diagnostics;
use crate::error::{AnalystError, AnalystResult};
use crate::output::chartable::BarChartable;
use crate::registry::Registry;
use super::methods::{find_method, StatsMethod};
use super::ConfigValue;

pub const STATS_METHOD_NAME_KEY: &str = "statsMethodName";
pub const TITLE_TEMPLATE_KEY: &str = "titleTemplate";
pub const TIME_PERIOD_KEY: &str = "timePeriodInDays";

pub const START_DATE_PLACEHOLDER: &str = "{{ startDate }}";
pub const TITLE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A statistic with bound parameters and the title its chart will carry
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStatsMethod {
    method: StatsMethod,
    title: String,
}

impl ChartStatsMethod {
    pub fn new<S: Into<String>>(method: StatsMethod, title: S) -> Self {
        Self {
            method,
            title: title.into(),
        }
    }

    pub fn method(&self) -> &StatsMethod {
        &self.method
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Run the statistic and stamp its title
    pub fn call(&self, registry: &Registry, diagnostics: &mut Diagnostics) -> AnalystResult<Box<dyn BarChartable>> {
        let mut chartable = self.method.call(registry, diagnostics)?;
        chartable.set_title(&self.title)?;
        Ok(chartable)
    }
}

/// `now` minus the given number of days, `None` when out of range
pub fn start_date_from_period(now: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    Duration::try_days(days).and_then(|period| now.checked_sub_signed(period))
}

/// Replace every start date placeholder in a title template
pub fn format_title(template: &str, start_date: NaiveDateTime) -> String {
    template.replace(
        START_DATE_PLACEHOLDER,
        &start_date.format(TITLE_DATE_FORMAT).to_string(),
    )
}

/// Convert a YAML value into a parameter value
pub fn config_value(key: &str, value: &Value) -> AnalystResult<ConfigValue> {
    match value {
        Value::String(s) => Ok(ConfigValue::String(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .map(ConfigValue::Integer)
            .ok_or_else(|| AnalystError::configuration(format!("parameter {} must be an integer, got {}", key, n))),
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    AnalystError::configuration(format!(
                        "value {:?} in list parameter {} must be a string",
                        item, key
                    ))
                })
            })
            .collect::<AnalystResult<Vec<_>>>()
            .map(ConfigValue::List),
        other => Err(AnalystError::configuration(format!(
            "parameter {} has unsupported value {:?}",
            key, other
        ))),
    }
}

fn chart_error(index: usize, message: String) -> AnalystError {
    AnalystError::configuration(format!("chart #{}: {}", index + 1, message))
}

/// Bind one chart entry
pub fn bind_chart(index: usize, chart: &Mapping, now: NaiveDateTime) -> AnalystResult<ChartStatsMethod> {
    let method_name = chart
        .get(STATS_METHOD_NAME_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| chart_error(index, format!("{} must be a string", STATS_METHOD_NAME_KEY)))?;

    let descriptor = find_method(method_name)
        .ok_or_else(|| chart_error(index, format!("unknown statistic \"{}\"", method_name)))?;
    let mut method = descriptor.instantiate();

    let days = chart
        .get(TIME_PERIOD_KEY)
        .and_then(Value::as_i64)
        .ok_or_else(|| chart_error(index, format!("{} must be an integer", TIME_PERIOD_KEY)))?;
    if days < 0 {
        return Err(chart_error(index, format!("{} must not be negative", TIME_PERIOD_KEY)));
    }
    let start_date = start_date_from_period(now, days)
        .ok_or_else(|| chart_error(index, format!("{} of {} is out of range", TIME_PERIOD_KEY, days)))?;
    debug!("Set start date of {} to {} from {}", descriptor.name, start_date, TIME_PERIOD_KEY);
    method.parameters_mut().set_start_date(start_date);

    for (key, value) in chart {
        let key = key
            .as_str()
            .ok_or_else(|| chart_error(index, format!("parameter name {:?} must be a string", key)))?;
        if matches!(key, STATS_METHOD_NAME_KEY | TITLE_TEMPLATE_KEY | TIME_PERIOD_KEY) {
            continue;
        }

        let canonical = descriptor.canonical_parameter(key).ok_or_else(|| {
            chart_error(index, format!("{} has no parameter named {}", descriptor.name, key))
        })?;
        let value = config_value(key, value).map_err(|e| chart_error(index, e.to_string()))?;
        debug!("Set {} = {:?} on {}", canonical, value, descriptor.name);
        method
            .parameters_mut()
            .set_parameter(canonical, value)
            .map_err(|e| chart_error(index, e.to_string()))?;
    }

    let template = chart
        .get(TITLE_TEMPLATE_KEY)
        .and_then(Value::as_str)
        .filter(|template| !template.trim().is_empty())
        .ok_or_else(|| chart_error(index, format!("{} must be a non-empty string", TITLE_TEMPLATE_KEY)))?;
    let title = format_title(template, method.parameters().start_date());
    debug!("Set title of {} to {}", descriptor.name, title);

    Ok(ChartStatsMethod::new(method, title))
}

/// Bind every chart entry, in order
pub fn bind_charts(charts: &[Mapping], now: NaiveDateTime) -> AnalystResult<Vec<ChartStatsMethod>> {
    charts
        .iter()
        .enumerate()
        .map(|(index, chart)| bind_chart(index, chart, now))
        .collect()
}
