//! Push statistics over a built registry
//!
//! Every statistic walks projects, repositories, tags and their push logs,
//! drops logs that happened strictly before its start date, groups what is
//! left, sorts deterministically and optionally truncates. Statistics never
//! mutate the registry; notes about what they excluded go to the caller's
//! [`Diagnostics`](crate::diagnostics::Diagnostics).

pub mod binding;
pub mod hour_of_day;
pub mod methods;
pub mod top_repositories;
pub mod top_users;

use std::collections::HashMap;
use std::fmt;
use chrono::NaiveDateTime;
use crate::error::{AnalystError, AnalystResult};

pub use binding::{bind_charts, ChartStatsMethod};
pub use hour_of_day::{HourOfDayParameters, PushesByHourOfDay};
pub use methods::{find_method, StatsMethod, StatsMethodDescriptor, STATS_METHODS};
pub use top_repositories::{PushesPerRepository, TopRepositoriesParameters};
pub use top_users::{PushesPerUser, TopUsersParameters};

/// A configuration value bound onto a statistic parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    List(Vec<String>),
}

impl ConfigValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::String(_) => "string",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::List(_) => "list of strings",
        }
    }

    pub fn into_integer(self, parameter: &str) -> AnalystResult<i64> {
        match self {
            ConfigValue::Integer(value) => Ok(value),
            other => Err(type_mismatch(parameter, "integer", &other)),
        }
    }

    /// Lists are taken as-is, a single string becomes a one-element list
    pub fn into_string_list(self, parameter: &str) -> AnalystResult<Vec<String>> {
        match self {
            ConfigValue::List(values) => Ok(values),
            ConfigValue::String(value) => Ok(vec![value]),
            other => Err(type_mismatch(parameter, "list of strings", &other)),
        }
    }
}

fn type_mismatch(parameter: &str, expected: &str, found: &ConfigValue) -> AnalystError {
    AnalystError::configuration(format!(
        "parameter {} must be of type {} but is of type {}",
        parameter,
        expected,
        found.type_name()
    ))
}

/// Parameter set of one statistic
pub trait StatsParameters: fmt::Debug {
    fn start_date(&self) -> NaiveDateTime;

    fn set_start_date(&mut self, start_date: NaiveDateTime);

    /// Assign a parameter by its canonical name
    fn set_parameter(&mut self, name: &str, value: ConfigValue) -> AnalystResult<()>;

    fn validate(&self) -> AnalystResult<()>;
}

/// Lower bound used when no start date was configured
pub fn unbounded_start() -> NaiveDateTime {
    NaiveDateTime::MIN
}

/// A label with how many pushes it accumulated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Sort by count descending, ties by label ascending, then keep `max` entries
pub(crate) fn rank_descending<I>(counts: I, max: usize) -> Vec<LabelCount>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let mut ranked: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked.truncate(max);
    ranked
}

/// Validate a `maxElements` parameter and convert it to a length
pub(crate) fn validated_max_elements(method: &str, max_elements: i64) -> AnalystResult<usize> {
    if max_elements < 1 {
        return Err(AnalystError::invalid_parameters(method, "maxElements is less than one"));
    }
    usize::try_from(max_elements)
        .map_err(|_| AnalystError::invalid_parameters(method, "maxElements is too large"))
}

pub(crate) fn increment(counts: &mut HashMap<String, u64>, label: &str) {
    *counts.entry(label.to_string()).or_insert(0) += 1;
}
