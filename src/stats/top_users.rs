//! Users ranked by how many pushes they performed

use std::collections::{BTreeSet, HashMap, HashSet};
use chrono::NaiveDateTime;
use log::debug;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{AnalystError, AnalystResult};
use crate::output::chartable::{BarChartValue, BarChartable, ChartTitle};
use crate::registry::{Operation, Registry};
use super::{increment, rank_descending, unbounded_start, validated_max_elements, ConfigValue, LabelCount, StatsParameters};

pub const METHOD_NAME: &str = "TopPushingUsers";

pub const MAX_ELEMENTS: &str = "maxElements";
pub const IGNORE_USER_NAMES: &str = "ignoreUserNames";

#[derive(Debug, Clone, PartialEq)]
pub struct TopUsersParameters {
    pub start_date: NaiveDateTime,
    pub max_elements: i64,
    pub ignore_user_names: Vec<String>,
}

impl Default for TopUsersParameters {
    fn default() -> Self {
        Self {
            start_date: unbounded_start(),
            max_elements: 0,
            ignore_user_names: Vec::new(),
        }
    }
}

impl StatsParameters for TopUsersParameters {
    fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    fn set_start_date(&mut self, start_date: NaiveDateTime) {
        self.start_date = start_date;
    }

    fn set_parameter(&mut self, name: &str, value: ConfigValue) -> AnalystResult<()> {
        match name {
            MAX_ELEMENTS => self.max_elements = value.into_integer(name)?,
            IGNORE_USER_NAMES => self.ignore_user_names = value.into_string_list(name)?,
            _ => {
                return Err(AnalystError::configuration(format!(
                    "{} does not accept parameter {}",
                    METHOD_NAME, name
                )))
            }
        }
        Ok(())
    }

    fn validate(&self) -> AnalystResult<()> {
        validated_max_elements(METHOD_NAME, self.max_elements).map(|_| ())
    }
}

/// Users with their push counts, most active first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushesPerUser {
    data: Vec<LabelCount>,
    title: ChartTitle,
}

impl PushesPerUser {
    pub fn entries(&self) -> &[LabelCount] {
        &self.data
    }
}

impl BarChartable for PushesPerUser {
    fn ordered_bar_chart_values(&self) -> Vec<BarChartValue> {
        self.data
            .iter()
            .map(|entry| BarChartValue::new(entry.label.clone(), entry.count))
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
    /// The `max_elements` users with the most pushes since the start date
    ///
    /// Pushes whose user did not resolve when the registry was built are
    /// not attributed to anyone.
    pub fn top_pushing_users(
        &self,
        params: &TopUsersParameters,
        diagnostics: &mut Diagnostics,
    ) -> AnalystResult<PushesPerUser> {
        debug!("Analyse :: {} :: {:?}", METHOD_NAME, params);
        let max_elements = validated_max_elements(METHOD_NAME, params.max_elements)?;
        let ignored: HashSet<&str> = params.ignore_user_names.iter().map(String::as_str).collect();

        let mut counts: HashMap<String, u64> = HashMap::new();
        let mut ignored_seen: BTreeSet<&str> = BTreeSet::new();
        let mut excluded = 0;
        let mut anonymous = 0;

        for (_, push) in self.logs(Operation::Push) {
            let Some(user) = push.user.and_then(|id| self.user(id)) else {
                anonymous += 1;
                continue;
            };
            if ignored.contains(user.name.as_str()) {
                ignored_seen.insert(user.name.as_str());
                continue;
            }
            if !push.is_since(params.start_date) {
                excluded += 1;
                continue;
            }
            increment(&mut counts, &user.name);
        }

        for name in ignored_seen {
            diagnostics.note(
                DiagnosticKind::IgnoredByName { name: name.to_string() },
                format!("{}: ignore user {}", METHOD_NAME, name),
            );
        }
        if excluded > 0 {
            diagnostics.note(
                DiagnosticKind::ExcludedByStartDate { count: excluded },
                format!("{}: ignored {} pushes before {}", METHOD_NAME, excluded, params.start_date),
            );
        }
        if anonymous > 0 {
            debug!("{}: {} pushes without a known user", METHOD_NAME, anonymous);
        }

        Ok(PushesPerUser {
            data: rank_descending(counts, max_elements),
            title: ChartTitle::default(),
        })
    }
}
