//! Repositories ranked by how often they were pushed to

use std::collections::HashSet;
use chrono::NaiveDateTime;
use log::debug;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{AnalystError, AnalystResult};
use crate::output::chartable::{BarChartValue, BarChartable, ChartTitle};
use crate::registry::{Operation, Registry};
use super::{rank_descending, unbounded_start, validated_max_elements, ConfigValue, LabelCount, StatsParameters};

pub const METHOD_NAME: &str = "TopPushedRepositories";

pub const MAX_ELEMENTS: &str = "maxElements";
pub const IGNORE_REPOSITORY_NAMES: &str = "ignoreRepositoryNames";

#[derive(Debug, Clone, PartialEq)]
pub struct TopRepositoriesParameters {
    pub start_date: NaiveDateTime,
    pub max_elements: i64,
    pub ignore_repository_names: Vec<String>,
}

impl Default for TopRepositoriesParameters {
    fn default() -> Self {
        Self {
            start_date: unbounded_start(),
            max_elements: 0,
            ignore_repository_names: Vec::new(),
        }
    }
}

impl StatsParameters for TopRepositoriesParameters {
    fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    fn set_start_date(&mut self, start_date: NaiveDateTime) {
        self.start_date = start_date;
    }

    fn set_parameter(&mut self, name: &str, value: ConfigValue) -> AnalystResult<()> {
        match name {
            MAX_ELEMENTS => self.max_elements = value.into_integer(name)?,
            IGNORE_REPOSITORY_NAMES => self.ignore_repository_names = value.into_string_list(name)?,
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

/// Repositories with their push counts, most pushed first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushesPerRepository {
    data: Vec<LabelCount>,
    title: ChartTitle,
}

impl PushesPerRepository {
    pub fn entries(&self) -> &[LabelCount] {
        &self.data
    }
}

impl BarChartable for PushesPerRepository {
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
    /// The `max_elements` most pushed-to repositories since the start date
    ///
    /// Every repository not on the ignore list gets an entry, including
    /// repositories without qualifying pushes.
    pub fn top_pushed_repositories(
        &self,
        params: &TopRepositoriesParameters,
        diagnostics: &mut Diagnostics,
    ) -> AnalystResult<PushesPerRepository> {
        debug!("Analyse :: {} :: {:?}", METHOD_NAME, params);
        let max_elements = validated_max_elements(METHOD_NAME, params.max_elements)?;
        let ignored: HashSet<&str> = params.ignore_repository_names.iter().map(String::as_str).collect();

        let mut counts = Vec::new();
        let mut excluded = 0;

        for repository in self.repositories() {
            if ignored.contains(repository.name.as_str()) {
                diagnostics.note(
                    DiagnosticKind::IgnoredByName { name: repository.name.clone() },
                    format!("{}: ignore repository {}", METHOD_NAME, repository.name),
                );
                continue;
            }

            let mut pushes = 0;
            for push in repository.logs(Operation::Push) {
                if push.is_since(params.start_date) {
                    pushes += 1;
                } else {
                    excluded += 1;
                }
            }
            counts.push((repository.name.clone(), pushes));
        }

        if excluded > 0 {
            diagnostics.note(
                DiagnosticKind::ExcludedByStartDate { count: excluded },
                format!("{}: ignored {} pushes before {}", METHOD_NAME, excluded, params.start_date),
            );
        }

        Ok(PushesPerRepository {
            data: rank_descending(counts, max_elements),
            title: ChartTitle::default(),
        })
    }
}
