//! Statistic registry
//!
//! Maps the names used in configuration files onto the typed statistics
//! this crate implements. Each entry advertises its parameters so that
//! configuration keys can be checked and canonicalised before binding.

use crate::diagnostics::Diagnostics;
use crate::error::AnalystResult;
use crate::output::chartable::BarChartable;
use crate::registry::Registry;
use super::{hour_of_day, top_repositories, top_users};
use super::{HourOfDayParameters, StatsParameters, TopRepositoriesParameters, TopUsersParameters};

/// Value shape a parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Integer,
    StringList,
}

/// A parameter a statistic accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: ParameterKind,
    pub description: &'static str,
}

impl ParameterDescriptor {
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

/// A statistic that can be requested from configuration
#[derive(Debug, Clone, Copy)]
pub struct StatsMethodDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub parameters: &'static [ParameterDescriptor],
    constructor: fn() -> StatsMethod,
}

impl StatsMethodDescriptor {
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }

    /// Resolve a parameter name or alias to its canonical name
    pub fn canonical_parameter(&self, name: &str) -> Option<&'static str> {
        self.parameters.iter().find(|p| p.matches(name)).map(|p| p.name)
    }

    /// A statistic with default parameters
    pub fn instantiate(&self) -> StatsMethod {
        (self.constructor)()
    }
}

const MAX_ELEMENTS_PARAMETER: ParameterDescriptor = ParameterDescriptor {
    name: top_repositories::MAX_ELEMENTS,
    aliases: &["MaxNumberOfElements"],
    kind: ParameterKind::Integer,
    description: "Number of bars to show (at least 1)",
};

fn hour_of_day_method() -> StatsMethod {
    StatsMethod::PushesByHourOfDay(HourOfDayParameters::default())
}

fn top_repositories_method() -> StatsMethod {
    StatsMethod::TopPushedRepositories(TopRepositoriesParameters::default())
}

fn top_users_method() -> StatsMethod {
    StatsMethod::TopPushingUsers(TopUsersParameters::default())
}

/// Every statistic known to the analyst
pub const STATS_METHODS: &[StatsMethodDescriptor] = &[
    StatsMethodDescriptor {
        name: hour_of_day::METHOD_NAME,
        aliases: &["GetPushesPerDaytimes"],
        description: "Number of pushes per hour of day",
        parameters: &[],
        constructor: hour_of_day_method,
    },
    StatsMethodDescriptor {
        name: top_repositories::METHOD_NAME,
        aliases: &["GetMostPushedToRepositories"],
        description: "Repositories with the most pushes",
        parameters: &[
            MAX_ELEMENTS_PARAMETER,
            ParameterDescriptor {
                name: top_repositories::IGNORE_REPOSITORY_NAMES,
                aliases: &["RepositoriesToIgnore"],
                kind: ParameterKind::StringList,
                description: "Repository names to leave out",
            },
        ],
        constructor: top_repositories_method,
    },
    StatsMethodDescriptor {
        name: top_users::METHOD_NAME,
        aliases: &["GetMostPushingUsers"],
        description: "Users who pushed the most",
        parameters: &[
            MAX_ELEMENTS_PARAMETER,
            ParameterDescriptor {
                name: top_users::IGNORE_USER_NAMES,
                aliases: &["UsersToIgnore"],
                kind: ParameterKind::StringList,
                description: "User names to leave out",
            },
        ],
        constructor: top_users_method,
    },
];

/// Look a statistic up by name or alias
pub fn find_method(name: &str) -> Option<&'static StatsMethodDescriptor> {
    STATS_METHODS.iter().find(|method| method.matches(name))
}

/// A statistic together with its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub enum StatsMethod {
    PushesByHourOfDay(HourOfDayParameters),
    TopPushedRepositories(TopRepositoriesParameters),
    TopPushingUsers(TopUsersParameters),
}

impl StatsMethod {
    pub fn name(&self) -> &'static str {
        match self {
            StatsMethod::PushesByHourOfDay(_) => hour_of_day::METHOD_NAME,
            StatsMethod::TopPushedRepositories(_) => top_repositories::METHOD_NAME,
            StatsMethod::TopPushingUsers(_) => top_users::METHOD_NAME,
        }
    }

    pub fn parameters(&self) -> &dyn StatsParameters {
        match self {
            StatsMethod::PushesByHourOfDay(params) => params,
            StatsMethod::TopPushedRepositories(params) => params,
            StatsMethod::TopPushingUsers(params) => params,
        }
    }

    pub fn parameters_mut(&mut self) -> &mut dyn StatsParameters {
        match self {
            StatsMethod::PushesByHourOfDay(params) => params,
            StatsMethod::TopPushedRepositories(params) => params,
            StatsMethod::TopPushingUsers(params) => params,
        }
    }

    /// Run the statistic against a registry
    pub fn call(&self, registry: &Registry, diagnostics: &mut Diagnostics) -> AnalystResult<Box<dyn BarChartable>> {
        let chartable: Box<dyn BarChartable> = match self {
            StatsMethod::PushesByHourOfDay(params) => Box::new(registry.pushes_by_hour_of_day(params, diagnostics)?),
            StatsMethod::TopPushedRepositories(params) => {
                Box::new(registry.top_pushed_repositories(params, diagnostics)?)
            }
            StatsMethod::TopPushingUsers(params) => Box::new(registry.top_pushing_users(params, diagnostics)?),
        };
        Ok(chartable)
    }
}
