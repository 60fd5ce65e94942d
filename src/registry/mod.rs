//! In-memory model of a Harbor registry
//!
//! A [`Registry`] owns its projects, each project owns its repositories,
//! each repository owns its tags, and each tag owns the pull and push logs
//! recorded against it. Users are held once by the registry and referenced
//! from logs by id.
//!
//! For the image `registry.example.com/coreapp/base:0.2.1` the project is
//! `coreapp`, the repository is `base` and the tag is `0.2.1`.

pub mod builder;

use std::collections::HashMap;
use chrono::NaiveDateTime;

pub use builder::RegistryBuilder;

pub type UserId = i64;
pub type LogId = i64;
pub type ProjectId = i64;
pub type RepositoryId = i64;

/// Timestamp format used by every access log row
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A registry user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// Which kind of access a log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Pull,
    Push,
}

/// A logged pull or push against a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub id: LogId,
    pub operation: Operation,
    pub timestamp: NaiveDateTime,
    /// Acting user, `None` if the id did not resolve when the registry was built
    pub user: Option<UserId>,
}

impl Log {
    /// True unless the log happened strictly before `start`
    pub fn is_since(&self, start: NaiveDateTime) -> bool {
        self.timestamp >= start
    }
}

/// A named image version inside a repository
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tag {
    pub name: String,
    pub pulls: HashMap<LogId, Log>,
    pub pushes: HashMap<LogId, Log>,
}

impl Tag {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// File a log under its operation, replacing any log with the same id
    pub fn record(&mut self, log: Log) {
        let logs = match log.operation {
            Operation::Pull => &mut self.pulls,
            Operation::Push => &mut self.pushes,
        };
        logs.insert(log.id, log);
    }

    pub fn logs(&self, operation: Operation) -> impl Iterator<Item = &Log> {
        match operation {
            Operation::Pull => self.pulls.values(),
            Operation::Push => self.pushes.values(),
        }
    }
}

/// A repository inside a project
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Repository {
    pub id: RepositoryId,
    pub name: String,
    pub tags: HashMap<String, Tag>,
}

impl Repository {
    pub fn new<S: Into<String>>(id: RepositoryId, name: S) -> Self {
        Self {
            id,
            name: name.into(),
            tags: HashMap::new(),
        }
    }

    /// Get a tag, creating it empty if it does not exist yet
    pub fn tag_mut(&mut self, name: &str) -> &mut Tag {
        self.tags.entry(name.to_string()).or_insert_with(|| Tag::new(name))
    }

    /// All logs of one operation across every tag
    pub fn logs(&self, operation: Operation) -> impl Iterator<Item = &Log> {
        self.tags.values().flat_map(move |tag| tag.logs(operation))
    }
}

/// A project and the repositories it owns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Raw `op_time` of the project's create event, if one was logged
    pub creation_date: Option<String>,
    pub creator: Option<UserId>,
    pub repositories: HashMap<String, Repository>,
}

impl Project {
    pub fn new<S: Into<String>>(id: ProjectId, name: S) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Root of the model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Registry {
    pub projects: HashMap<ProjectId, Project>,
    pub users: HashMap<UserId, User>,
}

impl Registry {
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.projects.values().flat_map(|project| project.repositories.values())
    }

    /// All logs of one operation in the registry, paired with their repository
    pub fn logs(&self, operation: Operation) -> impl Iterator<Item = (&Repository, &Log)> {
        self.repositories()
            .flat_map(move |repository| repository.logs(operation).map(move |log| (repository, log)))
    }

    pub fn repository_count(&self) -> usize {
        self.repositories().count()
    }

    pub fn tag_count(&self) -> usize {
        self.repositories().map(|repository| repository.tags.len()).sum()
    }

    pub fn log_count(&self, operation: Operation) -> usize {
        self.logs(operation).count()
    }
}

/// Parse an access log timestamp
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
}
