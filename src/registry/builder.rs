//! Registry construction from flat export records
//!
//! Projects, repositories and users are read first. The access log is then
//! replayed: `create` rows stamp their project, `pull`/`push` rows are filed
//! under the tag they name (creating the tag on first sight), and everything
//! else is skipped with a warning.
//!
//! Any value that cannot be parsed aborts the build. References that simply
//! do not resolve are recorded in [`Diagnostics`] and the row is skipped,
//! except for a repository whose project is missing, which is fatal.

use std::collections::HashMap;
use log::{debug, info};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::AnalystResult;
use crate::input::{Record, RecordSets};
use super::{parse_timestamp, Log, Operation, Project, ProjectId, Registry, Repository, User, UserId};

/// Tag name Harbor writes for operations that are not tied to a tag
pub const UNTAGGED: &str = "N/A";

const CREATE_OPERATION: &str = "create";
const DELETE_OPERATION: &str = "delete";
const PULL_OPERATION: &str = "pull";
const PUSH_OPERATION: &str = "push";

/// How an access log row is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowAction {
    Create,
    Record(Operation),
    Skip,
}

fn classify(operation: &str, tag_name: &str) -> RowAction {
    if operation == CREATE_OPERATION {
        return RowAction::Create;
    }
    if tag_name == UNTAGGED {
        return RowAction::Skip;
    }
    match operation {
        PULL_OPERATION => RowAction::Record(Operation::Pull),
        PUSH_OPERATION => RowAction::Record(Operation::Push),
        _ => RowAction::Skip,
    }
}

/// Builds a [`Registry`] from the four export record sets
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    projects: HashMap<ProjectId, Project>,
    users: HashMap<UserId, User>,
    /// Repository name to owning project, used to resolve access log rows
    repository_index: HashMap<String, ProjectId>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the whole registry, discarding partial results on failure
    pub fn build(records: &RecordSets, diagnostics: &mut Diagnostics) -> AnalystResult<Registry> {
        let mut builder = Self::new();
        builder.add_projects(&records.projects)?;
        builder.add_repositories(&records.repositories, diagnostics)?;
        builder.add_users(&records.users)?;
        builder.replay_access_logs(&records.access_logs, diagnostics)?;
        Ok(builder.finish())
    }

    pub fn add_projects(&mut self, records: &[Record]) -> AnalystResult<()> {
        for record in records {
            let id = record.get_int("project_id")?;
            let name = record.get("name")?;
            self.projects.insert(id, Project::new(id, name));
        }
        debug!("Added {} projects", self.projects.len());
        Ok(())
    }

    pub fn add_repositories(&mut self, records: &[Record], diagnostics: &mut Diagnostics) -> AnalystResult<()> {
        for record in records {
            let id = record.get_int("repository_id")?;
            let name = record.get("name")?;
            let project_id = record.get_int("project_id")?;

            let project = self.projects.get_mut(&project_id).ok_or_else(|| {
                record.malformed(format!(
                    "repository '{}' references unknown project with ID {}",
                    name, project_id
                ))
            })?;

            debug!("Add repository {} to project with ID {}", name, project_id);
            project.repositories.insert(name.to_string(), Repository::new(id, name));

            if let Some(previous) = self.repository_index.insert(name.to_string(), project_id) {
                if previous != project_id {
                    diagnostics.warn(
                        DiagnosticKind::DuplicateRepositoryName { repository_name: name.to_string() },
                        format!(
                            "Repository name {} exists in projects {} and {}; access logs resolve to project {}",
                            name, previous, project_id, project_id
                        ),
                    );
                }
            }
        }
        Ok(())
    }

    pub fn add_users(&mut self, records: &[Record]) -> AnalystResult<()> {
        for record in records {
            let id = record.get_int("user_id")?;
            let name = record.get("username")?;
            self.users.insert(id, User { id, name: name.to_string() });
        }
        debug!("Added {} users", self.users.len());
        Ok(())
    }

    pub fn replay_access_logs(&mut self, records: &[Record], diagnostics: &mut Diagnostics) -> AnalystResult<()> {
        for record in records {
            self.replay_access_log(record, diagnostics)?;
        }
        Ok(())
    }

    fn replay_access_log(&mut self, record: &Record, diagnostics: &mut Diagnostics) -> AnalystResult<()> {
        let operation = record.get("operation")?;
        let tag_name = record.get("repo_tag")?;

        let action = classify(operation, tag_name);
        if action == RowAction::Skip {
            let reason = if operation == DELETE_OPERATION {
                "delete operations are not modelled".to_string()
            } else if tag_name == UNTAGGED {
                format!("{} operation without a tag", operation)
            } else {
                format!("unknown operation '{}'", operation)
            };
            diagnostics.warn(
                DiagnosticKind::SkippedOperation { operation: operation.to_string() },
                format!("Skip {} line {}: {}", record.source(), record.line(), reason),
            );
            return Ok(());
        }

        let user = self.resolve_user(record, diagnostics)?;

        match action {
            RowAction::Create => self.apply_create(record, user, diagnostics),
            RowAction::Record(operation) => self.apply_log(record, operation, tag_name, user, diagnostics),
            RowAction::Skip => Ok(()),
        }
    }

    /// A non-numeric user id is fatal, an unknown one is only a warning
    fn resolve_user(&self, record: &Record, diagnostics: &mut Diagnostics) -> AnalystResult<Option<UserId>> {
        let user_id = record.get_int("user_id")?;
        if self.users.contains_key(&user_id) {
            return Ok(Some(user_id));
        }
        diagnostics.warn(
            DiagnosticKind::UnresolvedUser { user_id },
            format!("Failed to find user with ID {} ({} line {})", user_id, record.source(), record.line()),
        );
        Ok(None)
    }

    fn apply_create(&mut self, record: &Record, user: Option<UserId>, diagnostics: &mut Diagnostics) -> AnalystResult<()> {
        let project_id = record.get_int("project_id")?;
        let creation_date = record.get("op_time")?;

        match self.projects.get_mut(&project_id) {
            Some(project) => {
                project.creation_date = Some(creation_date.to_string());
                project.creator = user;
            }
            None => diagnostics.warn(
                DiagnosticKind::UnresolvedProject { project_id },
                format!(
                    "Failed to find project with ID {} for create event ({} line {})",
                    project_id,
                    record.source(),
                    record.line()
                ),
            ),
        }
        Ok(())
    }

    fn apply_log(
        &mut self,
        record: &Record,
        operation: Operation,
        tag_name: &str,
        user: Option<UserId>,
        diagnostics: &mut Diagnostics,
    ) -> AnalystResult<()> {
        let id = record.get_int("log_id")?;
        let raw_timestamp = record.get("op_time")?;
        let timestamp = parse_timestamp(raw_timestamp)
            .map_err(|e| record.malformed(format!("op_time '{}' is not a valid timestamp: {}", raw_timestamp, e)))?;
        let repository_name = record.get("repo_name")?;

        let repository = self
            .repository_index
            .get(repository_name)
            .and_then(|project_id| self.projects.get_mut(project_id))
            .and_then(|project| project.repositories.get_mut(repository_name));

        let Some(repository) = repository else {
            diagnostics.warn(
                DiagnosticKind::UnresolvedRepository { repository_name: repository_name.to_string() },
                format!(
                    "Could not find repository with name {} ({} line {})",
                    repository_name,
                    record.source(),
                    record.line()
                ),
            );
            return Ok(());
        };

        repository.tag_mut(tag_name).record(Log {
            id,
            operation,
            timestamp,
            user,
        });
        Ok(())
    }

    pub fn finish(self) -> Registry {
        let registry = Registry {
            projects: self.projects,
            users: self.users,
        };
        info!(
            "Built registry: {} projects, {} repositories, {} tags, {} pushes, {} pulls",
            registry.projects.len(),
            registry.repository_count(),
            registry.tag_count(),
            registry.log_count(Operation::Push),
            registry.log_count(Operation::Pull)
        );
        registry
    }
}
