//! Tabular input from Harbor database exports
//!
//! Each export is a CSV file whose columns are mapped by position onto a
//! fixed field description. Rows become [`Record`]s: string-keyed field
//! maps that remember where they came from.

pub mod csv;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use log::{debug, info};
use crate::error::{AnalystError, AnalystResult};

/// Ordered column names of one export
pub type FieldDescription = &'static [&'static str];

pub const PROJECT_FIELDS: FieldDescription = &["project_id", "owner_id", "name", "deleted", "public"];

pub const ACCESS_LOG_FIELDS: FieldDescription = &[
    "log_id",
    "user_id",
    "project_id",
    "repo_name",
    "repo_tag",
    "operation",
    "op_time",
];

pub const REPOSITORY_FIELDS: FieldDescription = &["repository_id", "name", "project_id", "owner_id"];

pub const USER_FIELDS: FieldDescription = &["user_id", "username"];

/// One input row as a field-name to value mapping
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    source: String,
    line: usize,
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new<S: Into<String>>(source: S, line: usize, fields: HashMap<String, String>) -> Self {
        Self {
            source: source.into(),
            line,
            fields,
        }
    }

    /// Build a record from `(field, value)` pairs
    pub fn from_pairs<S: Into<String>>(source: S, line: usize, pairs: &[(&str, &str)]) -> Self {
        let fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::new(source, line, fields)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Get a required field
    pub fn get(&self, field: &str) -> AnalystResult<&str> {
        self.fields
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| self.malformed(format!("missing field '{}'", field)))
    }

    /// Get a required field parsed as a decimal integer
    pub fn get_int(&self, field: &str) -> AnalystResult<i64> {
        let raw = self.get(field)?;
        raw.trim()
            .parse::<i64>()
            .map_err(|_| self.malformed(format!("{} is not an integer: '{}'", field, raw)))
    }

    /// Build a malformed-record error pointing at this row
    pub fn malformed<S: Into<String>>(&self, message: S) -> AnalystError {
        AnalystError::malformed_record(self.source.clone(), self.line, message)
    }
}

/// The four exports the registry is built from
#[derive(Debug, Clone, Default)]
pub struct RecordSets {
    pub projects: Vec<Record>,
    pub repositories: Vec<Record>,
    pub users: Vec<Record>,
    pub access_logs: Vec<Record>,
}

/// File names of the four exports inside one directory
#[derive(Debug, Clone, PartialEq)]
pub struct InputFiles<'a> {
    pub projects: &'a str,
    pub repositories: &'a str,
    pub users: &'a str,
    pub access_log: &'a str,
}

/// Parse CSV text into records, skipping the header line
pub fn parse_records(source: &str, content: &str, description: FieldDescription) -> AnalystResult<Vec<Record>> {
    let rows = csv::tokenize(content, ',')
        .map_err(|message| AnalystError::malformed_record(source, 0, message))?;

    let mut records = Vec::with_capacity(rows.len().saturating_sub(1));
    for row in rows.into_iter().skip(1) {
        if row.fields.len() < description.len() {
            return Err(AnalystError::malformed_record(
                source,
                row.line,
                format!("expected {} columns, found {}", description.len(), row.fields.len()),
            ));
        }
        let fields = description
            .iter()
            .zip(row.fields)
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        records.push(Record::new(source, row.line, fields));
    }

    debug!("Parsed {} records from {}", records.len(), source);
    Ok(records)
}

/// Read one export file
pub fn read_records(path: &Path, description: FieldDescription) -> AnalystResult<Vec<Record>> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| AnalystError::input(display.clone(), e.to_string()))?;
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or(display);
    parse_records(&source, &content, description)
}

/// Read all four exports from a directory
pub fn read_record_sets(directory: &Path, files: &InputFiles<'_>) -> AnalystResult<RecordSets> {
    info!("Reading registry exports from: {}", directory.display());

    let sets = RecordSets {
        projects: read_records(&directory.join(files.projects), PROJECT_FIELDS)?,
        repositories: read_records(&directory.join(files.repositories), REPOSITORY_FIELDS)?,
        users: read_records(&directory.join(files.users), USER_FIELDS)?,
        access_logs: read_records(&directory.join(files.access_log), ACCESS_LOG_FIELDS)?,
    };

    info!(
        "Loaded {} projects, {} repositories, {} users, {} access log rows",
        sets.projects.len(),
        sets.repositories.len(),
        sets.users.len(),
        sets.access_logs.len()
    );
    Ok(sets)
}
