use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use serde_yaml::Mapping;
use log::debug;
use crate::error::{AnalystError, AnalystResult};
use crate::input::InputFiles;
use crate::output::DEFAULT_REPORT_TITLE;

pub const CONFIG_ENV_VAR: &str = "HARBOR_ANALYST_CONFIG";
pub const CONFIG_FILE_NAME: &str = "analyst.yaml";
const CONFIG_DIR_NAME: &str = "harbor-analyst";

/// Report header settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    pub title: String,
    pub description: Option<String>,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            description: None,
        }
    }
}

/// Where the CSV exports live
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct InputSection {
    pub directory: PathBuf,
    pub projects: String,
    pub repositories: String,
    pub users: String,
    pub access_log: String,
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("raw"),
            projects: "project.csv".to_string(),
            repositories: "repository.csv".to_string(),
            users: "user.csv".to_string(),
            access_log: "access_log.csv".to_string(),
        }
    }
}

impl InputSection {
    pub fn files(&self) -> InputFiles<'_> {
        InputFiles {
            projects: &self.projects,
            repositories: &self.repositories,
            users: &self.users,
            access_log: &self.access_log,
        }
    }
}

/// Where charts and the report are written
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputSection {
    pub directory: PathBuf,
    pub report_file: String,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("out"),
            report_file: "report.pdf".to_string(),
            chart_width: 1200,
            chart_height: 600,
        }
    }
}

impl OutputSection {
    pub fn report_path(&self) -> PathBuf {
        self.directory.join(&self.report_file)
    }
}

/// Logging defaults; command-line flags take precedence
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LoggingSection {
    pub console_level: Option<String>,
    pub file: Option<PathBuf>,
    pub file_level: Option<String>,
    pub format: Option<String>,
}

/// The whole configuration document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalystConfig {
    pub report: ReportSection,
    pub input: InputSection,
    pub output: OutputSection,
    pub logging: LoggingSection,
    /// Free-form chart entries, bound onto statistics later
    pub charts: Vec<Mapping>,
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl AnalystConfig {
    /// Load configuration using the discovery order, explicit path first
    pub fn load(explicit: Option<&Path>) -> AnalystResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        let candidates = discover_config_files();
        for path in &candidates {
            debug!("Attempting to load config from: {}", path.display());
            if path.is_file() {
                return Self::load_from_file(path);
            }
        }

        let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        Err(AnalystError::configuration(format!(
            "no configuration file found (tried {})",
            tried.join(", ")
        )))
    }

    pub fn load_from_file(path: &Path) -> AnalystResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnalystError::configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let mut config = Self::parse(&content).map_err(|e| match e {
            AnalystError::Configuration { message } => {
                AnalystError::configuration(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn parse(content: &str) -> AnalystResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| AnalystError::configuration(format!("invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AnalystResult<()> {
        if self.charts.is_empty() {
            return Err(AnalystError::configuration("no charts configured"));
        }
        if self.output.chart_width == 0 || self.output.chart_height == 0 {
            return Err(AnalystError::configuration("chart-width and chart-height must be positive"));
        }
        if self.output.report_file.trim().is_empty() {
            return Err(AnalystError::configuration("report-file must not be empty"));
        }
        Ok(())
    }

    /// File this configuration was read from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Discover configuration files in order of precedence
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        paths.push(PathBuf::from(env_path));
    }
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(".").join(CONFIG_FILE_NAME));

    debug!("Config discovery paths: {:?}", paths);
    paths
}
