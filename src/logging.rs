// Logging for harbor-analyst
//
// Implements the `log` facade with two line formats (text and JSON) and
// three destinations (stderr, a file, or both). Console and file output
// have independent level filters. The log file is opened once, in append
// mode, when the logger is installed.

use log::{Level, LevelFilter};
use serde::{Deserialize, Serialize};
use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use anyhow::{Context, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}. Valid options: text, json", s)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Log destination options
#[derive(Debug, Clone, PartialEq)]
pub enum LogDestination {
    Console,
    File(PathBuf),
    Both(PathBuf),
}

impl LogDestination {
    fn file_path(&self) -> Option<&Path> {
        match self {
            LogDestination::Console => None,
            LogDestination::File(path) | LogDestination::Both(path) => Some(path),
        }
    }

    fn writes_console(&self) -> bool {
        !matches!(self, LogDestination::File(_))
    }
}

/// JSON log line
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub console_level: LevelFilter,
    pub file_level: Option<LevelFilter>,
    pub format: LogFormat,
    pub destination: LogDestination,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_level: LevelFilter::Info,
            file_level: None,
            format: LogFormat::Text,
            destination: LogDestination::Console,
        }
    }
}

impl LogConfig {
    /// Most verbose level any destination accepts
    pub fn max_level(&self) -> LevelFilter {
        let console = if self.destination.writes_console() {
            self.console_level
        } else {
            LevelFilter::Off
        };
        match (self.destination.file_path(), self.file_level) {
            (Some(_), Some(file_level)) => console.max(file_level),
            _ => console,
        }
    }
}

pub struct AnalystLogger {
    config: LogConfig,
    file: Option<Mutex<File>>,
}

impl AnalystLogger {
    pub fn new(config: LogConfig) -> Result<Self> {
        let file = match config.destination.file_path() {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?;
                Some(Mutex::new(file))
            }
            None => None,
        };
        Ok(Self { config, file })
    }

    fn format_timestamp() -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }

    fn format_text_message(&self, level: Level, message: &str) -> String {
        format!("{} [{}] {}", Self::format_timestamp(), level.to_string().to_uppercase(), message)
    }

    fn format_json_message(&self, level: Level, target: &str, message: &str) -> Result<String> {
        let entry = JsonLogEntry {
            timestamp: Self::format_timestamp(),
            level: level.to_string().to_uppercase(),
            message: message.to_string(),
            target: (level >= Level::Debug).then(|| target.to_string()),
        };
        serde_json::to_string(&entry).context("Failed to serialize log entry to JSON")
    }

    fn should_log_to_console(&self, level: Level) -> bool {
        self.config.destination.writes_console() && level <= self.config.console_level
    }

    fn should_log_to_file(&self, level: Level) -> bool {
        self.file.is_some() && self.config.file_level.is_some_and(|file_level| level <= file_level)
    }

    fn write_to_file(&self, line: &str) -> Result<()> {
        if let Some(file) = &self.file {
            let mut file = file
                .lock()
                .map_err(|_| anyhow::anyhow!("Log file lock poisoned"))?;
            writeln!(file, "{}", line).context("Failed to write to log file")?;
        }
        Ok(())
    }
}

impl log::Log for AnalystLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.should_log_to_console(metadata.level()) || self.should_log_to_file(metadata.level())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        let level = record.level();
        let line = match self.config.format {
            LogFormat::Text => self.format_text_message(level, &message),
            LogFormat::Json => match self.format_json_message(level, record.target(), &message) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("JSON formatting error: {}. Falling back to text format.", e);
                    self.format_text_message(level, &message)
                }
            },
        };

        if self.should_log_to_console(level) {
            let _ = writeln!(io::stderr(), "{}", line);
        }
        if self.should_log_to_file(level) {
            if let Err(e) = self.write_to_file(&line) {
                eprintln!("File logging error: {}", e);
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Install the logger as the global `log` backend
pub fn init_logger(config: LogConfig) -> Result<()> {
    let max_level = config.max_level();
    let logger = AnalystLogger::new(config)?;

    log::set_boxed_logger(Box::new(logger)).context("Failed to set global logger")?;
    log::set_max_level(max_level);
    Ok(())
}

/// Convert string to LevelFilter
pub fn parse_log_level(level_str: &str) -> Result<LevelFilter> {
    match level_str.to_lowercase().as_str() {
        "error" => Ok(LevelFilter::Error),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        "off" => Ok(LevelFilter::Off),
        _ => Err(anyhow::anyhow!(
            "Invalid log level: {}. Valid levels: error, warn, info, debug, trace, off",
            level_str
        )),
    }
}
