/// Structured logging for the climate monitoring service.
///
/// Provides context-rich logging with site identifiers, timestamps, and
/// severity levels. Supports both console output and file-based logging
/// for unattended runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Open-Meteo archive API.
    Archive,
    /// Site registry / configuration files.
    Registry,
    /// Artifact output (CSV/JSON writers).
    Export,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Archive => write!(f, "ARCHIVE"),
            DataSource::Registry => write!(f, "REGISTRY"),
            DataSource::Export => write!(f, "EXPORT"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the archive simply has no data for this point/window
    Expected,
    /// Unexpected failure - indicates service degradation or configuration issue
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>) {
        let logger = Logger {
            min_level,
            log_file,
        };

        *LOGGER.lock().unwrap() = Some(logger);
    }

    fn log(&self, level: LogLevel, source: &DataSource, site_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let site_part = site_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format!("{} {} {}{}: {}", timestamp, level, source, site_part, message);

        match level {
            LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, site_part, message),
            LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, site_part, message),
            LogLevel::Info => println!("   {}", message),
            LogLevel::Debug => println!("   [DEBUG] {}", message),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    Logger::init(min_level, log_file.map(String::from));
}

/// Log a general informational message
pub fn info(source: DataSource, site_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, &source, site_id, message);
    }
}

/// Log a warning message
pub fn warn(source: DataSource, site_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, &source, site_id, message);
    }
}

/// Log an error message
pub fn error(source: DataSource, site_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, &source, site_id, message);
    }
}

/// Log a debug message
pub fn debug(source: DataSource, site_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, &source, site_id, message);
    }
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an archive fetch failure based on the error message.
pub fn classify_archive_failure(_site_id: &str, error_message: &str) -> FailureType {
    // No daily block usually means the coordinates fall outside the model
    // grid or the window predates coverage.
    if error_message.contains("No data available") {
        FailureType::Expected
    }
    // HTTP errors might indicate service issues or rate limiting
    else if error_message.contains("HTTP error") || error_message.contains("Request failed") {
        FailureType::Unexpected
    }
    // Parse errors suggest API changes or bugs
    else if error_message.contains("Parse error") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

/// Log an archive failure with automatic classification
pub fn log_archive_failure(site_id: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_archive_failure(site_id, &error_msg);

    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => warn(DataSource::Archive, Some(site_id), &message),
        FailureType::Unexpected => error(DataSource::Archive, Some(site_id), &message),
        FailureType::Unknown => warn(DataSource::Archive, Some(site_id), &message),
    }
}

// ---------------------------------------------------------------------------
// Run Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a pipeline run across all sites
pub fn log_run_summary(total: usize, successful: usize, skipped: usize) {
    let message = format!(
        "Run complete: {}/{} sites aggregated, {} skipped",
        successful, total, skipped
    );

    if skipped == 0 {
        info(DataSource::System, None, &message);
    } else if successful == 0 {
        error(DataSource::System, None, &message);
    } else {
        warn(DataSource::System, None, &message);
    }
}
