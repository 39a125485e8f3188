/// Runtime configuration loaded from `config.toml`.
///
/// Every key has a default, so a partial file (or no file at all) still
/// yields a usable configuration. A missing file is reported by the caller
/// as a warning, not an error — the defaults match the original deployment.

use serde::Deserialize;
use std::path::Path;

/// Default output directory for all artifacts.
const DEFAULT_OUTPUT_DIR: &str = "data/temperature_output";

/// Default fetch window, in years back from today.
const DEFAULT_YEARS_BACK: u32 = 5;

/// Default HTTP timeout for archive requests, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub directories: Directories,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Directories {
    /// Directory all CSV/JSON artifacts are written into. Created on demand.
    pub temperature_output: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// How far back the archive window reaches, as `years_back * 365` days
    /// ending today.
    pub years_back: u32,
    /// Per-request timeout for the blocking HTTP client.
    pub timeout_secs: u64,
}

impl Default for Directories {
    fn default() -> Self {
        Directories {
            temperature_output: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            years_back: DEFAULT_YEARS_BACK,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            directories: Directories::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Error loading or parsing the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Loads configuration from a TOML file.
///
/// Returns `Ok(None)` if the file does not exist (caller falls back to
/// `Config::default()` and logs a warning). A file that exists but does not
/// parse is an error — a typo in deployed config should be loud.
pub fn load_config(path: &str) -> Result<Option<Config>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    Ok(Some(config))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
