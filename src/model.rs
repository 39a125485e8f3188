/// Core data types for the climate monitoring service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic, no I/O, and no external dependencies — only types.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// One daily climate observation for a single site.
///
/// Corresponds to one index position across the parallel `daily` arrays of
/// an Open-Meteo archive response. Measurements are validated at the ingest
/// boundary: a day the archive reports with any value missing never becomes
/// a `DailyClimateRecord`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyClimateRecord {
    /// Calendar date as an ISO 8601 string, e.g. "2024-05-01".
    /// Parsed into year/month/season by `analysis::calendar::augment`.
    pub date: String,
    /// Daily maximum 2 m air temperature, degrees Celsius.
    pub temperature_max: f64,
    /// Daily minimum 2 m air temperature, degrees Celsius.
    pub temperature_min: f64,
    /// Daily mean 2 m air temperature, degrees Celsius.
    pub temperature_mean: f64,
    /// Daily mean relative humidity, percent.
    pub humidity: f64,
    /// Daily precipitation accumulation, millimetres. Non-negative.
    pub precipitation: f64,
}

/// A `DailyClimateRecord` enriched with calendar attributes.
///
/// Produced by `analysis::calendar::augment`; everything downstream of
/// augmentation (seasonal statistics, trend reduction, the per-site daily
/// CSV) operates on these.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedRecord {
    pub record: DailyClimateRecord,
    pub year: i32,
    /// Calendar month, 1–12.
    pub month: u32,
    pub season: Season,
}

impl AugmentedRecord {
    /// Value of one measured quantity, for metric-generic aggregation.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TemperatureMean => self.record.temperature_mean,
            Metric::TemperatureMax => self.record.temperature_max,
            Metric::TemperatureMin => self.record.temperature_min,
            Metric::Humidity => self.record.humidity,
            Metric::Precipitation => self.record.precipitation,
        }
    }
}

// ---------------------------------------------------------------------------
// Seasons and metrics
// ---------------------------------------------------------------------------

/// Meteorological season, assigned purely from the calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Fixed output order for statistics and CSV columns.
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// Maps a calendar month (1–12) to its season.
    ///
    /// 12,1,2 → Winter; 3,4,5 → Spring; 6,7,8 → Summer; 9,10,11 → Autumn.
    /// Returns `None` only for months outside 1–12; every valid month maps
    /// to exactly one season.
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3 | 4 | 5 => Some(Season::Spring),
            6 | 7 | 8 => Some(Season::Summer),
            9 | 10 | 11 => Some(Season::Autumn),
            _ => None,
        }
    }

    /// Capitalized label, as stored in the per-site daily CSV.
    pub fn label(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }

    /// Lowercase label, as used in statistics CSV column names.
    pub fn column_prefix(self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The five measured quantities carried by every daily record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TemperatureMean,
    TemperatureMax,
    TemperatureMin,
    Humidity,
    Precipitation,
}

impl Metric {
    /// Fixed output order for statistics and CSV columns.
    pub const ALL: [Metric; 5] = [
        Metric::TemperatureMean,
        Metric::TemperatureMax,
        Metric::TemperatureMin,
        Metric::Humidity,
        Metric::Precipitation,
    ];

    /// Column-name fragment, matching the daily CSV headers.
    pub fn name(self) -> &'static str {
        match self {
            Metric::TemperatureMean => "temperature_mean",
            Metric::TemperatureMax => "temperature_max",
            Metric::TemperatureMin => "temperature_min",
            Metric::Humidity => "humidity",
            Metric::Precipitation => "precipitation",
        }
    }
}

// ---------------------------------------------------------------------------
// Site registry entry
// ---------------------------------------------------------------------------

/// One entry of the site registry: a named geographic point to aggregate
/// climate history for. Loaded from `sites.toml` by `sites::load_sites`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    /// Registry key, unique within a run (TOML table key).
    pub site_id: String,
    /// Human-readable address the coordinates were geocoded from.
    pub address: String,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or parsing Open-Meteo archive data.
#[derive(Debug, PartialEq)]
pub enum ArchiveError {
    /// Non-2xx HTTP response from the archive API.
    HttpError(u16),
    /// The request could not be sent at all (network, DNS, timeout).
    RequestFailed(String),
    /// The response body could not be deserialized.
    ParseError(String),
    /// The response carried no `daily` block, or the block was empty.
    NoDataAvailable(String),
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveError::HttpError(code) => write!(f, "HTTP error: {}", code),
            ArchiveError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            ArchiveError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ArchiveError::NoDataAvailable(detail) => {
                write!(f, "No data available: {}", detail)
            }
        }
    }
}

impl std::error::Error for ArchiveError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
