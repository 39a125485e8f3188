/// Open-Meteo Archive API Client
///
/// Retrieves historical daily climate records (temperature, humidity,
/// precipitation) for a coordinate pair. The archive API is free and
/// requires no key.
///
/// API Documentation: https://open-meteo.com/en/docs/historical-weather-api
/// Endpoint: https://archive-api.open-meteo.com/v1/archive

use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::{ArchiveError, DailyClimateRecord};

const ARCHIVE_BASE_URL: &str = "https://archive-api.open-meteo.com";

/// Daily variables requested from the archive, in response-array order.
const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min,temperature_2m_mean,\
                               relative_humidity_2m_mean,precipitation_sum";

// ============================================================================
// Archive API Response Structures
// ============================================================================

/// Top-level archive response. The `daily` block is absent when the
/// coordinates fall outside model coverage or the window has no data.
#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    pub daily: Option<DailyBlock>,
}

/// Parallel per-day arrays. Individual entries may be `null` for days the
/// reanalysis model has gaps, hence `Option<f64>`.
#[derive(Debug, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<String>, // ISO 8601 dates, e.g. "2024-05-01"
    #[serde(rename = "temperature_2m_max", default)]
    pub temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min", default)]
    pub temperature_min: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_mean", default)]
    pub temperature_mean: Vec<Option<f64>>,
    #[serde(rename = "relative_humidity_2m_mean", default)]
    pub humidity: Vec<Option<f64>>,
    #[serde(rename = "precipitation_sum", default)]
    pub precipitation: Vec<Option<f64>>,
}

/// A parsed archive response: the usable records plus how many days were
/// dropped for having at least one missing measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub records: Vec<DailyClimateRecord>,
    pub incomplete_days: usize,
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Builds the archive request URL for one coordinate pair and date window.
///
/// Kept separate from the fetch so URL construction is testable offline.
pub fn build_archive_url(latitude: f64, longitude: f64, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}/v1/archive?latitude={}&longitude={}&start_date={}&end_date={}&daily={}&timezone=auto",
        ARCHIVE_BASE_URL,
        latitude,
        longitude,
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d"),
        DAILY_VARIABLES,
    )
}

/// Fetch daily climate history for a coordinate pair.
///
/// # Parameters
/// - `client`: HTTP client (constructed once, shared across sites)
/// - `latitude`, `longitude`: WGS84 coordinates
/// - `start`, `end`: inclusive date window
///
/// # Returns
/// The usable daily records plus a count of incomplete days dropped at this
/// boundary, so the core only ever sees fully populated records.
pub fn fetch_daily_climate(
    client: &reqwest::blocking::Client,
    latitude: f64,
    longitude: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DailySeries, ArchiveError> {
    let url = build_archive_url(latitude, longitude, start, end);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| ArchiveError::RequestFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ArchiveError::HttpError(response.status().as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| ArchiveError::RequestFailed(e.to_string()))?;

    parse_archive_response(&body)
}

/// Parse an archive response body into daily records.
///
/// Days with any of the five measurements missing are dropped and counted;
/// a response with no `daily` block, or one whose arrays are all empty, is
/// `NoDataAvailable`.
pub fn parse_archive_response(body: &str) -> Result<DailySeries, ArchiveError> {
    let response: ArchiveResponse =
        serde_json::from_str(body).map_err(|e| ArchiveError::ParseError(e.to_string()))?;

    let daily = response
        .daily
        .ok_or_else(|| ArchiveError::NoDataAvailable("response carried no daily block".to_string()))?;

    if daily.time.is_empty() {
        return Err(ArchiveError::NoDataAvailable(
            "daily block carried no days".to_string(),
        ));
    }

    let mut records = Vec::with_capacity(daily.time.len());
    let mut incomplete_days = 0;

    for (i, date) in daily.time.iter().enumerate() {
        let row = (
            value_at(&daily.temperature_max, i),
            value_at(&daily.temperature_min, i),
            value_at(&daily.temperature_mean, i),
            value_at(&daily.humidity, i),
            value_at(&daily.precipitation, i),
        );

        match row {
            (Some(t_max), Some(t_min), Some(t_mean), Some(humidity), Some(precipitation)) => {
                records.push(DailyClimateRecord {
                    date: date.clone(),
                    temperature_max: t_max,
                    temperature_min: t_min,
                    temperature_mean: t_mean,
                    humidity,
                    precipitation,
                });
            }
            _ => incomplete_days += 1,
        }
    }

    Ok(DailySeries {
        records,
        incomplete_days,
    })
}

/// Array lookup that treats both `null` entries and short arrays as missing.
fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

// ============================================================================
// Tests
// ============================================================================
