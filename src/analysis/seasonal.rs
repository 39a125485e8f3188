/// Seasonal aggregation: per-site, per-season descriptive statistics.
///
/// Statistics pool all years together per season. Standard deviation is
/// sample std with Bessel's correction (n−1); a season with a single record
/// has `std = None` — the sentinel for "statistically undefined", which is
/// never coerced to zero. All values are rounded to 4 decimal places before
/// they leave this module, matching the exported artifacts.

use std::collections::BTreeMap;

use crate::model::{AugmentedRecord, Metric, Season};

// ---------------------------------------------------------------------------
// Statistics types
// ---------------------------------------------------------------------------

/// Descriptive statistics for one metric within one season.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; `None` when fewer than two records exist.
    pub std: Option<f64>,
}

/// Aggregate statistics for one (site, season) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalStatistics {
    pub season: Season,
    /// Number of daily records that fell in this season.
    pub record_count: usize,
    pub temperature_mean: SummaryStats,
    pub temperature_max: SummaryStats,
    pub temperature_min: SummaryStats,
    pub humidity: SummaryStats,
    pub precipitation: SummaryStats,
    /// Total precipitation accumulation over the season's records.
    pub precipitation_sum: f64,
}

impl SeasonalStatistics {
    /// Statistics for one metric, for metric-generic serialization.
    pub fn stats(&self, metric: Metric) -> SummaryStats {
        match metric {
            Metric::TemperatureMean => self.temperature_mean,
            Metric::TemperatureMax => self.temperature_max,
            Metric::TemperatureMin => self.temperature_min,
            Metric::Humidity => self.humidity,
            Metric::Precipitation => self.precipitation,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Computes per-season statistics for one site's augmented series.
///
/// Returns 0 to 4 entries in fixed Winter/Spring/Summer/Autumn order;
/// seasons with no records are omitted, never zero-filled. An empty series
/// yields an empty vector — the caller reports that as a warning.
pub fn seasonal_statistics(records: &[AugmentedRecord]) -> Vec<SeasonalStatistics> {
    Season::ALL
        .iter()
        .filter_map(|&season| {
            let partition: Vec<&AugmentedRecord> =
                records.iter().filter(|r| r.season == season).collect();
            if partition.is_empty() {
                return None;
            }

            let stats_for = |metric: Metric| {
                let values: Vec<f64> = partition.iter().map(|r| r.metric(metric)).collect();
                summarize(&values)
            };

            let precipitation_values: Vec<f64> = partition
                .iter()
                .map(|r| r.metric(Metric::Precipitation))
                .collect();

            Some(SeasonalStatistics {
                season,
                record_count: partition.len(),
                temperature_mean: stats_for(Metric::TemperatureMean),
                temperature_max: stats_for(Metric::TemperatureMax),
                temperature_min: stats_for(Metric::TemperatureMin),
                humidity: stats_for(Metric::Humidity),
                precipitation: stats_for(Metric::Precipitation),
                precipitation_sum: round4(precipitation_values.iter().sum()),
            })
        })
        .collect()
}

/// Computes seasonal statistics for every site in a run.
///
/// Sites with empty series map to empty statistics vectors; the mapping
/// always contains one entry per input site so nothing vanishes silently.
pub fn aggregate(
    series_by_site: &BTreeMap<String, Vec<AugmentedRecord>>,
) -> BTreeMap<String, Vec<SeasonalStatistics>> {
    series_by_site
        .iter()
        .map(|(site_id, records)| (site_id.clone(), seasonal_statistics(records)))
        .collect()
}

// ---------------------------------------------------------------------------
// Descriptive statistics helpers
// ---------------------------------------------------------------------------

/// Mean, min, max, and sample std of a non-empty value slice, rounded to
/// 4 decimal places.
pub fn summarize(values: &[f64]) -> SummaryStats {
    debug_assert!(!values.is_empty(), "summarize requires at least one value");

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SummaryStats {
        mean: round4(mean),
        min: round4(min),
        max: round4(max),
        std: sample_std(values, mean).map(round4),
    }
}

/// Sample standard deviation (Bessel's correction, n−1 denominator).
/// Undefined for fewer than two values.
pub fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Rounds to 4 decimal places, the precision of all serialized statistics.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
