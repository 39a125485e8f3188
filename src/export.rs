/// Artifact writer: serializes aggregation results to timestamped CSV and
/// JSON files.
///
/// Every filename carries the run timestamp (`%Y%m%d_%H%M%S`) so repeated
/// runs never clobber each other. The statistics CSV keeps the original
/// flat `{season}_{metric}_{stat}` column naming for its existing
/// consumers; `seasonal_statistics_<ts>.json` is the structured,
/// unambiguous form of the same data.
///
/// Null discipline: the statistics CSV header is the full fixed
/// season×metric×stat grid, and a season with no records for a site
/// serializes as empty cells in that row. An undefined standard deviation
/// is likewise an empty cell (JSON: null), never 0.

use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::analysis::seasonal::{SeasonalStatistics, SummaryStats};
use crate::analysis::trend::{LinearFit, MonthlyMean, YearlyAggregate};
use crate::model::{AugmentedRecord, Metric, Season, Site};

// ---------------------------------------------------------------------------
// Run identification
// ---------------------------------------------------------------------------

/// Timestamp used in every artifact filename of a run. Taken once in `main`
/// so all of a run's files share it.
pub fn run_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Creates the output directory if needed.
pub fn ensure_output_dir(dir: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

// ---------------------------------------------------------------------------
// Statistics CSV (one row per site)
// ---------------------------------------------------------------------------

/// Per-metric statistic names, in column order. Precipitation additionally
/// carries a `sum` column.
const STAT_NAMES: [&str; 4] = ["mean", "min", "max", "std"];

/// The full statistics CSV header: identity columns followed by the fixed
/// season×metric×stat grid.
pub fn statistics_header() -> Vec<String> {
    let mut header = vec![
        "site_id".to_string(),
        "address".to_string(),
        "latitude".to_string(),
        "longitude".to_string(),
    ];
    for season in Season::ALL {
        for metric in Metric::ALL {
            for stat in STAT_NAMES {
                header.push(format!("{}_{}_{}", season.column_prefix(), metric.name(), stat));
            }
            if metric == Metric::Precipitation {
                header.push(format!("{}_{}_sum", season.column_prefix(), metric.name()));
            }
        }
    }
    header
}

/// One site's row under the fixed header. Seasons absent from `stats`
/// yield empty cells.
pub fn statistics_row(site: &Site, stats: &[SeasonalStatistics]) -> Vec<String> {
    let mut row = vec![
        site.site_id.clone(),
        site.address.clone(),
        site.latitude.to_string(),
        site.longitude.to_string(),
    ];
    for season in Season::ALL {
        let seasonal = stats.iter().find(|s| s.season == season);
        for metric in Metric::ALL {
            match seasonal {
                Some(seasonal) => {
                    let s = seasonal.stats(metric);
                    row.push(s.mean.to_string());
                    row.push(s.min.to_string());
                    row.push(s.max.to_string());
                    row.push(fmt_opt(s.std));
                    if metric == Metric::Precipitation {
                        row.push(seasonal.precipitation_sum.to_string());
                    }
                }
                None => {
                    row.extend(std::iter::repeat(String::new()).take(STAT_NAMES.len()));
                    if metric == Metric::Precipitation {
                        row.push(String::new());
                    }
                }
            }
        }
    }
    row
}

/// Writes `temperature_statistics_<ts>.csv`: one row per aggregated site.
pub fn write_statistics_csv(
    output_dir: &Path,
    timestamp: &str,
    rows: &[(Site, Vec<SeasonalStatistics>)],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = output_dir.join(format!("temperature_statistics_{}.csv", timestamp));
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(statistics_header())?;
    for (site, stats) in rows {
        writer.write_record(statistics_row(site, stats))?;
    }
    writer.flush()?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Per-site daily records CSV
// ---------------------------------------------------------------------------

/// Writes `temperature_data_<site>_<ts>.csv`: the augmented daily series,
/// one row per record, with the site identity repeated per row as in the
/// original export.
pub fn write_daily_csv(
    output_dir: &Path,
    timestamp: &str,
    site: &Site,
    records: &[AugmentedRecord],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = output_dir.join(format!("temperature_data_{}_{}.csv", site.site_id, timestamp));
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record([
        "date",
        "temperature_max",
        "temperature_min",
        "temperature_mean",
        "humidity",
        "precipitation",
        "site_id",
        "address",
        "latitude",
        "longitude",
        "month",
        "year",
        "season",
    ])?;
    for r in records {
        writer.write_record([
            r.record.date.clone(),
            r.record.temperature_max.to_string(),
            r.record.temperature_min.to_string(),
            r.record.temperature_mean.to_string(),
            r.record.humidity.to_string(),
            r.record.precipitation.to_string(),
            site.site_id.clone(),
            site.address.clone(),
            site.latitude.to_string(),
            site.longitude.to_string(),
            r.month.to_string(),
            r.year.to_string(),
            r.season.label().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Summary JSON (heatmap input)
// ---------------------------------------------------------------------------

/// Per-site run summary: overall mean/std of the daily mean temperature.
/// This is the heatmap-input artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSummary {
    pub site_id: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub avg_temp: f64,
    /// `None` (serialized as null) when the series has a single record.
    pub std_temp: Option<f64>,
}

/// Writes `temperature_summary_<ts>.json`.
pub fn write_summary_json(
    output_dir: &Path,
    timestamp: &str,
    summaries: &[SiteSummary],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = output_dir.join(format!("temperature_summary_{}.json", timestamp));
    let json = serde_json::to_string_pretty(summaries)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Seasonal statistics JSON (structured form)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct StatsJson {
    mean: f64,
    min: f64,
    max: f64,
    std: Option<f64>,
}

impl From<SummaryStats> for StatsJson {
    fn from(s: SummaryStats) -> Self {
        StatsJson {
            mean: s.mean,
            min: s.min,
            max: s.max,
            std: s.std,
        }
    }
}

#[derive(Debug, Serialize)]
struct SeasonJson {
    record_count: usize,
    temperature_mean: StatsJson,
    temperature_max: StatsJson,
    temperature_min: StatsJson,
    humidity: StatsJson,
    precipitation: StatsJson,
    precipitation_sum: f64,
}

/// Writes `seasonal_statistics_<ts>.json`: site → season → metric → stat,
/// nested rather than flattened into ambiguous column names.
pub fn write_seasonal_json(
    output_dir: &Path,
    timestamp: &str,
    rows: &[(Site, Vec<SeasonalStatistics>)],
) -> Result<PathBuf, Box<dyn Error>> {
    let mut by_site: BTreeMap<&str, BTreeMap<&str, SeasonJson>> = BTreeMap::new();
    for (site, stats) in rows {
        let seasons = by_site.entry(site.site_id.as_str()).or_default();
        for s in stats {
            seasons.insert(
                s.season.column_prefix(),
                SeasonJson {
                    record_count: s.record_count,
                    temperature_mean: s.temperature_mean.into(),
                    temperature_max: s.temperature_max.into(),
                    temperature_min: s.temperature_min.into(),
                    humidity: s.humidity.into(),
                    precipitation: s.precipitation.into(),
                    precipitation_sum: s.precipitation_sum,
                },
            );
        }
    }

    let path = output_dir.join(format!("seasonal_statistics_{}.json", timestamp));
    let json = serde_json::to_string_pretty(&by_site)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Trend CSVs (plot inputs)
// ---------------------------------------------------------------------------

/// Writes `yearly_trends_<site>_<ts>.csv`: one row per year, mean and std
/// of the three temperature quantities.
pub fn write_yearly_trends_csv(
    output_dir: &Path,
    timestamp: &str,
    site: &Site,
    yearly: &[YearlyAggregate],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = output_dir.join(format!("yearly_trends_{}_{}.csv", site.site_id, timestamp));
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record([
        "year",
        "record_count",
        "temperature_mean_mean",
        "temperature_mean_std",
        "temperature_max_mean",
        "temperature_max_std",
        "temperature_min_mean",
        "temperature_min_std",
    ])?;
    for y in yearly {
        writer.write_record([
            y.year.to_string(),
            y.record_count.to_string(),
            y.temperature_mean.mean.to_string(),
            fmt_opt(y.temperature_mean.std),
            y.temperature_max.mean.to_string(),
            fmt_opt(y.temperature_max.std),
            y.temperature_min.mean.to_string(),
            fmt_opt(y.temperature_min.std),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}

/// Writes `monthly_fit_<site>_<ts>.csv`: per (year, month) the monthly mean
/// temperature plus the year's fitted line. Fit columns are empty for years
/// with fewer than two months of data.
pub fn write_monthly_fit_csv(
    output_dir: &Path,
    timestamp: &str,
    site: &Site,
    rows: &[(i32, Vec<MonthlyMean>, Option<LinearFit>)],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = output_dir.join(format!("monthly_fit_{}_{}.csv", site.site_id, timestamp));
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record([
        "year",
        "month",
        "mean_temperature",
        "fit_slope",
        "fit_intercept",
        "fitted_value",
    ])?;
    for (year, means, fit) in rows {
        for m in means {
            writer.write_record([
                year.to_string(),
                m.month.to_string(),
                m.mean.to_string(),
                fmt_opt(fit.map(|f| f.slope)),
                fmt_opt(fit.map(|f| f.intercept)),
                fmt_opt(fit.map(|f| f.at(m.month))),
            ])?;
        }
    }
    writer.flush()?;
    Ok(path)
}

/// Empty cell for an undefined value; never "0".
fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
