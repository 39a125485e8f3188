/// Integration tests for the aggregation pipeline, end to end but offline.
///
/// These tests drive synthetic daily series through the same path the
/// binary uses — augment → aggregate → export — and read the artifacts
/// back to verify:
/// 1. Season partitioning and statistics survive serialization
/// 2. The statistics CSV holds one row per site with data
/// 3. A site with an empty series is skipped, never a crash
/// 4. Undefined standard deviations stay empty cells, not zeros
///
/// No network, no clock, no database: everything is deterministic.
///
/// Run with: cargo test --test pipeline_integration

use std::collections::BTreeMap;
use std::path::PathBuf;

use climon_service::analysis::{calendar, seasonal, trend};
use climon_service::export::{self, SiteSummary};
use climon_service::model::{DailyClimateRecord, Metric, Site};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn test_output_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "climon_test_{}_{}",
        label,
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("test output dir should be creatable");
    dir
}

fn site(id: &str) -> Site {
    Site {
        site_id: id.to_string(),
        address: format!("{} test address", id),
        latitude: 54.97,
        longitude: -1.59,
    }
}

fn record(date: &str, temperature_mean: f64, precipitation: f64) -> DailyClimateRecord {
    DailyClimateRecord {
        date: date.to_string(),
        temperature_max: temperature_mean + 4.0,
        temperature_min: temperature_mean - 4.0,
        temperature_mean,
        humidity: 80.0,
        precipitation,
    }
}

/// Three winter days and two summer days across two years.
fn synthetic_series() -> Vec<DailyClimateRecord> {
    vec![
        record("2022-01-10", 1.0, 2.0),
        record("2022-12-25", 2.0, 0.0),
        record("2023-02-05", 3.0, 4.0),
        record("2022-07-01", 18.0, 1.0),
        record("2023-07-15", 22.0, 0.5),
    ]
}

fn read_csv(path: &PathBuf) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("artifact should open");
    let header: Vec<String> = reader
        .headers()
        .expect("artifact should have a header")
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("row should parse").iter().map(String::from).collect())
        .collect();
    (header, rows)
}

// ---------------------------------------------------------------------------
// Augment → aggregate
// ---------------------------------------------------------------------------

#[test]
fn test_full_series_partitions_into_seasons() {
    let outcome = calendar::augment(&synthetic_series());
    assert!(outcome.malformed.is_empty());

    let stats = seasonal::seasonal_statistics(&outcome.records);
    assert_eq!(stats.len(), 2); // winter and summer only

    let winter = &stats[0];
    assert_eq!(winter.record_count, 3);
    assert_eq!(winter.temperature_mean.mean, 2.0);
    assert_eq!(winter.temperature_mean.std, Some(1.0));
    assert_eq!(winter.precipitation_sum, 6.0);

    let summer = &stats[1];
    assert_eq!(summer.record_count, 2);
    assert_eq!(summer.temperature_mean.mean, 20.0);
}

#[test]
fn test_malformed_record_excluded_but_rest_aggregates() {
    let mut series = synthetic_series();
    series.push(record("not-a-date", 99.0, 0.0));

    let outcome = calendar::augment(&series);
    assert_eq!(outcome.malformed.len(), 1);
    assert_eq!(outcome.records.len(), 5);

    // the bad record's value never leaks into statistics
    let stats = seasonal::seasonal_statistics(&outcome.records);
    let total: usize = stats.iter().map(|s| s.record_count).sum();
    assert_eq!(total, 5);
}

// ---------------------------------------------------------------------------
// Export round trips
// ---------------------------------------------------------------------------

#[test]
fn test_statistics_csv_one_row_per_site_with_data() {
    let dir = test_output_dir("stats_rows");

    // Two sites registered, one with data, one with an empty series:
    // the empty one is skipped before export, exactly as the pipeline does.
    let outcome = calendar::augment(&synthetic_series());
    let mut by_site = BTreeMap::new();
    by_site.insert("aim_1".to_string(), outcome.records);
    by_site.insert("aim_2".to_string(), Vec::new());
    let aggregated = seasonal::aggregate(&by_site);

    let rows: Vec<(Site, Vec<seasonal::SeasonalStatistics>)> = aggregated
        .into_iter()
        .filter(|(_, stats)| !stats.is_empty())
        .map(|(id, stats)| (site(&id), stats))
        .collect();
    assert_eq!(rows.len(), 1);

    let path = export::write_statistics_csv(&dir, "19700101_000000", &rows)
        .expect("statistics export should succeed");
    let (header, data) = read_csv(&path);

    assert_eq!(data.len(), 1);
    assert_eq!(data[0][0], "aim_1");
    assert_eq!(header.len(), data[0].len());

    let col = |name: &str| header.iter().position(|h| h == name).unwrap();
    assert_eq!(data[0][col("winter_temperature_mean_mean")], "2");
    assert_eq!(data[0][col("winter_precipitation_sum")], "6");
    // no spring data: null-filled, not zero-filled
    assert_eq!(data[0][col("spring_temperature_mean_mean")], "");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_single_record_site_round_trips_undefined_std() {
    let dir = test_output_dir("single_record");

    let outcome = calendar::augment(&[record("2023-01-01", 5.0, 1.0)]);
    let stats = seasonal::seasonal_statistics(&outcome.records);
    let rows = vec![(site("aim_1"), stats)];

    let path = export::write_statistics_csv(&dir, "19700101_000000", &rows).unwrap();
    let (header, data) = read_csv(&path);
    let col = |name: &str| header.iter().position(|h| h == name).unwrap();

    assert_eq!(data[0][col("winter_temperature_mean_mean")], "5");
    assert_eq!(data[0][col("winter_temperature_mean_min")], "5");
    assert_eq!(data[0][col("winter_temperature_mean_max")], "5");
    assert_eq!(data[0][col("winter_temperature_mean_std")], "");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_daily_csv_carries_augmented_columns() {
    let dir = test_output_dir("daily");

    let outcome = calendar::augment(&synthetic_series());
    let s = site("aim_1");
    let path = export::write_daily_csv(&dir, "19700101_000000", &s, &outcome.records).unwrap();
    let (header, data) = read_csv(&path);

    assert_eq!(data.len(), 5);
    let col = |name: &str| header.iter().position(|h| h == name).unwrap();
    assert_eq!(data[0][col("date")], "2022-01-10");
    assert_eq!(data[0][col("season")], "Winter");
    assert_eq!(data[0][col("year")], "2022");
    assert_eq!(data[0][col("month")], "1");
    assert_eq!(data[0][col("site_id")], "aim_1");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_trend_artifacts_round_trip() {
    let dir = test_output_dir("trend");

    let outcome = calendar::augment(&synthetic_series());
    let s = site("aim_1");

    let yearly = trend::yearly_trend(&outcome.records);
    assert_eq!(yearly.len(), 2);
    let path = export::write_yearly_trends_csv(&dir, "19700101_000000", &s, &yearly).unwrap();
    let (header, data) = read_csv(&path);
    let col = |name: &str| header.iter().position(|h| h == name).unwrap();
    assert_eq!(data[0][col("year")], "2022");
    assert_eq!(data[1][col("year")], "2023");

    let fit_rows: Vec<_> = yearly
        .iter()
        .map(|y| {
            (
                y.year,
                trend::monthly_means(&outcome.records, y.year),
                trend::monthly_fit(&outcome.records, y.year),
            )
        })
        .collect();
    let path = export::write_monthly_fit_csv(&dir, "19700101_000000", &s, &fit_rows).unwrap();
    let (header, data) = read_csv(&path);
    let col = |name: &str| header.iter().position(|h| h == name).unwrap();

    // 2022 has months 1, 7, 12 → three rows with a defined fit;
    // 2023 has months 2 and 7 → two rows, also fitted.
    assert_eq!(data.len(), 5);
    assert!(!data[0][col("fit_slope")].is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_summary_json_round_trips() {
    let dir = test_output_dir("summary");

    let outcome = calendar::augment(&synthetic_series());
    let temps: Vec<f64> = outcome
        .records
        .iter()
        .map(|r| r.metric(Metric::TemperatureMean))
        .collect();
    let overall = seasonal::summarize(&temps);

    let summaries = vec![SiteSummary {
        site_id: "aim_1".to_string(),
        address: "aim_1 test address".to_string(),
        latitude: 54.97,
        longitude: -1.59,
        avg_temp: overall.mean,
        std_temp: overall.std,
    }];
    let path = export::write_summary_json(&dir, "19700101_000000", &summaries).unwrap();

    let body = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["site_id"], "aim_1");
    // mean of [1, 2, 3, 18, 22] = 9.2
    assert_eq!(parsed[0]["avg_temp"], 9.2);
    assert!(parsed[0]["std_temp"].is_number());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_seasonal_json_is_nested_not_flat() {
    let dir = test_output_dir("seasonal_json");

    let outcome = calendar::augment(&synthetic_series());
    let stats = seasonal::seasonal_statistics(&outcome.records);
    let rows = vec![(site("aim_1"), stats)];

    let path = export::write_seasonal_json(&dir, "19700101_000000", &rows).unwrap();
    let body = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();

    // site → season → metric → stat, no underscore-joined keys to split
    let winter = &parsed["aim_1"]["winter"];
    assert_eq!(winter["record_count"], 3);
    assert_eq!(winter["temperature_mean"]["mean"], 2.0);
    assert_eq!(winter["temperature_mean"]["std"], 1.0);
    assert_eq!(winter["precipitation_sum"], 6.0);
    assert!(parsed["aim_1"]["spring"].is_null());

    std::fs::remove_dir_all(&dir).ok();
}
