/// Pipeline runner: one sequential pass over the site registry.
///
/// For each site: fetch the daily archive window, augment with calendar
/// attributes, aggregate, and write per-site artifacts. Per-site failures
/// are logged and skipped; the run as a whole fails only when no site
/// produced data.
///
/// Usage:
///   climon_service [config.toml] [sites.toml]

use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};

use climon_service::analysis::{calendar, seasonal, trend};
use climon_service::config::{self, Config};
use climon_service::export::{self, SiteSummary};
use climon_service::ingest::open_meteo;
use climon_service::logging::{self, DataSource, LogLevel};
use climon_service::model::{Metric, Site};
use climon_service::sites;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_SITES_PATH: &str = "sites.toml";

fn main() -> Result<(), Box<dyn Error>> {
    logging::init_logger(LogLevel::Info, None);

    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CONFIG_PATH);
    let sites_path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_SITES_PATH);

    let config = match config::load_config(config_path)? {
        Some(config) => config,
        None => {
            logging::warn(
                DataSource::Registry,
                None,
                &format!("Config file '{}' not found, using defaults", config_path),
            );
            Config::default()
        }
    };

    let registry = sites::load_sites(sites_path)?;
    logging::info(
        DataSource::Registry,
        None,
        &format!("Loaded {} site(s) from {}", registry.len(), sites_path),
    );

    export::ensure_output_dir(&config.directories.temperature_output)?;
    let output_dir = Path::new(&config.directories.temperature_output);
    let timestamp = export::run_timestamp();

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.fetch.timeout_secs))
        .build()?;

    let end_date = Utc::now().date_naive();
    let start_date = end_date - ChronoDuration::days(i64::from(config.fetch.years_back) * 365);

    let mut stats_rows: Vec<(Site, Vec<seasonal::SeasonalStatistics>)> = Vec::new();
    let mut summaries: Vec<SiteSummary> = Vec::new();
    let mut skipped = 0usize;

    for site in &registry {
        logging::info(
            DataSource::Archive,
            Some(&site.site_id),
            &format!(
                "Fetching {} to {} for ({}, {})",
                start_date, end_date, site.latitude, site.longitude
            ),
        );

        let series = match open_meteo::fetch_daily_climate(
            &client,
            site.latitude,
            site.longitude,
            start_date,
            end_date,
        ) {
            Ok(series) => series,
            Err(e) => {
                logging::log_archive_failure(&site.site_id, "archive fetch", &e);
                skipped += 1;
                continue;
            }
        };

        if series.incomplete_days > 0 {
            logging::warn(
                DataSource::Archive,
                Some(&site.site_id),
                &format!("{} incomplete day(s) dropped at ingest", series.incomplete_days),
            );
        }

        let outcome = calendar::augment(&series.records);
        for malformed in &outcome.malformed {
            logging::warn(
                DataSource::Archive,
                Some(&site.site_id),
                &format!("Excluded from aggregation: {}", malformed),
            );
        }

        if outcome.records.is_empty() {
            logging::warn(
                DataSource::Archive,
                Some(&site.site_id),
                "No usable records in series, skipping site",
            );
            skipped += 1;
            continue;
        }

        export::write_daily_csv(output_dir, &timestamp, site, &outcome.records)?;

        let mut by_site = BTreeMap::new();
        by_site.insert(site.site_id.clone(), outcome.records.clone());
        let aggregated = seasonal::aggregate(&by_site);
        let site_stats = aggregated.into_values().next().unwrap_or_default();

        let yearly = trend::yearly_trend(&outcome.records);
        export::write_yearly_trends_csv(output_dir, &timestamp, site, &yearly)?;

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
        export::write_monthly_fit_csv(output_dir, &timestamp, site, &fit_rows)?;

        let temps: Vec<f64> = outcome
            .records
            .iter()
            .map(|r| r.metric(Metric::TemperatureMean))
            .collect();
        let overall = seasonal::summarize(&temps);
        summaries.push(SiteSummary {
            site_id: site.site_id.clone(),
            address: site.address.clone(),
            latitude: site.latitude,
            longitude: site.longitude,
            avg_temp: overall.mean,
            std_temp: overall.std,
        });

        logging::info(
            DataSource::Archive,
            Some(&site.site_id),
            &format!(
                "Aggregated {} record(s) across {} season(s)",
                outcome.records.len(),
                site_stats.len()
            ),
        );
        stats_rows.push((site.clone(), site_stats));
    }

    if !stats_rows.is_empty() {
        let stats_path = export::write_statistics_csv(output_dir, &timestamp, &stats_rows)?;
        export::write_seasonal_json(output_dir, &timestamp, &stats_rows)?;
        export::write_summary_json(output_dir, &timestamp, &summaries)?;
        logging::info(
            DataSource::Export,
            None,
            &format!("Wrote statistics to {}", stats_path.display()),
        );
    }

    logging::log_run_summary(registry.len(), stats_rows.len(), skipped);

    if stats_rows.is_empty() {
        return Err("no site produced any usable climate data".into());
    }
    Ok(())
}
