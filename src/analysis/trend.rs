/// Trend reduction: yearly aggregates and monthly least-squares fits.
///
/// Produces the tabular inputs the trend plots are drawn from: per-year
/// mean/std of the three temperature quantities, and within each year a
/// degree-1 least-squares fit over (month, monthly mean temperature) pairs.

use std::collections::BTreeMap;

use crate::model::{AugmentedRecord, Metric};
use crate::analysis::seasonal::{round4, sample_std};

// ---------------------------------------------------------------------------
// Yearly aggregates
// ---------------------------------------------------------------------------

/// Mean and sample std of one quantity within one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendStats {
    pub mean: f64,
    /// `None` for a year with a single record.
    pub std: Option<f64>,
}

/// Year-level aggregates of the three temperature quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyAggregate {
    pub year: i32,
    pub record_count: usize,
    pub temperature_mean: TrendStats,
    pub temperature_max: TrendStats,
    pub temperature_min: TrendStats,
}

/// Computes year-level aggregates, ordered by year ascending.
pub fn yearly_trend(records: &[AugmentedRecord]) -> Vec<YearlyAggregate> {
    let mut by_year: BTreeMap<i32, Vec<&AugmentedRecord>> = BTreeMap::new();
    for record in records {
        by_year.entry(record.year).or_default().push(record);
    }

    by_year
        .into_iter()
        .map(|(year, partition)| {
            let stats_for = |metric: Metric| {
                let values: Vec<f64> = partition.iter().map(|r| r.metric(metric)).collect();
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                TrendStats {
                    mean: round4(mean),
                    std: sample_std(&values, mean).map(round4),
                }
            };
            YearlyAggregate {
                year,
                record_count: partition.len(),
                temperature_mean: stats_for(Metric::TemperatureMean),
                temperature_max: stats_for(Metric::TemperatureMax),
                temperature_min: stats_for(Metric::TemperatureMin),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Monthly means and linear fit
// ---------------------------------------------------------------------------

/// Mean of `temperature_mean` for one calendar month within one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyMean {
    /// Calendar month, 1–12.
    pub month: u32,
    pub mean: f64,
}

/// A fitted degree-1 polynomial: `y = slope * month + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fitted temperature for a month index.
    pub fn at(&self, month: u32) -> f64 {
        self.slope * month as f64 + self.intercept
    }
}

/// Monthly means of `temperature_mean` within one year, month ascending.
/// Months with no records are absent.
pub fn monthly_means(records: &[AugmentedRecord], year: i32) -> Vec<MonthlyMean> {
    let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.year == year) {
        by_month
            .entry(record.month)
            .or_default()
            .push(record.record.temperature_mean);
    }

    by_month
        .into_iter()
        .map(|(month, values)| MonthlyMean {
            month,
            mean: round4(values.iter().sum::<f64>() / values.len() as f64),
        })
        .collect()
}

/// Least-squares degree-1 fit over a year's (month, monthly mean) pairs.
///
/// Returns `None` when fewer than two months have data — a line through
/// one point is undefined, and we never fabricate one.
pub fn monthly_fit(records: &[AugmentedRecord], year: i32) -> Option<LinearFit> {
    let points: Vec<(f64, f64)> = monthly_means(records, year)
        .iter()
        .map(|m| (m.month as f64, m.mean))
        .collect();
    least_squares(&points)
}

/// Ordinary least-squares fit of `y = slope * x + intercept`.
///
/// `None` for fewer than two points or degenerate x (all equal).
pub fn least_squares(points: &[(f64, f64)]) -> Option<LinearFit> {
    let n = points.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();
    let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();

    let denominator = n_f * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n_f;
    Some(LinearFit { slope, intercept })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DailyClimateRecord, Season};

    fn record(year: i32, month: u32, day: u32, temperature_mean: f64) -> AugmentedRecord {
        AugmentedRecord {
            record: DailyClimateRecord {
                date: format!("{:04}-{:02}-{:02}", year, month, day),
                temperature_max: temperature_mean + 4.0,
                temperature_min: temperature_mean - 4.0,
                temperature_mean,
                humidity: 75.0,
                precipitation: 1.0,
            },
            year,
            month,
            season: Season::from_month(month).unwrap(),
        }
    }

    #[test]
    fn test_exact_linear_fit() {
        // Points on y = 2x + 3 recover slope 2 and intercept 3 exactly.
        let fit = least_squares(&[(1.0, 5.0), (2.0, 7.0), (3.0, 9.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 3.0).abs() < 1e-12);
        assert!((fit.at(4) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_least_squares_on_noisy_points() {
        // [(1,5),(2,6),(3,9)]: OLS slope is exactly 2.0, intercept 8/3.
        let fit = least_squares(&[(1.0, 5.0), (2.0, 6.0), (3.0, 9.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_undefined_for_fewer_than_two_points() {
        assert_eq!(least_squares(&[]), None);
        assert_eq!(least_squares(&[(1.0, 5.0)]), None);
    }

    #[test]
    fn test_fit_undefined_for_degenerate_x() {
        assert_eq!(least_squares(&[(2.0, 1.0), (2.0, 3.0)]), None);
    }

    #[test]
    fn test_monthly_means_are_month_ordered() {
        let records = vec![
            record(2023, 3, 1, 9.0),
            record(2023, 1, 1, 5.0),
            record(2023, 1, 2, 5.0),
            record(2023, 2, 1, 7.0),
        ];
        let means = monthly_means(&records, 2023);
        let months: Vec<u32> = means.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![1, 2, 3]);
        assert_eq!(means[0].mean, 5.0);
    }

    #[test]
    fn test_monthly_means_ignore_other_years() {
        let records = vec![record(2022, 1, 1, -100.0), record(2023, 1, 1, 5.0)];
        let means = monthly_means(&records, 2023);
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].mean, 5.0);
    }

    #[test]
    fn test_monthly_fit_through_monthly_means() {
        // Monthly means (1, 5.0), (2, 7.0), (3, 9.0) → slope 2, intercept 3.
        let records = vec![
            record(2023, 1, 1, 4.0),
            record(2023, 1, 2, 6.0),
            record(2023, 2, 1, 7.0),
            record(2023, 3, 1, 9.0),
        ];
        let fit = monthly_fit(&records, 2023).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_monthly_fit_undefined_with_single_month() {
        let records = vec![record(2023, 6, 1, 15.0), record(2023, 6, 2, 17.0)];
        assert_eq!(monthly_fit(&records, 2023), None);
    }

    #[test]
    fn test_yearly_trend_ordered_ascending() {
        let records = vec![
            record(2024, 1, 1, 6.0),
            record(2022, 1, 1, 4.0),
            record(2023, 1, 1, 5.0),
        ];
        let trend = yearly_trend(&records);
        let years: Vec<i32> = trend.iter().map(|t| t.year).collect();
        assert_eq!(years, vec![2022, 2023, 2024]);
    }

    #[test]
    fn test_yearly_trend_mean_and_std() {
        let records = vec![
            record(2023, 1, 1, 1.0),
            record(2023, 2, 1, 2.0),
            record(2023, 3, 1, 3.0),
        ];
        let trend = yearly_trend(&records);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].record_count, 3);
        assert_eq!(trend[0].temperature_mean.mean, 2.0);
        assert_eq!(trend[0].temperature_mean.std, Some(1.0));
    }

    #[test]
    fn test_single_record_year_has_undefined_std() {
        let trend = yearly_trend(&[record(2023, 5, 1, 10.0)]);
        assert_eq!(trend[0].temperature_mean.std, None);
        assert_eq!(trend[0].temperature_mean.mean, 10.0);
    }

    #[test]
    fn test_empty_series_yields_no_years() {
        assert!(yearly_trend(&[]).is_empty());
    }
}
