/// Aggregation core for the climate monitoring service.
///
/// Pure, synchronous transformations over in-memory record sequences:
/// no I/O, no clock reads, no shared state. Failures here are per-record
/// and reported, never fatal to a run.
///
/// Submodules:
/// - `calendar` — attaches year/month/season to daily records.
/// - `seasonal` — per-site, per-season descriptive statistics.
/// - `trend`    — yearly aggregates and monthly least-squares fits.

pub mod calendar;
pub mod seasonal;
pub mod trend;
