/// Calendar augmentation: year, month, and season assignment.
///
/// Season is a pure function of the record's calendar month; augmentation
/// reads nothing but the date field. A record whose date does not parse is
/// excluded and reported, never fatal — the caller logs the exclusions and
/// the run continues.

use chrono::{Datelike, NaiveDate};

use crate::model::{AugmentedRecord, DailyClimateRecord, Season};

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Result of augmenting one series: the enriched records plus every
/// exclusion, so no record is ever dropped silently.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentOutcome {
    pub records: Vec<AugmentedRecord>,
    pub malformed: Vec<MalformedRecord>,
}

/// A record excluded from aggregation because its date field was unusable.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRecord {
    /// Position in the input series.
    pub index: usize,
    /// The offending date string, verbatim.
    pub date: String,
    pub detail: String,
}

impl std::fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "record {} has malformed date '{}': {}",
            self.index, self.date, self.detail
        )
    }
}

// ---------------------------------------------------------------------------
// Augmentation
// ---------------------------------------------------------------------------

/// Attaches year, month, and season to each record of a series.
///
/// Deterministic and pure: the same input always yields the same outcome,
/// and the output order matches the input order.
pub fn augment(records: &[DailyClimateRecord]) -> AugmentOutcome {
    let mut augmented = Vec::with_capacity(records.len());
    let mut malformed = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match NaiveDate::parse_from_str(&record.date, "%Y-%m-%d") {
            Ok(date) => {
                let month = date.month();
                // month() is 1-12 by construction, so the season lookup is total here
                let season = Season::from_month(month)
                    .unwrap_or_else(|| unreachable!("chrono month out of 1-12"));
                augmented.push(AugmentedRecord {
                    record: record.clone(),
                    year: date.year(),
                    month,
                    season,
                });
            }
            Err(e) => malformed.push(MalformedRecord {
                index,
                date: record.date.clone(),
                detail: e.to_string(),
            }),
        }
    }

    AugmentOutcome {
        records: augmented,
        malformed,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
