//! Deduplicating daily aggregation.
//!
//! Takes a complete accepted-record set (one site, or several) and turns it
//! into a per-day count over a caller-supplied date range, a smoothed count
//! and the smoothed series' first difference. This is a batch operation:
//! every run recomputes from scratch.

pub mod smoothing;

use crate::error::ConfigError;
use crate::models::{AcceptedRecord, DailyCount};
use chrono::NaiveDate;
use itertools::{Itertools, izip};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Inclusive, contiguous range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if end < start {
            return Err(ConfigError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn len(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Smoothing window (odd, in days) and local polynomial degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smoothing {
    pub window: usize,
    pub degree: usize,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            window: 35,
            degree: 3,
        }
    }
}

impl Smoothing {
    pub fn new(window: usize, degree: usize) -> Result<Self, ConfigError> {
        if window % 2 == 0 || window <= degree {
            return Err(ConfigError::InvalidSmoothing { window, degree });
        }
        Ok(Self { window, degree })
    }
}

/// Keep one record per URL; the last one seen wins.
pub fn dedup_by_url<'a, I>(records: I) -> Vec<&'a AcceptedRecord>
where
    I: IntoIterator<Item = &'a AcceptedRecord>,
{
    let mut by_url: HashMap<&'a str, &'a AcceptedRecord> = HashMap::new();
    for record in records {
        by_url.insert(record.url.as_str(), record);
    }
    by_url.into_values().collect()
}

/// Raw per-day counts of already-deduplicated records over `range`.
///
/// Records are indexed by day once, then each day is a single lookup.
pub fn count_by_day(records: &[&AcceptedRecord], range: &DateRange) -> Vec<u32> {
    let mut malformed = 0usize;
    let by_day = records
        .iter()
        .filter_map(|r| {
            let day = r.day();
            if day.is_none() {
                malformed += 1;
            }
            day
        })
        .counts();
    if malformed > 0 {
        warn!(malformed, "Skipped records with a malformed date");
    }
    range
        .days()
        .map(|d| by_day.get(&d).map_or(0, |&c| u32::try_from(c).unwrap_or(u32::MAX)))
        .collect()
}

/// Dedup, count, smooth and differentiate one site's records.
pub fn aggregate(records: &[AcceptedRecord], range: &DateRange, smoothing: &Smoothing) -> Vec<DailyCount> {
    let unique = dedup_by_url(records);
    debug!(
        records = records.len(),
        unique = unique.len(),
        days = range.len(),
        "Aggregating"
    );
    build(range, count_by_day(&unique, range), smoothing)
}

/// Aggregate several sites into one series.
///
/// Each site is deduplicated on its own, raw counts are summed per day, and
/// the total is smoothed.
pub fn aggregate_sites<'a, I>(sites: I, range: &DateRange, smoothing: &Smoothing) -> Vec<DailyCount>
where
    I: IntoIterator<Item = &'a [AcceptedRecord]>,
{
    let mut total = vec![0u32; range.len()];
    for records in sites {
        let counts = count_by_day(&dedup_by_url(records), range);
        for (t, c) in total.iter_mut().zip(counts) {
            *t = t.saturating_add(c);
        }
    }
    build(range, total, smoothing)
}

fn build(range: &DateRange, raw: Vec<u32>, smoothing: &Smoothing) -> Vec<DailyCount> {
    let values: Vec<f64> = raw.iter().map(|&c| f64::from(c)).collect();
    let smoothed = smoothing::savgol(&values, smoothing.window, smoothing.degree);
    let gradient = smoothing::first_difference(&smoothed);
    izip!(range.days(), raw, smoothed, gradient)
        .map(|(date, count, smoothed, gradient)| DailyCount {
            date,
            count,
            smoothed,
            gradient,
        })
        .collect()
}
