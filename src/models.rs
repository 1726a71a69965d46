//! Data models flowing through the pipeline.
//!
//! - [`RawCandidate`]: what the extractor pulled out of one article page
//! - [`AcceptedRecord`]: a candidate that passed the acceptance filter; the
//!   unit persisted to the JSONL sink
//! - [`DailyCount`] / [`DailySeries`]: per-day aggregation output
//!
//! Field names of [`AcceptedRecord`] are the persisted line format and must
//! not change: `date`, `url`, `title`, `keywords`, `description`,
//! `published_datetime`.

use crate::dates;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Fields extracted from one article page, before filtering.
///
/// Missing text fields are empty strings; a missing or unparsable publish
/// date is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub url: String,
    pub published_at: Option<NaiveDateTime>,
    pub title: String,
    pub keywords: String,
    pub description: String,
}

/// A candidate that passed the date window and keyword checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedRecord {
    /// Calendar day of publication, `YYYY-MM-DD`.
    pub date: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub description: String,
    /// Timezone-naive publish timestamp.
    #[serde(with = "dates::iso_datetime")]
    pub published_datetime: NaiveDateTime,
}

impl AcceptedRecord {
    /// Build a record from a candidate and its known publish time.
    pub fn new(candidate: RawCandidate, published: NaiveDateTime) -> Self {
        AcceptedRecord {
            date: dates::format_day(&published),
            url: candidate.url,
            title: candidate.title,
            keywords: candidate.keywords,
            description: candidate.description,
            published_datetime: published,
        }
    }

    /// Parsed calendar day, if `date` is well formed.
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, dates::DAY_FORMAT).ok()
    }
}

/// Article count for one day, with its smoothed value and local gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
    pub smoothed: f64,
    pub gradient: f64,
}

/// Three aligned series over a date axis, ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    /// Site id, or a label for a multi-site total.
    pub site: String,
    pub dates: Vec<NaiveDate>,
    pub raw: Vec<u32>,
    pub smoothed: Vec<f64>,
    pub gradient: Vec<f64>,
}

impl DailySeries {
    pub fn from_counts(site: impl Into<String>, counts: &[DailyCount]) -> Self {
        DailySeries {
            site: site.into(),
            dates: counts.iter().map(|c| c.date).collect(),
            raw: counts.iter().map(|c| c.count).collect(),
            smoothed: counts.iter().map(|c| c.smoothed).collect(),
            gradient: counts.iter().map(|c| c.gradient).collect(),
        }
    }

    /// Sum of the raw counts.
    pub fn total(&self) -> u64 {
        self.raw.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> RawCandidate {
        RawCandidate {
            url: "https://vnexpress.net/covid-1.html".to_string(),
            published_at: None,
            title: "Covid-19 outbreak update".to_string(),
            keywords: String::new(),
            description: "latest coronavirus news".to_string(),
        }
    }

    #[test]
    fn test_accepted_record_serialization() {
        let published = NaiveDate::from_ymd_opt(2020, 3, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let record = AcceptedRecord::new(candidate(), published);
        assert_eq!(record.date, "2020-03-15");
        assert_eq!(record.day(), NaiveDate::from_ymd_opt(2020, 3, 15));

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2020-03-15","url":"https://vnexpress.net/covid-1.html","title":"Covid-19 outbreak update","keywords":"","description":"latest coronavirus news","published_datetime":"2020-03-15T08:00:00"}"#
        );
    }

    #[test]
    fn test_accepted_record_reads_legacy_lines() {
        let line = r#"{"date": "2020-03-15", "url": "https://laodong.vn/a.ldo", "title": "t", "keywords": "k", "description": "d", "published_datetime": "2020-03-15 08:00:00"}"#;
        let record: AcceptedRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.published_datetime.to_string(), "2020-03-15 08:00:00");

        let missing_fields = r#"{"date": "2020-03-15", "url": "u", "published_datetime": "2020-03-15T08:00:00.250"}"#;
        let record: AcceptedRecord = serde_json::from_str(missing_fields).unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.published_datetime.to_string(), "2020-03-15 08:00:00.250");

        let bad = r#"{"date": "2020-03-15", "url": "u", "published_datetime": "soon"}"#;
        assert!(serde_json::from_str::<AcceptedRecord>(bad).is_err());
    }

    #[test]
    fn test_daily_series_from_counts() {
        let d = |day| NaiveDate::from_ymd_opt(2020, 1, day).unwrap();
        let counts = vec![
            DailyCount { date: d(1), count: 2, smoothed: 2.0, gradient: 0.0 },
            DailyCount { date: d(2), count: 3, smoothed: 2.5, gradient: 0.5 },
        ];
        let series = DailySeries::from_counts("vtv", &counts);
        assert_eq!(series.len(), 2);
        assert_eq!(series.raw, vec![2, 3]);
        assert_eq!(series.gradient, vec![0.0, 0.5]);
        assert_eq!(series.total(), 5);
    }
}
