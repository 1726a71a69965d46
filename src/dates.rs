//! Publish-date normalization.
//!
//! Every site encodes its publish time differently: ISO-8601 meta tags with
//! or without an offset, JSON-LD blocks whose fractional seconds have
//! inconsistent precision, and free-text `DD/MM/YYYY | HH:MM` stamps. All of
//! them are reduced here to a naive [`NaiveDateTime`]. Offsets are dropped,
//! not applied: the wall-clock time printed by the site is what gets
//! compared against the acceptance window.
//!
//! Nothing in this module returns an error. A string that cannot be parsed
//! yields `None` and the page simply has no determinable publish date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Calendar day format used for `AcceptedRecord::date` and the aggregator.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Free-text stamp used by laodong, e.g. `22/02/2021 | 10:15`.
pub const DAY_MONTH_YEAR_TIME: &str = "%d/%m/%Y | %H:%M";

/// Width the fractional seconds are padded to for [`DateFormat::Iso8601PaddedFraction`].
pub const FRACTION_WIDTH: usize = 3;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Declared format of a raw date string.
///
/// In configuration files this is a plain string: `iso8601`,
/// `iso8601_padded`, `day_month_year_time`, or any strftime pattern
/// (anything containing `%`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateFormat {
    /// `YYYY-MM-DD[(T| )HH:MM[:SS[.frac]]][Z|±HH:MM]`
    Iso8601,
    /// ISO-8601 whose fractional seconds are padded to [`FRACTION_WIDTH`] first.
    Iso8601PaddedFraction,
    /// [`DAY_MONTH_YEAR_TIME`]
    DayMonthYearTime,
    /// Explicit strftime pattern, offset-aware first, then naive.
    Pattern(String),
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFormat::Iso8601 => f.write_str("iso8601"),
            DateFormat::Iso8601PaddedFraction => f.write_str("iso8601_padded"),
            DateFormat::DayMonthYearTime => f.write_str("day_month_year_time"),
            DateFormat::Pattern(p) => f.write_str(p),
        }
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "iso8601" => Ok(DateFormat::Iso8601),
            "iso8601_padded" => Ok(DateFormat::Iso8601PaddedFraction),
            "day_month_year_time" => Ok(DateFormat::DayMonthYearTime),
            p if p.contains('%') => Ok(DateFormat::Pattern(p.to_string())),
            other => Err(format!("unknown date format `{other}`")),
        }
    }
}

impl TryFrom<String> for DateFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateFormat> for String {
    fn from(value: DateFormat) -> Self {
        value.to_string()
    }
}

/// Parse `raw` according to `format`, returning a timezone-naive timestamp.
pub fn normalize(format: &DateFormat, raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = match format {
        DateFormat::Iso8601 => parse_iso8601(raw),
        DateFormat::Iso8601PaddedFraction => parse_iso8601(&pad_fraction(raw, FRACTION_WIDTH)),
        DateFormat::DayMonthYearTime => NaiveDateTime::parse_from_str(raw, DAY_MONTH_YEAR_TIME).ok(),
        DateFormat::Pattern(pattern) => parse_pattern(raw, pattern),
    };
    if parsed.is_none() {
        tracing::trace!(%format, raw, "Date string did not parse");
    }
    parsed
}

/// Lenient ISO-8601 parsing. A trailing offset is discarded after parsing.
pub fn parse_iso8601(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, DAY_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_pattern(raw: &str, pattern: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_str(raw, pattern)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, pattern))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, pattern)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Pad the fractional-seconds part of an ISO-8601 string with zeros to
/// `width` digits, inserting a fraction when there is none. Longer
/// fractions and date-only strings are left as they are. An offset suffix
/// is preserved.
pub fn pad_fraction(raw: &str, width: usize) -> String {
    // YYYY-MM-DD is 10 bytes; no time component means nothing to pad.
    let Some(time_part) = raw.get(10..) else {
        return raw.to_string();
    };
    if time_part.len() < 2 {
        return raw.to_string();
    }
    let offset_at = time_part
        .find(|c| c == '+' || c == '-' || c == 'Z')
        .map(|i| 10 + i)
        .unwrap_or(raw.len());
    let (head, tail) = raw.split_at(offset_at);

    let padded = match head.split_once('.') {
        Some((secs, frac)) if frac.len() < width => format!("{secs}.{frac:0<width$}"),
        Some(_) => head.to_string(),
        None => format!("{head}.{}", "0".repeat(width)),
    };
    format!("{padded}{tail}")
}

/// Scan embedded structured-data blobs, in document order, for a
/// `datePublished` field.
///
/// The first blob that parses as a JSON object containing the key wins and
/// later blobs are not looked at, even when the winning value is not a
/// string. Blobs that do not parse are skipped.
pub fn scan_date_published<I>(blobs: I) -> Option<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for blob in blobs {
        let text = strip_cdata(blob.as_ref());
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) else {
            continue;
        };
        if let Some(value) = map.get("datePublished") {
            return value.as_str().map(str::to_owned);
        }
    }
    None
}

fn strip_cdata(text: &str) -> &str {
    text.trim()
        .trim_start_matches("<![CDATA[")
        .trim_end_matches("]]>")
        .trim()
}

/// Format a timestamp as its calendar day.
pub fn format_day(ts: &NaiveDateTime) -> String {
    ts.format(DAY_FORMAT).to_string()
}

/// Serde adapter for persisted `published_datetime` values.
///
/// Writes `YYYY-MM-DDTHH:MM:SS[.frac]`; reads anything [`parse_iso8601`]
/// accepts, which covers older feeds written with a space separator.
pub mod iso_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(WRITE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso8601(&raw)
            .ok_or_else(|| D::Error::custom(format!("unparsable published_datetime `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_iso8601_with_offset_keeps_wall_clock() {
        let ts = normalize(&DateFormat::Iso8601, "2021-02-22T10:15:30+07:00").unwrap();
        assert_eq!(ts, ymd_hms(2021, 2, 22, 10, 15, 30));
        assert_eq!(format_day(&ts), "2021-02-22");
    }

    #[test]
    fn test_iso8601_variants() {
        let expected = ymd_hms(2020, 3, 15, 8, 0, 0);
        for raw in [
            "2020-03-15T08:00:00",
            "2020-03-15 08:00:00",
            "2020-03-15T08:00:00Z",
            "2020-03-15T08:00:00+0700",
            "2020-03-15T08:00",
            "  2020-03-15T08:00:00+00:00 ",
        ] {
            assert_eq!(normalize(&DateFormat::Iso8601, raw), Some(expected), "{raw}");
        }
        assert_eq!(
            normalize(&DateFormat::Iso8601, "2020-03-15"),
            Some(ymd_hms(2020, 3, 15, 0, 0, 0))
        );
    }

    #[test]
    fn test_late_evening_offset_does_not_shift_day() {
        let ts = normalize(&DateFormat::Iso8601, "2020-03-15T23:30:00+07:00").unwrap();
        assert_eq!(format_day(&ts), "2020-03-15");
    }

    #[test]
    fn test_pad_fraction() {
        assert_eq!(pad_fraction("2020-03-15T08:00:00", 3), "2020-03-15T08:00:00.000");
        assert_eq!(pad_fraction("2020-03-15T08:00:00.5", 3), "2020-03-15T08:00:00.500");
        assert_eq!(pad_fraction("2020-03-15T08:00:00.12", 3), "2020-03-15T08:00:00.120");
        assert_eq!(pad_fraction("2020-03-15T08:00:00.123456", 3), "2020-03-15T08:00:00.123456");
        assert_eq!(
            pad_fraction("2020-03-15T08:00:00.5+07:00", 3),
            "2020-03-15T08:00:00.500+07:00"
        );
        assert_eq!(pad_fraction("2020-03-15", 3), "2020-03-15");
    }

    #[test]
    fn test_padded_fraction_format() {
        let ts = normalize(&DateFormat::Iso8601PaddedFraction, "2020-12-01T17:05:09.4").unwrap();
        assert_eq!(ts.and_utc().timestamp_subsec_millis(), 400);
        assert_eq!(format_day(&ts), "2020-12-01");

        let ts = normalize(&DateFormat::Iso8601PaddedFraction, "2020-12-01T17:05:09").unwrap();
        assert_eq!(ts, ymd_hms(2020, 12, 1, 17, 5, 9));
    }

    #[test]
    fn test_day_month_year_time() {
        let ts = normalize(&DateFormat::DayMonthYearTime, "22/02/2021 | 10:15").unwrap();
        assert_eq!(ts, ymd_hms(2021, 2, 22, 10, 15, 0));
        assert_eq!(format_day(&ts), "2021-02-22");

        let ts = normalize(&DateFormat::DayMonthYearTime, "\n   05/01/2020 | 07:45  ").unwrap();
        assert_eq!(format_day(&ts), "2020-01-05");
    }

    #[test]
    fn test_explicit_pattern() {
        let format = DateFormat::Pattern("%Y-%m-%dT%H:%M:%S%z".to_string());
        let ts = normalize(&format, "2020-07-31T21:04:00+0700").unwrap();
        assert_eq!(ts, ymd_hms(2020, 7, 31, 21, 4, 0));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(normalize(&DateFormat::Iso8601, ""), None);
        assert_eq!(normalize(&DateFormat::Iso8601, "yesterday"), None);
        assert_eq!(normalize(&DateFormat::DayMonthYearTime, "2021-02-22T10:15:30"), None);
        assert_eq!(normalize(&DateFormat::Iso8601PaddedFraction, "not a date at all"), None);
    }

    #[test]
    fn test_date_format_from_str() {
        assert_eq!("iso8601".parse::<DateFormat>(), Ok(DateFormat::Iso8601));
        assert_eq!(
            "iso8601_padded".parse::<DateFormat>(),
            Ok(DateFormat::Iso8601PaddedFraction)
        );
        assert_eq!(
            "%d.%m.%Y".parse::<DateFormat>(),
            Ok(DateFormat::Pattern("%d.%m.%Y".to_string()))
        );
        assert!("rfc2822".parse::<DateFormat>().is_err());
    }

    #[test]
    fn test_scan_first_match_wins() {
        let blobs = [
            r#"{"@type": "Organization", "name": "Dan Tri"}"#,
            "this is { not json",
            r#"{"@type": "NewsArticle", "datePublished": "2020-03-15T08:00:00"}"#,
            r#"{"@type": "NewsArticle", "datePublished": "1999-01-01T00:00:00"}"#,
        ];
        assert_eq!(
            scan_date_published(blobs).as_deref(),
            Some("2020-03-15T08:00:00")
        );
    }

    #[test]
    fn test_scan_stops_at_first_block_with_field() {
        let blobs = [
            r#"{"datePublished": 20200315}"#,
            r#"{"datePublished": "2020-03-15T08:00:00"}"#,
        ];
        assert_eq!(scan_date_published(blobs), None);
    }

    #[test]
    fn test_scan_ignores_arrays_and_strips_cdata() {
        let blobs = [
            r#"[{"datePublished": "2001-01-01"}]"#,
            "<![CDATA[ {\"datePublished\": \"2020-04-01T09:30:00\"} ]]>",
        ];
        assert_eq!(scan_date_published(blobs).as_deref(), Some("2020-04-01T09:30:00"));
        assert_eq!(scan_date_published(Vec::<String>::new()), None);
    }
}
