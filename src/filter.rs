//! Acceptance filter: the date window and keyword checks.
//!
//! Rejection is ordinary control flow, not an error. [`accept`] returns a
//! [`Verdict`] and the caller drops rejected candidates, optionally counting
//! the [`RejectionReason`] for diagnostics.

use crate::models::{AcceptedRecord, RawCandidate};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `[start, end)` window on the publish timestamp. `end = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
}

impl DateWindow {
    pub fn new(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        *ts >= self.start && self.end.is_none_or(|end| *ts < end)
    }
}

/// Topic keywords, lower-cased once at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Whether any keyword is a substring of `text`, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Why a candidate was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    NoDate,
    OutOfWindow,
    NoKeywordMatch,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RejectionReason::NoDate => "no_date",
            RejectionReason::OutOfWindow => "out_of_window",
            RejectionReason::NoKeywordMatch => "no_keyword_match",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(AcceptedRecord),
    Rejected(RejectionReason),
}

impl Verdict {
    pub fn accepted(self) -> Option<AcceptedRecord> {
        match self {
            Verdict::Accepted(r) => Some(r),
            Verdict::Rejected(_) => None,
        }
    }
}

/// Apply, in order: date presence, window membership, keyword match.
///
/// Keywords are matched against `title + keywords + description`,
/// concatenated in that order with no separator.
pub fn accept(candidate: RawCandidate, window: &DateWindow, keywords: &KeywordSet) -> Verdict {
    let Some(published) = candidate.published_at else {
        return Verdict::Rejected(RejectionReason::NoDate);
    };
    if !window.contains(&published) {
        return Verdict::Rejected(RejectionReason::OutOfWindow);
    }
    let haystack = [
        candidate.title.as_str(),
        candidate.keywords.as_str(),
        candidate.description.as_str(),
    ]
    .concat();
    if !keywords.matches(&haystack) {
        return Verdict::Rejected(RejectionReason::NoKeywordMatch);
    }
    Verdict::Accepted(AcceptedRecord::new(candidate, published))
}
