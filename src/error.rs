//! Error types for the pipeline.
//!
//! Only setup mistakes are errors here. Per-page conditions (not an article,
//! unparsable date, missing field, rejected candidate) are represented as
//! data by the extractor and filter and never show up in these enums.

use thiserror::Error;

/// Fatal, pre-run configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No rule is registered for the requested site.
    #[error("no extraction rule registered for site `{0}`")]
    UnknownSite(String),

    /// Two rule descriptors claim the same site id.
    #[error("duplicate extraction rule for site `{0}`")]
    DuplicateSite(String),

    /// A rule has no way of recognising article pages.
    #[error("rule for site `{0}` has no article detector")]
    MissingDetector(String),

    /// A rule could never produce a usable record.
    #[error("rule for site `{site}` declares no {what}")]
    NoFieldSelectors { site: String, what: &'static str },

    /// A CSS selector failed to compile.
    #[error("rule for site `{site}`: invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        site: String,
        selector: String,
        reason: String,
    },

    /// A URL regex failed to compile.
    #[error("rule for site `{site}`: invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        site: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A date range whose end precedes its start.
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: String, end: String },

    /// Smoothing window must be odd and larger than the polynomial degree.
    #[error("invalid smoothing: window {window}, degree {degree}")]
    InvalidSmoothing { window: usize, degree: usize },

    /// The configuration file could not be read.
    #[error("failed to read config `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for this schema.
    #[error("failed to parse config `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failures writing or reading persisted records and series.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SinkError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        SinkError::Io {
            path: path.into(),
            source,
        }
    }
}
