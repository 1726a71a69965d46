//! YAML run configuration.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! stock COVID-19 run: the six topic keywords, the 2019-11-17 .. 2021-02-23
//! acceptance window and a 35-day cubic smoother.
//!
//! ```yaml
//! keywords: [covid, ncov]
//! window:
//!   start: 2020-01-01
//!   end: 2021-01-01
//! aggregation:
//!   start: 2020-01-01
//!   end: 2020-12-31
//! smoothing:
//!   window: 21
//!   degree: 3
//! fetch:
//!   concurrency: 8
//! sites:
//!   - site_id: thanhnien
//!     ...
//! ```

use crate::aggregate::{DateRange, Smoothing};
use crate::error::ConfigError;
use crate::filter::{DateWindow, KeywordSet};
use crate::rules::{RuleRegistry, SiteRuleSpec};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

pub const DEFAULT_KEYWORDS: [&str; 6] = [
    "coronavirus",
    "corona virus",
    "covid",
    "ncov",
    "sars-cov",
    "viem phoi",
];

pub const DEFAULT_USER_AGENT: &str = "Mozilla/4.0 (compatible; MSIE 7.0; Windows NT 5.1)";

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub keywords: Vec<String>,
    pub window: WindowConfig,
    pub aggregation: RangeConfig,
    pub smoothing: SmoothingConfig,
    pub fetch: FetchConfig,
    /// Extra site rules; a rule whose id matches a built-in replaces it.
    pub sites: Vec<SiteRuleSpec>,
}

/// Acceptance window by calendar day. `end` is exclusive and optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub start: NaiveDate,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Inclusive aggregation range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub window: usize,
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Requests in flight at once.
    pub concurrency: usize,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            window: WindowConfig::default(),
            aggregation: RangeConfig::default(),
            smoothing: SmoothingConfig::default(),
            fetch: FetchConfig::default(),
            sites: Vec::new(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            start: ymd(2019, 11, 17),
            end: Some(ymd(2021, 2, 23)),
        }
    }
}

impl Default for RangeConfig {
    fn default() -> Self {
        RangeConfig {
            start: ymd(2019, 11, 17),
            end: ymd(2021, 1, 1),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        let s = Smoothing::default();
        SmoothingConfig {
            window: s.window,
            degree: s.degree,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            concurrency: 16,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a config file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        info!(
            keywords = config.keywords.len(),
            extra_sites = config.sites.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Check the parts that have invariants beyond their types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.date_range()?;
        self.smoothing()?;
        match self.window.end {
            Some(end) if end < self.window.start => Err(ConfigError::InvalidRange {
                start: self.window.start.to_string(),
                end: end.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn date_window(&self) -> DateWindow {
        DateWindow::new(
            self.window.start.and_time(NaiveTime::MIN),
            self.window.end.map(|d| d.and_time(NaiveTime::MIN)),
        )
    }

    pub fn keyword_set(&self) -> KeywordSet {
        KeywordSet::new(&self.keywords)
    }

    pub fn date_range(&self) -> Result<DateRange, ConfigError> {
        DateRange::new(self.aggregation.start, self.aggregation.end)
    }

    pub fn smoothing(&self) -> Result<Smoothing, ConfigError> {
        Smoothing::new(self.smoothing.window, self.smoothing.degree)
    }

    /// Built-in rules merged with the configured ones.
    pub fn registry(&self) -> Result<RuleRegistry, ConfigError> {
        RuleRegistry::with_overrides(self.sites.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.keywords.len(), 6);
        assert_eq!(config.fetch.user_agent, DEFAULT_USER_AGENT);

        let window = config.date_window();
        assert_eq!(window.start.to_string(), "2019-11-17 00:00:00");
        assert_eq!(window.end.unwrap().to_string(), "2021-02-23 00:00:00");

        let range = config.date_range().unwrap();
        assert_eq!(range.len(), 412);
        assert_eq!(config.smoothing().unwrap(), Smoothing::default());
        assert!(config.keyword_set().matches("Dịch COVID-19"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(PipelineConfig::from_yaml("").unwrap(), PipelineConfig::default());
        assert_eq!(PipelineConfig::from_yaml("  \n").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let yaml = "keywords: [covid]\nwindow:\n  start: 2020-01-01\nsmoothing:\n  window: 7\n";
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.keywords, vec!["covid".to_string()]);
        assert_eq!(config.window.end, None);
        assert_eq!(config.date_window().end, None);
        assert_eq!(config.smoothing.window, 7);
        assert_eq!(config.smoothing.degree, 3);
        assert_eq!(config.fetch.concurrency, 16);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_smoothing = PipelineConfig::from_yaml("smoothing:\n  window: 8\n").unwrap();
        assert!(matches!(
            bad_smoothing.validate(),
            Err(ConfigError::InvalidSmoothing { window: 8, degree: 3 })
        ));

        let bad_range =
            PipelineConfig::from_yaml("aggregation:\n  start: 2021-01-01\n  end: 2020-01-01\n").unwrap();
        assert!(matches!(bad_range.validate(), Err(ConfigError::InvalidRange { .. })));

        let bad_window =
            PipelineConfig::from_yaml("window:\n  start: 2021-01-01\n  end: 2020-01-01\n").unwrap();
        assert!(bad_window.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "keywords: [ncov]").unwrap();
        writeln!(file, "fetch:\n  concurrency: 4").unwrap();
        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.keywords, vec!["ncov".to_string()]);
        assert_eq!(config.fetch.concurrency, 4);
        assert_eq!(config.registry().unwrap().len(), 10);
    }

    #[test]
    fn test_load_errors() {
        let err = PipelineConfig::load("/nonexistent/news_pulse.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "keywords: {{ not: a list }}").unwrap();
        let err = PipelineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        assert_eq!(PipelineConfig::load_or_default(None).unwrap(), PipelineConfig::default());
    }
}
