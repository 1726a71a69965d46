//! Declarative, serializable site rule descriptors.
//!
//! These are what the built-in site modules and YAML configuration files
//! produce. They hold selectors and patterns as plain strings; the
//! [`RuleRegistry`](super::RuleRegistry) compiles and validates them.
//!
//! # YAML shape
//!
//! ```yaml
//! site_id: vnexpress
//! allowed_domains: [vnexpress.net]
//! start_urls: ["https://vnexpress.net/"]
//! allow: ["vnexpress.net/.+"]
//! deny_domains: [shop.vnexpress.net]
//! article_detector: { kind: selector, selector: 'body[data-source="Detail"]' }
//! date:
//!   - source: { from: attr, selector: 'meta[name="pubdate"]' }
//!     format: iso8601
//! title: { from: text, selector: title }
//! keywords: { from: attr, selector: 'meta[name="news_keywords"]' }
//! description: { from: attr, selector: 'meta[name="description"]' }
//! ```

use crate::dates::DateFormat;
use serde::{Deserialize, Serialize};

/// One site's extraction rule, before compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRuleSpec {
    pub site_id: String,
    /// Hosts (and their subdomains) the crawler may stay on.
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    #[serde(default)]
    pub start_urls: Vec<String>,
    /// URL regexes a followed link must match (any of).
    #[serde(default)]
    pub allow: Vec<String>,
    /// URL regexes that exclude a link.
    #[serde(default)]
    pub deny: Vec<String>,
    /// Hosts (and their subdomains) that are never followed.
    #[serde(default)]
    pub deny_domains: Vec<String>,
    pub article_detector: Option<DetectorSpec>,
    /// Tried in order; the first one that yields a parseable date wins.
    #[serde(default)]
    pub date: Vec<DateStrategySpec>,
    #[serde(default)]
    pub title: Option<FieldSpec>,
    #[serde(default)]
    pub keywords: Option<FieldSpec>,
    #[serde(default)]
    pub description: Option<FieldSpec>,
}

/// Predicate recognising an article page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorSpec {
    /// At least one element matches.
    Selector { selector: String },
    /// At least `min` elements match.
    MinMatches { selector: String, min: usize },
    /// The URL splits on `/` into more than `more_than` pieces.
    UrlSegments { more_than: usize },
    Any { of: Vec<DetectorSpec> },
    All { of: Vec<DetectorSpec> },
}

impl DetectorSpec {
    pub fn selector(selector: &str) -> Self {
        DetectorSpec::Selector {
            selector: selector.to_string(),
        }
    }

    pub fn min_matches(selector: &str, min: usize) -> Self {
        DetectorSpec::MinMatches {
            selector: selector.to_string(),
            min,
        }
    }
}

/// Where a single string field is read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum FieldSpec {
    /// Text content of the first matching element.
    Text { selector: String },
    /// Attribute of the first matching element (`content` unless given).
    Attr {
        selector: String,
        #[serde(default = "default_attr")]
        attr: String,
    },
}

fn default_attr() -> String {
    "content".to_string()
}

impl FieldSpec {
    pub fn text(selector: &str) -> Self {
        FieldSpec::Text {
            selector: selector.to_string(),
        }
    }

    /// `content` attribute of the first element matching `selector`.
    pub fn meta(selector: &str) -> Self {
        FieldSpec::Attr {
            selector: selector.to_string(),
            attr: default_attr(),
        }
    }
}

/// Where a raw date string comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum DateSourceSpec {
    Text { selector: String },
    Attr {
        selector: String,
        #[serde(default = "default_attr")]
        attr: String,
    },
    /// `datePublished` of the first JSON-LD block carrying one.
    JsonLd,
}

/// One candidate date extraction: a source tagged with its format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateStrategySpec {
    pub source: DateSourceSpec,
    pub format: DateFormat,
}

impl DateStrategySpec {
    pub fn meta(selector: &str, format: DateFormat) -> Self {
        DateStrategySpec {
            source: DateSourceSpec::Attr {
                selector: selector.to_string(),
                attr: default_attr(),
            },
            format,
        }
    }

    pub fn text(selector: &str, format: DateFormat) -> Self {
        DateStrategySpec {
            source: DateSourceSpec::Text {
                selector: selector.to_string(),
            },
            format,
        }
    }

    pub fn json_ld(format: DateFormat) -> Self {
        DateStrategySpec {
            source: DateSourceSpec::JsonLd,
            format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_from_yaml() {
        let yaml = r#"
site_id: example
allowed_domains: [example.vn]
article_detector:
  kind: all
  of:
    - { kind: selector, selector: "article.detail" }
    - { kind: url_segments, more_than: 4 }
date:
  - source: { from: json_ld }
    format: iso8601_padded
  - source: { from: text, selector: "span.date" }
    format: day_month_year_time
  - source: { from: attr, selector: "time", attr: datetime }
    format: "%Y-%m-%dT%H:%M:%S%z"
title: { from: text, selector: h1 }
description: { from: attr, selector: 'meta[name="description"]' }
"#;
        let spec: SiteRuleSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.site_id, "example");
        assert!(spec.keywords.is_none());
        assert!(spec.deny.is_empty());
        assert_eq!(spec.date.len(), 3);
        assert_eq!(spec.date[0].source, DateSourceSpec::JsonLd);
        assert_eq!(spec.date[1].format, DateFormat::DayMonthYearTime);
        assert_eq!(
            spec.date[2].source,
            DateSourceSpec::Attr {
                selector: "time".to_string(),
                attr: "datetime".to_string()
            }
        );
        assert_eq!(spec.description, Some(FieldSpec::meta(r#"meta[name="description"]"#)));
        match spec.article_detector {
            Some(DetectorSpec::All { of }) => assert_eq!(of.len(), 2),
            other => panic!("unexpected detector {other:?}"),
        }
    }

    #[test]
    fn test_unknown_date_format_rejected() {
        let yaml = r#"
source: { from: json_ld }
format: julian
"#;
        assert!(serde_yaml::from_str::<DateStrategySpec>(yaml).is_err());
    }
}
