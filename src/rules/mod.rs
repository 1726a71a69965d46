//! Per-site extraction rules.
//!
//! A [`SiteRule`] is the compiled, immutable form of a [`SiteRuleSpec`]:
//! selectors are parsed and URL patterns are compiled once, when the
//! [`RuleRegistry`] is built, so a bad rule is reported at startup rather
//! than on the first page that exercises it.
//!
//! The registry holds exactly one rule per site id and is never mutated
//! after construction. It is `Send + Sync` and can be shared by reference
//! (or through an `Arc`) across any number of extraction workers.

pub mod descriptor;

use crate::dates::{self, DateFormat};
use crate::error::ConfigError;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashMap;
use tracing::{debug, info};
use url::Url;

pub use descriptor::{DateSourceSpec, DateStrategySpec, DetectorSpec, FieldSpec, SiteRuleSpec};

static JSON_LD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("static selector is valid")
});

/// Compiled article-page predicate.
#[derive(Debug, Clone)]
pub enum ArticleDetector {
    Selector(Selector),
    MinMatches(Selector, usize),
    UrlSegments(usize),
    Any(Vec<ArticleDetector>),
    All(Vec<ArticleDetector>),
}

impl ArticleDetector {
    pub fn matches(&self, url: &str, document: &Html) -> bool {
        match self {
            ArticleDetector::Selector(sel) => document.select(sel).next().is_some(),
            ArticleDetector::MinMatches(sel, min) => document.select(sel).take(*min).count() >= *min,
            ArticleDetector::UrlSegments(more_than) => url.split('/').count() > *more_than,
            ArticleDetector::Any(all) => all.iter().any(|d| d.matches(url, document)),
            ArticleDetector::All(all) => all.iter().all(|d| d.matches(url, document)),
        }
    }
}

/// Compiled lookup of a single string in the document.
#[derive(Debug, Clone)]
pub enum NodeLookup {
    Text(Selector),
    Attr(Selector, String),
}

impl NodeLookup {
    /// Value from the first matching element, if any.
    pub fn first(&self, document: &Html) -> Option<String> {
        match self {
            NodeLookup::Text(sel) => document
                .select(sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string()),
            NodeLookup::Attr(sel, attr) => document
                .select(sel)
                .next()
                .and_then(|el| el.value().attr(attr))
                .map(|v| v.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DateSource {
    Node(NodeLookup),
    JsonLd,
}

/// One date extraction strategy: a source and the format its value is in.
#[derive(Debug, Clone)]
pub struct DateStrategy {
    pub source: DateSource,
    pub format: DateFormat,
}

impl DateStrategy {
    /// Locate the raw date string and normalize it.
    pub fn resolve(&self, document: &Html) -> Option<NaiveDateTime> {
        let raw = match &self.source {
            DateSource::Node(lookup) => lookup.first(document)?,
            DateSource::JsonLd => {
                let blobs = document
                    .select(&JSON_LD)
                    .map(|el| el.text().collect::<String>());
                dates::scan_date_published(blobs)?
            }
        };
        dates::normalize(&self.format, &raw)
    }
}

/// Link-following hints for the external crawling engine.
#[derive(Debug, Clone, Default)]
pub struct LinkPolicy {
    allowed_domains: Vec<String>,
    allow: Vec<Regex>,
    deny: Vec<Regex>,
    deny_domains: Vec<String>,
}

impl LinkPolicy {
    /// Whether a crawler working for this site should follow `url`.
    pub fn should_follow(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        if !self.allowed_domains.is_empty()
            && !self.allowed_domains.iter().any(|d| host_matches(host, d))
        {
            return false;
        }
        if self.deny_domains.iter().any(|d| host_matches(host, d)) {
            return false;
        }
        if !self.allow.is_empty() && !self.allow.iter().any(|re| re.is_match(url)) {
            return false;
        }
        !self.deny.iter().any(|re| re.is_match(url))
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// A compiled, validated extraction rule for one site.
#[derive(Debug, Clone)]
pub struct SiteRule {
    pub site_id: String,
    pub start_urls: Vec<String>,
    pub article_detector: ArticleDetector,
    pub date_strategies: Vec<DateStrategy>,
    pub title: Option<NodeLookup>,
    pub keywords: Option<NodeLookup>,
    pub description: Option<NodeLookup>,
    pub links: LinkPolicy,
}

impl SiteRule {
    /// Compile and validate a descriptor.
    pub fn compile(spec: &SiteRuleSpec) -> Result<Self, ConfigError> {
        let site = spec.site_id.as_str();
        let detector = spec
            .article_detector
            .as_ref()
            .ok_or_else(|| ConfigError::MissingDetector(site.to_string()))?;
        if spec.date.is_empty() {
            return Err(ConfigError::NoFieldSelectors {
                site: site.to_string(),
                what: "date strategy",
            });
        }
        if spec.title.is_none() && spec.keywords.is_none() && spec.description.is_none() {
            return Err(ConfigError::NoFieldSelectors {
                site: site.to_string(),
                what: "title, keywords or description selector",
            });
        }

        let date_strategies = spec
            .date
            .iter()
            .map(|d| compile_date_strategy(site, d))
            .collect::<Result<Vec<_>, _>>()?;
        let field = |f: &Option<FieldSpec>| f.as_ref().map(|f| compile_field(site, f)).transpose();

        Ok(SiteRule {
            site_id: spec.site_id.clone(),
            start_urls: spec.start_urls.clone(),
            article_detector: compile_detector(site, detector)?,
            date_strategies,
            title: field(&spec.title)?,
            keywords: field(&spec.keywords)?,
            description: field(&spec.description)?,
            links: LinkPolicy {
                allowed_domains: spec.allowed_domains.clone(),
                allow: compile_patterns(site, &spec.allow)?,
                deny: compile_patterns(site, &spec.deny)?,
                deny_domains: spec.deny_domains.clone(),
            },
        })
    }

    pub fn should_follow(&self, url: &str) -> bool {
        self.links.should_follow(url)
    }
}

fn compile_selector(site: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        site: site.to_string(),
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

fn compile_field(site: &str, spec: &FieldSpec) -> Result<NodeLookup, ConfigError> {
    Ok(match spec {
        FieldSpec::Text { selector } => NodeLookup::Text(compile_selector(site, selector)?),
        FieldSpec::Attr { selector, attr } => {
            NodeLookup::Attr(compile_selector(site, selector)?, attr.clone())
        }
    })
}

fn compile_date_strategy(site: &str, spec: &DateStrategySpec) -> Result<DateStrategy, ConfigError> {
    let source = match &spec.source {
        DateSourceSpec::Text { selector } => {
            DateSource::Node(NodeLookup::Text(compile_selector(site, selector)?))
        }
        DateSourceSpec::Attr { selector, attr } => {
            DateSource::Node(NodeLookup::Attr(compile_selector(site, selector)?, attr.clone()))
        }
        DateSourceSpec::JsonLd => DateSource::JsonLd,
    };
    Ok(DateStrategy {
        source,
        format: spec.format.clone(),
    })
}

fn compile_patterns(site: &str, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| ConfigError::InvalidPattern {
                site: site.to_string(),
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

fn compile_detector(site: &str, spec: &DetectorSpec) -> Result<ArticleDetector, ConfigError> {
    Ok(match spec {
        DetectorSpec::Selector { selector } => {
            ArticleDetector::Selector(compile_selector(site, selector)?)
        }
        DetectorSpec::MinMatches { selector, min } => {
            ArticleDetector::MinMatches(compile_selector(site, selector)?, *min)
        }
        DetectorSpec::UrlSegments { more_than } => ArticleDetector::UrlSegments(*more_than),
        DetectorSpec::Any { of } => ArticleDetector::Any(
            of.iter()
                .map(|d| compile_detector(site, d))
                .collect::<Result<_, _>>()?,
        ),
        DetectorSpec::All { of } => ArticleDetector::All(
            of.iter()
                .map(|d| compile_detector(site, d))
                .collect::<Result<_, _>>()?,
        ),
    })
}

/// Read-only map from site id to its compiled rule.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, SiteRule>,
}

impl RuleRegistry {
    /// Build a registry, rejecting duplicates and invalid descriptors.
    pub fn from_specs<I>(specs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = SiteRuleSpec>,
    {
        let mut rules = HashMap::new();
        for spec in specs {
            if rules.contains_key(&spec.site_id) {
                return Err(ConfigError::DuplicateSite(spec.site_id));
            }
            let rule = SiteRule::compile(&spec)?;
            debug!(site = %rule.site_id, strategies = rule.date_strategies.len(), "Compiled site rule");
            rules.insert(spec.site_id, rule);
        }
        info!(sites = rules.len(), "Rule registry ready");
        Ok(Self { rules })
    }

    /// The built-in sites, with `overrides` replacing or adding descriptors.
    ///
    /// An override whose id matches a built-in replaces it; the override
    /// list itself must not repeat an id.
    pub fn with_overrides(overrides: Vec<SiteRuleSpec>) -> Result<Self, ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for spec in &overrides {
            if !seen.insert(spec.site_id.as_str()) {
                return Err(ConfigError::DuplicateSite(spec.site_id.clone()));
            }
        }
        let specs = crate::sites::builtin_specs()
            .into_iter()
            .filter(|b| !seen.contains(b.site_id.as_str()))
            .chain(overrides.iter().cloned())
            .collect::<Vec<_>>();
        Self::from_specs(specs)
    }

    /// The ten built-in sites.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_specs(crate::sites::builtin_specs())
    }

    pub fn lookup(&self, site_id: &str) -> Result<&SiteRule, ConfigError> {
        self.rules
            .get(site_id)
            .ok_or_else(|| ConfigError::UnknownSite(site_id.to_string()))
    }

    /// Site ids in sorted order.
    pub fn site_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
