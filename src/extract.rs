//! Article extraction.
//!
//! Applies a site's [`SiteRule`] to a parsed page. The result is either a
//! [`RawCandidate`] or [`Extraction::NotAnArticle`]; a page never fails to
//! extract. Missing fields become empty strings and a date that cannot be
//! located or parsed becomes `None`, leaving the acceptance decision to the
//! filter.
//!
//! Extraction is a pure function of the document and the rule, so any
//! number of pages can be processed concurrently against one registry.

use crate::error::ConfigError;
use crate::models::RawCandidate;
use crate::rules::{NodeLookup, RuleRegistry, SiteRule};
use scraper::Html;
use tracing::{debug, trace};

/// Outcome of running a site rule over one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Candidate(RawCandidate),
    NotAnArticle,
}

impl Extraction {
    pub fn into_candidate(self) -> Option<RawCandidate> {
        match self {
            Extraction::Candidate(c) => Some(c),
            Extraction::NotAnArticle => None,
        }
    }
}

/// Extracts candidates for any registered site.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> Extractor<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Resolve a site's rule once, up front.
    ///
    /// Callers that process many pages for one site should do this before
    /// the first page is fetched so an unknown site fails the run early.
    pub fn for_site(&self, site_id: &str) -> Result<SiteExtractor<'a>, ConfigError> {
        Ok(SiteExtractor {
            rule: self.registry.lookup(site_id)?,
        })
    }

    pub fn extract(&self, site_id: &str, url: &str, document: &Html) -> Result<Extraction, ConfigError> {
        Ok(self.for_site(site_id)?.extract(url, document))
    }

    /// Parse `html` and extract from it.
    pub fn extract_html(&self, site_id: &str, url: &str, html: &str) -> Result<Extraction, ConfigError> {
        let site = self.for_site(site_id)?;
        Ok(site.extract_html(url, html))
    }
}

/// Extractor bound to one already-resolved rule.
#[derive(Debug, Clone, Copy)]
pub struct SiteExtractor<'a> {
    rule: &'a SiteRule,
}

impl<'a> SiteExtractor<'a> {
    pub fn new(rule: &'a SiteRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> &'a SiteRule {
        self.rule
    }

    pub fn extract(&self, url: &str, document: &Html) -> Extraction {
        let rule = self.rule;
        if !rule.article_detector.matches(url, document) {
            trace!(site = %rule.site_id, %url, "Not an article page");
            return Extraction::NotAnArticle;
        }

        let published_at = rule
            .date_strategies
            .iter()
            .find_map(|strategy| strategy.resolve(document));
        if published_at.is_none() {
            debug!(site = %rule.site_id, %url, "No parseable publish date");
        }

        Extraction::Candidate(RawCandidate {
            url: url.to_string(),
            published_at,
            title: field(rule.title.as_ref(), document),
            keywords: field(rule.keywords.as_ref(), document),
            description: field(rule.description.as_ref(), document),
        })
    }

    pub fn extract_html(&self, url: &str, html: &str) -> Extraction {
        let document = Html::parse_document(html);
        self.extract(url, &document)
    }
}

fn field(lookup: Option<&NodeLookup>, document: &Html) -> String {
    lookup
        .and_then(|l| l.first(document))
        .unwrap_or_default()
}
