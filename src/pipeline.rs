//! One page in, at most one accepted record out.
//!
//! [`Pipeline`] binds a site's extractor to the acceptance filter and keeps
//! per-run counters so a run can report how many pages were dropped and why.

use crate::extract::{Extraction, SiteExtractor};
use crate::filter::{self, DateWindow, KeywordSet, RejectionReason, Verdict};
use crate::models::AcceptedRecord;
use scraper::Html;
use serde::Serialize;
use tracing::{debug, info};

/// Outcome counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub fetch_failed: usize,
    pub pages: usize,
    pub not_article: usize,
    pub no_date: usize,
    pub out_of_window: usize,
    pub no_keyword_match: usize,
    pub accepted: usize,
}

impl RunStats {
    pub fn rejected(&self) -> usize {
        self.no_date + self.out_of_window + self.no_keyword_match
    }

    fn record_rejection(&mut self, reason: RejectionReason) {
        match reason {
            RejectionReason::NoDate => self.no_date += 1,
            RejectionReason::OutOfWindow => self.out_of_window += 1,
            RejectionReason::NoKeywordMatch => self.no_keyword_match += 1,
        }
    }

    pub fn merge(&mut self, other: &RunStats) {
        self.fetch_failed += other.fetch_failed;
        self.pages += other.pages;
        self.not_article += other.not_article;
        self.no_date += other.no_date;
        self.out_of_window += other.out_of_window;
        self.no_keyword_match += other.no_keyword_match;
        self.accepted += other.accepted;
    }

    pub fn log_summary(&self, site: &str) {
        info!(
            site,
            fetch_failed = self.fetch_failed,
            pages = self.pages,
            not_article = self.not_article,
            no_date = self.no_date,
            out_of_window = self.out_of_window,
            no_keyword_match = self.no_keyword_match,
            accepted = self.accepted,
            "Run summary"
        );
    }
}

/// Extract-then-filter for a single site.
#[derive(Debug)]
pub struct Pipeline<'a> {
    extractor: SiteExtractor<'a>,
    window: &'a DateWindow,
    keywords: &'a KeywordSet,
    stats: RunStats,
}

impl<'a> Pipeline<'a> {
    pub fn new(extractor: SiteExtractor<'a>, window: &'a DateWindow, keywords: &'a KeywordSet) -> Self {
        Self {
            extractor,
            window,
            keywords,
            stats: RunStats::default(),
        }
    }

    pub fn site_id(&self) -> &'a str {
        &self.extractor.rule().site_id
    }

    /// Run one parsed page through extraction and the filter.
    pub fn process(&mut self, url: &str, document: &Html) -> Option<AcceptedRecord> {
        self.stats.pages += 1;
        let candidate = match self.extractor.extract(url, document) {
            Extraction::Candidate(c) => c,
            Extraction::NotAnArticle => {
                self.stats.not_article += 1;
                return None;
            }
        };
        match filter::accept(candidate, self.window, self.keywords) {
            Verdict::Accepted(record) => {
                self.stats.accepted += 1;
                debug!(site = self.site_id(), %url, title = %record.title, "Accepted article");
                Some(record)
            }
            Verdict::Rejected(reason) => {
                self.stats.record_rejection(reason);
                debug!(site = self.site_id(), %url, %reason, "Rejected article");
                None
            }
        }
    }

    /// Parse `html` and process it.
    pub fn process_html(&mut self, url: &str, html: &str) -> Option<AcceptedRecord> {
        let document = Html::parse_document(html);
        self.process(url, &document)
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Count a page that never arrived.
    pub fn record_fetch_failure(&mut self) {
        self.stats.fetch_failed += 1;
    }

    pub fn into_stats(self) -> RunStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::extract::Extractor;
    use crate::rules::RuleRegistry;

    fn page(pubdate: &str, title: &str) -> String {
        format!(
            r#"<html><head><title>{title}</title>
            <meta name="pubdate" content="{pubdate}">
            <meta name="news_keywords" content="tin tuc">
            <meta name="description" content="mo ta">
            </head><body data-source="Detail"><p>...</p></body></html>"#
        )
    }

    fn run(html: &[(&str, String)]) -> (Vec<AcceptedRecord>, RunStats) {
        let config = PipelineConfig::default();
        let registry = RuleRegistry::builtin().unwrap();
        let window = config.date_window();
        let keywords = config.keyword_set();
        let extractor = Extractor::new(&registry).for_site("vnexpress").unwrap();
        let mut pipeline = Pipeline::new(extractor, &window, &keywords);
        let records: Vec<AcceptedRecord> = html
            .iter()
            .filter_map(|(url, body)| pipeline.process_html(url, body))
            .collect();
        (records, pipeline.into_stats())
    }

    #[test]
    fn test_covid_page_accepted() {
        let (records, stats) = run(&[(
            "https://vnexpress.net/covid-1.html",
            page("2020-03-15T08:00:00+07:00", "Covid-19 outbreak update"),
        )]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "2020-03-15");
        assert_eq!(records[0].url, "https://vnexpress.net/covid-1.html");
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.pages, 1);
    }

    #[test]
    fn test_each_drop_reason_counted() {
        let (records, stats) = run(&[
            ("https://vnexpress.net/a.html", page("not a date", "covid")),
            ("https://vnexpress.net/b.html", page("2018-01-01T00:00:00", "covid")),
            ("https://vnexpress.net/c.html", page("2020-05-01T00:00:00", "Bong da")),
            (
                "https://vnexpress.net/",
                "<html><body><div>listing</div></body></html>".to_string(),
            ),
        ]);
        assert!(records.is_empty());
        assert_eq!(
            stats,
            RunStats {
                fetch_failed: 0,
                pages: 4,
                not_article: 1,
                no_date: 1,
                out_of_window: 1,
                no_keyword_match: 1,
                accepted: 0,
            }
        );
        assert_eq!(stats.rejected(), 3);
    }

    #[test]
    fn test_merge() {
        let mut total = RunStats {
            pages: 2,
            accepted: 1,
            ..RunStats::default()
        };
        total.merge(&RunStats {
            pages: 3,
            no_date: 2,
            ..RunStats::default()
        });
        assert_eq!(total.pages, 5);
        assert_eq!(total.no_date, 2);
        assert_eq!(total.accepted, 1);
    }
}
