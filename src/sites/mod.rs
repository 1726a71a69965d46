//! Built-in site rule descriptors.
//!
//! Each submodule describes one news site as data: how to recognise an
//! article page, where its publish date lives and in what format, and where
//! the title, keywords and description are. The extraction engine is shared.
//!
//! # Supported Sites
//!
//! | Site | Module | Article marker | Publish date |
//! |------|--------|----------------|--------------|
//! | VnExpress | [`vnexpress`] | `body[data-source="Detail"]` | `meta[name=pubdate]`, ISO-8601 |
//! | Lao Động | [`laodong`] | body class `article-n2` or `article-m2` | `time.f-datetime` text, `DD/MM/YYYY \| HH:MM` |
//! | VTV | [`vtv`] | `meta[property="article:section"]` | `meta[name=pubdate]`, ISO-8601 |
//! | 24h | [`h24`] | `div.brmCm2.brmCm2x` and a deep URL | `meta[name=pubdate]`, ISO-8601 |
//! | Zing News | [`zingnews`] | `body#page-article` | `article:published_time`, `%Y-%m-%dT%H:%M:%S%z` |
//! | Kênh 14 | [`kenh14`] | `div.knc-content` | `article:published_time`, ISO-8601 |
//! | Dân Trí | [`dantri`] | `body[data-isrc="articlev2"]` | JSON-LD, padded fraction |
//! | Tuổi Trẻ | [`tuoitre`] | `meta[property="article:section"]` | `article:published_time`, ISO-8601 |
//! | VietNamNet | [`vietnamnet`] | two or more JSON-LD blocks | JSON-LD, ISO-8601 |
//! | CafeF | [`cafef`] | `meta[property="article:section"]` | JSON-LD, padded fraction |
//!
//! Class markers are matched on the exact `class` attribute value, the way
//! the sites' templates emit them.
//!
//! Adding a site means adding a descriptor here or a `sites:` entry in the
//! YAML configuration; no extraction code changes.

pub mod cafef;
pub mod dantri;
pub mod h24;
pub mod kenh14;
pub mod laodong;
pub mod tuoitre;
pub mod vietnamnet;
pub mod vnexpress;
pub mod vtv;
pub mod zingnews;

use crate::rules::SiteRuleSpec;

/// Descriptors for every built-in site.
pub fn builtin_specs() -> Vec<SiteRuleSpec> {
    vec![
        vnexpress::rule(),
        laodong::rule(),
        vtv::rule(),
        h24::rule(),
        zingnews::rule(),
        kenh14::rule(),
        dantri::rule(),
        tuoitre::rule(),
        vietnamnet::rule(),
        cafef::rule(),
    ]
}

/// Shared skeleton: one domain, crawled from its root, links restricted to it.
fn base(site_id: &str, domain: &str) -> SiteRuleSpec {
    SiteRuleSpec {
        site_id: site_id.to_string(),
        allowed_domains: vec![domain.to_string()],
        start_urls: vec![format!("https://{domain}/")],
        allow: vec![format!("{}/.+", regex::escape(domain))],
        deny: vec![],
        deny_domains: vec![],
        article_detector: None,
        date: vec![],
        title: None,
        keywords: None,
        description: None,
    }
}
