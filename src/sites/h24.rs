//! [24h](https://24h.com.vn).
//!
//! The article wrapper div also appears on some section fronts, so the
//! detector additionally requires a URL with a path below the section
//! (more than four `/`-separated pieces).

use super::base;
use crate::dates::DateFormat;
use crate::rules::{DateStrategySpec, DetectorSpec, FieldSpec, SiteRuleSpec};

pub fn rule() -> SiteRuleSpec {
    SiteRuleSpec {
        allow: vec![r"24h\.com\.vn/.+\.html".to_string()],
        deny: vec![r"24h\.com\.vn/video-.+".to_string()],
        article_detector: Some(DetectorSpec::All {
            of: vec![
                DetectorSpec::selector(r#"div[class="brmCm2 brmCm2x"]"#),
                DetectorSpec::UrlSegments { more_than: 4 },
            ],
        }),
        date: vec![DateStrategySpec::meta(r#"meta[name="pubdate"]"#, DateFormat::Iso8601)],
        title: Some(FieldSpec::text("title")),
        keywords: Some(FieldSpec::meta(r#"meta[name="news_keywords"]"#)),
        description: Some(FieldSpec::meta(r#"meta[name="description"]"#)),
        ..base("24h", "24h.com.vn")
    }
}
