//! [VietNamNet](https://vietnamnet.vn).
//!
//! There is no dedicated article marker; article pages are the ones carrying
//! more than one JSON-LD block.

use super::base;
use crate::dates::DateFormat;
use crate::rules::{DateStrategySpec, DetectorSpec, FieldSpec, SiteRuleSpec};

pub fn rule() -> SiteRuleSpec {
    SiteRuleSpec {
        deny: vec![r"vietnamnet\.vn/vn/talkshow/.".to_string()],
        article_detector: Some(DetectorSpec::All {
            of: vec![
                DetectorSpec::selector("body"),
                DetectorSpec::min_matches(r#"script[type="application/ld+json"]"#, 2),
            ],
        }),
        date: vec![DateStrategySpec::json_ld(DateFormat::Iso8601)],
        title: Some(FieldSpec::text("title")),
        keywords: Some(FieldSpec::meta(r#"meta[name="news_keywords"]"#)),
        description: Some(FieldSpec::meta(r#"meta[name="description"]"#)),
        ..base("vietnamnet", "vietnamnet.vn")
    }
}
