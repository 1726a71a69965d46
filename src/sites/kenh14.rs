//! [Kênh 14](https://kenh14.vn).

use super::base;
use crate::dates::DateFormat;
use crate::rules::{DateStrategySpec, DetectorSpec, FieldSpec, SiteRuleSpec};

pub fn rule() -> SiteRuleSpec {
    SiteRuleSpec {
        deny_domains: vec!["video.kenh14.vn".to_string()],
        article_detector: Some(DetectorSpec::selector(r#"div[class="knc-content"]"#)),
        date: vec![DateStrategySpec::meta(
            r#"meta[property="article:published_time"]"#,
            DateFormat::Iso8601,
        )],
        title: Some(FieldSpec::text("title")),
        keywords: Some(FieldSpec::meta(r#"meta[name="news_keywords"]"#)),
        description: Some(FieldSpec::meta(r#"meta[name="description"]"#)),
        ..base("kenh14", "kenh14.vn")
    }
}
