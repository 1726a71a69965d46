//! [Tuổi Trẻ](https://tuoitre.vn).

use super::base;
use crate::dates::DateFormat;
use crate::rules::{DateStrategySpec, DetectorSpec, FieldSpec, SiteRuleSpec};

pub fn rule() -> SiteRuleSpec {
    SiteRuleSpec {
        deny_domains: vec!["tv.tuoitre.vn".to_string()],
        article_detector: Some(DetectorSpec::selector(r#"meta[property="article:section"]"#)),
        date: vec![DateStrategySpec::meta(
            r#"meta[property="article:published_time"]"#,
            DateFormat::Iso8601,
        )],
        title: Some(FieldSpec::meta(r#"meta[property="og:title"]"#)),
        keywords: Some(FieldSpec::meta(r#"meta[name="keywords"]"#)),
        description: Some(FieldSpec::meta(r#"meta[name="description"]"#)),
        ..base("tuoitre", "tuoitre.vn")
    }
}
