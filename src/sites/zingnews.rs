//! [Zing News](https://zingnews.vn).

use super::base;
use crate::dates::DateFormat;
use crate::rules::{DateStrategySpec, DetectorSpec, FieldSpec, SiteRuleSpec};

pub fn rule() -> SiteRuleSpec {
    SiteRuleSpec {
        article_detector: Some(DetectorSpec::selector(r#"body[id="page-article"]"#)),
        date: vec![DateStrategySpec::meta(
            r#"meta[property="article:published_time"]"#,
            DateFormat::Pattern("%Y-%m-%dT%H:%M:%S%z".to_string()),
        )],
        title: Some(FieldSpec::text("title")),
        keywords: Some(FieldSpec::meta(r#"meta[name="keywords"]"#)),
        description: Some(FieldSpec::meta(r#"meta[name="description"]"#)),
        ..base("zingnews", "zingnews.vn")
    }
}
