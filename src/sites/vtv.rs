//! [VTV](https://vtv.vn).

use super::base;
use crate::dates::DateFormat;
use crate::rules::{DateStrategySpec, DetectorSpec, FieldSpec, SiteRuleSpec};

pub fn rule() -> SiteRuleSpec {
    SiteRuleSpec {
        deny: vec![r"vtv\.vn/video/.+".to_string()],
        article_detector: Some(DetectorSpec::selector(r#"meta[property="article:section"]"#)),
        date: vec![DateStrategySpec::meta(r#"meta[name="pubdate"]"#, DateFormat::Iso8601)],
        title: Some(FieldSpec::text("title")),
        keywords: Some(FieldSpec::meta(r#"meta[name="news_keywords"]"#)),
        description: Some(FieldSpec::meta(r#"meta[name="description"]"#)),
        ..base("vtv", "vtv.vn")
    }
}
