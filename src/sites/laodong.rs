//! [Lao Động](https://laodong.vn).
//!
//! Two article templates are in use (`article-n2` and `article-m2` body
//! classes). The publish time is free text such as `22/02/2021 | 10:15`.

use super::base;
use crate::dates::DateFormat;
use crate::rules::{DateStrategySpec, DetectorSpec, FieldSpec, SiteRuleSpec};

pub fn rule() -> SiteRuleSpec {
    SiteRuleSpec {
        deny: vec![r"laodong\.vn/video/.+".to_string()],
        article_detector: Some(DetectorSpec::Any {
            of: vec![
                DetectorSpec::selector(r#"body[class="article-n2"]"#),
                DetectorSpec::selector(r#"body[class="article-m2"]"#),
            ],
        }),
        date: vec![DateStrategySpec::text(
            r#"time[class="f-datetime"]"#,
            DateFormat::DayMonthYearTime,
        )],
        title: Some(FieldSpec::text("title")),
        keywords: Some(FieldSpec::meta(r#"meta[name="keywords"]"#)),
        description: Some(FieldSpec::meta(r#"meta[name="description"]"#)),
        ..base("laodong", "laodong.vn")
    }
}
