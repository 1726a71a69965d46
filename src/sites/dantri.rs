//! [Dân Trí](https://dantri.com.vn).
//!
//! The publish time comes from JSON-LD. Its fractional seconds have
//! inconsistent precision (sometimes absent), hence the padded format.

use super::base;
use crate::dates::DateFormat;
use crate::rules::{DateStrategySpec, DetectorSpec, FieldSpec, SiteRuleSpec};

pub fn rule() -> SiteRuleSpec {
    SiteRuleSpec {
        deny: vec![r"dantri\.com\.vn/video.".to_string()],
        article_detector: Some(DetectorSpec::selector(r#"body[data-isrc="articlev2"]"#)),
        date: vec![DateStrategySpec::json_ld(DateFormat::Iso8601PaddedFraction)],
        title: Some(FieldSpec::meta(r#"meta[name="title"]"#)),
        keywords: Some(FieldSpec::meta(r#"meta[name="keywords"]"#)),
        description: Some(FieldSpec::meta(r#"meta[name="description"]"#)),
        ..base("dantri", "dantri.com.vn")
    }
}
