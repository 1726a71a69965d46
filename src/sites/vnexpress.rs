//! [VnExpress](https://vnexpress.net).
//!
//! Article pages are tagged on the `<body>` with `data-source="Detail"`;
//! listing pages use other values. The publish time is an ISO-8601 `pubdate`
//! meta tag carrying a `+07:00` offset.

use super::base;
use crate::dates::DateFormat;
use crate::rules::{DateStrategySpec, DetectorSpec, FieldSpec, SiteRuleSpec};

pub fn rule() -> SiteRuleSpec {
    SiteRuleSpec {
        deny_domains: vec!["shop.vnexpress.net".to_string()],
        article_detector: Some(DetectorSpec::selector(r#"body[data-source="Detail"]"#)),
        date: vec![DateStrategySpec::meta(r#"meta[name="pubdate"]"#, DateFormat::Iso8601)],
        title: Some(FieldSpec::text("title")),
        keywords: Some(FieldSpec::meta(r#"meta[name="news_keywords"]"#)),
        description: Some(FieldSpec::meta(r#"meta[name="description"]"#)),
        ..base("vnexpress", "vnexpress.net")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Extraction, Extractor};
    use crate::rules::RuleRegistry;
    use crate::sites::fixtures::{COMMON_META, page};

    #[test]
    fn test_vnexpress_article() {
        let registry = RuleRegistry::from_specs([rule()]).unwrap();
        let extractor = Extractor::new(&registry);
        let html = page(
            &format!(r#"{COMMON_META}<meta name="pubdate" content="2020-03-15T08:00:00+07:00">"#),
            r#"data-source="Detail""#,
            "<p>...</p>",
        );
        let Extraction::Candidate(c) = extractor
            .extract_html("vnexpress", "https://vnexpress.net/covid-4070000.html", &html)
            .unwrap()
        else {
            panic!("expected an article");
        };
        assert_eq!(c.published_at.unwrap().to_string(), "2020-03-15 08:00:00");
        assert_eq!(c.keywords, "covid, dich benh");

        let listing = page(COMMON_META, r#"data-source="Folder""#, "");
        assert!(matches!(
            extractor.extract_html("vnexpress", "https://vnexpress.net/suc-khoe", &listing),
            Ok(Extraction::NotAnArticle)
        ));
    }

    #[test]
    fn test_vnexpress_shop_not_followed() {
        let registry = RuleRegistry::from_specs([rule()]).unwrap();
        let rule = registry.lookup("vnexpress").unwrap();
        assert!(rule.should_follow("https://vnexpress.net/the-gioi"));
        assert!(!rule.should_follow("https://shop.vnexpress.net/the-gioi"));
    }
}
