//! [CafeF](https://cafef.vn).

use super::base;
use crate::dates::DateFormat;
use crate::rules::{DateStrategySpec, DetectorSpec, FieldSpec, SiteRuleSpec};

pub fn rule() -> SiteRuleSpec {
    SiteRuleSpec {
        article_detector: Some(DetectorSpec::selector(r#"meta[property="article:section"]"#)),
        date: vec![DateStrategySpec::json_ld(DateFormat::Iso8601PaddedFraction)],
        title: Some(FieldSpec::text("title")),
        keywords: Some(FieldSpec::meta(r#"meta[name="news_keywords"]"#)),
        description: Some(FieldSpec::meta(r#"meta[name="description"]"#)),
        ..base("cafef", "cafef.vn")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Extraction, Extractor};
    use crate::rules::RuleRegistry;
    use crate::sites::fixtures::{COMMON_META, page};

    #[test]
    fn test_cafef_unparseable_json_ld_gives_no_date() {
        let registry = RuleRegistry::from_specs([rule()]).unwrap();
        let extractor = Extractor::new(&registry);
        let html = page(
            &format!(
                r#"{COMMON_META}<meta property="article:section" content="Vĩ mô">
                <script type="application/ld+json">{{ broken </script>"#
            ),
            "",
            "",
        );
        let Extraction::Candidate(c) = extractor
            .extract_html("cafef", "https://cafef.vn/bai-viet-188.chn", &html)
            .unwrap()
        else {
            panic!("expected an article");
        };
        assert_eq!(c.published_at, None);
        assert_eq!(c.title, "Covid-19 outbreak update");
    }
}
