use crate::pagesize::IgnoreRule;
use tracing::warn;

/// 页面大小测量器
///
/// 解析能力在构造时一次性决定：需要编译 `structural` feature 并且配置允许。
/// 不可用时退化为原始字节长度，并在构造时记录一次警告。
#[derive(Debug, Clone, Copy)]
pub struct PageSizeMeasurer {
    structural: bool,
}

impl PageSizeMeasurer {
    pub fn new(structural: bool) -> Self {
        let available = cfg!(feature = "structural");
        if structural && !available {
            warn!("HTML parsing support not compiled in (feature `structural`). Returning raw page size.");
        } else if !structural {
            warn!("Structural page size disabled by configuration. Returning raw page size.");
        }

        Self {
            structural: structural && available,
        }
    }

    /// 计算移除忽略子树后的页面大小（字节）
    pub fn measure(&self, raw: &[u8], rules: &[IgnoreRule]) -> usize {
        if !self.structural {
            return raw.len();
        }
        structural_size(raw, rules)
    }
}

impl Default for PageSizeMeasurer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(feature = "structural")]
fn structural_size(raw: &[u8], rules: &[IgnoreRule]) -> usize {
    use crate::pagesize::filter;

    let result = filter::parse_html(raw).and_then(|dom| {
        filter::remove_matches(&dom, rules);
        filter::serialize_html(&dom)
    });

    match result {
        Ok(bytes) => bytes.len(),
        Err(e) => {
            warn!("Failed to measure structural page size, using raw size: {}", e);
            raw.len()
        }
    }
}

#[cfg(not(feature = "structural"))]
fn structural_size(raw: &[u8], _rules: &[IgnoreRule]) -> usize {
    raw.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize::MatchPattern;

    const PAGE: &[u8] = br#"<html><head></head><body><div id="ad">random 8f2c91</div><p>stable</p></body></html>"#;

    #[test]
    fn test_disabled_mode_returns_byte_length() {
        let measurer = PageSizeMeasurer::new(false);
        let rules = [IgnoreRule::new(vec![MatchPattern::any().with_attr("id", "ad")])];
        assert_eq!(measurer.measure(PAGE, &rules), PAGE.len());
    }

    /// 只在 `cargo test --no-default-features` 下编译
    #[cfg(not(feature = "structural"))]
    #[test]
    fn test_without_parser_falls_back_to_byte_length() {
        let measurer = PageSizeMeasurer::new(true);
        let rules = [IgnoreRule::new(vec![MatchPattern::tag("div")])];
        assert_eq!(measurer.measure(PAGE, &rules), PAGE.len());
        assert_eq!(measurer.measure(PAGE, &[]), PAGE.len());
    }

    #[cfg(feature = "structural")]
    mod structural {
        use super::*;
        use crate::pagesize::filter;

        #[test]
        fn test_empty_rules_equals_serialized_length() {
            let measurer = PageSizeMeasurer::new(true);
            let dom = filter::parse_html(PAGE).unwrap();
            let serialized = filter::serialize_html(&dom).unwrap();
            assert_eq!(measurer.measure(PAGE, &[]), serialized.len());
        }

        #[test]
        fn test_ignored_content_does_not_change_size() {
            let measurer = PageSizeMeasurer::new(true);
            let rules = [IgnoreRule::new(vec![MatchPattern::tag("div").with_attr("id", "ad")])];
            let other = br#"<html><head></head><body><div id="ad">a much longer advert text</div><p>stable</p></body></html>"#;

            assert_eq!(measurer.measure(PAGE, &rules), measurer.measure(other, &rules));
            assert_ne!(measurer.measure(PAGE, &[]), measurer.measure(other, &[]));
        }

        #[test]
        fn test_unresolved_rule_is_noop() {
            let measurer = PageSizeMeasurer::new(true);
            let rules = [IgnoreRule::new(vec![
                MatchPattern::tag("div"),
                MatchPattern::tag("table"),
            ])];
            assert_eq!(measurer.measure(PAGE, &rules), measurer.measure(PAGE, &[]));
        }

        #[test]
        fn test_deterministic() {
            let measurer = PageSizeMeasurer::new(true);
            let rules = [IgnoreRule::new(vec![MatchPattern::tag("p")])];
            let first = measurer.measure(PAGE, &rules);
            for _ in 0..5 {
                assert_eq!(measurer.measure(PAGE, &rules), first);
            }
        }

        #[test]
        fn test_cleared_size() {
            let measurer = PageSizeMeasurer::new(true);
            let rules = [IgnoreRule::new(vec![MatchPattern::any().with_attr("id", "ad")])];
            let expected = br#"<html><head></head><body><div id="ad"></div><p>stable</p></body></html>"#;
            assert_eq!(measurer.measure(PAGE, &rules), expected.len());
        }
    }
}
