use crate::config::PatternConfig;
use std::collections::BTreeMap;
use std::fmt;

/// 单个匹配步骤：标签名（可选）+ 属性等值约束
///
/// 标签名和属性名在构造时转为小写，HTML 解析器产出的名字同样是小写。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPattern {
    tag: Option<String>,
    attributes: BTreeMap<String, String>,
}

impl MatchPattern {
    /// 匹配任意标签
    pub fn any() -> Self {
        Self::default()
    }

    /// 匹配指定标签，空字符串等同于任意标签
    pub fn tag(name: &str) -> Self {
        let name = name.trim();
        Self {
            tag: (!name.is_empty()).then(|| name.to_ascii_lowercase()),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn tag_name(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// 判断一个元素是否满足该步骤
    ///
    /// `class` 按 token 匹配：配置值等于整个属性值或其中任意一个 class 即可。
    pub fn matches(&self, tag: &str, attrs: &[(&str, &str)]) -> bool {
        if let Some(expected) = &self.tag
            && !expected.eq_ignore_ascii_case(tag)
        {
            return false;
        }

        self.attributes.iter().all(|(name, expected)| {
            let expected = expected.as_str();
            attrs
                .iter()
                .filter(|(actual_name, _)| actual_name.eq_ignore_ascii_case(name))
                .any(|&(_, actual)| {
                    actual == expected
                        || (name == "class" && actual.split_whitespace().any(|c| c == expected))
                })
        })
    }
}

impl From<&PatternConfig> for MatchPattern {
    fn from(config: &PatternConfig) -> Self {
        let base = match &config.name {
            Some(name) => MatchPattern::tag(name),
            None => MatchPattern::any(),
        };
        config
            .attributes
            .iter()
            .fold(base, |pattern, (name, value)| pattern.with_attr(name, value))
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag.as_deref().unwrap_or("*"))?;
        for (name, value) in &self.attributes {
            write!(f, "[{}={:?}]", name, value)?;
        }
        Ok(())
    }
}

/// 一条忽略规则：从根元素开始逐级收窄的匹配路径
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRule {
    steps: Vec<MatchPattern>,
}

impl IgnoreRule {
    pub fn new(steps: Vec<MatchPattern>) -> Self {
        Self { steps }
    }

    pub fn from_config(steps: &[PatternConfig]) -> Self {
        Self::new(steps.iter().map(MatchPattern::from).collect())
    }

    pub fn steps(&self) -> &[MatchPattern] {
        &self.steps
    }
}

impl fmt::Display for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.steps.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(" > "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_tag_matches_everything() {
        let pattern = MatchPattern::any();
        assert!(pattern.matches("div", &[]));
        assert!(pattern.matches("span", &[("id", "x")]));
        assert_eq!(MatchPattern::tag(""), MatchPattern::any());
    }

    #[test]
    fn test_tag_and_attributes() {
        let pattern = MatchPattern::tag("DIV").with_attr("id", "banner");
        assert_eq!(pattern.tag_name(), Some("div"));
        assert!(pattern.matches("div", &[("id", "banner")]));
        assert!(!pattern.matches("div", &[("id", "footer")]));
        assert!(!pattern.matches("div", &[]));
        assert!(!pattern.matches("span", &[("id", "banner")]));
    }

    #[test]
    fn test_class_token_matching() {
        let pattern = MatchPattern::any().with_attr("class", "ads");
        assert!(pattern.matches("div", &[("class", "ads")]));
        assert!(pattern.matches("div", &[("class", "box ads wide")]));
        assert!(!pattern.matches("div", &[("class", "adsense")]));

        let whole = MatchPattern::any().with_attr("class", "box ads");
        assert!(whole.matches("div", &[("class", "box ads")]));
    }

    #[test]
    fn test_unknown_attribute_never_matches() {
        let pattern = MatchPattern::tag("form").with_attr("data-nonce", "1");
        assert!(!pattern.matches("form", &[("id", "login")]));
    }

    #[test]
    fn test_from_config() {
        let config: PatternConfig =
            serde_json::from_str(r#"{"name": "form", "id": "credentials"}"#).unwrap();
        let pattern = MatchPattern::from(&config);
        assert_eq!(pattern.tag_name(), Some("form"));
        assert_eq!(pattern.attributes().get("id").unwrap(), "credentials");
        assert_eq!(pattern.to_string(), r#"form[id="credentials"]"#);
    }

    #[test]
    fn test_rule_display() {
        let rule = IgnoreRule::new(vec![
            MatchPattern::tag("div").with_attr("class", "foo"),
            MatchPattern::any().with_attr("id", "bar"),
        ]);
        assert_eq!(rule.to_string(), r#"div[class="foo"] > *[id="bar"]"#);
    }
}
