use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Missing URL parameter '{0}'")]
    MissingParameter(String),

    /// 位置参数、空占位符或不成对的花括号
    #[error("Invalid URL placeholder '{0}'")]
    InvalidPlaceholder(String),
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{\{|\}\}|\{([a-zA-Z_][a-zA-Z0-9_]*)\}|\{[^{}]*\}?|\}").unwrap())
}

/// 列出模板中引用的参数名（按出现顺序，可能重复）
pub fn placeholders(template: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// 检查模板语法：除 `{{`、`}}` 和 `{name}` 之外的花括号都是错误
pub fn validate(template: &str) -> Result<(), TemplateError> {
    match placeholder_regex()
        .captures_iter(template)
        .find(|caps| caps.get(1).is_none() && !matches!(&caps[0], "{{" | "}}"))
    {
        Some(caps) => Err(TemplateError::InvalidPlaceholder(caps[0].to_string())),
        None => Ok(()),
    }
}

/// 替换 URL 模板中的 `{name}` 占位符，`{{` 和 `}}` 输出为字面量花括号
///
/// 任意一个占位符没有对应参数时返回错误，不做部分替换。
pub fn render(template: &str, params: &HashMap<String, String>) -> Result<String, TemplateError> {
    validate(template)?;
    if let Some(missing) = placeholders(template)
        .into_iter()
        .find(|name| !params.contains_key(name))
    {
        return Err(TemplateError::MissingParameter(missing));
    }

    let rendered = placeholder_regex().replace_all(template, |caps: &Captures| match caps.get(1) {
        Some(name) => params
            .get(name.as_str())
            .cloned()
            .unwrap_or_default(),
        None => caps[0][..1].to_string(),
    });
    Ok(rendered.into_owned())
}
