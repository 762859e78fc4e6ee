//! 结构化过滤：在计算页面大小前清空匹配到的子树
//!
//! 每条规则从 `<html>` 根元素出发逐级收窄候选集合，最终命中的元素保留自身的
//! 标签和属性，只清空子节点，这样规则之外的文档结构保持不变。

use html5ever::parse_document;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::trace;

use crate::pagesize::pattern::{IgnoreRule, MatchPattern};

/// 解析 HTML（非法 UTF-8 按 lossy 方式替换）
pub fn parse_html(raw: &[u8]) -> std::io::Result<RcDom> {
    let mut input = raw;
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut input)
}

/// 将整个文档序列化回 HTML 文本
pub fn serialize_html(dom: &RcDom) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let handle: SerializableHandle = dom.document.clone().into();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    serialize(&mut bytes, &handle, opts)?;
    Ok(bytes)
}

/// 对文档应用所有忽略规则（原地修改，幂等）
pub fn remove_matches(dom: &RcDom, rules: &[IgnoreRule]) {
    let Some(root) = root_element(&dom.document) else {
        return;
    };

    for rule in rules {
        let matched = resolve(&root, rule);
        trace!("Ignore rule {} cleared {} nodes", rule, matched.len());
        for node in matched {
            node.children.borrow_mut().clear();
        }
    }
}

/// 按规则逐级查找；任意一步为空时返回空集合
pub fn resolve(root: &Handle, rule: &IgnoreRule) -> Vec<Handle> {
    let mut candidates = vec![root.clone()];

    for step in rule.steps() {
        let mut seen = HashSet::new();
        let mut next = Vec::new();
        for candidate in &candidates {
            for node in descendants_matching(candidate, step) {
                if seen.insert(Rc::as_ptr(&node)) {
                    next.push(node);
                }
            }
        }

        if next.is_empty() {
            return Vec::new();
        }
        candidates = next;
    }

    candidates
}

/// `<html>` 根元素
fn root_element(document: &Handle) -> Option<Handle> {
    document
        .children
        .borrow()
        .iter()
        .find(|child| element_name(child).is_some_and(|name| name == "html"))
        .cloned()
}

/// 以文档顺序（深度优先、先序）返回匹配的后代元素，不包含 `node` 本身
fn descendants_matching(node: &Handle, pattern: &MatchPattern) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut stack: Vec<Handle> = node.children.borrow().iter().rev().cloned().collect();

    while let Some(current) = stack.pop() {
        if element_matches(&current, pattern) {
            found.push(current.clone());
        }
        stack.extend(current.children.borrow().iter().rev().cloned());
    }

    found
}

fn element_matches(node: &Handle, pattern: &MatchPattern) -> bool {
    match &node.data {
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs.borrow();
            let pairs: Vec<(&str, &str)> = attrs
                .iter()
                .map(|attr| (&*attr.name.local, &*attr.value))
                .collect();
            pattern.matches(&name.local, &pairs)
        }
        _ => false,
    }
}

fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>News</title></head>
<body>
<div class="box ads"><p>Buy now</p><span id="ts">12:00</span></div>
<div class="content"><p>Hello</p>
  <form id="credentials"><input name="csrf" value="a1b2c3"></form>
</div>
<div class="foo"><form id="credentials"><input name="csrf" value="zzz"></form></div>
</body></html>"#;

    fn render(dom: &RcDom) -> String {
        String::from_utf8(serialize_html(dom).unwrap()).unwrap()
    }

    fn rule(steps: Vec<MatchPattern>) -> IgnoreRule {
        IgnoreRule::new(steps)
    }

    #[test]
    fn test_clear_by_class_keeps_element() {
        let dom = parse_html(PAGE.as_bytes()).unwrap();
        remove_matches(&dom, &[rule(vec![MatchPattern::tag("div").with_attr("class", "ads")])]);

        let html = render(&dom);
        assert!(html.contains(r#"<div class="box ads"></div>"#));
        assert!(!html.contains("Buy now"));
        assert!(html.contains("Hello"));
    }

    #[test]
    fn test_path_narrowing() {
        let dom = parse_html(PAGE.as_bytes()).unwrap();
        let path = rule(vec![
            MatchPattern::tag("div").with_attr("class", "foo"),
            MatchPattern::tag("form").with_attr("id", "credentials"),
        ]);
        remove_matches(&dom, &[path]);

        let html = render(&dom);
        // 只有 div.foo 下的表单被清空
        assert!(!html.contains("zzz"));
        assert!(html.contains("a1b2c3"));
    }

    #[test]
    fn test_unresolved_path_is_noop() {
        let dom = parse_html(PAGE.as_bytes()).unwrap();
        let before = render(&dom);

        let path = rule(vec![
            MatchPattern::tag("section"),
            MatchPattern::tag("form"),
        ]);
        remove_matches(&dom, &[path]);

        assert_eq!(render(&dom), before);
    }

    #[test]
    fn test_nested_candidates_are_deduplicated() {
        let html = r#"<html><body><div><div><span>x</span></div></div></body></html>"#;
        let dom = parse_html(html.as_bytes()).unwrap();
        let root = root_element(&dom.document).unwrap();

        let found = resolve(&root, &rule(vec![MatchPattern::tag("div"), MatchPattern::tag("span")]));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_document_order() {
        let html = r#"<html><body><p id="a"><b id="b"></b></p><p id="c"></p></body></html>"#;
        let dom = parse_html(html.as_bytes()).unwrap();
        let root = root_element(&dom.document).unwrap();

        let found = descendants_matching(&root, &MatchPattern::any());
        let ids: Vec<String> = found
            .iter()
            .filter_map(|node| match &node.data {
                NodeData::Element { attrs, .. } => attrs
                    .borrow()
                    .iter()
                    .find(|a| &*a.name.local == "id")
                    .map(|a| a.value.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_idempotent() {
        let dom = parse_html(PAGE.as_bytes()).unwrap();
        let rules = [rule(vec![MatchPattern::any().with_attr("id", "ts")])];

        remove_matches(&dom, &rules);
        let once = render(&dom);
        remove_matches(&dom, &rules);
        assert_eq!(render(&dom), once);
        assert!(once.contains(r#"<span id="ts"></span>"#));
    }

    #[test]
    fn test_rule_inside_cleared_subtree_changes_nothing() {
        let outer = rule(vec![MatchPattern::tag("div").with_attr("class", "foo")]);
        let inner = rule(vec![
            MatchPattern::tag("div").with_attr("class", "foo"),
            MatchPattern::tag("form"),
        ]);

        let only_outer = parse_html(PAGE.as_bytes()).unwrap();
        remove_matches(&only_outer, std::slice::from_ref(&outer));

        let both = parse_html(PAGE.as_bytes()).unwrap();
        remove_matches(&both, &[outer, inner]);

        let expected = render(&only_outer);
        assert_eq!(render(&both), expected);
        assert!(expected.contains(r#"<div class="foo"></div>"#));
    }
}
