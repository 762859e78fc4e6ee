use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::pagesize::IgnoreRule;

/// 完整的 watchdog 配置文件
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchdogConfig {
    /// 结果日志（JSON Lines）路径，缺省时只输出到终端
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// 开启 debug 级别日志
    #[serde(default)]
    pub debug: bool,

    /// 全局默认的页面大小容差（0..1），可被单个测试覆盖
    #[serde(default)]
    pub page_size_threshold: Option<f64>,

    /// 同时运行的探测数量，1 表示顺序执行
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// 是否使用结构化页面大小（解析 HTML 并移除忽略的子树）
    #[serde(default = "default_structural_size")]
    pub structural_size: bool,

    /// 失败报告收件人
    #[serde(default)]
    pub mail_recipients: Vec<String>,

    /// SMTP 服务器地址（host 或 host:port）
    #[serde(default)]
    pub smtp_server: Option<String>,

    /// 发件人地址
    #[serde(default)]
    pub mail_sender: Option<String>,

    /// 所有测试，按配置顺序执行和报告
    #[serde(default)]
    pub tests: Vec<TestSpec>,
}

fn default_concurrency() -> usize {
    1
}

fn default_structural_size() -> bool {
    true
}

impl WatchdogConfig {
    /// 是否配置了邮件通知
    pub fn mail_enabled(&self) -> bool {
        !self.mail_recipients.is_empty()
    }
}

/// 单个测试定义
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSpec {
    /// 测试标题（用于日志和邮件）
    pub title: String,

    /// URL 模板，可包含 `{name}` 占位符
    pub url: String,

    /// 参数名 -> 生成器引用
    #[serde(default)]
    pub generator: Option<BTreeMap<String, String>>,

    /// 期望的（结构化）页面大小，单位字节
    #[serde(default)]
    pub size: Option<u64>,

    /// 覆盖全局 pageSizeThreshold
    #[serde(default)]
    pub page_size_threshold: Option<f64>,

    /// 响应时间上限，单位秒
    pub response_time_limit: f64,

    /// 计算页面大小前要清空的子树
    #[serde(default)]
    pub page_size_ignore: Option<Vec<Vec<PatternConfig>>>,

    /// 跳过该测试
    #[serde(default)]
    pub ignore: bool,
}

impl TestSpec {
    /// 有效的页面大小容差：测试自身的值优先，否则使用全局默认值
    pub fn size_threshold(&self, default: Option<f64>) -> Option<f64> {
        self.page_size_threshold.or(default)
    }

    pub fn generators(&self) -> BTreeMap<String, String> {
        self.generator.clone().unwrap_or_default()
    }

    pub fn ignore_rules(&self) -> Vec<IgnoreRule> {
        self.page_size_ignore
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|steps| IgnoreRule::from_config(steps))
            .collect()
    }
}

/// 配置文件中的一个匹配步骤
///
/// `name` 是标签名，其余所有键都作为属性等值约束，例如
/// `{"name": "div", "class": "ads"}` 或 `{"id": "csrf"}`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PatternConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}
