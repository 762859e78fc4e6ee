use serde::{Deserialize, Serialize};

/// 单次探测的结果
///
/// `elapsed_millis`/`http_status`/`measured_size` 为空表示探测本身失败
/// （网络错误、超时、URL 参数缺失等），此时 `errors` 只有一条记录。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub elapsed_millis: Option<f64>,
    pub http_status: Option<u16>,
    pub measured_size: Option<u64>,
    pub errors: Vec<String>,
}

impl ProbeResult {
    /// 探测未能得到响应
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            elapsed_millis: None,
            http_status: None,
            measured_size: None,
            errors: vec![error.into()],
        }
    }

    /// 没有错误即为通过
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}
