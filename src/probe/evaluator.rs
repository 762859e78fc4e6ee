use std::collections::HashMap;
use tracing::{debug, warn};

use crate::http::{Client, Response};
use crate::pagesize::{IgnoreRule, PageSizeMeasurer};
use crate::probe::template;
use crate::probe::types::ProbeResult;
use crate::probe::verdict::{self, Measurement, Thresholds};

/// 一次探测的输入
#[derive(Debug, Clone, Copy)]
pub struct ProbeRequest<'a> {
    /// URL 模板
    pub url: &'a str,
    /// 已编码的 URL 参数
    pub params: &'a HashMap<String, String>,
    pub expected_size: Option<u64>,
    pub size_threshold: Option<f64>,
    /// 响应时间上限（秒）
    pub time_limit: f64,
    pub ignore_rules: &'a [IgnoreRule],
}

/// 探测执行器：发起请求、测量并给出判定，永远返回 `ProbeResult`
#[derive(Clone)]
pub struct ProbeEvaluator {
    client: Client,
    measurer: PageSizeMeasurer,
}

impl ProbeEvaluator {
    pub fn new(client: Client, measurer: PageSizeMeasurer) -> Self {
        Self { client, measurer }
    }

    pub async fn evaluate(&self, request: &ProbeRequest<'_>) -> ProbeResult {
        let url = match template::render(request.url, request.params) {
            Ok(url) => url,
            Err(e) => return ProbeResult::failed(e.to_string()),
        };

        debug!("GET {}", url);
        let Response {
            status,
            body,
            duration,
            ..
        } = match self.client.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                return ProbeResult::failed(e.to_string());
            }
        };

        // HTML 解析是 CPU 密集操作，放到阻塞线程池中执行
        let measurer = self.measurer;
        let rules = request.ignore_rules.to_vec();
        let size = match tokio::task::spawn_blocking(move || measurer.measure(&body, &rules)).await
        {
            Ok(size) => size as u64,
            Err(e) => return ProbeResult::failed(format!("Page size measurement failed: {}", e)),
        };

        let measurement = Measurement {
            elapsed_millis: duration.as_secs_f64() * 1000.0,
            status,
            size,
        };
        debug!(
            "{} -> HTTP {}, {} bytes, {:.1}ms",
            url,
            status.code(),
            size,
            measurement.elapsed_millis
        );

        verdict::judge(
            &measurement,
            &Thresholds {
                expected_size: request.expected_size,
                size_threshold: request.size_threshold,
                time_limit: request.time_limit,
            },
        )
    }
}
