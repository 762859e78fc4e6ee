//! 响应判定：把一次成功的响应与大小、耗时、状态码阈值比较

use crate::http::Status;
use crate::probe::types::ProbeResult;

/// 一次成功响应的测量值
#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    pub elapsed_millis: f64,
    pub status: Status,
    pub size: u64,
}

/// 单个测试的阈值
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// 期望的页面大小（字节）
    pub expected_size: Option<u64>,
    /// 允许的相对偏差（0..1）
    pub size_threshold: Option<f64>,
    /// 响应时间上限（秒）
    pub time_limit: f64,
}

/// 相对偏差 `|expected - measured| / expected`
pub fn size_deviation(expected: u64, measured: u64) -> f64 {
    if expected == 0 {
        return if measured == 0 { 0.0 } else { f64::INFINITY };
    }
    (expected as f64 - measured as f64).abs() / expected as f64
}

/// 两项都配置时才检查大小
pub fn check_size(expected: Option<u64>, threshold: Option<f64>, measured: u64) -> Option<String> {
    let (expected, threshold) = (expected?, threshold?);
    let deviation = size_deviation(expected, measured);
    (deviation > threshold).then(|| {
        format!(
            "Response body changed by {:.1}% (threshold = {:.1}%).",
            deviation * 100.0,
            threshold * 100.0
        )
    })
}

pub fn check_time(elapsed_millis: f64, limit_secs: f64) -> Option<String> {
    let limit_millis = limit_secs * 1000.0;
    (elapsed_millis > limit_millis).then(|| {
        format!(
            "Loading time limit exceeded by {:.1}%.",
            elapsed_millis / limit_millis * 100.0
        )
    })
}

/// 只标记 4xx，5xx 不在此检查范围内
pub fn check_status(status: Status) -> Option<String> {
    status
        .is_client_error()
        .then(|| format!("HTTP status code {}", status.code()))
}

/// 生成完整的探测结果，错误顺序固定为：大小、耗时、状态码
pub fn judge(measurement: &Measurement, thresholds: &Thresholds) -> ProbeResult {
    let errors = [
        check_size(
            thresholds.expected_size,
            thresholds.size_threshold,
            measurement.size,
        ),
        check_time(measurement.elapsed_millis, thresholds.time_limit),
        check_status(measurement.status),
    ]
    .into_iter()
    .flatten()
    .collect();

    ProbeResult {
        elapsed_millis: Some(measurement.elapsed_millis),
        http_status: Some(measurement.status.code()),
        measured_size: Some(measurement.size),
        errors,
    }
}
