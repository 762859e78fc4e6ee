/// 探测模块 - 单个测试的请求、测量和判定
pub mod evaluator;
pub mod template;
pub mod types;
pub mod verdict;

pub use evaluator::{ProbeEvaluator, ProbeRequest};
pub use template::{TemplateError, render};
pub use types::ProbeResult;
pub use verdict::{Measurement, Thresholds, judge, size_deviation};
