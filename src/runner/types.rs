use crate::probe::ProbeResult;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// 单个测试的执行结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOutcome {
    /// 测试序号（从 1 开始，按配置顺序）
    pub number: usize,

    /// 测试标题
    pub title: String,

    /// 是否因 `ignore` 被跳过
    pub omitted: bool,

    /// 探测结果
    pub result: ProbeResult,
}

impl TestOutcome {
    pub fn probed(number: usize, title: impl Into<String>, result: ProbeResult) -> Self {
        Self {
            number,
            title: title.into(),
            omitted: false,
            result,
        }
    }

    pub fn omitted(number: usize, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            omitted: true,
            result: ProbeResult::default(),
        }
    }

    /// 跳过的测试不算失败
    pub fn is_failure(&self) -> bool {
        !self.omitted && !self.result.passed()
    }
}

/// 邮件报告中的失败条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTest {
    pub title: String,
    pub errors: Vec<String>,
}

impl From<&TestOutcome> for FailedTest {
    fn from(outcome: &TestOutcome) -> Self {
        Self {
            title: outcome.title.clone(),
            errors: outcome.result.errors.clone(),
        }
    }
}

/// 一次运行的完整结果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,

    /// 按配置顺序排列的所有结果
    pub outcomes: Vec<TestOutcome>,

    /// 是否发送了失败通知
    pub notified: bool,

    pub duration: Duration,
}

impl RunReport {
    pub fn failures(&self) -> Vec<FailedTest> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failure())
            .map(FailedTest::from)
            .collect()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_outcomes(&self.outcomes, self.duration)
    }
}

/// 运行摘要
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub omitted: usize,
    pub total_duration: Duration,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[TestOutcome], total_duration: Duration) -> Self {
        let omitted = outcomes.iter().filter(|o| o.omitted).count();
        let failed = outcomes.iter().filter(|o| o.is_failure()).count();

        Self {
            total: outcomes.len(),
            passed: outcomes.len() - failed - omitted,
            failed,
            omitted,
            total_duration,
        }
    }
}
