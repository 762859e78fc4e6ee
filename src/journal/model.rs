use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::probe::ProbeResult;
use crate::runner::TestOutcome;

/// 日志级别：失败为 error，其余为 info
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryLevel {
    Info,
    Error,
}

/// 结果日志中的一行
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// 同一次运行共享的 ID
    pub run_id: Uuid,

    pub timestamp: DateTime<Utc>,

    pub level: EntryLevel,

    pub title: String,

    #[serde(default)]
    pub omitted: bool,

    #[serde(flatten)]
    pub result: ProbeResult,
}

impl JournalEntry {
    pub fn from_outcome(run_id: Uuid, outcome: &TestOutcome) -> Self {
        Self {
            run_id,
            timestamp: Utc::now(),
            level: if outcome.is_failure() {
                EntryLevel::Error
            } else {
                EntryLevel::Info
            },
            title: outcome.title.clone(),
            omitted: outcome.omitted,
            result: outcome.result.clone(),
        }
    }
}
