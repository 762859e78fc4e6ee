use super::model::JournalEntry;
use super::storage::JournalStorage;
use crate::runner::TestOutcome;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 一次运行的结果记录器
///
/// 由调用方显式构造并传给 `RunCoordinator`；每条结果都会输出一条 tracing
/// 事件，配置了 logPath 时同时追加到结果日志文件。
pub struct RunJournal {
    run_id: Uuid,
    storage: Option<JournalStorage>,
}

impl RunJournal {
    pub fn new(storage: Option<JournalStorage>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            storage,
        }
    }

    /// 只输出 tracing 事件，不写文件
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// 记录一条结果
    ///
    /// 这是一个 Best-effort 操作，写入失败只打印警告，不影响本次运行。
    pub fn record(&self, outcome: &TestOutcome) {
        let result = &outcome.result;
        if outcome.omitted {
            info!(test = %outcome.title, "Test omitted");
        } else if outcome.is_failure() {
            error!(
                test = %outcome.title,
                status = ?result.http_status,
                size = ?result.measured_size,
                time_ms = ?result.elapsed_millis,
                errors = ?result.errors,
                "Test failed"
            );
        } else {
            info!(
                test = %outcome.title,
                status = ?result.http_status,
                size = ?result.measured_size,
                time_ms = ?result.elapsed_millis,
                "Test passed"
            );
        }

        if let Some(storage) = &self.storage {
            let entry = JournalEntry::from_outcome(self.run_id, outcome);
            if let Err(e) = storage.append(&entry) {
                warn!(
                    "Failed to write result to {}: {}",
                    storage.path().display(),
                    e
                );
            }
        }
    }
}
