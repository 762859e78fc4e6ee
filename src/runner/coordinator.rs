use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::TestSpec;
use crate::generator::GeneratorRegistry;
use crate::journal::RunJournal;
use crate::notify::Notifier;
use crate::probe::{ProbeEvaluator, ProbeRequest, ProbeResult};
use crate::runner::types::{RunReport, TestOutcome};

/// 运行协调器：依次（或并发）执行所有测试，记录结果，有失败时发送通知
pub struct RunCoordinator<N> {
    evaluator: ProbeEvaluator,
    generators: Arc<GeneratorRegistry>,
    journal: RunJournal,
    notifier: N,
    default_size_threshold: Option<f64>,
    concurrency: usize,
}

impl<N: Notifier> RunCoordinator<N> {
    pub fn new(
        evaluator: ProbeEvaluator,
        generators: GeneratorRegistry,
        journal: RunJournal,
        notifier: N,
    ) -> Self {
        Self {
            evaluator,
            generators: Arc::new(generators),
            journal,
            notifier,
            default_size_threshold: None,
            concurrency: 1,
        }
    }

    /// 全局 pageSizeThreshold
    pub fn with_default_size_threshold(mut self, threshold: Option<f64>) -> Self {
        self.default_size_threshold = threshold;
        self
    }

    /// 同时运行的探测数量（最小为 1）
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// 执行所有测试，结果按配置顺序返回
    pub async fn run(&self, tests: &[TestSpec]) -> RunReport {
        let start = Instant::now();
        info!(
            "Running {} tests (concurrency {})",
            tests.len(),
            self.concurrency
        );

        let outcomes = if self.concurrency == 1 {
            self.run_sequential(tests).await
        } else {
            self.run_concurrent(tests).await
        };

        for outcome in &outcomes {
            self.journal.record(outcome);
        }

        let mut report = RunReport {
            run_id: self.journal.run_id(),
            outcomes,
            notified: false,
            duration: start.elapsed(),
        };

        let failures = report.failures();
        if !failures.is_empty() {
            match self.notifier.notify(&failures).await {
                Ok(()) => report.notified = true,
                Err(e) => error!("Failed to send failure report: {}", e),
            }
        }

        report
    }

    /// 每个测试仍在独立任务中执行，生成器 panic 只影响该测试
    async fn run_sequential(&self, tests: &[TestSpec]) -> Vec<TestOutcome> {
        let mut outcomes = Vec::with_capacity(tests.len());
        for (index, test) in tests.iter().enumerate() {
            let pending = self.spawn_probe(index + 1, test.clone(), None);
            outcomes.push(pending.join().await);
        }
        outcomes
    }

    async fn run_concurrent(&self, tests: &[TestSpec]) -> Vec<TestOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let pending: Vec<_> = tests
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, test)| self.spawn_probe(index + 1, test, Some(Arc::clone(&semaphore))))
            .collect();

        // 按提交顺序等待，保证结果顺序稳定
        let mut outcomes = Vec::with_capacity(pending.len());
        for probe in pending {
            outcomes.push(probe.join().await);
        }
        outcomes
    }

    fn spawn_probe(
        &self,
        number: usize,
        test: TestSpec,
        semaphore: Option<Arc<Semaphore>>,
    ) -> PendingProbe {
        let title = test.title.clone();
        let evaluator = self.evaluator.clone();
        let generators = Arc::clone(&self.generators);
        let default_threshold = self.default_size_threshold;

        let handle = tokio::spawn(async move {
            let _permit = match semaphore {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            probe_test(&evaluator, &generators, number, &test, default_threshold).await
        });

        PendingProbe {
            number,
            title,
            handle,
        }
    }
}

/// 已提交但尚未完成的探测任务
struct PendingProbe {
    number: usize,
    title: String,
    handle: JoinHandle<TestOutcome>,
}

impl PendingProbe {
    /// 任务 panic 时转换为该测试的失败结果
    async fn join(self) -> TestOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Probe task for {} failed: {}", self.title, e);
                TestOutcome::probed(
                    self.number,
                    self.title,
                    ProbeResult::failed(format!("Probe task failed: {}", e)),
                )
            }
        }
    }
}

/// 执行单个测试：生成参数 -> 探测；任何错误都只影响这一个测试
async fn probe_test(
    evaluator: &ProbeEvaluator,
    generators: &GeneratorRegistry,
    number: usize,
    test: &TestSpec,
    default_size_threshold: Option<f64>,
) -> TestOutcome {
    if test.ignore {
        return TestOutcome::omitted(number, &test.title);
    }

    let params = match generators.generate(&test.generators()) {
        Ok(params) => params,
        Err(e) => return TestOutcome::probed(number, &test.title, ProbeResult::failed(e.to_string())),
    };

    let ignore_rules = test.ignore_rules();
    let request = ProbeRequest {
        url: &test.url,
        params: &params,
        expected_size: test.size,
        size_threshold: test.size_threshold(default_size_threshold),
        time_limit: test.response_time_limit,
        ignore_rules: &ignore_rules,
    };

    TestOutcome::probed(number, &test.title, evaluator.evaluate(&request).await)
}
