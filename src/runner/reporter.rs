use crate::runner::types::{RunSummary, TestOutcome};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

pub struct TestReporter {
    verbose: bool,
}

impl TestReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// 打印测试开始
    pub fn print_header(&self, config_path: &str, total: usize) {
        println!("\nRunning {} tests from {}...\n", total, config_path.bold());
    }

    /// 打印单个测试结果；非 verbose 模式只显示失败的测试
    pub fn print_result(&self, outcome: &TestOutcome) {
        let failed = outcome.is_failure();
        if !self.verbose && !failed {
            return;
        }

        if outcome.omitted {
            println!(
                " {} [{}] {} {}",
                "⊘".dimmed(),
                outcome.number,
                outcome.title,
                "(omitted)".dimmed()
            );
            return;
        }

        let symbol = if failed { "✗".red() } else { "✓".green() };
        let result = &outcome.result;

        let details = match (result.http_status, result.elapsed_millis, result.measured_size) {
            (Some(status), Some(time), Some(size)) => {
                format!("(HTTP {}, {:.0}ms, {} B)", status, time, size)
            }
            _ => "(no response)".to_string(),
        };

        println!(
            " {} [{}] {} {}",
            symbol,
            outcome.number,
            outcome.title,
            details.dimmed()
        );

        for error in &result.errors {
            println!("     {}", error.red());
        }
    }

    /// 以表格形式打印所有结果
    pub fn print_table(&self, outcomes: &[TestOutcome]) {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["#", "Test", "Status", "Time", "Size", "Errors"]);

        for outcome in outcomes {
            let result = &outcome.result;
            let verdict = if outcome.omitted {
                Cell::new("omitted").add_attribute(Attribute::Dim)
            } else if outcome.is_failure() {
                Cell::new("FAIL").fg(Color::Red)
            } else {
                Cell::new("ok").fg(Color::Green)
            };

            table.add_row(vec![
                Cell::new(outcome.number),
                Cell::new(&outcome.title),
                verdict,
                Cell::new(
                    result
                        .elapsed_millis
                        .map(|t| format!("{:.0}ms", t))
                        .unwrap_or_default(),
                ),
                Cell::new(
                    result
                        .measured_size
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                ),
                Cell::new(result.errors.join("\n")),
            ]);
        }

        println!("{}", table);
    }

    /// 打印测试摘要
    pub fn print_summary(&self, summary: &RunSummary, notified: bool) {
        println!("\n{}", "━".repeat(50));
        println!("{}", "Summary".bold());
        println!("{}", "━".repeat(50));

        if summary.omitted > 0 {
            println!(
                "  {}: {} passed, {} failed, {} omitted, {} total",
                "Tests".bold(),
                summary.passed.to_string().green(),
                summary.failed.to_string().red(),
                summary.omitted.to_string().dimmed(),
                summary.total
            );
        } else if summary.failed == 0 {
            println!(
                "  {}: {} passed, {} total",
                "Tests".bold(),
                summary.passed.to_string().green(),
                summary.total
            );
        } else {
            println!(
                "  {}: {} passed, {} failed, {} total",
                "Tests".bold(),
                summary.passed.to_string().green(),
                summary.failed.to_string().red(),
                summary.total
            );
        }

        if notified {
            println!("  {}: failure report sent", "Mail".bold());
        }

        println!(
            "  {}: {:.3}s",
            "Duration".bold(),
            summary.total_duration.as_secs_f64()
        );
        println!();
    }
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(false)
    }
}
