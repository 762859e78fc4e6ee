use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;

use web_watchdog::config::{ConfigLoader, WatchdogConfig};
use web_watchdog::generator::GeneratorRegistry;
use web_watchdog::http::Client;
use web_watchdog::journal::{JournalStorage, RunJournal};
use web_watchdog::logger::init_logger;
use web_watchdog::notify::SmtpMailer;
use web_watchdog::pagesize::PageSizeMeasurer;
use web_watchdog::probe::{ProbeEvaluator, template};
use web_watchdog::runner::{RunCoordinator, TestReporter};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// 未指定且找不到配置文件时使用的路径
const DEFAULT_CONFIG: &str = "./watchdog.json";

#[derive(Parser)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 配置文件路径（默认查找 watchdog.json / watchdog.toml）
    pub config: Option<PathBuf>,

    /// 不发送失败报告邮件
    #[arg(long)]
    pub no_mail: bool,

    /// 显示所有测试结果（默认只显示失败的测试）
    #[arg(short, long)]
    pub verbose: bool,

    /// 结束时以表格形式打印所有结果
    #[arg(long)]
    pub table: bool,

    /// 覆盖配置中的并发数
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// 开启 debug 日志
    #[arg(long)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 校验配置文件和生成器引用，不发起请求
    Check {
        config: Option<PathBuf>,

        /// 开启 debug 日志
        #[arg(long)]
        debug: bool,
    },
}

fn resolve_config_path(path: Option<PathBuf>) -> PathBuf {
    path.or_else(ConfigLoader::find).unwrap_or_else(|| {
        println!("Config not specified, assuming {}", DEFAULT_CONFIG);
        PathBuf::from(DEFAULT_CONFIG)
    })
}

fn load_config(path: &PathBuf) -> Result<WatchdogConfig> {
    ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config {}", path.display()))
}

/// 执行一次完整的检测
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = resolve_config_path(cli.config.clone());
    let config = load_config(&config_path)?;

    init_logger(cli.debug || config.debug);

    let evaluator = ProbeEvaluator::new(
        Client::new()?,
        PageSizeMeasurer::new(config.structural_size),
    );
    let journal = RunJournal::new(config.log_path.clone().map(JournalStorage::new));
    let notifier = if cli.no_mail {
        None
    } else {
        SmtpMailer::from_config(&config)?
    };

    let coordinator = RunCoordinator::new(
        evaluator,
        GeneratorRegistry::with_builtins(),
        journal,
        notifier,
    )
    .with_default_size_threshold(config.page_size_threshold)
    .with_concurrency(cli.concurrency.unwrap_or(config.concurrency));

    let reporter = TestReporter::new(cli.verbose);
    reporter.print_header(&config_path.display().to_string(), config.tests.len());

    let report = coordinator.run(&config.tests).await;

    for outcome in &report.outcomes {
        reporter.print_result(outcome);
    }
    if cli.table {
        reporter.print_table(&report.outcomes);
    }
    reporter.print_summary(&report.summary(), report.notified);

    Ok(())
}

/// 校验配置：URL 模板语法正确，每个占位符都要有生成器，且生成器引用都能解析
pub fn check(path: Option<PathBuf>, debug: bool) -> Result<()> {
    init_logger(debug);

    let config_path = resolve_config_path(path);
    let config = load_config(&config_path)?;
    let registry = GeneratorRegistry::with_builtins();

    let mut problems = 0;
    for test in &config.tests {
        let generators = test.generators();
        let mut issues = Vec::new();

        if let Err(e) = registry.check(&generators) {
            issues.push(e.to_string());
        }
        if let Err(e) = template::validate(&test.url) {
            issues.push(e.to_string());
        }
        for name in template::placeholders(&test.url) {
            if !generators.contains_key(&name) {
                issues.push(format!("Missing URL parameter '{}'", name));
            }
        }
        issues.dedup();

        if issues.is_empty() {
            println!(" {} {}", "✓".green(), test.title);
        } else {
            problems += issues.len();
            println!(" {} {}", "✗".red(), test.title);
            for issue in issues {
                println!("     {}", issue.red());
            }
        }
    }

    if problems > 0 {
        bail!("{} problem(s) found in {}", problems, config_path.display());
    }
    println!("\n{} tests OK", config.tests.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, url: &str, generator: serde_json::Value) -> PathBuf {
        let path = dir.path().join("watchdog.json");
        let content = serde_json::json!({
            "tests": [{
                "title": "Home",
                "url": url,
                "generator": generator,
                "responseTimeLimit": 2
            }]
        });
        fs::write(&path, content.to_string()).unwrap();
        path
    }

    #[test]
    fn test_check_accepts_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "https://example.com/search?q={q}",
            serde_json::json!({"q": "words.generate_phrase"}),
        );
        assert!(check(Some(path), true).is_ok());
    }

    #[test]
    fn test_check_reports_template_and_generator_problems() {
        let dir = TempDir::new().unwrap();

        let positional = write_config(&dir, "https://example.com/{0}", serde_json::json!({}));
        assert!(check(Some(positional), false).is_err());

        let unresolved = write_config(
            &dir,
            "https://example.com/?q={q}",
            serde_json::json!({"q": "nope.nothing"}),
        );
        assert!(check(Some(unresolved), false).is_err());

        let missing = write_config(&dir, "https://example.com/?q={q}", serde_json::json!({}));
        let err = check(Some(missing), false).unwrap_err();
        assert!(err.to_string().contains("1 problem(s)"));
    }
}
