use crate::config::types::WatchdogConfig;
use crate::{Result, WatchdogError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 按顺序查找的配置文件名
    const CONFIG_FILES: [&'static str; 2] = ["watchdog.json", "watchdog.toml"];

    /// 从指定路径加载配置文件（`.toml` 按 TOML 解析，其余按 JSON 解析）并校验
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<WatchdogConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            WatchdogError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::parse(&content, Self::is_toml(path))?;
        Self::validate(&config)?;

        debug!(
            "Loaded {} tests from {}",
            config.tests.len(),
            path.display()
        );
        Ok(config)
    }

    /// 解析配置内容（不校验）
    pub fn parse(content: &str, toml: bool) -> Result<WatchdogConfig> {
        if toml {
            Ok(toml::from_str(content)?)
        } else {
            Ok(serde_json::from_str(content)?)
        }
    }

    fn is_toml(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
    }

    /// 查找配置文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/web-watchdog/
    pub fn find() -> Option<PathBuf> {
        Self::find_in_current_dir().or_else(Self::find_in_user_dir)
    }

    fn find_in_current_dir() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if let Some(path) = Self::find_in(&current) {
                return Some(path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    fn find_in_user_dir() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        Self::find_in(&home.join(".config").join("web-watchdog"))
    }

    fn find_in(dir: &Path) -> Option<PathBuf> {
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// 校验配置的取值范围
    pub fn validate(config: &WatchdogConfig) -> Result<()> {
        if config.concurrency == 0 {
            return Err(invalid("concurrency must be at least 1"));
        }

        if let Some(threshold) = config.page_size_threshold {
            check_threshold("pageSizeThreshold", threshold)?;
        }

        if config.mail_enabled() {
            if config.smtp_server.as_deref().is_none_or(str::is_empty) {
                return Err(invalid("smtpServer is required when mailRecipients is set"));
            }
            if config.mail_sender.as_deref().is_none_or(str::is_empty) {
                return Err(invalid("mailSender is required when mailRecipients is set"));
            }
        }

        for (index, test) in config.tests.iter().enumerate() {
            if test.title.trim().is_empty() {
                return Err(invalid(&format!("tests[{}]: title must not be empty", index)));
            }
            let label = &test.title;

            if test.url.trim().is_empty() {
                return Err(invalid(&format!("{}: url must not be empty", label)));
            }

            if !test.response_time_limit.is_finite() || test.response_time_limit <= 0.0 {
                return Err(invalid(&format!(
                    "{}: responseTimeLimit must be a positive number of seconds",
                    label
                )));
            }

            if let Some(threshold) = test.page_size_threshold {
                check_threshold(&format!("{}: pageSizeThreshold", label), threshold)?;
            }

            if test.size == Some(0) {
                return Err(invalid(&format!("{}: size must be greater than 0", label)));
            }

            // 空规则会清空整个 <html> 根元素
            let rules = test.page_size_ignore.as_deref().unwrap_or_default();
            if rules.iter().any(Vec::is_empty) {
                return Err(invalid(&format!(
                    "{}: every pageSizeIgnore rule needs at least one pattern",
                    label
                )));
            }
        }

        Ok(())
    }
}

fn check_threshold(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(&format!(
            "{} must be a fraction between 0 and 1, got {}",
            name, value
        )))
    }
}

fn invalid(message: &str) -> WatchdogError {
    WatchdogError::ConfigError(message.to_string())
}
