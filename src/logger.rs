use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统
///
/// 支持通过 RUST_LOG 环境变量控制日志级别
/// 默认级别: info（配置或命令行开启 debug 时为 debug）
///
/// 示例:
/// - RUST_LOG=debug web-watchdog watchdog.json
/// - RUST_LOG=web_watchdog::pagesize=trace web-watchdog
pub fn init_logger(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如同一进程中的多个测试）时保留已有的 subscriber
    let initialized = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .is_ok();

    if initialized {
        tracing::debug!("Logger initialized");
    }
}
