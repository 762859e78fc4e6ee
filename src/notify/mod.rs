/// 通知模块 - 运行中有失败时发送邮件报告
pub mod mailer;
pub mod report;

pub use mailer::{Notifier, SmtpMailer};
pub use report::format_report;
