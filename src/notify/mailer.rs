use chrono::Local;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

use crate::config::WatchdogConfig;
use crate::notify::report;
use crate::runner::FailedTest;
use crate::{Result, WatchdogError};

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// 失败通知的接收方
pub trait Notifier {
    /// 只在存在失败的测试时被调用
    fn notify(&self, failed: &[FailedTest]) -> impl Future<Output = Result<()>> + Send;
}

/// `None` 表示不发送通知（未配置收件人或 --no-mail）
impl<N: Notifier + Sync> Notifier for Option<N> {
    async fn notify(&self, failed: &[FailedTest]) -> Result<()> {
        match self {
            Some(notifier) => notifier.notify(failed).await,
            None => Ok(()),
        }
    }
}

/// 通过 SMTP 给每个收件人单独发送一封纯文本报告
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipients: Vec<Mailbox>,
}

impl SmtpMailer {
    /// `server` 可以是 `host` 或 `host:port`（默认 25 端口，不使用 TLS）
    pub fn new(server: &str, sender: &str, recipients: &[String]) -> Result<Self> {
        let (host, port) = split_server(server)?;
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host);
        if let Some(port) = port {
            builder = builder.port(port);
        }
        let transport = builder.timeout(Some(SMTP_TIMEOUT)).build();

        let recipients = recipients
            .iter()
            .map(|r| r.parse::<Mailbox>())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            transport,
            sender: sender.parse()?,
            recipients,
        })
    }

    /// 根据配置构造；没有收件人时返回 None
    pub fn from_config(config: &WatchdogConfig) -> Result<Option<Self>> {
        if !config.mail_enabled() {
            return Ok(None);
        }

        let server = config
            .smtp_server
            .as_deref()
            .ok_or_else(|| WatchdogError::ConfigError("smtpServer is not set".to_string()))?;
        let sender = config
            .mail_sender
            .as_deref()
            .ok_or_else(|| WatchdogError::ConfigError("mailSender is not set".to_string()))?;

        Self::new(server, sender, &config.mail_recipients).map(Some)
    }

    pub fn recipients(&self) -> &[Mailbox] {
        &self.recipients
    }

    fn build_message(&self, recipient: &Mailbox, subject: &str, body: &str) -> Result<Message> {
        Ok(Message::builder()
            .from(self.sender.clone())
            .to(recipient.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?)
    }
}

impl Notifier for SmtpMailer {
    async fn notify(&self, failed: &[FailedTest]) -> Result<()> {
        let subject = report::subject(&Local::now());
        let body = report::format_report(failed);

        let mut delivered = 0;
        for recipient in &self.recipients {
            let message = self.build_message(recipient, &subject, &body)?;
            match self.transport.send(message).await {
                Ok(_) => {
                    delivered += 1;
                    info!("Failure report sent to <{}>", recipient.email);
                }
                Err(e) => error!(
                    "Failed to send an e-mail to <{}>, error: {}",
                    recipient.email, e
                ),
            }
        }

        if delivered == 0 && !self.recipients.is_empty() {
            return Err(WatchdogError::MailError(
                "failure report could not be delivered to any recipient".to_string(),
            ));
        }
        Ok(())
    }
}

fn split_server(server: &str) -> Result<(&str, Option<u16>)> {
    match server.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse().map_err(|_| {
                WatchdogError::ConfigError(format!("Invalid SMTP port in '{}'", server))
            })?;
            Ok((host, Some(port)))
        }
        None => Ok((server, None)),
    }
}
