use std::time::{Duration, Instant};

use crate::Result;
use crate::http::response::Response;

/// 每个探测固定的超时时间（包含读取响应体）
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::with_timeout(PROBE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("web-watchdog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { inner })
    }

    /// GET 请求，计时范围从发送前到响应体读取完毕
    pub async fn get(&self, url: &str) -> Result<Response> {
        let url = reqwest::Url::parse(url)?;

        let start = Instant::now();
        let response = self.inner.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let duration = start.elapsed();

        Response::new(status, body.to_vec(), duration)
    }
}
