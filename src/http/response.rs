use crate::Result;
use crate::http::types::Status;
use std::time::Duration;

pub struct Response {
    pub status: Status,
    pub body: Vec<u8>, // 原始字节，页面大小按字节计算
    pub duration: Duration,
}

impl Response {
    pub fn new(status: u16, body: Vec<u8>, duration: Duration) -> Result<Self> {
        Ok(Self {
            status: Status::new(status)?,
            body,
            duration,
        })
    }
}
