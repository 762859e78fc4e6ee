use crate::{Result, WatchdogError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u16);

impl Status {
    pub fn new(code: u16) -> Result<Self> {
        if (100..600).contains(&code) {
            Ok(Self(code))
        } else {
            Err(WatchdogError::Other(format!(
                "Invalid HTTP status code: {}",
                code
            )))
        }
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    /// 状态码类别（百位数字）
    pub fn class(&self) -> u16 {
        self.0 / 100
    }

    pub fn is_client_error(&self) -> bool {
        self.class() == 4
    }
}
