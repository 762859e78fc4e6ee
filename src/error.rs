use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchdogError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Mail error: {0}")]
    MailError(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for WatchdogError {
    fn from(err: anyhow::Error) -> Self {
        WatchdogError::Other(err.to_string())
    }
}

impl From<lettre::error::Error> for WatchdogError {
    fn from(err: lettre::error::Error) -> Self {
        WatchdogError::MailError(err.to_string())
    }
}

impl From<lettre::address::AddressError> for WatchdogError {
    fn from(err: lettre::address::AddressError) -> Self {
        WatchdogError::MailError(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for WatchdogError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        WatchdogError::MailError(err.to_string())
    }
}

/// Result type for web-watchdog crate
pub type Result<T> = std::result::Result<T, WatchdogError>;
