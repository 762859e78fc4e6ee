pub mod config;
pub mod error;
pub mod generator;
pub mod http;
pub mod journal;
pub mod logger;
pub mod notify;
pub mod pagesize;
pub mod probe;
pub mod runner;

// Re-export commonly used types
pub use error::{Result, WatchdogError};
