/// 页面大小测量 - 在移除易变子树后计算页面的字节长度
#[cfg(feature = "structural")]
pub mod filter;
pub mod measurer;
pub mod pattern;

pub use measurer::PageSizeMeasurer;
pub use pattern::{IgnoreRule, MatchPattern};
