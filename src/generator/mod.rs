/// 参数生成模块 - 为 URL 模板生成动态参数
pub mod builtin;
mod registry;

pub use registry::{GeneratorError, GeneratorFn, GeneratorRegistry};
