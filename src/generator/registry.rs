use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::generator::builtin;

/// 无参数、返回字符串的参数生成函数
pub type GeneratorFn = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("Unknown generator '{0}'")]
    UnknownGenerator(String),

    #[error("Unknown generator module '{module}' (referenced by '{reference}')")]
    UnknownModule { module: String, reference: String },
}

/// 生成器注册表
///
/// 引用中包含 `.` 时按最后一个点拆分为 `模块.函数`，在模块命名空间中查找；
/// 否则在本地注册的生成器中查找。
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    local: HashMap<String, GeneratorFn>,
    modules: HashMap<String, HashMap<String, GeneratorFn>>,
}

impl GeneratorRegistry {
    /// 空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 包含内置生成器的注册表
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// 注册本地生成器
    pub fn register<F>(&mut self, name: impl Into<String>, generator: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.local.insert(name.into(), Arc::new(generator));
    }

    /// 在模块命名空间中注册生成器
    pub fn register_in<F>(&mut self, module: impl Into<String>, name: impl Into<String>, generator: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.modules
            .entry(module.into())
            .or_default()
            .insert(name.into(), Arc::new(generator));
    }

    /// 解析生成器引用
    pub fn resolve(&self, reference: &str) -> Result<&GeneratorFn, GeneratorError> {
        match reference.rsplit_once('.') {
            Some((module, function)) => {
                let functions =
                    self.modules
                        .get(module)
                        .ok_or_else(|| GeneratorError::UnknownModule {
                            module: module.to_string(),
                            reference: reference.to_string(),
                        })?;
                functions
                    .get(function)
                    .ok_or_else(|| GeneratorError::UnknownGenerator(reference.to_string()))
            }
            None => self
                .local
                .get(reference)
                .ok_or_else(|| GeneratorError::UnknownGenerator(reference.to_string())),
        }
    }

    /// 检查所有引用都能解析（不调用生成器）
    pub fn check(&self, specs: &BTreeMap<String, String>) -> Result<(), GeneratorError> {
        for reference in specs.values() {
            self.resolve(reference)?;
        }
        Ok(())
    }

    /// 为每个参数调用一次生成器，返回 URL 编码后的值
    pub fn generate(
        &self,
        specs: &BTreeMap<String, String>,
    ) -> Result<HashMap<String, String>, GeneratorError> {
        let mut output = HashMap::with_capacity(specs.len());
        for (param, reference) in specs {
            let generator = self.resolve(reference)?;
            let value = generator();
            output.insert(param.clone(), urlencoding::encode(&value).into_owned());
        }
        Ok(output)
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut local: Vec<&String> = self.local.keys().collect();
        local.sort();
        let mut modules: Vec<&String> = self.modules.keys().collect();
        modules.sort();
        f.debug_struct("GeneratorRegistry")
            .field("local", &local)
            .field("modules", &modules)
            .finish()
    }
}
