//! 解析上下文
//!
//! 记录当前正在构建的类型链，用于检测构造期的循环依赖

use depend_common::{DependencyError, TypeKey};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// 解析上下文
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<(TypeKey, String)>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, key: &TypeKey, name: &str) -> Result<(), DependencyError> {
        if self.options.detect_cycles && self.contains(key) {
            return Err(DependencyError::CircularDependency {
                dependency_chain: self.describe_chain(name),
            });
        }

        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                type_name: name.to_string(),
                max_depth: self.options.max_depth,
            });
        }

        trace!("进入解析: {} (深度 {})", name, self.resolution_chain.len() + 1);
        self.resolution_chain.push((key.clone(), name.to_string()));
        Ok(())
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 类型是否在解析链中
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.resolution_chain.iter().any(|(k, _)| k == key)
    }

    /// 当前深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    fn describe_chain(&self, next: &str) -> String {
        self.resolution_chain
            .iter()
            .map(|(_, name)| name.as_str())
            .chain(std::iter::once(next))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// 解析选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// 是否启用循环依赖检测
    pub detect_cycles: bool,
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_depth: 100,
        }
    }
}
