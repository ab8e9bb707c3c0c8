//! 模块
//!
//! 模块把一批 `describe` / `implement` 调用打包在一起，加载时调用一次。

use crate::manager::Manager;
use depend_common::DependencyResult;

/// 模块 trait
pub trait Module {
    /// 模块名称，用于日志
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// 向管理器登记类型
    fn register(&self, manager: &mut Manager) -> DependencyResult<()>;
}

impl<F> Module for F
where
    F: Fn(&mut Manager) -> DependencyResult<()>,
{
    fn register(&self, manager: &mut Manager) -> DependencyResult<()> {
        self(manager)
    }
}
