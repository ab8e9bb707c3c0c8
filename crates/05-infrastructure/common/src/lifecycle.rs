//! 组件生命周期管理

use serde::{Deserialize, Serialize};

/// 组件生命周期类型
///
/// 由描述符上的 `shared` 与 `cloneable` 两个标志共同决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 单例模式 - 同一个键只创建一个实例
    Singleton,
    /// 克隆模式 - 复制已存在的原型实例
    Cloneable,
    /// 瞬时模式 - 每次请求都创建新实例
    Transient,
}

impl Lifetime {
    /// 根据生效的标志确定生命周期，`shared` 优先于 `cloneable`
    pub fn from_flags(shared: bool, cloneable: bool) -> Self {
        match (shared, cloneable) {
            (true, _) => Self::Singleton,
            (false, true) => Self::Cloneable,
            (false, false) => Self::Transient,
        }
    }

    /// 对应的 `shared` 标志
    pub fn is_shared(self) -> bool {
        self == Self::Singleton
    }

    /// 对应的 `cloneable` 标志
    pub fn is_cloneable(self) -> bool {
        self == Self::Cloneable
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::Singleton
    }
}

/// 单个类型键在两次调用之间可观察到的解析状态
///
/// 描述和构建都在一次 `&mut` 调用内完成，中间状态对调用方不可见。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// 尚未描述
    Unresolved,
    /// 描述符已缓存
    DescriptorCached,
    /// 实例已就绪
    InstanceReady,
}

impl Default for ResolutionState {
    fn default() -> Self {
        Self::Unresolved
    }
}
