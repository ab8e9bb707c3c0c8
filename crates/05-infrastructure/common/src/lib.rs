//! # Depend Common
//!
//! 这个 crate 提供了依赖注入容器各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`DependencyError`] - 依赖注入错误
//! - [`TypeKey`] - 规范化的类型键
//! - [`TypeShape`] - 类型内省得到的形状信息
//! - [`ParamValue`] - 字面量或服务引用形式的参数值
//! - [`Lifetime`] - 组件生命周期

pub mod errors;
pub mod lifecycle;
pub mod metadata;
pub mod parameters;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
pub use parameters::*;
