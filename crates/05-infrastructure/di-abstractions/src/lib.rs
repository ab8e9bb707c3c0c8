//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义类型内省和实例构建的核心接口。
//!
//! ## 核心接口
//!
//! - [`TypeIntrospector`] - 类型内省器接口，宿主类型信息的唯一边界
//! - [`Instance`] - 容器构建出的实例句柄
//! - [`Arguments`] - 传递给构造函数和方法的位置参数
//! - [`ResolveContext`] - 解析上下文，用于检测循环依赖

pub mod arguments;
pub mod instance;
pub mod introspector;
pub mod resolver;

pub use arguments::*;
pub use instance::*;
pub use introspector::*;
pub use resolver::*;
