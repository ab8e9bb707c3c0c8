//! # 依赖注入具体实现
//!
//! 提供描述符模型、描述符缓存、容器管理器以及基于显式注册的类型内省器。
//!
//! ```ignore
//! let registry = TypeRegistry::new()
//!     .with(TypeDefinition::class("Engine").factory(|_| Ok(Engine::default())))?;
//! let mut manager = Manager::new(registry);
//! let engine = manager.get("Engine")?;
//! ```

pub mod action;
pub mod cache;
pub mod descriptor;
pub mod manager;
pub mod module;
pub mod registry;

pub use action::{Action, ActionDescriptor};
pub use cache::{CacheEntry, DescriptorCache};
pub use descriptor::{Descriptor, ServiceDescriptor};
pub use manager::{Manager, ManagerOptions};
pub use module::Module;
pub use registry::{TypeDefinition, TypeRegistry};
