//! # 容器组合层
//!
//! 负责把内省器、配置、日志和模块组装成一个可用的 [`Manager`](di_impl::Manager)。
//!
//! ## 主要功能
//!
//! - **管理器构建器**: 使用构建者模式组装容器
//! - **配置加载**: 从配置文件和 `DEPEND` 前缀的环境变量加载容器配置
//! - **声明式服务**: 在配置中描述服务的参数、动作和生命周期
//! - **日志初始化**: 开发/生产两套预设
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use depend_composition::{LoggingConfig, ManagerBuilder};
//! use di_impl::{TypeDefinition, TypeRegistry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = TypeRegistry::new()
//!         .with(TypeDefinition::class("Clock").factory(|_| Ok(0_u64)))?;
//!
//!     let mut manager = ManagerBuilder::new(registry)
//!         .with_settings_file("config/depend.toml")?
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!
//!     let clock = manager.get("Clock")?;
//!     println!("时钟: {:?}", clock.cloned::<u64>());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod logging;
pub mod services;
pub mod settings;

// 重新导出主要类型
pub use builder::ManagerBuilder;
pub use logging::LoggingConfig;
pub use services::ServiceSettings;
pub use settings::{ContainerSettings, LoggingSettings};

// 重新导出错误类型
pub use depend_common::InfrastructureError;
