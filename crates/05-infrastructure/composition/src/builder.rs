//! 管理器构建器

use crate::logging::LoggingConfig;
use crate::services::ServiceSettings;
use crate::settings::ContainerSettings;
use depend_common::InfrastructureResult;
use di_abstractions::TypeIntrospector;
use di_impl::{Manager, ManagerOptions, Module};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// 管理器构建器
///
/// 使用建造者模式组装容器：加载配置、初始化日志、注册模块并应用声明式服务定义。
/// 模块先于配置文件中的服务定义应用，配置可以覆盖模块中的参数。
pub struct ManagerBuilder {
    /// 类型内省器
    introspector: Arc<dyn TypeIntrospector>,
    /// 容器配置
    settings: ContainerSettings,
    /// 模块列表
    modules: Vec<Box<dyn Module>>,
    /// 日志配置，显式设置时优先于配置文件
    logging_config: Option<LoggingConfig>,
}

impl ManagerBuilder {
    /// 创建新的构建器
    pub fn new(introspector: impl TypeIntrospector + 'static) -> Self {
        Self::with_shared(Arc::new(introspector))
    }

    /// 使用共享的内省器创建构建器
    pub fn with_shared(introspector: Arc<dyn TypeIntrospector>) -> Self {
        Self {
            introspector,
            settings: ContainerSettings::default(),
            modules: Vec::new(),
            logging_config: None,
        }
    }

    /// 从配置文件加载配置
    pub fn with_settings_file<P: AsRef<Path>>(mut self, path: P) -> InfrastructureResult<Self> {
        let path = path.as_ref();
        info!("加载配置文件: {}", path.display());
        self.settings = ContainerSettings::load_from(path)?;
        Ok(self)
    }

    /// 使用已有配置
    pub fn with_settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 添加服务定义
    pub fn with_service(mut self, service: ServiceSettings) -> Self {
        self.settings.services.push(service);
        self
    }

    /// 添加模块
    pub fn with_module<M: Module + 'static>(mut self, module: M) -> Self {
        debug!("添加模块: {}", module.name());
        self.modules.push(Box::new(module));
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self
    }

    /// 构建管理器
    pub fn build(self) -> InfrastructureResult<Manager> {
        self.settings.validate()?;

        // 只有在明确配置了日志时才初始化日志
        let logging_config = match self.logging_config {
            Some(config) => Some(config),
            None if self.settings.logging.enabled => {
                Some(LoggingConfig::from_settings(&self.settings.logging)?)
            }
            None => None,
        };
        if let Some(config) = logging_config {
            config.init()?;
        }

        info!("开始构建容器");
        let options = ManagerOptions {
            resolution: self.settings.resolution.clone(),
        };
        let mut manager = Manager::with_options(self.introspector, options);

        for module in &self.modules {
            manager.register_module(module.as_ref())?;
        }

        for service in &self.settings.services {
            service.apply(&mut manager)?;
        }

        info!(
            "容器构建完成，模块 {} 个，服务定义 {} 个",
            self.modules.len(),
            self.settings.services.len()
        );
        Ok(manager)
    }
}
