//! 容器配置
//!
//! 配置来源依次为配置文件（TOML/JSON/YAML，按扩展名识别）和 `DEPEND` 前缀的环境变量，
//! 后者覆盖前者。嵌套键用 `__` 分隔，例如 `DEPEND__RESOLUTION__MAX_DEPTH=32`。

use crate::services::ServiceSettings;
use depend_common::{ConfigError, ConfigResult};
use di_abstractions::ResolveOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "DEPEND";

/// 环境变量嵌套分隔符
pub const ENV_SEPARATOR: &str = "__";

/// 容器配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// 解析选项
    pub resolution: ResolveOptions,
    /// 日志配置
    pub logging: LoggingSettings,
    /// 声明式服务定义
    pub services: Vec<ServiceSettings>,
}

impl ContainerSettings {
    /// 从默认位置 `config/depend.*` 和环境变量加载，文件可以不存在
    pub fn load() -> ConfigResult<Self> {
        Self::load_sources(config::File::with_name("config/depend").required(false))
    }

    /// 从指定文件和环境变量加载
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        debug!("加载容器配置: {}", path.display());
        Self::load_sources(config::File::from(path).required(true))
    }

    fn load_sources<S>(file: S) -> ConfigResult<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        let settings: Self = settings.try_deserialize().map_err(|e| {
            error!("配置绑定失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        settings.validate()?;
        debug!("容器配置加载完成，服务定义 {} 个", settings.services.len());
        Ok(settings)
    }

    /// 校验配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.resolution.max_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "resolution.max_depth 必须大于 0".to_string(),
            });
        }

        if let Some(service) = self.services.iter().find(|s| s.name.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                message: format!("服务名称不能为空: {service:?}"),
            });
        }

        self.logging.level()?;
        Ok(())
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 是否由容器初始化日志
    pub enabled: bool,
    /// 日志级别
    pub level: String,
    /// 是否使用 JSON 格式
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingSettings {
    /// 解析日志级别
    pub fn level(&self) -> ConfigResult<tracing::Level> {
        self.level
            .parse()
            .map_err(|_| ConfigError::ValidationError {
                message: format!("无效的日志级别: {}", self.level),
            })
    }
}
