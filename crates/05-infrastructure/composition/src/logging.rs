//! 日志初始化

use crate::settings::LoggingSettings;
use depend_common::{ConfigResult, InfrastructureError, InfrastructureResult};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 由配置文件中的日志配置生成
    pub fn from_settings(settings: &LoggingSettings) -> ConfigResult<Self> {
        Ok(Self {
            level: settings.level()?,
            json_format: settings.json,
            ..Self::default()
        })
    }

    /// 由 `RUST_LOG` 生成过滤器，未设置时使用配置的级别
    pub fn env_filter(&self) -> EnvFilter {
        self.filter_builder().from_env_lossy()
    }

    /// 由给定指令生成过滤器，指令为空时使用配置的级别
    pub fn env_filter_from(&self, directives: &str) -> EnvFilter {
        self.filter_builder().parse_lossy(directives)
    }

    fn filter_builder(&self) -> tracing_subscriber::filter::Builder {
        EnvFilter::builder().with_default_directive(LevelFilter::from_level(self.level).into())
    }

    /// 初始化全局日志订阅者
    ///
    /// 已经存在全局订阅者时返回 [`InfrastructureError::BootstrapFailed`]。
    pub fn init(&self) -> InfrastructureResult<()> {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}
