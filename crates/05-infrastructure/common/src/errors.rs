//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("类型不存在: {type_name}")]
    TypeNotFound { type_name: String },

    #[error("类型 {class_name} 没有实现接口 {interface_name}")]
    ContractViolation {
        interface_name: String,
        class_name: String,
    },

    #[error("类型不可实例化: {type_name}")]
    NotInstantiable { type_name: String },

    #[error("参数形状无效: {context}, 期望 {expected}, 实际 {actual}")]
    InvalidParameterShape {
        context: String,
        expected: String,
        actual: String,
    },

    #[error("方法不存在: {type_name}::{method}")]
    MethodNotFound { type_name: String, method: String },

    #[error("类型定义存在循环: {chain}")]
    CyclicDefinition { chain: String },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("解析深度超过限制 {max_depth}: {type_name}")]
    ResolutionDepthExceeded { type_name: String, max_depth: usize },

    #[error("实例类型不匹配: 期望 {expected}, 实际 {actual}")]
    InstanceTypeMismatch { expected: String, actual: String },

    #[error("调用失败: {type_name}::{method}, 原因: {source}")]
    InvocationFailed {
        type_name: String,
        method: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("类型注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },
}

impl DependencyError {
    /// 创建类型不存在错误
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        Self::TypeNotFound {
            type_name: type_name.into(),
        }
    }

    /// 创建不可实例化错误
    pub fn not_instantiable(type_name: impl Into<String>) -> Self {
        Self::NotInstantiable {
            type_name: type_name.into(),
        }
    }

    /// 创建参数形状错误
    pub fn invalid_shape(
        context: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidParameterShape {
            context: context.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// 创建调用失败错误
    pub fn invocation_failed(
        type_name: impl Into<String>,
        method: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::InvocationFailed {
            type_name: type_name.into(),
            method: method.into(),
            source: source.into(),
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
