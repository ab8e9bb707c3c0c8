//! 元数据定义
//!
//! 提供类型、构造函数和方法签名的元数据信息

use serde::{Deserialize, Serialize};
use std::fmt;

/// 规范化后的类型键
///
/// 同一类型的不同写法（大小写、首尾空白、首尾分隔符）总是映射到同一个键。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(String);

impl TypeKey {
    /// 从类型名称创建规范化的键
    pub fn new(name: &str) -> Self {
        let trimmed = name
            .trim()
            .trim_matches(|c: char| c == '\\' || c == ':' || c.is_whitespace());
        Self(trimmed.replace('\\', "::").to_lowercase())
    }

    /// 获取键的字符串形式
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// 参数信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// 参数名称
    pub name: String,
    /// 声明的类型名称（可被自动装配的类型）
    pub type_hint: Option<String>,
    /// 声明的默认值
    pub default: Option<serde_json::Value>,
}

impl ParameterInfo {
    /// 创建新的参数信息
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
            default: None,
        }
    }

    /// 设置参数类型
    pub fn typed(mut self, type_name: impl Into<String>) -> Self {
        self.type_hint = Some(type_name.into());
        self
    }

    /// 设置默认值
    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// 方法签名
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodSignature {
    /// 方法名称
    pub name: String,
    /// 按位置排列的参数
    pub parameters: Vec<ParameterInfo>,
}

impl MethodSignature {
    /// 创建新的方法签名
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterInfo>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// 参数数量
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// 按名称查找参数
    pub fn parameter(&self, name: &str) -> Option<&ParameterInfo> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// 具体类型
    Class,
    /// 抽象类型
    AbstractClass,
    /// 接口
    Interface,
}

/// 类型形状
///
/// 由类型内省器产生，描述构造一个类型所需要的全部信息。
#[derive(Debug, Clone, PartialEq)]
pub struct TypeShape {
    /// 规范类型名称
    pub name: String,
    /// 类型种类
    pub kind: TypeKind,
    /// 构造函数签名
    pub constructor: Option<MethodSignature>,
    /// 父类型名称
    pub parent: Option<String>,
    /// 声明实现的接口名称
    pub interfaces: Vec<String>,
}

impl TypeShape {
    /// 是否可以实例化
    pub fn is_instantiable(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// 是否声明实现了指定接口
    pub fn declares_interface(&self, interface: &str) -> bool {
        let key = TypeKey::new(interface);
        self.interfaces.iter().any(|i| TypeKey::new(i) == key)
    }
}
