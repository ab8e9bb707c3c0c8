//! 调用参数
//!
//! 构造函数与动作方法接收的已解析位置参数。服务引用在到达这里之前已经被替换为实例。

use crate::instance::Instance;
use depend_common::{json_type_name, DependencyError, DependencyResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// 已解析的单个参数
#[derive(Debug, Clone)]
pub enum Argument {
    /// 字面量
    Literal(Value),
    /// 注入的实例
    Instance(Instance),
}

impl Argument {
    /// 是否为 null 字面量
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Literal(Value::Null))
    }

    fn shape_name(&self) -> &'static str {
        match self {
            Self::Literal(value) => json_type_name(value),
            Self::Instance(_) => "实例",
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<Instance> for Argument {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

/// 位置参数列表
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    /// 调用上下文（类型名::方法名），用于错误信息
    context: String,
    /// 参数名（如果已知）与参数值
    entries: Vec<(Option<String>, Argument)>,
}

impl Arguments {
    /// 创建空参数列表
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            entries: Vec::new(),
        }
    }

    /// 追加参数
    pub fn push(&mut self, name: Option<String>, argument: impl Into<Argument>) {
        self.entries.push((name, argument.into()));
    }

    /// 追加参数（构建器风格）
    pub fn with(mut self, argument: impl Into<Argument>) -> Self {
        self.push(None, argument);
        self
    }

    /// 调用上下文
    pub fn context(&self) -> &str {
        &self.context
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按位置获取参数
    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.entries.get(index).map(|(_, argument)| argument)
    }

    /// 按名称获取参数
    pub fn by_name(&self, name: &str) -> Option<&Argument> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_deref() == Some(name))
            .map(|(_, argument)| argument)
    }

    /// 遍历参数
    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.entries.iter().map(|(_, argument)| argument)
    }

    /// 将指定位置的字面量反序列化为目标类型
    pub fn literal<T: DeserializeOwned>(&self, index: usize) -> DependencyResult<T> {
        match self.get(index) {
            Some(Argument::Literal(value)) => {
                serde_json::from_value(value.clone()).map_err(|_| {
                    DependencyError::invalid_shape(
                        self.describe(index),
                        std::any::type_name::<T>(),
                        json_type_name(value),
                    )
                })
            }
            Some(other) => Err(DependencyError::invalid_shape(
                self.describe(index),
                "字面量",
                other.shape_name(),
            )),
            None => Err(self.missing(index, "字面量")),
        }
    }

    /// 读取字面量，缺失或为 null 时使用默认值
    pub fn literal_or<T: DeserializeOwned>(&self, index: usize, default: T) -> DependencyResult<T> {
        match self.get(index) {
            None => Ok(default),
            Some(argument) if argument.is_null() => Ok(default),
            Some(_) => self.literal(index),
        }
    }

    /// 获取指定位置注入的实例
    pub fn instance(&self, index: usize) -> DependencyResult<Instance> {
        match self.get(index) {
            Some(Argument::Instance(instance)) => Ok(instance.clone()),
            Some(other) => Err(DependencyError::invalid_shape(
                self.describe(index),
                "实例",
                other.shape_name(),
            )),
            None => Err(self.missing(index, "实例")),
        }
    }

    /// 获取可选实例，缺失或为 null 时返回 `None`
    pub fn optional_instance(&self, index: usize) -> DependencyResult<Option<Instance>> {
        match self.get(index) {
            None => Ok(None),
            Some(argument) if argument.is_null() => Ok(None),
            Some(_) => self.instance(index).map(Some),
        }
    }

    fn describe(&self, index: usize) -> String {
        match self.entries.get(index).and_then(|(name, _)| name.as_deref()) {
            Some(name) => format!("{} 参数 {}", self.context, name),
            None => format!("{} 参数 #{}", self.context, index),
        }
    }

    fn missing(&self, index: usize, expected: &str) -> DependencyError {
        DependencyError::invalid_shape(self.describe(index), expected, "缺失")
    }
}
