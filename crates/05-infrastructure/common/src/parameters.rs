//! 参数值定义
//!
//! 描述符中的参数值要么是字面量，要么是对另一个类型描述符的引用（表示注入该类型构建出的实例）。

use crate::errors::{DependencyError, DependencyResult};
use crate::metadata::TypeKey;
use serde_json::Value;
use std::fmt;

/// 配置中表示服务引用的对象键，例如 `{"$service": "Engine"}`
pub const SERVICE_REF_KEY: &str = "$service";

/// 对另一个类型描述符的引用
///
/// 只记录类型名称，不持有描述符本身；解析时通过名称重新查找。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceRef {
    name: String,
}

impl ServiceRef {
    /// 创建新的服务引用
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 被引用的类型名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 被引用类型的规范化键
    pub fn key(&self) -> TypeKey {
        TypeKey::new(&self.name)
    }
}

impl fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)
    }
}

/// 参数值
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// 字面量（包括 null）
    Literal(Value),
    /// 服务引用
    Service(ServiceRef),
}

impl ParamValue {
    /// null 字面量
    pub fn null() -> Self {
        Self::Literal(Value::Null)
    }

    /// 创建服务引用
    pub fn service(name: impl Into<String>) -> Self {
        Self::Service(ServiceRef::new(name))
    }

    /// 是否为 null 字面量
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Literal(Value::Null))
    }

    /// 获取服务引用
    pub fn as_service(&self) -> Option<&ServiceRef> {
        match self {
            Self::Service(service) => Some(service),
            Self::Literal(_) => None,
        }
    }

    /// 获取字面量
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Service(_) => None,
        }
    }

    /// 从 JSON 值转换，`{"$service": "Name"}` 被识别为服务引用
    pub fn from_json(value: Value) -> Self {
        if let Value::Object(map) = &value {
            if map.len() == 1 {
                if let Some(Value::String(name)) = map.get(SERVICE_REF_KEY) {
                    return Self::service(name.clone());
                }
            }
        }
        Self::Literal(value)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<ServiceRef> for ParamValue {
    fn from(service: ServiceRef) -> Self {
        Self::Service(service)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Literal(Value::String(value.to_string()))
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Literal(Value::String(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Literal(Value::Bool(value))
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Literal(Value::from(value))
    }
}

/// 参数键：名称或位置
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// 按名称
    Name(String),
    /// 按位置
    Index(usize),
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ParamKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for ParamKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// 有序参数映射
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamMap {
    entries: Vec<(ParamKey, ParamValue)>,
}

impl ParamMap {
    /// 创建空映射
    pub fn new() -> Self {
        Self::default()
    }

    /// 从位置参数列表创建
    pub fn positional(values: impl IntoIterator<Item = ParamValue>) -> Self {
        Self {
            entries: values
                .into_iter()
                .enumerate()
                .map(|(index, value)| (ParamKey::Index(index), value))
                .collect(),
        }
    }

    /// 添加参数（构建器风格）
    pub fn with(mut self, key: impl Into<ParamKey>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// 插入参数，已存在的键被覆盖
    pub fn insert(&mut self, key: impl Into<ParamKey>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// 按键获取参数
    pub fn get(&self, key: &ParamKey) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// 遍历参数
    pub fn iter(&self) -> impl Iterator<Item = &(ParamKey, ParamValue)> {
        self.entries.iter()
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 从 JSON 值转换
    ///
    /// 对象按名称映射，数组按位置映射，null 视为空映射；其余形状返回
    /// [`DependencyError::InvalidParameterShape`]。
    pub fn from_json(value: Value, context: &str) -> DependencyResult<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self {
                entries: map
                    .into_iter()
                    .map(|(k, v)| (ParamKey::Name(k), ParamValue::from_json(v)))
                    .collect(),
            }),
            Value::Array(items) => Ok(Self::positional(
                items.into_iter().map(ParamValue::from_json),
            )),
            other => Err(DependencyError::invalid_shape(
                context,
                "对象或数组",
                json_type_name(&other),
            )),
        }
    }
}

impl IntoIterator for ParamMap {
    type Item = (ParamKey, ParamValue);
    type IntoIter = std::vec::IntoIter<(ParamKey, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ParamMap
where
    K: Into<ParamKey>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// 动作参数
///
/// 单个标量参数会被规整为只有一个元素的位置参数列表。
#[derive(Debug, Clone, PartialEq)]
pub enum ActionParams {
    /// 单个参数
    Single(ParamValue),
    /// 位置参数列表
    List(Vec<ParamValue>),
    /// 参数映射
    Map(ParamMap),
}

impl ActionParams {
    /// 规整为参数映射
    pub fn into_param_map(self) -> ParamMap {
        match self {
            Self::Single(value) => ParamMap::positional([value]),
            Self::List(values) => ParamMap::positional(values),
            Self::Map(map) => map,
        }
    }

    /// 从 JSON 值转换，标量视为单个参数
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Map(ParamMap::new()),
            Value::Array(items) => Self::List(items.into_iter().map(ParamValue::from_json).collect()),
            Value::Object(map) if !map.contains_key(SERVICE_REF_KEY) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (ParamKey::Name(k), ParamValue::from_json(v)))
                    .collect(),
            ),
            other => Self::Single(ParamValue::from_json(other)),
        }
    }
}

impl Default for ActionParams {
    fn default() -> Self {
        Self::Map(ParamMap::new())
    }
}

impl From<()> for ActionParams {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<ParamValue> for ActionParams {
    fn from(value: ParamValue) -> Self {
        Self::Single(value)
    }
}

impl From<ServiceRef> for ActionParams {
    fn from(service: ServiceRef) -> Self {
        Self::Single(ParamValue::Service(service))
    }
}

impl From<Vec<ParamValue>> for ActionParams {
    fn from(values: Vec<ParamValue>) -> Self {
        Self::List(values)
    }
}

impl From<ParamMap> for ActionParams {
    fn from(map: ParamMap) -> Self {
        Self::Map(map)
    }
}

/// 有序的动作声明：方法名 → 参数
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionMap {
    entries: Vec<(String, ActionParams)>,
}

impl ActionMap {
    /// 创建空的动作映射
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加动作（构建器风格）
    pub fn with(mut self, method: impl Into<String>, params: impl Into<ActionParams>) -> Self {
        let method = method.into();
        let params = params.into();
        match self.entries.iter_mut().find(|(m, _)| *m == method) {
            Some(entry) => entry.1 = params,
            None => self.entries.push((method, params)),
        }
        self
    }

    /// 动作数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 从 JSON 对象转换
    pub fn from_json(value: Value, context: &str) -> DependencyResult<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(map
                .into_iter()
                .fold(Self::new(), |actions, (method, params)| {
                    actions.with(method, ActionParams::from_json(params))
                })),
            other => Err(DependencyError::invalid_shape(
                context,
                "对象",
                json_type_name(&other),
            )),
        }
    }
}

impl IntoIterator for ActionMap {
    type Item = (String, ActionParams);
    type IntoIter = std::vec::IntoIter<(String, ActionParams)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// JSON 值的类型名称，用于错误信息
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "布尔值",
        Value::Number(_) => "数字",
        Value::String(_) => "字符串",
        Value::Array(_) => "数组",
        Value::Object(_) => "对象",
    }
}
