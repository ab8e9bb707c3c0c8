//! 方法描述符与动作
//!
//! [`ActionDescriptor`] 记录一个可调用对象（构造函数或方法）的参数顺序和当前参数值；
//! [`Action`] 是构造完成后在实例上执行的一次方法调用。

use depend_common::{ParamKey, ParamMap, ParamValue};
use std::collections::HashMap;

/// 方法描述符
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    /// 方法名称
    name: String,
    /// 参数名称，按位置排列
    parameter_order: Vec<String>,
    /// 参数名称 → 当前值
    parameter_values: HashMap<String, ParamValue>,
}

impl ActionDescriptor {
    /// 用初始参数值创建方法描述符
    pub fn new(name: impl Into<String>, parameters: Vec<(String, ParamValue)>) -> Self {
        let mut parameter_order = Vec::with_capacity(parameters.len());
        let mut parameter_values = HashMap::with_capacity(parameters.len());

        for (param_name, value) in parameters {
            parameter_order.push(param_name.clone());
            parameter_values.insert(param_name, value);
        }

        Self {
            name: name.into(),
            parameter_order,
            parameter_values,
        }
    }

    /// 方法名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 按位置排列的参数名称
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_order
    }

    /// 参数数量
    pub fn arity(&self) -> usize {
        self.parameter_order.len()
    }

    /// 按名称获取当前参数值
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.parameter_values.get(name)
    }

    /// 按位置顺序获取全部参数
    pub fn params(&self) -> Vec<(String, ParamValue)> {
        self.parameter_order
            .iter()
            .map(|name| {
                let value = self
                    .parameter_values
                    .get(name)
                    .cloned()
                    .unwrap_or_else(ParamValue::null);
                (name.clone(), value)
            })
            .collect()
    }

    /// 把名称或位置解析为参数名，未知键返回 `None`
    pub fn resolve_key(&self, key: &ParamKey) -> Option<&str> {
        match key {
            ParamKey::Index(index) => self.parameter_order.get(*index).map(String::as_str),
            ParamKey::Name(name) => self
                .parameter_order
                .iter()
                .find(|known| *known == name)
                .map(String::as_str),
        }
    }

    /// 按名称或位置设置参数，未知键被忽略
    pub fn set_param(&mut self, key: impl Into<ParamKey>, value: impl Into<ParamValue>) -> &mut Self {
        let key = key.into();
        if let Some(name) = self.resolve_key(&key).map(str::to_string) {
            self.parameter_values.insert(name, value.into());
        }
        self
    }

    /// 批量设置参数
    pub fn set_params(&mut self, params: ParamMap) -> &mut Self {
        for (key, value) in params {
            self.set_param(key, value);
        }
        self
    }
}

/// 构造后动作
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// 基于方法签名的动作，参数按签名顺序传递
    Descriptor(ActionDescriptor),
    /// 没有可用签名的动作，参数按声明顺序原样传递
    Literal {
        /// 方法名称
        method: String,
        /// 参数
        params: ParamMap,
    },
}

impl Action {
    /// 创建字面量动作
    pub fn literal(method: impl Into<String>, params: ParamMap) -> Self {
        Self::Literal {
            method: method.into(),
            params,
        }
    }

    /// 要调用的方法名称
    pub fn method(&self) -> &str {
        match self {
            Self::Descriptor(descriptor) => descriptor.name(),
            Self::Literal { method, .. } => method,
        }
    }

    /// 按调用顺序排列的参数（名称已知时附带名称）
    pub fn arguments(&self) -> Vec<(Option<String>, ParamValue)> {
        match self {
            Self::Descriptor(descriptor) => descriptor
                .params()
                .into_iter()
                .map(|(name, value)| (Some(name), value))
                .collect(),
            Self::Literal { params, .. } => {
                let mut indexed: Vec<(usize, ParamValue)> = Vec::new();
                let mut named: Vec<(Option<String>, ParamValue)> = Vec::new();
                for (key, value) in params.iter() {
                    match key {
                        ParamKey::Index(index) => indexed.push((*index, value.clone())),
                        ParamKey::Name(name) => named.push((Some(name.clone()), value.clone())),
                    }
                }
                indexed.sort_by_key(|(index, _)| *index);
                indexed
                    .into_iter()
                    .map(|(_, value)| (None, value))
                    .chain(named)
                    .collect()
            }
        }
    }
}

impl From<ActionDescriptor> for Action {
    fn from(descriptor: ActionDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}
