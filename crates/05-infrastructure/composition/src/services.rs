//! 声明式服务定义

use depend_common::{ActionMap, DependencyResult, ParamMap};
use di_impl::{Descriptor, Manager};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// 单个服务的配置
///
/// 参数值为 JSON，`{"$service": "Name"}` 形式的对象表示对另一个服务的引用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// 服务名称（类型名或接口名）
    pub name: String,
    /// 实现类型
    #[serde(default)]
    pub implementation: Option<String>,
    /// 构造参数，对象或数组
    #[serde(default)]
    pub params: Value,
    /// 构造后动作，方法名 → 参数
    #[serde(default)]
    pub actions: Value,
    /// 共享标志
    #[serde(default)]
    pub shared: Option<bool>,
    /// 可克隆标志
    #[serde(default)]
    pub cloneable: Option<bool>,
}

impl ServiceSettings {
    /// 创建只有名称的服务定义
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            implementation: None,
            params: Value::Null,
            actions: Value::Null,
            shared: None,
            cloneable: None,
        }
    }

    /// 构造参数
    pub fn param_map(&self) -> DependencyResult<ParamMap> {
        ParamMap::from_json(self.params.clone(), &format!("{}.params", self.name))
    }

    /// 构造后动作
    pub fn action_map(&self) -> DependencyResult<ActionMap> {
        ActionMap::from_json(self.actions.clone(), &format!("{}.actions", self.name))
    }

    /// 应用到管理器
    ///
    /// 服务名本身是已知类型时，实现类型必须声明实现它；否则只作为别名登记。
    pub fn apply(&self, manager: &mut Manager) -> DependencyResult<Descriptor> {
        let params = self.param_map()?;
        let actions = self.action_map()?;

        let descriptor = match self.implementation.as_deref() {
            Some(implementation) if manager.introspector().has_type(&self.name) => {
                let descriptor = manager.implement(&self.name, implementation, actions)?;
                descriptor.set_params(params);
                descriptor
            }
            Some(implementation) => {
                manager.describe_with(&self.name, params, actions, Some(implementation))?
            }
            None => manager.describe_with(&self.name, params, actions, None)?,
        };

        if let Some(shared) = self.shared {
            descriptor.set_shared(shared);
        }
        if let Some(cloneable) = self.cloneable {
            descriptor.set_cloneable(cloneable);
        }

        debug!("应用服务定义: {} ({:?})", self.name, descriptor.lifetime());
        Ok(descriptor)
    }
}
