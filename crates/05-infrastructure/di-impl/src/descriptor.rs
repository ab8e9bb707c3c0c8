//! 类型描述符
//!
//! [`ServiceDescriptor`] 记录如何构建并配置一个类型的实例：构造函数签名、父类型、
//! 接口、生命周期标志和构造后动作。描述符以 [`Descriptor`] 句柄共享，
//! 后续的 `describe` 调用会原地修改同一个描述符。
//!
//! 生效值沿继承链计算：
//!
//! - `shared` / `cloneable`：自身标志与父类型生效标志取与，子类型不能放宽父类型的约束
//! - 动作：父类型 → 各接口（按声明顺序）→ 自身，后一层覆盖前一层的同名动作
//! - 构造参数：有自己的构造函数时使用自身参数，否则整体委托给父类型

use crate::action::{Action, ActionDescriptor};
use depend_common::{
    ActionParams, Lifetime, ParamKey, ParamMap, ParamValue, ServiceRef, TypeKey, TypeKind,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// 类型描述符
#[derive(Debug)]
pub struct ServiceDescriptor {
    /// 规范类型名称
    name: String,
    /// 规范化键
    key: TypeKey,
    /// 类型种类
    kind: TypeKind,
    /// 父类型描述符
    parent: Option<Descriptor>,
    /// 接口描述符
    interfaces: Vec<Descriptor>,
    /// 构造函数描述符
    constructor: Option<ActionDescriptor>,
    /// 自身的共享标志
    shared: bool,
    /// 自身的可克隆标志
    cloneable: bool,
    /// 自身声明的动作
    actions: Vec<(String, Action)>,
}

impl ServiceDescriptor {
    /// 创建新的描述符
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        let name = name.into();
        Self {
            key: TypeKey::new(&name),
            name,
            kind,
            parent: None,
            interfaces: Vec::new(),
            constructor: None,
            shared: true,
            cloneable: false,
            actions: Vec::new(),
        }
    }

    /// 设置父类型
    pub fn with_parent(mut self, parent: Option<Descriptor>) -> Self {
        self.parent = parent;
        self
    }

    /// 设置接口
    pub fn with_interfaces(mut self, interfaces: Vec<Descriptor>) -> Self {
        self.interfaces = interfaces;
        self
    }

    /// 设置构造函数
    pub fn with_constructor(mut self, constructor: Option<ActionDescriptor>) -> Self {
        self.constructor = constructor;
        self
    }

    /// 包装为共享句柄
    pub fn into_handle(self) -> Descriptor {
        Descriptor {
            inner: Arc::new(RwLock::new(self)),
        }
    }
}

/// 描述符句柄
///
/// 克隆句柄不复制描述符；所有句柄观察并修改同一个描述符。
#[derive(Clone)]
pub struct Descriptor {
    inner: Arc<RwLock<ServiceDescriptor>>,
}

impl Descriptor {
    /// 规范类型名称
    pub fn name(&self) -> String {
        self.inner.read().name.clone()
    }

    /// 规范化键
    pub fn key(&self) -> TypeKey {
        self.inner.read().key.clone()
    }

    /// 类型种类
    pub fn kind(&self) -> TypeKind {
        self.inner.read().kind
    }

    /// 类型是否可以实例化
    pub fn is_instantiable(&self) -> bool {
        self.kind() == TypeKind::Class
    }

    /// 父类型描述符
    pub fn parent(&self) -> Option<Descriptor> {
        self.inner.read().parent.clone()
    }

    /// 接口描述符
    pub fn interfaces(&self) -> Vec<Descriptor> {
        self.inner.read().interfaces.clone()
    }

    /// 是否有自己的构造函数
    pub fn has_constructor(&self) -> bool {
        self.inner.read().constructor.is_some()
    }

    /// 指向该描述符的服务引用
    pub fn service_ref(&self) -> ServiceRef {
        ServiceRef::new(self.name())
    }

    /// 两个句柄是否指向同一个描述符
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// 设置自身的共享标志
    pub fn set_shared(&self, shared: bool) -> &Self {
        self.inner.write().shared = shared;
        self
    }

    /// 生效的共享标志
    pub fn is_shared(&self) -> bool {
        let (own, parent) = {
            let guard = self.inner.read();
            (guard.shared, guard.parent.clone())
        };
        own && parent.map_or(true, |p| p.is_shared())
    }

    /// 设置自身的可克隆标志
    pub fn set_cloneable(&self, cloneable: bool) -> &Self {
        self.inner.write().cloneable = cloneable;
        self
    }

    /// 生效的可克隆标志
    pub fn is_cloneable(&self) -> bool {
        let (own, parent) = {
            let guard = self.inner.read();
            (guard.cloneable, guard.parent.clone())
        };
        own && parent.map_or(true, |p| p.is_cloneable())
    }

    /// 按生命周期一次设置两个标志
    pub fn set_lifetime(&self, lifetime: Lifetime) -> &Self {
        let mut guard = self.inner.write();
        guard.shared = lifetime.is_shared();
        guard.cloneable = lifetime.is_cloneable();
        drop(guard);
        self
    }

    /// 生效的生命周期
    pub fn lifetime(&self) -> Lifetime {
        Lifetime::from_flags(self.is_shared(), self.is_cloneable())
    }

    /// 设置构造参数
    ///
    /// 没有自己的构造函数时委托给父类型；整条链上都没有构造函数时参数被忽略。
    pub fn set_params(&self, params: ParamMap) -> &Self {
        if params.is_empty() {
            return self;
        }

        let parent = {
            let mut guard = self.inner.write();
            match guard.constructor.as_mut() {
                Some(constructor) => {
                    constructor.set_params(params);
                    return self;
                }
                None => guard.parent.clone(),
            }
        };

        if let Some(parent) = parent {
            parent.set_params(params);
        }
        self
    }

    /// 设置单个构造参数
    pub fn set_param(&self, key: impl Into<ParamKey>, value: impl Into<ParamValue>) -> &Self {
        self.set_params(ParamMap::new().with(key, value))
    }

    /// 生效的构造函数描述符（自身或最近的祖先）
    pub fn effective_constructor(&self) -> Option<ActionDescriptor> {
        let (own, parent) = {
            let guard = self.inner.read();
            (guard.constructor.clone(), guard.parent.clone())
        };
        own.or_else(|| parent.and_then(|p| p.effective_constructor()))
    }

    /// 生效的构造参数，按位置顺序排列
    pub fn params(&self) -> Vec<(String, ParamValue)> {
        self.effective_constructor()
            .map(|constructor| constructor.params())
            .unwrap_or_default()
    }

    /// 添加或替换自身的动作
    pub fn insert_action(&self, name: impl Into<String>, action: impl Into<Action>) -> &Self {
        let name = name.into();
        let action = action.into();
        let mut guard = self.inner.write();
        overlay(&mut guard.actions, name, action);
        drop(guard);
        self
    }

    /// 移除自身的动作
    pub fn remove_action(&self, name: &str) -> Option<Action> {
        let mut guard = self.inner.write();
        let position = guard.actions.iter().position(|(n, _)| n == name)?;
        Some(guard.actions.remove(position).1)
    }

    /// 自身声明的动作
    pub fn own_actions(&self) -> Vec<(String, Action)> {
        self.inner.read().actions.clone()
    }

    /// 生效的动作：父类型 → 接口 → 自身，后者覆盖前者
    pub fn actions(&self) -> Vec<(String, Action)> {
        let (parent, interfaces, own) = {
            let guard = self.inner.read();
            (
                guard.parent.clone(),
                guard.interfaces.clone(),
                guard.actions.clone(),
            )
        };

        let mut merged = Vec::new();
        let layers = parent
            .iter()
            .map(Descriptor::actions)
            .chain(interfaces.iter().map(Descriptor::actions))
            .chain(std::iter::once(own));

        for layer in layers {
            for (name, action) in layer {
                overlay(&mut merged, name, action);
            }
        }
        merged
    }

    /// 按名称查找生效的动作
    pub fn action(&self, name: &str) -> Option<Action> {
        self.actions()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, action)| action)
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.read();
        f.debug_struct("Descriptor")
            .field("name", &guard.name)
            .field("kind", &guard.kind)
            .field("parent", &guard.parent.as_ref().map(Descriptor::name))
            .field("shared", &guard.shared)
            .field("cloneable", &guard.cloneable)
            .field("actions", &guard.actions.len())
            .finish()
    }
}

impl From<&Descriptor> for ParamValue {
    fn from(descriptor: &Descriptor) -> Self {
        Self::Service(descriptor.service_ref())
    }
}

impl From<Descriptor> for ParamValue {
    fn from(descriptor: Descriptor) -> Self {
        Self::from(&descriptor)
    }
}

impl From<&Descriptor> for ActionParams {
    fn from(descriptor: &Descriptor) -> Self {
        Self::Single(ParamValue::from(descriptor))
    }
}

fn overlay(actions: &mut Vec<(String, Action)>, name: String, action: Action) {
    match actions.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = action,
        None => actions.push((name, action)),
    }
}
