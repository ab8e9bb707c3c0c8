//! 容器管理器
//!
//! [`Manager`] 是容器唯一的入口：按需描述类型、登记接口实现、构建实例并执行构造后动作。
//! 描述符缓存、实例缓存和类型形状缓存都归单个管理器所有，没有进程级全局状态。
//!
//! 循环处理：
//!
//! - 描述期父类型/接口成环：返回 [`DependencyError::CyclicDefinition`]
//! - 构造参数自动装配遇到正在描述的类型（或其父类型/接口正在描述）：按名称延迟绑定，构建时若仍成环则返回
//!   [`DependencyError::CircularDependency`]
//! - 动作参数引用共享类型自身：构造完成后实例即已登记，直接复用该实例

use crate::action::{Action, ActionDescriptor};
use crate::cache::{CacheEntry, DescriptorCache};
use crate::descriptor::{Descriptor, ServiceDescriptor};
use crate::module::Module;
use depend_common::{
    ActionMap, ActionParams, DependencyError, DependencyResult, MethodSignature, ParamMap,
    ParamValue, ResolutionState, TypeKey, TypeShape,
};
use di_abstractions::{
    Argument, Arguments, Instance, Invocation, ResolveContext, ResolveOptions, TypeIntrospector,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// 管理器选项
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerOptions {
    /// 解析选项
    pub resolution: ResolveOptions,
}

/// 容器管理器
pub struct Manager {
    /// 类型内省器
    introspector: Arc<dyn TypeIntrospector>,
    /// 规范描述符
    descriptors: DescriptorCache,
    /// 接口名（或其他别名）→ 实现类型的描述符
    aliases: HashMap<TypeKey, Descriptor>,
    /// 类型形状缓存
    shapes: HashMap<TypeKey, TypeShape>,
    /// 已构建的实例，按规范键存放
    instances: HashMap<TypeKey, Instance>,
    /// 正在描述的类型
    describing: Vec<String>,
    /// 正在构建的类型
    context: ResolveContext,
    options: ManagerOptions,
}

impl Manager {
    /// 使用默认选项创建管理器
    pub fn new(introspector: impl TypeIntrospector + 'static) -> Self {
        Self::with_options(Arc::new(introspector), ManagerOptions::default())
    }

    /// 使用共享的内省器和指定选项创建管理器
    pub fn with_options(introspector: Arc<dyn TypeIntrospector>, options: ManagerOptions) -> Self {
        Self {
            introspector,
            descriptors: DescriptorCache::new(),
            aliases: HashMap::new(),
            shapes: HashMap::new(),
            instances: HashMap::new(),
            describing: Vec::new(),
            context: ResolveContext::new(options.resolution.clone()),
            options,
        }
    }

    /// 类型内省器
    pub fn introspector(&self) -> &Arc<dyn TypeIntrospector> {
        &self.introspector
    }

    /// 管理器选项
    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    /// 描述类型
    pub fn describe(&mut self, name: &str) -> DependencyResult<Descriptor> {
        self.describe_with(name, ParamMap::new(), ActionMap::new(), None)
    }

    /// 描述类型并叠加构造参数与动作
    ///
    /// 给出 `implementation` 时描述实现类型，并让 `name` 也指向同一个描述符。
    /// 已描述过的类型会被原地修改。
    pub fn describe_with(
        &mut self,
        name: &str,
        params: ParamMap,
        actions: ActionMap,
        implementation: Option<&str>,
    ) -> DependencyResult<Descriptor> {
        let key = TypeKey::new(name);

        if let Some(implementation) = implementation {
            let descriptor = self.describe_with(implementation, params, actions, None)?;
            if descriptor.key() != key {
                debug!("别名 {} -> {}", name, descriptor.name());
                self.aliases.insert(key, descriptor.clone());
            }
            return Ok(descriptor);
        }

        if let Some(descriptor) = self.aliases.get(&key).cloned() {
            self.apply(&descriptor, params, actions)?;
            return Ok(descriptor);
        }

        self.describe_canonical(name, params, actions)
    }

    /// 登记接口的实现类型
    pub fn implement(
        &mut self,
        interface_name: &str,
        class_name: &str,
        actions: ActionMap,
    ) -> DependencyResult<Descriptor> {
        if !self.introspector.implements(class_name, interface_name)? {
            return Err(DependencyError::ContractViolation {
                interface_name: interface_name.to_string(),
                class_name: class_name.to_string(),
            });
        }

        info!("登记实现: {} -> {}", interface_name, class_name);
        self.describe_with(interface_name, ParamMap::new(), actions, Some(class_name))
    }

    /// 为类型上已有的方法创建独立的方法描述符
    pub fn action(
        &mut self,
        class_name: &str,
        method_name: &str,
        params: impl Into<ActionParams>,
    ) -> DependencyResult<ActionDescriptor> {
        let shape = self.shape(class_name)?;
        let signature = self
            .introspector
            .method_signature(&shape.name, method_name)?
            .ok_or_else(|| DependencyError::MethodNotFound {
                type_name: shape.name.clone(),
                method: method_name.to_string(),
            })?;

        let mut descriptor = self.synthesize(&signature)?;
        descriptor.set_params(params.into().into_param_map());
        Ok(descriptor)
    }

    /// 在描述符上添加或替换动作
    ///
    /// 方法签名可以查到时按签名生成动作，否则按字面量动作记录，调用时再决定是否跳过。
    pub fn set_action(
        &mut self,
        descriptor: &Descriptor,
        method: &str,
        params: impl Into<ActionParams>,
    ) -> DependencyResult<()> {
        let params = params.into().into_param_map();
        let type_name = descriptor.name();

        let action = match self.introspector.method_signature(&type_name, method)? {
            Some(signature) => {
                let mut action = self.synthesize(&signature)?;
                action.set_params(params);
                Action::Descriptor(action)
            }
            None => {
                debug!("{} 未声明方法 {}，按字面量动作记录", type_name, method);
                Action::literal(method, params)
            }
        };

        descriptor.insert_action(method, action);
        Ok(())
    }

    /// 批量设置动作
    pub fn set_actions(&mut self, descriptor: &Descriptor, actions: ActionMap) -> DependencyResult<()> {
        for (method, params) in actions {
            self.set_action(descriptor, &method, params)?;
        }
        Ok(())
    }

    /// 获取实例
    pub fn get(&mut self, name: &str) -> DependencyResult<Instance> {
        self.get_with(name, ParamMap::new())
    }

    /// 获取实例，并用给定参数覆盖本次构造的参数
    ///
    /// 覆盖参数只影响本次构造，不写回描述符；共享实例已存在时直接返回，覆盖参数不生效。
    pub fn get_with(&mut self, name: &str, overrides: ParamMap) -> DependencyResult<Instance> {
        let descriptor = self.lookup(name)?;
        let key = descriptor.key();

        if let Some(existing) = self.instances.get(&key).cloned() {
            if descriptor.is_shared() {
                trace!("复用共享实例: {}", descriptor.name());
                return Ok(existing);
            }
            if descriptor.is_cloneable() {
                trace!("复制原型实例: {}", descriptor.name());
                return self.introspector.duplicate(&existing);
            }
        }

        if !descriptor.is_instantiable() {
            return Err(DependencyError::not_instantiable(descriptor.name()));
        }

        self.context.push_type(&key, &descriptor.name())?;
        let built = self.build(&descriptor, overrides);
        self.context.pop_type();
        built
    }

    /// 登记一个预先构建好的实例
    pub fn set(&mut self, name: &str, instance: Instance) -> DependencyResult<&mut Self> {
        let descriptor = self.lookup(name)?;
        debug!("登记实例: {}", descriptor.name());
        self.instances.insert(descriptor.key(), instance);
        Ok(self)
    }

    /// 将混合了字面量和服务引用的参数解析为调用参数
    pub fn resolve_params<I>(&mut self, context: &str, params: I) -> DependencyResult<Arguments>
    where
        I: IntoIterator<Item = (Option<String>, ParamValue)>,
    {
        let mut arguments = Arguments::new(context);
        for (name, value) in params {
            let argument = match value {
                ParamValue::Literal(literal) => Argument::Literal(literal),
                ParamValue::Service(reference) => Argument::Instance(self.get(reference.name())?),
            };
            arguments.push(name, argument);
        }
        Ok(arguments)
    }

    /// 注册模块
    pub fn register_module(&mut self, module: &dyn Module) -> DependencyResult<&mut Self> {
        info!("注册模块: {}", module.name());
        module.register(self)?;
        Ok(self)
    }

    /// 查找已描述的描述符（包括别名），不触发描述
    pub fn descriptor(&self, name: &str) -> Option<Descriptor> {
        let key = TypeKey::new(name);
        self.aliases
            .get(&key)
            .cloned()
            .or_else(|| self.descriptors.descriptor(&key))
    }

    /// 是否已有登记的实例
    pub fn has_instance(&self, name: &str) -> bool {
        let key = self
            .descriptor(name)
            .map(|d| d.key())
            .unwrap_or_else(|| TypeKey::new(name));
        self.instances.contains_key(&key)
    }

    /// 类型键当前所处的解析状态
    pub fn state(&self, name: &str) -> ResolutionState {
        let key = self
            .descriptor(name)
            .map(|d| d.key())
            .unwrap_or_else(|| TypeKey::new(name));

        if self.instances.contains_key(&key) {
            ResolutionState::InstanceReady
        } else if self.descriptors.descriptor(&key).is_some() {
            ResolutionState::DescriptorCached
        } else {
            ResolutionState::Unresolved
        }
    }

    /// 已就绪的描述符数量（不含别名）
    pub fn describe_count(&self) -> usize {
        self.descriptors.ready_count()
    }

    fn lookup(&mut self, name: &str) -> DependencyResult<Descriptor> {
        match self.descriptor(name) {
            Some(descriptor) => Ok(descriptor),
            None => self.describe(name),
        }
    }

    fn describe_canonical(
        &mut self,
        name: &str,
        params: ParamMap,
        actions: ActionMap,
    ) -> DependencyResult<Descriptor> {
        let key = TypeKey::new(name);

        match self.descriptors.lookup(&key) {
            Some(CacheEntry::Ready(descriptor)) => {
                let descriptor = descriptor.clone();
                trace!("描述符缓存命中: {}", name);
                self.apply(&descriptor, params, actions)?;
                return Ok(descriptor);
            }
            Some(CacheEntry::InProgress) => {
                return Err(DependencyError::CyclicDefinition {
                    chain: self
                        .describing
                        .iter()
                        .map(String::as_str)
                        .chain(std::iter::once(name))
                        .collect::<Vec<_>>()
                        .join(" -> "),
                });
            }
            None => {}
        }

        let shape = self.shape(name)?;
        self.descriptors.get(&key);
        self.describing.push(shape.name.clone());

        let built = self.build_descriptor(&key, &shape, params, actions);

        self.describing.pop();
        if built.is_err() {
            self.descriptors.remove(&key);
        }
        built
    }

    fn build_descriptor(
        &mut self,
        key: &TypeKey,
        shape: &TypeShape,
        params: ParamMap,
        actions: ActionMap,
    ) -> DependencyResult<Descriptor> {
        let parent = match &shape.parent {
            Some(parent) => Some(self.describe_canonical(parent, ParamMap::new(), ActionMap::new())?),
            None => None,
        };

        let mut interfaces = Vec::with_capacity(shape.interfaces.len());
        for interface in &shape.interfaces {
            interfaces.push(self.describe_canonical(interface, ParamMap::new(), ActionMap::new())?);
        }

        let constructor = match &shape.constructor {
            Some(signature) => Some(self.synthesize(signature)?),
            None => None,
        };

        let descriptor = ServiceDescriptor::new(&shape.name, shape.kind)
            .with_parent(parent)
            .with_interfaces(interfaces)
            .with_constructor(constructor)
            .into_handle();

        self.apply(&descriptor, params, actions)?;
        *self.descriptors.get(key) = CacheEntry::Ready(descriptor.clone());

        debug!("描述类型: {} ({:?})", shape.name, shape.kind);
        Ok(descriptor)
    }

    fn apply(&mut self, descriptor: &Descriptor, params: ParamMap, actions: ActionMap) -> DependencyResult<()> {
        descriptor.set_params(params);
        self.set_actions(descriptor, actions)
    }

    fn shape(&mut self, name: &str) -> DependencyResult<TypeShape> {
        let key = TypeKey::new(name);
        if let Some(shape) = self.shapes.get(&key) {
            return Ok(shape.clone());
        }

        let shape = self.introspector.describe_type(name)?;
        self.shapes.insert(key, shape.clone());
        Ok(shape)
    }

    /// 由方法签名生成方法描述符，参数取默认值、自动装配引用或 null
    fn synthesize(&mut self, signature: &MethodSignature) -> DependencyResult<ActionDescriptor> {
        let mut parameters = Vec::with_capacity(signature.parameters.len());

        for parameter in &signature.parameters {
            let value = match (&parameter.default, &parameter.type_hint) {
                (Some(default), _) => ParamValue::Literal(default.clone()),
                (None, Some(hint)) if self.introspector.has_type(hint) => self.autowire(hint)?,
                _ => ParamValue::null(),
            };
            parameters.push((parameter.name.clone(), value));
        }

        Ok(ActionDescriptor::new(signature.name.clone(), parameters))
    }

    /// 自动装配构造参数
    ///
    /// 类型自身或其任一父类型/接口正在描述时只记录名称，留到构建时再描述。
    fn autowire(&mut self, type_name: &str) -> DependencyResult<ParamValue> {
        if self.reaches_describing(type_name)? {
            trace!("延迟绑定: {}", type_name);
        } else {
            self.describe_canonical(type_name, ParamMap::new(), ActionMap::new())?;
        }
        Ok(ParamValue::service(type_name))
    }

    fn reaches_describing(&mut self, type_name: &str) -> DependencyResult<bool> {
        let mut visited = HashSet::new();
        let mut pending = vec![type_name.to_string()];

        while let Some(name) = pending.pop() {
            let key = TypeKey::new(&name);
            if self.descriptors.is_in_progress(&key) {
                return Ok(true);
            }
            if !visited.insert(key.clone()) || self.descriptors.has(&key) {
                continue;
            }

            let shape = self.shape(&name)?;
            pending.extend(shape.parent);
            pending.extend(shape.interfaces);
        }

        Ok(false)
    }

    fn build(&mut self, descriptor: &Descriptor, overrides: ParamMap) -> DependencyResult<Instance> {
        let name = descriptor.name();
        let key = descriptor.key();

        let params = match descriptor.effective_constructor() {
            Some(mut constructor) => {
                constructor.set_params(overrides);
                constructor.params()
            }
            None => {
                if !overrides.is_empty() {
                    warn!("{} 没有构造函数，忽略覆盖参数", name);
                }
                Vec::new()
            }
        };

        let arguments = self.resolve_params(
            &format!("{name}::new"),
            params.into_iter().map(|(param, value)| (Some(param), value)),
        )?;
        let instance = self.introspector.instantiate(&name, &arguments)?;
        self.instances.insert(key.clone(), instance.clone());

        if let Err(error) = self.run_actions(descriptor, &instance) {
            self.instances.remove(&key);
            return Err(error);
        }

        debug!("构建实例: {} ({:?})", name, descriptor.lifetime());
        Ok(instance)
    }

    fn run_actions(&mut self, descriptor: &Descriptor, instance: &Instance) -> DependencyResult<()> {
        for (_, action) in descriptor.actions() {
            let method = action.method().to_string();
            let context = format!("{}::{}", instance.type_name(), method);
            let arguments = self.resolve_params(&context, action.arguments())?;

            match self.introspector.invoke(instance, &method, &arguments)? {
                Invocation::Invoked => trace!("执行动作: {}", context),
                Invocation::MethodMissing => debug!("跳过动作: {} 不存在", context),
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("descriptors", &self.descriptors.ready_count())
            .field("aliases", &self.aliases.len())
            .field("instances", &self.instances.len())
            .field("options", &self.options)
            .finish()
    }
}
