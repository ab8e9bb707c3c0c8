//! 类型注册表
//!
//! Rust 没有运行时反射，[`TypeRegistry`] 以显式注册的方式提供 [`TypeIntrospector`]：
//! 每个类型登记自己的构造函数签名与工厂闭包、父类型、接口、方法以及可选的复制实现。

use depend_common::{
    DependencyError, DependencyResult, MethodSignature, ParameterInfo, TypeKey, TypeKind,
    TypeShape,
};
use di_abstractions::{Arguments, Instance, Invocation, Object, TypeIntrospector};
use std::any::Any;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// 工厂函数类型
pub type FactoryFn = Arc<dyn Fn(&Arguments) -> DependencyResult<Box<Object>> + Send + Sync>;

/// 方法体类型
pub type MethodFn = Arc<dyn Fn(&mut Object, &Arguments) -> DependencyResult<()> + Send + Sync>;

/// 复制函数类型
pub type DuplicateFn = Arc<dyn Fn(&Object) -> Option<Box<Object>> + Send + Sync>;

/// 方法定义
#[derive(Clone)]
struct MethodDefinition {
    /// 方法签名
    signature: MethodSignature,
    /// 方法体，只有声明没有实现时为 `None`
    body: Option<MethodFn>,
}

/// 类型定义
#[derive(Clone)]
pub struct TypeDefinition {
    name: String,
    kind: TypeKind,
    parent: Option<String>,
    interfaces: Vec<String>,
    constructor: Option<MethodSignature>,
    factory: Option<FactoryFn>,
    methods: Vec<MethodDefinition>,
    duplicate: Option<DuplicateFn>,
}

impl TypeDefinition {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            interfaces: Vec::new(),
            constructor: None,
            factory: None,
            methods: Vec::new(),
            duplicate: None,
        }
    }

    /// 定义具体类型
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// 定义抽象类型
    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::AbstractClass)
    }

    /// 定义接口
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    /// 类型名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 设置父类型
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// 声明实现的接口
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// 声明构造函数签名及其工厂
    pub fn constructor<T, F>(mut self, parameters: Vec<ParameterInfo>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> DependencyResult<T> + Send + Sync + 'static,
    {
        self.constructor = Some(MethodSignature::new("new", parameters));
        self.factory = Some(Arc::new(move |args: &Arguments| {
            factory(args).map(|value| Box::new(value) as Box<Object>)
        }));
        self
    }

    /// 只提供工厂，不声明自己的构造函数
    ///
    /// 工厂接收从父类型继承来的构造参数。
    pub fn factory<T, F>(mut self, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> DependencyResult<T> + Send + Sync + 'static,
    {
        self.constructor = None;
        self.factory = Some(Arc::new(move |args: &Arguments| {
            factory(args).map(|value| Box::new(value) as Box<Object>)
        }));
        self
    }

    /// 定义带实现的方法
    pub fn method<T, F>(mut self, name: impl Into<String>, parameters: Vec<ParameterInfo>, body: F) -> Self
    where
        T: Any,
        F: Fn(&mut T, &Arguments) -> DependencyResult<()> + Send + Sync + 'static,
    {
        let body: MethodFn = Arc::new(move |object: &mut Object, args: &Arguments| {
            let target = object.downcast_mut::<T>().ok_or_else(|| {
                DependencyError::InstanceTypeMismatch {
                    expected: std::any::type_name::<T>().to_string(),
                    actual: args.context().to_string(),
                }
            })?;
            body(target, args)
        });
        self.push_method(MethodDefinition {
            signature: MethodSignature::new(name, parameters),
            body: Some(body),
        });
        self
    }

    /// 只声明方法签名（用于接口和抽象类型）
    pub fn declare_method(mut self, name: impl Into<String>, parameters: Vec<ParameterInfo>) -> Self {
        self.push_method(MethodDefinition {
            signature: MethodSignature::new(name, parameters),
            body: None,
        });
        self
    }

    /// 允许复制该类型的实例
    pub fn cloneable<T: Any + Clone + Send + Sync>(mut self) -> Self {
        self.duplicate = Some(Arc::new(|object: &Object| {
            object
                .downcast_ref::<T>()
                .map(|value| Box::new(value.clone()) as Box<Object>)
        }));
        self
    }

    fn push_method(&mut self, method: MethodDefinition) {
        match self
            .methods
            .iter_mut()
            .find(|m| m.signature.name == method.signature.name)
        {
            Some(existing) => *existing = method,
            None => self.methods.push(method),
        }
    }

    fn find_method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.signature.name == name)
    }

    fn shape(&self) -> TypeShape {
        TypeShape {
            name: self.name.clone(),
            kind: self.kind,
            constructor: self.constructor.clone(),
            parent: self.parent.clone(),
            interfaces: self.interfaces.clone(),
        }
    }
}

impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("interfaces", &self.interfaces)
            .field("constructor", &self.constructor)
            .field(
                "methods",
                &self
                    .methods
                    .iter()
                    .map(|m| m.signature.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("cloneable", &self.duplicate.is_some())
            .finish()
    }
}

/// 类型注册表
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<TypeKey, TypeDefinition>,
}

impl TypeRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类型定义，同名定义被替换
    pub fn register(&mut self, definition: TypeDefinition) -> DependencyResult<&mut Self> {
        let key = TypeKey::new(&definition.name);
        if key.as_str().is_empty() {
            return Err(DependencyError::RegistrationError {
                type_name: definition.name,
                message: "类型名称不能为空".to_string(),
            });
        }

        if definition.kind == TypeKind::Class && definition.factory.is_none() {
            warn!("具体类型 {} 没有提供工厂，将无法实例化", definition.name);
        }

        debug!("注册类型: {} ({:?})", definition.name, definition.kind);
        if self.types.insert(key, definition).is_some() {
            debug!("类型定义已被替换");
        }
        Ok(self)
    }

    /// 注册类型定义（构建器风格）
    pub fn with(mut self, definition: TypeDefinition) -> DependencyResult<Self> {
        self.register(definition)?;
        Ok(self)
    }

    /// 已注册的类型数量
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn definition(&self, name: &str) -> DependencyResult<&TypeDefinition> {
        self.types
            .get(&TypeKey::new(name))
            .ok_or_else(|| DependencyError::type_not_found(name))
    }

    /// 沿父类型链查找（包括自身）
    fn ancestors<'a>(&'a self, name: &str) -> Vec<&'a TypeDefinition> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = self.types.get(&TypeKey::new(name));

        while let Some(definition) = current {
            if !visited.insert(TypeKey::new(&definition.name)) {
                break;
            }
            chain.push(definition);
            current = definition
                .parent
                .as_deref()
                .and_then(|parent| self.types.get(&TypeKey::new(parent)));
        }
        chain
    }
}

impl TypeIntrospector for TypeRegistry {
    fn describe_type(&self, name: &str) -> DependencyResult<TypeShape> {
        self.definition(name).map(TypeDefinition::shape)
    }

    fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(&TypeKey::new(name))
    }

    fn method_signature(&self, type_name: &str, method: &str) -> DependencyResult<Option<MethodSignature>> {
        self.definition(type_name)?;

        let chain = self.ancestors(type_name);
        if let Some(found) = chain.iter().find_map(|d| d.find_method(method)) {
            return Ok(Some(found.signature.clone()));
        }

        let mut visited = HashSet::new();
        let mut queue: VecDeque<&str> = chain
            .iter()
            .flat_map(|d| d.interfaces.iter().map(String::as_str))
            .collect();

        while let Some(interface) = queue.pop_front() {
            let Some(definition) = self.types.get(&TypeKey::new(interface)) else {
                continue;
            };
            if !visited.insert(TypeKey::new(interface)) {
                continue;
            }
            if let Some(found) = definition.find_method(method) {
                return Ok(Some(found.signature.clone()));
            }
            queue.extend(definition.interfaces.iter().map(String::as_str));
        }

        Ok(None)
    }

    fn instantiate(&self, name: &str, args: &Arguments) -> DependencyResult<Instance> {
        let definition = self.definition(name)?;
        if definition.kind != TypeKind::Class {
            return Err(DependencyError::not_instantiable(&definition.name));
        }

        let factory = definition
            .factory
            .as_ref()
            .ok_or_else(|| DependencyError::not_instantiable(&definition.name))?;

        debug!("实例化类型: {} ({} 个参数)", definition.name, args.len());
        let object = factory(args)?;
        Ok(Instance::from_boxed(definition.name.as_str(), object))
    }

    fn invoke(&self, instance: &Instance, method: &str, args: &Arguments) -> DependencyResult<Invocation> {
        let body = self
            .ancestors(instance.type_name())
            .into_iter()
            .find_map(|d| d.find_method(method).and_then(|m| m.body.clone()));

        match body {
            Some(body) => {
                instance
                    .with_object_mut(|object| body(object, args))
                    .map_err(|source| {
                        DependencyError::invocation_failed(instance.type_name(), method, source)
                    })?;
                Ok(Invocation::Invoked)
            }
            None => Ok(Invocation::MethodMissing),
        }
    }

    fn duplicate(&self, instance: &Instance) -> DependencyResult<Instance> {
        let duplicate = self
            .ancestors(instance.type_name())
            .into_iter()
            .find_map(|d| d.duplicate.clone())
            .ok_or_else(|| DependencyError::RegistrationError {
                type_name: instance.type_name().to_string(),
                message: "类型没有提供复制实现".to_string(),
            })?;

        let copy = instance
            .with_object(|object| duplicate(object))
            .ok_or_else(|| DependencyError::InstanceTypeMismatch {
                expected: instance.type_name().to_string(),
                actual: "未知对象".to_string(),
            })?;

        Ok(Instance::from_boxed(instance.type_name(), copy))
    }
}
