//! 类型内省器抽象接口
//!
//! 内省器是引擎与宿主类型信息之间的唯一边界：它回答一个类型长什么样，
//! 并负责按名称构造对象、调用方法和复制对象。

use crate::arguments::Arguments;
use crate::instance::Instance;
use depend_common::{DependencyResult, MethodSignature, TypeKey, TypeShape};
use std::collections::{HashSet, VecDeque};

/// 方法调用结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// 方法已调用
    Invoked,
    /// 实例上不存在该方法
    MethodMissing,
}

/// 类型内省器 trait
pub trait TypeIntrospector: Send + Sync {
    /// 获取类型形状
    ///
    /// 名称既不是具体类型也不是抽象类型/接口时返回
    /// [`DependencyError::TypeNotFound`](depend_common::DependencyError::TypeNotFound)。
    fn describe_type(&self, name: &str) -> DependencyResult<TypeShape>;

    /// 名称是否指向一个可描述的类型
    fn has_type(&self, name: &str) -> bool;

    /// 查找类型上的方法签名（包括继承自父类型和接口的声明）
    fn method_signature(&self, type_name: &str, method: &str) -> DependencyResult<Option<MethodSignature>>;

    /// 使用位置参数构造实例
    fn instantiate(&self, name: &str, args: &Arguments) -> DependencyResult<Instance>;

    /// 在实例上调用方法
    fn invoke(&self, instance: &Instance, method: &str, args: &Arguments) -> DependencyResult<Invocation>;

    /// 复制实例，副本与原实例不共享可变状态
    fn duplicate(&self, instance: &Instance) -> DependencyResult<Instance>;

    /// 类型是否（直接或经由父类型/接口继承）声明实现了接口
    fn implements(&self, class_name: &str, interface_name: &str) -> DependencyResult<bool> {
        let target = TypeKey::new(interface_name);
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([class_name.to_string()]);

        while let Some(name) = queue.pop_front() {
            if !visited.insert(TypeKey::new(&name)) {
                continue;
            }

            let shape = self.describe_type(&name)?;
            if shape.interfaces.iter().any(|i| TypeKey::new(i) == target) {
                return Ok(true);
            }

            queue.extend(shape.parent);
            queue.extend(shape.interfaces);
        }

        Ok(false)
    }
}
