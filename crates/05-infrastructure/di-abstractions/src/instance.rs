//! 实例句柄
//!
//! 容器构建出的对象统一以 [`Instance`] 的形式流转。克隆句柄只复制引用，
//! 两个句柄指向同一个对象；需要独立副本时由内省器复制。

use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 容器管理的对象类型
pub type Object = dyn Any + Send + Sync;

/// 实例句柄
#[derive(Clone)]
pub struct Instance {
    /// 构建该实例的类型名称
    type_name: Arc<str>,
    /// 对象本体
    object: Arc<RwLock<Box<Object>>>,
}

impl Instance {
    /// 包装一个新对象
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<Arc<str>>, value: T) -> Self {
        Self::from_boxed(type_name, Box::new(value))
    }

    /// 包装一个已装箱的对象
    pub fn from_boxed(type_name: impl Into<Arc<str>>, object: Box<Object>) -> Self {
        Self {
            type_name: type_name.into(),
            object: Arc::new(RwLock::new(object)),
        }
    }

    /// 构建该实例的类型名称
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// 两个句柄是否指向同一个对象
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.object, &other.object)
    }

    /// 对象是否为指定的 Rust 类型
    pub fn is<T: Any>(&self) -> bool {
        let guard = self.object.read();
        (**guard).is::<T>()
    }

    /// 以只读方式访问对象，类型不匹配时返回 `None`
    pub fn read<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.object.read();
        (**guard).downcast_ref::<T>().map(f)
    }

    /// 以可写方式访问对象，类型不匹配时返回 `None`
    pub fn write<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.object.write();
        (**guard).downcast_mut::<T>().map(f)
    }

    /// 获取对象的一个克隆值
    pub fn cloned<T: Any + Clone>(&self) -> Option<T> {
        self.read(T::clone)
    }

    /// 以类型擦除的方式访问对象
    pub fn with_object<R>(&self, f: impl FnOnce(&Object) -> R) -> R {
        let guard = self.object.read();
        f(&**guard)
    }

    /// 以类型擦除的方式修改对象
    pub fn with_object_mut<R>(&self, f: impl FnOnce(&mut Object) -> R) -> R {
        let mut guard = self.object.write();
        f(&mut **guard)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .field("object", &Arc::as_ptr(&self.object))
            .finish()
    }
}
