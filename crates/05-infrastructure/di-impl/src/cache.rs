//! 描述符缓存
//!
//! 规范化类型键 → 描述符。正在描述中的类型以 [`CacheEntry::InProgress`] 占位，
//! 递归描述时据此区分"尚未完成"与"已就绪"，避免把未完成的占位当作有效描述符使用。

use crate::descriptor::Descriptor;
use depend_common::TypeKey;
use std::collections::HashMap;

/// 缓存条目
#[derive(Debug, Clone)]
pub enum CacheEntry {
    /// 描述进行中的占位
    InProgress,
    /// 已就绪的描述符
    Ready(Descriptor),
}

impl CacheEntry {
    /// 获取已就绪的描述符
    pub fn descriptor(&self) -> Option<&Descriptor> {
        match self {
            Self::Ready(descriptor) => Some(descriptor),
            Self::InProgress => None,
        }
    }

    /// 是否为占位
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// 描述符缓存
#[derive(Debug, Default)]
pub struct DescriptorCache {
    descriptors: HashMap<TypeKey, CacheEntry>,
}

impl DescriptorCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取条目；不存在时先插入占位，再返回指向该条目的可变引用
    pub fn get(&mut self, key: &TypeKey) -> &mut CacheEntry {
        self.descriptors
            .entry(key.clone())
            .or_insert(CacheEntry::InProgress)
    }

    /// 只读查找条目，不插入占位
    pub fn lookup(&self, key: &TypeKey) -> Option<&CacheEntry> {
        self.descriptors.get(key)
    }

    /// 获取已就绪的描述符
    pub fn descriptor(&self, key: &TypeKey) -> Option<Descriptor> {
        self.lookup(key).and_then(CacheEntry::descriptor).cloned()
    }

    /// 写入（或覆盖）描述符
    pub fn set(&mut self, key: &TypeKey, descriptor: Descriptor) -> &mut Self {
        self.descriptors
            .insert(key.clone(), CacheEntry::Ready(descriptor));
        self
    }

    /// 是否存在条目（包括占位）
    pub fn has(&self, key: &TypeKey) -> bool {
        self.descriptors.contains_key(key)
    }

    /// 条目是否为占位
    pub fn is_in_progress(&self, key: &TypeKey) -> bool {
        self.lookup(key).is_some_and(CacheEntry::is_in_progress)
    }

    /// 移除条目
    pub fn remove(&mut self, key: &TypeKey) -> Option<CacheEntry> {
        self.descriptors.remove(key)
    }

    /// 条目数量（包括占位）
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// 已就绪描述符数量
    pub fn ready_count(&self) -> usize {
        self.descriptors
            .values()
            .filter(|entry| !entry.is_in_progress())
            .count()
    }
}
