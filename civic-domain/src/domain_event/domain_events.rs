use std::ops::Deref;
use std::slice::Iter;
use std::vec::IntoIter;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::identifier::Identifier;

use super::event::DomainEvent;
use super::event_payload::EventPayload;

/// 聚合内暂存的领域事件，按产生顺序排列（允许重复）
///
/// 只能通过 `&mut` 写入；聚合根只对外暴露 `&DomainEvents`，
/// 因此外部调用方只能读取，不能向缓冲区追加或删除事件。
#[derive(Debug, Clone)]
pub struct DomainEvents<P, I = Uuid> {
    events: Vec<DomainEvent<P, I>>,
}

impl<P, I> DomainEvents<P, I> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// 获取事件列表的不可变引用
    pub fn events(&self) -> &[DomainEvent<P, I>] {
        &self.events
    }

    /// 获取事件数量
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// 判断是否为空
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 迭代事件引用（不消费缓冲区）
    pub fn iter(&self) -> Iter<'_, DomainEvent<P, I>> {
        self.events.iter()
    }
}

impl<P, I> DomainEvents<P, I>
where
    P: EventPayload,
    I: Identifier,
{
    /// 追加一个事件
    pub fn raise(&mut self, event: DomainEvent<P, I>) {
        trace!(
            event_id = %event.event_id(),
            event_name = event.event_name(),
            aggregate_id = %event.aggregate_id(),
            "domain event staged"
        );
        self.events.push(event);
    }

    /// 清空缓冲区（空缓冲区上调用同样安全）
    pub fn clear(&mut self) {
        if !self.events.is_empty() {
            debug!(count = self.events.len(), "domain events cleared");
        }
        self.events.clear();
    }

    /// 取出全部事件并清空缓冲区
    pub fn take(&mut self) -> Vec<DomainEvent<P, I>> {
        std::mem::take(&mut self.events)
    }
}

impl<P, I> Default for DomainEvents<P, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, I> IntoIterator for DomainEvents<P, I> {
    type Item = DomainEvent<P, I>;
    type IntoIter = IntoIter<DomainEvent<P, I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a, P, I> IntoIterator for &'a DomainEvents<P, I> {
    type Item = &'a DomainEvent<P, I>;
    type IntoIter = Iter<'a, DomainEvent<P, I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl<P, I> Deref for DomainEvents<P, I> {
    type Target = [DomainEvent<P, I>];

    fn deref(&self) -> &Self::Target {
        &self.events
    }
}
