use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::fmt;
use uuid::Uuid;

use crate::error::DomainResult;
use crate::identifier::Identifier;

use super::event::DomainEvent;
use super::event_payload::EventPayload;

/// 与载荷类型无关的事件只读视图
///
/// 供需要统一处理不同聚合事件的外部分发器使用（例如写入 outbox）。
pub trait EventRecord: fmt::Debug + Send + Sync {
    fn event_id(&self) -> Uuid;

    fn event_name(&self) -> &str;

    fn event_version(&self) -> u32;

    fn occurred_on(&self) -> DateTime<Utc>;

    /// 通用聚合标识
    fn aggregate_id(&self) -> Uuid;

    fn aggregate_type(&self) -> &str;

    fn user_id(&self) -> Option<Uuid>;

    fn correlation_id(&self) -> &str;

    /// 将元数据与载荷序列化为 JSON
    fn to_json(&self) -> DomainResult<Value>;
}

impl<P, I> EventRecord for DomainEvent<P, I>
where
    P: EventPayload,
    I: Identifier,
{
    fn event_id(&self) -> Uuid {
        DomainEvent::event_id(self)
    }

    fn event_name(&self) -> &str {
        DomainEvent::event_name(self)
    }

    fn event_version(&self) -> u32 {
        DomainEvent::event_version(self)
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        DomainEvent::occurred_on(self)
    }

    fn aggregate_id(&self) -> Uuid {
        self.universal_aggregate_id()
    }

    fn aggregate_type(&self) -> &str {
        DomainEvent::aggregate_type(self)
    }

    fn user_id(&self) -> Option<Uuid> {
        DomainEvent::user_id(self)
    }

    fn correlation_id(&self) -> &str {
        DomainEvent::correlation_id(self)
    }

    fn to_json(&self) -> DomainResult<Value> {
        let payload = serde_json::to_value(self.payload())?;
        Ok(json!({
            "event_id": DomainEvent::event_id(self),
            "event_name": DomainEvent::event_name(self),
            "event_version": DomainEvent::event_version(self),
            "occurred_on": DomainEvent::occurred_on(self),
            "aggregate_id": self.universal_aggregate_id(),
            "aggregate_type": DomainEvent::aggregate_type(self),
            "user_id": DomainEvent::user_id(self),
            "correlation_id": DomainEvent::correlation_id(self),
            "payload": payload,
        }))
    }
}
