use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult, ensure_not_blank};
use crate::identifier::Identifier;

use super::event_context::EventContext;
use super::event_payload::EventPayload;

/// 领域事件：不可变的事件元数据 + 载荷
///
/// - `I` 为聚合标识类型；默认 `Uuid` 即非强类型形式，强类型标识通过
///   [`Identifier::to_uuid`] 投影出通用聚合标识，便于统一存储与传输。
/// - 相等与哈希仅依据 `event_id`。
/// - 反序列化与构造执行相同的校验（聚合标识、聚合类型、用户、关联ID）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "StoredDomainEvent<P, I>",
    bound(deserialize = "P: EventPayload, I: Identifier")
)]
pub struct DomainEvent<P, I = Uuid> {
    event_id: Uuid,
    occurred_on: DateTime<Utc>,
    aggregate_id: I,
    aggregate_type: String,
    user_id: Option<Uuid>,
    correlation_id: String,
    payload: P,
}

impl<P, I> DomainEvent<P, I>
where
    P: EventPayload,
    I: Identifier,
{
    pub fn new(aggregate_id: I, aggregate_type: impl Into<String>, payload: P) -> DomainResult<Self> {
        Self::with_context(aggregate_id, aggregate_type, payload, EventContext::default())
    }

    /// 携带业务上下文（用户、关联ID）创建事件
    pub fn with_context(
        aggregate_id: I,
        aggregate_type: impl Into<String>,
        payload: P,
        context: EventContext,
    ) -> DomainResult<Self> {
        let aggregate_type = aggregate_type.into();
        ensure_aggregate(&aggregate_id, &aggregate_type)?;

        let mut event = Self {
            event_id: Uuid::new_v4(),
            occurred_on: Utc::now(),
            aggregate_id,
            aggregate_type,
            user_id: None,
            correlation_id: Uuid::new_v4().to_string(),
            payload,
        };
        if let Some(user_id) = context.user_id() {
            event.set_user_id(user_id)?;
        }
        if let Some(correlation_id) = context.correlation_id() {
            event.set_correlation_id(correlation_id)?;
        }
        Ok(event)
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn occurred_on(&self) -> DateTime<Utc> {
        self.occurred_on
    }

    pub fn event_name(&self) -> &str {
        self.payload.event_name()
    }

    pub fn event_version(&self) -> u32 {
        self.payload.event_version()
    }

    pub fn aggregate_id(&self) -> &I {
        &self.aggregate_id
    }

    /// 聚合标识的通用投影
    pub fn universal_aggregate_id(&self) -> Uuid {
        self.aggregate_id.to_uuid()
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    pub fn set_user_id(&mut self, user_id: Uuid) -> DomainResult<()> {
        ensure_user_id(user_id)?;
        self.user_id = Some(user_id);
        Ok(())
    }

    pub fn set_correlation_id(&mut self, correlation_id: impl Into<String>) -> DomainResult<()> {
        let correlation_id = correlation_id.into();
        ensure_not_blank("correlation_id", &correlation_id)?;
        self.correlation_id = correlation_id;
        Ok(())
    }
}

fn ensure_aggregate<I: Identifier>(aggregate_id: &I, aggregate_type: &str) -> DomainResult<()> {
    if aggregate_id.is_transient() {
        return Err(DomainError::invalid_argument(
            "aggregate_id",
            "aggregate identifier cannot be empty or default",
        ));
    }
    ensure_not_blank("aggregate_type", aggregate_type)
}

fn ensure_user_id(user_id: Uuid) -> DomainResult<()> {
    if user_id.is_nil() {
        return Err(DomainError::invalid_argument(
            "user_id",
            "user identifier cannot be empty",
        ));
    }
    Ok(())
}

/// 存储形式：字段与 `DomainEvent` 一一对应，仅用于反序列化
#[derive(Deserialize)]
struct StoredDomainEvent<P, I> {
    event_id: Uuid,
    occurred_on: DateTime<Utc>,
    aggregate_id: I,
    aggregate_type: String,
    user_id: Option<Uuid>,
    correlation_id: String,
    payload: P,
}

impl<P, I> TryFrom<StoredDomainEvent<P, I>> for DomainEvent<P, I>
where
    P: EventPayload,
    I: Identifier,
{
    type Error = DomainError;

    fn try_from(stored: StoredDomainEvent<P, I>) -> DomainResult<Self> {
        ensure_aggregate(&stored.aggregate_id, &stored.aggregate_type)?;
        if let Some(user_id) = stored.user_id {
            ensure_user_id(user_id)?;
        }
        ensure_not_blank("correlation_id", &stored.correlation_id)?;
        if stored.event_id.is_nil() {
            return Err(DomainError::invalid_argument(
                "event_id",
                "event identifier cannot be empty",
            ));
        }

        Ok(Self {
            event_id: stored.event_id,
            occurred_on: stored.occurred_on,
            aggregate_id: stored.aggregate_id,
            aggregate_type: stored.aggregate_type,
            user_id: stored.user_id,
            correlation_id: stored.correlation_id,
            payload: stored.payload,
        })
    }
}

impl<P, I> PartialEq for DomainEvent<P, I> {
    fn eq(&self, other: &Self) -> bool {
        self.event_id == other.event_id
    }
}

impl<P, I> Eq for DomainEvent<P, I> {}

impl<P, I> Hash for DomainEvent<P, I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.event_id.hash(state);
    }
}

impl<P, I> fmt::Display for DomainEvent<P, I>
where
    P: EventPayload,
    I: Identifier,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [EventId: {}, AggregateId: {}, OccurredOn: {} UTC]",
            self.event_name(),
            self.event_id,
            self.aggregate_id,
            self.occurred_on.format("%Y-%m-%d %H:%M:%S")
        )
    }
}
