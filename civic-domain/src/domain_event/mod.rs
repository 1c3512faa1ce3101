//! 领域事件（Domain Event）与事件缓冲区
//!
//! 定义事件载荷需要实现的最小接口（`EventPayload`）、携带元数据的不可变事件
//! `DomainEvent`、聚合内部暂存事件的 `DomainEvents`，以及供外部分发器统一
//! 读取的类型擦除视图 `EventRecord`。
//!
//! 事件只是一次工作单元内的内存暂存区，不用于重放重建状态。

mod domain_events;
mod event;
mod event_context;
mod event_payload;
mod event_record;

pub use domain_events::DomainEvents;
pub use event::DomainEvent;
pub use event_context::EventContext;
pub use event_payload::EventPayload;
pub use event_record::EventRecord;
