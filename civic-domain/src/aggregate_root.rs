//! 聚合根（Aggregate Root）
//!
//! 聚合根是一致性边界，也是唯一被允许创建并暂存领域事件的对象：
//! - 业务方法在完成自身校验与状态变更之后调用 `raise_event`；
//! - 工作单元结束后，由外部分发器读取并清空缓冲区（`take_domain_events`
//!   或 `domain_events` + `clear_domain_events`）；
//! - 聚合自身的业务逻辑从不清空缓冲区。
//!
//! 缓冲区状态：Empty → Staged → Empty，随每个工作单元循环。
//!
use tracing::debug;
use uuid::Uuid;

use crate::domain_event::{DomainEvent, DomainEvents, EventContext, EventPayload, EventRecord};
use crate::entity::Entity;
use crate::error::DomainResult;
use crate::value_object::Version;

/// 聚合根接口
///
/// 通常由 `#[aggregate_root(id = .., event = .., aggregate_type = "..")]` 宏实现：
/// 宏注入私有的事件缓冲区字段，并生成仅在聚合所在模块可见的 `raise_event`。
pub trait AggregateRoot: Entity {
    /// 聚合类型名（写入事件的 `aggregate_type`）
    const AGGREGATE_TYPE: &'static str;

    /// 该聚合产生的领域事件载荷
    type Event: EventPayload;

    /// 暂存事件的只读视图（保持产生顺序）
    fn domain_events(&self) -> &DomainEvents<Self::Event, Self::Id>;

    /// 清空暂存事件
    fn clear_domain_events(&mut self);

    /// 取出暂存事件并清空缓冲区
    fn take_domain_events(&mut self) -> Vec<DomainEvent<Self::Event, Self::Id>>;

    fn has_uncommitted_events(&self) -> bool {
        !self.domain_events().is_empty()
    }

    fn uncommitted_event_count(&self) -> usize {
        self.domain_events().len()
    }

    /// 为本聚合构造事件（不会暂存）
    fn new_event(&self, payload: Self::Event) -> DomainResult<DomainEvent<Self::Event, Self::Id>> {
        DomainEvent::new(self.id().clone(), Self::AGGREGATE_TYPE, payload)
    }

    /// 携带业务上下文为本聚合构造事件（不会暂存）
    fn new_event_with(
        &self,
        payload: Self::Event,
        context: EventContext,
    ) -> DomainResult<DomainEvent<Self::Event, Self::Id>> {
        DomainEvent::with_context(self.id().clone(), Self::AGGREGATE_TYPE, payload, context)
    }
}

/// 与标识/事件类型无关的聚合视图，供需要统一处理所有聚合的基础设施使用
pub trait AnyAggregateRoot: Send + Sync {
    fn aggregate_id(&self) -> Uuid;

    fn aggregate_type(&self) -> &'static str;

    fn aggregate_version(&self) -> Version;

    fn uncommitted(&self) -> Vec<&dyn EventRecord>;

    /// 取出暂存事件并清空缓冲区
    fn drain_events(&mut self) -> Vec<Box<dyn EventRecord>>;
}

impl<A> AnyAggregateRoot for A
where
    A: AggregateRoot,
{
    fn aggregate_id(&self) -> Uuid {
        self.universal_id()
    }

    fn aggregate_type(&self) -> &'static str {
        A::AGGREGATE_TYPE
    }

    fn aggregate_version(&self) -> Version {
        self.version()
    }

    fn uncommitted(&self) -> Vec<&dyn EventRecord> {
        self.domain_events()
            .iter()
            .map(|e| e as &dyn EventRecord)
            .collect()
    }

    fn drain_events(&mut self) -> Vec<Box<dyn EventRecord>> {
        let events = self.take_domain_events();
        debug!(
            aggregate_type = A::AGGREGATE_TYPE,
            aggregate_id = %self.id(),
            count = events.len(),
            "domain events drained"
        );
        events
            .into_iter()
            .map(|e| Box::new(e) as Box<dyn EventRecord>)
            .collect()
    }
}

#[cfg(all(test, feature = "ulid"))]
mod tests {
    use super::*;
    use crate::entity::EntityMeta;
    use crate::error::{DomainError, ensure_not_blank};
    use civic_macros::{aggregate_root, domain_event, entity_id};

    #[entity_id]
    struct PetitionId(ulid::Ulid);

    #[domain_event]
    enum PetitionEvent {
        #[event(event_name = "petition.opened")]
        Opened { title: String },
        #[event(event_name = "petition.signed")]
        Signed { signer: Uuid },
    }

    #[aggregate_root(id = PetitionId, event = PetitionEvent, aggregate_type = "petition")]
    struct Petition {
        title: String,
        signatures: u32,
    }

    impl Petition {
        fn open(title: &str, actor: Option<Uuid>) -> DomainResult<Self> {
            ensure_not_blank("title", title)?;
            let mut petition = Self {
                meta: EntityMeta::new(actor),
                events: DomainEvents::new(),
                title: title.trim().to_string(),
                signatures: 0,
            };
            petition.record(PetitionEvent::Opened {
                title: petition.title.clone(),
            })?;
            Ok(petition)
        }

        fn load(id: PetitionId, title: &str) -> DomainResult<Self> {
            Ok(Self {
                meta: EntityMeta::with_id(id, None)?,
                events: DomainEvents::new(),
                title: title.to_string(),
                signatures: 0,
            })
        }

        fn sign(&mut self, signer: Uuid) -> DomainResult<()> {
            if self.is_deleted() {
                return Err(DomainError::invalid_state("petition is closed"));
            }
            self.signatures += 1;
            self.mark_updated(Some(signer));
            let event = self.new_event_with(
                PetitionEvent::Signed { signer },
                EventContext::builder().user_id(signer).build(),
            )?;
            self.raise_event(event);
            Ok(())
        }
    }

    #[test]
    fn fresh_aggregate_gets_unique_id() {
        let a = Petition::open("Electoral reform", None).unwrap();
        let b = Petition::open("Electoral reform", None).unwrap();
        assert!(!a.is_transient());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.uncommitted_event_count(), 1);
    }

    #[test]
    fn supplied_default_id_is_rejected() {
        let err = Petition::load(PetitionId::default(), "x").unwrap_err();
        assert!(err.is_invalid_argument());

        let loaded = Petition::load(PetitionId::new(ulid::Ulid::new()), "x").unwrap();
        assert!(!loaded.has_uncommitted_events());
        assert_eq!(loaded.uncommitted_event_count(), 0);
    }

    #[test]
    fn events_keep_raise_order() {
        let mut p = Petition::open("Lower voting age", None).unwrap();
        let signers: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for s in &signers {
            p.sign(*s).unwrap();
        }

        assert_eq!(p.uncommitted_event_count(), 4);
        let names: Vec<&str> = p.domain_events().iter().map(|e| e.event_name()).collect();
        assert_eq!(
            names,
            ["petition.opened", "petition.signed", "petition.signed", "petition.signed"]
        );
        for (event, signer) in p.domain_events()[1..].iter().zip(&signers) {
            assert_eq!(event.payload(), &PetitionEvent::Signed { signer: *signer });
            assert_eq!(event.user_id(), Some(*signer));
            assert_eq!(event.aggregate_type(), "petition");
            assert_eq!(event.aggregate_id(), p.id());
        }
        assert_eq!(p.version().value(), 4);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut p = Petition::open("Duplicate", None).unwrap();
        let event = p.domain_events()[0].clone();
        p.raise_event(event.clone());
        assert_eq!(p.uncommitted_event_count(), 2);
        assert_eq!(p.domain_events()[0], p.domain_events()[1]);
    }

    #[test]
    fn clear_empties_buffer_and_is_repeatable() {
        let mut p = Petition::open("Clear", None).unwrap();
        p.clear_domain_events();
        assert!(!p.has_uncommitted_events());
        p.clear_domain_events();
        assert_eq!(p.uncommitted_event_count(), 0);

        p.sign(Uuid::new_v4()).unwrap();
        assert_eq!(p.uncommitted_event_count(), 1);
        let taken = p.take_domain_events();
        assert_eq!(taken.len(), 1);
        assert!(!p.has_uncommitted_events());
    }

    #[test]
    fn typed_id_projects_to_universal_id() {
        let p = Petition::open("Projection", None).unwrap();
        let universal = p.universal_id();
        let raw: ulid::Ulid = p.id().clone().into();
        assert_eq!(universal.as_u128(), u128::from(raw));
        assert_eq!(p.domain_events()[0].universal_aggregate_id(), universal);
    }

    #[test]
    fn any_aggregate_drains_type_erased_records() {
        let mut p = Petition::open("Erased", None).unwrap();
        p.sign(Uuid::new_v4()).unwrap();

        let erased: &mut dyn AnyAggregateRoot = &mut p;
        assert_eq!(erased.aggregate_type(), "petition");
        assert_eq!(erased.aggregate_version().value(), 2);
        assert_eq!(erased.uncommitted().len(), 2);

        let drained = erased.drain_events();
        assert_eq!(drained.len(), 2);
        assert!(drained.iter().all(|r| r.aggregate_type() == "petition"));
        assert_eq!(drained[0].event_name(), "petition.opened");
        assert!(erased.uncommitted().is_empty());
        assert_eq!(drained[1].aggregate_id(), p.universal_id());
    }

    #[test]
    fn soft_delete_does_not_touch_buffer() {
        let mut p = Petition::open("Delete", None).unwrap();
        assert!(p.mark_deleted(None));
        assert_eq!(p.uncommitted_event_count(), 1);
        assert!(p.sign(Uuid::new_v4()).is_err());
    }
}
