use anyhow::Result as AnyResult;
use civic_domain::aggregate_root::{AggregateRoot, AnyAggregateRoot};
use civic_domain::domain_event::{EventContext, EventRecord};
use civic_domain::entity::{Entity, EntityKey, EntityMeta, same_entity};
use civic_domain::error::{DomainError, DomainResult, ensure_not_blank};
use civic_domain::value_object::Version;
use civic_macros::{aggregate_root, domain_event, entity};
use proptest::prelude::*;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[domain_event]
enum BillEvent {
    #[event(event_name = "bill.introduced")]
    Introduced { number: String },
    #[event(event_name = "bill.vote_cast")]
    VoteCast { voter: Uuid, yea: bool },
}

#[aggregate_root(event = BillEvent, aggregate_type = "bill")]
struct Bill {
    number: String,
    yeas: u32,
    nays: u32,
}

impl Bill {
    fn introduce(number: &str, actor: Uuid) -> DomainResult<Self> {
        ensure_not_blank("number", number)?;
        let mut bill = Self {
            meta: EntityMeta::new(Some(actor)),
            events: Default::default(),
            number: number.to_string(),
            yeas: 0,
            nays: 0,
        };
        let context = EventContext::builder().user_id(actor).build();
        let event = bill.new_event_with(
            BillEvent::Introduced {
                number: number.to_string(),
            },
            context,
        )?;
        bill.raise_event(event);
        Ok(bill)
    }

    fn cast_vote(&mut self, voter: Uuid, yea: bool) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::invalid_state("bill has been withdrawn"));
        }
        if yea {
            self.yeas += 1;
        } else {
            self.nays += 1;
        }
        self.mark_updated(Some(voter));
        self.record(BillEvent::VoteCast { voter, yea })
    }
}

#[entity]
struct Committee {
    name: String,
}

#[test]
fn unit_of_work_drains_events_through_erased_view() -> AnyResult<()> {
    init_tracing();
    let clerk = Uuid::new_v4();
    let mut bill = Bill::introduce("C-21", clerk)?;
    bill.cast_vote(Uuid::new_v4(), true)?;
    bill.cast_vote(Uuid::new_v4(), false)?;

    assert_eq!(bill.uncommitted_event_count(), 3);
    assert_eq!(bill.version(), Version::from_value(3));

    let mut aggregates: Vec<Box<dyn AnyAggregateRoot>> = vec![Box::new(bill)];
    let mut outbox = Vec::new();
    for aggregate in aggregates.iter_mut() {
        assert_eq!(aggregate.aggregate_type(), "bill");
        for record in aggregate.drain_events() {
            assert_eq!(record.aggregate_id(), aggregate.aggregate_id());
            outbox.push(record.to_json()?);
        }
        assert!(aggregate.uncommitted().is_empty());
    }

    let names: Vec<&str> = outbox
        .iter()
        .filter_map(|json| json["event_name"].as_str())
        .collect();
    assert_eq!(
        names,
        ["bill.introduced", "bill.vote_cast", "bill.vote_cast"]
    );
    assert_eq!(outbox[0]["user_id"], clerk.to_string());
    Ok(())
}

#[test]
fn withdrawn_bill_keeps_identity_and_rejects_votes() -> AnyResult<()> {
    init_tracing();
    let mut bill = Bill::introduce("C-22", Uuid::new_v4())?;
    bill.clear_domain_events();

    assert!(bill.mark_deleted(None));
    let err = bill.cast_vote(Uuid::new_v4(), true).unwrap_err();
    assert!(matches!(err, DomainError::InvalidState { .. }));
    assert!(!bill.has_uncommitted_events());

    assert!(bill.restore(None));
    bill.cast_vote(Uuid::new_v4(), true)?;
    assert_eq!(bill.version().value(), 4);
    assert_eq!(bill.yeas, 1);
    Ok(())
}

#[test]
fn optimistic_version_check_after_reload() -> AnyResult<()> {
    let mut bill = Bill::introduce("C-23", Uuid::new_v4())?;
    let loaded_at = bill.version();
    bill.ensure_version(loaded_at)?;

    bill.cast_vote(Uuid::new_v4(), true)?;
    let err = bill.ensure_version(loaded_at).unwrap_err();
    assert!(matches!(
        err,
        DomainError::VersionConflict {
            expected: 1,
            actual: 2
        }
    ));
    Ok(())
}

#[test]
fn serialized_aggregate_omits_buffer() -> AnyResult<()> {
    let bill = Bill::introduce("C-24", Uuid::new_v4())?;
    let json = serde_json::to_value(&bill)?;
    assert!(json.get("events").is_none());

    let restored: Bill = serde_json::from_value(json)?;
    assert!(restored == bill);
    assert!(!restored.has_uncommitted_events());
    assert_eq!(restored.number, "C-24");
    Ok(())
}

#[test]
fn entity_keys_separate_types_with_shared_ids() -> AnyResult<()> {
    let id = Uuid::new_v4();
    let bill = Bill {
        meta: EntityMeta::with_id(id, None)?,
        events: Default::default(),
        number: "C-25".into(),
        yeas: 0,
        nays: 0,
    };
    let committee = Committee {
        meta: EntityMeta::with_id(id, None)?,
        name: "Finance".into(),
    };

    assert!(!same_entity(&bill, &committee));

    let mut index: HashMap<EntityKey, &str> = HashMap::new();
    index.insert(bill.entity_key().expect("persisted"), "bill");
    index.insert(committee.entity_key().expect("persisted"), "committee");
    assert_eq!(index.len(), 2);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// N 次更新恰好推进 N 个版本；重复删除只计一次
    #[test]
    fn version_advances_once_per_change(updates in 0usize..50, deletes in 1usize..5) {
        let mut committee = Committee {
            meta: EntityMeta::new(None),
            name: "Ethics".into(),
        };
        for _ in 0..updates {
            committee.mark_updated(None);
        }
        prop_assert_eq!(committee.version().value(), 1 + updates as u64);

        for _ in 0..deletes {
            committee.mark_deleted(None);
        }
        prop_assert_eq!(committee.version().value(), 2 + updates as u64);
        prop_assert!(committee.is_deleted());

        prop_assert!(committee.restore(None));
        prop_assert!(!committee.restore(None));
        prop_assert_eq!(committee.version().value(), 3 + updates as u64);
    }

    /// 每个工作单元：暂存 K 个事件并按顺序读出，清空后归零
    #[test]
    fn buffer_cycles_between_units_of_work(rounds in prop::collection::vec(prop::collection::vec(any::<bool>(), 0..20), 1..5)) {
        let mut bill = Bill::introduce("C-30", Uuid::new_v4()).unwrap();
        bill.clear_domain_events();
        prop_assert!(!bill.has_uncommitted_events());

        for votes in rounds {
            for yea in &votes {
                bill.cast_vote(Uuid::new_v4(), *yea).unwrap();
            }
            prop_assert_eq!(bill.uncommitted_event_count(), votes.len());

            let staged: Vec<bool> = bill
                .domain_events()
                .iter()
                .filter_map(|e| match e.payload() {
                    BillEvent::VoteCast { yea, .. } => Some(*yea),
                    BillEvent::Introduced { .. } => None,
                })
                .collect();
            prop_assert_eq!(&staged, &votes);

            let taken = bill.take_domain_events();
            prop_assert_eq!(taken.len(), votes.len());
            prop_assert_eq!(bill.uncommitted_event_count(), 0);
        }
    }

    /// 每个事件默认获得非空且唯一的关联ID
    #[test]
    fn correlation_ids_are_unique(count in 1usize..30) {
        let mut bill = Bill::introduce("C-31", Uuid::new_v4()).unwrap();
        for _ in 0..count {
            bill.cast_vote(Uuid::new_v4(), true).unwrap();
        }
        let ids: std::collections::HashSet<&str> = bill
            .domain_events()
            .iter()
            .map(|e| e.correlation_id())
            .collect();
        prop_assert_eq!(ids.len(), count + 1);
        prop_assert!(ids.iter().all(|id| !id.is_empty()));
    }
}
