use civic_domain::aggregate_root::{AggregateRoot, AnyAggregateRoot};
use civic_domain::domain_event::EventRecord;
use civic_domain::entity::{Entity, EntityMeta};
use civic_domain::error::DomainResult;
use civic_macros::{aggregate_root, domain_event};

#[domain_event]
enum ConsultationEvent {
    #[event(event_name = "consultation.opened")]
    Opened { topic: String },
}

#[aggregate_root(event = ConsultationEvent, aggregate_type = "consultation")]
struct Consultation {
    topic: String,
}

impl Consultation {
    fn open(topic: &str) -> DomainResult<Self> {
        let mut consultation = Self {
            meta: EntityMeta::new(None),
            events: Default::default(),
            topic: topic.to_string(),
        };
        consultation.record(ConsultationEvent::Opened {
            topic: topic.to_string(),
        })?;
        Ok(consultation)
    }
}

fn main() {
    let mut consultation = Consultation::open("transit").unwrap();
    assert_eq!(Consultation::AGGREGATE_TYPE, "consultation");
    assert_eq!(consultation.uncommitted_event_count(), 1);
    assert_eq!(consultation.topic, "transit");

    let json = serde_json::to_value(&consultation).unwrap();
    assert!(json.get("events").is_none());

    let drained = consultation.drain_events();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].event_name(), "consultation.opened");
    assert_eq!(drained[0].aggregate_id(), consultation.universal_id());
    assert!(!consultation.has_uncommitted_events());
}
