/// Petition 聚合示例
/// 演示聚合在业务方法中暂存领域事件，工作单元结束后由分发器统一取出并发布
use anyhow::Result as AnyResult;
use civic_domain::aggregate_root::{AggregateRoot, AnyAggregateRoot};
use civic_domain::domain_event::{EventContext, EventRecord};
use civic_domain::entity::{Entity, EntityMeta};
use civic_domain::error::{DomainError, DomainResult, ensure_not_blank};
use civic_macros::{aggregate_root, domain_event, entity_id};
use serde_json::Value;
use tracing::info;
use ulid::Ulid;
use uuid::Uuid;

// ============================================================================
// 领域模型定义
// ============================================================================

#[entity_id]
pub struct PetitionId(Ulid);

#[domain_event(version = 1)]
enum PetitionEvent {
    #[event(event_name = "petition.opened")]
    Opened { title: String, threshold: u32 },
    #[event(event_name = "petition.signed")]
    Signed { signer: Uuid },
    #[event(event_name = "petition.threshold_reached", event_version = 2)]
    ThresholdReached { signatures: u32 },
}

#[aggregate_root(id = PetitionId, event = PetitionEvent, aggregate_type = "petition")]
struct Petition {
    title: String,
    threshold: u32,
    signers: Vec<Uuid>,
}

impl Petition {
    fn open(title: &str, threshold: u32, sponsor: Uuid) -> DomainResult<Self> {
        ensure_not_blank("title", title)?;
        if threshold == 0 {
            return Err(DomainError::invalid_argument(
                "threshold",
                "threshold must be positive",
            ));
        }

        let mut petition = Self {
            meta: EntityMeta::new(Some(sponsor)),
            events: Default::default(),
            title: title.to_string(),
            threshold,
            signers: Vec::new(),
        };
        let context = EventContext::builder()
            .user_id(sponsor)
            .correlation_id(format!("open-{}", petition.id()))
            .build();
        let opened = petition.new_event_with(
            PetitionEvent::Opened {
                title: title.to_string(),
                threshold,
            },
            context,
        )?;
        petition.raise_event(opened);
        Ok(petition)
    }

    fn sign(&mut self, signer: Uuid) -> DomainResult<()> {
        if self.signers.contains(&signer) {
            return Err(DomainError::invalid_state("already signed"));
        }
        self.signers.push(signer);
        self.mark_updated(Some(signer));
        self.record(PetitionEvent::Signed { signer })?;

        let signatures = self.signers.len() as u32;
        if signatures == self.threshold {
            self.record(PetitionEvent::ThresholdReached { signatures })?;
        }
        Ok(())
    }
}

// ============================================================================
// 分发器：只依赖类型擦除后的聚合视图
// ============================================================================

#[derive(Default)]
struct Dispatcher {
    published: Vec<Value>,
}

impl Dispatcher {
    fn commit(&mut self, aggregate: &mut dyn AnyAggregateRoot) -> AnyResult<usize> {
        let records = aggregate.drain_events();
        for record in &records {
            info!(
                event = record.event_name(),
                version = record.event_version(),
                aggregate_id = %record.aggregate_id(),
                "publishing"
            );
            self.published.push(record.to_json()?);
        }
        Ok(records.len())
    }
}

fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let sponsor = Uuid::new_v4();
    let mut petition = Petition::open("Extend transit hours", 2, sponsor)?;
    println!(
        "opened {} ({}), staged events: {}",
        petition.title,
        petition.id(),
        petition.uncommitted_event_count()
    );

    let mut dispatcher = Dispatcher::default();
    let published = dispatcher.commit(&mut petition)?;
    println!("unit of work 1 published {published} event(s)");

    petition.sign(Uuid::new_v4())?;
    petition.sign(Uuid::new_v4())?;
    if let Err(err) = petition.sign(sponsor).and_then(|_| petition.sign(sponsor)) {
        println!("rejected duplicate signature: {err}");
    }

    for event in petition.domain_events() {
        println!("  staged: {event}");
    }
    let published = dispatcher.commit(&mut petition)?;
    println!(
        "unit of work 2 published {published} event(s), version now {}",
        petition.version()
    );

    println!("{}", serde_json::to_string_pretty(&dispatcher.published)?);
    Ok(())
}
