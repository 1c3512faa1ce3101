use civic_domain::domain_event::EventPayload;
use civic_macros::domain_event;

#[domain_event(version = 1)]
enum BillEvent {
    #[event(event_name = "bill.introduced")]
    Introduced { number: String },
    #[event(event_name = "bill.amended", event_version = 3)]
    Amended(String),
    Withdrawn,
}

fn main() {
    let introduced = BillEvent::Introduced {
        number: "C-11".into(),
    };
    assert_eq!(introduced.event_name(), "bill.introduced");
    assert_eq!(introduced.event_version(), 1);

    let amended = BillEvent::Amended("clause 4".into());
    assert_eq!(amended.event_name(), "bill.amended");
    assert_eq!(amended.event_version(), 3);

    assert_eq!(BillEvent::Withdrawn.event_name(), "BillEvent.Withdrawn");
    assert_eq!(BillEvent::Withdrawn.clone(), BillEvent::Withdrawn);
}
