use civic_domain::domain_event::EventPayload;
use civic_macros::domain_event;

#[domain_event]
struct PollClosed {
    riding: String,
}

#[domain_event(name = "poll.reopened", version = 2)]
struct PollReopened {
    riding: String,
}

fn main() {
    let closed = PollClosed {
        riding: "Halifax".into(),
    };
    assert_eq!(closed.event_name(), "PollClosed");
    assert_eq!(closed.event_version(), 1);

    let reopened = PollReopened {
        riding: "Halifax".into(),
    };
    assert_eq!(reopened.event_name(), "poll.reopened");
    assert_eq!(reopened.event_version(), 2);
    assert_eq!(closed.riding, reopened.riding);
}
