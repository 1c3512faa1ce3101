use civic_domain::identifier::Identifier;
use civic_macros::entity_id;
use uuid::Uuid;

#[entity_id]
struct VoterId(Uuid);

#[entity_id(debug = false)]
struct BallotId(ulid::Ulid);

impl std::fmt::Debug for BallotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BallotId({})", self.0)
    }
}

fn main() {
    assert!(VoterId::default().is_transient());

    let id = VoterId::generate();
    assert!(!id.is_transient());
    assert_eq!(id.to_uuid(), *id.as_ref());

    let parsed: VoterId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);

    let raw = Uuid::new_v4();
    assert_eq!(Uuid::from(VoterId::new(raw)), raw);

    let ballot = BallotId::generate();
    assert_eq!(ballot.to_uuid().as_u128(), u128::from(ulid::Ulid::from(ballot.clone())));
    assert!(format!("{ballot:?}").starts_with("BallotId("));
}
