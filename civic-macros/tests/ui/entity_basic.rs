use civic_domain::entity::{Entity, EntityMeta};
use civic_macros::entity;

#[entity]
struct Riding {
    name: String,
}

fn main() {
    let mut riding = Riding {
        meta: EntityMeta::new(None),
        name: "Ottawa Centre".into(),
    };
    assert!(!riding.is_transient());
    assert_eq!(riding.version().value(), 1);

    riding.mark_updated(None);
    assert_eq!(riding.version().value(), 2);

    let copy = riding.clone();
    assert!(copy == riding);
}
