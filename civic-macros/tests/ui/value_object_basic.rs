use civic_macros::value_object;
use std::collections::HashSet;

#[value_object]
struct PostalCode(String);

#[value_object]
enum Ballot {
    Yea,
    Nay,
    Abstain,
}

fn main() {
    let a = PostalCode("K1A 0A6".into());
    let b = PostalCode("K1A 0A6".into());
    assert_eq!(a, b);

    let mut seen = HashSet::new();
    seen.insert(a);
    assert!(!seen.insert(b));

    assert_ne!(Ballot::Yea, Ballot::Nay);
    assert_eq!(Ballot::Abstain.clone(), Ballot::Abstain);
}
