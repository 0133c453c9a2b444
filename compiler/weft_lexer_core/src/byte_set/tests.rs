use super::*;
use proptest::prelude::*;

#[test]
fn membership_spans_both_lanes() {
    let set = ByteSet::from_bytes(b"{<|");
    assert!(set.contains(b'<')); // 60, primary lane
    assert!(set.contains(b'{')); // 123, secondary lane
    assert!(set.contains(b'|'));
    assert!(!set.contains(b'}'));
    assert!(!set.contains(b'a'));
    assert_eq!(set.len(), 3);
}

#[test]
fn lanes_hold_expected_bits() {
    let set = ByteSet::from_bytes(b" @");
    assert_eq!(set.primary(), 1u64 << 32);
    assert_eq!(set.secondary(), 1u64);
}

#[test]
fn non_ascii_is_never_a_member() {
    let set = ByteSet::EMPTY.with(0xC3).with(0xFF);
    assert!(set.is_empty());
    assert!(!set.contains(0xC3));
}

#[test]
fn union_merges_members() {
    let set = ByteSet::from_bytes(b"ab").union(ByteSet::from_bytes(b"bc"));
    assert_eq!(set.members().collect::<Vec<_>>(), b"abc".to_vec());
}

#[test]
fn trim_strips_whitespace() {
    assert_eq!(ByteSet::WHITESPACE.trim("  a.b \n"), "a.b");
    assert_eq!(ByteSet::WHITESPACE.trim("\t\t"), "");
    assert_eq!(ByteSet::WHITESPACE.trim(""), "");
    assert_eq!(ByteSet::WHITESPACE.trim(" é "), "é");
}

proptest! {
    #[test]
    fn contains_matches_construction(
        bytes in proptest::collection::vec(0u8..128, 0..20),
        probe in any::<u8>(),
    ) {
        let set = ByteSet::from_bytes(&bytes);
        prop_assert_eq!(set.contains(probe), bytes.contains(&probe));
    }
}
