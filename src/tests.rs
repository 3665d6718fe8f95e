use super::*;
use crate::proptest::rope;
use ::proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const ANY_STRING: &str = ".{0,128}";

/// Walks a subtree checking the weight invariants, returning its length.
fn check_node(node: &Node<char>) -> usize {
    match node {
        Node::Leaf { fragment } => fragment.len(),
        Node::Internal {
            weight,
            left,
            right,
        } => {
            let left_len = check_node(left);
            assert_eq!(left_len, *weight, "internal weight must match left subtree");
            left_len + check_node(right)
        }
    }
}

fn check_invariants(rope: &Rope<char>) {
    if let Some(root) = &rope.root {
        assert_eq!(check_node(root), rope.len());
    }
}

fn flat(rope: &Rope<char>) -> Vec<char> {
    rope.iter().copied().collect()
}

fn hash_of(rope: &Rope<char>) -> u64 {
    let mut hasher = DefaultHasher::new();
    rope.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn append_insert_erase_scenario() {
    let mut rope = Rope::from("some");
    rope.append("text");
    assert_eq!(rope.len(), 8);
    assert_eq!(String::from(&rope), "sometext");
    assert_eq!(rope.substring(2, 4), vec!['m', 'e', 't', 'e']);
    check_invariants(&rope);

    rope.insert(4, "!!");
    assert_eq!(rope, "some!!text");
    check_invariants(&rope);

    rope.erase(4, 2);
    assert_eq!(rope, "sometext");
    check_invariants(&rope);
}

#[test]
fn boundary_cases() {
    let mut rope = Rope::from("sometext");
    let len = rope.len();

    assert!(rope.try_at(len).is_err());
    assert_eq!(rope.try_at(len - 1), Ok(&'t'));
    assert!(rope.try_substring(0, len + 1).is_err());
    assert_eq!(rope.try_substring(0, len), Ok("sometext".chars().collect()));
    assert!(rope.try_erase(0, len + 1).is_err());
    assert!(rope.try_insert(len + 1, "x").is_err());
    assert_eq!(rope, "sometext");

    rope.try_insert(len, "x").unwrap();
    assert_eq!(rope, "sometextx");
}

#[test]
fn failed_operations_leave_rope_unmodified() {
    let mut rope = Rope::from("sometext");
    assert!(rope.try_erase(3, 6).is_err());
    assert!(rope.try_insert(9, "x").is_err());
    assert!(rope.try_split_off(9).is_err());
    assert_eq!(rope, "sometext");
    check_invariants(&rope);
}

#[test]
fn out_of_range_error_details() {
    let rope = Rope::from("abc");
    let err = rope.try_at(7).unwrap_err();
    assert_eq!(err.index(), 7);
    assert_eq!(err.len(), 3);
    assert_eq!(
        err.to_string(),
        "index 7 is out of range for a rope of length 3"
    );
}

#[test]
fn empty_representations_agree() {
    let absent: Rope<char> = Rope::new();
    let leaf = Rope::from("");

    assert_eq!(absent.len(), 0);
    assert_eq!(leaf.len(), 0);
    assert!(absent.is_empty());
    assert!(leaf.is_empty());
    assert!(absent.is_balanced());
    assert_eq!(absent, leaf);
    assert!(absent.try_at(0).is_err());
    assert!(leaf.try_at(0).is_err());
    assert_eq!(absent.try_substring(0, 0), Ok(vec![]));
}

#[test]
fn insert_into_empty_rope() {
    let mut rope = Rope::new();
    rope.try_insert(0, "text").unwrap();
    assert_eq!(rope, "text");
    assert!(rope.try_insert(5, "x").is_err());
}

#[test]
fn split_off_at_the_ends() {
    let mut rope = Rope::from("sometext");

    let tail = rope.split_off(8);
    assert!(tail.is_empty());
    assert_eq!(rope, "sometext");

    let tail = rope.split_off(0);
    assert!(rope.is_empty());
    assert_eq!(tail, "sometext");
}

#[test]
fn erase_everything() {
    let mut rope = Rope::from("sometext");
    rope.erase(0, 8);
    assert!(rope.is_empty());
    check_invariants(&rope);
}

#[test]
fn clear_empties_the_rope() {
    let mut rope = Rope::from("sometext");
    rope.clear();
    assert!(rope.is_empty());
    assert_eq!(rope, Rope::new());
}

#[test]
fn append_accepts_every_source_type() {
    let mut rope: Rope<char> = Rope::new();
    rope.append("a");
    rope.append(String::from("b"));
    rope.append(&String::from("c"));
    rope.append('d');
    rope.append(&'e');
    rope.append(vec!['f']);
    rope.append(&vec!['g']);
    rope.append(['h'].as_slice());
    rope.append(Rope::from("i"));
    rope.append(&Rope::from("j"));
    assert_eq!(rope, "abcdefghij");
    check_invariants(&rope);
}

#[test]
fn clones_are_independent() {
    let mut original = Rope::from("sometext");
    let copy = original.clone();
    original.erase(0, 4);
    assert_eq!(original, "text");
    assert_eq!(copy, "sometext");
}

#[test]
fn equality_ignores_tree_shape() {
    let flat = Rope::from("sometext");
    let mut pieced = Rope::from("so");
    pieced.append("me");
    pieced.append("te");
    pieced.append("xt");

    assert_eq!(flat, pieced);
    assert_eq!(hash_of(&flat), hash_of(&pieced));
    assert_ne!(flat, Rope::from("sometexts"));
}

#[test]
fn ordering_is_lexicographic() {
    assert!(Rope::from("abc") < Rope::from("abd"));
    assert!(Rope::from("ab") < Rope::from("abc"));
    assert!(Rope::from("b") > Rope::from("azzz"));
    assert_eq!(
        Rope::from("abc").cmp(&Rope::from("abc")),
        std::cmp::Ordering::Equal
    );
}

#[test]
fn indexing_and_iteration() {
    let mut rope = Rope::from("so");
    rope.append("metext");
    assert_eq!(rope[0], 's');
    assert_eq!(rope[7], 't');
    assert_eq!(rope.iter().copied().collect::<String>(), "sometext");
    assert_eq!(rope.iter().len(), 8);
    let mut iter = rope.iter();
    for _ in 0..8 {
        assert!(iter.next().is_some());
    }
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

#[test]
fn conversions_round_trip() {
    let rope = Rope::from(String::from("sometext"));
    assert_eq!(String::from(&rope), "sometext");
    assert_eq!(Vec::from(&rope), "sometext".chars().collect::<Vec<_>>());
    assert_eq!(rope.to_string(), "sometext");
    assert_eq!(format!("{:?}", Rope::from("ab")), "['a', 'b']");

    let collected: Rope<char> = "sometext".chars().collect();
    assert_eq!(collected, rope);

    let mut extended = Rope::from("some");
    extended.extend("text".chars());
    assert_eq!(extended, rope);
}

#[test]
fn generic_elements() {
    let mut rope: Rope<u32> = Rope::from(vec![1, 2, 3]);
    rope.append(vec![7, 8]);
    rope.insert(3, vec![4, 5, 6]);
    assert_eq!(rope, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(rope.substring(2, 3), vec![3, 4, 5]);
    rope.erase(0, 6);
    assert_eq!(rope.to_vec(), vec![7, 8]);
}

#[test]
fn fmt_write_appends() {
    use std::fmt::Write;
    let mut rope = Rope::from("some");
    write!(rope, "{}", "text").unwrap();
    assert_eq!(rope, "sometext");
}

#[test]
fn balance_flattens_a_degenerate_tree() {
    let mut rope = Rope::new();
    for ch in 'a'..='z' {
        rope.append(ch);
    }
    let before = flat(&rope);
    assert!(!rope.is_balanced());
    assert_eq!(rope.depth(), 25);

    rope.balance();
    assert!(rope.is_balanced());
    assert!(rope.depth() < 25);
    assert_eq!(flat(&rope), before);
    check_invariants(&rope);
}

#[test]
fn balance_collapses_empty_leaves() {
    let mut rope = Rope::from("");
    rope.append("");
    rope.append("");
    assert_eq!(rope.len(), 0);
    assert!(!rope.is_balanced());

    rope.balance();
    assert!(rope.is_balanced());
    assert!(rope.is_empty());
}

#[test]
fn fib_convention() {
    let series: Vec<usize> = (0..10usize).map(balance::fib).collect();
    assert_eq!(series, vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
}

#[test]
fn fib_interval_bounds() {
    assert_eq!(balance::fib_intervals(0), Vec::<usize>::new());
    assert_eq!(balance::fib_intervals(1), vec![1, 2]);
    assert_eq!(balance::fib_intervals(8), vec![1, 2, 3, 5, 8, 13]);
    // The last bound always strictly exceeds the requested length.
    for len in 0..200 {
        let bounds = balance::fib_intervals(len);
        if let Some(last) = bounds.last() {
            assert!(*last > len);
        }
    }
}

#[test]
fn serde_round_trip() {
    let mut rope = Rope::from("some");
    rope.append("text");
    let json = serde_json::to_string(&rope).unwrap();
    let back: Rope<char> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rope);

    let numbers: Rope<u32> = Rope::from(vec![1, 2, 3]);
    let json = serde_json::to_string(&numbers).unwrap();
    assert_eq!(json, "[1,2,3]");
    let back: Rope<u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, numbers);
}

proptest! {
    #[test]
    fn rope_string_inv(rope in any::<Rope<char>>()) {
        prop_assert_eq!(rope.clone(), Rope::from(String::from(&rope)));
    }

    #[test]
    fn string_rope_inv(string in ANY_STRING) {
        prop_assert_eq!(string.clone(), String::from(Rope::from(&string)));
    }

    #[test]
    fn split_append_round_trip(rope in any::<Rope<char>>(), idx in any::<prop::sample::Index>()) {
        let k = idx.index(rope.len() + 1);
        let mut front = rope.clone();
        let back = front.split_off(k);
        prop_assert_eq!(front.len() + back.len(), rope.len());

        front.append(back);
        check_invariants(&front);
        prop_assert_eq!(&front, &rope);
    }

    #[test]
    fn append_adds_lengths(a in any::<Rope<char>>(), b in any::<Rope<char>>()) {
        let joined = a.clone() + b.clone();
        check_invariants(&joined);
        prop_assert_eq!(joined.len(), a.len() + b.len());

        let mut expected = flat(&a);
        expected.extend(flat(&b));
        prop_assert_eq!(flat(&joined), expected);
    }

    #[test]
    fn at_agrees_with_substring(rope in rope(".{1,64}"), idx in any::<prop::sample::Index>()) {
        let i = idx.index(rope.len());
        prop_assert_eq!(rope.substring(i, 1), vec![*rope.at(i)]);
        prop_assert_eq!(rope.at(i), &flat(&rope)[i]);
    }

    #[test]
    fn substring_matches_model(
        rope in any::<Rope<char>>(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let x = a.index(rope.len() + 1);
        let y = b.index(rope.len() + 1);
        let (start, end) = (x.min(y), x.max(y));
        prop_assert_eq!(
            rope.substring(start, end - start),
            flat(&rope)[start..end].to_vec()
        );
    }

    #[test]
    fn insert_matches_model(
        target in any::<Rope<char>>(),
        addition in any::<Rope<char>>(),
        idx in any::<prop::sample::Index>(),
    ) {
        let k = idx.index(target.len() + 1);
        let mut rope = target.clone();
        rope.insert(k, &addition);
        check_invariants(&rope);

        let mut expected = flat(&target);
        let tail = expected.split_off(k);
        expected.extend(flat(&addition));
        expected.extend(tail);
        prop_assert_eq!(flat(&rope), expected);
    }

    #[test]
    fn erase_matches_model(
        rope in any::<Rope<char>>(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let x = a.index(rope.len() + 1);
        let y = b.index(rope.len() + 1);
        let (start, end) = (x.min(y), x.max(y));

        let mut erased = rope.clone();
        erased.erase(start, end - start);
        check_invariants(&erased);

        let mut expected = flat(&rope);
        expected.drain(start..end);
        prop_assert_eq!(flat(&erased), expected);
    }

    #[test]
    fn erase_inverts_insert(
        target in any::<Rope<char>>(),
        addition in any::<Rope<char>>(),
        idx in any::<prop::sample::Index>(),
    ) {
        let k = idx.index(target.len() + 1);
        let mut rope = target.clone();
        rope.insert(k, &addition);
        rope.erase(k, addition.len());
        prop_assert_eq!(rope, target);
    }

    #[test]
    fn balance_preserves_content(rope in any::<Rope<char>>()) {
        let mut balanced = rope.clone();
        balanced.balance();
        check_invariants(&balanced);
        prop_assert!(balanced.is_balanced());
        prop_assert_eq!(&balanced, &rope);

        // Idempotence: a second pass is a no-op.
        let again = {
            let mut r = balanced.clone();
            r.balance();
            r
        };
        prop_assert!(again.is_balanced());
        prop_assert_eq!(again.depth(), balanced.depth());
        prop_assert_eq!(&again, &balanced);
    }

    #[test]
    fn cmp_agrees_with_flat_model(a in any::<Rope<char>>(), b in any::<Rope<char>>()) {
        prop_assert_eq!(a.cmp(&b), flat(&a).cmp(&flat(&b)));
        prop_assert_eq!(a == b, flat(&a) == flat(&b));
    }

    #[test]
    fn hash_ignores_tree_shape(rope in any::<Rope<char>>()) {
        let single_leaf = Rope::from(flat(&rope));
        prop_assert_eq!(&single_leaf, &rope);
        prop_assert_eq!(hash_of(&single_leaf), hash_of(&rope));
    }

    #[test]
    fn out_of_range_is_rejected(rope in any::<Rope<char>>(), extra in 1usize..16) {
        let len = rope.len();
        let mut rope = rope;
        prop_assert!(rope.try_at(len).is_err());
        prop_assert!(rope.try_substring(0, len + extra).is_err());
        prop_assert!(rope.try_insert(len + extra, "x").is_err());
        prop_assert!(rope.try_erase(0, len + extra).is_err());
        prop_assert_eq!(rope.len(), len);
    }
}
