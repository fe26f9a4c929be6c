use proptest::prelude::*;
use seqtrie::trie::ChildStore;
use seqtrie::{HashTrie, Sequence, SortedTrie, Trie, TrieConfig, TrieError};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

#[derive(Debug, Clone)]
enum Operation {
    Put(Vec<u8>, u16),
    Get(Vec<u8>),
    Remove(Vec<u8>),
    Floor(Vec<u8>),
    Ceiling(Vec<u8>),
    PollFirst,
}

// Small alphabet and short keys so that prefixes collide often.
fn key() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..4, 0..6)
}

fn op() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (key(), any::<u16>()).prop_map(|(k, v)| Operation::Put(k, v)),
        2 => key().prop_map(Operation::Get),
        3 => key().prop_map(Operation::Remove),
        1 => key().prop_map(Operation::Floor),
        1 => key().prop_map(Operation::Ceiling),
        1 => Just(Operation::PollFirst),
    ]
}

fn run_sorted(config: TrieConfig, ops: Vec<Operation>) {
    let mut std_map: BTreeMap<Vec<u8>, u16> = BTreeMap::new();
    let mut trie: SortedTrie<u8, u16> = SortedTrie::with_config(config);

    for op in ops {
        match op {
            Operation::Put(k, v) => {
                let std_res = std_map.insert(k.clone(), v);
                let trie_res = trie.put(&k, v);
                assert_eq!(std_res, trie_res, "Put result mismatch for key {:?}", k);
            }
            Operation::Get(k) => {
                assert_eq!(std_map.get(&k), trie.get(&k), "Get result mismatch for key {:?}", k);
            }
            Operation::Remove(k) => {
                let std_res = std_map.remove(&k);
                let trie_res = trie.remove(&k);
                assert_eq!(std_res, trie_res, "Remove result mismatch for key {:?}", k);
            }
            Operation::Floor(k) => {
                let std_res = std_map.range(..=k.clone()).next_back().map(|(k, _)| k.clone());
                let trie_res = trie.floor_key(&k).map(Sequence::into_vec);
                assert_eq!(std_res, trie_res, "Floor mismatch for key {:?}", k);

                let std_res = std_map.range(..k.clone()).next_back().map(|(k, _)| k.clone());
                let trie_res = trie.lower_key(&k).map(Sequence::into_vec);
                assert_eq!(std_res, trie_res, "Lower mismatch for key {:?}", k);
            }
            Operation::Ceiling(k) => {
                let std_res = std_map.range(k.clone()..).next().map(|(k, _)| k.clone());
                let trie_res = trie.ceiling_key(&k).map(Sequence::into_vec);
                assert_eq!(std_res, trie_res, "Ceiling mismatch for key {:?}", k);

                let std_res = std_map
                    .range((std::ops::Bound::Excluded(k.clone()), std::ops::Bound::Unbounded))
                    .next()
                    .map(|(k, _)| k.clone());
                let trie_res = trie.higher_key(&k).map(Sequence::into_vec);
                assert_eq!(std_res, trie_res, "Higher mismatch for key {:?}", k);
            }
            Operation::PollFirst => {
                let std_res = std_map.pop_first();
                let trie_res = trie.poll_first().map(|(k, v)| (k.into_vec(), v));
                assert_eq!(std_res, trie_res, "PollFirst mismatch");
            }
        }
        trie.verify().expect("structural invariant broken");
    }

    // Final consistency check
    assert_eq!(trie.len(), std_map.len(), "Length mismatch");
    let trie_entries: Vec<(Vec<u8>, u16)> = trie.iter().map(|(k, v)| (k.into_vec(), *v)).collect();
    let std_entries: Vec<(Vec<u8>, u16)> = std_map.into_iter().collect();
    assert_eq!(trie_entries, std_entries, "Iteration order mismatch");
}

proptest! {
    #[test]
    fn test_sorted_trie_matches_std_map(ops in proptest::collection::vec(op(), 1..120)) {
        run_sorted(TrieConfig::plain(), ops);
    }

    #[test]
    fn test_patricia_trie_matches_std_map(ops in proptest::collection::vec(op(), 1..120)) {
        run_sorted(TrieConfig::radix(), ops);
    }

    #[test]
    fn test_hash_trie_matches_std_map(
        entries in proptest::collection::vec((key(), any::<u16>()), 0..60),
        removals in proptest::collection::vec(key(), 0..30),
    ) {
        let mut std_map = BTreeMap::new();
        let mut trie: HashTrie<u8, u16> = HashTrie::patricia();
        for (k, v) in entries {
            prop_assert_eq!(std_map.insert(k.clone(), v), trie.put(&k, v));
        }
        for k in removals {
            prop_assert_eq!(std_map.remove(&k), trie.remove(&k));
        }
        trie.verify().expect("structural invariant broken");

        let mut trie_entries: Vec<(Vec<u8>, u16)> = trie.iter().map(|(k, v)| (k.into_vec(), *v)).collect();
        trie_entries.sort();
        let std_entries: Vec<(Vec<u8>, u16)> = std_map.into_iter().collect();
        prop_assert_eq!(trie_entries, std_entries);
    }

    #[test]
    fn test_subtrie_len_matches_filtered_count(
        keys in proptest::collection::vec(key(), 0..60),
        prefix in key(),
    ) {
        let mut trie: SortedTrie<u8, ()> = SortedTrie::patricia();
        for k in &keys {
            trie.put(k, ());
        }
        let expected: BTreeSet<&Vec<u8>> = keys
            .iter()
            .filter(|k| k.len() > prefix.len() && k.starts_with(&prefix))
            .collect();
        // The prefix resolves whenever some key starts with it, even if the
        // only such key is the prefix itself.
        let reachable = keys.iter().any(|k| k.starts_with(&prefix));
        match trie.subtrie(&prefix) {
            Ok(sub) => {
                prop_assert!(reachable);
                prop_assert_eq!(sub.len(), expected.len());
                prop_assert_eq!(sub.is_empty(), expected.is_empty());
                let sub_keys: BTreeSet<Vec<u8>> = sub.keys().map(Sequence::into_vec).collect();
                let expected_keys: BTreeSet<Vec<u8>> = expected.iter().map(|k| (*k).clone()).collect();
                prop_assert_eq!(sub_keys, expected_keys);
            }
            Err(err) => {
                prop_assert!(!reachable);
                prop_assert!(expected.is_empty());
                prop_assert!(matches!(err, TrieError::NotFound(_)), "unexpected error {:?}", err);
            }
        }
    }

    #[test]
    fn test_range_views_match_filtered_model(
        keys in proptest::collection::vec(key(), 0..50),
        (lo, lo_inclusive) in (key(), any::<bool>()),
        (hi, hi_inclusive) in (key(), any::<bool>()),
        radix in any::<bool>(),
    ) {
        check_range_views(&keys, (lo, lo_inclusive), (hi, hi_inclusive), radix)?;
    }

    #[test]
    fn test_cursor_removal_under_random_mask(
        keys in proptest::collection::vec(key(), 0..50),
        mask in any::<u64>(),
        radix in any::<bool>(),
    ) {
        let config = if radix { TrieConfig::radix() } else { TrieConfig::plain() };
        let sorted: SortedTrie<u8, u16> = SortedTrie::with_config(config);
        let hashed: HashTrie<u8, u16> = HashTrie::with_config(config);
        check_cursor_removal(sorted, &keys, mask)?;
        check_cursor_removal(hashed, &keys, mask)?;
    }

    #[test]
    fn test_remove_prefixed_matches_model(
        keys in proptest::collection::vec(key(), 0..50),
        prefix in key(),
        radix in any::<bool>(),
    ) {
        let config = if radix { TrieConfig::radix() } else { TrieConfig::plain() };
        let mut trie: SortedTrie<u8, u16> = SortedTrie::with_config(config);
        let mut std_map = BTreeMap::new();
        for (i, k) in keys.iter().enumerate() {
            trie.put(k, i as u16);
            std_map.insert(k.clone(), i as u16);
        }

        let before = std_map.len();
        std_map.retain(|k, _| !(k.len() > prefix.len() && k.starts_with(&prefix)));
        prop_assert_eq!(trie.remove_prefixed(&prefix), before - std_map.len());
        trie.verify().expect("structural invariant broken");

        let trie_entries: Vec<(Vec<u8>, u16)> = trie.iter().map(|(k, v)| (k.into_vec(), *v)).collect();
        let std_entries: Vec<(Vec<u8>, u16)> = std_map.into_iter().collect();
        prop_assert_eq!(trie_entries, std_entries);
    }
}

fn within(key: &[u8], lower: &Bound<Vec<u8>>, upper: &Bound<Vec<u8>>) -> bool {
    let above = match lower {
        Bound::Unbounded => true,
        Bound::Included(lo) => key >= lo.as_slice(),
        Bound::Excluded(lo) => key > lo.as_slice(),
    };
    let below = match upper {
        Bound::Unbounded => true,
        Bound::Included(hi) => key <= hi.as_slice(),
        Bound::Excluded(hi) => key < hi.as_slice(),
    };
    above && below
}

fn bound(key: &[u8], inclusive: bool) -> Bound<Vec<u8>> {
    if inclusive {
        Bound::Included(key.to_vec())
    } else {
        Bound::Excluded(key.to_vec())
    }
}

fn collect_keys(keys: impl Iterator<Item = Sequence<u8>>) -> Vec<Vec<u8>> {
    keys.map(Sequence::into_vec).collect()
}

fn model_keys(std_map: &BTreeMap<Vec<u8>, u16>, lower: &Bound<Vec<u8>>, upper: &Bound<Vec<u8>>) -> Vec<Vec<u8>> {
    std_map.keys().filter(|k| within(k, lower, upper)).cloned().collect()
}

fn check_range_views(
    keys: &[Vec<u8>],
    (lo, lo_inclusive): (Vec<u8>, bool),
    (hi, hi_inclusive): (Vec<u8>, bool),
    radix: bool,
) -> Result<(), TestCaseError> {
    let config = if radix { TrieConfig::radix() } else { TrieConfig::plain() };
    let mut trie: SortedTrie<u8, u16> = SortedTrie::with_config(config);
    let mut std_map = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        trie.put(k, i as u16);
        std_map.insert(k.clone(), i as u16);
    }

    // Head and tail views.
    let upper = bound(&hi, hi_inclusive);
    let expected = model_keys(&std_map, &Bound::Unbounded, &upper);
    let head = trie.head_view(&hi, hi_inclusive);
    prop_assert_eq!(collect_keys(head.keys()), expected.clone());
    prop_assert_eq!(head.len(), expected.len());

    let lower = bound(&lo, lo_inclusive);
    let expected = model_keys(&std_map, &lower, &Bound::Unbounded);
    let tail = trie.tail_view(&lo, lo_inclusive);
    prop_assert_eq!(collect_keys(tail.keys()), expected.clone());
    prop_assert_eq!(tail.first_key().ok().map(Sequence::into_vec), expected.first().cloned());

    // Bounded views, built three ways.
    if lo > hi {
        prop_assert!(matches!(
            trie.sub_view(&lo, lo_inclusive, &hi, hi_inclusive),
            Err(TrieError::InvalidArgument(_))
        ));
        prop_assert!(matches!(
            trie.range::<Vec<u8>, _>((lower, upper)),
            Err(TrieError::InvalidArgument(_))
        ));
        return Ok(());
    }
    let expected = model_keys(&std_map, &lower, &upper);
    let mut reversed = expected.clone();
    reversed.reverse();

    let view = trie
        .sub_view(&lo, lo_inclusive, &hi, hi_inclusive)
        .expect("ordered bounds");
    prop_assert_eq!(collect_keys(view.keys()), expected.clone());
    prop_assert_eq!(view.len(), expected.len());
    prop_assert_eq!(view.first_key().ok().map(Sequence::into_vec), expected.first().cloned());
    prop_assert_eq!(view.last_key().ok().map(Sequence::into_vec), expected.last().cloned());
    prop_assert_eq!(collect_keys(view.descending_view().keys()), reversed.clone());
    for k in std_map.keys() {
        prop_assert_eq!(view.contains_key(k), within(k, &lower, &upper), "membership of {:?}", k);
    }

    let ranged = trie.range::<Vec<u8>, _>((lower.clone(), upper.clone())).expect("ordered bounds");
    prop_assert_eq!(collect_keys(ranged.keys()), expected.clone());

    // Views narrowed step by step from an open view.
    if lo < hi {
        let descending = trie
            .descending_view()
            .sub_view(&hi, hi_inclusive, &lo, lo_inclusive)
            .expect("ordered bounds");
        prop_assert!(descending.is_descending());
        prop_assert_eq!(collect_keys(descending.keys()), reversed);

        let narrowed = trie
            .ascending_view()
            .tail_view(&lo, lo_inclusive)
            .and_then(|v| v.head_view(&hi, hi_inclusive))
            .expect("bounds inside the view");
        prop_assert_eq!(collect_keys(narrowed.keys()), expected);
    }
    Ok(())
}

fn check_cursor_removal<S: ChildStore<u8>>(
    mut trie: Trie<u8, u16, S>,
    keys: &[Vec<u8>],
    mask: u64,
) -> Result<(), TestCaseError> {
    let mut std_map = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        trie.put(k, i as u16);
        std_map.insert(k.clone(), i as u16);
    }

    let mut cursor = trie.cursor();
    let mut step = 0u32;
    let mut visited = 0;
    while let Some((key, value)) = cursor.next_entry(&trie).expect("cursor stays valid") {
        let key = key.into_vec();
        prop_assert_eq!(std_map.get(&key), Some(value));
        visited += 1;
        if mask & (1u64 << (step % 64)) != 0 {
            let removed = cursor.remove(&mut trie).expect("cursor stays valid");
            prop_assert_eq!(std_map.remove(&key), Some(removed));
            trie.verify().expect("structural invariant broken");
        }
        step += 1;
    }

    prop_assert_eq!(visited, keys.iter().collect::<BTreeSet<_>>().len());
    prop_assert_eq!(trie.len(), std_map.len());
    let mut trie_entries: Vec<(Vec<u8>, u16)> = trie.iter().map(|(k, v)| (k.into_vec(), *v)).collect();
    trie_entries.sort();
    let std_entries: Vec<(Vec<u8>, u16)> = std_map.into_iter().collect();
    prop_assert_eq!(trie_entries, std_entries);
    Ok(())
}
