use super::*;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(Vec<u8>, u64),
    Remove(Vec<u8>),
    Get(Vec<u8>),
    Prefix(Vec<u8>),
    Match(Vec<u8>),
    Longest(Vec<u8>),
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // A narrow symbol range keeps keys colliding and sharing prefixes.
    prop::collection::vec(b'a'..=b'd', 0..=6)
}

fn pattern_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![1 => Just(b'.'), 2 => b'a'..=b'd'], 0..=6)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        40 => (key.clone(), any::<u64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        15 => key.clone().prop_map(Op::Get),
        8 => key.clone().prop_map(Op::Prefix),
        7 => pattern_strategy().prop_map(Op::Match),
        5 => prop::collection::vec(b'a'..=b'd', 0..=10).prop_map(Op::Longest),
    ];
    prop::collection::vec(op, 0..=500)
}

fn model_prefix(m: &BTreeMap<Vec<u8>, u64>, prefix: &[u8]) -> Vec<Vec<u8>> {
    m.keys().filter(|k| k.starts_with(prefix)).cloned().collect()
}

fn model_match(m: &BTreeMap<Vec<u8>, u64>, pattern: &[u8]) -> Vec<Vec<u8>> {
    m.keys()
        .filter(|k| {
            k.len() == pattern.len()
                && k.iter().zip(pattern).all(|(&c, &p)| p == b'.' || p == c)
        })
        .cloned()
        .collect()
}

fn model_longest<'k>(m: &BTreeMap<Vec<u8>, u64>, s: &'k [u8]) -> &'k [u8] {
    let best = m
        .keys()
        .filter(|k| s.starts_with(k))
        .map(|k| k.len())
        .max()
        .unwrap_or(0);
    &s[..best]
}

/// Applies `ops` to `t` and to a `BTreeMap`, comparing every answer.
fn run_against_model(
    t: &mut dyn SymbolTable<u64>,
    ops: Vec<Op>,
) -> std::result::Result<BTreeMap<Vec<u8>, u64>, TestCaseError> {
    let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                let old_t = t.insert(&key, value).unwrap();
                let old_m = m.insert(key, value);
                prop_assert_eq!(old_t, old_m);
            }
            Op::Remove(key) => {
                let old_t = t.remove(&key).unwrap();
                let old_m = m.remove(key.as_slice());
                prop_assert_eq!(old_t, old_m);
            }
            Op::Get(key) => {
                let got_t = t.get(&key).unwrap().copied();
                let got_m = m.get(key.as_slice()).copied();
                prop_assert_eq!(got_t, got_m);
                prop_assert_eq!(t.contains(&key).unwrap(), got_m.is_some());
            }
            Op::Prefix(prefix) => {
                prop_assert_eq!(t.keys_with_prefix(&prefix).unwrap(), model_prefix(&m, &prefix));
            }
            Op::Match(pattern) => {
                prop_assert_eq!(t.keys_that_match(&pattern).unwrap(), model_match(&m, &pattern));
            }
            Op::Longest(s) => {
                prop_assert_eq!(t.longest_prefix_of(&s).unwrap(), model_longest(&m, &s));
            }
        }

        prop_assert_eq!(t.len(), m.len());
        prop_assert_eq!(t.is_empty(), m.is_empty());
    }

    let expected: Vec<Vec<u8>> = m.keys().cloned().collect();
    prop_assert_eq!(t.keys(), expected);
    Ok(m)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_rway(ops in ops_strategy()) {
        let mut t: RwayTrie<u64> = RwayTrie::new();
        let m = run_against_model(&mut t, ops)?;

        let issues = t.verify_integrity();
        prop_assert!(issues.is_empty(), "{:?}", issues);
        let got: Vec<(Vec<u8>, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_equivalence_tst(ops in ops_strategy()) {
        let mut t: TernaryTrie<u64> = TernaryTrie::new();
        let m = run_against_model(&mut t, ops)?;

        let issues = t.verify_integrity();
        prop_assert!(issues.is_empty(), "{:?}", issues);
        let got: Vec<(Vec<u8>, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_rejected_keys_leave_table_untouched(
        good in prop::collection::vec(b'a'..=b'z', 0..=8),
        bad in prop::collection::vec(any::<u8>(), 1..=8),
    ) {
        prop_assume!(bad.iter().any(|b| !b.is_ascii_lowercase()));

        let mut rway: RwayTrie<u8> = RwayTrie::with_alphabet(Alphabet::LOWERCASE);
        let mut tst: TernaryTrie<u8> = TernaryTrie::with_alphabet(Alphabet::LOWERCASE);
        rway.insert(&good, 1).unwrap();
        tst.insert(&good, 1).unwrap();
        let (rway_nodes, tst_nodes) = (rway.node_count(), tst.node_count());

        let position = bad.iter().position(|b| !b.is_ascii_lowercase()).unwrap();
        let err = Error::SymbolOutOfRange { symbol: bad[position], position };
        prop_assert_eq!(rway.insert(&bad, 2), Err(err.clone()));
        prop_assert_eq!(tst.insert(&bad, 2), Err(err.clone()));
        prop_assert_eq!(rway.remove(&bad), Err(err.clone()));
        prop_assert_eq!(tst.remove(&bad), Err(err));

        prop_assert_eq!(rway.len(), 1);
        prop_assert_eq!(tst.len(), 1);
        prop_assert_eq!(rway.node_count(), rway_nodes);
        prop_assert_eq!(tst.node_count(), tst_nodes);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

fn small_keys() -> Vec<Vec<u8>> {
    vec![
        b"".to_vec(),
        b"a".to_vec(),
        b"b".to_vec(),
        b"aa".to_vec(),
        b"ab".to_vec(),
        b"ba".to_vec(),
    ]
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = small_keys();

    for_each_permutation(&keys, |perm| {
        let mut rway: RwayTrie<u64> = RwayTrie::new();
        let mut tst: TernaryTrie<u64> = TernaryTrie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as u64;
            assert_eq!(rway.insert(&k, v).unwrap(), None);
            assert_eq!(tst.insert(&k, v).unwrap(), None);
            m.insert(k, v);
        }

        assert!(rway.verify_integrity().is_empty());
        assert!(tst.verify_integrity().is_empty());
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let got: Vec<(Vec<u8>, u64)> = rway.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(got, expected);
        let got: Vec<(Vec<u8>, u64)> = tst.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(got, expected);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = small_keys();

    // Insert in a fixed order, then remove in all permutations.
    let mut base_rway: RwayTrie<u64> = RwayTrie::new();
    let mut base_tst: TernaryTrie<u64> = TernaryTrie::new();
    for (i, k) in keys.iter().enumerate() {
        base_rway.insert(k, i as u64).unwrap();
        base_tst.insert(k, i as u64).unwrap();
    }

    for_each_permutation(&keys, |perm| {
        let mut rway = base_rway.clone();
        let mut tst = base_tst.clone();

        for k in perm {
            let expected = rway.get(&k).unwrap().copied();
            assert!(expected.is_some());
            assert_eq!(rway.remove(&k).unwrap(), expected);
            assert_eq!(tst.remove(&k).unwrap(), expected);
            assert_eq!(rway.len(), tst.len());
            assert!(rway.verify_integrity().is_empty());
            assert!(tst.verify_integrity().is_empty());
        }
        assert!(rway.is_empty());
        assert_eq!(rway.node_count(), 1);
        assert_eq!(tst.node_count(), 0);
    });
}
