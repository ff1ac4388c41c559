#![cfg(test)]

// Property tests for HashMap kept inside the crate so they can check the
// bucket contents against the running count.

use crate::hash_eq::HashEq;
use crate::hash_map::HashMap;
use crate::Hashed;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap as StdHashMap};

// Pool-indexed operations: indices shrink to earlier keys, op lists shrink
// in length.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    PutIfAbsent(usize, i32),
    Remove(usize),
    Get(usize),
    ContainsValue(i32),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let small = -4i32..4;
        let op = prop_oneof![
            4 => (idx.clone(), small.clone()).prop_map(|(i, v)| Op::Put(i, v)),
            2 => (idx.clone(), small.clone()).prop_map(|(i, v)| Op::PutIfAbsent(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => small.clone().prop_map(Op::ContainsValue),
            1 => (idx.clone(), small.clone()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drive `sut` and a std model through the same operations. Invariants checked
// after every step:
// - return values of put/put_if_absent/remove/get match the model;
// - `len` equals the model's size and the sum of bucket lengths;
// - iteration yields each live key exactly once.
fn run_against_model<K, S>(
    mut sut: HashMap<K, i32, S>,
    wrap: impl Fn(&str) -> K,
    unwrap: impl Fn(&K) -> String,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    K: HashEq,
    S: BuildHasher,
{
    let mut model: StdHashMap<String, i32> = StdHashMap::new();
    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = &pool[i];
                prop_assert_eq!(sut.put(wrap(k.as_str()), v), model.insert(k.clone(), v));
            }
            Op::PutIfAbsent(i, v) => {
                let k = &pool[i];
                let expected = model.get(k).copied();
                if expected.is_none() {
                    model.insert(k.clone(), v);
                }
                prop_assert_eq!(sut.put_if_absent(wrap(k.as_str()), v).copied(), expected);
            }
            Op::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(&wrap(k.as_str())), model.remove(k));
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(&wrap(k.as_str())).copied(), model.get(k).copied());
                prop_assert_eq!(sut.contains_key(&wrap(k.as_str())), model.contains_key(k));
            }
            Op::ContainsValue(v) => {
                prop_assert_eq!(sut.contains_value(&v), model.values().any(|x| *x == v));
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(&wrap(k.as_str())), model.get_mut(k)) {
                    (Some(s), Some(m)) => {
                        *s = s.saturating_add(d);
                        *m = m.saturating_add(d);
                    }
                    (None, None) => {}
                    _ => {
                        prop_assert!(false, "presence differs for {:?}", k);
                    }
                }
            }
            Op::Iterate => {
                let keys: Vec<String> = sut.keys().map(&unwrap).collect();
                let unique: BTreeSet<String> = keys.iter().cloned().collect();
                prop_assert_eq!(keys.len(), unique.len(), "a key was yielded twice");
                let m_keys: BTreeSet<String> = model.keys().cloned().collect();
                prop_assert_eq!(unique, m_keys);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.len(), sut.entries_in_buckets());
        prop_assert_eq!(sut.iter().count(), sut.len());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_against_model(
            HashMap::new(),
            |s| s.to_string(),
            |k: &String| k.clone(),
            &pool,
            ops,
        )?;
    }
}

// Index hasher that sends every bucket code to the same slot of the index.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Same state machine under worst-case collisions on both levels: keys hash
// by length only (many keys per bucket) and the bucket index hasher is
// constant.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_against_model(
            HashMap::with_hasher(ConstBuildHasher),
            |s| Hashed::with_hash_fn(s.to_string(), |v: &String| v.len() as i64),
            |k: &Hashed<String>| k.value().clone(),
            &pool,
            ops,
        )?;
    }
}

// Property: a clone evolves independently; the original's entries and
// their order are untouched by anything done to the clone.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_clone_is_independent(
        (pool, ops) in arb_scenario(),
        extra in proptest::collection::vec((0usize..8, -4i32..4, any::<bool>()), 0..20),
    ) {
        let mut original: HashMap<String, i32> = HashMap::new();
        for op in ops {
            if let Op::Put(i, v) = op {
                original.put(pool[i].clone(), v);
            }
        }
        let snapshot: Vec<(String, i32)> =
            original.iter().map(|(k, v)| (k.clone(), *v)).collect();

        let mut copy = original.clone();
        for (i, v, remove) in extra {
            let k = pool[i % pool.len()].clone();
            if remove {
                copy.remove(&k);
            } else {
                copy.put(k, v);
            }
        }

        let after: Vec<(String, i32)> =
            original.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(snapshot, after);
        prop_assert_eq!(original.len(), original.entries_in_buckets());
        prop_assert_eq!(copy.len(), copy.entries_in_buckets());
    }
}
