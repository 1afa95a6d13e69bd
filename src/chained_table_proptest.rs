#![cfg(test)]

// Property tests for ChainedTable kept inside the crate so they can check
// chain structure directly.

use crate::chained_table::ChainedTable;
use crate::strategy::TableStrategy;
use hashbrown::HashMap;
use proptest::prelude::*;
use std::io;

// Weak on purpose: keys of equal length collide, so chains get long.
fn length_hash(k: &String, capacity: usize) -> usize {
    k.len() % capacity
}

fn colliding_table(
    capacity: usize,
) -> ChainedTable<String, i32, impl TableStrategy<String, i32>> {
    ChainedTable::with_callbacks(
        capacity,
        length_hash,
        |a: &String, b: &String| a == b,
        |k: &String, v: &i32, out: &mut dyn io::Write| write!(out, "{}={}", k, v),
    )
    .unwrap()
}

// Pool-indexed operations so shrinking moves toward earlier keys.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Get(usize),
    Contains(String),
    Remove(usize),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<Op>)> {
    (1usize..=8, proptest::collection::vec("[a-z]{0,6}", 1..=16)).prop_flat_map(
        |(capacity, pool)| {
            let idx = proptest::sample::select((0..pool.len()).collect::<Vec<_>>());
            let op = prop_oneof![
                3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
                1 => idx.clone().prop_map(Op::Get),
                1 => "[a-z]{0,6}".prop_map(Op::Contains),
                1 => idx.clone().prop_map(Op::Remove),
                1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
                1 => Just(Op::Iterate),
            ];
            proptest::collection::vec(op, 1..80)
                .prop_map(move |ops| (capacity, pool.clone(), ops))
        },
    )
}

// Property: state-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences:
// - `put` returns the replaced value exactly when the key was present.
// - `get`/`contains` parity with the model, including never-inserted keys.
// - `len` equals the number of distinct live keys and the number of entries
//   reachable through the chains.
// - Capacity follows the 3/4 load rule with `2n + 1` growth and never shrinks.
// - After every operation `len < 0.75 * capacity`.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, pool, ops) in arb_scenario()) {
        let mut sut = colliding_table(capacity);
        let mut model: HashMap<String, i32> = HashMap::new();
        let mut expected_capacity = capacity;

        for op in ops {
            match op {
                Op::Put(i, v) => {
                    let k = pool[i].clone();
                    let prev = sut.put(k.clone(), v);
                    let was_new = !model.contains_key(&k);
                    prop_assert_eq!(prev, model.insert(k, v));
                    if was_new && model.len() * 4 >= expected_capacity * 3 {
                        expected_capacity = expected_capacity * 2 + 1;
                    }
                }
                Op::Get(i) => {
                    prop_assert_eq!(sut.get(&pool[i]), model.get(&pool[i]));
                }
                Op::Contains(s) => {
                    prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
                }
                Op::Remove(i) => {
                    let got = sut.remove(&pool[i]);
                    let want = model.remove_entry(&pool[i]);
                    prop_assert_eq!(got, want);
                }
                Op::Mutate(i, d) => {
                    if let Some(v) = sut.get_mut(&pool[i]) {
                        *v = v.wrapping_add(d);
                    }
                    if let Some(v) = model.get_mut(&pool[i]) {
                        *v = v.wrapping_add(d);
                    }
                }
                Op::Iterate => {
                    let mut seen: Vec<(String, i32)> =
                        sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    let mut want: Vec<(String, i32)> =
                        model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    seen.sort();
                    want.sort();
                    prop_assert_eq!(seen, want);
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert_eq!(sut.capacity(), expected_capacity);
            prop_assert_eq!(sut.chain_lengths().sum::<usize>(), sut.len());
            prop_assert!(sut.len() * 4 < sut.capacity() * 3);
        }

        for k in &pool {
            prop_assert_eq!(sut.get(k), model.get(k));
        }
    }
}

// Property: repeating the same `put` never changes `len` or capacity.
proptest! {
    #[test]
    fn prop_repeated_put_is_idempotent(
        keys in proptest::collection::vec("[a-z]{1,4}", 1..24),
        repeats in 1usize..4,
    ) {
        let mut sut = colliding_table(3);
        for k in &keys {
            sut.put(k.clone(), 7);
        }
        let len = sut.len();
        let capacity = sut.capacity();
        for _ in 0..repeats {
            for k in &keys {
                prop_assert_eq!(sut.put(k.clone(), 7), Some(7));
            }
        }
        prop_assert_eq!(sut.len(), len);
        prop_assert_eq!(sut.capacity(), capacity);
    }
}
