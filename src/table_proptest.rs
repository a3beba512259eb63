#![cfg(test)]

// Property tests for HashTable kept inside the crate so invariants on the
// raw slot array can be checked alongside the public API.

use crate::config::Management;
use crate::item::{ItemStore, Linked, MapItem};
use crate::ops::KeyFns;
use crate::table::HashTable;
use hashbrown::HashMap;
use proptest::prelude::*;
use slotmap::{DefaultKey, SlotMap};
use std::collections::BTreeSet;

struct Rec {
    tag: u32,
    item: MapItem<u8>,
}

impl Linked<u8> for Rec {
    fn map_item(&self) -> &MapItem<u8> {
        &self.item
    }
    fn map_item_mut(&mut self) -> &mut MapItem<u8> {
        &mut self.item
    }
}

fn ident(k: &u8) -> usize {
    *k as usize
}
fn constant(_: &u8) -> usize {
    3
}
fn mod3(k: &u8) -> usize {
    (*k % 3) as usize
}
// Large values so the modulo wraps differently at every capacity.
fn spread(k: &u8) -> usize {
    (*k as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15) as usize
}
fn eq(a: &u8, b: &u8) -> bool {
    a == b
}

const HASHES: [fn(&u8) -> usize; 4] = [ident, constant, mod3, spread];

#[derive(Clone, Debug)]
enum Op {
    Set(u8),
    Delete(u8),
    Get(u8),
    Rehash(usize),
    Adjust(usize),
    Iterate,
}

fn arb_ops(pool: u8) -> impl Strategy<Value = Vec<Op>> {
    let key = 0..pool;
    let op = prop_oneof![
        4 => key.clone().prop_map(Op::Set),
        3 => key.clone().prop_map(Op::Delete),
        2 => key.prop_map(Op::Get),
        1 => (0..HASHES.len()).prop_map(Op::Rehash),
        1 => (0usize..8).prop_map(Op::Adjust),
        1 => Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..120)
}

fn check_invariants(
    t: &HashTable<u8>,
    store: &SlotMap<DefaultKey, Rec>,
    model: &HashMap<u8, DefaultKey>,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(t.len(), model.len());
    prop_assert!(t.len() <= t.capacity());
    prop_assert_eq!(t.handles().count(), model.len());
    // Every modelled key is reachable from its own home slot.
    for (k, &h) in model {
        prop_assert_eq!(t.get(store, k), Some(h));
        prop_assert!(t.holds(store, h));
        prop_assert_eq!(store.marker(h).key(), Some(k));
    }
    // Items not in the model are detached.
    for (h, r) in store {
        let live = model.values().any(|&m| m == h);
        prop_assert_eq!(r.item.is_attached(), live);
    }
    Ok(())
}

fn run(ops: Vec<Op>, management: Option<Management>, capacity: usize) -> Result<(), TestCaseError> {
    let mut store: SlotMap<DefaultKey, Rec> = SlotMap::new();
    let mut t: HashTable<u8> = match management {
        Some(m) => HashTable::with_management(KeyFns::new(ident, eq), capacity, m),
        None => HashTable::unmanaged(KeyFns::new(ident, eq), capacity),
    };
    let mut model: HashMap<u8, DefaultKey> = HashMap::new();
    let mut next_tag = 0u32;

    for op in ops {
        match op {
            Op::Set(k) => {
                // `set` needs a free slot even when the key is already stored.
                if !t.is_managed() && t.len() == t.capacity() {
                    let grown = t.capacity() * 2;
                    t.adjust_capacity(&mut store, grown);
                }
                next_tag += 1;
                let h = store.insert(Rec {
                    tag: next_tag,
                    item: MapItem::new(),
                });
                let displaced = t.set(&mut store, k, h);
                let prev = model.insert(k, h);
                prop_assert_eq!(displaced, prev);
                if let Some(old) = displaced {
                    prop_assert!(!store[old].item.is_attached());
                    prop_assert!(store[old].item.key().is_none());
                    store.remove(old);
                }
            }
            Op::Delete(k) => {
                let removed = t.delete(&mut store, &k);
                prop_assert_eq!(removed, model.remove(&k));
                if let Some(h) = removed {
                    prop_assert_eq!(store[h].item.clone(), MapItem::new());
                    store.remove(h);
                }
            }
            Op::Get(k) => {
                let got = t.get(&store, &k);
                prop_assert_eq!(got, model.get(&k).copied());
                prop_assert_eq!(t.has(&store, &k), got.is_some());
                if let Some(h) = got {
                    prop_assert!(store[h].tag > 0);
                }
            }
            Op::Rehash(i) => {
                let capacity = t.capacity();
                let _ = t.rehash(&mut store, KeyFns::new(HASHES[i], eq));
                prop_assert_eq!(t.capacity(), capacity);
            }
            Op::Adjust(extra) => {
                if !t.is_managed() {
                    let capacity = (t.len() + extra).max(1);
                    t.adjust_capacity(&mut store, capacity);
                    prop_assert_eq!(t.capacity(), capacity);
                }
            }
            Op::Iterate => {
                let seen: BTreeSet<u8> = t.iter(&store).map(|(k, _)| *k).collect();
                let expected: BTreeSet<u8> = model.keys().copied().collect();
                prop_assert_eq!(seen, expected);
            }
        }

        check_invariants(&t, &store, &model)?;
        if let Some(m) = t.management() {
            prop_assert!(t.capacity() >= m.min_capacity().min(capacity));
            prop_assert!(t.load_factor() <= m.max_load());
        }
    }
    Ok(())
}

// Property: state-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences, under identity,
// constant, clustered and scattered hashes:
// - `set` returns exactly the item the model held under that key, detached.
// - `get`/`has` agree with the model; no false negatives after deletes
//   inside collision runs, wraps, rehashes or capacity changes.
// - Item markers are attached iff the item is live in the model.
// - Managed tables stay at or under `max_load` after every mutation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_unmanaged_matches_model(ops in arb_ops(12), capacity in 1usize..16) {
        run(ops, None, capacity)?;
    }

    #[test]
    fn prop_managed_matches_model(ops in arb_ops(40), capacity in 2usize..9) {
        run(ops, Some(Management::new(0.2, 0.6, 2)), capacity)?;
    }
}
