use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use slot_hashmap::{HashTable, KeyFns, Linked, MapItem};
use slotmap::{DefaultKey, SlotMap};
use std::time::Duration;

struct Rec {
    value: u64,
    item: MapItem<u64>,
}

impl Linked<u64> for Rec {
    fn map_item(&self) -> &MapItem<u64> {
        &self.item
    }
    fn map_item_mut(&mut self) -> &mut MapItem<u64> {
        &mut self.item
    }
}

type Store = SlotMap<DefaultKey, Rec>;
type Table = HashTable<u64>;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

// splitmix64 finalizer
fn mix(k: &u64) -> usize {
    let mut z = *k;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    (z ^ (z >> 31)) as usize
}

fn eq(a: &u64, b: &u64) -> bool {
    a == b
}

const OPS: KeyFns<u64> = KeyFns::new(mix, eq);

fn filled(seed: u64, n: usize) -> (Table, Store, Vec<u64>) {
    let mut store = Store::with_capacity(n);
    let mut t = Table::new(OPS);
    let keys: Vec<u64> = lcg(seed).take(n).collect();
    for (i, &k) in keys.iter().enumerate() {
        let h = store.insert(Rec {
            value: i as u64,
            item: MapItem::new(),
        });
        t.set(&mut store, k, h);
    }
    (t, store, keys)
}

fn pick(keys: &[u64], count: usize) -> Vec<u64> {
    let mut s = 0x9e3779b97f4a7c15u64;
    (0..count)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            keys[(s as usize) % keys.len()]
        })
        .collect()
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("table::insert_fresh_100k", |b| {
        b.iter_batched(
            || {
                let mut store = Store::with_capacity(100_000);
                let handles: Vec<DefaultKey> = (0..100_000u64)
                    .map(|value| {
                        store.insert(Rec {
                            value,
                            item: MapItem::new(),
                        })
                    })
                    .collect();
                (store, handles)
            },
            |(mut store, handles)| {
                let mut t = Table::new(OPS);
                for (h, k) in handles.into_iter().zip(lcg(1)) {
                    t.set(&mut store, k, h);
                }
                black_box((t, store))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_presized_100k(c: &mut Criterion) {
    c.bench_function("table::insert_presized_100k", |b| {
        b.iter_batched(
            || {
                let mut store = Store::with_capacity(100_000);
                let handles: Vec<DefaultKey> = (0..100_000u64)
                    .map(|value| {
                        store.insert(Rec {
                            value,
                            item: MapItem::new(),
                        })
                    })
                    .collect();
                // Room for every key, so the table never fills.
                let t = Table::unmanaged(OPS, 1 << 18);
                (t, store, handles)
            },
            |(mut t, mut store, handles)| {
                for (h, k) in handles.into_iter().zip(lcg(3)) {
                    t.set(&mut store, k, h);
                }
                black_box((t, store))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_delete_random_10k(c: &mut Criterion) {
    c.bench_function("table::delete_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let (t, store, keys) = filled(5, 110_000);
                let mut sel = std::collections::HashSet::with_capacity(10_000);
                let mut to_remove = Vec::with_capacity(10_000);
                for k in pick(&keys, 40_000) {
                    if to_remove.len() < 10_000 && sel.insert(k) {
                        to_remove.push(k);
                    }
                }
                (t, store, to_remove)
            },
            |(mut t, mut store, to_remove)| {
                for k in &to_remove {
                    black_box(t.delete(&mut store, k));
                }
                black_box((t, store))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("table::get_hit_10k_on_100k", |b| {
        let (t, store, keys) = filled(7, 100_000);
        let queries = pick(&keys, 10_000);
        b.iter(|| {
            for k in &queries {
                black_box(t.get(&store, k));
            }
        })
    });
}

fn bench_get_miss_10k(c: &mut Criterion) {
    c.bench_function("table::get_miss_10k_on_100k", |b| {
        let (t, store, _) = filled(11, 100_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for k in miss.by_ref().take(10_000) {
                black_box(t.get(&store, &k));
            }
        })
    });
}

fn bench_rehash_100k(c: &mut Criterion) {
    c.bench_function("table::rehash_100k", |b| {
        b.iter_batched(
            || filled(13, 100_000),
            |(mut t, mut store, _)| {
                t.rehash(&mut store, OPS);
                black_box((t, store))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iter_100k(c: &mut Criterion) {
    c.bench_function("table::iter_all_100k", |b| {
        let (t, store, _) = filled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, h) in t.iter(&store) {
                sum = sum.wrapping_add(store[h].value);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_presized_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_delete_random_10k,
              bench_get_hit_10k,
              bench_get_miss_10k,
              bench_rehash_100k,
              bench_iter_100k
}
criterion_main!(benches_insert, benches_ops);
