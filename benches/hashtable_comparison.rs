use alloc::format;
use core::hash::Hash;
use core::hash::Hasher;
use core::hint::black_box;

use arena_hash::ChainedTable;
use arena_hash::OpenTable;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::BenchmarkGroup;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::measurement::WallTime;
use hashbrown::hash_table::Entry as HashbrownEntry;
use hashbrown::hash_table::HashTable as HashbrownHashTable;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::distr;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

extern crate alloc;

trait KeyValuePair: Clone {
    fn new(key: u64) -> Self;

    fn hash_key(&self) -> u64;
    fn eq_key(&self, other: &Self) -> bool;
}

#[derive(Clone)]
struct TestItem {
    key: String,
    _value: u64,
}

impl KeyValuePair for TestItem {
    fn new(key: u64) -> Self {
        black_box(Self {
            key: format!("key_{:016X}", key),
            _value: key,
        })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[derive(Clone)]
struct SmallTestItem {
    key: u64,
}

impl KeyValuePair for SmallTestItem {
    fn new(key: u64) -> Self {
        black_box(Self { key })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[derive(Clone)]
struct LargeTestItem {
    key: String,
    _value: [u8; 256],
}

impl KeyValuePair for LargeTestItem {
    fn new(key: u64) -> Self {
        let mut value = [0u8; 256];
        for (i, byte) in value.iter_mut().enumerate() {
            *byte = ((key >> ((i % 8) * 8)) & 0xFF) as u8;
        }
        black_box(Self {
            key: format!("key_{:064b}", key),
            _value: value,
        })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

/// The operations every benchmark drives, implemented for each table under
/// comparison.
trait BenchTable<T: KeyValuePair> {
    const NAME: &'static str;

    fn with_capacity(capacity: usize) -> Self;
    fn capacity(&self) -> usize;
    /// Inserts `item`, or hands back the stored one when its key is present.
    fn upsert(&mut self, hash: u64, item: T) -> bool;
    /// Inserts `item`, or removes the stored one when its key is present.
    fn toggle(&mut self, hash: u64, item: T);
    fn find(&self, hash: u64, item: &T) -> Option<&T>;
    fn remove(&mut self, hash: u64, item: &T) -> Option<T>;
    fn iter_count(&self) -> usize;
    fn drain_count(&mut self) -> usize;
}

impl<T: KeyValuePair> BenchTable<T> for ChainedTable<T> {
    const NAME: &'static str = "chained";

    fn with_capacity(capacity: usize) -> Self {
        ChainedTable::with_capacity(capacity)
    }

    fn capacity(&self) -> usize {
        self.capacity()
    }

    fn upsert(&mut self, hash: u64, item: T) -> bool {
        match self.entry(hash, |v| v.eq_key(&item)) {
            arena_hash::chained_table::Entry::Vacant(entry) => {
                black_box(entry.insert(item));
                true
            }
            arena_hash::chained_table::Entry::Occupied(mut entry) => {
                *entry.get_mut() = item;
                false
            }
        }
    }

    fn toggle(&mut self, hash: u64, item: T) {
        match self.entry(hash, |v| v.eq_key(&item)) {
            arena_hash::chained_table::Entry::Vacant(entry) => {
                black_box(entry.insert(item));
            }
            arena_hash::chained_table::Entry::Occupied(entry) => {
                black_box(entry.remove());
            }
        }
    }

    fn find(&self, hash: u64, item: &T) -> Option<&T> {
        self.find(hash, |v| v.eq_key(item))
    }

    fn remove(&mut self, hash: u64, item: &T) -> Option<T> {
        self.remove(hash, |v| v.eq_key(item))
    }

    fn iter_count(&self) -> usize {
        self.iter().map(black_box).count()
    }

    fn drain_count(&mut self) -> usize {
        self.drain().map(black_box).count()
    }
}

impl<T: KeyValuePair> BenchTable<T> for OpenTable<T> {
    const NAME: &'static str = "open";

    fn with_capacity(capacity: usize) -> Self {
        OpenTable::with_capacity(capacity)
    }

    fn capacity(&self) -> usize {
        self.capacity()
    }

    fn upsert(&mut self, hash: u64, item: T) -> bool {
        match self.entry(hash, |v| v.eq_key(&item)) {
            arena_hash::open_table::Entry::Vacant(entry) => {
                black_box(entry.insert(item));
                true
            }
            arena_hash::open_table::Entry::Occupied(mut entry) => {
                *entry.get_mut() = item;
                false
            }
        }
    }

    fn toggle(&mut self, hash: u64, item: T) {
        match self.entry(hash, |v| v.eq_key(&item)) {
            arena_hash::open_table::Entry::Vacant(entry) => {
                black_box(entry.insert(item));
            }
            arena_hash::open_table::Entry::Occupied(entry) => {
                black_box(entry.remove());
            }
        }
    }

    fn find(&self, hash: u64, item: &T) -> Option<&T> {
        self.find(hash, |v| v.eq_key(item))
    }

    fn remove(&mut self, hash: u64, item: &T) -> Option<T> {
        self.remove(hash, |v| v.eq_key(item))
    }

    fn iter_count(&self) -> usize {
        self.iter().map(black_box).count()
    }

    fn drain_count(&mut self) -> usize {
        self.drain().map(black_box).count()
    }
}

impl<T: KeyValuePair> BenchTable<T> for HashbrownHashTable<T> {
    const NAME: &'static str = "hashbrown";

    fn with_capacity(capacity: usize) -> Self {
        HashbrownHashTable::with_capacity(capacity)
    }

    fn capacity(&self) -> usize {
        self.capacity()
    }

    fn upsert(&mut self, hash: u64, item: T) -> bool {
        match self.entry(hash, |v| v.eq_key(&item), |v| v.hash_key()) {
            HashbrownEntry::Vacant(entry) => {
                black_box(entry.insert(item));
                true
            }
            HashbrownEntry::Occupied(mut entry) => {
                *entry.get_mut() = item;
                false
            }
        }
    }

    fn toggle(&mut self, hash: u64, item: T) {
        match self.entry(hash, |v| v.eq_key(&item), |v| v.hash_key()) {
            HashbrownEntry::Vacant(entry) => {
                black_box(entry.insert(item));
            }
            HashbrownEntry::Occupied(entry) => {
                black_box(entry.remove().0);
            }
        }
    }

    fn find(&self, hash: u64, item: &T) -> Option<&T> {
        self.find(hash, |v| v.eq_key(item))
    }

    fn remove(&mut self, hash: u64, item: &T) -> Option<T> {
        self.find_entry(hash, |v| v.eq_key(item))
            .ok()
            .map(|entry| entry.remove().0)
    }

    fn iter_count(&self) -> usize {
        self.iter().map(black_box).count()
    }

    fn drain_count(&mut self) -> usize {
        self.drain().map(black_box).count()
    }
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 11),
    (1 << 12),
    (1 << 13),
    (1 << 14),
    (1 << 15),
    (1 << 16),
    (1 << 17),
    (1 << 18),
];

#[derive(Debug, Clone, Copy)]
enum Operation {
    Insert,
    Remove,
    Find,
}

fn new_group<'a>(c: &'a mut Criterion, name: &str, item: &str) -> BenchmarkGroup<'a, WallTime> {
    let mut group = c.benchmark_group(format!("{name}_{item}"));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    group
}

fn random_items<TestItem: KeyValuePair>(count: usize) -> Vec<(u64, TestItem)> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| {
            let key = rng.try_next_u64().unwrap();
            let item = TestItem::new(key);
            let hash = item.hash_key();
            (hash, item)
        })
        .collect()
}

fn sequential_items<TestItem: KeyValuePair>(keys: core::ops::Range<u64>) -> Vec<(u64, TestItem)> {
    keys.map(|key| {
        let item = TestItem::new(key);
        let hash = item.hash_key();
        (hash, item)
    })
    .collect()
}

fn filled<TestItem: KeyValuePair, Table: BenchTable<TestItem>>(
    hash_and_item: &[(u64, TestItem)],
) -> Table {
    let mut table = Table::with_capacity(0);
    for (hash, item) in hash_and_item.iter().cloned() {
        table.upsert(hash, item);
    }
    table
}

fn insert_random<TestItem: KeyValuePair, Table: BenchTable<TestItem>>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    hash_and_item: &[(u64, TestItem)],
    preallocate: bool,
) {
    let count = hash_and_item.len();
    group.throughput(Throughput::Elements(count as u64));
    group.bench_function(BenchmarkId::new(Table::NAME, count), |b| {
        b.iter_batched(
            || {
                let mut hash_and_item = hash_and_item.to_vec();
                hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                hash_and_item
            },
            |hash_and_item| {
                let mut table = Table::with_capacity(if preallocate { count } else { 0 });
                debug_assert!(!preallocate || table.capacity() >= count);
                for (hash, item) in hash_and_item {
                    table.upsert(hash, item);
                }
                black_box(table)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_random<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    for preallocate in [false, true] {
        let name = if preallocate {
            "insert_random_preallocated"
        } else {
            "insert_random"
        };
        let mut group = new_group(c, name, core::any::type_name::<TestItem>());

        for size in SIZES[..=MAX_SIZE].iter() {
            let hash_and_item = random_items::<TestItem>(*size);
            insert_random::<TestItem, ChainedTable<TestItem>>(
                &mut group,
                &hash_and_item,
                preallocate,
            );
            insert_random::<TestItem, OpenTable<TestItem>>(&mut group, &hash_and_item, preallocate);
            insert_random::<TestItem, HashbrownHashTable<TestItem>>(
                &mut group,
                &hash_and_item,
                preallocate,
            );
        }

        group.finish();
    }
}

fn find_hit_miss<TestItem: KeyValuePair, Table: BenchTable<TestItem>>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    present: &[(u64, TestItem)],
    probes: &[(u64, TestItem)],
) {
    let table: Table = filled(present);
    group.throughput(Throughput::Elements(probes.len() as u64));
    group.bench_function(BenchmarkId::new(Table::NAME, present.len()), |b| {
        b.iter(|| {
            for (hash, item) in probes {
                black_box(table.find(*hash, item));
            }
        })
    });
}

fn bench_find<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    for (name, hit_ratio) in [("find_hit", 1.0), ("find_miss", 0.0), ("find_hit_miss", 0.5)] {
        let mut group = new_group(c, name, core::any::type_name::<TestItem>());

        for size in SIZES[..=MAX_SIZE].iter() {
            let size = *size as u64;
            let present = sequential_items::<TestItem>(0..size);
            let absent = sequential_items::<TestItem>(size..size * 2);

            let mut rng = SmallRng::from_os_rng();
            let hit = distr::Bernoulli::new(hit_ratio).unwrap();
            let probes = (0..size as usize)
                .map(|i| {
                    if rng.sample(hit) {
                        present[i].clone()
                    } else {
                        absent[i].clone()
                    }
                })
                .collect::<Vec<_>>();

            find_hit_miss::<TestItem, ChainedTable<TestItem>>(&mut group, &present, &probes);
            find_hit_miss::<TestItem, OpenTable<TestItem>>(&mut group, &present, &probes);
            find_hit_miss::<TestItem, HashbrownHashTable<TestItem>>(
                &mut group, &present, &probes,
            );
        }

        group.finish();
    }
}

fn remove<TestItem: KeyValuePair, Table: BenchTable<TestItem>>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    hash_and_item: &[(u64, TestItem)],
) {
    let mut order = hash_and_item.to_vec();
    order.shuffle(&mut SmallRng::from_os_rng());

    group.throughput(Throughput::Elements(order.len() as u64));
    group.bench_function(BenchmarkId::new(Table::NAME, order.len()), |b| {
        b.iter_batched(
            || (filled::<TestItem, Table>(hash_and_item), order.clone()),
            |(mut table, order)| {
                for (hash, item) in order.iter() {
                    black_box(table.remove(*hash, item));
                }
                black_box(table)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = new_group(c, "remove", core::any::type_name::<TestItem>());

    for size in SIZES[..=MAX_SIZE].iter() {
        let hash_and_item = random_items::<TestItem>(*size);
        remove::<TestItem, ChainedTable<TestItem>>(&mut group, &hash_and_item);
        remove::<TestItem, OpenTable<TestItem>>(&mut group, &hash_and_item);
        remove::<TestItem, HashbrownHashTable<TestItem>>(&mut group, &hash_and_item);
    }

    group.finish();
}

fn iteration<TestItem: KeyValuePair, Table: BenchTable<TestItem>>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    hash_and_item: &[(u64, TestItem)],
) {
    let table: Table = filled(hash_and_item);
    group.throughput(Throughput::Elements(hash_and_item.len() as u64));
    group.bench_function(BenchmarkId::new(Table::NAME, hash_and_item.len()), |b| {
        b.iter(|| black_box(table.iter_count()))
    });
}

fn drain<TestItem: KeyValuePair, Table: BenchTable<TestItem>>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    hash_and_item: &[(u64, TestItem)],
) {
    group.throughput(Throughput::Elements(hash_and_item.len() as u64));
    group.bench_function(BenchmarkId::new(Table::NAME, hash_and_item.len()), |b| {
        b.iter_batched(
            || filled::<TestItem, Table>(hash_and_item),
            |mut table| {
                black_box(table.drain_count());
                black_box(table)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iteration<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut iter_group = new_group(c, "iteration", core::any::type_name::<TestItem>());
    for size in SIZES[..=MAX_SIZE].iter() {
        let hash_and_item = random_items::<TestItem>(*size);
        iteration::<TestItem, ChainedTable<TestItem>>(&mut iter_group, &hash_and_item);
        iteration::<TestItem, OpenTable<TestItem>>(&mut iter_group, &hash_and_item);
        iteration::<TestItem, HashbrownHashTable<TestItem>>(&mut iter_group, &hash_and_item);
    }
    iter_group.finish();

    let mut drain_group = new_group(c, "drain", core::any::type_name::<TestItem>());
    for size in SIZES[..=MAX_SIZE].iter() {
        let hash_and_item = random_items::<TestItem>(*size);
        drain::<TestItem, ChainedTable<TestItem>>(&mut drain_group, &hash_and_item);
        drain::<TestItem, OpenTable<TestItem>>(&mut drain_group, &hash_and_item);
        drain::<TestItem, HashbrownHashTable<TestItem>>(&mut drain_group, &hash_and_item);
    }
    drain_group.finish();
}

fn mixed_zipf<TestItem: KeyValuePair, Table: BenchTable<TestItem>>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    operations: &[Operation],
    size: usize,
) {
    const KEY_SPACE_MULTIPLIER: f32 = 2.0;

    let insert_distr = Zipf::new(size as f32 - 1.0, 1.0).unwrap();
    let find_remove_distr = Zipf::new(size as f32 * KEY_SPACE_MULTIPLIER - 1.0, 1.0).unwrap();

    group.throughput(Throughput::Elements(operations.len() as u64));
    group.bench_function(BenchmarkId::new(Table::NAME, size), |b| {
        let mut rng = SmallRng::from_os_rng();
        b.iter_batched(
            || {
                let mut operations = operations.to_vec();
                operations.shuffle(&mut SmallRng::from_os_rng());
                operations
            },
            |operations| {
                let mut table = Table::with_capacity(0);
                for operation in operations {
                    match operation {
                        Operation::Insert => {
                            let item = TestItem::new(rng.sample(insert_distr) as u64);
                            let hash = item.hash_key();
                            black_box(table.upsert(hash, item));
                        }
                        Operation::Remove => {
                            let item = TestItem::new(rng.sample(find_remove_distr) as u64);
                            let hash = item.hash_key();
                            black_box(table.remove(hash, &item));
                        }
                        Operation::Find => {
                            let item = TestItem::new(rng.sample(find_remove_distr) as u64);
                            let hash = item.hash_key();
                            black_box(table.find(hash, &item));
                        }
                    }
                }
                black_box(table)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_mixed_probabilistic_zipf<TestItem: KeyValuePair, const MAX_SIZE: usize>(
    c: &mut Criterion,
) {
    for exponent in [1.0, 1.3] {
        let mut group = new_group(
            c,
            &format!("mixed_probabilistic_zipf_{:.01}", exponent),
            core::any::type_name::<TestItem>(),
        );

        for size in SIZES[..=MAX_SIZE].iter() {
            let mut rng = SmallRng::from_os_rng();
            let op_distr = Zipf::new(3.0, exponent).unwrap();

            let operations = (0..size * 3)
                .map(|_| {
                    let op_choice: f64 = rng.sample(op_distr);
                    if op_choice <= 1.0 {
                        Operation::Find
                    } else if op_choice <= 2.0 {
                        Operation::Insert
                    } else {
                        Operation::Remove
                    }
                })
                .collect::<Vec<Operation>>();

            mixed_zipf::<TestItem, ChainedTable<TestItem>>(&mut group, &operations, *size);
            mixed_zipf::<TestItem, OpenTable<TestItem>>(&mut group, &operations, *size);
            mixed_zipf::<TestItem, HashbrownHashTable<TestItem>>(&mut group, &operations, *size);
        }

        group.finish();
    }
}

fn churn<TestItem: KeyValuePair, Table: BenchTable<TestItem>>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    insertions_and_removals: &[(u64, TestItem)],
) {
    group.throughput(Throughput::Elements(insertions_and_removals.len() as u64));
    let size = insertions_and_removals.len() / 2;
    group.bench_function(BenchmarkId::new(Table::NAME, size), |b| {
        b.iter_batched(
            || {
                let mut hash_and_item = insertions_and_removals.to_vec();
                hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                hash_and_item
            },
            |hash_and_item| {
                let mut table = Table::with_capacity(0);
                for (hash, item) in hash_and_item {
                    table.toggle(hash, item);
                }
                black_box(table)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_churn<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = new_group(c, "churn", core::any::type_name::<TestItem>());

    for size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_items::<TestItem>(*size);
        let insertions_and_removals = keys
            .iter()
            .cloned()
            .chain(keys.iter().cloned())
            .collect::<Vec<(u64, TestItem)>>();

        churn::<TestItem, ChainedTable<TestItem>>(&mut group, &insertions_and_removals);
        churn::<TestItem, OpenTable<TestItem>>(&mut group, &insertions_and_removals);
        churn::<TestItem, HashbrownHashTable<TestItem>>(&mut group, &insertions_and_removals);
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_mixed_probabilistic_zipf::<SmallTestItem, 8>,
    bench_mixed_probabilistic_zipf::<TestItem, 8>,
    bench_mixed_probabilistic_zipf::<LargeTestItem, 5>,
    bench_churn::<SmallTestItem, 8>,
    bench_churn::<TestItem, 8>,
    bench_churn::<LargeTestItem, 5>,
    bench_insert_random::<SmallTestItem, 8>,
    bench_insert_random::<TestItem, 8>,
    bench_insert_random::<LargeTestItem, 5>,
    bench_find::<SmallTestItem, 8>,
    bench_find::<TestItem, 8>,
    bench_find::<LargeTestItem, 5>,
    bench_remove::<SmallTestItem, 8>,
    bench_remove::<TestItem, 8>,
    bench_remove::<LargeTestItem, 5>,
    bench_iteration::<SmallTestItem, 8>,
    bench_iteration::<TestItem, 8>,
    bench_iteration::<LargeTestItem, 5>,
);

criterion_main!(benches);
