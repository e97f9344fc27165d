#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A growable array with explicit capacity control, used as the backing store
/// for both tables.
pub mod arena_array;

/// A separate-chaining hash table whose chains are index links into a single
/// compacting pool.
///
/// This is the raw layer under [`ChainedHashMap`]: callers supply the hash and
/// an equality predicate.
pub mod chained_table;

/// A linear-probing hash table with tombstone deletion.
///
/// This is the raw layer under [`OpenHashMap`]: callers supply the hash and an
/// equality predicate.
pub mod open_table;

/// A HashMap backed by [`ChainedTable`].
pub mod chained_map;

/// A HashMap backed by [`OpenTable`].
pub mod open_map;

mod map;

/// Table shape snapshots and histogram printing.
#[cfg(any(test, feature = "stats"))]
pub mod stats;

pub use arena_array::ArenaArray;
pub use chained_map::ChainedHashMap;
pub use chained_table::ChainedTable;
pub use map::AssociativeMap;
pub use map::DEFAULT_LOAD_FACTOR;
pub use map::DefaultHashBuilder;
pub use map::MIN_LOAD_FACTOR;
pub use map::MIN_TABLE_SIZE;
pub use open_map::OpenHashMap;
pub use open_table::OpenTable;
#[cfg(any(test, feature = "stats"))]
pub use stats::TableStats;
