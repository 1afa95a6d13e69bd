//! chain-table: a single-owner hash table with separate chaining and
//! caller-supplied hash, equality and print strategies.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a reusable associative-storage primitive whose key behavior is
//!   supplied at construction instead of through `Hash`/`Eq` alone.
//! - Layers:
//!   - `TableStrategy<K, V>`: the capability bundle (hash against a given
//!     capacity, key equality, entry printing). `Callbacks` builds one from
//!     three functions; `HashedStrategy` derives one from `Hash + Eq + Debug`.
//!   - `chain`: entry nodes stored in a `SlotMap` arena; each bucket is the
//!     head of a singly linked chain through `Entry::next`.
//!   - `ChainedTable<K, V, S>`: bucket array, lookup, insert with growth,
//!     removal, diagnostics.
//!
//! Constraints
//! - Single owner: mutation takes `&mut self`. Sharing a table across
//!   threads needs external synchronization and is outside its contract.
//! - Lookups, inserts and removals cost O(chain length); the load-factor
//!   bound keeps that amortized O(1) for a well-spread hash.
//! - Bucket indices are never cached: the strategy is consulted with the
//!   live capacity on every operation.
//!
//! Growth
//! - The insert that makes `len >= 0.75 * capacity` completes, then the
//!   table grows to `2 * capacity + 1` buckets. Both the threshold and the
//!   growth rule are fixed.
//! - Growth relinks arena keys into a fresh bucket array; entries are never
//!   copied or re-allocated, and relative chain order is kept per bucket.
//!   Growth is not incremental, so a growing `put` costs O(len).
//!
//! Ownership
//! - The table owns its bucket array and entry nodes. It stores `K` and `V`
//!   by value; instantiate it with borrowed handles (`&'a T`) to leave the
//!   payloads with the caller, and the borrow checker keeps them alive for
//!   as long as the table can reach them.
//! - Release is flat (arena plus bucket array), so long chains do not
//!   deepen the stack on drop or `destroy`.
//!
//! Failure model
//! - Zero capacity is rejected with `TableError::ZeroCapacity`.
//! - A strategy returning an index outside `[0, capacity)` or a broken chain
//!   link panics immediately.
//! - Missing keys are `None`, not errors. Allocation failure aborts.
//!
//! Notes and non-goals
//! - No iteration-order guarantee.
//! - No persistence or serialization.
//! - The table never shrinks, including after `remove`.

mod chain;
mod chained_table;
mod chained_table_proptest;
mod error;
#[cfg(feature = "stats")]
mod stats;
pub mod strategy;

// Public surface
pub use chained_table::{
    ChainedTable, Iter, IterMut, CHAIN_MARKER, LOAD_FACTOR_DENOMINATOR, LOAD_FACTOR_NUMERATOR,
};
pub use error::TableError;
#[cfg(feature = "stats")]
pub use stats::ChainStats;
pub use strategy::{Callbacks, HashedStrategy, TableStrategy};
