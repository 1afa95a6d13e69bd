//! ChainedTable: separate-chaining hash table driven by a strategy bundle.

use crate::chain::{corrupt_chain, Chain, Entry, EntryKey, Slots};
use crate::error::TableError;
use crate::strategy::{Callbacks, HashedStrategy, TableStrategy};
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use log::{debug, trace, warn};
use std::io::{self, Write};

/// Growth triggers once `len / capacity` reaches
/// `LOAD_FACTOR_NUMERATOR / LOAD_FACTOR_DENOMINATOR`.
pub const LOAD_FACTOR_NUMERATOR: usize = 3;
pub const LOAD_FACTOR_DENOMINATOR: usize = 4;

/// Written between successive entries of one bucket by `write_table`.
pub const CHAIN_MARKER: &str = "    ->";

/// Hash table with separate chaining and caller-supplied strategies.
///
/// Buckets hold the head of a singly linked chain of entries. A `put` that
/// brings the load factor to 0.75 grows the table to `2 * capacity + 1`
/// buckets and relinks every entry before returning.
pub struct ChainedTable<K, V, S = HashedStrategy> {
    strategy: S,
    buckets: Vec<Option<EntryKey>>,
    slots: Slots<K, V>, // entry nodes; chains link through `Entry::next`
}

/// Outcome of scanning one chain for a key.
enum Probe {
    Found {
        at: EntryKey,
        prev: Option<EntryKey>,
    },
    Vacant {
        tail: Option<EntryKey>,
    },
}

#[track_caller]
fn checked_bucket<K, V, S>(strategy: &S, key: &K, capacity: usize) -> usize
where
    S: TableStrategy<K, V>,
{
    let index = strategy.hash(key, capacity);
    assert!(
        index < capacity,
        "hash strategy returned bucket {} for a table of {} buckets",
        index,
        capacity
    );
    index
}

impl<K, V> ChainedTable<K, V>
where
    K: Hash + Eq + fmt::Debug,
    V: fmt::Debug,
{
    pub fn with_capacity(initial_capacity: usize) -> Result<Self, TableError> {
        Self::new(initial_capacity, HashedStrategy::new())
    }
}

impl<K, V, B> ChainedTable<K, V, HashedStrategy<B>>
where
    K: Hash + Eq + fmt::Debug,
    V: fmt::Debug,
    B: BuildHasher,
{
    pub fn with_capacity_and_hasher(
        initial_capacity: usize,
        build_hasher: B,
    ) -> Result<Self, TableError> {
        Self::new(initial_capacity, HashedStrategy::with_hasher(build_hasher))
    }
}

impl<K, V, H, E, P> ChainedTable<K, V, Callbacks<H, E, P>>
where
    H: Fn(&K, usize) -> usize,
    E: Fn(&K, &K) -> bool,
    P: Fn(&K, &V, &mut dyn io::Write) -> io::Result<()>,
{
    /// Build a table from a hash function, an equality predicate and an
    /// entry printer.
    pub fn with_callbacks(
        initial_capacity: usize,
        hash: H,
        equal: E,
        print: P,
    ) -> Result<Self, TableError> {
        Self::new(initial_capacity, Callbacks::new::<K, V>(hash, equal, print))
    }
}

/// Iterator over `(&K, &V)` pairs. Order is unspecified.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, EntryKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Iterator over `(&K, &mut V)` pairs. Order is unspecified.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, EntryKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V, S> ChainedTable<K, V, S>
where
    S: TableStrategy<K, V>,
{
    /// Create an empty table with `initial_capacity` buckets.
    pub fn new(initial_capacity: usize, strategy: S) -> Result<Self, TableError> {
        if initial_capacity == 0 {
            return Err(TableError::ZeroCapacity);
        }
        trace!("creating chained table with {} buckets", initial_capacity);
        Ok(Self {
            strategy,
            buckets: vec![None; initial_capacity],
            slots: Slots::with_key(),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    #[track_caller]
    fn bucket_of(&self, key: &K) -> usize {
        checked_bucket::<K, V, S>(&self.strategy, key, self.buckets.len())
    }

    fn chain(&self, bucket: usize) -> Chain<'_, K, V> {
        Chain::new(&self.slots, bucket, self.buckets[bucket])
    }

    fn probe(&self, bucket: usize, key: &K) -> Probe {
        let mut prev = None;
        for (at, entry) in self.chain(bucket) {
            if self.strategy.equal(key, &entry.key) {
                return Probe::Found { at, prev };
            }
            prev = Some(at);
        }
        Probe::Vacant { tail: prev }
    }

    fn find(&self, key: &K) -> Option<EntryKey> {
        match self.probe(self.bucket_of(key), key) {
            Probe::Found { at, .. } => Some(at),
            Probe::Vacant { .. } => None,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|at| &self.slots[at].value)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|at| {
            let e = &self.slots[at];
            (&e.key, &e.value)
        })
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let at = self.find(key)?;
        Some(&mut self.slots[at].value)
    }

    /// Insert `key -> value`, or replace the value of an equal key in place.
    ///
    /// Returns the replaced value, if any. A new key is appended to the tail
    /// of its chain; if that brings the load factor to 0.75 the table grows
    /// to `2 * capacity + 1` buckets before returning.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let bucket = self.bucket_of(&key);
        match self.probe(bucket, &key) {
            Probe::Found { at, .. } => {
                return Some(mem::replace(&mut self.slots[at].value, value));
            }
            Probe::Vacant { tail } => {
                let at = self.slots.insert(Entry {
                    key,
                    value,
                    next: None,
                });
                self.link_after(bucket, tail, at);
            }
        }
        if self.at_load_limit() {
            self.grow();
        }
        None
    }

    fn link_after(&mut self, bucket: usize, tail: Option<EntryKey>, at: EntryKey) {
        match tail {
            None if self.buckets[bucket].is_none() => self.buckets[bucket] = Some(at),
            None => corrupt_chain(bucket),
            Some(t) => match self.slots.get_mut(t) {
                Some(last) if last.next.is_none() => last.next = Some(at),
                _ => corrupt_chain(bucket),
            },
        }
    }

    fn at_load_limit(&self) -> bool {
        self.len() * LOAD_FACTOR_DENOMINATOR >= self.capacity() * LOAD_FACTOR_NUMERATOR
    }

    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity * 2 + 1;
        debug!(
            "growing chained table from {} to {} buckets ({} entries)",
            old_capacity,
            new_capacity,
            self.len()
        );
        self.rehash(new_capacity);
    }

    /// Relink every entry into a fresh array of `new_capacity` buckets,
    /// keeping chain order within each destination bucket.
    fn rehash(&mut self, new_capacity: usize) {
        let old_buckets = mem::replace(&mut self.buckets, vec![None; new_capacity]);
        let mut tails: Vec<Option<EntryKey>> = vec![None; new_capacity];

        for (old_bucket, head) in old_buckets.into_iter().enumerate() {
            let mut cursor = head;
            while let Some(at) = cursor {
                let entry = match self.slots.get_mut(at) {
                    Some(entry) => entry,
                    None => corrupt_chain(old_bucket),
                };
                cursor = entry.next.take();
                let bucket = checked_bucket::<K, V, S>(&self.strategy, &entry.key, new_capacity);
                match tails[bucket] {
                    Some(tail) => self.slots[tail].next = Some(at),
                    None => self.buckets[bucket] = Some(at),
                }
                tails[bucket] = Some(at);
            }
        }
    }

    /// Unlink and return the entry for `key`. The table never shrinks.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let bucket = self.bucket_of(key);
        let Probe::Found { at, prev } = self.probe(bucket, key) else {
            return None;
        };
        let entry = match self.slots.remove(at) {
            Some(entry) => entry,
            None => corrupt_chain(bucket),
        };
        match prev {
            Some(p) => self.slots[p].next = entry.next,
            None => self.buckets[bucket] = entry.next,
        }
        Some((entry.key, entry.value))
    }

    /// Release every entry node and the bucket array.
    ///
    /// Keys and values are dropped with their entries; when they are
    /// borrowed handles (`&T`), the pointees are left untouched.
    pub fn destroy(self) {
        trace!(
            "destroying chained table ({} entries, {} buckets)",
            self.len(),
            self.capacity()
        );
        drop(self);
    }

    /// Write every chain to `out`, bucket by bucket, separating entries of
    /// the same bucket with `CHAIN_MARKER`.
    pub fn write_table<W: Write>(&self, mut out: W) -> io::Result<()> {
        for bucket in 0..self.buckets.len() {
            let mut chain = self.chain(bucket).peekable();
            while let Some((_, entry)) = chain.next() {
                self.strategy.print(&entry.key, &entry.value, &mut out)?;
                if chain.peek().is_some() {
                    out.write_all(CHAIN_MARKER.as_bytes())?;
                }
            }
        }
        out.flush()
    }

    /// `write_table` to stdout. Write failures are logged, not returned.
    pub fn print_table(&self) {
        let stdout = io::stdout();
        if let Err(e) = self.write_table(stdout.lock()) {
            warn!("failed to print chained table: {}", e);
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    /// Length of every chain, in bucket order.
    #[cfg_attr(not(feature = "stats"), allow(dead_code))]
    pub(crate) fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.buckets.len()).map(move |bucket| self.chain(bucket).count())
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedTable<K, V, S>
where
    S: TableStrategy<K, V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> fmt::Debug for ChainedTable<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
    S: TableStrategy<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
