//! Strategy bundles: how a table hashes, compares and prints its keys.
//!
//! A table is parameterized by one `TableStrategy` value supplied at
//! construction. Two bundles ship with the crate:
//! - `Callbacks`: three caller-supplied functions, one per capability.
//! - `HashedStrategy`: derives all three from `Hash`, `Eq` and `Debug`.

use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use std::io;

/// The capability bundle a `ChainedTable` consults for every key operation.
pub trait TableStrategy<K, V> {
    /// Map `key` to a bucket index. Must be deterministic and return a
    /// value in `[0, capacity)`; the table re-invokes it with the live
    /// capacity on every operation and after every resize.
    fn hash(&self, key: &K, capacity: usize) -> usize;

    /// Key identity. Two keys that compare equal must hash to the same
    /// bucket for every capacity.
    fn equal(&self, a: &K, b: &K) -> bool;

    /// Write one entry for diagnostics.
    fn print(&self, key: &K, value: &V, out: &mut dyn io::Write) -> io::Result<()>;
}

/// Strategy built from three functions: hash, equality and print.
#[derive(Clone, Copy)]
pub struct Callbacks<H, E, P> {
    hash: H,
    equal: E,
    print: P,
}

impl<H, E, P> Callbacks<H, E, P> {
    pub fn new<K, V>(hash: H, equal: E, print: P) -> Self
    where
        H: Fn(&K, usize) -> usize,
        E: Fn(&K, &K) -> bool,
        P: Fn(&K, &V, &mut dyn io::Write) -> io::Result<()>,
    {
        Self { hash, equal, print }
    }
}

impl<H, E, P> fmt::Debug for Callbacks<H, E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

impl<K, V, H, E, P> TableStrategy<K, V> for Callbacks<H, E, P>
where
    H: Fn(&K, usize) -> usize,
    E: Fn(&K, &K) -> bool,
    P: Fn(&K, &V, &mut dyn io::Write) -> io::Result<()>,
{
    #[inline]
    fn hash(&self, key: &K, capacity: usize) -> usize {
        (self.hash)(key, capacity)
    }

    #[inline]
    fn equal(&self, a: &K, b: &K) -> bool {
        (self.equal)(a, b)
    }

    fn print(&self, key: &K, value: &V, out: &mut dyn io::Write) -> io::Result<()> {
        (self.print)(key, value, out)
    }
}

/// Strategy for ordinary Rust keys: a `BuildHasher` digest reduced modulo
/// the capacity, `Eq` for identity, and `Debug` output, one entry per line.
#[derive(Clone, Debug, Default)]
pub struct HashedStrategy<B = RandomState> {
    build_hasher: B,
}

impl HashedStrategy {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<B> HashedStrategy<B> {
    pub fn with_hasher(build_hasher: B) -> Self {
        Self { build_hasher }
    }

    pub fn hasher(&self) -> &B {
        &self.build_hasher
    }
}

impl<K, V, B> TableStrategy<K, V> for HashedStrategy<B>
where
    K: Hash + Eq + fmt::Debug,
    V: fmt::Debug,
    B: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K, capacity: usize) -> usize {
        (self.build_hasher.hash_one(key) % capacity as u64) as usize
    }

    #[inline]
    fn equal(&self, a: &K, b: &K) -> bool {
        a == b
    }

    fn print(&self, key: &K, value: &V, out: &mut dyn io::Write) -> io::Result<()> {
        writeln!(out, "{:?}: {:?}", key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::BuildHasherDefault;
    use std::collections::hash_map::DefaultHasher;

    fn modulo(k: &u32, capacity: usize) -> usize {
        *k as usize % capacity
    }

    /// Invariant: `Callbacks` forwards each capability to the matching function.
    #[test]
    fn callbacks_forward_to_functions() {
        let s = Callbacks::new(
            modulo,
            |a: &u32, b: &u32| a == b,
            |k: &u32, v: &&str, out: &mut dyn io::Write| write!(out, "<{}={}>", k, v),
        );
        assert_eq!(TableStrategy::<u32, &str>::hash(&s, &10, 7), 3);
        assert!(TableStrategy::<u32, &str>::equal(&s, &4, &4));
        assert!(!TableStrategy::<u32, &str>::equal(&s, &4, &5));

        let mut out = Vec::new();
        TableStrategy::<u32, &str>::print(&s, &1, &"one", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<1=one>");
    }

    /// Invariant: `HashedStrategy` always lands in range and is stable for a
    /// fixed hasher, so equal keys share a bucket at every capacity.
    #[test]
    fn hashed_strategy_in_range_and_deterministic() {
        let s: HashedStrategy<BuildHasherDefault<DefaultHasher>> =
            HashedStrategy::with_hasher(Default::default());
        for capacity in [1usize, 2, 3, 7, 15, 31, 1023] {
            for k in 0..200u64 {
                let a = TableStrategy::<u64, ()>::hash(&s, &k, capacity);
                let b = TableStrategy::<u64, ()>::hash(&s, &k, capacity);
                assert!(a < capacity);
                assert_eq!(a, b);
            }
        }
    }

    /// Invariant: `HashedStrategy` prints `key: value` on its own line.
    #[test]
    fn hashed_strategy_prints_debug_line() {
        let s = HashedStrategy::new();
        let mut out = Vec::new();
        TableStrategy::<String, i32>::print(&s, &"k".to_string(), &5, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\"k\": 5\n");
    }
}
