//! Chain statistics for judging how well a hash strategy spreads keys.

use crate::chained_table::ChainedTable;
use crate::strategy::TableStrategy;

/// Snapshot of chain occupancy.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    /// Number of entries in the table
    pub size: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Buckets holding at least one entry
    pub occupied_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// size / capacity
    pub load_factor: f64,
    /// Mean chain length over occupied buckets (0 when empty)
    pub mean_chain_length: f64,
}

impl ChainStats {
    pub fn print(&self) {
        println!("=== Chained Table Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.size,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Occupied buckets: {} (longest chain {}, mean {:.2})",
            self.occupied_buckets, self.longest_chain, self.mean_chain_length
        );
    }
}

impl<K, V, S> ChainedTable<K, V, S>
where
    S: TableStrategy<K, V>,
{
    pub fn chain_stats(&self) -> ChainStats {
        let mut occupied_buckets = 0;
        let mut longest_chain = 0;
        let mut entries = 0;
        for len in self.chain_lengths() {
            if len > 0 {
                occupied_buckets += 1;
                entries += len;
            }
            longest_chain = longest_chain.max(len);
        }
        debug_assert_eq!(entries, self.len(), "size must match reachable entries");

        ChainStats {
            size: self.len(),
            capacity: self.capacity(),
            occupied_buckets,
            longest_chain,
            load_factor: self.load_factor(),
            mean_chain_length: if occupied_buckets == 0 {
                0.0
            } else {
                entries as f64 / occupied_buckets as f64
            },
        }
    }

    /// `hist[n]` is the number of buckets whose chain holds `n` entries.
    pub fn chain_length_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        for len in self.chain_lengths() {
            if hist.len() <= len {
                hist.resize(len + 1, 0);
            }
            hist[len] += 1;
        }
        hist
    }
}

#[cfg(test)]
mod tests {
    use crate::ChainedTable;
    use std::io;

    fn table() -> ChainedTable<
        u32,
        (),
        impl crate::TableStrategy<u32, ()>,
    > {
        ChainedTable::with_callbacks(
            16,
            |k: &u32, capacity: usize| *k as usize % capacity,
            |a: &u32, b: &u32| a == b,
            |_: &u32, _: &(), _: &mut dyn io::Write| Ok(()),
        )
        .unwrap()
    }

    #[test]
    fn stats_of_empty_table() {
        let t = table();
        let s = t.chain_stats();
        assert_eq!(s.size, 0);
        assert_eq!(s.capacity, 16);
        assert_eq!(s.occupied_buckets, 0);
        assert_eq!(s.longest_chain, 0);
        assert_eq!(s.mean_chain_length, 0.0);
        assert_eq!(t.chain_length_histogram(), vec![16]);
    }

    #[test]
    fn stats_track_collisions() {
        let mut t = table();
        for k in [0u32, 16, 32, 5, 7] {
            t.put(k, ());
        }
        let s = t.chain_stats();
        assert_eq!(s.size, 5);
        assert_eq!(s.occupied_buckets, 3);
        assert_eq!(s.longest_chain, 3);
        assert!((s.mean_chain_length - 5.0 / 3.0).abs() < 1e-9);
        assert_eq!(t.chain_length_histogram(), vec![13, 2, 0, 1]);
    }
}
