//! Error type for table construction.

use thiserror::Error;

/// Errors reported by [`ChainedTable`](crate::ChainedTable) constructors.
///
/// Lookups report absence through `Option`; contract violations that cannot
/// be returned (an out-of-range bucket index from a strategy, a corrupt
/// chain) panic instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    #[error("initial capacity must be at least 1 bucket")]
    ZeroCapacity,
}
