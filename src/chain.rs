//! Entry nodes and the singly linked chains threaded through them.
//!
//! Entries live in a `SlotMap` arena; a chain is a bucket head plus the
//! `next` links stored in each entry. Relinking an entry moves its arena
//! key between chains and never copies the key or value.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena key of one entry node.
    pub(crate) struct EntryKey;
}

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) next: Option<EntryKey>,
}

pub(crate) type Slots<K, V> = SlotMap<EntryKey, Entry<K, V>>;

/// Fail fast on a link that does not resolve to a live entry.
#[cold]
#[track_caller]
pub(crate) fn corrupt_chain(bucket: usize) -> ! {
    panic!(
        "chained table invariant violated: broken link in bucket {}",
        bucket
    )
}

/// Walks one chain in link order.
pub(crate) struct Chain<'a, K, V> {
    slots: &'a Slots<K, V>,
    bucket: usize,
    cursor: Option<EntryKey>,
}

impl<'a, K, V> Chain<'a, K, V> {
    pub(crate) fn new(slots: &'a Slots<K, V>, bucket: usize, head: Option<EntryKey>) -> Self {
        Self {
            slots,
            bucket,
            cursor: head,
        }
    }
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (EntryKey, &'a Entry<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let at = self.cursor?;
        match self.slots.get(at) {
            Some(entry) => {
                self.cursor = entry.next;
                Some((at, entry))
            }
            None => corrupt_chain(self.bucket),
        }
    }
}
