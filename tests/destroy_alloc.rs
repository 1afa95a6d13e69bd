// Allocation accounting for destroy/drop. A counting global allocator
// tracks live bytes per thread, so parallel tests do not disturb each other.

use chain_table::ChainedTable;
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::io;
use std::rc::Rc;

struct Counting;

thread_local! {
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
}

fn track(delta: isize) {
    let _ = LIVE_BYTES.try_with(|c| c.set(c.get() + delta));
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let p = System.alloc(layout);
        if !p.is_null() {
            track(layout.size() as isize);
        }
        p
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        track(-(layout.size() as isize));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let p = System.realloc(ptr, layout, new_size);
        if !p.is_null() {
            track(new_size as isize - layout.size() as isize);
        }
        p
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

fn live_bytes() -> isize {
    LIVE_BYTES.with(|c| c.get())
}

fn modulo(k: &u64, capacity: usize) -> usize {
    (*k % capacity as u64) as usize
}

fn quiet(_: &u64, _: &&u64, _: &mut dyn io::Write) -> io::Result<()> {
    Ok(())
}

#[test]
fn destroy_releases_everything_the_table_allocated() {
    let payloads: Vec<u64> = (0..2_000).collect();
    let before = live_bytes();

    let mut t: ChainedTable<u64, &u64, _> =
        ChainedTable::with_callbacks(3, modulo, |a: &u64, b: &u64| a == b, quiet).unwrap();
    for (k, v) in payloads.iter().enumerate() {
        t.put(k as u64, v);
    }
    // Collide a few keys into long chains as well.
    for k in 0..50u64 {
        t.put(k * t.capacity() as u64, &payloads[0]);
    }
    assert!(live_bytes() > before);
    t.destroy();

    assert_eq!(live_bytes(), before, "destroy must leave no live allocations");
    assert_eq!(payloads.len(), 2_000);
    assert_eq!(payloads[1_999], 1_999);
}

#[test]
fn drop_releases_owned_values_exactly_once() {
    let shared = Rc::new(String::from("texture"));
    {
        let mut t: ChainedTable<u32, Rc<String>> = ChainedTable::with_capacity(2).unwrap();
        for k in 0..100 {
            t.put(k, Rc::clone(&shared));
        }
        // Replaced values are handed back, not leaked.
        let old = t.put(7, Rc::clone(&shared));
        assert!(old.is_some());
        drop(old);
        assert_eq!(Rc::strong_count(&shared), 101);

        let removed = t.remove(&3);
        assert!(removed.is_some());
        drop(removed);
        assert_eq!(Rc::strong_count(&shared), 100);
    }
    assert_eq!(Rc::strong_count(&shared), 1);
}

#[test]
fn growth_does_not_leak_old_buckets() {
    let before = live_bytes();
    {
        let mut t: ChainedTable<u64, u64> = ChainedTable::with_capacity(1).unwrap();
        for k in 0..10_000 {
            t.put(k, k);
        }
        assert_eq!(t.capacity(), 16383);
    }
    assert_eq!(live_bytes(), before);
}
