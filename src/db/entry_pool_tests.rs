use super::*;
use slotmap::SlotMap;

fn make_key() -> ObjectKey {
    let mut sm = SlotMap::<ObjectKey, ()>::with_key();
    sm.insert(())
}

fn make_entry(key: ObjectKey) -> BucketEntry {
    BucketEntry {
        object: key,
        bucket: (0, 0),
        next_in_bucket: None,
        prev_in_bucket: None,
        next_for_object: None,
    }
}

// ============================================================================
// Slab allocation tests
// ============================================================================

#[test]
fn test_alloc_grows_slab() {
    let mut pool = EntryPool::new();
    let key = make_key();

    let a = pool.alloc(make_entry(key));
    let b = pool.alloc(make_entry(key));
    assert_ne!(a, b);
    assert_eq!(pool.live_count(), 2);
    assert_eq!(pool.high_water_mark(), 2);
}

#[test]
fn test_free_and_recycle_lifo() {
    let mut pool = EntryPool::new();
    let key = make_key();

    let a = pool.alloc(make_entry(key));
    let b = pool.alloc(make_entry(key));
    pool.free(a);
    pool.free(b);
    assert_eq!(pool.live_count(), 0);

    // LIFO: last freed comes back first, and the slab does not grow
    let c = pool.alloc(make_entry(key));
    assert_eq!(c, b);
    let d = pool.alloc(make_entry(key));
    assert_eq!(d, a);
    assert_eq!(pool.high_water_mark(), 2);
}

#[test]
fn test_get_mut_updates_links() {
    let mut pool = EntryPool::new();
    let key = make_key();

    let a = pool.alloc(make_entry(key));
    let b = pool.alloc(make_entry(key));

    pool.get_mut(a).next_in_bucket = Some(b);
    pool.get_mut(b).prev_in_bucket = Some(a);

    assert_eq!(pool.get(a).next_in_bucket, Some(b));
    assert_eq!(pool.get(b).prev_in_bucket, Some(a));
}

#[test]
fn test_churn_is_leak_free() {
    let mut pool = EntryPool::new();
    let key = make_key();

    for _ in 0..100 {
        let handles: Vec<EntryHandle> =
            (0..10).map(|_| pool.alloc(make_entry(key))).collect();
        for handle in handles {
            pool.free(handle);
        }
    }

    assert_eq!(pool.live_count(), 0);
    // Steady-state churn reuses the same 10 slots
    assert_eq!(pool.high_water_mark(), 10);
}

// ============================================================================
// Shared pool tests
// ============================================================================

#[test]
fn test_shared_pool_is_one_per_thread() {
    let a = SharedEntryPool::acquire();
    let b = SharedEntryPool::acquire();

    let key = make_key();
    let handle = a.borrow_mut().alloc(make_entry(key));

    // Both handles see the same slab
    assert_eq!(b.borrow().live_count(), 1);
    b.borrow_mut().free(handle);
    assert_eq!(a.borrow().live_count(), 0);
}

#[test]
fn test_pool_torn_down_when_last_handle_drops() {
    // Isolated thread so other tests' grids don't hold the pool alive
    std::thread::spawn(|| {
        let a = SharedEntryPool::acquire();
        let key = make_key();
        let handle = a.borrow_mut().alloc(make_entry(key));
        a.borrow_mut().free(handle);
        assert_eq!(live_grid_count(), 1);
        drop(a);
        assert_eq!(live_grid_count(), 0);

        // A fresh acquire builds a brand-new pool
        let b = SharedEntryPool::acquire();
        assert_eq!(b.borrow().live_count(), 0);
        assert_eq!(b.borrow().high_water_mark(), 0);
    })
    .join()
    .unwrap();
}
