//! Pooled allocator for bucket-entry nodes.
//!
//! Every grid links objects into its buckets through small intrusive
//! nodes. Those nodes churn constantly (one per covered bucket per
//! insert), so they come from a slab with a recycling free list instead
//! of the global allocator, and the slab is shared by every grid on the
//! thread.
//!
//! Nodes are addressed by integer handles into the slab; bucket heads
//! and chain links store `Option<EntryHandle>`. Handles never escape
//! the crate.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};
use super::object::ObjectKey;

// ===== HANDLE =====

/// Index of a BucketEntry in the pool slab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EntryHandle(u32);

// ===== BUCKET ENTRY =====

/// Intrusive list node linking one object into one bucket.
///
/// Doubly linked within the bucket (O(1) unlink), singly linked across
/// the owning object's other entries. The bucket coordinates are stored
/// so unlinking a list head can patch the right bucket slot.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BucketEntry {
    /// The object this entry links into a bucket (non-owning)
    pub object: ObjectKey,
    /// Masked bucket coordinates (column, row) this entry lives in
    pub bucket: (usize, usize),
    /// Next entry in the same bucket's list
    pub next_in_bucket: Option<EntryHandle>,
    /// Previous entry in the same bucket's list
    pub prev_in_bucket: Option<EntryHandle>,
    /// Next entry belonging to the same object, in another bucket
    pub next_for_object: Option<EntryHandle>,
}

// ===== POOL =====

/// Slab of BucketEntry nodes with a LIFO recycling free list.
pub(crate) struct EntryPool {
    entries: Vec<BucketEntry>,
    free_list: Vec<EntryHandle>,
    live: u32,
}

impl EntryPool {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Allocate a node, recycling a freed slot when one is available.
    pub fn alloc(&mut self, entry: BucketEntry) -> EntryHandle {
        self.live += 1;
        match self.free_list.pop() {
            Some(handle) => {
                self.entries[handle.0 as usize] = entry;
                handle
            }
            None => {
                let handle = EntryHandle(self.entries.len() as u32);
                self.entries.push(entry);
                handle
            }
        }
    }

    /// Return a node to the free list.
    pub fn free(&mut self, handle: EntryHandle) {
        debug_assert!(
            (handle.0 as usize) < self.entries.len(),
            "freeing an unallocated entry: {:?}",
            handle
        );
        self.live -= 1;
        self.free_list.push(handle);
    }

    pub fn get(&self, handle: EntryHandle) -> &BucketEntry {
        &self.entries[handle.0 as usize]
    }

    pub fn get_mut(&mut self, handle: EntryHandle) -> &mut BucketEntry {
        &mut self.entries[handle.0 as usize]
    }

    /// Number of nodes currently allocated
    pub fn live_count(&self) -> u32 {
        self.live
    }

    /// Highest slab size ever reached (allocated + freed slots)
    pub fn high_water_mark(&self) -> usize {
        self.entries.len()
    }
}

// ===== SHARED POOL HANDLE =====

thread_local! {
    /// Registry slot for the thread's shared pool. Holds a weak
    /// reference so the pool is torn down when the last grid drops.
    static SHARED_POOL: RefCell<Weak<RefCell<EntryPool>>> = RefCell::new(Weak::new());
}

/// Shared ownership handle to the thread's entry pool.
///
/// The pool is created when the first GridDatabase on the thread is
/// constructed and dropped when the last one goes away. Grids must not
/// migrate across threads; the handle is not Send.
pub(crate) struct SharedEntryPool(Rc<RefCell<EntryPool>>);

impl SharedEntryPool {
    /// Get the thread's pool, creating it on first use.
    pub fn acquire() -> Self {
        SHARED_POOL.with(|slot| {
            let mut weak = slot.borrow_mut();
            if let Some(pool) = weak.upgrade() {
                SharedEntryPool(pool)
            } else {
                let pool = Rc::new(RefCell::new(EntryPool::new()));
                *weak = Rc::downgrade(&pool);
                SharedEntryPool(pool)
            }
        })
    }

    pub fn borrow(&self) -> Ref<'_, EntryPool> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, EntryPool> {
        self.0.borrow_mut()
    }
}

/// Number of GridDatabase instances currently alive on this thread.
///
/// Diagnostic counterpart of the pool's lifetime: the pool exists iff
/// this is non-zero.
pub fn live_grid_count() -> usize {
    SHARED_POOL.with(|slot| slot.borrow().strong_count())
}

#[cfg(test)]
#[path = "entry_pool_tests.rs"]
mod tests;
