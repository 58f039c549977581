//! GridDatabase, the bucketed hash grid.
//!
//! Objects are hashed by their extent into a fixed 16x16 table of bucket
//! lists. The grid is conceptually unbounded: world cell indices wrap
//! into the table modulo BUCKET_ROW_COUNT, so distant objects whose cell
//! indices collide share a bucket. That is a deliberate trade-off of
//! locality accuracy for O(1) table size, not something callers need to
//! tune around.
//!
//! Insertion links one pool entry per covered bucket; removal walks the
//! object's own entry chain and unlinks each node in O(1). All query
//! operations live in query.rs and raycast.rs.

use std::cell::Cell;
use std::any::Any;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use crate::db_debug;
use crate::error::{Error, Result};
use crate::geom::Rect;
use super::entry_pool::{BucketEntry, EntryHandle, SharedEntryPool};
use super::object::{DatabaseObject, ObjectKey};

// ===== TABLE GEOMETRY =====

/// Number of buckets per grid row and number of rows; power of 2
pub const BUCKET_ROW_COUNT: usize = 16;
/// Mask for wrapping a world cell index into the table
pub const BUCKET_MASK: i32 = BUCKET_ROW_COUNT as i32 - 1;
/// Width/height of each bucket in world units, as 2^n (8 = 256 units)
pub const BUCKET_WIDTH_BIT_SHIFT: i32 = 8;

/// World coordinate -> unmasked world cell index
pub(crate) fn cell_coord(v: f32) -> i32 {
    (v.floor() as i32) >> BUCKET_WIDTH_BIT_SHIFT
}

// ===== BUCKET RANGE =====

/// Inclusive range of world cell indices covered by an extent.
///
/// Kept in unmasked cell space; masking happens at lookup. The span is
/// clamped to the table size so no bucket is visited twice when an
/// extent is wider than one full table period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BucketRange {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BucketRange {
    /// Compute the covered cell range for an extent.
    pub fn covering(extent: &Rect) -> BucketRange {
        let min_x = cell_coord(extent.min.x);
        let min_y = cell_coord(extent.min.y);
        let mut max_x = cell_coord(extent.max.x);
        let mut max_y = cell_coord(extent.max.y);

        // Wider than one table period: every bucket in that axis is
        // already covered once
        if max_x - min_x >= BUCKET_ROW_COUNT as i32 {
            max_x = min_x + BUCKET_MASK;
        }
        if max_y - min_y >= BUCKET_ROW_COUNT as i32 {
            max_y = min_y + BUCKET_MASK;
        }

        BucketRange { min_x, min_y, max_x, max_y }
    }

    /// Iterate the covered buckets as masked (column, row) table indices.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.min_y..=self.max_y).flat_map(move |y| {
            (self.min_x..=self.max_x)
                .map(move |x| ((x & BUCKET_MASK) as usize, (y & BUCKET_MASK) as usize))
        })
    }
}

// ===== COMPANION MANAGER =====

/// Opaque companion spatial manager (e.g. a wall-segment manager).
///
/// The database holds the attachment and hands it back on request; it
/// never calls into it.
pub trait CompanionManager: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ===== GRID DATABASE =====

/// The bucketed spatial hash grid.
///
/// Owns its resident objects (inserted by value, handed back on
/// removal) and shares the bucket-entry pool with every other grid on
/// the thread. Single-threaded by design: not Send, no locking.
pub struct GridDatabase {
    /// Resident objects, stable keys
    objects: SlotMap<ObjectKey, DatabaseObject>,
    /// Bucket list heads, indexed [row][column]
    buckets: [[Option<EntryHandle>; BUCKET_ROW_COUNT]; BUCKET_ROW_COUNT],
    /// Every resident object in insertion order
    all_objects: Vec<ObjectKey>,
    /// Secondary non-bucketed lists for hot type tags
    fast_indices: FxHashMap<u8, Vec<ObjectKey>>,
    /// Shared bucket-entry allocator
    pool: SharedEntryPool,
    /// Monotonic per-query stamp source for cross-bucket deduplication
    pub(crate) query_id: Cell<u32>,
    /// Opaque companion attachment
    companion: Option<Box<dyn CompanionManager>>,
}

impl GridDatabase {
    /// Create an empty database with no fast indices.
    pub fn new() -> Self {
        Self::with_fast_indices(&[])
    }

    /// Create an empty database maintaining fast indices for the given
    /// type tags.
    ///
    /// A fast index answers "all objects of type T" in O(matches)
    /// instead of a full bucket sweep. Choose the handful of tags the
    /// simulation queries by whole collection.
    pub fn with_fast_indices(tags: &[u8]) -> Self {
        let mut fast_indices = FxHashMap::default();
        for &tag in tags {
            fast_indices.insert(tag, Vec::new());
        }
        Self {
            objects: SlotMap::with_key(),
            buckets: [[None; BUCKET_ROW_COUNT]; BUCKET_ROW_COUNT],
            all_objects: Vec::new(),
            fast_indices,
            pool: SharedEntryPool::acquire(),
            query_id: Cell::new(0),
            companion: None,
        }
    }

    /// Attach a companion spatial manager at construction time.
    pub fn with_companion(mut self, companion: Box<dyn CompanionManager>) -> Self {
        self.companion = Some(companion);
        self
    }

    /// The attached companion manager, if any.
    pub fn companion(&self) -> Option<&dyn CompanionManager> {
        self.companion.as_deref()
    }

    /// Mutable access to the attached companion manager.
    pub fn companion_mut(&mut self) -> Option<&mut dyn CompanionManager> {
        self.companion.as_deref_mut()
    }

    // ===== INSERTION / REMOVAL =====

    /// Insert an object, taking ownership while it is resident.
    ///
    /// Cost is O(number of buckets the extent spans), not O(grid size).
    ///
    /// # Errors
    ///
    /// * `ExtentUnset` - the object's extent was never assigned
    /// * `AlreadyInDatabase` - the object still carries bucket entries
    pub fn insert(&mut self, object: DatabaseObject) -> Result<ObjectKey> {
        let extent = object.extent().ok_or(Error::ExtentUnset)?;
        if object.is_in_database() {
            return Err(Error::AlreadyInDatabase);
        }

        let type_tag = object.type_tag();
        let key = self.objects.insert(object);

        let chain = self.link_into_buckets(key, &extent);
        self.objects[key].entry_head = chain;

        self.all_objects.push(key);
        if let Some(list) = self.fast_indices.get_mut(&type_tag) {
            list.push(key);
        }

        Ok(key)
    }

    /// Detach an object and hand it back. Dropping the returned value is
    /// the "destroy" removal policy.
    ///
    /// # Errors
    ///
    /// * `NotInDatabase` - the key is stale or from another grid
    pub fn remove(&mut self, key: ObjectKey) -> Result<DatabaseObject> {
        let mut object = self.objects.remove(key).ok_or(Error::NotInDatabase)?;
        self.unlink_chain(object.entry_head.take());

        self.all_objects.retain(|&k| k != key);
        if let Some(list) = self.fast_indices.get_mut(&object.type_tag()) {
            list.retain(|&k| k != key);
        }

        Ok(object)
    }

    /// Re-bucket a resident object under a new extent.
    ///
    /// Equivalent to remove + set_extent + insert, but keeps the key
    /// stable and the insertion-order position unchanged.
    pub fn update_extent(&mut self, key: ObjectKey, extent: Rect) -> Result<()> {
        if !self.objects.contains_key(key) {
            return Err(Error::NotInDatabase);
        }

        let old_chain = self.objects[key].entry_head.take();
        self.unlink_chain(old_chain);

        self.objects[key].set_extent(extent);
        let chain = self.link_into_buckets(key, &extent);
        self.objects[key].entry_head = chain;
        Ok(())
    }

    /// Detach every resident object and hand them all back in insertion
    /// order (the non-owning teardown policy).
    pub fn remove_everything(&mut self) -> Vec<DatabaseObject> {
        let keys = std::mem::take(&mut self.all_objects);
        let mut detached = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(mut object) = self.objects.remove(key) {
                self.unlink_chain(object.entry_head.take());
                detached.push(object);
            }
        }
        for list in self.fast_indices.values_mut() {
            list.clear();
        }
        detached
    }

    /// Remove and destroy every resident object (the owning teardown
    /// policy).
    pub fn clear(&mut self) {
        let count = self.remove_everything().len();
        if count > 0 {
            db_debug!("quasar::GridDatabase", "Teardown destroyed {} objects", count);
        }
    }

    // ===== ACCESSORS =====

    /// Shared access to a resident object.
    pub fn object(&self, key: ObjectKey) -> Option<&DatabaseObject> {
        self.objects.get(key)
    }

    /// Mutable access to a resident object.
    ///
    /// Mutating the extent through this does NOT relocate bucket
    /// entries; call `update_extent` for that.
    pub fn object_mut(&mut self, key: ObjectKey) -> Option<&mut DatabaseObject> {
        self.objects.get_mut(key)
    }

    /// Whether this key refers to a resident object.
    pub fn is_resident(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Number of resident objects.
    pub fn object_count(&self) -> usize {
        self.all_objects.len()
    }

    /// Whether the database holds no objects.
    pub fn is_empty(&self) -> bool {
        self.all_objects.is_empty()
    }

    /// Key of the i-th object in insertion order.
    pub fn object_by_index(&self, index: usize) -> Option<ObjectKey> {
        self.all_objects.get(index).copied()
    }

    /// Union of every resident object's extent; the zero rect when the
    /// database is empty. O(N).
    pub fn extents(&self) -> Rect {
        let mut iter = self
            .all_objects
            .iter()
            .filter_map(|&key| self.objects.get(key).and_then(|o| o.extent()));

        let mut rect = match iter.next() {
            Some(first) => first,
            None => return Rect::ZERO,
        };
        for extent in iter {
            rect.union_rect(&extent);
        }
        rect
    }

    // ===== INTERNALS =====

    /// Link an object into every bucket covered by `extent`, returning
    /// the head of its entry chain.
    fn link_into_buckets(&mut self, key: ObjectKey, extent: &Rect) -> Option<EntryHandle> {
        let range = BucketRange::covering(extent);
        let mut pool = self.pool.borrow_mut();
        let mut chain_head: Option<EntryHandle> = None;

        for (col, row) in range.cells() {
            let old_head = self.buckets[row][col];
            let handle = pool.alloc(BucketEntry {
                object: key,
                bucket: (col, row),
                next_in_bucket: old_head,
                prev_in_bucket: None,
                next_for_object: chain_head,
            });
            if let Some(old) = old_head {
                pool.get_mut(old).prev_in_bucket = Some(handle);
            }
            self.buckets[row][col] = Some(handle);
            chain_head = Some(handle);
        }

        chain_head
    }

    /// Unlink and free every entry in an object's chain. After this no
    /// bucket references the object.
    fn unlink_chain(&mut self, mut cursor: Option<EntryHandle>) {
        let mut pool = self.pool.borrow_mut();
        while let Some(handle) = cursor {
            let entry = *pool.get(handle);

            match entry.prev_in_bucket {
                Some(prev) => pool.get_mut(prev).next_in_bucket = entry.next_in_bucket,
                None => self.buckets[entry.bucket.1][entry.bucket.0] = entry.next_in_bucket,
            }
            if let Some(next) = entry.next_in_bucket {
                pool.get_mut(next).prev_in_bucket = entry.prev_in_bucket;
            }

            pool.free(handle);
            cursor = entry.next_for_object;
        }
    }

    /// Head of a bucket's entry list (crate-internal, for queries).
    pub(crate) fn bucket_head(&self, col: usize, row: usize) -> Option<EntryHandle> {
        self.buckets[row][col]
    }

    /// The shared pool handle (crate-internal, for queries).
    pub(crate) fn pool(&self) -> &SharedEntryPool {
        &self.pool
    }

    /// Object table (crate-internal, for queries).
    pub(crate) fn objects(&self) -> &SlotMap<ObjectKey, DatabaseObject> {
        &self.objects
    }

    /// Fast-index list for a tag, if one is maintained.
    pub(crate) fn fast_index(&self, tag: u8) -> Option<&Vec<ObjectKey>> {
        self.fast_indices.get(&tag)
    }

    /// Ordered keys of every resident object (crate-internal; the public
    /// zero-copy accessor lives in query.rs).
    pub(crate) fn all_object_keys(&self) -> &[ObjectKey] {
        &self.all_objects
    }

    /// Advance the query stamp. Skips 0 on wraparound so a fresh
    /// object's zeroed stamp can never collide with a live query.
    pub(crate) fn next_query_id(&self) -> u32 {
        let mut id = self.query_id.get().wrapping_add(1);
        if id == 0 {
            id = 1;
        }
        self.query_id.set(id);
        id
    }
}

impl Default for GridDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GridDatabase {
    /// Buckets must be emptied before the grid releases its claim on the
    /// shared pool, otherwise the pool would keep dead entries alive.
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod tests;
