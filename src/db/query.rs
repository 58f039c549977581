//! Range and type queries.
//!
//! All bucket-walking queries share one deduplication protocol: the
//! grid's query-id counter is advanced once per query call, and every
//! visited object is stamped. An object spanning several covered
//! buckets is therefore reported exactly once, and issuing the same
//! query twice on an unmodified grid returns the same set both times.
//!
//! Results are appended to a caller-supplied Vec so hot paths can reuse
//! their buffers across frames.

use glam::Vec2;
use crate::geom::Rect;
use super::grid::{BucketRange, GridDatabase};
use super::object::ObjectKey;

impl GridDatabase {
    /// Every resident object in insertion order, zero-copy.
    pub fn all_objects(&self) -> &[ObjectKey] {
        self.all_object_keys()
    }

    /// Append every resident object, in insertion order.
    ///
    /// Walks the insertion-order list directly, so no geometric test and
    /// no deduplication is involved.
    pub fn find_all(&self, results: &mut Vec<ObjectKey>) {
        results.extend_from_slice(self.all_object_keys());
    }

    /// Append every resident object with the given type tag.
    ///
    /// O(matches) when a fast index is maintained for the tag, otherwise
    /// a linear sweep of the insertion-order list.
    pub fn find_by_type(&self, tag: u8, results: &mut Vec<ObjectKey>) {
        if let Some(list) = self.fast_index(tag) {
            results.extend_from_slice(list);
            return;
        }

        for &key in self.all_object_keys() {
            if self.objects()[key].type_tag() == tag {
                results.push(key);
            }
        }
    }

    /// Append every object of the given type whose extent overlaps `rect`.
    pub fn find_in_rect(&self, tag: u8, rect: &Rect, results: &mut Vec<ObjectKey>) {
        self.find_matching(|t| t == tag, rect, results);
    }

    /// Append every object whose type tag passes `test` and whose extent
    /// overlaps `rect`.
    ///
    /// Cost is O(objects in the covered buckets), not O(grid size).
    pub fn find_matching(
        &self,
        test: impl Fn(u8) -> bool,
        rect: &Rect,
        results: &mut Vec<ObjectKey>,
    ) {
        let query_id = self.next_query_id();
        let range = BucketRange::covering(rect);
        let pool = self.pool().borrow();

        for (col, row) in range.cells() {
            let mut cursor = self.bucket_head(col, row);
            while let Some(handle) = cursor {
                let entry = pool.get(handle);
                cursor = entry.next_in_bucket;

                let object = &self.objects()[entry.object];
                if object.last_query_id.get() == query_id {
                    // Already visited via an earlier bucket in this query
                    continue;
                }
                object.last_query_id.set(query_id);

                if !test(object.type_tag()) {
                    continue;
                }
                match object.extent() {
                    Some(extent) if extent.intersects(rect) => results.push(entry.object),
                    _ => {}
                }
            }
        }
    }

    /// Number of resident objects with the given type tag.
    ///
    /// O(1) when a fast index is maintained for the tag, else O(N).
    pub fn count(&self, tag: u8) -> usize {
        if let Some(list) = self.fast_index(tag) {
            return list.len();
        }
        self.all_object_keys()
            .iter()
            .filter(|&&key| self.objects()[key].type_tag() == tag)
            .count()
    }

    /// Whether any resident object has the given type tag.
    pub fn has_any(&self, tag: u8) -> bool {
        if let Some(list) = self.fast_index(tag) {
            return !list.is_empty();
        }
        self.all_object_keys()
            .iter()
            .any(|&key| self.objects()[key].type_tag() == tag)
    }

    /// Whether the segment from `a` to `b` reaches its end without
    /// crossing any collision-enabled object whose type tag passes
    /// `occluder`.
    pub fn point_can_see_point(&self, a: Vec2, b: Vec2, occluder: impl Fn(u8) -> bool) -> bool {
        self.find_object_los(occluder, a, b).is_none()
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
