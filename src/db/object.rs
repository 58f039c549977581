//! Database object types.
//!
//! A DatabaseObject is the indexable entity: an axis-aligned extent, an
//! opaque type tag, collision geometry for line-of-sight tests, and the
//! private bookkeeping the grid threads through it while it is resident.
//!
//! The database never interprets the type tag or the geometry beyond the
//! operations here; game semantics live entirely with the caller.

use std::cell::Cell;
use glam::Vec2;
use slotmap::new_key_type;
use crate::geom::{segment_circle, segment_polygon, Rect, SegmentHit};
use super::entry_pool::EntryHandle;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a DatabaseObject resident in a GridDatabase.
    ///
    /// Keys remain valid even after other objects are removed.
    /// A key becomes invalid only when its own object is removed.
    pub struct ObjectKey;
}

// ===== FLAGS =====

/// Object participates in line-of-sight collision tests
pub const FLAG_COLLISION_ENABLED: u64 = 1 << 0;
// Bits 1-63 reserved for future extensions

// ===== COLLISION SHAPE =====

/// One snapshot of an object's collision geometry.
///
/// Objects that interpolate between snapshots carry several states;
/// queries address them by state index.
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// Closed polygon boundary (ordered point sequence)
    Polygon(Vec<Vec2>),
    /// Circle (center + radius)
    Circle { center: Vec2, radius: f32 },
}

impl CollisionShape {
    /// Earliest intersection of a segment with this shape.
    pub(crate) fn intersect_segment(&self, start: Vec2, end: Vec2) -> Option<SegmentHit> {
        match self {
            CollisionShape::Polygon(points) => segment_polygon(start, end, points),
            CollisionShape::Circle { center, radius } => {
                segment_circle(start, end, *center, *radius)
            }
        }
    }
}

// ===== DATABASE OBJECT =====

/// An indexable entity: extent, type tag, collision shape states.
///
/// Constructed by the caller, handed to `GridDatabase::insert` by value,
/// and handed back by `remove`. Cloning always yields a detached copy
/// (no bucket entries, no query stamp), which must be independently
/// inserted.
#[derive(Debug)]
pub struct DatabaseObject {
    /// Axis-aligned extent; `None` until set at least once
    extent: Option<Rect>,
    /// Opaque classification used by type-filtered queries
    type_tag: u8,
    /// Behavior flags (FLAG_* constants)
    flags: u64,
    /// Collision geometry snapshots; state index 0 is the current state
    shapes: Vec<CollisionShape>,
    /// Head of this object's intrusive bucket-entry chain (resident only)
    pub(crate) entry_head: Option<EntryHandle>,
    /// Stamp of the last query that visited this object, for per-query
    /// deduplication across buckets
    pub(crate) last_query_id: Cell<u32>,
}

impl DatabaseObject {
    /// Create a detached object with the given type tag.
    ///
    /// Collision is enabled by default; the extent starts unset and must
    /// be assigned before insertion.
    pub fn new(type_tag: u8) -> Self {
        Self {
            extent: None,
            type_tag,
            flags: FLAG_COLLISION_ENABLED,
            shapes: Vec::new(),
            entry_head: None,
            last_query_id: Cell::new(0),
        }
    }

    /// Builder-style extent assignment.
    pub fn with_extent(mut self, extent: Rect) -> Self {
        self.extent = Some(extent);
        self
    }

    /// Builder-style shape assignment (becomes state 0).
    pub fn with_shape(mut self, shape: CollisionShape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// The cached extent, if one has been set.
    pub fn extent(&self) -> Option<Rect> {
        self.extent
    }

    /// Replace the cached extent.
    ///
    /// For a resident object this does NOT relocate its bucket entries;
    /// use `GridDatabase::update_extent` (or remove + insert) to keep
    /// bucket membership correct.
    pub fn set_extent(&mut self, extent: Rect) {
        self.extent = Some(extent);
    }

    /// The opaque type tag.
    pub fn type_tag(&self) -> u8 {
        self.type_tag
    }

    /// Behavior flags (FLAG_* constants).
    pub fn flags(&self) -> u64 {
        self.flags
    }

    /// Replace the behavior flags.
    pub fn set_flags(&mut self, flags: u64) {
        self.flags = flags;
    }

    /// Whether this object participates in line-of-sight tests.
    pub fn is_collision_enabled(&self) -> bool {
        self.flags & FLAG_COLLISION_ENABLED != 0
    }

    /// Append a geometry state snapshot.
    pub fn push_shape_state(&mut self, shape: CollisionShape) {
        self.shapes.push(shape);
    }

    /// Geometry for a state index.
    ///
    /// An out-of-range state falls back to state 0 (the current state);
    /// `None` only if the object carries no geometry at all.
    pub fn shape(&self, state: u32) -> Option<&CollisionShape> {
        self.shapes
            .get(state as usize)
            .or_else(|| self.shapes.first())
    }

    /// Number of geometry states.
    pub fn shape_state_count(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the object is currently linked into a grid's buckets.
    pub fn is_in_database(&self) -> bool {
        self.entry_head.is_some()
    }
}

impl Clone for DatabaseObject {
    /// Cloning yields a detached copy: no bucket entries, fresh query
    /// stamp. The clone must be independently inserted.
    fn clone(&self) -> Self {
        Self {
            extent: self.extent,
            type_tag: self.type_tag,
            flags: self.flags,
            shapes: self.shapes.clone(),
            entry_head: None,
            last_query_id: Cell::new(0),
        }
    }
}

#[cfg(test)]
#[path = "object_tests.rs"]
mod tests;
