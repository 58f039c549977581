//! Line-of-sight raycasting.
//!
//! A LOS query walks the buckets the segment actually traverses (grid
//! traversal in travel order, not the whole bounding-rect rectangle) and
//! tests each candidate's collision geometry for the earliest hit along
//! the segment.
//!
//! Boundary convention: endpoint contact is inclusive. Hits at t = 0.0
//! and t = 1.0 are reported, and a segment starting inside a circle (or
//! on a polygon edge) reports t = 0.0. Exact-time ties between objects
//! resolve by bucket traversal order (first found).

use glam::Vec2;
use super::grid::{cell_coord, GridDatabase, BUCKET_MASK, BUCKET_WIDTH_BIT_SHIFT};
use super::object::ObjectKey;
use crate::geom::Rect;

/// Result of a line-of-sight query: the nearest hit object, the hit
/// parameter along the segment, and the unit surface normal at the hit
/// point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LosHit {
    /// The object hit first along the segment
    pub object: ObjectKey,
    /// Hit parameter in [0, 1] along the segment
    pub time: f32,
    /// Unit surface normal at the hit point, facing the ray
    pub normal: Vec2,
}

impl GridDatabase {
    /// Nearest collision-enabled object whose type tag passes `test`,
    /// along the segment from `ray_start` to `ray_end`, using the
    /// current geometry state.
    pub fn find_object_los(
        &self,
        test: impl Fn(u8) -> bool,
        ray_start: Vec2,
        ray_end: Vec2,
    ) -> Option<LosHit> {
        self.find_object_los_at_state(test, 0, ray_start, ray_end)
    }

    /// Typed overload of `find_object_los`.
    pub fn find_object_los_by_type(
        &self,
        tag: u8,
        ray_start: Vec2,
        ray_end: Vec2,
    ) -> Option<LosHit> {
        self.find_object_los_at_state(|t| t == tag, 0, ray_start, ray_end)
    }

    /// Typed overload of `find_object_los_at_state`.
    pub fn find_object_los_by_type_at_state(
        &self,
        tag: u8,
        state: u32,
        ray_start: Vec2,
        ray_end: Vec2,
    ) -> Option<LosHit> {
        self.find_object_los_at_state(|t| t == tag, state, ray_start, ray_end)
    }

    /// Nearest collision-enabled object whose type tag passes `test`,
    /// testing the geometry snapshot at `state` (for interpolated
    /// queries against multi-state objects).
    pub fn find_object_los_at_state(
        &self,
        test: impl Fn(u8) -> bool,
        state: u32,
        ray_start: Vec2,
        ray_end: Vec2,
    ) -> Option<LosHit> {
        let query_id = self.next_query_id();
        let ray_rect = Rect::new(ray_start, ray_end);
        let dir = ray_end - ray_start;
        let cell_size = (1 << BUCKET_WIDTH_BIT_SHIFT) as f32;

        // Amanatides-Woo traversal state, in segment-parameter units
        let mut cell_x = cell_coord(ray_start.x);
        let mut cell_y = cell_coord(ray_start.y);
        let end_x = cell_coord(ray_end.x);
        let end_y = cell_coord(ray_end.y);

        let (step_x, mut t_max_x, t_delta_x) = axis_stepper(ray_start.x, dir.x, cell_x, cell_size);
        let (step_y, mut t_max_y, t_delta_y) = axis_stepper(ray_start.y, dir.y, cell_y, cell_size);

        let pool = self.pool().borrow();
        let mut best: Option<LosHit> = None;

        loop {
            // Test every not-yet-seen candidate in this bucket
            let col = (cell_x & BUCKET_MASK) as usize;
            let row = (cell_y & BUCKET_MASK) as usize;
            let mut cursor = self.bucket_head(col, row);
            while let Some(handle) = cursor {
                let entry = pool.get(handle);
                cursor = entry.next_in_bucket;

                let object = &self.objects()[entry.object];
                if object.last_query_id.get() == query_id {
                    continue;
                }
                object.last_query_id.set(query_id);

                if !object.is_collision_enabled() || !test(object.type_tag()) {
                    continue;
                }
                match object.extent() {
                    Some(extent) if extent.intersects(&ray_rect) => {}
                    _ => continue,
                }
                let Some(shape) = object.shape(state) else {
                    continue;
                };

                if let Some(hit) = shape.intersect_segment(ray_start, ray_end) {
                    // Strict less-than keeps the first-found winner on ties
                    if best.map_or(true, |b| hit.time < b.time) {
                        best = Some(LosHit {
                            object: entry.object,
                            time: hit.time,
                            normal: hit.normal,
                        });
                    }
                }
            }

            if cell_x == end_x && cell_y == end_y {
                break;
            }

            // The segment parameter at which the walk leaves this cell.
            // Anything found later starts at or past it, so a closer hit
            // already in hand ends the walk.
            let exit_t = t_max_x.min(t_max_y);
            if let Some(b) = best {
                if b.time <= exit_t {
                    break;
                }
            }
            if exit_t > 1.0 {
                // Numerical safety: walked past the segment end
                break;
            }

            if t_max_x < t_max_y {
                cell_x += step_x;
                t_max_x += t_delta_x;
            } else {
                cell_y += step_y;
                t_max_y += t_delta_y;
            }
        }

        best
    }
}

/// Per-axis traversal setup for the grid walk: step direction, parameter
/// of the first cell-boundary crossing, and parameter advance per cell.
fn axis_stepper(start: f32, dir: f32, cell: i32, cell_size: f32) -> (i32, f32, f32) {
    if dir > 0.0 {
        let boundary = (cell + 1) as f32 * cell_size;
        (1, (boundary - start) / dir, cell_size / dir)
    } else if dir < 0.0 {
        let boundary = cell as f32 * cell_size;
        (-1, (boundary - start) / dir, cell_size / -dir)
    } else {
        (0, f32::INFINITY, f32::INFINITY)
    }
}

#[cfg(test)]
#[path = "raycast_tests.rs"]
mod tests;
