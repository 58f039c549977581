//! Segment intersection tests.
//!
//! Everything a line-of-sight query needs: segment vs segment, rect,
//! circle, and polygon, each reporting the earliest hit parameter
//! t in [0, 1] along the query segment.
//!
//! Boundary convention: contact is inclusive. A segment whose start point
//! lies on (or inside) the tested shape reports t = 0.0, an endpoint that
//! just touches it reports t = 1.0. No epsilon inflation is applied.

use glam::Vec2;

/// Result of a segment-vs-shape test: the hit parameter along the segment
/// and the unit surface normal at the hit point, oriented against travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Hit parameter in [0, 1] along the query segment
    pub time: f32,
    /// Unit surface normal at the hit point
    pub normal: Vec2,
}

/// 2D cross product (z component of the 3D cross)
fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Intersect segment `a1-a2` with segment `b1-b2`.
///
/// Returns the parameter along `a1-a2` of the intersection point, or
/// `None` if the segments do not cross. Parallel (including collinear)
/// segments never report a hit; a collinear graze resolves through the
/// neighboring polygon edges instead.
pub fn segment_segment(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<f32> {
    let da = a2 - a1;
    let db = b2 - b1;
    let denom = cross(da, db);
    if denom == 0.0 {
        return None;
    }

    let diff = b1 - a1;
    let t = cross(diff, db) / denom;
    let u = cross(diff, da) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(t)
    } else {
        None
    }
}

/// Intersect a segment with an axis-aligned rect (slab method).
///
/// Returns the entry parameter in [0, 1]. A start point already inside
/// the rect reports t = 0.0.
pub fn segment_rect(start: Vec2, end: Vec2, rect: &super::Rect) -> Option<f32> {
    let dir = end - start;
    let mut t_min = 0.0f32;
    let mut t_max = 1.0f32;

    for axis in 0..2 {
        let (s, d, lo, hi) = if axis == 0 {
            (start.x, dir.x, rect.min.x, rect.max.x)
        } else {
            (start.y, dir.y, rect.min.y, rect.max.y)
        };

        if d == 0.0 {
            // Parallel to this slab: inside or never
            if s < lo || s > hi {
                return None;
            }
        } else {
            let inv = 1.0 / d;
            let (t0, t1) = {
                let a = (lo - s) * inv;
                let b = (hi - s) * inv;
                if a <= b { (a, b) } else { (b, a) }
            };
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
    }

    Some(t_min)
}

/// Intersect a segment with a circle.
///
/// Returns the earliest hit in [0, 1]. A start point inside (or on) the
/// circle reports t = 0.0 with the normal pointing from the center toward
/// the start point.
pub fn segment_circle(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> Option<SegmentHit> {
    let m = start - center;
    let d = end - start;

    let c = m.dot(m) - radius * radius;
    if c <= 0.0 {
        // Start inside or on the boundary
        let normal = if m.length_squared() > 0.0 {
            m.normalize()
        } else if d.length_squared() > 0.0 {
            -d.normalize()
        } else {
            Vec2::X
        };
        return Some(SegmentHit { time: 0.0, normal });
    }

    let a = d.dot(d);
    if a == 0.0 {
        // Degenerate segment outside the circle
        return None;
    }

    let b = 2.0 * m.dot(d);
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }

    let t = (-b - disc.sqrt()) / (2.0 * a);
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let hit_point = start + d * t;
    Some(SegmentHit {
        time: t,
        normal: (hit_point - center).normalize(),
    })
}

/// Intersect a segment with a closed polygon boundary.
///
/// Tests every edge of the polygon (last vertex connects back to the
/// first) and returns the earliest crossing, with the hit edge's normal
/// oriented against the direction of travel. Polygons with fewer than
/// two vertices never hit.
pub fn segment_polygon(start: Vec2, end: Vec2, poly: &[Vec2]) -> Option<SegmentHit> {
    if poly.len() < 2 {
        return None;
    }

    let dir = end - start;
    let mut best: Option<SegmentHit> = None;

    for i in 0..poly.len() {
        let p1 = poly[i];
        let p2 = poly[(i + 1) % poly.len()];

        if let Some(t) = segment_segment(start, end, p1, p2) {
            if best.map_or(true, |hit| t < hit.time) {
                let edge = p2 - p1;
                let mut normal = Vec2::new(edge.y, -edge.x).normalize_or_zero();
                // Face the normal against the ray's travel direction
                if normal.dot(dir) > 0.0 {
                    normal = -normal;
                }
                best = Some(SegmentHit { time: t, normal });
            }
        }
    }

    best
}

#[cfg(test)]
#[path = "intersect_tests.rs"]
mod tests;
