//! Axis-aligned rectangle in world space.
//!
//! The coarse spatial extent of every database object. Stored as a
//! min/max corner pair and kept normalized (min <= max on both axes)
//! by every constructor.

use glam::Vec2;

/// Axis-Aligned Bounding Rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum corner (x, y)
    pub min: Vec2,
    /// Maximum corner (x, y)
    pub max: Vec2,
}

impl Rect {
    /// Zero rectangle at the origin
    pub const ZERO: Rect = Rect {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    /// Create a rect from two corner points, in any order.
    pub fn new(p1: Vec2, p2: Vec2) -> Rect {
        Rect {
            min: p1.min(p2),
            max: p1.max(p2),
        }
    }

    /// Create a rect from corner coordinates, in any order.
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Rect {
        Rect::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
    }

    /// Create a square rect around a center point with the given "radius"
    /// (half edge length).
    pub fn from_center_radius(center: Vec2, radius: f32) -> Rect {
        let r = Vec2::splat(radius.abs());
        Rect {
            min: center - r,
            max: center + r,
        }
    }

    /// Bounding rect of a point set. Returns `None` for an empty slice.
    pub fn bounding(points: &[Vec2]) -> Option<Rect> {
        let (&first, rest) = points.split_first()?;
        let mut rect = Rect { min: first, max: first };
        for &p in rest {
            rect.union_point(p);
        }
        Some(rect)
    }

    /// Center point of the rect
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Width (x extent)
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height (y extent)
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Test if the rect contains a point (boundary inclusive).
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Test if this rect overlaps another (boundary contact counts).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
            && self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// Grow the rect to include a point.
    pub fn union_point(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow the rect to include another rect.
    pub fn union_rect(&mut self, other: &Rect) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Expand outward by a delta on each side.
    pub fn expand(&mut self, delta: Vec2) {
        self.min -= delta;
        self.max += delta;
    }

    /// The four corners as a counter-clockwise polygon.
    pub fn to_poly(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

#[cfg(test)]
#[path = "rect_tests.rs"]
mod tests;
