//! Geometry module
//!
//! 2D axis-aligned rectangles and the segment intersection tests used by
//! range queries and line-of-sight raycasting.

mod rect;
mod intersect;

pub use rect::Rect;
pub use intersect::{
    segment_segment, segment_rect, segment_circle, segment_polygon,
    SegmentHit,
};
