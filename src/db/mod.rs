//! Spatial database module
//!
//! Provides the bucketed grid database, its object type, the shared
//! bucket-entry pool, and the query/raycast operations.

mod object;
mod entry_pool;
mod grid;
mod query;
mod raycast;

pub use object::{
    CollisionShape, DatabaseObject, ObjectKey,
    FLAG_COLLISION_ENABLED,
};
pub use entry_pool::live_grid_count;
pub use grid::{
    CompanionManager, GridDatabase,
    BUCKET_ROW_COUNT, BUCKET_MASK, BUCKET_WIDTH_BIT_SHIFT,
};
pub use raycast::LosHit;
