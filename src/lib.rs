/*!
# Quasar Spatial

Uniform-grid spatial object database for 2D real-time simulations.

Objects with an axis-aligned extent are hashed into a fixed-size bucket
table (wraparound modulo indexing) and can be retrieved by range, by type
tag, or by line-of-sight raycast against their collision geometry.

## Architecture

- **GridDatabase**: the bucketed hash grid (insertion, removal, teardown)
- **DatabaseObject**: an indexable entity (extent, type tag, collision shapes)
- **EntryPool**: shared pooled allocator for the intrusive bucket-entry nodes
- **Queries**: range / type-filtered / predicate queries and LOS raycasting

The database is single-threaded by design: all mutation and all queries run
on one simulation thread per grid instance. Multiple grids on the same
thread share one entry pool.
*/

// Internal modules
mod error;
pub mod log;
pub mod db;
pub mod geom;

// Main quasar namespace module
pub mod quasar {
    // Error types
    pub use crate::error::{Error, Result};

    // Database types
    pub use crate::db::{
        live_grid_count, CollisionShape, CompanionManager, DatabaseObject,
        GridDatabase, LosHit, ObjectKey,
        BUCKET_ROW_COUNT, BUCKET_MASK, BUCKET_WIDTH_BIT_SHIFT,
        FLAG_COLLISION_ENABLED,
    };

    // Geometry sub-module
    pub mod geom {
        pub use crate::geom::*;
    }

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: db_* macros are NOT re-exported here - they are internal only
    }
}

// Re-export math library at crate root
pub use glam;
