//! Error types for the spatial database
//!
//! All variants are local contract violations detected at the call site:
//! they indicate caller misuse, not transient conditions. Nothing here is
//! retried or recovered from. Empty query results are not errors.

use std::fmt;

/// Result type for spatial database operations
pub type Result<T> = std::result::Result<T, Error>;

/// Spatial database errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Insert called on an object that is already linked into bucket lists
    AlreadyInDatabase,

    /// Remove (or re-bucket) called with a key not resident in this database
    NotInDatabase,

    /// Insert called before the object's extent was set
    ExtentUnset,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AlreadyInDatabase => write!(f, "Object is already in a database"),
            Error::NotInDatabase => write!(f, "Object is not in this database"),
            Error::ExtentUnset => write!(f, "Object has no extent set"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
