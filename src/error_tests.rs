//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_already_in_database_display() {
    let err = Error::AlreadyInDatabase;
    assert_eq!(format!("{}", err), "Object is already in a database");
}

#[test]
fn test_not_in_database_display() {
    let err = Error::NotInDatabase;
    assert_eq!(format!("{}", err), "Object is not in this database");
}

#[test]
fn test_extent_unset_display() {
    let err = Error::ExtentUnset;
    assert_eq!(format!("{}", err), "Object has no extent set");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::NotInDatabase;
    // Verify Error implements std::error::Error trait
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    assert!(format!("{:?}", Error::AlreadyInDatabase).contains("AlreadyInDatabase"));
    assert!(format!("{:?}", Error::NotInDatabase).contains("NotInDatabase"));
    assert!(format!("{:?}", Error::ExtentUnset).contains("ExtentUnset"));
}

#[test]
fn test_error_eq() {
    assert_eq!(Error::ExtentUnset, Error::ExtentUnset);
    assert_ne!(Error::ExtentUnset, Error::NotInDatabase);
}

// ============================================================================
// RESULT TYPE TESTS
// ============================================================================

#[test]
fn test_result_type_ok() {
    fn returns_ok() -> Result<i32> {
        Ok(42)
    }

    let result = returns_ok();
    assert!(result.is_ok());
    assert_eq!(result.unwrap(), 42);
}

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::ExtentUnset)
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    let result = outer();
    assert_eq!(result, Err(Error::ExtentUnset));
}
