//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_invalid_binding_display() {
    let err = Error::InvalidBinding("set 3 out of range".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid binding"));
    assert!(display.contains("set 3 out of range"));
}

#[test]
fn test_lock_poisoned_display() {
    let err = Error::LockPoisoned("command buffer".to_string());
    assert_eq!(format!("{}", err), "Lock poisoned: command buffer");
}

#[test]
fn test_unsupported_bind_point_display() {
    let err = Error::UnsupportedBindPoint("SUBPASS_SHADING_HUAWEI".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Unsupported bind point"));
    assert!(display.contains("SUBPASS_SHADING_HUAWEI"));
}

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("push descriptor loader missing".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Backend error"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::InvalidBinding("x".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::LockPoisoned("cb".to_string()));
    assert!(debug.contains("LockPoisoned"));

    let debug = format!("{:?}", Error::UnsupportedBindPoint("bp".to_string()));
    assert!(debug.contains("UnsupportedBindPoint"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::BackendError("test".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// RESULT ALIAS
// ============================================================================

fn fails() -> Result<u32> {
    Err(Error::InvalidBinding("offsets".to_string()))
}

fn propagates() -> Result<u32> {
    let value = fails()?;
    Ok(value + 1)
}

#[test]
fn test_result_propagation() {
    match propagates() {
        Err(Error::InvalidBinding(msg)) => assert_eq!(msg, "offsets"),
        other => panic!("unexpected result: {:?}", other),
    }
}
