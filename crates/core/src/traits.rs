//! Core traits for AdminKit
//!
//! This module defines the behaviour shared by metadata components that
//! must check their own consistency before they are published.

use crate::error::AdminResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Metadata is validated once while the registry is built; a failure
/// aborts the build so no inconsistent description is ever shared.
///
/// # Example
///
/// ```rust,ignore
/// use adminkit_core::{AdminError, AdminResult, Validatable};
///
/// struct Table {
///     name: String,
/// }
///
/// impl Validatable for Table {
///     fn validate(&self) -> AdminResult<()> {
///         if self.name.is_empty() {
///             return Err(AdminError::entity_validation("?", "Table name cannot be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or an `AdminError` describing the problem.
    fn validate(&self) -> AdminResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
