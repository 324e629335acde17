//! Error types for AdminKit
//!
//! This module provides unified error handling across the metadata builder,
//! data binding, key decoding and settings loading.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for AdminKit
#[derive(Debug, Error)]
pub enum AdminError {
    // ========================================================================
    // Configuration Errors (fatal, raised while building metadata)
    // ========================================================================
    /// A configuration directive could not be applied
    #[error("Configuration error for '{entity}': {message}")]
    Configuration { entity: String, message: String },

    /// A foreign key points at an entity that was never registered
    #[error("Property '{entity}.{property}' references unknown entity '{target}'")]
    UnresolvedForeignEntity {
        entity: String,
        property: String,
        target: String,
    },

    /// Two members of one type share a name
    #[error("Duplicate property name: '{property}' already exists in entity '{entity}'")]
    DuplicateProperty { entity: String, property: String },

    /// Two descriptors share a type name
    #[error("Duplicate entity name: '{0}' already registered")]
    DuplicateEntity(String),

    /// Entity metadata is internally inconsistent
    #[error("Entity validation failed for '{entity}': {message}")]
    EntityValidation { entity: String, message: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Entity not found in the registry
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Property not found on an entity
    #[error("Property '{property}' not found in entity '{entity}'")]
    PropertyNotFound { entity: String, property: String },

    // ========================================================================
    // Binding Errors (local to one request)
    // ========================================================================
    /// A submitted value cannot be converted to the declared type
    #[error("Cannot convert value '{raw}' of property '{property}' to {expected}")]
    ValueConversion {
        property: String,
        raw: String,
        expected: String,
    },

    /// A submitted text is longer than its property accepts
    #[error("Value of property '{property}' has {length} characters, at most {max} allowed")]
    ValueTooLong {
        property: String,
        max: usize,
        length: usize,
    },

    /// A key string does not match the entity's key arity
    #[error("Malformed key for '{entity}': expected {expected} value(s), found {found}")]
    MalformedKey {
        entity: String,
        expected: usize,
        found: usize,
    },

    // ========================================================================
    // Settings Errors
    // ========================================================================
    /// Invalid settings value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl AdminError {
    /// Create a configuration error
    pub fn configuration(entity: impl Into<String>, msg: impl Into<String>) -> Self {
        AdminError::Configuration {
            entity: entity.into(),
            message: msg.into(),
        }
    }

    /// Create an entity validation error
    pub fn entity_validation(entity: impl Into<String>, msg: impl Into<String>) -> Self {
        AdminError::EntityValidation {
            entity: entity.into(),
            message: msg.into(),
        }
    }

    /// Create a value conversion error
    pub fn conversion(
        property: impl Into<String>,
        raw: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        AdminError::ValueConversion {
            property: property.into(),
            raw: raw.into(),
            expected: expected.into(),
        }
    }

    /// Create a property-not-found error
    pub fn property_not_found(entity: impl Into<String>, property: impl Into<String>) -> Self {
        AdminError::PropertyNotFound {
            entity: entity.into(),
            property: property.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        AdminError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        AdminError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error belongs to metadata construction
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AdminError::Configuration { .. }
                | AdminError::UnresolvedForeignEntity { .. }
                | AdminError::DuplicateProperty { .. }
                | AdminError::DuplicateEntity(_)
                | AdminError::EntityValidation { .. }
        )
    }

    /// Check if this error is a not-found error
    ///
    /// A malformed key is reported as not-found: the requested record
    /// cannot be addressed.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AdminError::EntityNotFound(_)
                | AdminError::PropertyNotFound { .. }
                | AdminError::MalformedKey { .. }
        )
    }

    /// Check if this error was raised while binding request data
    pub fn is_binding(&self) -> bool {
        matches!(
            self,
            AdminError::ValueConversion { .. }
                | AdminError::ValueTooLong { .. }
                | AdminError::MalformedKey { .. }
        )
    }
}

/// Result type alias using AdminError
pub type AdminResult<T> = Result<T, AdminError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> AdminResult<T>;
}

impl<T, E: Into<AdminError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> AdminResult<T> {
        self.map_err(|e| {
            let err: AdminError = e.into();
            AdminError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let err = AdminError::configuration("Product", "Unknown property 'Nme' in key directive");
        assert!(err.is_configuration());
        assert!(!err.is_binding());
        assert_eq!(
            err.to_string(),
            "Configuration error for 'Product': Unknown property 'Nme' in key directive"
        );
    }

    #[test]
    fn test_conversion_error() {
        let err = AdminError::conversion("UnitPrice", "abc", "Real");
        assert!(err.is_binding());
        assert!(!err.is_configuration());
        assert_eq!(
            err.to_string(),
            "Cannot convert value 'abc' of property 'UnitPrice' to Real"
        );
    }

    #[test]
    fn test_value_too_long() {
        let err = AdminError::ValueTooLong {
            property: "ShipName".to_string(),
            max: 5,
            length: 7,
        };
        assert!(err.is_binding());
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Value of property 'ShipName' has 7 characters, at most 5 allowed"
        );
    }

    #[test]
    fn test_malformed_key_is_not_found() {
        let err = AdminError::MalformedKey {
            entity: "OrderDetail".to_string(),
            expected: 2,
            found: 1,
        };
        assert!(err.is_not_found());
        assert!(err.is_binding());
        assert_eq!(
            err.to_string(),
            "Malformed key for 'OrderDetail': expected 2 value(s), found 1"
        );
    }

    #[test]
    fn test_unresolved_foreign_entity() {
        let err = AdminError::UnresolvedForeignEntity {
            entity: "Product".to_string(),
            property: "Category".to_string(),
            target: "Category".to_string(),
        };
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "Property 'Product.Category' references unknown entity 'Category'"
        );
    }

    #[test]
    fn test_error_with_context() {
        let err = AdminError::with_context("Loading settings", "Permission denied");
        assert_eq!(err.to_string(), "Loading settings: Permission denied");
    }

    #[test]
    fn test_result_ext_wraps_json_error() {
        let parsed: Result<serde_json::Value, serde_json::Error> = serde_json::from_str("{");
        let err = parsed.with_context("Reading descriptor").unwrap_err();
        assert!(matches!(err, AdminError::WithContext { .. }));
        assert!(
            err.to_string()
                .starts_with("Reading descriptor: JSON serialization error:")
        );
    }
}
