//! Structural descriptions of administrable types
//!
//! A `TypeDescriptor` is what the metadata builder sees of a domain type:
//! its name, its members in declaration order with their declared types,
//! and the annotations attached to the type and to each member. Rust types
//! provide one through [`Describe`]; types described elsewhere are loaded
//! from JSON.

use crate::annotation::Annotation;
use adminkit_core::{AdminError, AdminResult, DeclaredType, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// Describe Trait
// ============================================================================

/// Implemented by domain types that can be administered
///
/// # Example
///
/// ```rust,ignore
/// use adminkit_core::{DeclaredType, ScalarKind};
/// use adminkit_meta::{Annotation, Describe, MemberDescriptor, TypeDescriptor};
///
/// struct Shipper;
///
/// impl Describe for Shipper {
///     const TYPE_NAME: &'static str = "Shipper";
///
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::new(Self::TYPE_NAME)
///             .with_member(
///                 MemberDescriptor::new("ShipperID", DeclaredType::scalar(ScalarKind::Int32))
///                     .annotate(Annotation::Key),
///             )
///             .with_member(MemberDescriptor::new(
///                 "CompanyName",
///                 DeclaredType::scalar(ScalarKind::String),
///             ))
///     }
/// }
/// ```
pub trait Describe {
    /// Type identity used as the registry key
    const TYPE_NAME: &'static str;

    /// Describe the type's shape and annotations
    fn describe() -> TypeDescriptor;
}

// ============================================================================
// MemberDescriptor
// ============================================================================

/// One member (field) of a described type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub name: String,

    /// Declared type of the member
    #[serde(rename = "type")]
    pub declared: DeclaredType,

    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl MemberDescriptor {
    /// Create a new member
    pub fn new(name: impl Into<String>, declared: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared,
            annotations: Vec::new(),
        }
    }

    /// Attach an annotation
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

// ============================================================================
// TypeDescriptor
// ============================================================================

/// Structural description of one domain type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    /// Members in declaration order
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    /// Create an empty descriptor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Describe a Rust type
    pub fn of<T: Describe>() -> Self {
        T::describe()
    }

    /// Attach a type-level annotation
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Append a member
    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    /// Get a member by name
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Check if a member exists
    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    /// Parse one descriptor, or a list of descriptors, from JSON
    pub fn from_json(json: &str) -> AdminResult<Vec<Self>> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let descriptors = if value.is_array() {
            serde_json::from_value(value)?
        } else {
            vec![serde_json::from_value(value)?]
        };
        Ok(descriptors)
    }

    /// Load descriptors from a JSON file
    pub fn load(path: impl AsRef<Path>) -> AdminResult<Vec<Self>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AdminError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let descriptors = Self::from_json(&content).map_err(|e| AdminError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(
            "Loaded {} descriptor(s) from {}",
            descriptors.len(),
            path.display()
        );
        Ok(descriptors)
    }
}

impl Validatable for TypeDescriptor {
    fn validate(&self) -> AdminResult<()> {
        if self.name.trim().is_empty() {
            return Err(AdminError::entity_validation(
                &self.name,
                "Type name cannot be empty",
            ));
        }

        let mut seen = HashSet::new();
        for member in &self.members {
            if !seen.insert(member.name.as_str()) {
                return Err(AdminError::DuplicateProperty {
                    entity: self.name.clone(),
                    property: member.name.clone(),
                });
            }
            if let Some(annotation) = member.annotations.iter().find(|a| a.is_type_level()) {
                return Err(AdminError::configuration(
                    &self.name,
                    format!(
                        "Annotation {:?} is not allowed on member '{}'",
                        annotation, member.name
                    ),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
