//! Data shape classification for a single property
//!
//! `TypeInfo` is derived once from a member's declared type and answers the
//! questions the binder, the display chain and the filters ask: is this a
//! system type or a foreign entity, a collection, nullable, a file?

use crate::types::{DataType, DeclaredType, ScalarKind};
use serde::{Deserialize, Serialize};

/// Classification of a property's declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// The declaration this info was derived from
    pub declared: DeclaredType,

    /// Property kind (may be overridden by a data-type annotation)
    pub data_type: DataType,

    /// Innermost primitive type, when the member is a system type
    pub scalar: Option<ScalarKind>,

    /// Name of the referenced entity type, when the member is not a system type
    pub entity_name: Option<String>,

    /// Enum name and variants, when declared as an enum
    pub enum_name: Option<String>,
    pub enum_variants: Vec<String>,

    pub is_collection: bool,
    pub is_nullable: bool,
}

impl TypeInfo {
    /// Classify a declared type
    pub fn from_declared(declared: &DeclaredType) -> Self {
        let mut info = Self {
            declared: declared.clone(),
            data_type: DataType::Unknown,
            scalar: None,
            entity_name: None,
            enum_name: None,
            enum_variants: Vec::new(),
            is_collection: false,
            is_nullable: false,
        };
        info.classify(declared);
        info
    }

    fn classify(&mut self, declared: &DeclaredType) {
        match declared {
            DeclaredType::Scalar(kind) => {
                self.scalar = Some(*kind);
                self.data_type = DataType::from_scalar(*kind);
            }
            DeclaredType::Optional(inner) => {
                self.is_nullable = true;
                self.classify(inner);
            }
            DeclaredType::Collection(inner) => {
                self.is_collection = true;
                self.classify(inner);
            }
            DeclaredType::Entity(name) => {
                self.entity_name = Some(name.clone());
                self.data_type = DataType::Unknown;
            }
            DeclaredType::Enum { name, variants } => {
                self.enum_name = Some(name.clone());
                self.enum_variants = variants.clone();
                self.data_type = DataType::Enum;
            }
        }
    }

    /// Replace the property kind (data-type annotations and overrides)
    pub fn set_data_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
    }

    /// True when the member is declared with a primitive or enum type
    pub fn is_system_type(&self) -> bool {
        self.entity_name.is_none()
    }

    pub fn is_file(&self) -> bool {
        matches!(self.data_type, DataType::File | DataType::Image)
    }

    pub fn is_image(&self) -> bool {
        self.data_type == DataType::Image
    }

    /// File content is kept in the row itself rather than on disk
    pub fn is_file_stored_in_db(&self) -> bool {
        self.scalar == Some(ScalarKind::Bytes)
    }

    pub fn is_bool(&self) -> bool {
        self.data_type == DataType::Bool
    }

    pub fn is_enum(&self) -> bool {
        self.data_type == DataType::Enum
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data_type, DataType::Numeric | DataType::Real)
    }

    pub fn is_date_time(&self) -> bool {
        self.data_type.is_temporal()
    }

    pub fn is_string(&self) -> bool {
        self.data_type == DataType::Text
    }
}

impl Default for TypeInfo {
    fn default() -> Self {
        Self::from_declared(&DeclaredType::default())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_classification() {
        let info = TypeInfo::from_declared(&DeclaredType::scalar(ScalarKind::Int32));
        assert_eq!(info.data_type, DataType::Numeric);
        assert!(info.is_system_type());
        assert!(info.is_numeric());
        assert!(!info.is_nullable);
        assert!(!info.is_collection);
    }

    #[test]
    fn test_nullable_date() {
        let info = TypeInfo::from_declared(&DeclaredType::optional(DeclaredType::scalar(
            ScalarKind::DateTime,
        )));
        assert!(info.is_nullable);
        assert!(info.is_date_time());
        assert_eq!(info.scalar, Some(ScalarKind::DateTime));
    }

    #[test]
    fn test_foreign_collection() {
        let info = TypeInfo::from_declared(&DeclaredType::collection(DeclaredType::entity(
            "Product",
        )));
        assert!(info.is_collection);
        assert!(!info.is_system_type());
        assert_eq!(info.entity_name.as_deref(), Some("Product"));
    }

    #[test]
    fn test_bytes_are_inline_files() {
        let info = TypeInfo::from_declared(&DeclaredType::scalar(ScalarKind::Bytes));
        assert!(info.is_file());
        assert!(info.is_file_stored_in_db());
        assert!(!info.is_image());
    }

    #[test]
    fn test_image_override_on_string() {
        let mut info = TypeInfo::from_declared(&DeclaredType::scalar(ScalarKind::String));
        info.set_data_type(DataType::Image);
        assert!(info.is_file());
        assert!(info.is_image());
        assert!(!info.is_file_stored_in_db());
    }

    #[test]
    fn test_enum_classification() {
        let info = TypeInfo::from_declared(&DeclaredType::Enum {
            name: "OrderStatus".to_string(),
            variants: vec!["New".to_string(), "Shipped".to_string()],
        });
        assert!(info.is_enum());
        assert!(info.is_system_type());
        assert_eq!(info.enum_variants.len(), 2);
    }
}
