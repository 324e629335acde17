//! Core types used throughout AdminKit
//!
//! This module contains the vocabulary shared by the metadata builder,
//! the binder and the filter compiler: declared member shapes, the data
//! kinds a property can take, and the file/image options.

use serde::{Deserialize, Serialize};

// ============================================================================
// Scalar Kinds
// ============================================================================

/// Primitive (system) types a member can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Char,
    String,
    DateTime,
    Date,
    Time,
    Uuid,
    /// Raw binary content (a file stored inline in the backing store)
    Bytes,
}

impl ScalarKind {
    /// Check if this kind holds an integer
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ScalarKind::Byte | ScalarKind::Int16 | ScalarKind::Int32 | ScalarKind::Int64
        )
    }

    /// Check if this kind holds a floating point or decimal number
    pub fn is_real(&self) -> bool {
        matches!(
            self,
            ScalarKind::Float32 | ScalarKind::Float64 | ScalarKind::Decimal
        )
    }

    /// Get a user-friendly name
    pub fn display_name(&self) -> &'static str {
        match self {
            ScalarKind::Bool => "Boolean",
            ScalarKind::Byte => "Byte",
            ScalarKind::Int16 => "Int16",
            ScalarKind::Int32 => "Int32",
            ScalarKind::Int64 => "Int64",
            ScalarKind::Float32 => "Single",
            ScalarKind::Float64 => "Double",
            ScalarKind::Decimal => "Decimal",
            ScalarKind::Char => "Char",
            ScalarKind::String => "String",
            ScalarKind::DateTime => "DateTime",
            ScalarKind::Date => "Date",
            ScalarKind::Time => "Time",
            ScalarKind::Uuid => "Uuid",
            ScalarKind::Bytes => "Binary",
        }
    }
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Declared Types
// ============================================================================

/// The type a member is declared with on the described domain type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum DeclaredType {
    /// A system (primitive) type
    Scalar(ScalarKind),
    /// Nullable wrapper
    Optional(Box<DeclaredType>),
    /// Collection of items
    Collection(Box<DeclaredType>),
    /// Another administrable domain type, referenced by name
    Entity(String),
    /// Enumeration with named variants
    Enum { name: String, variants: Vec<String> },
}

impl DeclaredType {
    /// Shorthand for a scalar declaration
    pub fn scalar(kind: ScalarKind) -> Self {
        DeclaredType::Scalar(kind)
    }

    /// Shorthand for a nullable declaration
    pub fn optional(inner: DeclaredType) -> Self {
        DeclaredType::Optional(Box::new(inner))
    }

    /// Shorthand for a collection declaration
    pub fn collection(inner: DeclaredType) -> Self {
        DeclaredType::Collection(Box::new(inner))
    }

    /// Shorthand for a reference to another entity
    pub fn entity(name: impl Into<String>) -> Self {
        DeclaredType::Entity(name.into())
    }

    /// Get a user-friendly display name
    pub fn display_name(&self) -> String {
        match self {
            DeclaredType::Scalar(kind) => kind.display_name().to_string(),
            DeclaredType::Optional(inner) => format!("{}?", inner.display_name()),
            DeclaredType::Collection(inner) => format!("[{}]", inner.display_name()),
            DeclaredType::Entity(name) => name.clone(),
            DeclaredType::Enum { name, .. } => format!("Enum<{}>", name),
        }
    }
}

impl Default for DeclaredType {
    fn default() -> Self {
        DeclaredType::Scalar(ScalarKind::String)
    }
}

impl std::fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Data Types
// ============================================================================

/// Property kind, as used for editing, display and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    Unknown,
    Text,
    Numeric,
    Real,
    Bool,
    DateTime,
    Date,
    Time,
    Enum,
    File,
    Image,
}

impl DataType {
    /// Derive the kind from a system type
    pub fn from_scalar(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Bool => DataType::Bool,
            ScalarKind::Byte | ScalarKind::Int16 | ScalarKind::Int32 | ScalarKind::Int64 => {
                DataType::Numeric
            }
            ScalarKind::Float32 | ScalarKind::Float64 | ScalarKind::Decimal => DataType::Real,
            ScalarKind::Char | ScalarKind::String | ScalarKind::Uuid => DataType::Text,
            ScalarKind::DateTime => DataType::DateTime,
            ScalarKind::Date => DataType::Date,
            ScalarKind::Time => DataType::Time,
            ScalarKind::Bytes => DataType::File,
        }
    }

    /// Map a declarative data-type classification to a property kind
    pub fn from_source(source: SourceDataType) -> Self {
        match source {
            SourceDataType::DateTime => DataType::DateTime,
            SourceDataType::Date => DataType::Date,
            SourceDataType::Time | SourceDataType::Duration => DataType::Time,
            SourceDataType::Currency => DataType::Real,
            SourceDataType::Upload => DataType::File,
            SourceDataType::ImageUrl => DataType::Image,
            SourceDataType::Custom
            | SourceDataType::PhoneNumber
            | SourceDataType::Text
            | SourceDataType::Html
            | SourceDataType::MultilineText
            | SourceDataType::EmailAddress
            | SourceDataType::Password
            | SourceDataType::Url
            | SourceDataType::CreditCard
            | SourceDataType::PostalCode => DataType::Text,
        }
    }

    /// Check if values of this kind carry a calendar date
    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::DateTime | DataType::Date)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DataType::Unknown => "Unknown",
            DataType::Text => "Text",
            DataType::Numeric => "Numeric",
            DataType::Real => "Real",
            DataType::Bool => "Bool",
            DataType::DateTime => "DateTime",
            DataType::Date => "Date",
            DataType::Time => "Time",
            DataType::Enum => "Enum",
            DataType::File => "File",
            DataType::Image => "Image",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Declarative data-type classification attached to a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceDataType {
    Custom,
    DateTime,
    Date,
    Time,
    Duration,
    PhoneNumber,
    Currency,
    Text,
    Html,
    MultilineText,
    EmailAddress,
    Password,
    Url,
    ImageUrl,
    CreditCard,
    PostalCode,
    Upload,
}

// ============================================================================
// File & Image Options
// ============================================================================

/// How stored file names are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NameCreation {
    /// Keep the uploaded file name
    #[default]
    OriginalFileName,
    /// Name the file after the upload time
    Timestamp,
    /// Name the file with a random UUID
    Uuid,
    /// The user types the name in a companion field
    UserInput,
}

/// One stored rendition of an uploaded image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ImageSettings {
    /// Sub directory for this rendition (empty for the main image)
    #[serde(default)]
    pub sub_path: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageSettings {
    /// Create a new rendition
    pub fn new(sub_path: impl Into<String>, width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            sub_path: sub_path.into(),
            width,
            height,
        }
    }
}

/// Upload options for a file or image property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOptions {
    pub name_creation: NameCreation,
    /// Maximum accepted upload size in bytes
    pub max_file_size: u64,
    pub is_image: bool,
    /// Storage directory (relative to the storage root)
    pub path: String,
    /// Accepted extensions, including the dot
    pub allowed_file_extensions: Vec<String>,
    /// Image renditions (only meaningful when `is_image`)
    pub settings: Vec<ImageSettings>,
}

impl FileOptions {
    /// Default maximum upload size: 2 MiB
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

    /// Create default options for a plain file
    pub fn new() -> Self {
        Self::default()
    }

    /// Create default options for an image
    pub fn image() -> Self {
        Self {
            is_image: true,
            allowed_file_extensions: [".jpg", ".jpeg", ".png", ".gif", ".bmp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            ..Self::default()
        }
    }

    /// Set the naming policy
    pub fn with_name_creation(mut self, name_creation: NameCreation) -> Self {
        self.name_creation = name_creation;
        self
    }

    /// Check whether a file name has an accepted extension
    pub fn accepts(&self, file_name: &str) -> bool {
        if self.allowed_file_extensions.is_empty() {
            return true;
        }
        let lower = file_name.to_lowercase();
        self.allowed_file_extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_lowercase()))
    }
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            name_creation: NameCreation::OriginalFileName,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            is_image: false,
            path: "content".to_string(),
            allowed_file_extensions: Vec::new(),
            settings: Vec::new(),
        }
    }
}

// ============================================================================
// Delete Options
// ============================================================================

/// What happens to dependent records when a record is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOption {
    /// Leave dependants untouched (the store decides)
    #[default]
    Nothing,
    /// Set the dependant's foreign key to NULL
    SetNull,
    /// Delete dependants as well
    CascadeDelete,
    /// Let the user choose per deletion
    AskUser,
}

impl DeleteOption {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DeleteOption::Nothing => "Nothing",
            DeleteOption::SetNull => "Set null",
            DeleteOption::CascadeDelete => "Cascade delete",
            DeleteOption::AskUser => "Ask user",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_from_scalar() {
        assert_eq!(DataType::from_scalar(ScalarKind::Int32), DataType::Numeric);
        assert_eq!(DataType::from_scalar(ScalarKind::Decimal), DataType::Real);
        assert_eq!(DataType::from_scalar(ScalarKind::Uuid), DataType::Text);
        assert_eq!(DataType::from_scalar(ScalarKind::Bytes), DataType::File);
        assert_eq!(DataType::from_scalar(ScalarKind::Date), DataType::Date);
    }

    #[test]
    fn test_data_type_from_source() {
        assert_eq!(DataType::from_source(SourceDataType::Date), DataType::Date);
        assert_eq!(DataType::from_source(SourceDataType::Html), DataType::Text);
        assert_eq!(DataType::from_source(SourceDataType::Currency), DataType::Real);
        assert_eq!(DataType::from_source(SourceDataType::Upload), DataType::File);
        assert_eq!(DataType::from_source(SourceDataType::ImageUrl), DataType::Image);
    }

    #[test]
    fn test_declared_type_display() {
        let t = DeclaredType::collection(DeclaredType::entity("Product"));
        assert_eq!(t.display_name(), "[Product]");
        let t = DeclaredType::optional(DeclaredType::scalar(ScalarKind::Int32));
        assert_eq!(t.display_name(), "Int32?");
    }

    #[test]
    fn test_declared_type_serde() {
        let t = DeclaredType::optional(DeclaredType::scalar(ScalarKind::DateTime));
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"kind":"optional","of":{"kind":"scalar","of":"date_time"}}"#);
        let back: DeclaredType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_file_options_accepts() {
        let options = FileOptions::image();
        assert!(options.is_image);
        assert!(options.accepts("photo.JPG"));
        assert!(!options.accepts("notes.txt"));
        assert!(FileOptions::new().accepts("anything.bin"));
    }

    #[test]
    fn test_scalar_kind_classes() {
        assert!(ScalarKind::Int16.is_integer());
        assert!(!ScalarKind::Float64.is_integer());
        assert!(ScalarKind::Decimal.is_real());
    }
}
