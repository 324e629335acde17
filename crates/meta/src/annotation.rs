//! Declarative annotations carried by type descriptors
//!
//! Annotations are the attribute-style metadata a domain type (or one of
//! its members) declares about itself. The [`AttributeScanner`] turns them
//! into an initial [`EntityConfiguration`].
//!
//! [`AttributeScanner`]: crate::scanner::AttributeScanner
//! [`EntityConfiguration`]: crate::configuration::EntityConfiguration

use crate::links::Links;
use adminkit_core::{DefaultValue, DeleteOption, FileOptions, ImageSettings, SourceDataType};
use serde::{Deserialize, Serialize};

/// One declarative annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "args", rename_all = "snake_case")]
pub enum Annotation {
    // ========================================================================
    // Type-level
    // ========================================================================
    /// Backing table, optionally schema-qualified
    Table {
        name: String,
        #[serde(default)]
        schema: Option<String>,
    },

    /// Members searched by free-text search
    Search(Vec<String>),

    /// Members shown in lists
    Columns(Vec<String>),

    /// Record display format with `{PropertyName}` tokens
    RecordDisplay(String),

    /// Ordered group names; a trailing `*` marks the group collapsed
    Groups(Vec<String>),

    /// Display labels for the entity
    Verbose {
        #[serde(default)]
        singular: Option<String>,
        #[serde(default)]
        plural: Option<String>,
        #[serde(default)]
        group: Option<String>,
    },

    /// Per-record link templates with a `{0}` key token
    Links(Links),

    // ========================================================================
    // Member-level
    // ========================================================================
    /// Data-type classification
    DataType(SourceDataType),

    /// Member holds one of the named enum variants
    EnumDataType { name: String, variants: Vec<String> },

    /// Member holds an uploaded file
    File(FileOptions),

    /// One rendition of an uploaded image (may repeat)
    ImageSettings(ImageSettings),

    /// UI hint used for both display and editing
    UiHint(String),

    /// Explicit display and editor templates
    Template {
        #[serde(default)]
        display: Option<String>,
        #[serde(default)]
        editor: Option<String>,
    },

    /// Member is part of the primary key
    Key,

    /// Behaviour for dependants when a record is deleted
    OnDelete(DeleteOption),

    /// Column name in the backing table
    Column(String),

    /// Display name, description and group
    Display {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        group: Option<String>,
    },

    /// Display format string for the member's value
    DisplayFormat(String),

    /// Member must have a value
    Required {
        #[serde(default)]
        message: Option<String>,
    },

    /// Longest accepted text value, in characters
    StringLength(usize),

    /// Foreign key target
    ForeignKey(String),

    /// Default installed when nothing was bound
    DefaultValue(DefaultValue),
}

impl Annotation {
    /// Check if this annotation belongs on a type rather than a member
    pub fn is_type_level(&self) -> bool {
        matches!(
            self,
            Annotation::Table { .. }
                | Annotation::Search(_)
                | Annotation::Columns(_)
                | Annotation::RecordDisplay(_)
                | Annotation::Groups(_)
                | Annotation::Verbose { .. }
                | Annotation::Links(_)
        )
    }
}
