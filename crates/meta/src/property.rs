//! Property metadata
//!
//! A `Property` describes one member of an entity: where it is stored,
//! how it is shown and edited, and whether it is part of the key or a
//! reference to another entity.

use crate::configuration::PropertyConfiguration;
use adminkit_core::{
    DataType, DeclaredType, DefaultValue, DeleteOption, FileOptions, ImageSettings, TypeInfo,
};
use heck::ToTitleCase;
use serde::Serialize;

// ============================================================================
// Template
// ============================================================================

/// UI template hints
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Template {
    pub display: Option<String>,
    pub editor: Option<String>,
}

// ============================================================================
// Property
// ============================================================================

/// Metadata of one entity member
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    /// Member name (unique within the entity)
    pub name: String,

    /// Column in the backing table (defaults to the member name)
    pub column: String,

    pub display_name: String,
    pub description: Option<String>,
    pub group_name: Option<String>,

    pub type_info: TypeInfo,

    pub is_key: bool,
    pub is_foreign_key: bool,

    /// Name of the referenced entity, resolved against the registry
    pub foreign_entity: Option<String>,

    pub is_searchable: bool,
    pub is_visible: bool,

    pub required: bool,
    pub required_message: Option<String>,

    /// Longest accepted text value, in characters
    pub max_length: Option<usize>,

    pub default_value: Option<DefaultValue>,
    pub template: Template,

    /// Display format of the value
    pub format: Option<String>,

    /// Upload options (file and image properties only)
    pub file_options: Option<FileOptions>,

    pub on_delete: DeleteOption,
}

impl Property {
    /// Create a property with defaults derived from the declared type
    pub fn new(name: impl Into<String>, declared: &DeclaredType) -> Self {
        let name = name.into();
        let type_info = TypeInfo::from_declared(declared);
        let file_options = type_info.is_file().then(FileOptions::new);

        Self {
            column: name.clone(),
            display_name: name.to_title_case(),
            description: None,
            group_name: None,
            is_key: false,
            is_foreign_key: !type_info.is_system_type(),
            foreign_entity: type_info.entity_name.clone(),
            is_searchable: false,
            is_visible: !type_info.is_collection,
            required: false,
            required_message: None,
            max_length: None,
            default_value: None,
            template: Template::default(),
            format: None,
            file_options,
            on_delete: DeleteOption::default(),
            type_info,
            name,
        }
    }

    /// Apply configured concerns on top of the defaults
    pub fn apply(&mut self, rules: &PropertyConfiguration) {
        if let Some(data_type) = rules.data_type {
            self.set_data_type(data_type);
        }
        if let Some((name, variants)) = &rules.enum_type {
            self.type_info.enum_name = Some(name.clone());
            self.type_info.enum_variants = variants.clone();
            self.type_info.set_data_type(DataType::Enum);
        }
        if let Some(options) = &rules.file_options {
            let mut options = options.clone();
            if let Some(existing) = &self.file_options {
                if options.settings.is_empty() {
                    options.settings = existing.settings.clone();
                }
            }
            if options.is_image {
                self.type_info.set_data_type(DataType::Image);
            } else if !self.type_info.is_file() {
                self.type_info.set_data_type(DataType::File);
            }
            self.file_options = Some(options);
        }
        if let Some(settings) = &rules.image_settings {
            self.type_info.set_data_type(DataType::Image);
            let options = self.file_options.get_or_insert_with(FileOptions::image);
            options.is_image = true;
            options.settings = settings.clone();
        }

        if let Some(target) = &rules.foreign_key {
            self.is_foreign_key = true;
            if self.type_info.is_system_type() {
                self.foreign_entity = Some(target.clone());
            } else {
                // Navigation member: the annotation names the key column
                self.column = target.clone();
            }
        }
        if let Some(column) = &rules.column {
            self.column = column.clone();
        }

        if let Some(is_key) = rules.is_key {
            self.is_key = is_key;
        }
        if let Some(name) = &rules.display_name {
            self.display_name = name.clone();
        }
        if let Some(description) = &rules.description {
            self.description = description.clone();
        }
        if let Some(group) = &rules.group_name {
            self.group_name = group.clone();
        }
        if let Some(format) = &rules.format {
            self.format = format.clone();
        }
        if let Some(required) = rules.required {
            self.required = required;
        }
        if let Some(message) = &rules.required_message {
            self.required_message = message.clone();
        }
        if let Some(max) = rules.max_length {
            self.max_length = Some(max);
        }
        if let Some(default_value) = &rules.default_value {
            self.default_value = default_value.clone();
        }
        if let Some(display) = &rules.display_template {
            self.template.display = display.clone();
        }
        if let Some(editor) = &rules.editor_template {
            self.template.editor = editor.clone();
        }
        if let Some(on_delete) = rules.on_delete {
            self.on_delete = on_delete;
        }
        if let Some(searchable) = rules.searchable {
            self.is_searchable = searchable;
        }
        if let Some(visible) = rules.visible {
            self.is_visible = visible;
        }
    }

    /// Replace the property kind, keeping file options consistent
    pub fn set_data_type(&mut self, data_type: DataType) {
        self.type_info.set_data_type(data_type);
        match data_type {
            DataType::Image => {
                let options = self.file_options.get_or_insert_with(FileOptions::image);
                options.is_image = true;
            }
            DataType::File => {
                self.file_options.get_or_insert_with(FileOptions::new);
            }
            _ => self.file_options = None,
        }
    }

    /// Foreign key holding a set of references
    pub fn is_multi_valued_foreign_key(&self) -> bool {
        self.is_foreign_key && self.type_info.is_collection
    }

    /// Image renditions configured for this property
    pub fn image_settings(&self) -> &[ImageSettings] {
        self.file_options
            .as_ref()
            .map(|o| o.settings.as_slice())
            .unwrap_or_default()
    }

    /// Name of the enum type, if the property holds enum values
    pub fn enum_type(&self) -> Option<&str> {
        self.type_info.enum_name.as_deref()
    }

    /// Column reference prefixed with a table alias (e.g. `p.` or `[t].`)
    pub fn qualified_column(&self, alias: &str) -> String {
        format!("{}{}", alias, self.column)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use adminkit_core::ScalarKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_from_declared_type() {
        let property = Property::new("UnitPrice", &DeclaredType::scalar(ScalarKind::Decimal));
        assert_eq!(property.column, "UnitPrice");
        assert_eq!(property.display_name, "Unit Price");
        assert!(!property.is_foreign_key);
        assert!(property.is_visible);
        assert!(property.file_options.is_none());
    }

    #[test]
    fn test_entity_typed_member_is_foreign_key() {
        let property = Property::new("Category", &DeclaredType::entity("Category"));
        assert!(property.is_foreign_key);
        assert_eq!(property.foreign_entity.as_deref(), Some("Category"));

        let products = Property::new(
            "Products",
            &DeclaredType::collection(DeclaredType::entity("Product")),
        );
        assert!(products.is_multi_valued_foreign_key());
        assert!(!products.is_visible);
    }

    #[test]
    fn test_foreign_key_annotation() {
        let mut id = Property::new("CategoryID", &DeclaredType::scalar(ScalarKind::Int32));
        id.apply(&PropertyConfiguration::new().foreign_key("Category"));
        assert!(id.is_foreign_key);
        assert_eq!(id.foreign_entity.as_deref(), Some("Category"));
        assert_eq!(id.column, "CategoryID");

        let mut nav = Property::new("Category", &DeclaredType::entity("Category"));
        nav.apply(&PropertyConfiguration::new().foreign_key("CategoryID"));
        assert_eq!(nav.foreign_entity.as_deref(), Some("Category"));
        assert_eq!(nav.column, "CategoryID");
    }

    #[test]
    fn test_explicit_column_beats_foreign_key_column() {
        let mut nav = Property::new("Category", &DeclaredType::entity("Category"));
        nav.apply(
            &PropertyConfiguration::new()
                .foreign_key("CategoryID")
                .column("category_id"),
        );
        assert_eq!(nav.column, "category_id");
    }

    #[test]
    fn test_image_settings_make_image() {
        let mut photo = Property::new("Picture", &DeclaredType::scalar(ScalarKind::String));
        photo.apply(
            &PropertyConfiguration::new()
                .image("big", Some(800), None)
                .image("min", Some(100), Some(100)),
        );
        assert!(photo.type_info.is_image());
        assert_eq!(photo.image_settings().len(), 2);
        assert!(photo.file_options.as_ref().unwrap().is_image);
    }

    #[test]
    fn test_data_type_away_from_file_drops_options() {
        let mut blob = Property::new("Data", &DeclaredType::scalar(ScalarKind::Bytes));
        assert!(blob.file_options.is_some());
        blob.set_data_type(DataType::Text);
        assert!(blob.file_options.is_none());
    }

    #[test]
    fn test_apply_presentation_rules() {
        let mut property = Property::new("Notes", &DeclaredType::scalar(ScalarKind::String));
        property.apply(
            &PropertyConfiguration::new()
                .display("Remarks", Some("Free text"))
                .template(Some("Markdown"), Some("MarkdownEditor"))
                .required(Some("Say something"))
                .string_length(500)
                .searchable(true)
                .visible(false),
        );
        assert_eq!(property.display_name, "Remarks");
        assert_eq!(property.description.as_deref(), Some("Free text"));
        assert_eq!(property.template.editor.as_deref(), Some("MarkdownEditor"));
        assert!(property.required);
        assert_eq!(property.max_length, Some(500));
        assert!(property.is_searchable);
        assert!(!property.is_visible);
        assert_eq!(property.qualified_column("n."), "n.Notes");
    }
}
