//! Fluent entity configuration
//!
//! `EntityConfiguration` records per-concern settings for one entity. The
//! attribute scanner produces one from annotations; an application may
//! supply another through the fluent API. [`EntityConfiguration::merge`]
//! lays the second on top of the first: every concern the overlay sets
//! replaces the baseline value whole.

use crate::descriptor::Describe;
use crate::links::Links;
use adminkit_core::{
    DataType, DefaultValue, DeleteOption, FileOptions, ImageSettings, NameCreation,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Groups
// ============================================================================

/// A named group of properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub collapsed: bool,
    /// Member names in the group (in group order)
    pub properties: Vec<String>,
}

impl GroupSpec {
    /// Parse a group name where a trailing `*` marks the group collapsed
    pub fn parse(raw: &str, properties: Vec<String>) -> Self {
        let collapsed = raw.ends_with('*');
        Self {
            name: raw.trim_end_matches('*').to_string(),
            collapsed,
            properties,
        }
    }
}

// ============================================================================
// PropertyConfiguration
// ============================================================================

/// Configured concerns of one property
///
/// `None` means "not configured here". `Some(None)` on a nested option
/// explicitly clears the value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyConfiguration {
    pub is_key: Option<bool>,
    pub column: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<Option<String>>,
    pub group_name: Option<Option<String>>,
    pub format: Option<Option<String>>,
    pub required: Option<bool>,
    pub required_message: Option<Option<String>>,
    pub max_length: Option<usize>,
    pub default_value: Option<Option<DefaultValue>>,
    pub display_template: Option<Option<String>>,
    pub editor_template: Option<Option<String>>,
    pub data_type: Option<DataType>,
    pub enum_type: Option<(String, Vec<String>)>,
    pub file_options: Option<FileOptions>,
    pub image_settings: Option<Vec<ImageSettings>>,
    pub on_delete: Option<DeleteOption>,
    pub foreign_key: Option<String>,
    pub searchable: Option<bool>,
    pub visible: Option<bool>,
}

impl PropertyConfiguration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark as part of the primary key
    pub fn id(mut self) -> Self {
        self.is_key = Some(true);
        self
    }

    /// Set the backing column
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Set display name and description together
    pub fn display(mut self, name: impl Into<String>, description: Option<&str>) -> Self {
        self.display_name = Some(name.into());
        self.description = Some(description.map(str::to_string));
        self
    }

    /// Set the display name
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Put the property into a named group
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group_name = Some(Some(group.into()));
        self
    }

    /// Set the value display format
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(Some(format.into()));
        self
    }

    /// Mark as required with an optional message
    pub fn required(mut self, message: Option<&str>) -> Self {
        self.required = Some(true);
        self.required_message = Some(message.map(str::to_string));
        self
    }

    /// Mark as optional
    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self.required_message = Some(None);
        self
    }

    /// Limit the length of submitted text, in characters
    pub fn string_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set the default value
    pub fn default_value(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default_value = Some(Some(value.into()));
        self
    }

    /// Set both template hints; a `None` half is cleared
    pub fn template(mut self, display: Option<&str>, editor: Option<&str>) -> Self {
        self.display_template = Some(display.map(str::to_string));
        self.editor_template = Some(editor.map(str::to_string));
        self
    }

    /// Set only the display template
    pub fn display_template(mut self, template: impl Into<String>) -> Self {
        self.display_template = Some(Some(template.into()));
        self
    }

    /// Set only the editor template
    pub fn editor_template(mut self, template: impl Into<String>) -> Self {
        self.editor_template = Some(Some(template.into()));
        self
    }

    /// Override the property kind
    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Treat the property as an enum with the given variants
    pub fn enum_type(mut self, name: impl Into<String>, variants: &[&str]) -> Self {
        self.data_type = Some(DataType::Enum);
        self.enum_type = Some((
            name.into(),
            variants.iter().map(|v| v.to_string()).collect(),
        ));
        self
    }

    /// Configure as an uploaded file
    pub fn file(
        mut self,
        name_creation: NameCreation,
        max_file_size: u64,
        is_image: bool,
        path: impl Into<String>,
        allowed_file_extensions: &[&str],
    ) -> Self {
        let options = FileOptions {
            name_creation,
            max_file_size,
            is_image,
            path: path.into(),
            allowed_file_extensions: allowed_file_extensions
                .iter()
                .map(|e| e.to_string())
                .collect(),
            settings: Vec::new(),
        };
        self.data_type = Some(if is_image { DataType::Image } else { DataType::File });
        self.file_options = Some(options);
        self
    }

    /// Add an image rendition
    ///
    /// Renditions accumulate within one configuration; an overlay that
    /// names any rendition replaces the baseline list.
    pub fn image(mut self, sub_path: impl Into<String>, width: Option<u32>, height: Option<u32>) -> Self {
        self.image_settings
            .get_or_insert_with(Vec::new)
            .push(ImageSettings::new(sub_path, width, height));
        self
    }

    /// Set the delete behaviour
    pub fn on_delete(mut self, option: DeleteOption) -> Self {
        self.on_delete = Some(option);
        self
    }

    /// Set the foreign key target
    pub fn foreign_key(mut self, target: impl Into<String>) -> Self {
        self.foreign_key = Some(target.into());
        self
    }

    /// Include in or exclude from free-text search
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = Some(searchable);
        self
    }

    /// Show in or hide from lists
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Lay `overlay` on top of this configuration
    pub fn merge(&mut self, overlay: PropertyConfiguration) {
        fn take<T>(base: &mut Option<T>, over: Option<T>) {
            if over.is_some() {
                *base = over;
            }
        }

        take(&mut self.is_key, overlay.is_key);
        take(&mut self.column, overlay.column);
        take(&mut self.display_name, overlay.display_name);
        take(&mut self.description, overlay.description);
        take(&mut self.group_name, overlay.group_name);
        take(&mut self.format, overlay.format);
        take(&mut self.required, overlay.required);
        take(&mut self.required_message, overlay.required_message);
        take(&mut self.max_length, overlay.max_length);
        take(&mut self.default_value, overlay.default_value);
        take(&mut self.display_template, overlay.display_template);
        take(&mut self.editor_template, overlay.editor_template);
        take(&mut self.data_type, overlay.data_type);
        take(&mut self.enum_type, overlay.enum_type);
        take(&mut self.file_options, overlay.file_options);
        take(&mut self.image_settings, overlay.image_settings);
        take(&mut self.on_delete, overlay.on_delete);
        take(&mut self.foreign_key, overlay.foreign_key);
        take(&mut self.searchable, overlay.searchable);
        take(&mut self.visible, overlay.visible);
    }
}

// ============================================================================
// EntityConfiguration
// ============================================================================

/// Configured concerns of one entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityConfiguration {
    /// Entity (type) name this configuration applies to
    pub entity: String,

    /// Table name and optional schema
    pub table: Option<(String, Option<String>)>,
    pub search_properties: Option<Vec<String>>,
    pub display_properties: Option<Vec<String>>,
    pub display_format: Option<Option<String>>,
    pub groups: Option<Vec<GroupSpec>>,
    pub verbose_singular: Option<String>,
    pub verbose_plural: Option<String>,
    pub verbose_group: Option<String>,
    pub allow_add: Option<bool>,
    pub allow_edit: Option<bool>,
    pub allow_delete: Option<bool>,
    pub links: Option<Links>,

    /// Per-property configuration, in first-configured order
    pub properties: Vec<(String, PropertyConfiguration)>,
}

impl EntityConfiguration {
    /// Create an empty configuration for an entity
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Self::default()
        }
    }

    /// Create an empty configuration for a described Rust type
    pub fn of<T: Describe>() -> Self {
        Self::new(T::TYPE_NAME)
    }

    // ========================================================================
    // Entity-level directives
    // ========================================================================

    /// Set the backing table
    pub fn table(mut self, name: impl Into<String>, schema: Option<&str>) -> Self {
        self.table = Some((name.into(), schema.map(str::to_string)));
        self
    }

    /// Set the free-text search properties
    pub fn search_properties(mut self, names: &[&str]) -> Self {
        self.search_properties = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Set the properties shown in lists
    pub fn display_properties(mut self, names: &[&str]) -> Self {
        self.display_properties = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Set the record display format
    pub fn display_format(mut self, format: impl Into<String>) -> Self {
        self.display_format = Some(Some(format.into()));
        self
    }

    /// Add a property group
    ///
    /// The first group directive of a configuration replaces any groups of
    /// the configuration it is merged onto.
    pub fn property_group(mut self, name: impl Into<String>, collapsed: bool, names: &[&str]) -> Self {
        self.groups.get_or_insert_with(Vec::new).push(GroupSpec {
            name: name.into(),
            collapsed,
            properties: names.iter().map(|n| n.to_string()).collect(),
        });
        self
    }

    /// Set the singular and plural labels
    pub fn verbose(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.verbose_singular = Some(singular.into());
        self.verbose_plural = Some(plural.into());
        self
    }

    /// Set the menu group label
    pub fn verbose_group(mut self, group: impl Into<String>) -> Self {
        self.verbose_group = Some(group.into());
        self
    }

    /// Allow or forbid adding records
    pub fn allow_add(mut self, allow: bool) -> Self {
        self.allow_add = Some(allow);
        self
    }

    /// Allow or forbid editing records
    pub fn allow_edit(mut self, allow: bool) -> Self {
        self.allow_edit = Some(allow);
        self
    }

    /// Allow or forbid deleting records
    pub fn allow_delete(mut self, allow: bool) -> Self {
        self.allow_delete = Some(allow);
        self
    }

    /// Set the per-record link templates (replacing all three)
    pub fn links(mut self, links: Links) -> Self {
        self.links = Some(links);
        self
    }

    // ========================================================================
    // Property directives
    // ========================================================================

    /// Configure one property
    ///
    /// Repeated calls for the same property merge in call order.
    pub fn property(
        mut self,
        name: impl Into<String>,
        configure: impl FnOnce(PropertyConfiguration) -> PropertyConfiguration,
    ) -> Self {
        let rules = configure(PropertyConfiguration::new());
        self.merge_property(name.into(), rules);
        self
    }

    /// Get the configuration recorded for a property
    pub fn property_configuration(&self, name: &str) -> Option<&PropertyConfiguration> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rules)| rules)
    }

    fn merge_property(&mut self, name: String, rules: PropertyConfiguration) {
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => existing.merge(rules),
            None => self.properties.push((name, rules)),
        }
    }

    /// Lay `overlay` on top of this configuration (last writer wins)
    pub fn merge(&mut self, overlay: EntityConfiguration) {
        fn take<T>(base: &mut Option<T>, over: Option<T>) {
            if over.is_some() {
                *base = over;
            }
        }

        take(&mut self.table, overlay.table);
        take(&mut self.search_properties, overlay.search_properties);
        take(&mut self.display_properties, overlay.display_properties);
        take(&mut self.display_format, overlay.display_format);
        take(&mut self.groups, overlay.groups);
        take(&mut self.verbose_singular, overlay.verbose_singular);
        take(&mut self.verbose_plural, overlay.verbose_plural);
        take(&mut self.verbose_group, overlay.verbose_group);
        take(&mut self.allow_add, overlay.allow_add);
        take(&mut self.allow_edit, overlay.allow_edit);
        take(&mut self.allow_delete, overlay.allow_delete);
        take(&mut self.links, overlay.links);

        for (name, rules) in overlay.properties {
            self.merge_property(name, rules);
        }
    }

    /// All property names referenced anywhere in this configuration
    pub fn referenced_properties(&self) -> Vec<&str> {
        let lists = [&self.search_properties, &self.display_properties];
        let mut names: Vec<&str> = lists
            .into_iter()
            .flatten()
            .flatten()
            .map(String::as_str)
            .collect();
        names.extend(
            self.groups
                .iter()
                .flatten()
                .flat_map(|g| g.properties.iter().map(String::as_str)),
        );
        names.extend(self.properties.iter().map(|(n, _)| n.as_str()));
        names
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_group_spec_parse() {
        let group = GroupSpec::parse("Other*", vec!["Notes".to_string()]);
        assert_eq!(group.name, "Other");
        assert!(group.collapsed);
        assert!(!GroupSpec::parse("Main", vec![]).collapsed);
    }

    #[test]
    fn test_property_merge_last_writer_wins() {
        let mut base = PropertyConfiguration::new()
            .display_name("Bar")
            .column("product_name")
            .required(Some("Required"));
        base.merge(PropertyConfiguration::new().display_name("Foo"));

        assert_eq!(base.display_name.as_deref(), Some("Foo"));
        assert_eq!(base.column.as_deref(), Some("product_name"));
        assert_eq!(base.required, Some(true));
    }

    #[test]
    fn test_string_length_overlay() {
        let mut base = PropertyConfiguration::new().string_length(40);
        base.merge(PropertyConfiguration::new().required(None));
        assert_eq!(base.max_length, Some(40));

        base.merge(PropertyConfiguration::new().string_length(15));
        assert_eq!(base.max_length, Some(15));
    }

    #[test]
    fn test_template_replaces_both_halves() {
        let mut base = PropertyConfiguration::new().template(Some("Stars"), Some("StarPicker"));
        base.merge(PropertyConfiguration::new().template(Some("Plain"), None));
        assert_eq!(base.display_template, Some(Some("Plain".to_string())));
        assert_eq!(base.editor_template, Some(None));
    }

    #[test]
    fn test_single_template_half() {
        let mut base = PropertyConfiguration::new().template(Some("Stars"), Some("StarPicker"));
        base.merge(PropertyConfiguration::new().display_template("Plain"));
        assert_eq!(base.display_template, Some(Some("Plain".to_string())));
        assert_eq!(base.editor_template, Some(Some("StarPicker".to_string())));
    }

    #[test]
    fn test_image_overlay_replaces_renditions() {
        let mut base = PropertyConfiguration::new()
            .image("big", Some(800), None)
            .image("min", Some(100), Some(100));
        assert_eq!(base.image_settings.as_ref().map(Vec::len), Some(2));

        base.merge(PropertyConfiguration::new().image("thumb", Some(50), Some(50)));
        assert_eq!(
            base.image_settings,
            Some(vec![ImageSettings::new("thumb", Some(50), Some(50))])
        );
    }

    #[test]
    fn test_entity_fluent_and_merge() {
        let mut scanned = EntityConfiguration::new("Product")
            .table("Products", None)
            .search_properties(&["ProductName"])
            .property("ProductName", |p| p.display_name("Bar"));

        let fluent = EntityConfiguration::new("Product")
            .table("Products", Some("sales"))
            .property("ProductName", |p| p.display_name("Foo"))
            .property("UnitPrice", |p| p.format("{0:c}"));

        scanned.merge(fluent);

        assert_eq!(
            scanned.table,
            Some(("Products".to_string(), Some("sales".to_string())))
        );
        assert_eq!(scanned.search_properties, Some(vec!["ProductName".to_string()]));
        assert_eq!(
            scanned
                .property_configuration("ProductName")
                .and_then(|p| p.display_name.as_deref()),
            Some("Foo")
        );
        assert!(scanned.property_configuration("UnitPrice").is_some());
    }

    #[test]
    fn test_repeated_property_calls_merge() {
        let config = EntityConfiguration::new("Product")
            .property("UnitPrice", |p| p.required(None))
            .property("UnitPrice", |p| p.display_name("Price"));
        assert_eq!(config.properties.len(), 1);
        let rules = config.property_configuration("UnitPrice").unwrap();
        assert_eq!(rules.required, Some(true));
        assert_eq!(rules.display_name.as_deref(), Some("Price"));
    }

    #[test]
    fn test_referenced_properties() {
        let config = EntityConfiguration::new("Product")
            .search_properties(&["ProductName"])
            .display_properties(&["ProductName", "UnitPrice"])
            .property_group("Main", false, &["ProductName"])
            .property("Discontinued", |p| p.visible(false));
        assert_eq!(
            config.referenced_properties(),
            vec!["ProductName", "ProductName", "UnitPrice", "ProductName", "Discontinued"]
        );
    }

    #[test]
    fn test_file_sets_kind() {
        let rules = PropertyConfiguration::new().file(
            NameCreation::Uuid,
            1024,
            true,
            "images",
            &[".png"],
        );
        assert_eq!(rules.data_type, Some(DataType::Image));
        assert_eq!(rules.file_options.unwrap().path, "images");
    }
}
