//! Entity metadata
//!
//! An `Entity` is the immutable description of one administrable type:
//! its table, labels, properties in declaration order, key and groups.
//! It is built once from a descriptor plus the merged configuration and
//! shared read-only afterwards.

use crate::configuration::EntityConfiguration;
use crate::descriptor::TypeDescriptor;
use crate::display::DisplayAdapter;
use crate::key::KEY_SEPARATOR;
use crate::links::Links;
use crate::property::Property;
use adminkit_core::{AdminError, AdminResult, AdminSettings, Validatable};
use heck::ToTitleCase;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

// ============================================================================
// Supporting Types
// ============================================================================

/// Display labels of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verbose {
    pub singular: String,
    pub plural: String,
    /// Menu group the entity is listed under
    pub group: Option<String>,
}

impl Verbose {
    /// Derive labels from a type name
    pub fn from_type_name(name: &str) -> Self {
        let singular = name.to_title_case();
        Self {
            plural: pluralize(&singular),
            singular,
            group: None,
        }
    }
}

/// A named, ordered group of properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyGroup {
    pub name: String,
    pub collapsed: bool,
    pub properties: Vec<String>,
}

// ============================================================================
// Entity
// ============================================================================

/// Metadata of one administrable type
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    /// Type name (registry key)
    pub name: String,

    /// Rendered table name: `[schema].[table]` or `[table]`
    pub table_name: String,

    pub verbose: Verbose,

    /// Properties in declaration order
    pub properties: Vec<Property>,

    pub groups: Vec<PropertyGroup>,

    pub allow_add: bool,
    pub allow_edit: bool,
    pub allow_delete: bool,

    /// Entity is the change/audit log
    pub is_change_entity: bool,

    /// Format with `{PropertyName}` tokens used to display a record
    pub record_display_format: Option<String>,

    /// Display, edit and delete link templates
    pub links: Links,

    #[serde(skip)]
    pub(crate) display_adapter: Option<DisplayAdapter>,
}

impl Entity {
    /// Create an entity with default metadata for a descriptor
    pub fn new(descriptor: &TypeDescriptor) -> Self {
        let properties = descriptor
            .members
            .iter()
            .map(|m| Property::new(&m.name, &m.declared))
            .collect();

        Self {
            name: descriptor.name.clone(),
            table_name: render_table_name(&pluralize(&descriptor.name), None),
            verbose: Verbose::from_type_name(&descriptor.name),
            properties,
            groups: Vec::new(),
            allow_add: true,
            allow_edit: true,
            allow_delete: true,
            is_change_entity: false,
            record_display_format: None,
            links: Links::default(),
            display_adapter: None,
        }
    }

    /// Build an entity from its descriptor and merged configuration
    ///
    /// Fails when the configuration names an unknown property or the
    /// resulting metadata is inconsistent.
    pub fn build(
        descriptor: &TypeDescriptor,
        config: &EntityConfiguration,
        settings: &AdminSettings,
    ) -> AdminResult<Self> {
        descriptor.validate()?;
        let mut entity = Self::new(descriptor);

        if let Some(missing) = config
            .referenced_properties()
            .into_iter()
            .find(|name| entity.property(name).is_none())
        {
            return Err(AdminError::configuration(
                &entity.name,
                format!("Unknown property '{}'", missing),
            ));
        }

        // Entity-level
        let (table, schema) = match &config.table {
            Some((table, schema)) => (table.clone(), schema.clone()),
            None => (pluralize(&entity.name), None),
        };
        let schema = schema.or_else(|| settings.default_schema.clone());
        entity.table_name = render_table_name(&table, schema.as_deref());

        if let Some(names) = &config.search_properties {
            for property in &mut entity.properties {
                property.is_searchable = names.contains(&property.name);
            }
        }
        if let Some(names) = &config.display_properties {
            for property in &mut entity.properties {
                property.is_visible = names.contains(&property.name);
            }
        }
        if let Some(format) = &config.display_format {
            entity.record_display_format = format.clone().filter(|f| !f.is_empty());
        }
        if let Some(singular) = &config.verbose_singular {
            entity.verbose.singular = singular.clone();
            entity.verbose.plural = pluralize(singular);
        }
        if let Some(plural) = &config.verbose_plural {
            entity.verbose.plural = plural.clone();
        }
        if config.verbose_group.is_some() {
            entity.verbose.group = config.verbose_group.clone();
        }
        if let Some(links) = &config.links {
            entity.links = links.clone();
        }

        // Per-property
        for (name, rules) in &config.properties {
            if let Some(property) = entity.property_mut(name) {
                property.apply(rules);
                debug!("{}.{}: applied configuration", entity.name, name);
            }
        }

        if let Some(groups) = &config.groups {
            entity.groups = groups
                .iter()
                .map(|g| PropertyGroup {
                    name: g.name.clone(),
                    collapsed: g.collapsed,
                    properties: g.properties.clone(),
                })
                .collect();
            for group in &entity.groups {
                for name in &group.properties {
                    if let Some(property) = entity.properties.iter_mut().find(|p| &p.name == name) {
                        property.group_name = Some(group.name.clone());
                    }
                }
            }
        }

        entity.apply_key_convention();

        entity.allow_add = config.allow_add.unwrap_or(true);
        entity.allow_edit = config.allow_edit.unwrap_or(true);
        entity.allow_delete = config.allow_delete.unwrap_or(true);
        if settings.change_entity.as_deref() == Some(entity.name.as_str()) {
            entity.is_change_entity = true;
            entity.allow_add = false;
            entity.allow_edit = false;
            entity.allow_delete = false;
        }

        entity.validate()?;
        debug!(
            "Built entity '{}' ({} properties, key: {})",
            entity.name,
            entity.properties.len(),
            entity.joined_key()
        );
        Ok(entity)
    }

    /// Without explicit key markers, `Id` or `<Name>Id` is the key
    fn apply_key_convention(&mut self) {
        if self.properties.iter().any(|p| p.is_key) {
            return;
        }
        let by_type = format!("{}id", self.name.to_lowercase());
        if let Some(property) = self.properties.iter_mut().find(|p| {
            let lower = p.name.to_lowercase();
            p.type_info.is_system_type() && (lower == "id" || lower == by_type)
        }) {
            property.is_key = true;
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Get a property by name
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    /// Get a property by name or fail
    pub fn require_property(&self, name: &str) -> AdminResult<&Property> {
        self.property(name)
            .ok_or_else(|| AdminError::property_not_found(&self.name, name))
    }

    /// Index of a property in declaration order
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    /// Key properties in declaration order
    pub fn key(&self) -> Vec<&Property> {
        self.properties.iter().filter(|p| p.is_key).collect()
    }

    /// Key column names joined with the key separator
    pub fn joined_key(&self) -> String {
        self.key()
            .iter()
            .map(|p| p.column.as_str())
            .collect::<Vec<_>>()
            .join(&KEY_SEPARATOR.to_string())
    }

    /// Properties shown in lists
    pub fn display_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_visible)
    }

    /// Properties searched by free-text search
    pub fn search_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_searchable)
    }

    /// Properties offered as list filters
    pub fn filter_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| {
            p.type_info.is_bool()
                || p.type_info.is_enum()
                || p.type_info.is_date_time()
                || (p.is_foreign_key && !p.type_info.is_collection)
        })
    }

    pub fn is_search_active(&self) -> bool {
        self.search_properties().next().is_some()
    }

    /// Columns to select for lists: key first, then visible, de-duplicated
    pub fn columns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.key()
            .into_iter()
            .chain(self.display_properties())
            .filter(|p| !p.type_info.is_collection)
            .map(|p| p.column.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Multi-valued foreign keys whose target is known
    pub fn foreigns_for_update(&self) -> impl Iterator<Item = &Property> {
        self.properties
            .iter()
            .filter(|p| p.is_multi_valued_foreign_key() && p.foreign_entity.is_some())
    }

    /// Check if a display adapter is attached
    pub fn has_display_override(&self) -> bool {
        self.display_adapter.is_some()
    }

    /// Attach a display adapter
    pub fn with_display_adapter(mut self, adapter: DisplayAdapter) -> Self {
        self.display_adapter = Some(adapter);
        self
    }
}

impl Validatable for Entity {
    fn validate(&self) -> AdminResult<()> {
        let mut seen = HashSet::new();
        for property in &self.properties {
            if !seen.insert(property.name.as_str()) {
                return Err(AdminError::DuplicateProperty {
                    entity: self.name.clone(),
                    property: property.name.clone(),
                });
            }
            if property.is_foreign_key && property.type_info.is_file() {
                return Err(AdminError::entity_validation(
                    &self.name,
                    format!(
                        "Property '{}' cannot be both a file and a foreign key",
                        property.name
                    ),
                ));
            }
            if property.is_key && property.type_info.is_collection {
                return Err(AdminError::entity_validation(
                    &self.name,
                    format!("Key property '{}' cannot be a collection", property.name),
                ));
            }
        }

        if (self.allow_edit || self.allow_delete) && self.key().is_empty() {
            return Err(AdminError::entity_validation(
                &self.name,
                "Entity has no key property",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Render a table reference as `[schema].[table]` or `[table]`
pub fn render_table_name(table: &str, schema: Option<&str>) -> String {
    match schema.filter(|s| !s.is_empty()) {
        Some(schema) => format!("[{}].[{}]", schema, table),
        None => format!("[{}]", table),
    }
}

/// English plural of a noun phrase (last word only)
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.ends_with('s') || lower.ends_with('x') || lower.ends_with("ch") || lower.ends_with("sh") {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last().map(|c| c.to_ascii_lowercase());
        if !matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u') | None) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}

// ============================================================================
// Tests
// ============================================================================
