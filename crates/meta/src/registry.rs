//! Process-wide entity registry
//!
//! Entities are built in two phases. Phase one scans and configures every
//! registered type on its own. Phase two checks that every foreign key
//! names an entity that phase one produced. Only a registry that passes
//! both phases is returned, so a failed build never leaves partial
//! metadata behind.
//!
//! A built registry is frozen. [`initialize`] publishes one for the whole
//! process; later calls return the published instance.

use crate::configuration::EntityConfiguration;
use crate::descriptor::{Describe, TypeDescriptor};
use crate::display::DisplayAdapter;
use crate::entity::Entity;
use crate::property::Property;
use crate::row::DataRow;
use crate::scanner::AttributeScanner;
use adminkit_core::{AdminError, AdminResult, AdminSettings};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, info};

static REGISTRY: RegistryCell = RegistryCell::new();

// ============================================================================
// RegistryBuilder
// ============================================================================

/// Collects descriptors, configurations and adapters before a build
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: Vec<TypeDescriptor>,
    configurations: Vec<EntityConfiguration>,
    adapters: BTreeMap<String, DisplayAdapter>,
    settings: AdminSettings,
}

impl RegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given settings
    pub fn with_settings(mut self, settings: AdminSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register a Rust type
    pub fn register<T: Describe>(self) -> Self {
        self.register_descriptor(T::describe())
    }

    /// Register a descriptor
    pub fn register_descriptor(mut self, descriptor: TypeDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Register several descriptors
    pub fn register_all(mut self, descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        self.descriptors.extend(descriptors);
        self
    }

    /// Add a fluent configuration, applied after annotation scanning
    pub fn configure(mut self, configuration: EntityConfiguration) -> Self {
        self.configurations.push(configuration);
        self
    }

    /// Designate the change/audit entity
    pub fn change_entity(mut self, name: impl Into<String>) -> Self {
        self.settings.change_entity = Some(name.into());
        self
    }

    /// Attach a display adapter to an entity
    pub fn display_adapter(mut self, entity: impl Into<String>, adapter: DisplayAdapter) -> Self {
        self.adapters.insert(entity.into(), adapter);
        self
    }

    /// Build and freeze the registry
    pub fn build(self) -> AdminResult<EntityRegistry> {
        let scanner = AttributeScanner::new();
        let mut entities = BTreeMap::new();

        // Phase 1: every entity on its own
        for descriptor in &self.descriptors {
            if entities.contains_key(&descriptor.name) {
                return Err(AdminError::DuplicateEntity(descriptor.name.clone()));
            }

            let mut config = scanner.scan(descriptor)?;
            for overlay in self.configurations.iter().filter(|c| c.entity == descriptor.name) {
                config.merge(overlay.clone());
            }

            let mut entity = Entity::build(descriptor, &config, &self.settings)?;
            if let Some(adapter) = self.adapters.get(&descriptor.name) {
                entity = entity.with_display_adapter(adapter.clone());
            }
            entities.insert(descriptor.name.clone(), entity);
        }

        if let Some(orphan) = self
            .configurations
            .iter()
            .find(|c| !entities.contains_key(&c.entity))
        {
            return Err(AdminError::EntityNotFound(orphan.entity.clone()));
        }

        // Phase 2: every foreign reference must resolve
        for entity in entities.values() {
            for property in entity.properties.iter().filter(|p| p.is_foreign_key) {
                match &property.foreign_entity {
                    Some(target) if entities.contains_key(target) => {
                        debug!("{}.{} -> {}", entity.name, property.name, target);
                    }
                    Some(target) => {
                        return Err(AdminError::UnresolvedForeignEntity {
                            entity: entity.name.clone(),
                            property: property.name.clone(),
                            target: target.clone(),
                        });
                    }
                    None => {
                        return Err(AdminError::UnresolvedForeignEntity {
                            entity: entity.name.clone(),
                            property: property.name.clone(),
                            target: String::new(),
                        });
                    }
                }
            }
        }

        info!("Entity registry built with {} entities", entities.len());
        Ok(EntityRegistry {
            entities: entities
                .into_iter()
                .map(|(name, entity)| (name, Arc::new(entity)))
                .collect(),
            settings: self.settings,
        })
    }
}

// ============================================================================
// EntityRegistry
// ============================================================================

/// Frozen metadata for every registered entity
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    entities: BTreeMap<String, Arc<Entity>>,
    settings: AdminSettings,
}

impl EntityRegistry {
    /// Create a builder
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Get an entity by type name
    pub fn entity(&self, name: &str) -> AdminResult<Arc<Entity>> {
        self.entities
            .get(name)
            .cloned()
            .ok_or_else(|| AdminError::EntityNotFound(name.to_string()))
    }

    /// Get the entity of a Rust type
    pub fn entity_of<T: Describe>(&self) -> AdminResult<Arc<Entity>> {
        self.entity(T::TYPE_NAME)
    }

    /// Entity referenced by a foreign key property
    pub fn foreign_entity(&self, property: &Property) -> Option<Arc<Entity>> {
        property
            .foreign_entity
            .as_deref()
            .and_then(|name| self.entities.get(name).cloned())
    }

    /// Create an empty row for an entity
    pub fn new_row(&self, name: &str) -> AdminResult<DataRow> {
        self.entity(name).map(DataRow::new)
    }

    /// All entities, ordered by name
    pub fn entities(&self) -> impl Iterator<Item = &Arc<Entity>> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Settings the registry was built with
    pub fn settings(&self) -> &AdminSettings {
        &self.settings
    }
}

// ============================================================================
// Global registry
// ============================================================================

/// Publish-once slot for a registry
///
/// Builds run one at a time under the lock; the slot is checked again
/// after the lock is taken so only the first successful build is kept.
struct RegistryCell {
    slot: OnceLock<Arc<EntityRegistry>>,
    lock: Mutex<()>,
}

impl RegistryCell {
    const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
            lock: Mutex::new(()),
        }
    }

    fn get(&self) -> Option<Arc<EntityRegistry>> {
        self.slot.get().cloned()
    }

    fn get_or_build<F>(&self, build: F) -> AdminResult<Arc<EntityRegistry>>
    where
        F: FnOnce() -> AdminResult<EntityRegistry>,
    {
        if let Some(registry) = self.get() {
            return Ok(registry);
        }

        let _guard = self
            .lock
            .lock()
            .map_err(|_| AdminError::internal("registry initialization lock poisoned"))?;

        if let Some(registry) = self.get() {
            return Ok(registry);
        }

        let registry = Arc::new(build()?);
        Ok(Arc::clone(self.slot.get_or_init(|| registry)))
    }
}

/// Build and publish the process-wide registry
///
/// The first successful call publishes its registry; concurrent and later
/// calls get the published instance and their builder is discarded. A
/// failed build publishes nothing.
pub fn initialize(builder: RegistryBuilder) -> AdminResult<Arc<EntityRegistry>> {
    REGISTRY.get_or_build(|| builder.build())
}

/// The published registry, if [`initialize`] has succeeded
pub fn registry() -> Option<Arc<EntityRegistry>> {
    REGISTRY.get()
}

// ============================================================================
// Tests
// ============================================================================
