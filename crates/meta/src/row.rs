//! Rows of property values
//!
//! A `DataRow` pairs an entity with one `PropertyValue` per property. It
//! is created empty per request, populated by binding or by the store,
//! and dropped with the request.

use crate::entity::Entity;
use crate::key::KeyCodec;
use crate::property::Property;
use crate::value::PropertyValue;
use adminkit_core::{AdminError, AdminResult, Culture};
use std::sync::Arc;

/// Property values of one record
#[derive(Debug, Clone)]
pub struct DataRow {
    entity: Arc<Entity>,
    values: Vec<PropertyValue>,
}

impl DataRow {
    /// Create an empty row
    pub fn new(entity: Arc<Entity>) -> Self {
        let values = entity
            .properties
            .iter()
            .map(|p| PropertyValue::new(p.default_value.clone()))
            .collect();
        Self { entity, values }
    }

    /// The entity this row belongs to
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Value of a property
    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.entity.property_index(name).map(|i| &self.values[i])
    }

    /// Mutable value of a property
    pub fn value_mut(&mut self, name: &str) -> Option<&mut PropertyValue> {
        let index = self.entity.property_index(name)?;
        Some(&mut self.values[index])
    }

    /// Value of a property or a not-found error
    pub fn require_value(&self, name: &str) -> AdminResult<&PropertyValue> {
        self.value(name)
            .ok_or_else(|| AdminError::property_not_found(&self.entity.name, name))
    }

    /// Properties paired with their values, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&Property, &PropertyValue)> {
        self.entity.properties.iter().zip(&self.values)
    }

    /// Properties paired with mutable values, in declaration order
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&Property, &mut PropertyValue)> {
        self.entity.properties.iter().zip(self.values.iter_mut())
    }

    // ========================================================================
    // Key
    // ========================================================================

    /// Key values in key order
    pub fn key_values(&self) -> Vec<String> {
        self.iter()
            .filter(|(p, _)| p.is_key)
            .map(|(_, v)| v.as_string())
            .collect()
    }

    /// Key values joined with the key separator
    pub fn joined_key_value(&self) -> String {
        KeyCodec::new(&self.entity).encode(&self.key_values())
    }

    /// `name=value` key pairs joined with the key separator
    pub fn joined_key_with_value(&self) -> String {
        KeyCodec::new(&self.entity).encode_with_names(&self.key_values())
    }

    /// Decode a key string into the key properties
    ///
    /// Tokens are converted to each key property's declared type with the
    /// invariant culture.
    pub fn set_key_value(&mut self, key: &str) -> AdminResult<()> {
        let tokens = KeyCodec::new(&self.entity).decode(key)?;
        let culture = Culture::invariant();
        let mut tokens = tokens.into_iter();
        for (property, value) in self.iter_mut().filter(|(p, _)| p.is_key) {
            let Some(token) = tokens.next() else { break };
            let converted = culture.convert(&property.name, &token, &property.type_info)?;
            value.set(converted);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;
    use crate::configuration::EntityConfiguration;
    use crate::descriptor::{MemberDescriptor, TypeDescriptor};
    use adminkit_core::{DeclaredType, DefaultValue, ScalarKind, Value};
    use pretty_assertions::assert_eq;

    fn order_detail() -> Arc<Entity> {
        let descriptor = TypeDescriptor::new("OrderDetail")
            .with_member(
                MemberDescriptor::new("OrderID", DeclaredType::scalar(ScalarKind::Int32))
                    .annotate(Annotation::Key),
            )
            .with_member(
                MemberDescriptor::new("ProductCode", DeclaredType::scalar(ScalarKind::String))
                    .annotate(Annotation::Key),
            )
            .with_member(MemberDescriptor::new(
                "Quantity",
                DeclaredType::scalar(ScalarKind::Int16),
            ));
        let config = crate::scanner::AttributeScanner::new().scan(&descriptor).unwrap();
        Arc::new(Entity::build(&descriptor, &config, &Default::default()).unwrap())
    }

    #[test]
    fn test_new_row_is_unset() {
        let row = DataRow::new(order_detail());
        assert!(row.iter().all(|(_, v)| v.is_unset()));
        assert!(row.value("Missing").is_none());
    }

    #[test]
    fn test_set_key_value_converts_tokens() {
        let mut row = DataRow::new(order_detail());
        row.set_key_value("10248 ` QUESO").unwrap();
        assert_eq!(row.value("OrderID").and_then(|v| v.scalar()), Some(&Value::Int(10248)));
        assert_eq!(row.joined_key_value(), "10248`QUESO");
        assert_eq!(row.joined_key_with_value(), "OrderID=10248`ProductCode=QUESO");
    }

    #[test]
    fn test_set_key_value_errors() {
        let mut row = DataRow::new(order_detail());
        assert!(matches!(
            row.set_key_value("10248").unwrap_err(),
            AdminError::MalformedKey { .. }
        ));
        assert!(matches!(
            row.set_key_value("abc`QUESO").unwrap_err(),
            AdminError::ValueConversion { .. }
        ));
    }

    #[test]
    fn test_require_value() {
        let row = DataRow::new(order_detail());
        assert!(row.require_value("Quantity").is_ok());
        assert!(row.require_value("Discount").unwrap_err().is_not_found());
    }

    #[test]
    fn test_default_values_are_carried() {
        let descriptor = TypeDescriptor::new("Setting")
            .with_member(MemberDescriptor::new("Id", DeclaredType::scalar(ScalarKind::Int32)))
            .with_member(MemberDescriptor::new("Level", DeclaredType::scalar(ScalarKind::Int32)));
        let config = EntityConfiguration::new("Setting").property("Level", |p| p.default_value(Value::Int(3)));
        let entity = Arc::new(Entity::build(&descriptor, &config, &Default::default()).unwrap());
        let row = DataRow::new(entity);
        assert_eq!(
            row.value("Level").and_then(|v| v.default_value.clone()),
            Some(DefaultValue::from(Value::Int(3)))
        );
    }
}
