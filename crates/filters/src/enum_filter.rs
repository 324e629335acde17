//! Choice filter over an enum property's variants

use crate::filter::{EntityFilter, FilterKind, FilterOption};
use crate::sql::{SqlCondition, SqlParam, bind};
use adminkit_meta::Property;
use heck::ToTitleCase;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct EnumFilter {
    property: Property,
    value: String,
}

impl EnumFilter {
    pub fn new(property: Property, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }

    fn variants(&self) -> &[String] {
        &self.property.type_info.enum_variants
    }

    /// The declared variant matching the value, ignoring case
    ///
    /// Integer-backed properties bind the variant's position, the same
    /// value a bound row holds.
    fn matched_variant(&self) -> Option<SqlParam> {
        let value = self.value.trim();
        let index = self
            .variants()
            .iter()
            .position(|v| v.eq_ignore_ascii_case(value))?;
        match self.property.type_info.scalar {
            Some(kind) if kind.is_integer() => Some(SqlParam::Int(index as i64)),
            _ => Some(SqlParam::from(self.variants()[index].as_str())),
        }
    }
}

impl SqlCondition for EnumFilter {
    fn sql_condition(&self, alias: &str, args: &mut Vec<SqlParam>) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        let Some(param) = self.matched_variant() else {
            warn!(
                "Ignoring unknown variant '{}' for {}",
                self.value, self.property.name
            );
            return None;
        };
        let column = self.property.qualified_column(alias);
        Some(format!("{} = {}", column, bind(args, param)))
    }
}

impl EntityFilter for EnumFilter {
    fn property(&self) -> &Property {
        &self.property
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn kind(&self) -> FilterKind {
        FilterKind::Enum
    }

    fn options(&self) -> Vec<FilterOption> {
        std::iter::once(FilterOption::all(&self.value))
            .chain(
                self.variants()
                    .iter()
                    .map(|v| FilterOption::new(v.to_title_case(), v.as_str(), &self.value)),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminkit_core::{DeclaredType, ScalarKind};
    use adminkit_meta::PropertyConfiguration;
    use pretty_assertions::assert_eq;

    fn filter(value: &str) -> EnumFilter {
        let declared = DeclaredType::Enum {
            name: "OrderStatus".to_string(),
            variants: vec!["Pending".to_string(), "InTransit".to_string()],
        };
        EnumFilter::new(Property::new("Status", &declared), value)
    }

    #[test]
    fn test_condition_uses_declared_variant() {
        let mut args = Vec::new();
        let sql = filter("intransit").sql_condition("o.", &mut args);
        assert_eq!(sql.as_deref(), Some("o.Status = @0"));
        assert_eq!(args, vec![SqlParam::from("InTransit")]);
    }

    #[test]
    fn test_integer_backed_enum_binds_position() {
        let mut property = Property::new("Status", &DeclaredType::scalar(ScalarKind::Int32));
        property.apply(&PropertyConfiguration::new().enum_type("OrderStatus", &["Pending", "InTransit"]));
        let mut args = Vec::new();
        let sql = EnumFilter::new(property, "InTransit").sql_condition("", &mut args);
        assert_eq!(sql.as_deref(), Some("Status = @0"));
        assert_eq!(args, vec![SqlParam::Int(1)]);
    }

    #[test]
    fn test_unknown_variant_is_no_condition() {
        let mut args = Vec::new();
        assert_eq!(filter("Lost").sql_condition("", &mut args), None);
        assert_eq!(filter("").sql_condition("", &mut args), None);
        assert!(args.is_empty());
    }

    #[test]
    fn test_options() {
        let labels: Vec<String> = filter("Pending")
            .options()
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["All", "Pending", "In Transit"]);
    }
}
