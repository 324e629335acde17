//! Yes/no filter for boolean properties

use crate::filter::{EntityFilter, FilterKind, FilterOption};
use crate::sql::{SqlCondition, SqlParam, bind};
use adminkit_core::parse_bool;
use adminkit_meta::Property;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct BoolFilter {
    property: Property,
    value: String,
}

impl BoolFilter {
    pub fn new(property: Property, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

impl SqlCondition for BoolFilter {
    fn sql_condition(&self, alias: &str, args: &mut Vec<SqlParam>) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        let Some(flag) = parse_bool(&self.value) else {
            warn!(
                "Ignoring non-boolean filter value '{}' for {}",
                self.value, self.property.name
            );
            return None;
        };
        let column = self.property.qualified_column(alias);
        Some(format!("{} = {}", column, bind(args, flag)))
    }
}

impl EntityFilter for BoolFilter {
    fn property(&self) -> &Property {
        &self.property
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn kind(&self) -> FilterKind {
        FilterKind::Bool
    }

    fn options(&self) -> Vec<FilterOption> {
        // "on", "1" and "yes" select the same option as "true"
        let current = parse_bool(&self.value)
            .map(|flag| flag.to_string())
            .unwrap_or_default();
        vec![
            FilterOption::all(&current),
            FilterOption::new("Yes", "true", &current),
            FilterOption::new("No", "false", &current),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminkit_core::{DeclaredType, ScalarKind};
    use pretty_assertions::assert_eq;

    fn filter(value: &str) -> BoolFilter {
        BoolFilter::new(
            Property::new("Discontinued", &DeclaredType::scalar(ScalarKind::Bool)),
            value,
        )
    }

    #[test]
    fn test_condition() {
        let mut args = vec![SqlParam::Int(1)];
        let sql = filter("true").sql_condition("p.", &mut args);
        assert_eq!(sql.as_deref(), Some("p.Discontinued = @1"));
        assert_eq!(args[1], SqlParam::Bool(true));

        let mut args = Vec::new();
        filter("false").sql_condition("", &mut args);
        assert_eq!(args, vec![SqlParam::Bool(false)]);
    }

    #[test]
    fn test_empty_or_invalid_is_no_condition() {
        for value in ["", "maybe"] {
            let mut args = Vec::new();
            assert_eq!(filter(value).sql_condition("", &mut args), None);
            assert!(args.is_empty());
        }
    }

    #[test]
    fn test_options() {
        let options = filter("false").options();
        assert_eq!(options.len(), 3);
        assert!(options[2].selected);
        assert_eq!(options[1].value, "true");

        assert!(filter("yes").options()[1].selected);
        assert!(filter("maybe").options()[0].selected);
    }
}
