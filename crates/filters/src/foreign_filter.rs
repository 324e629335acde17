//! Choice filter over the records of a referenced entity

use crate::filter::{EntityFilter, FilterKind, FilterOption};
use crate::sql::{SqlCondition, SqlParam, bind};
use adminkit_core::DataType;
use adminkit_meta::Property;

/// Filters a single-valued foreign key by the referenced record's key
///
/// The choices (key value and display string of each referenced record)
/// come from the caller, which owns data access.
#[derive(Debug, Clone)]
pub struct ForeignFilter {
    property: Property,
    value: String,
    choices: Vec<(String, String)>,
}

impl ForeignFilter {
    pub fn new(property: Property, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
            choices: Vec::new(),
        }
    }

    /// Offer referenced records as `(key, display)` pairs
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = (String, String)>) -> Self {
        self.choices = choices.into_iter().collect();
        self
    }

    /// Integer keys bind as integers, everything else as text
    fn param(&self, value: &str) -> SqlParam {
        match (self.property.type_info.data_type, value.parse::<i64>()) {
            (DataType::Numeric, Ok(i)) => SqlParam::Int(i),
            _ => SqlParam::Text(value.to_string()),
        }
    }
}

impl SqlCondition for ForeignFilter {
    fn sql_condition(&self, alias: &str, args: &mut Vec<SqlParam>) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        let param = self.param(self.value.trim());
        let column = self.property.qualified_column(alias);
        Some(format!("{} = {}", column, bind(args, param)))
    }
}

impl EntityFilter for ForeignFilter {
    fn property(&self) -> &Property {
        &self.property
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn kind(&self) -> FilterKind {
        FilterKind::Foreign
    }

    fn options(&self) -> Vec<FilterOption> {
        std::iter::once(FilterOption::all(&self.value))
            .chain(
                self.choices
                    .iter()
                    .map(|(key, label)| FilterOption::new(label.as_str(), key.as_str(), &self.value)),
            )
            .collect()
    }

    /// Hidden until the caller supplies the referenced records
    fn display_in_ui(&self) -> bool {
        !self.choices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminkit_core::{DeclaredType, ScalarKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_navigation_member_binds_text() {
        let mut property = Property::new("Category", &DeclaredType::entity("Category"));
        property.column = "CategoryID".to_string();
        let filter = ForeignFilter::new(property, "7");
        let mut args = Vec::new();
        assert_eq!(
            filter.sql_condition("p.", &mut args).as_deref(),
            Some("p.CategoryID = @0")
        );
        assert_eq!(args, vec![SqlParam::from("7")]);
        assert!(!filter.display_in_ui());
    }

    #[test]
    fn test_integer_key_binds_int() {
        let mut property = Property::new("SupplierID", &DeclaredType::scalar(ScalarKind::Int32));
        property.is_foreign_key = true;
        let filter = ForeignFilter::new(property, "12")
            .with_choices([("12".to_string(), "Tokyo Traders".to_string())]);
        let mut args = Vec::new();
        filter.sql_condition("", &mut args);
        assert_eq!(args, vec![SqlParam::Int(12)]);

        let options = filter.options();
        assert_eq!(options.len(), 2);
        assert!(options[1].selected);
        assert_eq!(options[1].label, "Tokyo Traders");
        assert!(filter.display_in_ui());
    }

    #[test]
    fn test_empty_is_no_condition() {
        let property = Property::new("Category", &DeclaredType::entity("Category"));
        let mut args = Vec::new();
        assert_eq!(ForeignFilter::new(property, " ").sql_condition("", &mut args), None);
    }
}
