//! The list filter abstraction

use crate::sql::SqlCondition;
use adminkit_meta::Property;
use serde::Serialize;
use std::fmt;

/// A selectable filter choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    /// Label shown to the user
    pub label: String,
    /// Filter value submitted when chosen (empty means no restriction)
    pub value: String,
    pub selected: bool,
}

impl FilterOption {
    /// Create an option, selected when `value` equals `current`
    pub fn new(label: impl Into<String>, value: impl Into<String>, current: &str) -> Self {
        let value = value.into();
        Self {
            label: label.into(),
            selected: value == current,
            value,
        }
    }

    /// The unrestricted "All" option
    pub fn all(current: &str) -> Self {
        Self::new("All", "", current)
    }
}

/// Filter variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Bool,
    Enum,
    DateTime,
    Foreign,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::Bool => "bool",
            FilterKind::Enum => "enum",
            FilterKind::DateTime => "date-time",
            FilterKind::Foreign => "foreign",
        };
        f.write_str(name)
    }
}

/// A filter over one property of an entity list
pub trait EntityFilter: SqlCondition + Send + Sync {
    /// The filtered property
    fn property(&self) -> &Property;

    /// The submitted filter value (empty means no restriction)
    fn value(&self) -> &str;

    fn kind(&self) -> FilterKind;

    /// Choices offered to the user
    fn options(&self) -> Vec<FilterOption> {
        Vec::new()
    }

    fn display_in_ui(&self) -> bool {
        true
    }

    /// Check if the filter restricts the list
    fn is_active(&self) -> bool {
        !self.value().trim().is_empty()
    }
}

impl fmt::Debug for dyn EntityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityFilter")
            .field("kind", &self.kind())
            .field("property", &self.property().name)
            .field("value", &self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_selection() {
        assert!(FilterOption::all("").selected);
        assert!(!FilterOption::all("x").selected);
        let option = FilterOption::new("Yes", "true", "true");
        assert!(option.selected);
        assert_eq!(option.label, "Yes");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FilterKind::DateTime.to_string(), "date-time");
    }
}
