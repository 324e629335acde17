//! Free-text search over an entity's searchable properties

use crate::sql::{SqlCondition, SqlParam, bind};
use adminkit_core::DataType;
use adminkit_meta::{Entity, Property};
use tracing::debug;

/// Escape character declared on every `LIKE` match
pub const LIKE_ESCAPE: char = '\\';

/// A search term matched against every searchable property
///
/// Text columns match by substring; `%` and `_` in the term match
/// literally. Numeric columns match by equality
/// when the term parses as a number of their kind. Other columns are not
/// searched.
#[derive(Debug, Clone)]
pub struct Search {
    term: String,
    properties: Vec<Property>,
}

impl Search {
    /// Create a search over the entity's searchable properties
    pub fn new(entity: &Entity, term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            properties: entity.search_properties().cloned().collect(),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    fn matcher(&self, property: &Property, alias: &str, args: &mut Vec<SqlParam>) -> Option<String> {
        let term = self.term.trim();
        let column = property.qualified_column(alias);
        if property.type_info.is_string() {
            let pattern = format!("%{}%", escape_like(term));
            return Some(format!(
                "{} LIKE {} ESCAPE '{}'",
                column,
                bind(args, pattern),
                LIKE_ESCAPE
            ));
        }
        let param = match property.type_info.data_type {
            DataType::Numeric => SqlParam::Int(term.parse().ok()?),
            DataType::Real => SqlParam::Real(term.parse().ok()?),
            _ => return None,
        };
        Some(format!("{} = {}", column, bind(args, param)))
    }
}

/// Make `LIKE` wildcards in user text match literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

impl SqlCondition for Search {
    fn sql_condition(&self, alias: &str, args: &mut Vec<SqlParam>) -> Option<String> {
        if self.term.trim().is_empty() {
            return None;
        }
        let matchers: Vec<String> = self
            .properties
            .iter()
            .filter_map(|p| self.matcher(p, alias, args))
            .collect();
        if matchers.is_empty() {
            debug!("No searchable column accepts '{}'", self.term);
            return None;
        }
        Some(format!("({})", matchers.join(" OR ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminkit_core::{AdminSettings, DeclaredType, ScalarKind};
    use adminkit_meta::{EntityConfiguration, MemberDescriptor, TypeDescriptor};
    use pretty_assertions::assert_eq;

    fn product() -> Entity {
        let descriptor = TypeDescriptor::new("Product")
            .with_member(MemberDescriptor::new("ProductID", DeclaredType::scalar(ScalarKind::Int32)))
            .with_member(MemberDescriptor::new("ProductName", DeclaredType::scalar(ScalarKind::String)))
            .with_member(MemberDescriptor::new("UnitPrice", DeclaredType::scalar(ScalarKind::Decimal)))
            .with_member(MemberDescriptor::new("Discontinued", DeclaredType::scalar(ScalarKind::Bool)));
        let config = EntityConfiguration::new("Product").search_properties(&[
            "ProductID",
            "ProductName",
            "UnitPrice",
            "Discontinued",
        ]);
        Entity::build(&descriptor, &config, &AdminSettings::default()).unwrap()
    }

    #[test]
    fn test_text_term() {
        let mut args = Vec::new();
        let sql = Search::new(&product(), "chai").sql_condition("p.", &mut args);
        assert_eq!(sql.as_deref(), Some(r"(p.ProductName LIKE @0 ESCAPE '\')"));
        assert_eq!(args, vec![SqlParam::from("%chai%")]);
    }

    #[test]
    fn test_numeric_term() {
        let mut args = vec![SqlParam::Bool(true)];
        let sql = Search::new(&product(), "18").sql_condition("", &mut args);
        assert_eq!(
            sql.as_deref(),
            Some(r"(ProductID = @1 OR ProductName LIKE @2 ESCAPE '\' OR UnitPrice = @3)")
        );
        assert_eq!(
            args[1..],
            [SqlParam::Int(18), SqlParam::from("%18%"), SqlParam::Real(18.0)]
        );
    }

    #[test]
    fn test_wildcards_match_literally() {
        let mut args = Vec::new();
        Search::new(&product(), r"50%_off\").sql_condition("", &mut args);
        assert_eq!(args, vec![SqlParam::from(r"%50\%\_off\\%")]);
    }

    #[test]
    fn test_empty_term() {
        let mut args = Vec::new();
        assert_eq!(Search::new(&product(), "  ").sql_condition("", &mut args), None);
        assert!(args.is_empty());
    }
}
