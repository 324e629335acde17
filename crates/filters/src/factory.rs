//! Builds the filter set of an entity list from request parameters

use crate::bool_filter::BoolFilter;
use crate::clock::{Clock, SystemClock};
use crate::datetime_filter::DateTimeFilter;
use crate::enum_filter::EnumFilter;
use crate::filter::EntityFilter;
use crate::foreign_filter::ForeignFilter;
use crate::search::Search;
use crate::sql::{WhereBuilder, WhereClause};
use adminkit_meta::{Entity, FieldSource, Property};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Request parameter holding the free-text search term
pub const SEARCH_PARAM: &str = "search";

/// Creates filters for an entity's filterable properties
///
/// Filter values are read from request parameters named after the
/// properties.
#[derive(Clone)]
pub struct FilterFactory {
    clock: Arc<dyn Clock>,
}

impl FilterFactory {
    /// Create a factory anchored at the given clock
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }

    /// Create a factory on the system clock
    pub fn system() -> Self {
        Self::new(SystemClock)
    }

    /// The filter matching a property's kind, if it is filterable
    pub fn filter_for(&self, property: &Property, value: &str) -> Option<Box<dyn EntityFilter>> {
        let info = &property.type_info;
        let property = property.clone();
        let filter: Box<dyn EntityFilter> = if property.is_foreign_key {
            if info.is_collection {
                return None;
            }
            Box::new(ForeignFilter::new(property, value))
        } else if info.is_bool() {
            Box::new(BoolFilter::new(property, value))
        } else if info.is_enum() {
            Box::new(EnumFilter::new(property, value))
        } else if info.is_date_time() {
            Box::new(DateTimeFilter::new(self.clock.as_ref(), property, value))
        } else {
            return None;
        };
        Some(filter)
    }

    /// Filters for every filter property, in declaration order
    pub fn filters<F: FieldSource + ?Sized>(
        &self,
        entity: &Entity,
        request: &F,
    ) -> Vec<Box<dyn EntityFilter>> {
        entity
            .filter_properties()
            .filter_map(|p| self.filter_for(p, request.get(&p.name).unwrap_or_default()))
            .collect()
    }

    /// Compose active filters and the search term into one WHERE clause
    pub fn where_clause<F: FieldSource + ?Sized>(
        &self,
        entity: &Entity,
        request: &F,
        alias: &str,
    ) -> WhereClause {
        let filters = self.filters(entity, request);
        let mut builder = WhereBuilder::new(alias);
        builder.add_all(filters.iter().map(|f| f.as_ref()));

        if entity.is_search_active() {
            if let Some(term) = request.get(SEARCH_PARAM) {
                builder.add(&Search::new(entity, term));
            }
        }

        let clause = builder.build();
        debug!(
            "{} filter conditions for {} with {} params",
            clause.conditions.len(),
            entity.name,
            clause.params.len()
        );
        clause
    }
}

impl Default for FilterFactory {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for FilterFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterFactory")
            .field("now", &self.clock.now())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::filter::FilterKind;
    use crate::sql::SqlParam;
    use adminkit_core::{AdminSettings, DeclaredType, ScalarKind};
    use adminkit_meta::{
        Annotation, AttributeScanner, EntityConfiguration, MemberDescriptor, TypeDescriptor,
    };
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn order() -> Entity {
        let descriptor = TypeDescriptor::new("Order")
            .with_member(MemberDescriptor::new("OrderID", DeclaredType::scalar(ScalarKind::Int32)))
            .with_member(MemberDescriptor::new("ShipName", DeclaredType::scalar(ScalarKind::String)))
            .with_member(MemberDescriptor::new("OrderDate", DeclaredType::scalar(ScalarKind::DateTime)))
            .with_member(MemberDescriptor::new("Shipped", DeclaredType::scalar(ScalarKind::Bool)))
            .with_member(
                MemberDescriptor::new("Customer", DeclaredType::entity("Customer"))
                    .annotate(Annotation::ForeignKey("CustomerID".to_string())),
            )
            .with_member(MemberDescriptor::new(
                "Details",
                DeclaredType::collection(DeclaredType::entity("OrderDetail")),
            ));
        let mut config = AttributeScanner::new().scan(&descriptor).unwrap();
        config.merge(EntityConfiguration::new("Order").search_properties(&["ShipName"]));
        Entity::build(&descriptor, &config, &AdminSettings::default()).unwrap()
    }

    fn factory() -> FilterFactory {
        FilterFactory::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()))
    }

    fn request(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_filters_follow_property_kinds() {
        let kinds: Vec<(String, FilterKind)> = factory()
            .filters(&order(), &request(&[]))
            .iter()
            .map(|f| (f.property().name.clone(), f.kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("OrderDate".to_string(), FilterKind::DateTime),
                ("Shipped".to_string(), FilterKind::Bool),
                ("Customer".to_string(), FilterKind::Foreign),
            ]
        );
    }

    #[test]
    fn test_where_clause_shares_params() {
        let request = request(&[
            ("OrderDate", "2024.01.01-2024.01.31"),
            ("Shipped", "true"),
            ("Customer", "ALFKI"),
            ("search", "Alfreds"),
        ]);
        let clause = factory().where_clause(&order(), &request, "o.");
        assert_eq!(
            clause.to_sql(),
            "WHERE (o.OrderDate >= @0 AND o.OrderDate <= @1) AND o.Shipped = @2 \
             AND o.CustomerID = @3 AND (o.ShipName LIKE @4 ESCAPE '\\')"
        );
        assert_eq!(
            clause.params,
            vec![
                SqlParam::from("2024.01.01 00:00"),
                SqlParam::from("2024.01.31 23:59"),
                SqlParam::Bool(true),
                SqlParam::from("ALFKI"),
                SqlParam::from("%Alfreds%"),
            ]
        );
    }

    #[test]
    fn test_inactive_filters_are_skipped() {
        let request = request(&[("OrderDate", "a-b-c"), ("Customer", "")]);
        let clause = factory().where_clause(&order(), &request, "");
        assert!(clause.is_empty());
        assert!(clause.params.is_empty());
    }

    #[test]
    fn test_plain_properties_are_not_filterable() {
        let entity = order();
        let ship_name = entity.property("ShipName").unwrap();
        assert!(factory().filter_for(ship_name, "x").is_none());
        let details = entity.property("Details").unwrap();
        assert!(factory().filter_for(details, "1,2").is_none());
    }
}
