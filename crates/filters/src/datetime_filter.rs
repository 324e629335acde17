//! Date range filter
//!
//! Values are a single day (`2024.01.10`) or a range of days
//! (`2024.01.01-2024.01.31`) where either end may be left open. Days are
//! widened to `00:00` at the start and `23:59` at the end.

use crate::clock::Clock;
use crate::filter::{EntityFilter, FilterKind, FilterOption};
use crate::sql::{SqlCondition, SqlParam, bind};
use adminkit_meta::Property;
use chrono::{Days, Months, NaiveDate};
use tracing::{debug, warn};

/// Date format used in filter values
pub const DATE_FORMAT: &str = "%Y.%m.%d";

const RANGE_SEPARATOR: char = '-';
const DAY_START: &str = "00:00";
const DAY_END: &str = "23:59";

/// Filters a date/time property by day or by range of days
#[derive(Debug, Clone)]
pub struct DateTimeFilter {
    property: Property,
    value: String,
    options: Vec<FilterOption>,
}

impl DateTimeFilter {
    /// Create a filter; relative options are anchored at the clock's today
    pub fn new(clock: &dyn Clock, property: Property, value: impl Into<String>) -> Self {
        let value = value.into();
        let options = relative_ranges(clock.today())
            .into_iter()
            .map(|(label, range)| FilterOption::new(label, range, &value))
            .collect();
        Self {
            property,
            value,
            options,
        }
    }
}

/// Canned ranges ending today
fn relative_ranges(today: NaiveDate) -> Vec<(&'static str, String)> {
    let day = |date: NaiveDate| date.format(DATE_FORMAT).to_string();
    let since = |start: Option<NaiveDate>| {
        format!("{}{}{}", day(start.unwrap_or(today)), RANGE_SEPARATOR, day(today))
    };
    let months_back = |n: u32| since(today.checked_sub_months(Months::new(n)));

    vec![
        ("All", String::new()),
        ("Today", day(today)),
        (
            "Yesterday",
            day(today.checked_sub_days(Days::new(1)).unwrap_or(today)),
        ),
        ("Last week", since(today.checked_sub_days(Days::new(7)))),
        ("Last month", months_back(1)),
        ("Last quarter", months_back(3)),
        ("Last half-year", months_back(6)),
        ("Last year", months_back(12)),
    ]
}

impl SqlCondition for DateTimeFilter {
    fn sql_condition(&self, alias: &str, args: &mut Vec<SqlParam>) -> Option<String> {
        let value = self.value.trim();
        if value.is_empty() {
            return None;
        }

        let column = self.property.qualified_column(alias);

        if !value.contains(RANGE_SEPARATOR) {
            let from = bind(args, format!("{} {}", value, DAY_START));
            let to = bind(args, format!("{} {}", value, DAY_END));
            return Some(format!("({column} >= {from} AND {column} <= {to})"));
        }

        let parts: Vec<&str> = value.split(RANGE_SEPARATOR).collect();
        let [start, end] = parts.as_slice() else {
            warn!(
                "Ignoring malformed date range '{}' for {}",
                value, self.property.name
            );
            return None;
        };
        let (start, end) = (start.trim(), end.trim());

        let sql = match (start.is_empty(), end.is_empty()) {
            (false, false) => {
                let from = bind(args, format!("{} {}", start, DAY_START));
                let to = bind(args, format!("{} {}", end, DAY_END));
                format!("({column} >= {from} AND {column} <= {to})")
            }
            (true, false) => {
                let to = bind(args, format!("{} {}", end, DAY_END));
                format!("{column} <= {to}")
            }
            (false, true) => {
                let from = bind(args, format!("{} {}", start, DAY_START));
                format!("{column} >= {from}")
            }
            (true, true) => {
                warn!("Ignoring open date range for {}", self.property.name);
                return None;
            }
        };
        debug!("Date filter on {}: {}", self.property.name, sql);
        Some(sql)
    }
}

impl EntityFilter for DateTimeFilter {
    fn property(&self) -> &Property {
        &self.property
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn kind(&self) -> FilterKind {
        FilterKind::DateTime
    }

    fn options(&self) -> Vec<FilterOption> {
        self.options.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use adminkit_core::{DeclaredType, ScalarKind};
    use pretty_assertions::assert_eq;

    fn filter_on(today: NaiveDate, value: &str) -> DateTimeFilter {
        let property = Property::new("Created", &DeclaredType::scalar(ScalarKind::DateTime));
        DateTimeFilter::new(&FixedClock::on(today), property, value)
    }

    fn filter(value: &str) -> DateTimeFilter {
        filter_on(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), value)
    }

    fn compile(value: &str) -> (Option<String>, Vec<SqlParam>) {
        let mut args = Vec::new();
        let sql = filter(value).sql_condition("alias.", &mut args);
        (sql, args)
    }

    #[test]
    fn test_single_day() {
        let (sql, args) = compile("2024.01.10");
        assert_eq!(
            sql.as_deref(),
            Some("(alias.Created >= @0 AND alias.Created <= @1)")
        );
        assert_eq!(
            args,
            vec![
                SqlParam::from("2024.01.10 00:00"),
                SqlParam::from("2024.01.10 23:59")
            ]
        );
    }

    #[test]
    fn test_closed_range() {
        let (sql, args) = compile("2024.01.01-2024.01.31");
        assert_eq!(
            sql.as_deref(),
            Some("(alias.Created >= @0 AND alias.Created <= @1)")
        );
        assert_eq!(
            args,
            vec![
                SqlParam::from("2024.01.01 00:00"),
                SqlParam::from("2024.01.31 23:59")
            ]
        );
    }

    #[test]
    fn test_open_start() {
        let (sql, args) = compile("-2024.01.31");
        assert_eq!(sql.as_deref(), Some("alias.Created <= @0"));
        assert_eq!(args, vec![SqlParam::from("2024.01.31 23:59")]);
    }

    #[test]
    fn test_open_end() {
        let (sql, args) = compile("2024.01.01-");
        assert_eq!(sql.as_deref(), Some("alias.Created >= @0"));
        assert_eq!(args, vec![SqlParam::from("2024.01.01 00:00")]);
    }

    #[test]
    fn test_degenerate_values_produce_nothing() {
        for value in ["a-b-c", "-", "", "   "] {
            let (sql, args) = compile(value);
            assert_eq!(sql, None, "value {value:?}");
            assert!(args.is_empty());
        }
    }

    #[test]
    fn test_indices_follow_existing_params() {
        let mut args = vec![SqlParam::Int(5), SqlParam::Int(6)];
        let sql = filter("2024.01.01-2024.01.31").sql_condition("", &mut args);
        assert_eq!(sql.as_deref(), Some("(Created >= @2 AND Created <= @3)"));
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn test_relative_options() {
        let options = filter("2024.01.10").options();
        let pairs: Vec<(&str, &str)> = options
            .iter()
            .map(|o| (o.label.as_str(), o.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("All", ""),
                ("Today", "2024.01.10"),
                ("Yesterday", "2024.01.09"),
                ("Last week", "2024.01.03-2024.01.10"),
                ("Last month", "2023.12.10-2024.01.10"),
                ("Last quarter", "2023.10.10-2024.01.10"),
                ("Last half-year", "2023.07.10-2024.01.10"),
                ("Last year", "2023.01.10-2024.01.10"),
            ]
        );
        let selected: Vec<&str> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(selected, vec!["Today"]);
    }

    #[test]
    fn test_month_arithmetic_clamps_to_month_end() {
        let filter = filter_on(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(), "");
        let last_month = filter
            .options()
            .into_iter()
            .find(|o| o.label == "Last month")
            .unwrap();
        assert_eq!(last_month.value, "2024.02.29-2024.03.31");
    }

    #[test]
    fn test_relative_option_compiles() {
        let mut args = Vec::new();
        let sql = filter("2024.01.03-2024.01.10").sql_condition("", &mut args);
        assert!(sql.is_some());
        assert_eq!(args[0], SqlParam::from("2024.01.03 00:00"));
    }
}
