//! # AdminKit Filters
//!
//! Compiles list filters into parameterized SQL conditions for AdminKit.
//!
//! Every filter emits a boolean fragment against a table alias and appends
//! its values to a shared parameter list. Placeholders are numbered by the
//! list's length at append time, so fragments from several filters compose
//! into one WHERE clause.
//!
//! - **Filters**: bool, enum, date range and foreign key filters
//! - **Search**: free-text search over searchable properties
//! - **FilterFactory**: builds filters from request parameters
//! - **Clock**: injectable time source for relative date ranges
//!

// Module declarations
pub mod bool_filter;
pub mod clock;
pub mod datetime_filter;
pub mod enum_filter;
pub mod factory;
pub mod filter;
pub mod foreign_filter;
pub mod search;
pub mod sql;

// Re-export commonly used types at crate root
pub use bool_filter::BoolFilter;
pub use clock::{Clock, FixedClock, SystemClock};
pub use datetime_filter::{DATE_FORMAT, DateTimeFilter};
pub use enum_filter::EnumFilter;
pub use factory::{FilterFactory, SEARCH_PARAM};
pub use filter::{EntityFilter, FilterKind, FilterOption};
pub use foreign_filter::ForeignFilter;
pub use search::Search;
pub use sql::{SqlCondition, SqlParam, WhereBuilder, WhereClause, bind};
