//! SQL parameter model and WHERE composition
//!
//! Conditions reference columns as `<alias><column>` and bind values
//! through `@n` placeholders, where `n` is the length of the shared
//! parameter list at the moment the value is appended. Conditions built
//! against one list therefore compose in the order they were produced.

use serde::Serialize;
use std::fmt;

// ============================================================================
// Parameters
// ============================================================================

/// A bound query parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Real(f64),
    Bool(bool),
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Text(s) => write!(f, "'{}'", s),
            SqlParam::Int(i) => write!(f, "{}", i),
            SqlParam::Real(r) => write!(f, "{}", r),
            SqlParam::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        SqlParam::Text(s)
    }
}

impl From<i64> for SqlParam {
    fn from(i: i64) -> Self {
        SqlParam::Int(i)
    }
}

impl From<f64> for SqlParam {
    fn from(r: f64) -> Self {
        SqlParam::Real(r)
    }
}

impl From<bool> for SqlParam {
    fn from(b: bool) -> Self {
        SqlParam::Bool(b)
    }
}

/// Append a parameter and return its placeholder
pub fn bind(args: &mut Vec<SqlParam>, param: impl Into<SqlParam>) -> String {
    let placeholder = format!("@{}", args.len());
    args.push(param.into());
    placeholder
}

// ============================================================================
// Conditions
// ============================================================================

/// Anything that contributes a boolean SQL fragment
pub trait SqlCondition {
    /// Build the fragment, appending its parameters to `args`
    ///
    /// Returns `None` when the condition does not restrict the result.
    /// Nothing is appended in that case.
    fn sql_condition(&self, alias: &str, args: &mut Vec<SqlParam>) -> Option<String>;
}

/// An AND-joined set of conditions with their parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WhereClause {
    pub conditions: Vec<String>,
    pub params: Vec<SqlParam>,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The conditions joined with `AND` (empty when there are none)
    pub fn condition(&self) -> String {
        self.conditions.join(" AND ")
    }

    /// `WHERE ...`, or an empty string when there are no conditions
    pub fn to_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.condition())
        }
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Collects conditions against one alias and one parameter list
#[derive(Debug, Clone)]
pub struct WhereBuilder {
    alias: String,
    clause: WhereClause,
}

impl WhereBuilder {
    /// Create a builder for a table alias such as `"t."` (or `""`)
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            clause: WhereClause::default(),
        }
    }

    /// Continue numbering after parameters the caller already bound
    pub fn with_params(mut self, params: Vec<SqlParam>) -> Self {
        self.clause.params = params;
        self
    }

    /// Add a condition; conditions that produce nothing are skipped
    pub fn add<C: SqlCondition + ?Sized>(&mut self, condition: &C) -> &mut Self {
        if let Some(sql) = condition.sql_condition(&self.alias, &mut self.clause.params) {
            self.clause.conditions.push(sql);
        }
        self
    }

    /// Add several conditions in order
    pub fn add_all<'c, C>(&mut self, conditions: impl IntoIterator<Item = &'c C>) -> &mut Self
    where
        C: SqlCondition + ?Sized + 'c,
    {
        for condition in conditions {
            self.add(condition);
        }
        self
    }

    pub fn build(self) -> WhereClause {
        self.clause
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Equals(&'static str, i64);

    impl SqlCondition for Equals {
        fn sql_condition(&self, alias: &str, args: &mut Vec<SqlParam>) -> Option<String> {
            Some(format!("{}{} = {}", alias, self.0, bind(args, self.1)))
        }
    }

    struct Nothing;

    impl SqlCondition for Nothing {
        fn sql_condition(&self, _alias: &str, _args: &mut Vec<SqlParam>) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_bind_uses_current_length() {
        let mut args = vec![SqlParam::Int(1)];
        assert_eq!(bind(&mut args, "x"), "@1");
        assert_eq!(bind(&mut args, true), "@2");
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_where_composition() {
        let mut builder = WhereBuilder::new("t.");
        builder
            .add(&Equals("A", 1))
            .add(&Nothing)
            .add(&Equals("B", 2));
        let clause = builder.build();
        assert_eq!(clause.to_sql(), "WHERE t.A = @0 AND t.B = @1");
        assert_eq!(clause.params, vec![SqlParam::Int(1), SqlParam::Int(2)]);
    }

    #[test]
    fn test_with_params_continues_numbering() {
        let mut builder = WhereBuilder::new("").with_params(vec![SqlParam::from("x")]);
        builder.add(&Equals("A", 7));
        assert_eq!(builder.build().condition(), "A = @1");
    }

    #[test]
    fn test_empty_clause() {
        let mut builder = WhereBuilder::new("");
        builder.add(&Nothing);
        let clause = builder.build();
        assert!(clause.is_empty());
        assert_eq!(clause.to_sql(), "");
    }
}
