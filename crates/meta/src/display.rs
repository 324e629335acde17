//! Display strings for records
//!
//! A record is displayed by the first rule that applies:
//!
//! 1. the entity's record display format, with `{PropertyName}` tokens
//!    replaced by property values;
//! 2. the entity's display adapter, if one is attached;
//! 3. the first property whose name contains "name", "title",
//!    "description" or "value" (tried in that order);
//! 4. `#` followed by the joined key value.

use crate::property::Property;
use crate::row::DataRow;
use crate::value::PropertyValue;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Name fragments tried by the heuristic, in priority order
const DISPLAY_NAME_HINTS: &[&str] = &["name", "title", "description", "value"];

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("token pattern is valid"));

// ============================================================================
// RecordView
// ============================================================================

/// The values a display adapter may read
///
/// Holds the row's plain properties and its foreign keys declared with a
/// system type. Navigation members are left out.
pub struct RecordView<'a> {
    values: Vec<(&'a Property, &'a PropertyValue)>,
}

impl<'a> RecordView<'a> {
    fn of(row: &'a DataRow) -> Self {
        let values = row
            .iter()
            .filter(|(p, _)| !p.is_foreign_key || p.type_info.is_system_type())
            .collect();
        Self { values }
    }

    /// Value of a property
    pub fn get(&self, name: &str) -> Option<&'a PropertyValue> {
        self.values
            .iter()
            .find(|(p, _)| p.name == name)
            .map(|(_, v)| *v)
    }

    /// String form of a property (empty when absent)
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(PropertyValue::as_string).unwrap_or_default()
    }

    /// Property names available to the adapter
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(p, _)| p.name.as_str())
    }
}

// ============================================================================
// Adapters
// ============================================================================

/// Renders a record as a display string
pub trait RecordRenderer: Send + Sync {
    fn render(&self, record: &RecordView<'_>) -> String;
}

impl<F> RecordRenderer for F
where
    F: Fn(&RecordView<'_>) -> String + Send + Sync,
{
    fn render(&self, record: &RecordView<'_>) -> String {
        self(record)
    }
}

/// Domain types that can be built from a record's values
pub trait FromRecord: Sized {
    fn from_record(record: &RecordView<'_>) -> Self;
}

/// A display override attached to an entity
#[derive(Clone)]
pub struct DisplayAdapter(Arc<dyn RecordRenderer>);

impl DisplayAdapter {
    /// Wrap a renderer
    pub fn new(renderer: impl RecordRenderer + 'static) -> Self {
        Self(Arc::new(renderer))
    }

    /// Render through a domain type's own `Display` implementation
    pub fn of<T: FromRecord + fmt::Display + 'static>() -> Self {
        Self::new(|record: &RecordView<'_>| T::from_record(record).to_string())
    }

    /// Render a record
    pub fn render(&self, record: &RecordView<'_>) -> String {
        self.0.render(record)
    }
}

impl fmt::Debug for DisplayAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DisplayAdapter")
    }
}

// ============================================================================
// Display chain
// ============================================================================

impl DataRow {
    /// Human-readable string for this record
    pub fn to_display_string(&self) -> String {
        let entity = self.entity();

        if let Some(format) = &entity.record_display_format {
            return TOKEN
                .replace_all(format, |caps: &Captures<'_>| match self.value(&caps[1]) {
                    Some(value) => value.as_string(),
                    None => caps[0].to_string(),
                })
                .into_owned();
        }

        if let Some(adapter) = &entity.display_adapter {
            return adapter.render(&RecordView::of(self));
        }

        let heuristic = DISPLAY_NAME_HINTS.iter().find_map(|hint| {
            self.iter()
                .find(|(p, _)| p.name.to_lowercase().contains(hint))
                .map(|(_, v)| v.as_string())
        });
        match heuristic {
            Some(text) if !text.is_empty() => text,
            _ => format!("#{}", self.joined_key_value()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
