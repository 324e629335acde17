//! Per-record link templates
//!
//! An entity may point its records at pages outside the admin: a display
//! page, an edit page and a delete action. Each template carries a `{0}`
//! token that is replaced by the record's joined key value.

use crate::row::DataRow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token replaced by the joined key value
pub const KEY_TOKEN: &str = "{0}";

/// The links a record can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Display,
    Edit,
    Delete,
}

impl LinkKind {
    pub const ALL: [LinkKind; 3] = [LinkKind::Display, LinkKind::Edit, LinkKind::Delete];
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkKind::Display => "display",
            LinkKind::Edit => "edit",
            LinkKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Link templates of an entity
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    pub display: Option<String>,
    pub edit: Option<String>,
    pub delete: Option<String>,
}

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display(mut self, template: impl Into<String>) -> Self {
        self.display = Some(template.into());
        self
    }

    pub fn with_edit(mut self, template: impl Into<String>) -> Self {
        self.edit = Some(template.into());
        self
    }

    pub fn with_delete(mut self, template: impl Into<String>) -> Self {
        self.delete = Some(template.into());
        self
    }

    /// Template of one link; blank templates count as absent
    pub fn template(&self, kind: LinkKind) -> Option<&str> {
        let template = match kind {
            LinkKind::Display => &self.display,
            LinkKind::Edit => &self.edit,
            LinkKind::Delete => &self.delete,
        };
        template.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Number of configured links
    pub fn count(&self) -> usize {
        LinkKind::ALL
            .iter()
            .filter(|kind| self.template(**kind).is_some())
            .count()
    }

    /// Fill a link template with a joined key value
    pub fn format(&self, kind: LinkKind, joined_key: &str) -> Option<String> {
        self.template(kind)
            .map(|template| template.replace(KEY_TOKEN, joined_key))
    }
}

impl DataRow {
    /// A link of this record, filled with its joined key value
    pub fn link(&self, kind: LinkKind) -> Option<String> {
        self.entity().links.format(kind, &self.joined_key_value())
    }

    /// Every configured link of this record, in display/edit/delete order
    pub fn links(&self) -> Vec<(LinkKind, String)> {
        LinkKind::ALL
            .into_iter()
            .filter_map(|kind| self.link(kind).map(|url| (kind, url)))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
