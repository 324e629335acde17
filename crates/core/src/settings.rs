//! Runtime settings for AdminKit
//!
//! Settings are loaded from a TOML or JSON file (chosen by extension) and
//! fall back to defaults for anything left out.

use crate::culture::Culture;
use crate::error::{AdminError, AdminResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default entity treated as the change/audit log
pub const DEFAULT_CHANGE_ENTITY: &str = "EntityChange";

/// Default log filter directive
pub const DEFAULT_LOG_FILTER: &str = "info";

// ============================================================================
// AdminSettings
// ============================================================================

/// Settings shared by the metadata builder, the binder and the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Culture used to parse submitted values (empty = invariant)
    pub culture: String,

    /// Entity whose records are never added, edited or deleted by hand
    pub change_entity: Option<String>,

    /// Schema applied to tables that do not name one
    pub default_schema: Option<String>,

    /// `tracing` filter directive, e.g. "adminkit_meta=debug"
    pub log_filter: String,

    /// Directory scanned for descriptor JSON files
    pub descriptor_dir: Option<PathBuf>,
}

impl AdminSettings {
    /// Create settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a `.toml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> AdminResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AdminError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let settings: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content).with_context(path.display().to_string())?,
            Some("json") => {
                serde_json::from_str(&content).with_context(path.display().to_string())?
            }
            other => {
                return Err(AdminError::InvalidConfig(format!(
                    "Unsupported settings format '{}' for {}",
                    other.unwrap_or_default(),
                    path.display()
                )));
            }
        };

        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the culture name
    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = culture.into();
        self
    }

    /// Set the change/audit entity
    pub fn with_change_entity(mut self, entity: impl Into<String>) -> Self {
        self.change_entity = Some(entity.into());
        self
    }

    /// Set the default table schema
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    /// Set the log filter directive
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Set the descriptor directory
    pub fn with_descriptor_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.descriptor_dir = Some(dir.into());
        self
    }

    /// Resolve the configured culture
    pub fn culture(&self) -> Culture {
        Culture::from_name(&self.culture)
    }
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            culture: String::new(),
            change_entity: Some(DEFAULT_CHANGE_ENTITY.to_string()),
            default_schema: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            descriptor_dir: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
