//! # AdminKit Core
//!
//! Core types, traits, and error handling for AdminKit.
//!
//! This crate provides the foundational building blocks shared by the
//! metadata model, the binder and the filter compiler:
//!
//! - **Types**: declared member shapes, property kinds, file options
//! - **TypeInfo**: per-property data shape classification
//! - **Values**: converted scalar values and configured defaults
//! - **Culture**: culture-aware conversion of submitted text
//! - **Settings**: `AdminSettings` loaded from TOML or JSON
//! - **Errors**: unified error handling with `AdminError` and `AdminResult`
//!

pub mod culture;
pub mod error;
pub mod settings;
pub mod traits;
pub mod type_info;
pub mod types;
pub mod value;

// Re-export commonly used items at crate root
pub use culture::{Culture, parse_bool};
pub use error::{AdminError, AdminResult, ResultExt};
pub use settings::AdminSettings;
pub use traits::Validatable;
pub use type_info::TypeInfo;
pub use types::{
    DataType, DeclaredType, DeleteOption, FileOptions, ImageSettings, NameCreation, ScalarKind,
    SourceDataType,
};
pub use value::{DefaultBehavior, DefaultValue, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
