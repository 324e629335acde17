//! # AdminKit Meta
//!
//! Entity metadata for AdminKit. This crate turns type descriptors and their
//! annotations, together with fluent configuration, into frozen entity
//! metadata, and binds submitted form data to rows of typed values.
//!
//! ## Core Concepts
//!
//! - **TypeDescriptor**: the reflective description of a domain type and its annotations
//! - **EntityConfiguration**: fluent overrides applied after annotation scanning
//! - **Entity / Property**: resolved metadata for one type and its members
//! - **EntityRegistry**: the frozen, process-wide set of entities
//! - **DataRow**: one record's property values, filled from form fields
//! - **KeyCodec**: composite key strings for URLs and hidden fields
//! - **Links**: display, edit and delete link templates filled with a record's key
//!

// Module declarations
pub mod annotation;
pub mod binding;
pub mod configuration;
pub mod descriptor;
pub mod display;
pub mod entity;
pub mod key;
pub mod links;
pub mod property;
pub mod registry;
pub mod row;
pub mod scanner;
pub mod value;

// Re-export commonly used types at crate root
pub use annotation::Annotation;
pub use binding::{BindResult, DELETE_SUFFIX, FieldSource, FileSource, NoFiles};
pub use configuration::{EntityConfiguration, GroupSpec, PropertyConfiguration};
pub use descriptor::{Describe, MemberDescriptor, TypeDescriptor};
pub use display::{DisplayAdapter, FromRecord, RecordRenderer, RecordView};
pub use entity::{Entity, PropertyGroup, Verbose, pluralize, render_table_name};
pub use key::{KEY_SEPARATOR, KeyCodec};
pub use links::{KEY_TOKEN, LinkKind, Links};
pub use property::{Property, Template};
pub use registry::{EntityRegistry, RegistryBuilder, initialize, registry};
pub use row::DataRow;
pub use scanner::AttributeScanner;
pub use value::{PropertyValue, UploadedFile, ValueState};
