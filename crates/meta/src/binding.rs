//! Binding submitted data into rows
//!
//! Submitted fields are looked up by exact property name. File inputs
//! come from a separate file source; a file is marked for removal by a
//! truthy `<Name>_delete` field unless a non-empty upload arrives in the
//! same submission. Multi-valued foreign keys arrive as one comma-joined
//! string. Text longer than a property's length limit is rejected and
//! leaves the slot untouched.

use crate::property::Property;
use crate::row::DataRow;
use crate::value::{UploadedFile, ValueState};
use adminkit_core::{AdminError, AdminResult, Culture, NameCreation, Value, parse_bool};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tracing::debug;

/// Suffix of the companion field that requests file removal
pub const DELETE_SUFFIX: &str = "_delete";

// ============================================================================
// Sources
// ============================================================================

/// Submitted field values keyed by property name
pub trait FieldSource {
    /// Raw submitted text of a field
    fn get(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> FieldSource for HashMap<String, String, S> {
    fn get(&self, name: &str) -> Option<&str> {
        HashMap::get(self, name).map(String::as_str)
    }
}

impl FieldSource for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        BTreeMap::get(self, name).map(String::as_str)
    }
}

/// Uploaded files keyed by property name
pub trait FileSource {
    fn file(&self, name: &str) -> Option<&UploadedFile>;
}

impl<S: BuildHasher> FileSource for HashMap<String, UploadedFile, S> {
    fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.get(name)
    }
}

impl FileSource for BTreeMap<String, UploadedFile> {
    fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.get(name)
    }
}

/// A submission without files
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFiles;

impl FileSource for NoFiles {
    fn file(&self, _name: &str) -> Option<&UploadedFile> {
        None
    }
}

// ============================================================================
// BindResult
// ============================================================================

/// Outcome of binding one submission
///
/// Conversion failures are collected per property; the caller decides
/// whether to abort or to report them next to each field.
#[derive(Debug, Default)]
pub struct BindResult {
    pub errors: Vec<AdminError>,
}

impl BindResult {
    /// Create a successful result
    pub fn ok() -> Self {
        Self::default()
    }

    /// Add an error
    pub fn add_error(&mut self, error: AdminError) {
        self.errors.push(error);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors raised for one property
    pub fn errors_for<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a AdminError> {
        self.errors.iter().filter(move |e| match e {
            AdminError::ValueConversion { property: p, .. }
            | AdminError::ValueTooLong { property: p, .. } => p == property,
            _ => false,
        })
    }

    /// Fail with the first error, if any
    pub fn into_result(self) -> AdminResult<()> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Fill
// ============================================================================

/// Reject text longer than the property's limit
fn check_length(property: &Property, value: Value) -> AdminResult<Value> {
    if let (Some(max), Value::Text(text)) = (property.max_length, &value) {
        let length = text.chars().count();
        if length > max {
            return Err(AdminError::ValueTooLong {
                property: property.name.clone(),
                max,
                length,
            });
        }
    }
    Ok(value)
}

impl DataRow {
    /// Bind submitted fields and files into this row
    pub fn fill<F, U>(&mut self, fields: &F, files: &U, culture: &Culture) -> BindResult
    where
        F: FieldSource + ?Sized,
        U: FileSource + ?Sized,
    {
        let mut result = BindResult::ok();

        for (property, value) in self.iter_mut() {
            let name = property.name.as_str();

            if property.type_info.is_file() {
                let upload = files.file(name);
                if let Some(file) = upload {
                    value.state = ValueState::File(file.clone());
                }

                let user_named = property
                    .file_options
                    .as_ref()
                    .is_some_and(|o| o.name_creation == NameCreation::UserInput);
                if !property.type_info.is_file_stored_in_db() && user_named {
                    value.additional = fields
                        .get(name)
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .map(str::to_string);
                }

                let delete_requested = fields
                    .get(&format!("{}{}", name, DELETE_SUFFIX))
                    .and_then(parse_bool)
                    .unwrap_or(false);
                let uploaded = upload.is_some_and(|f| !f.is_empty());
                if delete_requested && uploaded {
                    debug!("{}: new upload overrides delete flag", name);
                }
                if delete_requested && !uploaded {
                    value.state = ValueState::Clear;
                    value.additional = None;
                }
            } else if let Some(raw) = fields.get(name) {
                if property.is_multi_valued_foreign_key() {
                    let values = if raw.is_empty() {
                        Vec::new()
                    } else {
                        raw.split(',').map(str::to_string).collect()
                    };
                    value.state = ValueState::MultiValue(values);
                } else {
                    match culture
                        .convert(name, raw, &property.type_info)
                        .and_then(|converted| check_length(property, converted))
                    {
                        Ok(converted) => value.set(converted),
                        Err(error) => {
                            debug!("{}: {}", name, error);
                            result.add_error(error);
                        }
                    }
                }
            }

            value.apply_default();
        }

        result
    }

    /// Decode the key, then bind submitted fields and files
    ///
    /// A malformed key fails the whole call; conversion failures are
    /// collected in the result.
    pub fn fill_with_key<F, U>(
        &mut self,
        key: &str,
        fields: &F,
        files: &U,
        culture: &Culture,
    ) -> AdminResult<BindResult>
    where
        F: FieldSource + ?Sized,
        U: FileSource + ?Sized,
    {
        self.set_key_value(key)?;
        Ok(self.fill(fields, files, culture))
    }

    /// Copy raw request text into every property, without conversion
    pub fn fill_from_request<F: FieldSource + ?Sized>(&mut self, request: &F) {
        for (property, value) in self.iter_mut() {
            value.state = match request.get(&property.name) {
                Some(raw) => ValueState::Text(raw.to_string()),
                None => ValueState::Unset,
            };
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
