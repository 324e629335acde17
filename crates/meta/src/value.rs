//! Per-row property values
//!
//! A `PropertyValue` holds what one row knows about one property while a
//! request is bound, displayed or saved. Its state says which kind of
//! value is held; conversion always dispatches on the property's declared
//! kind, never on the state alone.

use adminkit_core::{DefaultValue, Value};
use serde::Serialize;

// ============================================================================
// UploadedFile
// ============================================================================

/// A file received with a submission
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Create a new uploaded file
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Content length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ============================================================================
// ValueState
// ============================================================================

/// What a property value currently holds
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ValueState {
    /// Nothing bound yet
    #[default]
    Unset,
    /// Use the configured default
    Default(DefaultValue),
    /// Converted value
    Scalar(Value),
    /// Unconverted text (request-only binding, key tokens)
    Text(String),
    /// Selected references of a multi-valued foreign key
    MultiValue(Vec<String>),
    /// Newly uploaded file
    File(UploadedFile),
    /// Stored file must be removed
    Clear,
}

// ============================================================================
// PropertyValue
// ============================================================================

/// Value of one property in one row
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PropertyValue {
    pub state: ValueState,

    /// User-supplied companion value (e.g. a file name)
    pub additional: Option<String>,

    /// Default configured for the property
    pub default_value: Option<DefaultValue>,
}

impl PropertyValue {
    /// Create an unset value carrying the property's default
    pub fn new(default_value: Option<DefaultValue>) -> Self {
        Self {
            state: ValueState::Unset,
            additional: None,
            default_value,
        }
    }

    /// Check if nothing has been bound
    pub fn is_unset(&self) -> bool {
        matches!(self.state, ValueState::Unset)
    }

    /// Check if the value is absent (unset or a null scalar)
    pub fn is_null(&self) -> bool {
        matches!(self.state, ValueState::Unset | ValueState::Scalar(Value::Null))
    }

    /// Check if the stored file must be removed
    pub fn is_clear(&self) -> bool {
        matches!(self.state, ValueState::Clear)
    }

    /// Set a converted value
    pub fn set(&mut self, value: impl Into<Value>) {
        self.state = ValueState::Scalar(value.into());
    }

    /// Set unconverted text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.state = ValueState::Text(text.into());
    }

    /// Converted value, if one is held
    pub fn scalar(&self) -> Option<&Value> {
        match &self.state {
            ValueState::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Selected references of a multi-valued foreign key
    pub fn values(&self) -> &[String] {
        match &self.state {
            ValueState::MultiValue(values) => values,
            _ => &[],
        }
    }

    /// Uploaded file, if one is held
    pub fn file(&self) -> Option<&UploadedFile> {
        match &self.state {
            ValueState::File(file) => Some(file),
            _ => None,
        }
    }

    /// Install the configured default where the defaulting rule applies
    ///
    /// A behaviour default always applies. A fixed default applies when the
    /// slot asks for it or is still empty.
    pub fn apply_default(&mut self) {
        let Some(default) = &self.default_value else {
            return;
        };
        let wants_default = default.is_behavior()
            || self.is_null()
            || matches!(self.state, ValueState::Default(_));
        if !wants_default {
            return;
        }
        self.state = match default {
            DefaultValue::Fixed(value) => ValueState::Scalar(value.clone()),
            behavior => ValueState::Default(behavior.clone()),
        };
    }

    /// Invariant string form
    pub fn as_string(&self) -> String {
        match &self.state {
            ValueState::Unset | ValueState::Clear => String::new(),
            ValueState::Default(default) => default.to_string(),
            ValueState::Scalar(value) => value.to_string(),
            ValueState::Text(text) => text.clone(),
            ValueState::MultiValue(values) => values.join(","),
            ValueState::File(file) => self
                .additional
                .clone()
                .unwrap_or_else(|| file.file_name.clone()),
        }
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
