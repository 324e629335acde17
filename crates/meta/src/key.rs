//! Composite key codec
//!
//! Key values travel through URLs and hidden form fields as one string:
//! the values (or `name=value` pairs) in key order, joined with
//! [`KEY_SEPARATOR`]. Values are not escaped, so a value containing the
//! separator does not survive a round trip.

use crate::entity::Entity;
use adminkit_core::{AdminError, AdminResult};

/// Separator between key values
pub const KEY_SEPARATOR: char = '`';

/// Encodes and decodes key strings for one entity
#[derive(Debug, Clone, Copy)]
pub struct KeyCodec<'e> {
    entity: &'e Entity,
}

impl<'e> KeyCodec<'e> {
    /// Create a codec for an entity
    pub fn new(entity: &'e Entity) -> Self {
        Self { entity }
    }

    /// Number of key properties
    pub fn arity(&self) -> usize {
        self.entity.properties.iter().filter(|p| p.is_key).count()
    }

    /// Split a key string into trimmed tokens, one per key property
    pub fn decode(&self, key: &str) -> AdminResult<Vec<String>> {
        let tokens: Vec<String> = key
            .split(KEY_SEPARATOR)
            .map(|t| t.trim().to_string())
            .collect();
        let expected = self.arity();
        if tokens.len() != expected {
            return Err(AdminError::MalformedKey {
                entity: self.entity.name.clone(),
                expected,
                found: tokens.len(),
            });
        }
        Ok(tokens)
    }

    /// Join bare values in key order
    pub fn encode<S: AsRef<str>>(&self, values: &[S]) -> String {
        join(values.iter().map(|v| v.as_ref().to_string()))
    }

    /// Join `name=value` pairs in key order
    pub fn encode_with_names<S: AsRef<str>>(&self, values: &[S]) -> String {
        join(
            self.entity
                .key()
                .into_iter()
                .zip(values)
                .map(|(p, v)| format!("{}={}", p.name, v.as_ref())),
        )
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(&KEY_SEPARATOR.to_string())
}

// ============================================================================
// Tests
// ============================================================================
