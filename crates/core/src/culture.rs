//! Culture-aware conversion of submitted text into typed values
//!
//! Request data always arrives as text. `Culture` knows how numbers and
//! dates are written for one locale and converts raw text into a
//! [`Value`] matching a property's [`TypeInfo`].

use crate::error::{AdminError, AdminResult};
use crate::type_info::TypeInfo;
use crate::types::{DataType, ScalarKind};
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ISO formats accepted by every culture after its own formats
const ISO_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M",
];
const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

// ============================================================================
// Culture
// ============================================================================

/// Number and date conventions of one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Culture {
    /// Culture name, e.g. "en-US" (empty for the invariant culture)
    pub name: String,
    pub decimal_separator: char,
    pub group_separator: char,
    /// Short date formats tried in order (chrono syntax)
    pub date_formats: Vec<String>,
}

impl Culture {
    /// The invariant culture
    pub fn invariant() -> Self {
        Self {
            name: String::new(),
            decimal_separator: '.',
            group_separator: ',',
            date_formats: vec!["%m/%d/%Y".to_string()],
        }
    }

    /// Look up a known culture by name
    ///
    /// Unknown names fall back to the invariant conventions under the
    /// requested name.
    pub fn from_name(name: &str) -> Self {
        let formats = |list: &[&str]| list.iter().map(|f| f.to_string()).collect();
        match name {
            "" => Self::invariant(),
            "en-US" => Self {
                name: name.to_string(),
                decimal_separator: '.',
                group_separator: ',',
                date_formats: formats(&["%m/%d/%Y"]),
            },
            "en-GB" => Self {
                name: name.to_string(),
                decimal_separator: '.',
                group_separator: ',',
                date_formats: formats(&["%d/%m/%Y"]),
            },
            "pl-PL" => Self {
                name: name.to_string(),
                decimal_separator: ',',
                group_separator: ' ',
                date_formats: formats(&["%d.%m.%Y", "%Y-%m-%d"]),
            },
            "de-DE" => Self {
                name: name.to_string(),
                decimal_separator: ',',
                group_separator: '.',
                date_formats: formats(&["%d.%m.%Y"]),
            },
            "fr-FR" => Self {
                name: name.to_string(),
                decimal_separator: ',',
                group_separator: ' ',
                date_formats: formats(&["%d/%m/%Y"]),
            },
            other => {
                tracing::warn!("Unknown culture '{}', using invariant conventions", other);
                Self {
                    name: other.to_string(),
                    ..Self::invariant()
                }
            }
        }
    }

    /// Check if this is the invariant culture
    pub fn is_invariant(&self) -> bool {
        self.name.is_empty()
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Convert raw submitted text into a value of the property's type
    ///
    /// Blank text converts to [`Value::Null`]. Failures name the property
    /// and the offending raw text.
    pub fn convert(&self, property: &str, raw: &str, info: &TypeInfo) -> AdminResult<Value> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }

        if info.is_enum() {
            return self.convert_enum(property, trimmed, info);
        }

        let Some(kind) = info.scalar else {
            // Foreign entity reference: the submitted text is the foreign key
            return Ok(Value::Text(trimmed.to_string()));
        };

        let fail = || AdminError::conversion(property, raw, kind.display_name());

        match kind {
            ScalarKind::Bool => parse_bool(trimmed).map(Value::Bool).ok_or_else(fail),
            ScalarKind::Byte => self.parse_int(trimmed, 0, u8::MAX as i64).ok_or_else(fail),
            ScalarKind::Int16 => self
                .parse_int(trimmed, i16::MIN as i64, i16::MAX as i64)
                .ok_or_else(fail),
            ScalarKind::Int32 => self
                .parse_int(trimmed, i32::MIN as i64, i32::MAX as i64)
                .ok_or_else(fail),
            ScalarKind::Int64 => self.parse_int(trimmed, i64::MIN, i64::MAX).ok_or_else(fail),
            ScalarKind::Float32 | ScalarKind::Float64 | ScalarKind::Decimal => {
                self.parse_real(trimmed).map(Value::Real).ok_or_else(fail)
            }
            ScalarKind::Char => {
                let mut chars = trimmed.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Text(c.to_string())),
                    _ => Err(fail()),
                }
            }
            ScalarKind::String => Ok(Value::Text(raw.to_string())),
            ScalarKind::DateTime => self
                .parse_date_time(trimmed)
                .map(Value::DateTime)
                .ok_or_else(fail),
            ScalarKind::Date => self.parse_date(trimmed).map(Value::Date).ok_or_else(fail),
            ScalarKind::Time => parse_time(trimmed).map(Value::Time).ok_or_else(fail),
            ScalarKind::Uuid => Uuid::parse_str(trimmed)
                .map(Value::Uuid)
                .map_err(|_| fail()),
            ScalarKind::Bytes => Ok(Value::Bytes(raw.as_bytes().to_vec())),
        }
    }

    /// Variant of an enum property, by name or by position
    ///
    /// Integer-backed members store the variant's position; enum-typed
    /// members store its name.
    fn convert_enum(&self, property: &str, raw: &str, info: &TypeInfo) -> AdminResult<Value> {
        let index = info
            .enum_variants
            .iter()
            .position(|v| v.eq_ignore_ascii_case(raw))
            .or_else(|| {
                raw.parse::<usize>()
                    .ok()
                    .filter(|index| *index < info.enum_variants.len())
            });
        let Some(index) = index else {
            return Err(AdminError::conversion(
                property,
                raw,
                info.enum_name.as_deref().unwrap_or(DataType::Enum.display_name()),
            ));
        };
        match info.scalar {
            Some(kind) if kind.is_integer() => Ok(Value::Int(index as i64)),
            _ => Ok(Value::Text(info.enum_variants[index].clone())),
        }
    }

    fn normalize_number(&self, raw: &str) -> String {
        raw.chars()
            .filter(|c| *c != self.group_separator && !c.is_whitespace())
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect()
    }

    fn parse_int(&self, raw: &str, min: i64, max: i64) -> Option<Value> {
        let value = self.normalize_number(raw).parse::<i64>().ok()?;
        (min..=max).contains(&value).then_some(Value::Int(value))
    }

    fn parse_real(&self, raw: &str) -> Option<f64> {
        self.normalize_number(raw)
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        self.date_formats
            .iter()
            .map(String::as_str)
            .chain(ISO_DATE_FORMATS.iter().copied())
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    }

    fn parse_date_time(&self, raw: &str) -> Option<NaiveDateTime> {
        let culture_formats = self.date_formats.iter().flat_map(|date| {
            [format!("{} %H:%M:%S", date), format!("{} %H:%M", date)]
        });
        culture_formats
            .chain(ISO_DATE_TIME_FORMATS.iter().map(|f| f.to_string()))
            .find_map(|format| NaiveDateTime::parse_from_str(raw, &format).ok())
            .or_else(|| {
                self.parse_date(raw)
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a submitted boolean
///
/// Checkbox inputs post "true,false" when checked, so only the first token
/// counts.
pub fn parse_bool(raw: &str) -> Option<bool> {
    let first = raw.split(',').next().unwrap_or_default().trim();
    match first.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeclaredType;

    fn info(kind: ScalarKind) -> TypeInfo {
        TypeInfo::from_declared(&DeclaredType::scalar(kind))
    }

    #[test]
    fn test_blank_is_null() {
        let culture = Culture::invariant();
        let value = culture.convert("Age", "  ", &info(ScalarKind::Int32)).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_int_conversion_and_range() {
        let culture = Culture::invariant();
        assert_eq!(
            culture.convert("Qty", "1,200", &info(ScalarKind::Int32)).unwrap(),
            Value::Int(1200)
        );
        assert!(culture.convert("Qty", "300", &info(ScalarKind::Byte)).is_err());
    }

    #[test]
    fn test_real_uses_culture_separators() {
        let polish = Culture::from_name("pl-PL");
        assert_eq!(
            polish.convert("Price", "1 234,5", &info(ScalarKind::Decimal)).unwrap(),
            Value::Real(1234.5)
        );
        let german = Culture::from_name("de-DE");
        assert_eq!(
            german.convert("Price", "1.234,5", &info(ScalarKind::Float64)).unwrap(),
            Value::Real(1234.5)
        );
    }

    #[test]
    fn test_conversion_error_names_property() {
        let err = Culture::invariant()
            .convert("UnitPrice", "cheap", &info(ScalarKind::Decimal))
            .unwrap_err();
        match err {
            AdminError::ValueConversion { property, raw, .. } => {
                assert_eq!(property, "UnitPrice");
                assert_eq!(raw, "cheap");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_checkbox_bool() {
        let culture = Culture::invariant();
        assert_eq!(
            culture.convert("Discontinued", "true,false", &info(ScalarKind::Bool)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_dates() {
        let culture = Culture::from_name("en-GB");
        let date = culture.convert("Shipped", "31/01/2024", &info(ScalarKind::Date)).unwrap();
        assert_eq!(date, Value::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));

        let dt = culture
            .convert("OrderDate", "2024-01-31 10:30", &info(ScalarKind::DateTime))
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(dt, Value::DateTime(expected));

        let midnight = culture
            .convert("OrderDate", "31/01/2024", &info(ScalarKind::DateTime))
            .unwrap();
        assert_eq!(
            midnight,
            Value::DateTime(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_enum_by_name_or_index() {
        let info = TypeInfo::from_declared(&DeclaredType::Enum {
            name: "Status".to_string(),
            variants: vec!["Open".to_string(), "Closed".to_string()],
        });
        let culture = Culture::invariant();
        assert_eq!(culture.convert("Status", "closed", &info).unwrap(), Value::from("Closed"));
        assert_eq!(culture.convert("Status", "0", &info).unwrap(), Value::from("Open"));
        assert!(culture.convert("Status", "Pending", &info).is_err());
        assert!(culture.convert("Status", "2", &info).is_err());
    }

    #[test]
    fn test_integer_backed_enum_stores_position() {
        let mut info = info(ScalarKind::Int32);
        info.set_data_type(DataType::Enum);
        info.enum_name = Some("Status".to_string());
        info.enum_variants = vec!["Open".to_string(), "Closed".to_string()];

        let culture = Culture::invariant();
        assert_eq!(culture.convert("Status", "1", &info).unwrap(), Value::Int(1));
        assert_eq!(culture.convert("Status", "open", &info).unwrap(), Value::Int(0));
        assert!(culture.convert("Status", "5", &info).is_err());
    }

    #[test]
    fn test_uuid_and_foreign_reference() {
        let culture = Culture::invariant();
        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert_eq!(
            culture.convert("Id", id, &info(ScalarKind::Uuid)).unwrap(),
            Value::Uuid(Uuid::parse_str(id).unwrap())
        );
        let foreign = TypeInfo::from_declared(&DeclaredType::entity("Category"));
        assert_eq!(culture.convert("Category", " 7 ", &foreign).unwrap(), Value::from("7"));
    }

    #[test]
    fn test_unknown_culture_falls_back() {
        let culture = Culture::from_name("xx-YY");
        assert_eq!(culture.name, "xx-YY");
        assert_eq!(culture.decimal_separator, '.');
        assert!(!culture.is_invariant());
    }
}
