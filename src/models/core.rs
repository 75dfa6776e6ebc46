//! Core types used across models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Uniform access to the tag set of a catalog-level or definition-level object.
///
/// Asset entries, item definitions, and whole catalogs all carry tags; callers
/// that only care about the taxonomy can take `&impl Tagged` instead of a
/// concrete type.
pub trait Tagged {
    /// The tags attached to this object. Empty when the owning catalog defines
    /// no tag taxonomy.
    fn tags(&self) -> &BTreeSet<String>;
}

/// A raw attribute value as it appears on an inventory record.
///
/// Upstream encodes attribute values as whatever JSON type the attribute
/// needs: whole numbers, floats, or opaque strings.
///
/// # Examples
///
/// ```
/// use armory::models::AttrValue;
///
/// let whole: AttrValue = serde_json::from_str("3").unwrap();
/// let fractional: AttrValue = serde_json::from_str("0.25").unwrap();
///
/// assert_eq!(whole.as_f64(), Some(3.0));
/// assert_eq!(fractional.as_f64(), Some(0.25));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// A whole-number value
    Integer(i64),
    /// A fractional value
    Float(f64),
    /// An opaque string value (e.g. gifter account info)
    Text(String),
}

impl AttrValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Integer(n) => Some(*n as f64),
            AttrValue::Float(f) => Some(*f),
            AttrValue::Text(_) => None,
        }
    }

    /// String view of the value, if it is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for AttrValue {
    fn default() -> Self {
        AttrValue::Integer(0)
    }
}

/// How an attribute's raw value is rendered into its description template.
///
/// Derived from the schema template's `description_format` field by stripping
/// the `value_is_` prefix. Formats this crate does not recognize map to
/// [`ValueType::Unspecified`] and render additively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Plain number, added to a base stat
    Additive,
    /// Plain percentage points
    AdditivePercentage,
    /// Multiplier shown as a percentage delta from 100
    Percentage,
    /// Multiplier shown as a percentage delta below 100
    InvertedPercentage,
    /// Unix timestamp; formatting is upstream-unreliable and excluded from
    /// equivalence checks
    Date,
    /// Index into the particle effects table
    ParticleIndex,
    /// Packed account identifier
    Account,
    /// Boolean-ish flag rendered without substitution
    Or,
    /// Format missing or unrecognized
    Unspecified,
}

impl ValueType {
    /// Map a raw `description_format` string onto a value type.
    pub fn from_format(format: Option<&str>) -> Self {
        let Some(format) = format else {
            return ValueType::Unspecified;
        };
        match format.strip_prefix("value_is_").unwrap_or(format) {
            "additive" => ValueType::Additive,
            "additive_percentage" => ValueType::AdditivePercentage,
            "percentage" => ValueType::Percentage,
            "inverted_percentage" => ValueType::InvertedPercentage,
            "date" => ValueType::Date,
            "particle_index" => ValueType::ParticleIndex,
            "account_id" => ValueType::Account,
            "or" => ValueType::Or,
            _ => ValueType::Unspecified,
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Additive => write!(f, "additive"),
            ValueType::AdditivePercentage => write!(f, "additive_percentage"),
            ValueType::Percentage => write!(f, "percentage"),
            ValueType::InvertedPercentage => write!(f, "inverted_percentage"),
            ValueType::Date => write!(f, "date"),
            ValueType::ParticleIndex => write!(f, "particle_index"),
            ValueType::Account => write!(f, "account_id"),
            ValueType::Or => write!(f, "or"),
            ValueType::Unspecified => write!(f, "unspecified"),
        }
    }
}
