//! Schema record models: item definitions, attribute templates, and the
//! qualities/effects tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::core::{AttrValue, Tagged, ValueType};

/// Placeholder token substituted with the rendered value in attribute
/// description templates. Each template contains it at most once.
pub const VALUE_PLACEHOLDER: &str = "%s1";

/// One item definition from the schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemDef {
    /// Item definition index, unique within one (app, language) schema
    pub defindex: u32,
    /// Base display name template
    pub item_name: String,
    /// Whether the unique-quality display name takes a "The" prefix
    #[serde(default)]
    pub proper_name: bool,
    /// Quality id this definition ships with
    #[serde(default)]
    pub item_quality: u32,
    /// Localized type line ("Hat", "Shotgun")
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub item_type_name: Option<String>,
    /// Flavor text
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub item_description: Option<String>,
    /// Ordered quality-variant names this definition can appear in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualities: Vec<String>,
    /// Attribute values attached by the schema itself, before any
    /// per-instance values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<StaticAttribute>,
    /// Tag taxonomy entries, empty when the application defines none
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

impl Tagged for ItemDef {
    fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
}

/// A schema-attached attribute value on an item definition.
///
/// Instances of the definition inherit these; a per-instance value for the
/// same attribute replaces the static one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaticAttribute {
    /// Attribute template defindex
    pub defindex: u32,
    /// Raw value
    pub value: AttrValue,
}

/// An attribute description template from the schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeTemplate {
    /// Attribute defindex, unique within one schema
    pub defindex: u32,
    /// Internal attribute name ("unique craft index", "attach particle effect")
    pub name: String,
    /// Description template, absent for purely internal attributes
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description_string: Option<String>,
    /// Rendering convention tag ("value_is_percentage", ...)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description_format: Option<String>,
    /// "positive", "negative", or "neutral"
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub effect_type: Option<String>,
    /// Hidden attributes resolve normally but are excluded from display
    #[serde(default)]
    pub hidden: bool,
    /// Whether the raw value is bit-stored as an integer
    #[serde(default)]
    pub stored_as_integer: bool,
}

impl AttributeTemplate {
    /// The description template text, if this attribute has one.
    pub fn description(&self) -> Option<&str> {
        self.description_string.as_deref()
    }

    /// Rendering convention for this attribute's raw value.
    pub fn value_type(&self) -> ValueType {
        ValueType::from_format(self.description_format.as_deref())
    }

    /// Whether the description template expects a substituted value.
    pub fn has_placeholder(&self) -> bool {
        self.description_string
            .as_deref()
            .is_some_and(|d| d.contains(VALUE_PLACEHOLDER))
    }
}

/// One row of the schema qualities table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityDef {
    /// Numeric quality id
    pub id: u32,
    /// Canonical lowercase key ("unique", "strange", "vintage")
    pub name: String,
    /// Localized display label ("Unique", "Strange", "Vintage")
    pub label: String,
}

/// One row of the particle effects table, used to render
/// [`ValueType::ParticleIndex`] values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticleEffect {
    /// Effect id referenced by particle attribute values
    pub id: u32,
    /// Localized effect name
    pub name: String,
}
