//! Attribute resolution: joining raw values to schema templates
//!
//! A raw attribute value carries only a defindex and a number; the schema's
//! attribute template says how to phrase it. Resolution substitutes the
//! rendered value into the template's placeholder and marks the result with
//! the template's hidden flag and value type so callers can filter.

use crate::models::{AttrValue, AttributeTemplate, RawAttributeValue, ValueType, VALUE_PLACEHOLDER};
use crate::stores::{SchemaStore, StoreError};

/// A fully resolved attribute on one item instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttribute {
    /// Attribute template defindex
    pub defindex: u32,
    /// Internal template name
    pub name: String,
    /// Raw value the description was rendered from
    pub value: AttrValue,
    /// Human-readable description with the value substituted in
    pub formatted_description: String,
    /// Carried over from the template; hidden attributes resolve normally
    /// but are excluded from display and equivalence checks
    pub hidden: bool,
    /// Rendering convention the value was formatted under
    pub value_type: ValueType,
}

/// Resolves raw attribute values against one schema's template table.
///
/// Resolution is a pure function of (template, raw value, schema tables):
/// resolving the same value twice yields identical output.
///
/// # Examples
///
/// ```
/// use armory::models::{AttributeTemplate, RawAttributeValue};
/// use armory::resolve::AttributeResolver;
/// use armory::stores::SchemaStore;
///
/// let mut schema = SchemaStore::new(440, "en_US");
/// schema.register_attribute(serde_json::from_str(
///     r#"{"defindex": 2, "name": "damage bonus",
///         "description_string": "+%s1% damage bonus",
///         "description_format": "value_is_percentage"}"#,
/// ).unwrap());
///
/// let resolver = AttributeResolver::new(&schema);
/// let raw: RawAttributeValue =
///     serde_json::from_str(r#"{"defindex": 2, "value": 1, "float_value": 1.15}"#).unwrap();
///
/// let attr = resolver.resolve(&raw).unwrap();
/// assert_eq!(attr.formatted_description, "+15% damage bonus");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AttributeResolver<'a> {
    schema: &'a SchemaStore,
}

impl<'a> AttributeResolver<'a> {
    /// Create a resolver over one schema.
    pub fn new(schema: &'a SchemaStore) -> Self {
        Self { schema }
    }

    /// Resolve a raw value, looking its template up by defindex.
    ///
    /// A value whose template is missing from the schema is an error; it must
    /// never be dropped silently, because a dropped attribute would corrupt
    /// downstream equivalence checks.
    pub fn resolve(&self, raw: &RawAttributeValue) -> Result<ResolvedAttribute, StoreError> {
        let template = self.schema.attribute(raw.defindex)?;
        Ok(self.resolve_with(template, raw))
    }

    /// Resolve a raw value against an already-located template.
    pub fn resolve_with(
        &self,
        template: &AttributeTemplate,
        raw: &RawAttributeValue,
    ) -> ResolvedAttribute {
        let formatted_description = match template.description() {
            Some(desc) if desc.contains(VALUE_PLACEHOLDER) => {
                desc.replace(VALUE_PLACEHOLDER, &self.render_value(template, raw))
            }
            // Flag-style template: text stands on its own
            Some(desc) => desc.to_string(),
            // Purely internal attribute: fall back to the template name
            None => template.name.clone(),
        };

        ResolvedAttribute {
            defindex: template.defindex,
            name: template.name.clone(),
            value: raw.value.clone(),
            formatted_description,
            hidden: template.hidden,
            value_type: template.value_type(),
        }
    }

    /// Render the raw value as substitution text per the template's value
    /// type.
    fn render_value(&self, template: &AttributeTemplate, raw: &RawAttributeValue) -> String {
        let Some(value) = raw.numeric() else {
            // Textual values substitute verbatim
            return raw.value.as_str().unwrap_or_default().to_string();
        };

        match template.value_type() {
            ValueType::Percentage => ((value * 100.0).round() as i64 - 100).to_string(),
            ValueType::InvertedPercentage => (100 - (value * 100.0).round() as i64).to_string(),
            ValueType::AdditivePercentage => ((value * 100.0).round() as i64).to_string(),
            // Timestamp formatting is upstream-unreliable; the raw seconds
            // value stands in and the value type keeps it out of
            // equivalence checks
            ValueType::Date => (value as i64).to_string(),
            ValueType::ParticleIndex => {
                let id = value as u32;
                match self.schema.effect_name(id) {
                    Some(name) => name.to_string(),
                    None => id.to_string(),
                }
            }
            ValueType::Additive
            | ValueType::Account
            | ValueType::Or
            | ValueType::Unspecified => render_plain(value),
        }
    }
}

/// Whole values render without a fractional part, everything else uses the
/// shortest decimal form.
fn render_plain(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}
