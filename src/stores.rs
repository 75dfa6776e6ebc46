//! Lookup stores for catalog and schema records
//!
//! An [`AssetCatalog`] maps item definition indexes to market metadata; a
//! [`SchemaStore`] maps them to item definitions and additionally owns the
//! schema-wide attribute template, quality, and particle effect tables. Both
//! stores are immutable once assembled and are keyed by one (app, language)
//! pair held by the store itself.

use std::collections::{btree_map, BTreeMap, BTreeSet, HashMap};

use thiserror::Error;

use crate::models::{AssetEntry, AttributeTemplate, ItemDef, ParticleEffect, QualityDef, Tagged};

/// Quality key used when an item's quality id is missing from the table.
pub const FALLBACK_QUALITY: &str = "normal";

/// Error for store production failures and loud keyed lookups.
///
/// Membership tests (`contains`) answer with a bool instead; only indexed
/// access surfaces these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No catalog or schema exists for the requested (app, language) pair
    #[error("no catalog for app {app_id} in language '{language}'")]
    CatalogUnavailable { app_id: u32, language: String },
    /// Indexed lookup of an item definition that is not in the store
    #[error("item definition {defindex} not found")]
    ItemDefinitionNotFound { defindex: u32 },
    /// An attribute value references a template the schema does not define
    #[error("no attribute template with defindex {defindex}")]
    AttributeTemplateNotFound { defindex: u32 },
}

/// Market/tag metadata for every priced item definition of one
/// (app, language) pair.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    app_id: u32,
    language: String,
    entries: BTreeMap<u32, AssetEntry>,
    tags: BTreeSet<String>,
}

impl AssetCatalog {
    /// Create an empty catalog for one (app, language) pair.
    pub fn new(app_id: u32, language: impl Into<String>) -> Self {
        Self { app_id, language: language.into(), ..Self::default() }
    }

    /// Build a catalog from already-fetched entries.
    pub fn from_entries(
        app_id: u32,
        language: impl Into<String>,
        entries: Vec<AssetEntry>,
    ) -> Self {
        let mut catalog = Self::new(app_id, language);
        for entry in entries {
            catalog.register(entry);
        }
        catalog
    }

    /// Register an entry, replacing any previous entry for the same defindex.
    ///
    /// The aggregate tag view only grows: tags contributed by a replaced
    /// entry stay in the union.
    pub fn register(&mut self, entry: AssetEntry) {
        self.tags.extend(entry.tags.iter().cloned());
        self.entries.insert(entry.defindex, entry);
    }

    /// Check whether a definition index has an entry.
    pub fn contains(&self, defindex: u32) -> bool {
        self.entries.contains_key(&defindex)
    }

    /// Get an entry by definition index.
    pub fn get(&self, defindex: u32) -> Option<&AssetEntry> {
        self.entries.get(&defindex)
    }

    /// Indexed access; absent keys fail loudly.
    pub fn entry(&self, defindex: u32) -> Result<&AssetEntry, StoreError> {
        self.get(defindex).ok_or(StoreError::ItemDefinitionNotFound { defindex })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending defindex order.
    pub fn iter(&self) -> btree_map::Values<'_, u32, AssetEntry> {
        self.entries.values()
    }

    pub fn app_id(&self) -> u32 {
        self.app_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Tagged for AssetCatalog {
    /// Union of all contained entries' tags. Empty when the application
    /// defines no tag taxonomy.
    fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
}

impl<'a> IntoIterator for &'a AssetCatalog {
    type Item = &'a AssetEntry;
    type IntoIter = btree_map::Values<'a, u32, AssetEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The item definition database of one (app, language) pair, plus the
/// schema-wide attribute, quality, and effect tables.
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    app_id: u32,
    language: String,
    items: BTreeMap<u32, ItemDef>,
    attributes: Vec<AttributeTemplate>,
    attribute_index: HashMap<u32, usize>,
    qualities: Vec<QualityDef>,
    quality_index: HashMap<u32, usize>,
    effects: HashMap<u32, String>,
}

impl SchemaStore {
    /// Create an empty schema for one (app, language) pair.
    pub fn new(app_id: u32, language: impl Into<String>) -> Self {
        Self { app_id, language: language.into(), ..Self::default() }
    }

    /// Register an item definition, replacing any previous definition with
    /// the same defindex.
    pub fn register_item(&mut self, def: ItemDef) {
        self.items.insert(def.defindex, def);
    }

    /// Register an attribute template. Templates keep their registration
    /// order; re-registering a defindex replaces the template in place.
    pub fn register_attribute(&mut self, template: AttributeTemplate) {
        match self.attribute_index.get(&template.defindex) {
            Some(&slot) => self.attributes[slot] = template,
            None => {
                self.attribute_index.insert(template.defindex, self.attributes.len());
                self.attributes.push(template);
            }
        }
    }

    /// Register a quality table row.
    pub fn register_quality(&mut self, quality: QualityDef) {
        match self.quality_index.get(&quality.id) {
            Some(&slot) => self.qualities[slot] = quality,
            None => {
                self.quality_index.insert(quality.id, self.qualities.len());
                self.qualities.push(quality);
            }
        }
    }

    /// Register a particle effect table row.
    pub fn register_effect(&mut self, effect: ParticleEffect) {
        self.effects.insert(effect.id, effect.name);
    }

    /// Check whether a definition index is in the schema.
    pub fn contains(&self, defindex: u32) -> bool {
        self.items.contains_key(&defindex)
    }

    /// Get an item definition by defindex.
    pub fn get(&self, defindex: u32) -> Option<&ItemDef> {
        self.items.get(&defindex)
    }

    /// Indexed access; absent keys fail loudly.
    pub fn item(&self, defindex: u32) -> Result<&ItemDef, StoreError> {
        self.get(defindex).ok_or(StoreError::ItemDefinitionNotFound { defindex })
    }

    /// Every attribute template the schema defines, in registration order.
    pub fn attributes(&self) -> &[AttributeTemplate] {
        &self.attributes
    }

    /// Get an attribute template by defindex.
    pub fn get_attribute(&self, defindex: u32) -> Option<&AttributeTemplate> {
        self.attribute_index.get(&defindex).map(|&slot| &self.attributes[slot])
    }

    /// Attribute template lookup for a value that claims one exists; absence
    /// is an error, never a silent skip.
    pub fn attribute(&self, defindex: u32) -> Result<&AttributeTemplate, StoreError> {
        self.get_attribute(defindex).ok_or(StoreError::AttributeTemplateNotFound { defindex })
    }

    /// Get a qualities table row by quality id.
    pub fn quality(&self, id: u32) -> Option<&QualityDef> {
        self.quality_index.get(&id).map(|&slot| &self.qualities[slot])
    }

    /// Canonical lowercase quality key for an id, falling back to
    /// [`FALLBACK_QUALITY`] for ids the table does not know.
    pub fn quality_name(&self, id: u32) -> &str {
        self.quality(id).map_or(FALLBACK_QUALITY, |q| q.name.as_str())
    }

    /// Localized quality label for an id, if the table knows it.
    pub fn quality_label(&self, id: u32) -> Option<&str> {
        self.quality(id).map(|q| q.label.as_str())
    }

    /// Localized particle effect name for an effect id.
    pub fn effect_name(&self, id: u32) -> Option<&str> {
        self.effects.get(&id).map(String::as_str)
    }

    /// Number of item definitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item definitions in ascending defindex order.
    pub fn iter(&self) -> btree_map::Values<'_, u32, ItemDef> {
        self.items.values()
    }

    pub fn app_id(&self) -> u32 {
        self.app_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl<'a> IntoIterator for &'a SchemaStore {
    type Item = &'a ItemDef;
    type IntoIter = btree_map::Values<'a, u32, ItemDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(defindex: u32, tags: &[&str]) -> AssetEntry {
        serde_json::from_value(serde_json::json!({
            "defindex": defindex,
            "prices": {"USD": 249},
            "tags": tags,
        }))
        .unwrap()
    }

    fn slouch_def() -> ItemDef {
        serde_json::from_value(serde_json::json!({
            "defindex": 344,
            "item_name": "Crocleather Slouch",
            "proper_name": false,
            "item_quality": 6,
            "tags": ["cosmetic"],
        }))
        .unwrap()
    }

    fn damage_template() -> AttributeTemplate {
        serde_json::from_value(serde_json::json!({
            "defindex": 2,
            "name": "damage bonus",
            "description_string": "+%s1% damage bonus",
            "description_format": "value_is_percentage",
        }))
        .unwrap()
    }

    // ========== AssetCatalog ==========

    #[test]
    fn test_catalog_contains_and_get() {
        let catalog =
            AssetCatalog::from_entries(440, "en_US", vec![entry(344, &["cosmetic"])]);
        assert!(catalog.contains(344));
        assert!(!catalog.contains(1));
        assert_eq!(catalog.get(344).unwrap().defindex, 344);
        assert!(catalog.get(1).is_none());
    }

    #[test]
    fn test_catalog_indexed_access_fails_loudly() {
        let catalog = AssetCatalog::new(440, "en_US");
        let err = catalog.entry(344).unwrap_err();
        assert_eq!(err, StoreError::ItemDefinitionNotFound { defindex: 344 });
    }

    #[test]
    fn test_catalog_tag_union() {
        let catalog = AssetCatalog::from_entries(
            440,
            "en_US",
            vec![entry(344, &["cosmetic", "halloween"]), entry(345, &["cosmetic"])],
        );
        let tags: Vec<&str> = catalog.tags().iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["cosmetic", "halloween"]);
    }

    #[test]
    fn test_catalog_without_taxonomy_has_no_tags() {
        let catalog = AssetCatalog::from_entries(570, "en_US", vec![entry(4097, &[])]);
        assert_eq!(catalog.tags().len(), 0);
    }

    #[test]
    fn test_catalog_register_replaces() {
        let mut catalog = AssetCatalog::new(440, "en_US");
        catalog.register(entry(344, &[]));
        let mut updated = entry(344, &[]);
        updated.prices.insert("EUR".into(), 199);
        catalog.register(updated);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(344).unwrap().price("EUR"), Some(199));
    }

    #[test]
    fn test_catalog_iteration_order() {
        let catalog = AssetCatalog::from_entries(
            440,
            "en_US",
            vec![entry(400, &[]), entry(5, &[]), entry(344, &[])],
        );
        let order: Vec<u32> = catalog.iter().map(|e| e.defindex).collect();
        assert_eq!(order, vec![5, 344, 400]);
    }

    // ========== SchemaStore ==========

    #[test]
    fn test_schema_item_lookup() {
        let mut schema = SchemaStore::new(440, "en_US");
        schema.register_item(slouch_def());
        assert!(schema.contains(344));
        assert_eq!(schema.item(344).unwrap().item_name, "Crocleather Slouch");
        assert_eq!(
            schema.item(1).unwrap_err(),
            StoreError::ItemDefinitionNotFound { defindex: 1 }
        );
    }

    #[test]
    fn test_schema_attribute_order_preserved() {
        let mut schema = SchemaStore::new(440, "en_US");
        schema.register_attribute(damage_template());
        schema.register_attribute(
            serde_json::from_value(serde_json::json!({
                "defindex": 229,
                "name": "unique craft index",
                "hidden": true,
            }))
            .unwrap(),
        );
        let names: Vec<&str> = schema.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["damage bonus", "unique craft index"]);
    }

    #[test]
    fn test_schema_attribute_replace_keeps_slot() {
        let mut schema = SchemaStore::new(440, "en_US");
        schema.register_attribute(damage_template());
        schema.register_attribute(
            serde_json::from_value(serde_json::json!({"defindex": 229, "name": "craft"})).unwrap(),
        );
        let mut renamed = damage_template();
        renamed.name = "renamed".into();
        schema.register_attribute(renamed);
        assert_eq!(schema.attributes().len(), 2);
        assert_eq!(schema.attributes()[0].name, "renamed");
        assert_eq!(schema.attribute(2).unwrap().name, "renamed");
    }

    #[test]
    fn test_schema_missing_template_is_loud() {
        let schema = SchemaStore::new(440, "en_US");
        assert_eq!(
            schema.attribute(9999).unwrap_err(),
            StoreError::AttributeTemplateNotFound { defindex: 9999 }
        );
    }

    #[test]
    fn test_schema_quality_table() {
        let mut schema = SchemaStore::new(440, "en_US");
        schema.register_quality(
            serde_json::from_value(
                serde_json::json!({"id": 11, "name": "strange", "label": "Strange"}),
            )
            .unwrap(),
        );
        assert_eq!(schema.quality_name(11), "strange");
        assert_eq!(schema.quality_label(11), Some("Strange"));
        assert_eq!(schema.quality_name(99), FALLBACK_QUALITY);
        assert_eq!(schema.quality_label(99), None);
    }

    #[test]
    fn test_schema_effect_table() {
        let mut schema = SchemaStore::new(440, "en_US");
        schema.register_effect(
            serde_json::from_value(serde_json::json!({"id": 13, "name": "Burning Flames"}))
                .unwrap(),
        );
        assert_eq!(schema.effect_name(13), Some("Burning Flames"));
        assert_eq!(schema.effect_name(14), None);
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::CatalogUnavailable { app_id: 999, language: "en_US".into() };
        assert_eq!(err.to_string(), "no catalog for app 999 in language 'en_US'");
    }
}
