//! Item instances and per-account inventories
//!
//! [`ItemModel`] is the normalized view of one raw item record: schema lookup
//! done, attributes resolved, display name composed, placement unpacked, and
//! placeholder loadout entries filtered out. [`Inventory`] owns the item
//! models for one account and carries the backpack capacity.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{
    InventoryRecord, ItemDef, ItemRecord, RawAttributeValue, STATUS_BAD_ID, STATUS_NO_PROFILE,
    STATUS_OK, STATUS_PRIVATE,
};
use crate::resolve::{AttributeResolver, ResolvedAttribute};
use crate::stores::{SchemaStore, StoreError};

/// Template name of the attribute carrying an item's craft number. Items that
/// have it get a " #<n>" suffix on their display name.
pub const CRAFT_INDEX_ATTRIBUTE: &str = "unique craft index";

/// Error when an inventory snapshot cannot be turned into item models.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    /// The upstream snapshot carries a non-ok status and no usable data
    #[error("inventory unavailable: {} (status {})", status_reason(.status), .status)]
    Unavailable { status: u32 },
    /// Schema lookup failed while building an item model
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn status_reason(status: &u32) -> &'static str {
    match *status {
        STATUS_BAD_ID => "no such account",
        STATUS_PRIVATE => "backpack is private",
        STATUS_NO_PROFILE => "account has no game profile",
        _ => "upstream reported failure",
    }
}

/// An item's quality tier: numeric id plus the canonical lowercase key from
/// the schema qualities table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quality {
    pub id: u32,
    pub name: String,
}

/// One concrete inventory item, fully normalized.
///
/// Built once per raw record at inventory-build time and immutable after
/// that. The schema is only borrowed during construction; the model owns
/// everything it exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemModel {
    /// Unique instance id
    pub id: u64,
    /// Instance id at first creation
    pub original_id: Option<u64>,
    /// Item definition index into the schema
    pub defindex: u32,
    pub level: u32,
    /// 1-based backpack cell, 0 for never-placed items
    pub position: u32,
    pub quantity: u32,
    pub origin: Option<u32>,
    pub cannot_trade: bool,
    pub cannot_craft: bool,
    pub quality: Quality,
    /// User-chosen rename, verbatim including any quote characters the user
    /// picked; takes precedence over `full_name` wherever a single display
    /// name is wanted
    pub custom_name: Option<String>,
    pub custom_description: Option<String>,
    /// Composed display name: quality prefix, base name, craft suffix
    pub full_name: String,
    /// class id -> slot id; placeholder pairs are dropped during
    /// construction, so neither the no-class key nor the unequipped slot
    /// value can appear here
    pub equipped: BTreeMap<u32, u32>,
    /// Resolved attributes: schema-attached values first, then per-instance
    /// values, with instance values replacing static ones per defindex
    pub attributes: Vec<ResolvedAttribute>,
    pub style: Option<u32>,
}

impl ItemModel {
    /// Normalize one raw item record against a schema.
    ///
    /// Fails loudly when the record's defindex is not in the schema or when
    /// any of its attribute values lacks a template.
    pub fn from_record(record: &ItemRecord, schema: &SchemaStore) -> Result<Self, StoreError> {
        let def = schema.item(record.defindex)?;
        let resolver = AttributeResolver::new(schema);

        let mut attributes = Vec::new();
        for raw in merge_attributes(def, record) {
            attributes.push(resolver.resolve(&raw)?);
        }

        let quality =
            Quality { id: record.quality, name: schema.quality_name(record.quality).to_string() };
        let full_name = compose_full_name(
            def,
            &quality,
            schema.quality_label(record.quality),
            craft_number(&attributes),
        );

        let equipped = record
            .equipped
            .iter()
            .filter(|e| !e.is_placeholder())
            .map(|e| (e.class, e.slot))
            .collect();

        Ok(Self {
            id: record.id,
            original_id: record.original_id,
            defindex: record.defindex,
            level: record.level,
            position: record.position(),
            quantity: record.quantity,
            origin: record.origin,
            cannot_trade: record.flag_cannot_trade,
            cannot_craft: record.flag_cannot_craft,
            quality,
            custom_name: record.custom_name.clone(),
            custom_description: record.custom_desc.clone(),
            full_name,
            equipped,
            attributes,
            style: record.style,
        })
    }

    /// The single display name: the custom name when the owner set one,
    /// otherwise the composed full name.
    pub fn name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.full_name)
    }

    /// Resolved attributes in merge order.
    pub fn attributes(&self) -> impl Iterator<Item = &ResolvedAttribute> {
        self.attributes.iter()
    }
}

impl<'a> IntoIterator for &'a ItemModel {
    type Item = &'a ResolvedAttribute;
    type IntoIter = std::slice::Iter<'a, ResolvedAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

/// Schema-attached values first, then instance values; an instance value for
/// an already-present defindex replaces the static one in place.
fn merge_attributes(def: &ItemDef, record: &ItemRecord) -> Vec<RawAttributeValue> {
    let mut merged: Vec<RawAttributeValue> = def
        .attributes
        .iter()
        .map(|a| RawAttributeValue {
            defindex: a.defindex,
            value: a.value.clone(),
            float_value: None,
        })
        .collect();

    for raw in &record.attributes {
        match merged.iter_mut().find(|m| m.defindex == raw.defindex) {
            Some(slot) => *slot = raw.clone(),
            None => merged.push(raw.clone()),
        }
    }

    merged
}

fn craft_number(attributes: &[ResolvedAttribute]) -> Option<u32> {
    attributes
        .iter()
        .find(|a| a.name == CRAFT_INDEX_ATTRIBUTE)
        .and_then(|a| a.value.as_f64())
        .map(|v| v as u32)
        .filter(|&n| n > 0)
}

/// Quality prefix, base name, craft suffix. Crate-series suffixes are never
/// appended here; only the reference source does that.
fn compose_full_name(
    def: &ItemDef,
    quality: &Quality,
    quality_label: Option<&str>,
    craft: Option<u32>,
) -> String {
    let mut name = String::new();
    match quality.name.as_str() {
        "normal" => {}
        "unique" => {
            if def.proper_name {
                name.push_str("The ");
            }
        }
        _ => {
            if let Some(label) = quality_label {
                name.push_str(label);
                name.push(' ');
            }
        }
    }
    name.push_str(&def.item_name);
    if let Some(n) = craft {
        name.push_str(&format!(" #{n}"));
    }
    name
}

/// One account's normalized inventory: an ordered collection of item models
/// plus the backpack capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    account_id64: u64,
    app_id: u32,
    cells_total: u32,
    items: Vec<ItemModel>,
}

impl Inventory {
    /// Build an inventory from a raw snapshot.
    ///
    /// A snapshot whose status is not ok fails with
    /// [`InventoryError::Unavailable`]; schema lookup failures for individual
    /// items propagate as [`InventoryError::Store`].
    pub fn from_record(record: &InventoryRecord, schema: &SchemaStore) -> Result<Self, InventoryError> {
        if record.status != STATUS_OK {
            return Err(InventoryError::Unavailable { status: record.status });
        }

        let items = record
            .items
            .iter()
            .map(|r| ItemModel::from_record(r, schema))
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(Self {
            account_id64: record.account_id64,
            app_id: record.app_id,
            cells_total: record.num_backpack_slots,
            items,
        })
    }

    pub fn account_id64(&self) -> u64 {
        self.account_id64
    }

    pub fn app_id(&self) -> u32 {
        self.app_id
    }

    /// Backpack cell capacity.
    pub fn cells_total(&self) -> u32 {
        self.cells_total
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in snapshot order.
    pub fn iter(&self) -> std::slice::Iter<'_, ItemModel> {
        self.items.iter()
    }

    /// Find an item by instance id.
    pub fn get(&self, id: u64) -> Option<&ItemModel> {
        self.items.iter().find(|i| i.id == id)
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a ItemModel;
    type IntoIter = std::slice::Iter<'a, ItemModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
