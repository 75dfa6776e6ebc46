//! Top-level record types for the interchange stream.

use serde::{Deserialize, Serialize};

use super::asset::AssetEntry;
use super::inventory::InventoryRecord;
use super::reference::ReferenceInventory;
use super::schema::{AttributeTemplate, ItemDef, ParticleEffect, QualityDef};

/// One record from an interchange stream - an asset entry, a schema row, an
/// inventory snapshot, or a reference inventory snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EconRecord {
    Asset(AssetEntry),
    ItemDef(ItemDef),
    Attribute(AttributeTemplate),
    Quality(QualityDef),
    Effect(ParticleEffect),
    Inventory(InventoryRecord),
    ReferenceInventory(ReferenceInventory),
}

/// A warning message from parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Warning {
    pub message: String,
    pub line: usize,
}
