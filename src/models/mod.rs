//! Data models for Armory records (assets, schema rows, inventories).

mod asset;
mod core;
mod inventory;
mod object;
mod reference;
mod schema;

// Re-export all public types
pub use asset::AssetEntry;
pub use self::core::{AttrValue, Tagged, ValueType};
pub use inventory::{
    EquipEntry, InventoryRecord, ItemRecord, RawAttributeValue, STATUS_BAD_ID, STATUS_NO_PROFILE,
    STATUS_OK, STATUS_PRIVATE, UNEQUIPPED_CLASS, UNEQUIPPED_SLOT,
};
pub use object::{EconRecord, Warning};
pub use reference::{DescriptionLine, ReferenceInventory, ReferenceItem};
pub use schema::{
    AttributeTemplate, ItemDef, ParticleEffect, QualityDef, StaticAttribute, VALUE_PLACEHOLDER,
};
