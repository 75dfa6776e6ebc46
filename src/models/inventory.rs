//! Raw inventory record models.

use serde::{Deserialize, Serialize};

use super::core::AttrValue;

/// Inventory fetch went through and the backpack is readable.
pub const STATUS_OK: u32 = 1;
/// The account id does not exist.
pub const STATUS_BAD_ID: u32 = 8;
/// The backpack is private.
pub const STATUS_PRIVATE: u32 = 15;
/// The account has no game profile.
pub const STATUS_NO_PROFILE: u32 = 18;

/// Equip entry class id meaning "no class", paired with
/// [`UNEQUIPPED_SLOT`] on placeholder entries.
pub const UNEQUIPPED_CLASS: u32 = 0;
/// Equip entry slot id meaning "not equipped".
pub const UNEQUIPPED_SLOT: u32 = 65535;

/// Bit set on the placement token when the item has never been positioned.
const UNPLACED_BIT: u32 = 1 << 31;

/// One account's raw inventory snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryRecord {
    /// Owning account id (64-bit community id)
    pub account_id64: u64,
    /// Application the inventory belongs to
    pub app_id: u32,
    /// Upstream status code; anything but [`STATUS_OK`] means no data
    #[serde(default = "default_status")]
    pub status: u32,
    /// Backpack cell capacity
    #[serde(default)]
    pub num_backpack_slots: u32,
    /// Raw item records
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

fn default_status() -> u32 {
    STATUS_OK
}

/// One raw item instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRecord {
    /// Unique instance id
    pub id: u64,
    /// Instance id at first creation, before trades/renames
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub original_id: Option<u64>,
    /// Item definition index into the schema
    pub defindex: u32,
    /// Item level
    #[serde(default)]
    pub level: u32,
    /// Quality id into the schema qualities table
    #[serde(default)]
    pub quality: u32,
    /// Packed placement token; see [`ItemRecord::position`]
    #[serde(default)]
    pub inventory: u32,
    /// Stack size
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Origin code (found, crafted, traded, ...)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub origin: Option<u32>,
    #[serde(default)]
    pub flag_cannot_trade: bool,
    #[serde(default)]
    pub flag_cannot_craft: bool,
    /// User-chosen rename, verbatim including any quote characters
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub custom_name: Option<String>,
    /// User-chosen description
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub custom_desc: Option<String>,
    /// Per-instance attribute values
    #[serde(default)]
    pub attributes: Vec<RawAttributeValue>,
    /// Loadout entries, may contain unequipped placeholder pairs
    #[serde(default)]
    pub equipped: Vec<EquipEntry>,
    /// Selected style index
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub style: Option<u32>,
}

fn default_quantity() -> u32 {
    1
}

impl ItemRecord {
    /// 1-based backpack cell, unpacked from the low 16 bits of the placement
    /// token. 0 means the item has never been placed (fresh drops carry the
    /// unplaced bit instead of a cell).
    pub fn position(&self) -> u32 {
        if self.inventory & UNPLACED_BIT != 0 {
            0
        } else {
            self.inventory & 0xFFFF
        }
    }
}

/// An attribute value attached to one item instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawAttributeValue {
    /// Attribute template defindex
    pub defindex: u32,
    /// Raw wire value
    #[serde(default)]
    pub value: AttrValue,
    /// Float view of the value, authoritative when present
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub float_value: Option<f64>,
}

impl RawAttributeValue {
    /// The numeric value to substitute into templates, preferring the float
    /// view over the packed integer.
    pub fn numeric(&self) -> Option<f64> {
        self.float_value.or_else(|| self.value.as_f64())
    }
}

/// One loadout entry: which class has the item in which slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EquipEntry {
    pub class: u32,
    pub slot: u32,
}

impl EquipEntry {
    /// Whether this is a placeholder pair rather than a real loadout entry.
    pub fn is_placeholder(&self) -> bool {
        self.class == UNEQUIPPED_CLASS || self.slot == UNEQUIPPED_SLOT
    }
}
