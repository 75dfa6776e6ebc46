//! Reference ("sim") inventory models.
//!
//! The reference source formats items for human display, independently of the
//! schema pipeline. It is consumed only by the cross-validator; nothing in
//! normal operation depends on it.

use serde::{Deserialize, Serialize};

/// One account's inventory as served by the reference source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceInventory {
    pub account_id64: u64,
    pub app_id: u32,
    /// Reference-source context id (economy items live in context 2)
    pub context_id: u32,
    #[serde(default)]
    pub items: Vec<ReferenceItem>,
}

/// One item as the reference source displays it.
///
/// `full_name` is already fully composed: quality prefixes are baked in,
/// crate-series suffixes are appended, and custom names arrive wrapped in the
/// reference source's own quote characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceItem {
    /// Instance id, matching the catalog-side instance id
    pub id: u64,
    /// Composed display name
    pub full_name: String,
    /// Display lines in reference order; real attribute lines and unrelated
    /// flavor text are interleaved
    #[serde(default)]
    pub descriptions: Vec<DescriptionLine>,
}

impl ReferenceItem {
    /// The display lines in reference order.
    pub fn descriptions(&self) -> impl Iterator<Item = &DescriptionLine> {
        self.descriptions.iter()
    }
}

impl<'a> IntoIterator for &'a ReferenceItem {
    type Item = &'a DescriptionLine;
    type IntoIter = std::slice::Iter<'a, DescriptionLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptions.iter()
    }
}

/// One display line under a reference item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DescriptionLine {
    /// The text as displayed
    pub value: String,
    /// Optional line category from the reference source
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<String>,
}
