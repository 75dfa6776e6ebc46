//! Asset catalog entry model.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::core::Tagged;

/// Market metadata for one item definition.
///
/// Entries come from the price catalog, so the only guaranteed content is the
/// definition index and a price map; tags are present only for applications
/// that define a tag taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetEntry {
    /// Item definition index this entry describes
    pub defindex: u32,
    /// Currency code to price in minor units (e.g. "USD" -> 249 for $2.49)
    #[serde(default)]
    pub prices: HashMap<String, u64>,
    /// Tag taxonomy entries, empty when the application defines none
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

impl AssetEntry {
    /// Price in the given currency, if listed.
    pub fn price(&self, currency: &str) -> Option<u64> {
        self.prices.get(currency).copied()
    }
}

impl Tagged for AssetEntry {
    fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
}
