//! Sources of raw records
//!
//! `ItemSource` is the single seam between the modeling core and wherever
//! records actually come from. Consumers depend on the trait; the concrete
//! transport lives behind it. `FixtureSource` is the directory-backed
//! implementation used by offline checks and the integration suite.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::item::{Inventory, InventoryError};
use crate::models::{EconRecord, InventoryRecord, ReferenceInventory, ReferenceItem};
use crate::models::STATUS_NO_PROFILE;
use crate::parser::{self, ParseError};
use crate::stores::{AssetCatalog, SchemaStore, StoreError};

/// Language assumed when a caller passes none.
pub const DEFAULT_LANGUAGE: &str = "en_US";

/// Any failure while fetching or decoding records from a source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("malformed record file: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Contract every record source implements.
///
/// All methods are synchronous and side-effect-free from the caller's point
/// of view. `inventory` takes an already-fetched schema so one schema fetch
/// serves any number of accounts.
pub trait ItemSource {
    /// The priced asset catalog for one (app, language) pair.
    fn assets(&self, app_id: u32, language: &str) -> Result<AssetCatalog, SourceError>;

    /// The item schema for one (app, language) pair.
    fn schema(&self, app_id: u32, language: &str) -> Result<SchemaStore, SourceError>;

    /// One account's inventory, modeled against the given schema.
    fn inventory(
        &self,
        account_id64: u64,
        app_id: u32,
        schema: &SchemaStore,
    ) -> Result<Inventory, SourceError>;

    /// The reference source's independent rendering of the same inventory,
    /// at most `count` items.
    fn sim_inventory(
        &self,
        account_id64: u64,
        app_id: u32,
        context_id: u32,
        language: Option<&str>,
        count: usize,
    ) -> Result<Vec<ReferenceItem>, SourceError>;
}

/// Directory-backed source.
///
/// Layout under the root, one directory per (app, language) pair:
///
/// ```text
/// <root>/<app>_<language>/assets.jsonl
/// <root>/<app>_<language>/schema.jsonl
/// <root>/<app>_<language>/inventory_<id64>.json
/// <root>/<app>_<language>/community_<id64>_<context>.json
/// ```
#[derive(Debug, Clone)]
pub struct FixtureSource {
    root: PathBuf,
    strict: bool,
}

impl FixtureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), strict: false }
    }

    /// Promote recoverable parse warnings to hard errors.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    fn app_dir(&self, app_id: u32, language: &str) -> PathBuf {
        self.root.join(format!("{app_id}_{language}"))
    }

    fn read_records(&self, path: &Path) -> Result<Vec<EconRecord>, SourceError> {
        let file = File::open(path)?;
        let result = parser::parse_stream(BufReader::new(file));
        if self.strict {
            if let Some(warning) = result.warnings.first() {
                return Err(ParseError {
                    message: warning.message.clone(),
                    line: warning.line,
                }
                .into());
            }
        }
        Ok(result.records)
    }
}

impl ItemSource for FixtureSource {
    fn assets(&self, app_id: u32, language: &str) -> Result<AssetCatalog, SourceError> {
        let path = self.app_dir(app_id, language).join("assets.jsonl");
        if !path.is_file() {
            return Err(StoreError::CatalogUnavailable {
                app_id,
                language: language.to_string(),
            }
            .into());
        }
        let mut catalog = AssetCatalog::new(app_id, language);
        for record in self.read_records(&path)? {
            if let EconRecord::Asset(entry) = record {
                catalog.register(entry);
            }
        }
        Ok(catalog)
    }

    fn schema(&self, app_id: u32, language: &str) -> Result<SchemaStore, SourceError> {
        let path = self.app_dir(app_id, language).join("schema.jsonl");
        if !path.is_file() {
            return Err(StoreError::CatalogUnavailable {
                app_id,
                language: language.to_string(),
            }
            .into());
        }
        let mut schema = SchemaStore::new(app_id, language);
        for record in self.read_records(&path)? {
            match record {
                EconRecord::ItemDef(def) => schema.register_item(def),
                EconRecord::Attribute(attr) => schema.register_attribute(attr),
                EconRecord::Quality(quality) => schema.register_quality(quality),
                EconRecord::Effect(effect) => schema.register_effect(effect),
                _ => {}
            }
        }
        Ok(schema)
    }

    fn inventory(
        &self,
        account_id64: u64,
        app_id: u32,
        schema: &SchemaStore,
    ) -> Result<Inventory, SourceError> {
        let path = self
            .app_dir(app_id, schema.language())
            .join(format!("inventory_{account_id64}.json"));
        if !path.is_file() {
            return Err(InventoryError::Unavailable { status: STATUS_NO_PROFILE }.into());
        }
        let file = File::open(path)?;
        let record: InventoryRecord = serde_json::from_reader(BufReader::new(file))?;
        Ok(Inventory::from_record(&record, schema)?)
    }

    fn sim_inventory(
        &self,
        account_id64: u64,
        app_id: u32,
        context_id: u32,
        language: Option<&str>,
        count: usize,
    ) -> Result<Vec<ReferenceItem>, SourceError> {
        let language = language.unwrap_or(DEFAULT_LANGUAGE);
        let path = self
            .app_dir(app_id, language)
            .join(format!("community_{account_id64}_{context_id}.json"));
        if !path.is_file() {
            return Err(InventoryError::Unavailable { status: STATUS_NO_PROFILE }.into());
        }
        let file = File::open(path)?;
        let record: ReferenceInventory = serde_json::from_reader(BufReader::new(file))?;
        let mut items = record.items;
        items.truncate(count);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture_root() -> TempDir {
        let dir = TempDir::new().unwrap();
        let app = dir.path().join("440_en_US");
        fs::create_dir_all(&app).unwrap();
        fs::write(
            app.join("assets.jsonl"),
            concat!(
                r#"{"type": "asset", "defindex": 200, "prices": {"USD": 249}, "tags": ["hat"]}"#,
                "\n",
                r#"{"type": "quality", "id": 6, "name": "unique", "label": "Unique"}"#,
                "\n",
            ),
        )
        .unwrap();
        fs::write(
            app.join("schema.jsonl"),
            concat!(
                r#"{"type": "item_def", "defindex": 200, "item_name": "Nice Hat", "item_quality": 6}"#,
                "\n",
                r#"{"type": "attribute", "defindex": 2, "name": "damage bonus", "description_string": "+%s1% damage bonus", "description_format": "value_is_percentage"}"#,
                "\n",
                r#"{"type": "quality", "id": 6, "name": "unique", "label": "Unique"}"#,
                "\n",
                r#"{"type": "effect", "id": 13, "name": "Burning Flames"}"#,
                "\n",
            ),
        )
        .unwrap();
        fs::write(
            app.join("inventory_76561198811195748.json"),
            r#"{"account_id64": 76561198811195748, "app_id": 440, "num_backpack_slots": 100,
                "items": [{"id": 1, "defindex": 200, "quality": 6, "inventory": 3}]}"#,
        )
        .unwrap();
        fs::write(
            app.join("community_76561198811195748_2.json"),
            r#"{"account_id64": 76561198811195748, "app_id": 440, "context_id": 2,
                "items": [{"id": 1, "full_name": "Nice Hat"},
                          {"id": 2, "full_name": "Pistol"}]}"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_assets_keeps_only_asset_records() {
        let root = fixture_root();
        let source = FixtureSource::new(root.path());
        let catalog = source.assets(440, "en_US").unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains(200));
    }

    #[test]
    fn test_missing_catalog_dir_is_unavailable() {
        let root = fixture_root();
        let source = FixtureSource::new(root.path());
        let err = source.assets(570, "en_US").unwrap_err();
        assert!(matches!(
            err,
            SourceError::Store(StoreError::CatalogUnavailable { app_id: 570, .. })
        ));
    }

    #[test]
    fn test_schema_registers_all_record_kinds() {
        let root = fixture_root();
        let source = FixtureSource::new(root.path());
        let schema = source.schema(440, "en_US").unwrap();
        assert!(schema.contains(200));
        assert!(schema.get_attribute(2).is_some());
        assert_eq!(schema.quality_name(6), "unique");
        assert_eq!(schema.effect_name(13), Some("Burning Flames"));
    }

    #[test]
    fn test_inventory_roundtrip() {
        let root = fixture_root();
        let source = FixtureSource::new(root.path());
        let schema = source.schema(440, "en_US").unwrap();
        let inventory = source.inventory(76561198811195748, 440, &schema).unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.iter().next().unwrap().full_name, "Nice Hat");
    }

    #[test]
    fn test_missing_inventory_file_is_unavailable() {
        let root = fixture_root();
        let source = FixtureSource::new(root.path());
        let schema = source.schema(440, "en_US").unwrap();
        let err = source.inventory(1, 440, &schema).unwrap_err();
        assert!(matches!(
            err,
            SourceError::Inventory(InventoryError::Unavailable { status: STATUS_NO_PROFILE })
        ));
    }

    #[test]
    fn test_sim_inventory_defaults_language_and_truncates() {
        let root = fixture_root();
        let source = FixtureSource::new(root.path());
        let all = source.sim_inventory(76561198811195748, 440, 2, None, 2000).unwrap();
        assert_eq!(all.len(), 2);
        let capped = source.sim_inventory(76561198811195748, 440, 2, Some("en_US"), 1).unwrap();
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].full_name, "Nice Hat");
    }

    #[test]
    fn test_strict_mode_promotes_warnings() {
        let root = fixture_root();
        let app = root.path().join("440_en_US");
        fs::write(
            app.join("assets.jsonl"),
            concat!(
                r#"{"type": "asset", "defindex": 200}"#,
                "\n",
                r#"{"type": "asset", "defindex": }"#,
                "\n",
            ),
        )
        .unwrap();
        let lenient = FixtureSource::new(root.path());
        assert_eq!(lenient.assets(440, "en_US").unwrap().len(), 1);
        let strict = FixtureSource::new(root.path()).strict();
        assert!(matches!(strict.assets(440, "en_US").unwrap_err(), SourceError::Parse(_)));
    }
}
