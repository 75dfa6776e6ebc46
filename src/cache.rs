//! Process-lifetime store memoization

use std::collections::HashMap;
use std::sync::Arc;

use crate::provider::{ItemSource, SourceError};
use crate::stores::{AssetCatalog, SchemaStore};

/// Memoizes catalogs and schemas per (app, language) pair.
///
/// Upstream catalog data is treated as slow-changing over one process run,
/// so entries live as long as the cache and there is no eviction or
/// invalidation. First populate wins: once a key is stored, later requests
/// return the stored value and never touch the source again. Failed loads
/// are not stored, so a transient source failure does not poison the key.
///
/// Values come back as `Arc`s; callers keep their store alive independently
/// of the cache.
#[derive(Debug, Default)]
pub struct StoreCache {
    catalogs: HashMap<(u32, String), Arc<AssetCatalog>>,
    schemas: HashMap<(u32, String), Arc<SchemaStore>>,
}

impl StoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog for (app, language), fetched through `source` on first
    /// request.
    pub fn assets(
        &mut self,
        source: &dyn ItemSource,
        app_id: u32,
        language: &str,
    ) -> Result<Arc<AssetCatalog>, SourceError> {
        let key = (app_id, language.to_string());
        if let Some(catalog) = self.catalogs.get(&key) {
            return Ok(Arc::clone(catalog));
        }
        let catalog = Arc::new(source.assets(app_id, language)?);
        self.catalogs.insert(key, Arc::clone(&catalog));
        Ok(catalog)
    }

    /// The schema for (app, language), fetched through `source` on first
    /// request.
    pub fn schema(
        &mut self,
        source: &dyn ItemSource,
        app_id: u32,
        language: &str,
    ) -> Result<Arc<SchemaStore>, SourceError> {
        let key = (app_id, language.to_string());
        if let Some(schema) = self.schemas.get(&key) {
            return Ok(Arc::clone(schema));
        }
        let schema = Arc::new(source.schema(app_id, language)?);
        self.schemas.insert(key, Arc::clone(&schema));
        Ok(schema)
    }

    /// Number of (app, language) pairs with a stored catalog.
    pub fn catalog_count(&self) -> usize {
        self.catalogs.len()
    }

    /// Number of (app, language) pairs with a stored schema.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty() && self.schemas.is_empty()
    }
}
