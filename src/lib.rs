//! Armory - item schema and inventory modeling with reference cross-validation
//!
//! This library provides functionality to:
//! - Parse JSONL streams of catalog, schema, and inventory records
//! - Model items against their schema (names, qualities, resolved attributes)
//! - Cross-check a modeled inventory against an independent reference listing
//! - Memoize per-(app, language) stores behind an injectable source seam

pub mod cache;
pub mod config;
pub mod item;
pub mod models;
pub mod parser;
pub mod provider;
pub mod resolve;
pub mod stores;
pub mod validate;
