//! Criterion benchmarks for armory critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Parser: JSONL record-stream parsing
//! - Validator: template pattern compilation
//! - Validator: name normalization and cross-checking
//! - Resolver: attribute resolution and item modeling

use armory::item::Inventory;
use armory::models::{InventoryRecord, RawAttributeValue, ReferenceItem};
use armory::parser::{parse_line, parse_stream};
use armory::resolve::AttributeResolver;
use armory::stores::SchemaStore;
use armory::validate::{normalize_and_match, ReferenceValidator};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use std::io::Cursor;

// =============================================================================
// Test Data Generators
// =============================================================================

const DEF_COUNT: u32 = 64;

/// Build a schema with `attr_count` templates and [`DEF_COUNT`] item defs
fn make_schema(attr_count: u32) -> SchemaStore {
    let mut schema = SchemaStore::new(440, "en_US");
    schema.register_quality(
        serde_json::from_value(json!({"id": 6, "name": "unique", "label": "Unique"})).unwrap(),
    );
    for i in 0..attr_count {
        schema.register_attribute(
            serde_json::from_value(json!({
                "defindex": i,
                "name": format!("attribute {i}"),
                "description_string": format!("+%s1% bonus {i}"),
                "description_format": "value_is_percentage",
            }))
            .unwrap(),
        );
    }
    for d in 0..DEF_COUNT {
        schema.register_item(
            serde_json::from_value(json!({
                "defindex": d,
                "item_name": format!("Item {d}"),
                "item_quality": 6,
            }))
            .unwrap(),
        );
    }
    schema
}

/// Generate one attribute record line
fn make_attribute_json(defindex: u32) -> String {
    format!(
        r#"{{"type": "attribute", "defindex": {defindex}, "name": "attribute {defindex}", "description_string": "+%s1% bonus {defindex}", "description_format": "value_is_percentage"}}"#
    )
}

/// Generate JSONL content with `count` mixed records
fn make_jsonl_content(count: u32) -> String {
    (0..count)
        .map(|i| {
            if i % 3 == 0 {
                format!(
                    r#"{{"type": "item_def", "defindex": {i}, "item_name": "Item {i}", "item_quality": 6}}"#
                )
            } else {
                make_attribute_json(i)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build a raw inventory snapshot with `item_count` items, one attribute each
fn make_inventory_record(item_count: u32, attr_count: u32) -> InventoryRecord {
    let items: Vec<serde_json::Value> = (0..item_count)
        .map(|i| {
            json!({
                "id": i + 1,
                "defindex": i % DEF_COUNT,
                "level": 10,
                "quality": 6,
                "inventory": i + 1,
                "attributes": [
                    {"defindex": i % attr_count, "value": 0, "float_value": 1.25}
                ]
            })
        })
        .collect();
    serde_json::from_value(json!({
        "account_id64": 76561198811195748u64,
        "app_id": 440,
        "num_backpack_slots": item_count + 100,
        "items": items,
    }))
    .unwrap()
}

/// Build the matching reference listing, with one noise line per item
fn make_reference(item_count: u32, attr_count: u32) -> Vec<ReferenceItem> {
    (0..item_count)
        .map(|i| {
            serde_json::from_value(json!({
                "id": i + 1,
                "full_name": format!("Item {}", i % DEF_COUNT),
                "descriptions": [
                    {"value": format!("+25% bonus {}", i % attr_count)},
                    {"value": "Flavor text that matches nothing."}
                ]
            }))
            .unwrap()
        })
        .collect()
}

// =============================================================================
// Parser Benchmarks
// =============================================================================

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let attribute_line = make_attribute_json(42);
    group.bench_function("parse_line_attribute", |b| {
        b.iter(|| parse_line(black_box(&attribute_line), 1))
    });

    let item_line = r#"{"type": "item_def", "defindex": 344, "item_name": "Crocleather Slouch", "item_quality": 6, "tags": ["cosmetic"]}"#;
    group.bench_function("parse_line_item_def", |b| {
        b.iter(|| parse_line(black_box(item_line), 1))
    });

    for count in [100, 500, 2000].iter() {
        let content = make_jsonl_content(*count);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("parse_stream", count),
            &content,
            |b, content| {
                b.iter(|| {
                    let cursor = Cursor::new(black_box(content));
                    parse_stream(cursor)
                })
            },
        );
    }

    group.finish();
}

// =============================================================================
// Template Compilation Benchmarks
// =============================================================================

fn bench_template_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("templates");

    for attr_count in [50, 200, 1000].iter() {
        let schema = make_schema(*attr_count);
        group.throughput(Throughput::Elements(*attr_count as u64));
        group.bench_with_input(
            BenchmarkId::new("compile", attr_count),
            &schema,
            |b, schema| b.iter(|| ReferenceValidator::new(black_box(schema))),
        );
    }

    group.finish();
}

// =============================================================================
// Name Normalization Benchmarks
// =============================================================================

fn bench_name_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("names");

    let schema = make_schema(64);
    for item_count in [50, 200, 800].iter() {
        let record = make_inventory_record(*item_count, 64);
        let inventory = Inventory::from_record(&record, &schema).unwrap();
        let reference = make_reference(*item_count, 64);

        group.throughput(Throughput::Elements(*item_count as u64));
        group.bench_with_input(
            BenchmarkId::new("normalize_and_match", item_count),
            &(inventory, reference),
            |b, (inventory, reference)| {
                b.iter(|| normalize_and_match(black_box(inventory), black_box(reference)))
            },
        );
    }

    group.finish();
}

// =============================================================================
// Modeling and Cross-Check Benchmarks
// =============================================================================

fn bench_item_modeling(c: &mut Criterion) {
    let mut group = c.benchmark_group("modeling");

    let schema = make_schema(64);
    let resolver = AttributeResolver::new(&schema);
    let raw: RawAttributeValue =
        serde_json::from_value(json!({"defindex": 7, "value": 0, "float_value": 1.25})).unwrap();
    group.bench_function("resolve_attribute", |b| {
        b.iter(|| resolver.resolve(black_box(&raw)))
    });

    for item_count in [50, 200, 800].iter() {
        let record = make_inventory_record(*item_count, 64);
        group.throughput(Throughput::Elements(*item_count as u64));
        group.bench_with_input(
            BenchmarkId::new("build_inventory", item_count),
            &record,
            |b, record| b.iter(|| Inventory::from_record(black_box(record), black_box(&schema))),
        );
    }

    group.finish();
}

fn bench_cross_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_check");

    let schema = make_schema(256);
    let validator = ReferenceValidator::new(&schema);
    for item_count in [50, 200, 800].iter() {
        let record = make_inventory_record(*item_count, 256);
        let inventory = Inventory::from_record(&record, &schema).unwrap();
        let reference = make_reference(*item_count, 256);

        group.throughput(Throughput::Elements(*item_count as u64));
        group.bench_with_input(
            BenchmarkId::new("full", item_count),
            &(inventory, reference),
            |b, (inventory, reference)| {
                b.iter(|| validator.cross_check(black_box(inventory), black_box(reference)))
            },
        );
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_parser,
    bench_template_compilation,
    bench_name_normalization,
    bench_item_modeling,
    bench_cross_check
);

criterion_main!(benches);
