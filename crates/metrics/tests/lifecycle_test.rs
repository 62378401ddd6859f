//! End-to-end accumulator lifecycle: create, record, reset, restore, remove
use gridmetrics::{
    Clock, EntityId, Error, ManualClock, MetricsConfig, MetricsRecord, MetricsRegistry, MetricsReporter,
};
use std::sync::Arc;

fn registry_at(now: i64) -> (Arc<ManualClock>, MetricsRegistry) {
    let clock = Arc::new(ManualClock::new(now));
    let config = MetricsConfig::builder()
        .with_initial_capacity(16)
        .with_shard_amount(4)
        .build()
        .unwrap();
    let registry = MetricsRegistry::with_config(config, clock.clone()).unwrap();
    (clock, registry)
}

#[test]
fn test_snapshot_copy_survives_later_mutation() {
    let (_, registry) = registry_at(1_000);
    let handle = registry.get_or_create("orders");
    handle.record_read(1_100);
    handle.record_write(1_200);

    let copy = handle.snapshot();
    let second_copy = copy;

    handle.record_read(1_300);
    handle.record_hit();
    handle.set_misses(77);

    assert_eq!(copy.reads(), 1);
    assert_eq!(copy.read_time(), 1_100);
    assert_eq!(copy.hits(), 0);
    assert_eq!(copy.misses(), 0);
    assert_eq!(second_copy, copy);
}

#[test]
fn test_created_active_reset_removed() {
    let (clock, registry) = registry_at(1_000);
    let id = EntityId::entry("orders", "42");

    // Created
    let handle = registry.get_or_create(id.clone());
    assert_eq!(handle.snapshot(), MetricsRecord::new(1_000));

    // Active
    clock.set(1_500);
    handle.record_read(clock.now_millis());
    handle.record_miss();
    assert_eq!(handle.reads(), 1);
    assert_eq!(handle.read_time(), 1_500);

    // Reset returns to active with fresh timestamps
    clock.set(2_000);
    registry.reset(&id).unwrap();
    assert_eq!(registry.snapshot(&id).unwrap(), MetricsRecord::new(2_000));
    handle.record_write(2_100);
    assert_eq!(registry.snapshot(&id).unwrap().writes(), 1);

    // Removed is terminal for this accumulator
    let last = registry.remove(&id).unwrap();
    assert_eq!(last.writes(), 1);
    assert!(matches!(registry.reset(&id), Err(Error::NotFound { .. })));

    // A new accumulator may reuse the id
    clock.set(3_000);
    let reborn = registry.get_or_create(id.clone());
    assert_eq!(reborn.snapshot(), MetricsRecord::new(3_000));
}

#[test]
fn test_unknown_entity_reports_no_metrics_yet() {
    let (_, registry) = registry_at(8_888);
    let record = registry.snapshot_or_zeroed(&EntityId::cache("never-seen"));

    assert_eq!(record.reads(), 0);
    assert_eq!(record.writes(), 0);
    assert_eq!(record.hits(), 0);
    assert_eq!(record.misses(), 0);
    assert_eq!(record.create_time(), 8_888);
    assert!(registry.is_empty());
}

#[test]
fn test_restore_from_server_payload() {
    let (_, registry) = registry_at(10_000);
    let payload =
        r#"{"createTime":100,"readTime":200,"writeTime":150,"reads":3,"writes":1,"hits":2,"misses":1}"#;

    let record = MetricsRecord::from_json(payload).unwrap();
    let handle = registry.restore(("orders", "42"), &record).unwrap();

    assert_eq!(handle.snapshot(), record);
    handle.record_read(10_001);
    handle.record_hit();

    let current = registry.snapshot(&EntityId::entry("orders", "42")).unwrap();
    assert_eq!(current.reads(), 4);
    assert_eq!(current.hits(), 3);
    assert_eq!(current.read_time(), 10_001);
    assert_eq!(current.create_time(), 100);
}

#[test]
fn test_restore_rejects_bad_payloads() {
    let (_, registry) = registry_at(10_000);

    let garbage = MetricsRecord::from_json(r#"{"createTime":"yesterday"}"#);
    assert!(matches!(garbage, Err(Error::Json { .. })));

    let inverted = MetricsRecord::from_json(
        r#"{"createTime":500,"readTime":200,"writeTime":600,"reads":0,"writes":0,"hits":0,"misses":0}"#,
    )
    .unwrap();
    assert!(matches!(
        registry.restore("orders", &inverted),
        Err(Error::InvalidState { .. })
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_cache_level_report_from_entries() {
    let (clock, registry) = registry_at(100);

    let a = registry.get_or_create(("orders", "a"));
    a.restore(
        &MetricsRecord::builder()
            .create_time(100)
            .read_time(200)
            .write_time(150)
            .reads(3)
            .writes(1)
            .hits(2)
            .misses(1)
            .build(),
    );
    clock.set(50);
    let b = registry.get_or_create(("orders", "b"));
    b.restore(
        &MetricsRecord::builder()
            .create_time(50)
            .read_time(180)
            .write_time(300)
            .reads(5)
            .misses(4)
            .build(),
    );

    let expected = MetricsRecord::builder()
        .create_time(50)
        .read_time(200)
        .write_time(300)
        .reads(8)
        .writes(1)
        .hits(2)
        .misses(5)
        .build();
    assert_eq!(registry.cache_metrics("orders"), expected);

    let listed: Vec<MetricsRecord> = registry
        .list()
        .into_iter()
        .map(|(_, handle)| handle.snapshot())
        .collect();
    assert_eq!(registry.snapshotter().aggregate(&listed), expected);

    let report = MetricsReporter::from_config(registry.config()).report(&registry);
    assert_eq!(report.caches["orders"].entries, expected);
    assert_eq!(report.caches["orders"].entry_count, 2);
}

#[test]
fn test_close_cache_destroys_all_its_accumulators() {
    let (_, registry) = registry_at(1_000);
    let cache = registry.get_or_create("orders");
    registry.get_or_create(("orders", "a"));
    registry.get_or_create(("orders", "b"));
    registry.get_or_create(("users", "a"));

    cache.record_read(1_001);
    assert_eq!(registry.close_cache("orders"), 3);

    assert_eq!(registry.len(), 1);
    assert!(registry.get(&EntityId::cache("orders")).is_none());
    assert_eq!(registry.get_or_create("orders").reads(), 0);
}
