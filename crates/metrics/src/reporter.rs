//! Reporting views over a metrics registry
//!
//! Renders the registry either as Prometheus text exposition or as a JSON
//! report, without requiring an HTTP server. Serving the output is left to
//! the embedding client.

use crate::entity::EntityId;
use crate::record::MetricsRecord;
use crate::registry::MetricsRegistry;
use gridmetrics_core::{Error, MetricsConfig, Result};
use prometheus::{Encoder, IntGaugeVec, Opts, Registry, TextEncoder};
use serde::Serialize;
use std::collections::BTreeMap;

const LABELS: &[&str] = &["cache", "key", "kind"];

/// Builds reports from a [`MetricsRegistry`]
#[derive(Debug, Clone)]
pub struct MetricsReporter {
    namespace: String,
}

/// Prometheus gauges, one family per record field
struct GaugeSet {
    reads: IntGaugeVec,
    writes: IntGaugeVec,
    hits: IntGaugeVec,
    misses: IntGaugeVec,
    create_time: IntGaugeVec,
    read_time: IntGaugeVec,
    write_time: IntGaugeVec,
}

impl GaugeSet {
    fn register(registry: &Registry, namespace: &str) -> Result<Self> {
        let gauge = |name: &str, help: &str| -> Result<IntGaugeVec> {
            let vec = IntGaugeVec::new(Opts::new(name, help).namespace(namespace), LABELS)
                .map_err(|e| Error::export(format!("failed to create gauge '{name}': {e}")))?;
            registry
                .register(Box::new(vec.clone()))
                .map_err(|e| Error::export(format!("failed to register gauge '{name}': {e}")))?;
            Ok(vec)
        };

        Ok(Self {
            reads: gauge("reads", "Total number of reads")?,
            writes: gauge("writes", "Total number of writes")?,
            hits: gauge("hits", "Total number of hits")?,
            misses: gauge("misses", "Total number of misses")?,
            create_time: gauge("create_time_ms", "Create time in milliseconds since the epoch")?,
            read_time: gauge("read_time_ms", "Last read time in milliseconds since the epoch")?,
            write_time: gauge("write_time_ms", "Last write time in milliseconds since the epoch")?,
        })
    }

    fn observe(&self, id: &EntityId, record: &MetricsRecord) {
        // `kind` keeps a cache-level series apart from an entry whose key is empty
        let labels = [id.cache_name(), id.key().unwrap_or(""), id.kind()];

        self.reads
            .with_label_values(&labels)
            .set(i64::from(record.reads()));
        self.writes
            .with_label_values(&labels)
            .set(i64::from(record.writes()));
        self.hits.with_label_values(&labels).set(i64::from(record.hits()));
        self.misses
            .with_label_values(&labels)
            .set(i64::from(record.misses()));
        self.create_time
            .with_label_values(&labels)
            .set(record.create_time());
        self.read_time
            .with_label_values(&labels)
            .set(record.read_time());
        self.write_time
            .with_label_values(&labels)
            .set(record.write_time());
    }
}

/// Report over every entity of a registry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub generated_at: i64,
    pub caches: BTreeMap<String, CacheReport>,
    pub entities: Vec<EntityReport>,
}

/// Per-cache section of a [`MetricsReport`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheReport {
    /// Cache-level accumulator, if one is registered
    pub cache: Option<MetricsRecord>,
    /// Merge of every entry accumulator of the cache
    pub entries: MetricsRecord,
    pub entry_count: usize,
    pub hit_rate: f64,
}

/// One entity line of a [`MetricsReport`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityReport {
    pub cache: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub metrics: MetricsRecord,
    pub hit_rate: f64,
}

impl MetricsReporter {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn from_config(config: &MetricsConfig) -> Self {
        Self::new(config.namespace.clone())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Render every entity as Prometheus text exposition format
    pub fn prometheus_text(&self, registry: &MetricsRegistry) -> Result<String> {
        let prometheus = Registry::new();
        let gauges = GaugeSet::register(&prometheus, &self.namespace)?;

        for (id, handle) in registry.list() {
            gauges.observe(&id, &registry.snapshotter().snapshot_one(&handle));
        }

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&prometheus.gather(), &mut buffer)
            .map_err(|e| Error::export(format!("failed to encode metrics: {e}")))?;

        String::from_utf8(buffer)
            .map_err(|e| Error::export(format!("metrics output is not UTF-8: {e}")))
    }

    /// Build the structured report
    pub fn report(&self, registry: &MetricsRegistry) -> MetricsReport {
        let snapshotter = registry.snapshotter();

        let mut entities: Vec<EntityReport> = Vec::new();
        let mut cache_records: BTreeMap<String, Option<MetricsRecord>> = BTreeMap::new();
        let mut entry_records: BTreeMap<String, Vec<MetricsRecord>> = BTreeMap::new();

        let mut listed = registry.list();
        listed.sort_by(|(a, _), (b, _)| (a.cache_name(), a.key()).cmp(&(b.cache_name(), b.key())));

        for (id, handle) in listed {
            let record = snapshotter.snapshot_one(&handle);
            let cache = id.cache_name().to_string();

            match id.key() {
                Some(_) => entry_records.entry(cache.clone()).or_default().push(record),
                None => {
                    cache_records.insert(cache.clone(), Some(record));
                }
            }
            cache_records.entry(cache.clone()).or_insert(None);

            entities.push(EntityReport {
                cache,
                key: id.key().map(str::to_string),
                hit_rate: record.hit_rate(),
                metrics: record,
            });
        }

        let caches = cache_records
            .into_iter()
            .map(|(name, cache)| {
                let entries = entry_records.remove(&name).unwrap_or_default();
                let merged = snapshotter.aggregate(&entries);
                let hit_rate = match cache {
                    Some(record) if entries.is_empty() => record.hit_rate(),
                    _ => merged.hit_rate(),
                };
                let report = CacheReport {
                    cache,
                    entries: merged,
                    entry_count: entries.len(),
                    hit_rate,
                };
                (name, report)
            })
            .collect();

        MetricsReport {
            generated_at: registry.now_millis(),
            caches,
            entities,
        }
    }

    /// Render the structured report as pretty JSON
    pub fn json_report(&self, registry: &MetricsRegistry) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.report(registry))?)
    }
}

impl Default for MetricsReporter {
    fn default() -> Self {
        Self::from_config(&MetricsConfig::default())
    }
}
