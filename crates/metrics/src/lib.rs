//! Cache and cache-entry metrics for data-grid clients
//!
//! This crate records read/write/hit/miss activity for caches and individual
//! cache entries under concurrent traffic and exposes it as immutable
//! snapshots:
//! - `MetricsRecord`: the immutable, `Copy` snapshot value
//! - `MetricsAccumulator`: lock-free live counters for one entity
//! - `MetricsRegistry`: entity id to accumulator directory with exactly-once creation
//! - `MetricsSnapshotter`: snapshotting and cache-level aggregation
//! - `MetricsReporter`: Prometheus text and JSON views of a registry
//!
//! ```
//! use gridmetrics::{EntityId, MetricsRegistry};
//!
//! let registry = MetricsRegistry::new();
//! let entry = registry.get_or_create(("orders", "42"));
//! entry.record_read(1_700_000_000_000);
//! entry.record_hit();
//!
//! let record = registry.snapshot(&EntityId::entry("orders", "42")).unwrap();
//! assert_eq!(record.reads(), 1);
//! assert_eq!(record.hits(), 1);
//! ```

pub mod accumulator;
pub mod entity;
pub mod record;
pub mod registry;
pub mod reporter;
pub mod snapshotter;

pub use accumulator::MetricsAccumulator;
pub use entity::EntityId;
pub use record::{MetricsRecord, MetricsRecordBuilder};
pub use registry::{AccumulatorHandle, MetricsRegistry};
pub use reporter::{CacheReport, EntityReport, MetricsReport, MetricsReporter};
pub use snapshotter::MetricsSnapshotter;

pub use gridmetrics_core::{
    Clock, Error, ManualClock, MetricsConfig, Result, SharedClock, SystemClock,
};
