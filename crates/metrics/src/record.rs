//! Immutable metrics snapshot value
//!
//! A [`MetricsRecord`] is what callers hold on to: a plain `Copy` value with
//! the create/read/write timestamps and the read/write/hit/miss counters of
//! one cache or cache entry at some point in time.

use gridmetrics_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time metrics for a cache or a single cache entry
///
/// Timestamps are milliseconds since the Unix epoch. The hit and miss counters
/// are independent of `reads`; nothing requires `reads >= hits + misses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    create_time: i64,
    read_time: i64,
    write_time: i64,
    reads: u32,
    writes: u32,
    hits: u32,
    misses: u32,
}

impl MetricsRecord {
    /// A fresh record: zero counters, all three timestamps set to `now`
    pub fn new(now: i64) -> Self {
        Self {
            create_time: now,
            read_time: now,
            write_time: now,
            ..Self::default()
        }
    }

    /// The "no metrics yet" record returned for unknown entities
    pub fn zeroed(now: i64) -> Self {
        Self::new(now)
    }

    /// Start building a record field by field
    pub fn builder() -> MetricsRecordBuilder {
        MetricsRecordBuilder::default()
    }

    /// Create time of the owning entity
    pub fn create_time(&self) -> i64 {
        self.create_time
    }

    /// Last read time of the owning entity
    pub fn read_time(&self) -> i64 {
        self.read_time
    }

    /// Last write time of the owning entity
    pub fn write_time(&self) -> i64 {
        self.write_time
    }

    /// Total number of reads
    pub fn reads(&self) -> u32 {
        self.reads
    }

    /// Total number of writes
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Total number of hits
    pub fn hits(&self) -> u32 {
        self.hits
    }

    /// Total number of misses
    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Fraction of lookups that hit, 0.0 when nothing was looked up
    pub fn hit_rate(&self) -> f64 {
        let lookups = u64::from(self.hits) + u64::from(self.misses);
        if lookups == 0 {
            0.0
        } else {
            f64::from(self.hits) / lookups as f64
        }
    }

    /// Fraction of lookups that missed, 0.0 when nothing was looked up
    pub fn miss_rate(&self) -> f64 {
        let lookups = u64::from(self.hits) + u64::from(self.misses);
        if lookups == 0 {
            0.0
        } else {
            f64::from(self.misses) / lookups as f64
        }
    }

    /// Verify the entity was not read or written before it was created
    pub fn check_invariants(&self) -> Result<()> {
        if self.create_time > self.read_time {
            return Err(Error::invalid_state(format!(
                "createTime {} is after readTime {}",
                self.create_time, self.read_time
            )));
        }
        if self.create_time > self.write_time {
            return Err(Error::invalid_state(format!(
                "createTime {} is after writeTime {}",
                self.create_time, self.write_time
            )));
        }
        Ok(())
    }

    /// Decode a record from a camelCase JSON payload
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the record as camelCase JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for MetricsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MetricsRecord [createTime={}, readTime={}, writeTime={}, reads={}, writes={}, hits={}, misses={}]",
            self.create_time,
            self.read_time,
            self.write_time,
            self.reads,
            self.writes,
            self.hits,
            self.misses
        )
    }
}

/// Builder for records restored from external sources
#[derive(Debug, Default, Clone)]
pub struct MetricsRecordBuilder {
    record: MetricsRecord,
}

impl MetricsRecordBuilder {
    pub fn create_time(mut self, create_time: i64) -> Self {
        self.record.create_time = create_time;
        self
    }

    pub fn read_time(mut self, read_time: i64) -> Self {
        self.record.read_time = read_time;
        self
    }

    pub fn write_time(mut self, write_time: i64) -> Self {
        self.record.write_time = write_time;
        self
    }

    pub fn reads(mut self, reads: u32) -> Self {
        self.record.reads = reads;
        self
    }

    pub fn writes(mut self, writes: u32) -> Self {
        self.record.writes = writes;
        self
    }

    pub fn hits(mut self, hits: u32) -> Self {
        self.record.hits = hits;
        self
    }

    pub fn misses(mut self, misses: u32) -> Self {
        self.record.misses = misses;
        self
    }

    pub fn build(self) -> MetricsRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetricsRecord {
        MetricsRecord::builder()
            .create_time(100)
            .read_time(200)
            .write_time(150)
            .reads(3)
            .writes(1)
            .hits(2)
            .misses(1)
            .build()
    }

    #[test]
    fn test_new_stamps_all_times() {
        let record = MetricsRecord::new(1_700_000_000_000);

        assert_eq!(record.create_time(), 1_700_000_000_000);
        assert_eq!(record.read_time(), 1_700_000_000_000);
        assert_eq!(record.write_time(), 1_700_000_000_000);
        assert_eq!(record.reads(), 0);
        assert_eq!(record.writes(), 0);
        assert_eq!(record.hits(), 0);
        assert_eq!(record.misses(), 0);
        assert_eq!(MetricsRecord::zeroed(5), MetricsRecord::new(5));
    }

    #[test]
    fn test_builder_accessors() {
        let record = sample();

        assert_eq!(record.create_time(), 100);
        assert_eq!(record.read_time(), 200);
        assert_eq!(record.write_time(), 150);
        assert_eq!(record.reads(), 3);
        assert_eq!(record.writes(), 1);
        assert_eq!(record.hits(), 2);
        assert_eq!(record.misses(), 1);
    }

    #[test]
    fn test_copy_is_independent() {
        let original = sample();
        let copy = original;
        let rebuilt = MetricsRecord::builder()
            .create_time(copy.create_time())
            .reads(99)
            .build();

        assert_eq!(original.reads(), 3);
        assert_eq!(copy, original);
        assert_eq!(rebuilt.reads(), 99);
        assert_eq!(rebuilt.create_time(), 100);
    }

    #[test]
    fn test_hit_rate() {
        assert_eq!(MetricsRecord::new(0).hit_rate(), 0.0);
        assert_eq!(MetricsRecord::new(0).miss_rate(), 0.0);

        let record = MetricsRecord::builder().hits(3).misses(1).build();
        assert_eq!(record.hit_rate(), 0.75);
        assert_eq!(record.miss_rate(), 0.25);

        // Saturated counters must not overflow the denominator
        let record = MetricsRecord::builder().hits(u32::MAX).misses(u32::MAX).build();
        assert_eq!(record.hit_rate(), 0.5);
    }

    #[test]
    fn test_check_invariants() {
        assert!(sample().check_invariants().is_ok());
        assert!(MetricsRecord::new(10).check_invariants().is_ok());

        let read_before_create = MetricsRecord::builder()
            .create_time(100)
            .read_time(50)
            .write_time(100)
            .build();
        let err = read_before_create.check_invariants().unwrap_err();
        assert!(matches!(err, Error::InvalidState { .. }));
        assert!(err.to_string().contains("readTime 50"));

        let write_before_create = MetricsRecord::builder()
            .create_time(100)
            .read_time(100)
            .write_time(99)
            .build();
        assert!(write_before_create.check_invariants().is_err());
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"createTime\":100"));
        assert!(json.contains("\"readTime\":200"));
        assert!(json.contains("\"writeTime\":150"));
        assert!(json.contains("\"misses\":1"));

        let decoded = MetricsRecord::from_json(
            r#"{"createTime":100,"readTime":200,"writeTime":150,"reads":3,"writes":1,"hits":2,"misses":1}"#,
        )
        .unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_json_rejects_negative_counters() {
        let result = MetricsRecord::from_json(
            r#"{"createTime":0,"readTime":0,"writeTime":0,"reads":-1,"writes":0,"hits":0,"misses":0}"#,
        );
        assert!(matches!(result, Err(Error::Json { .. })));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "MetricsRecord [createTime=100, readTime=200, writeTime=150, reads=3, writes=1, hits=2, misses=1]"
        );
    }
}
