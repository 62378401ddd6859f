//! Live, concurrently updated metrics for one entity
//!
//! Every field is its own atomic, so recording never blocks and never fails.
//! Updates are linearizable per field; a snapshot reads each field once and
//! makes no promise that all seven values were observed at the same instant.

use crate::record::MetricsRecord;
use gridmetrics_core::{SharedClock, SystemClock};
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

/// Mutable counter and timestamp set owned by a registry
#[derive(Debug)]
pub struct MetricsAccumulator {
    // Timestamps (milliseconds since the Unix epoch)
    create_time: AtomicI64,
    read_time: AtomicI64,
    write_time: AtomicI64,

    // Counters
    reads: AtomicU32,
    writes: AtomicU32,
    hits: AtomicU32,
    misses: AtomicU32,

    clock: SharedClock,
}

impl MetricsAccumulator {
    /// Create an accumulator stamped with the clock's current time
    pub fn new(clock: SharedClock) -> Self {
        let now = clock.now_millis();
        Self {
            create_time: AtomicI64::new(now),
            read_time: AtomicI64::new(now),
            write_time: AtomicI64::new(now),
            reads: AtomicU32::new(0),
            writes: AtomicU32::new(0),
            hits: AtomicU32::new(0),
            misses: AtomicU32::new(0),
            clock,
        }
    }

    /// Create an accumulator preloaded from a captured record
    pub fn from_record(record: &MetricsRecord, clock: SharedClock) -> Self {
        let accumulator = Self::new(clock);
        accumulator.restore(record);
        accumulator
    }

    /// Record a read at `now`
    #[inline]
    pub fn record_read(&self, now: i64) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.read_time.store(now, Ordering::Relaxed);
    }

    /// Record a write at `now`
    #[inline]
    pub fn record_write(&self, now: i64) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.write_time.store(now, Ordering::Relaxed);
    }

    /// Record a cache hit
    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss
    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of current metrics
    pub fn snapshot(&self) -> MetricsRecord {
        MetricsRecord::builder()
            .create_time(self.create_time.load(Ordering::Relaxed))
            .read_time(self.read_time.load(Ordering::Relaxed))
            .write_time(self.write_time.load(Ordering::Relaxed))
            .reads(self.reads.load(Ordering::Relaxed))
            .writes(self.writes.load(Ordering::Relaxed))
            .hits(self.hits.load(Ordering::Relaxed))
            .misses(self.misses.load(Ordering::Relaxed))
            .build()
    }

    /// Zero every counter and stamp every timestamp with the current time
    pub fn reset(&self) {
        let now = self.clock.now_millis();

        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);

        self.create_time.store(now, Ordering::Relaxed);
        self.read_time.store(now, Ordering::Relaxed);
        self.write_time.store(now, Ordering::Relaxed);
    }

    /// Overwrite every field with the values of `record`
    ///
    /// Not merged with concurrent `record_*` calls; callers replaying a
    /// server-reported record must not race it against live traffic.
    pub fn restore(&self, record: &MetricsRecord) {
        self.set_create_time(record.create_time());
        self.set_read_time(record.read_time());
        self.set_write_time(record.write_time());
        self.set_reads(record.reads());
        self.set_writes(record.writes());
        self.set_hits(record.hits());
        self.set_misses(record.misses());
    }

    /// Creation time in milliseconds
    pub fn create_time(&self) -> i64 {
        self.create_time.load(Ordering::Relaxed)
    }

    /// Time of the most recent read
    pub fn read_time(&self) -> i64 {
        self.read_time.load(Ordering::Relaxed)
    }

    /// Time of the most recent write
    pub fn write_time(&self) -> i64 {
        self.write_time.load(Ordering::Relaxed)
    }

    /// Number of reads recorded
    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of writes recorded
    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of hits recorded
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of misses recorded
    pub fn misses(&self) -> u32 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Overwrite the creation time
    pub fn set_create_time(&self, create_time: i64) {
        self.create_time.store(create_time, Ordering::Relaxed);
    }

    /// Overwrite the last read time without counting a read
    pub fn set_read_time(&self, read_time: i64) {
        self.read_time.store(read_time, Ordering::Relaxed);
    }

    /// Overwrite the last write time without counting a write
    pub fn set_write_time(&self, write_time: i64) {
        self.write_time.store(write_time, Ordering::Relaxed);
    }

    /// Overwrite the read counter
    pub fn set_reads(&self, reads: u32) {
        self.reads.store(reads, Ordering::Relaxed);
    }

    /// Overwrite the write counter
    pub fn set_writes(&self, writes: u32) {
        self.writes.store(writes, Ordering::Relaxed);
    }

    /// Overwrite the hit counter
    pub fn set_hits(&self, hits: u32) {
        self.hits.store(hits, Ordering::Relaxed);
    }

    /// Overwrite the miss counter
    pub fn set_misses(&self, misses: u32) {
        self.misses.store(misses, Ordering::Relaxed);
    }
}

impl Default for MetricsAccumulator {
    fn default() -> Self {
        Self::new(SystemClock::shared())
    }
}
