//! Snapshot and aggregation of accumulators into reportable records
//!
//! Aggregation merges entity-level records into a single cache-level record:
//! counters are summed, `create_time` is the earliest non-zero creation, and
//! `read_time`/`write_time` are the latest activity across all inputs.

use crate::accumulator::MetricsAccumulator;
use crate::record::MetricsRecord;
use gridmetrics_core::{SharedClock, SystemClock};
use std::borrow::Borrow;

/// Stateless operator turning accumulators into [`MetricsRecord`]s
///
/// Only the clock is held, for stamping the empty aggregate.
#[derive(Debug, Clone)]
pub struct MetricsSnapshotter {
    clock: SharedClock,
}

impl MetricsSnapshotter {
    pub fn new(clock: SharedClock) -> Self {
        Self { clock }
    }

    /// Snapshot a single accumulator
    pub fn snapshot_one(&self, accumulator: &MetricsAccumulator) -> MetricsRecord {
        accumulator.snapshot()
    }

    /// Merge records into one
    ///
    /// Counter sums saturate at `u32::MAX`. An empty input yields zero counters
    /// with every timestamp set to now; if no input has a non-zero create time
    /// the merged create time is 0.
    pub fn aggregate<I>(&self, records: I) -> MetricsRecord
    where
        I: IntoIterator,
        I::Item: Borrow<MetricsRecord>,
    {
        let mut records = records.into_iter().peekable();
        if records.peek().is_none() {
            return MetricsRecord::zeroed(self.clock.now_millis());
        }

        let mut reads = 0u32;
        let mut writes = 0u32;
        let mut hits = 0u32;
        let mut misses = 0u32;
        let mut create_time: Option<i64> = None;
        let mut read_time = i64::MIN;
        let mut write_time = i64::MIN;

        for record in records {
            let record = record.borrow();

            reads = reads.saturating_add(record.reads());
            writes = writes.saturating_add(record.writes());
            hits = hits.saturating_add(record.hits());
            misses = misses.saturating_add(record.misses());

            if record.create_time() != 0 {
                create_time = Some(match create_time {
                    Some(earliest) => earliest.min(record.create_time()),
                    None => record.create_time(),
                });
            }
            read_time = read_time.max(record.read_time());
            write_time = write_time.max(record.write_time());
        }

        MetricsRecord::builder()
            .create_time(create_time.unwrap_or(0))
            .read_time(read_time)
            .write_time(write_time)
            .reads(reads)
            .writes(writes)
            .hits(hits)
            .misses(misses)
            .build()
    }

    /// Snapshot every accumulator, then merge the snapshots
    pub fn aggregate_accumulators<'a, I>(&self, accumulators: I) -> MetricsRecord
    where
        I: IntoIterator<Item = &'a MetricsAccumulator>,
    {
        self.aggregate(accumulators.into_iter().map(MetricsAccumulator::snapshot))
    }
}

impl Default for MetricsSnapshotter {
    fn default() -> Self {
        Self::new(SystemClock::shared())
    }
}
