//! Streaming controller
//!
//! Drives the pipeline end to end: pulls one row at a time from the
//! source, encodes it, offers it to the batcher, and awaits any resulting
//! batch write before pulling the next row. Because the source only
//! produces a row when awaited, the await-before-next-pull sequencing is
//! the backpressure mechanism: at most one batch write is in flight, and
//! buffering is bounded by a single batch.
//!
//! Individual row or batch failures are logged and never abort the run;
//! the controller drains the input and reports what it could write.

use crate::batch::Batcher;
use crate::config::ImportConfig;
use crate::convert::{encode_row, Item};
use crate::source::CsvRowSource;
use crate::stats::RunStats;
use crate::writer::BatchSink;
use dynoload_common::types::FieldClassification;
use dynoload_common::Result;
use tracing::{error, info, warn};

/// End-of-run report
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Data rows produced by the source
    pub rows_read: u64,
    /// Rows that failed to decode or whose batch write failed
    pub rows_failed: u64,
    /// Records the destination accepted
    pub records_written: u64,
    /// Wall-clock seconds for the whole run
    pub elapsed_secs: f64,
    /// Derived throughput over the whole run
    pub records_per_second: f64,
}

/// Drives source, encoder, batcher, and sink; owns the run's counters
pub struct StreamController<S> {
    batcher: Batcher,
    sink: S,
    progress_every: u64,
}

impl<S: BatchSink> StreamController<S> {
    /// Create a controller for one run
    pub fn new(sink: S, config: &ImportConfig) -> Self {
        Self {
            batcher: Batcher::new(config.effective_batch_size()),
            sink,
            progress_every: config.progress_every,
        }
    }

    /// Stream every row from the source into the sink.
    ///
    /// Completes once end-of-stream is reached and the final flush has
    /// settled; batch failures never prevent termination.
    pub async fn run(
        &mut self,
        source: &mut CsvRowSource,
        classification: &FieldClassification,
    ) -> Result<RunSummary> {
        info!(
            headers = source.headers().len(),
            classified_fields = classification.len(),
            batch_size = self.batcher.capacity(),
            "starting import"
        );

        let mut stats = RunStats::start();
        let mut rows_read: u64 = 0;
        let mut rows_failed: u64 = 0;

        // The source stays suspended between next_row() calls; nothing is
        // pulled while a batch write is outstanding.
        while let Some(next) = source.next_row().await {
            let row_index = rows_read;
            rows_read += 1;
            match next {
                Ok(row) => {
                    let item = encode_row(classification, &row);
                    if let Some(batch) = self.batcher.offer(item) {
                        let size = batch.len() as u64;
                        if !self.write_batch(batch, row_index, &mut stats).await {
                            rows_failed += size;
                        }
                    }
                }
                Err(e) => {
                    rows_failed += 1;
                    error!(row = row_index, error = %e, "failed to read row");
                }
            }
        }

        // Unconditional end-of-stream flush
        if let Some(batch) = self.batcher.flush() {
            let size = batch.len() as u64;
            if !self.write_batch(batch, rows_read, &mut stats).await {
                rows_failed += size;
            }
        }

        let summary = RunSummary {
            rows_read,
            rows_failed,
            records_written: stats.records_written(),
            elapsed_secs: stats.elapsed_secs(),
            records_per_second: stats.records_per_second(),
        };

        info!(
            rows_read = summary.rows_read,
            records_written = summary.records_written,
            rows_failed = summary.rows_failed,
            elapsed_secs = summary.elapsed_secs,
            records_per_second = summary.records_per_second,
            "import complete"
        );

        Ok(summary)
    }

    /// Write one batch and settle it into the statistics.
    ///
    /// Returns false when the write failed; the batch's records are not
    /// retried and not re-queued.
    async fn write_batch(
        &mut self,
        batch: Vec<Item>,
        row_index: u64,
        stats: &mut RunStats,
    ) -> bool {
        let size = batch.len();
        match self.sink.write_batch(batch).await {
            Ok(outcome) => {
                if outcome.unprocessed > 0 {
                    warn!(
                        unprocessed = outcome.unprocessed,
                        batch_size = size,
                        "destination left records unprocessed"
                    );
                }
                let previous = stats.records_written();
                stats.add_written(outcome.written as u64);
                if stats.crossed_checkpoint(previous, self.progress_every) {
                    info!(
                        "inserted {} records in {:.1}s - {:.0} records per second",
                        stats.records_written(),
                        stats.elapsed_secs(),
                        stats.records_per_second()
                    );
                }
                true
            }
            Err(e) => {
                error!(row = row_index, batch_size = size, error = %e, "batch write failed");
                false
            }
        }
    }
}
