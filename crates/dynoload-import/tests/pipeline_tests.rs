//! End-to-end pipeline tests with a recording sink
//!
//! Exercises the full source -> encoder -> batcher -> sink flow against
//! fixture files on disk, with the destination store replaced by an
//! in-memory sink that records every batch it is handed.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use dynoload_common::{LoadError, Result};
use dynoload_import::config::ImportConfig;
use dynoload_import::convert::Item;
use dynoload_import::source::CsvRowSource;
use dynoload_import::stream::StreamController;
use dynoload_import::writer::{BatchOutcome, BatchSink};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Sink that records batches, optionally failing or leaving records
/// unprocessed on selected calls.
#[derive(Clone, Default)]
struct RecordingSink {
    batches: Arc<Mutex<Vec<Vec<Item>>>>,
    /// 1-based call numbers that fail outright
    fail_on: Option<usize>,
    /// Unprocessed count reported for every accepted batch
    unprocessed_per_batch: usize,
    calls: Arc<Mutex<usize>>,
    in_flight: Arc<AtomicBool>,
}

impl RecordingSink {
    fn batches(&self) -> Vec<Vec<Item>> {
        self.batches.lock().unwrap().clone()
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl BatchSink for RecordingSink {
    async fn write_batch(&mut self, batch: Vec<Item>) -> Result<BatchOutcome> {
        // The controller must never overlap writes
        assert!(
            !self.in_flight.swap(true, Ordering::SeqCst),
            "a second batch write started while one was in flight"
        );
        tokio::task::yield_now().await;

        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };

        let outcome = if self.fail_on == Some(call) {
            Err(LoadError::write(format!("injected failure on call {call}")))
        } else {
            let written = batch.len() - self.unprocessed_per_batch.min(batch.len());
            let unprocessed = batch.len() - written;
            self.batches.lock().unwrap().push(batch);
            Ok(BatchOutcome {
                written,
                unprocessed,
            })
        };

        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }
}

/// Write a comma-delimited fixture with columns id,name,age,active
fn fixture(rows: usize) -> (tempfile::TempPath, ImportConfig) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "id,name,age,active").unwrap();
    for n in 0..rows {
        let active = match n {
            0 => "TRUE",
            1 => "maybe",
            2 => "false",
            _ => "true",
        };
        writeln!(file, "{n},user-{n},{},{active}", 20 + n).unwrap();
    }
    let path = file.into_temp_path();

    let mut config = ImportConfig::new("eu-west-2", "people", path.to_path_buf());
    config.classification =
        dynoload_common::types::FieldClassification::from_lists("age", "active");
    (path, config)
}

#[tokio::test]
async fn thirty_rows_become_two_ordered_batches() {
    let (path, config) = fixture(30);
    let sink = RecordingSink::default();
    let mut source = CsvRowSource::open(&path, config.delimiter).await.unwrap();
    let mut controller = StreamController::new(sink.clone(), &config);

    let summary = controller
        .run(&mut source, &config.classification)
        .await
        .unwrap();

    let batches = sink.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 25);
    assert_eq!(batches[1].len(), 5);

    assert_eq!(summary.rows_read, 30);
    assert_eq!(summary.rows_failed, 0);
    assert_eq!(summary.records_written, 30);

    // Concatenated batches preserve arrival order
    let ids: Vec<_> = batches
        .iter()
        .flatten()
        .map(|item| item["id"].as_n().unwrap().clone())
        .collect();
    let expected: Vec<_> = (0..30).map(|n| n.to_string()).collect();
    assert_eq!(ids, expected);

    // Classified fields carry their typed values
    let first = &batches[0][0];
    assert_eq!(first["active"], AttributeValue::Bool(true)); // "TRUE"
    assert_eq!(first["age"], AttributeValue::N("20".to_string()));
    assert_eq!(first["name"], AttributeValue::S("user-0".to_string()));

    // Unrecognized boolean token coerces to the default
    assert_eq!(batches[0][1]["active"], AttributeValue::Bool(false)); // "maybe"
    assert_eq!(batches[0][2]["active"], AttributeValue::Bool(false)); // "false"
}

#[tokio::test]
async fn failed_batch_does_not_abort_the_run() {
    let (path, config) = fixture(30);
    let sink = RecordingSink {
        fail_on: Some(2),
        ..RecordingSink::default()
    };
    let mut source = CsvRowSource::open(&path, config.delimiter).await.unwrap();
    let mut controller = StreamController::new(sink.clone(), &config);

    let summary = controller
        .run(&mut source, &config.classification)
        .await
        .unwrap();

    // The run reached end-of-stream and attempted both batches
    assert_eq!(sink.calls(), 2);
    assert_eq!(summary.rows_read, 30);

    // Statistics reflect only the first batch
    assert_eq!(summary.records_written, 25);
    assert_eq!(summary.rows_failed, 5);
    assert_eq!(sink.batches().len(), 1);
}

#[tokio::test]
async fn header_only_input_never_invokes_the_sink() {
    let (path, config) = fixture(0);
    let sink = RecordingSink::default();
    let mut source = CsvRowSource::open(&path, config.delimiter).await.unwrap();
    let mut controller = StreamController::new(sink.clone(), &config);

    let summary = controller
        .run(&mut source, &config.classification)
        .await
        .unwrap();

    assert_eq!(sink.calls(), 0);
    assert_eq!(summary.rows_read, 0);
    assert_eq!(summary.records_written, 0);
}

#[tokio::test]
async fn partial_batch_flushes_at_end_of_stream() {
    let (path, config) = fixture(7);
    let sink = RecordingSink::default();
    let mut source = CsvRowSource::open(&path, config.delimiter).await.unwrap();
    let mut controller = StreamController::new(sink.clone(), &config);

    let summary = controller
        .run(&mut source, &config.classification)
        .await
        .unwrap();

    let batches = sink.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 7);
    assert_eq!(summary.records_written, 7);
}

#[tokio::test]
async fn unprocessed_records_are_excluded_from_statistics() {
    let (path, config) = fixture(30);
    let sink = RecordingSink {
        unprocessed_per_batch: 2,
        ..RecordingSink::default()
    };
    let mut source = CsvRowSource::open(&path, config.delimiter).await.unwrap();
    let mut controller = StreamController::new(sink.clone(), &config);

    let summary = controller
        .run(&mut source, &config.classification)
        .await
        .unwrap();

    // Two batches, each reporting 2 unprocessed records
    assert_eq!(summary.records_written, 30 - 4);
}

#[tokio::test]
async fn smaller_batch_size_is_honored() {
    let (path, mut config) = fixture(10);
    config.batch_size = 4;
    let sink = RecordingSink::default();
    let mut source = CsvRowSource::open(&path, config.delimiter).await.unwrap();
    let mut controller = StreamController::new(sink.clone(), &config);

    controller
        .run(&mut source, &config.classification)
        .await
        .unwrap();

    let sizes: Vec<_> = sink.batches().iter().map(Vec::len).collect();
    assert_eq!(sizes, [4, 4, 2]);
}
