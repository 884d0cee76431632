//! Dynoload Import Library
//!
//! Streams rows from a delimited text file into a DynamoDB table in
//! fixed-size batches under backpressure.
//!
//! The pipeline couples a pull-based row source to a bounded batch buffer:
//! a row is only read after the previous row's batch handling, including
//! any in-flight batch write, has settled. This bounds memory to a single
//! batch and keeps at most one write request outstanding.
//!
//! # Example
//!
//! ```no_run
//! use dynoload_import::config::ImportConfig;
//! use dynoload_import::source::CsvRowSource;
//! use dynoload_import::stream::StreamController;
//! use dynoload_import::writer::DynamoSink;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ImportConfig::new("eu-west-2", "people", "./data.csv");
//!     let sink = DynamoSink::connect(&config).await?;
//!     let mut source = CsvRowSource::open(&config.csv_path, config.delimiter).await?;
//!     let mut controller = StreamController::new(sink, &config);
//!     let summary = controller.run(&mut source, &config.classification).await?;
//!     println!("wrote {} records", summary.records_written);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod convert;
pub mod source;
pub mod stats;
pub mod stream;
pub mod writer;

pub use batch::{Batcher, MAX_BATCH_SIZE};
pub use config::ImportConfig;
pub use convert::{encode_row, Item};
pub use source::{CsvRowSource, Row};
pub use stream::{RunSummary, StreamController};
pub use writer::{BatchOutcome, BatchSink, DynamoSink};
