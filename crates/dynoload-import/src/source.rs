//! Pull-based row source for delimited text files
//!
//! The source is lazy: a row is decoded only when [`CsvRowSource::next_row`]
//! is awaited. Callers realize backpressure by not awaiting the next row
//! until downstream handling of the previous one has settled — suspension
//! is the interface's resting state, not a side effect of a stateful
//! stream handle.

use csv_async::{AsyncReader, AsyncReaderBuilder, StringRecord};
use dynoload_common::types::Delimiter;
use dynoload_common::{LoadError, Result};
use std::path::Path;
use tokio::fs::File;

/// One input line as raw text fields, keyed by header name, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Build a row from (field name, raw text) pairs
    pub fn from_pairs(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Iterate the fields in original order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields in the row
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the row carries no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Lazy CSV/TSV row source with an up-front header row.
///
/// The header row is consumed when the source is opened; its field names
/// key every subsequent [`Row`].
pub struct CsvRowSource {
    reader: AsyncReader<File>,
    headers: Vec<String>,
    record: StringRecord,
    done: bool,
}

impl CsvRowSource {
    /// Open a delimited file and consume its header row
    pub async fn open(path: impl AsRef<Path>, delimiter: Delimiter) -> Result<Self> {
        let file = File::open(path.as_ref()).await?;
        let mut reader = AsyncReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .has_headers(true)
            .create_reader(file);

        let headers = reader
            .headers()
            .await
            .map_err(|e| LoadError::source(format!("failed to read header row: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
            done: false,
        })
    }

    /// Field names from the header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Produce the next row, or `None` at end-of-stream.
    ///
    /// A decode failure is returned once and ends the stream; the caller
    /// decides whether that is fatal.
    pub async fn next_row(&mut self) -> Option<Result<Row>> {
        if self.done {
            return None;
        }
        match self.reader.read_record(&mut self.record).await {
            Ok(true) => {
                let fields = self
                    .headers
                    .iter()
                    .zip(self.record.iter())
                    .map(|(name, raw)| (name.clone(), raw.to_string()))
                    .collect();
                Some(Ok(Row::from_pairs(fields)))
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(LoadError::Csv(e.to_string())))
            }
        }
    }
}
