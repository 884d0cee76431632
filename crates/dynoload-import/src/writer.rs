//! Batch writes to the destination store
//!
//! One network operation per batch, no retry at any layer: the SDK's
//! standard retry mode is disabled so a failed batch surfaces as a single
//! error event for the controller to log. Items the service reports back as
//! unprocessed are counted in the outcome rather than re-queued.

use crate::config::ImportConfig;
use crate::convert::Item;
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use dynoload_common::{LoadError, Result};
use tracing::{debug, info, instrument, warn};

/// Per-record visibility for one batch write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Records the service accepted
    pub written: usize,
    /// Records returned as unprocessed; not retried
    pub unprocessed: usize,
}

/// Destination seam for batch writes.
///
/// The streaming controller awaits `write_batch` to completion before
/// pulling further rows, so implementations see at most one call in flight.
#[async_trait]
pub trait BatchSink {
    /// Submit one batch as a single write operation
    async fn write_batch(&mut self, batch: Vec<Item>) -> Result<BatchOutcome>;
}

/// DynamoDB implementation of [`BatchSink`] using `BatchWriteItem`.
///
/// Each item becomes an independent put; an existing entry with the same
/// key is silently overwritten.
pub struct DynamoSink {
    client: Client,
    table: String,
}

impl DynamoSink {
    /// Build a client for the configured destination.
    ///
    /// An endpoint override switches to static credentials so runs against
    /// a local store need no real AWS account.
    pub async fn connect(config: &ImportConfig) -> Result<Self> {
        debug!(region = %config.region, table = %config.table, "initializing destination client");

        if !config.keep_alive {
            warn!("keep-alive disabled was requested; the pooled transport reuses connections regardless");
        }

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder
                .endpoint_url(endpoint)
                .credentials_provider(Credentials::new(
                    "dynoload",
                    "dynoload",
                    None,
                    None,
                    "dynoload-local",
                ));
        }

        let client = Client::from_conf(builder.build());
        info!(table = %config.table, "destination client initialized");

        Ok(Self {
            client,
            table: config.table.clone(),
        })
    }

    /// Wrap an existing client, for callers that manage their own
    pub fn with_client(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

/// Convert a batch into independent put requests
fn to_write_requests(batch: Vec<Item>) -> Result<Vec<WriteRequest>> {
    batch
        .into_iter()
        .map(|item| {
            let put = PutRequest::builder()
                .set_item(Some(item))
                .build()
                .map_err(|e| LoadError::write(e.to_string()))?;
            Ok(WriteRequest::builder().put_request(put).build())
        })
        .collect()
}

#[async_trait]
impl BatchSink for DynamoSink {
    #[instrument(skip(self, batch), fields(batch_size = batch.len()))]
    async fn write_batch(&mut self, batch: Vec<Item>) -> Result<BatchOutcome> {
        // BatchWriteItem rejects an empty request set
        if batch.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let size = batch.len();
        let requests = to_write_requests(batch)?;

        let output = self
            .client
            .batch_write_item()
            .request_items(self.table.as_str(), requests)
            .send()
            .await
            .map_err(|e| LoadError::write(DisplayErrorContext(&e).to_string()))?;

        let unprocessed = output
            .unprocessed_items()
            .map(|m| m.values().map(Vec::len).sum())
            .unwrap_or(0);

        Ok(BatchOutcome {
            written: size - unprocessed,
            unprocessed,
        })
    }
}
