// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::load_aws_config;
use crate::common::{Error, PumpConfig};
use crate::pump::{
    enrich_batch, BatchFailure, BatchResult, BatchSuccess, EnrichedMessage, PendingMessage, Sender,
};
use crate::time_id::UnixMillis;
use async_trait::async_trait;
use aws_sdk_sqs::operation::send_message_batch::SendMessageBatchOutput;
use aws_sdk_sqs::types::{MessageAttributeValue, SendMessageBatchRequestEntry};
use aws_sdk_sqs::Client;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// A convenient alias for SQS client so consuming code doesn't need to add it to `Cargo.toml`
pub type SqsClient = aws_sdk_sqs::Client;

/// SQS accepts at most this many entries per `SendMessageBatch` call.
pub const MAX_SQS_BATCH_SIZE: usize = 10;

/// Creates an SQS client.
pub async fn new_sqs_client(pump_config: &PumpConfig) -> SqsClient {
    let aws_config = load_aws_config(pump_config).await;
    Client::new(&aws_config)
}

/// Sends batches to SQS queues, identified by name or by URL.
pub struct SqsSender {
    client: SqsClient,
    queue_urls: Mutex<HashMap<String, String>>,
}

impl SqsSender {
    /// Creates a sender which uses `client`.
    pub fn new(client: SqsClient) -> Self {
        Self {
            client,
            queue_urls: Default::default(),
        }
    }

    /// Returns the queue URL of `destination`.  URLs are returned as is and
    /// names are looked up once.
    pub async fn queue_url(&self, destination: &str) -> Result<String, Error> {
        if destination.starts_with("https://") || destination.starts_with("http://") {
            return Ok(destination.to_string());
        }
        let cached = self.queue_urls().get(destination).cloned();
        if let Some(queue_url) = cached {
            return Ok(queue_url);
        }
        let output = self
            .client
            .get_queue_url()
            .queue_name(destination)
            .send()
            .await
            .map_err(|e| Error::Anyhow(e.into(), format!("get_queue_url({destination})")))?;
        let queue_url = output
            .queue_url()
            .ok_or_else(|| Error::String(format!("{destination}: no queue URL")))?
            .to_string();
        self.queue_urls()
            .insert(destination.to_string(), queue_url.clone());
        Ok(queue_url)
    }

    fn queue_urls(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.queue_urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Sender for SqsSender {
    fn max_batch_size(&self) -> usize {
        MAX_SQS_BATCH_SIZE
    }

    async fn send_batch(
        &self,
        destination: &str,
        messages: &[PendingMessage],
    ) -> Result<BatchResult, Error> {
        if messages.is_empty() {
            return Ok(BatchResult::default());
        }
        if messages.len() > MAX_SQS_BATCH_SIZE {
            return Err(Error::Validation(format!(
                "{destination}: {} messages exceeds the SQS batch limit of {MAX_SQS_BATCH_SIZE}",
                messages.len()
            )));
        }
        let entries = enrich_batch(destination, messages, UnixMillis::now())?
            .into_iter()
            .enumerate()
            .map(|(index, message)| to_request_entry(index, message))
            .collect::<Result<Vec<_>, Error>>()?;
        let queue_url = self.queue_url(destination).await?;
        let output = self
            .client
            .send_message_batch()
            .queue_url(&queue_url)
            .set_entries(Some(entries))
            .send()
            .await
            .map_err(|e| {
                Error::Anyhow(
                    e.into(),
                    format!("send_message_batch({destination}, {})", messages.len()),
                )
            })?;
        to_batch_result(&output)
    }
}

/// Builds the wire entry for the message at `index` of a batch.  The index is
/// the entry id, so that failures can be matched to messages.
pub(crate) fn to_request_entry(
    index: usize,
    message: EnrichedMessage,
) -> Result<SendMessageBatchRequestEntry, Error> {
    let EnrichedMessage {
        body,
        attributes,
        deduplication_id,
        group_id,
    } = message;
    let mut builder = SendMessageBatchRequestEntry::builder()
        .id(index.to_string())
        .message_body(body)
        .set_message_deduplication_id(deduplication_id)
        .set_message_group_id(group_id);
    for (name, value) in attributes {
        let attribute = MessageAttributeValue::builder()
            .data_type(value.data_type())
            .string_value(value.as_str())
            .build()
            .map_err(|e| Error::Anyhow(e.into(), format!("message_attribute({name})")))?;
        builder = builder.message_attributes(name, attribute);
    }
    builder
        .build()
        .map_err(|e| Error::Anyhow(e.into(), format!("send_message_batch_entry({index})")))
}

/// Translates a `SendMessageBatch` response.
pub(crate) fn to_batch_result(output: &SendMessageBatchOutput) -> Result<BatchResult, Error> {
    let successful = output
        .successful()
        .iter()
        .map(|entry| {
            Ok(BatchSuccess {
                index: entry_index(entry.id())?,
                message_id: entry.message_id().to_string(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let failed = output
        .failed()
        .iter()
        .map(|entry| {
            Ok(BatchFailure {
                index: entry_index(entry.id())?,
                sender_fault: entry.sender_fault(),
                code: entry.code().to_string(),
                message: entry.message().unwrap_or_default().to_string(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(BatchResult { successful, failed })
}

fn entry_index(id: &str) -> Result<usize, Error> {
    id.parse()
        .map_err(|_| Error::String(format!("{id}: not a batch entry id")))
}
