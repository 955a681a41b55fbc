// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::{Attributes, BatchResult, PendingMessage, Sender};
use crate::common::{Error, PumpConfig};
use crate::log::StringLogger;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Lifecycle of one destination's queue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DestinationState {
    /// Nothing is queued (or the destination was never used).
    Empty,
    /// Fewer than a full batch is queued.
    Accumulating,
    /// At least a full batch is queued; the next send flushes first.
    AtCapacity,
}

/// Pending messages of one destination.
#[derive(Default)]
struct DestinationQueue {
    messages: Mutex<VecDeque<PendingMessage>>,
    /// Held for the duration of a flush of this destination.
    flushing: tokio::sync::Mutex<()>,
}

impl DestinationQueue {
    fn lock(&self) -> MutexGuard<'_, VecDeque<PendingMessage>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn push(&self, message: PendingMessage) {
        self.lock().push_back(message);
    }

    /// Puts messages back at the head, ahead of anything queued since they were taken.
    fn restore(&self, messages: Vec<PendingMessage>) {
        let mut queue = self.lock();
        for message in messages.into_iter().rev() {
            queue.push_front(message);
        }
    }

    fn take(&self, max: usize) -> Vec<PendingMessage> {
        let mut queue = self.lock();
        let n = queue.len().min(max);
        queue.drain(..n).collect()
    }
}

/// Buffers outbound messages per destination and sends them in batches of at
/// most `max_batch_size`.
///
/// At most one flush of a given destination runs at a time.  Messages are sent
/// in the order they were queued, and a message stays queued until the
/// destination reports it delivered.  There is no automatic retry; a failed
/// flush returns an error and a later flush sends the remainder.
///
/// Dropping a pump does not send what is still queued, because `Drop` cannot
/// await.  Call `close().await` before dropping it.
pub struct MessagePump<S: Sender> {
    sender: S,
    max_batch_size: usize,
    queues: DashMap<String, Arc<DestinationQueue>>,
    closed: AtomicBool,
}

impl<S: Sender> MessagePump<S> {
    /// Creates a pump which sends at most `max_batch_size` messages per call.
    /// The size must be between 1 and the sender's own limit.
    pub fn new(sender: S, max_batch_size: usize) -> Result<Self, Error> {
        if max_batch_size == 0 {
            return Err(Error::Validation(
                "max_batch_size: must be at least 1".to_string(),
            ));
        }
        let limit = sender.max_batch_size();
        if max_batch_size > limit {
            return Err(Error::Validation(format!(
                "max_batch_size: {max_batch_size} exceeds the sender limit of {limit}"
            )));
        }
        Ok(Self {
            sender,
            max_batch_size,
            queues: Default::default(),
            closed: AtomicBool::new(false),
        })
    }

    /// Creates a pump using `[pump] max_batch_size`.
    pub fn from_config(sender: S, config: &PumpConfig) -> Result<Self, Error> {
        Self::new(sender, config.max_batch_size()?)
    }

    /// Flushes every destination and refuses further sends.
    pub async fn close(&self) -> Result<StringLogger, Error> {
        self.closed.store(true, Ordering::SeqCst);
        self.flush_all().await
    }

    /// Destinations which have been sent to.
    pub fn destinations(&self) -> Vec<String> {
        let mut destinations: Vec<String> = self
            .queues
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        destinations.sort();
        destinations
    }

    /// Sends up to `max_batch_size` messages at a time until the destination's
    /// queue is empty or a batch fails.  Undelivered messages of a failed batch
    /// are put back at the head of the queue.
    pub async fn flush(&self, destination: &str) -> Result<StringLogger, Error> {
        let log = StringLogger::new();
        let Some(queue) = self.queue(destination) else {
            return Ok(log);
        };
        let _flushing = queue.flushing.lock().await;
        loop {
            let batch = queue.take(self.max_batch_size);
            if batch.is_empty() {
                break;
            }
            let total = batch.len();
            let result = match self.sender.send_batch(destination, &batch).await {
                Ok(result) => result,
                Err(e) => {
                    queue.restore(batch);
                    log.warn(format!("send_batch({destination}, {total}) failed: {e}"));
                    return Err(e);
                }
            };
            if result.is_success() {
                log.trace(format!("send_batch({destination}, {total}) succeeded"));
                continue;
            }
            for failure in &result.failed {
                log.warn(format!(
                    "send_batch({destination}) entry {} failed: sender_fault={} code={} message={}",
                    failure.index, failure.sender_fault, failure.code, failure.message
                ));
            }
            queue.restore(undelivered(batch, &result));
            return Err(Error::BatchFailed {
                destination: destination.to_string(),
                total,
                failures: result.failed,
            });
        }
        Ok(log)
    }

    /// Flushes each known destination once.  Every destination is attempted
    /// even if an earlier one fails.
    pub async fn flush_all(&self) -> Result<StringLogger, Error> {
        let log = StringLogger::new();
        let mut errors = Vec::new();
        for destination in self.destinations() {
            match self.flush(&destination).await {
                Ok(flush_log) => log.extend(&flush_log),
                Err(e) => {
                    log.warn(format!("flush({destination}) failed: {e}"));
                    errors.push(e);
                }
            }
        }
        match errors.len() {
            0 => Ok(log),
            1 => Err(errors.remove(0)),
            _ => Err(Error::Multiple(errors)),
        }
    }

    /// Maximum messages per batch.
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Number of messages queued for `destination`.
    pub fn pending(&self, destination: &str) -> usize {
        self.queue(destination)
            .map(|queue| queue.len())
            .unwrap_or(0)
    }

    /// Queues a message for `destination`, flushing first if a full batch is
    /// already queued.  Attribute defaults and FIFO validation are applied when
    /// the message is sent, so such errors surface from `flush`.
    pub async fn send<M: Serialize + ?Sized>(
        &self,
        destination: &str,
        message: &M,
        attributes: Option<Attributes>,
    ) -> Result<(), Error> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::Closed(destination.to_string()));
        }
        let message = PendingMessage::from_serialize(message, attributes)?;
        let queue = self.queue_or_insert(destination);
        if queue.len() >= self.max_batch_size {
            self.flush(destination).await?;
        }
        queue.push(message);
        Ok(())
    }

    /// Returns the sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Lifecycle state of `destination`.
    pub fn state(&self, destination: &str) -> DestinationState {
        match self.pending(destination) {
            0 => DestinationState::Empty,
            n if n < self.max_batch_size => DestinationState::Accumulating,
            _ => DestinationState::AtCapacity,
        }
    }

    fn queue(&self, destination: &str) -> Option<Arc<DestinationQueue>> {
        self.queues
            .get(destination)
            .map(|queue| Arc::clone(queue.value()))
    }

    fn queue_or_insert(&self, destination: &str) -> Arc<DestinationQueue> {
        if let Some(queue) = self.queue(destination) {
            return queue;
        }
        Arc::clone(
            self.queues
                .entry(destination.to_string())
                .or_default()
                .value(),
        )
    }
}

impl<S: Sender> Drop for MessagePump<S> {
    fn drop(&mut self) {
        let pending: Vec<usize> = self
            .queues
            .iter()
            .map(|entry| entry.value().len())
            .filter(|&len| len > 0)
            .collect();
        if !pending.is_empty() {
            tracing::warn!(
                "message pump dropped with {} unsent messages across {} destinations",
                pending.iter().sum::<usize>(),
                pending.len()
            );
        }
    }
}

/// Messages of `batch` which the destination did not report delivered, in batch order.
fn undelivered(batch: Vec<PendingMessage>, result: &BatchResult) -> Vec<PendingMessage> {
    let delivered: HashSet<usize> = result
        .successful
        .iter()
        .map(|success| success.index)
        .collect();
    batch
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !delivered.contains(index))
        .map(|(_, message)| message)
        .collect()
}
