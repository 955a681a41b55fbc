// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::PendingMessage;
use crate::common::Error;
use async_trait::async_trait;
use std::slice;
use std::sync::Arc;

/// An entry of a batch which the destination accepted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchSuccess {
    /// Position of the message within the batch.
    pub index: usize,
    /// Identifier assigned by the destination.
    pub message_id: String,
}

/// An entry of a batch which the destination rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchFailure {
    /// Position of the message within the batch.
    pub index: usize,
    /// Whether the sender (rather than the destination) caused the failure.
    pub sender_fault: bool,
    /// Error code reported by the destination.
    pub code: String,
    /// Error message reported by the destination, if any.
    pub message: String,
}

/// The outcome of one batch send.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BatchResult {
    /// Accepted entries.
    pub successful: Vec<BatchSuccess>,
    /// Rejected entries.
    pub failed: Vec<BatchFailure>,
}

impl BatchResult {
    /// Returns `true` if no entry was rejected.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sends a batch of messages to one destination in a single call.
///
/// Rejected entries are reported in the `BatchResult` rather than as an
/// `Err`; an `Err` means nothing is known to have been delivered.
#[async_trait]
pub trait Sender: Send + Sync {
    /// Sends `messages` to `destination`, in order.
    async fn send_batch(
        &self,
        destination: &str,
        messages: &[PendingMessage],
    ) -> Result<BatchResult, Error>;

    /// Sends a single message, as a batch of one.
    async fn send(&self, destination: &str, message: &PendingMessage) -> Result<BatchResult, Error> {
        self.send_batch(destination, slice::from_ref(message)).await
    }

    /// Largest batch `send_batch` accepts.  Unbounded unless overridden.
    fn max_batch_size(&self) -> usize {
        usize::MAX
    }
}

/// Lets several pumps share one sender.
#[async_trait]
impl<T: Sender + ?Sized> Sender for Arc<T> {
    async fn send_batch(
        &self,
        destination: &str,
        messages: &[PendingMessage],
    ) -> Result<BatchResult, Error> {
        (**self).send_batch(destination, messages).await
    }

    fn max_batch_size(&self) -> usize {
        (**self).max_batch_size()
    }
}
