// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

/// Adds standard attributes to a message before it is sent.
mod enrich;
/// Messages waiting to be sent.
mod message;
/// Buffers messages per destination and sends them in batches.
mod pump;
/// The batch send contract consumed by the pump.
mod sender;

pub use self::enrich::{
    enrich, enrich_batch, is_fifo, AttributeValue, EnrichedMessage, APPLICATION_JSON,
    CONTENT_LENGTH, CONTENT_TYPE, FIFO_SUFFIX, ID, MESSAGE_DEDUPLICATION_ID, MESSAGE_GROUP_ID,
    MIME_CONTENT_TYPE, TIMESTAMP,
};
pub use self::message::{Attributes, PendingMessage};
pub use self::pump::{DestinationState, MessagePump};
pub use self::sender::{BatchFailure, BatchResult, BatchSuccess, Sender};
