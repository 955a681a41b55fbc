// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::PendingMessage;
use crate::common::Error;
use crate::time_id::{new_message_id, UnixMillis};
use serde_json::Value;
use std::collections::BTreeMap;

/// Unique id of every sent message.
pub const ID: &str = "id";
/// Send time, in Unix milliseconds.
pub const TIMESTAMP: &str = "timestamp";
/// Content type, under the key used by Spring messaging.
pub const CONTENT_TYPE: &str = "contentType";
/// Content type, under the MIME header key.
pub const MIME_CONTENT_TYPE: &str = "Content-Type";
/// Length in bytes of the serialized body.
pub const CONTENT_LENGTH: &str = "Content-Length";
/// Required for FIFO destinations; sent as a request field, never as an attribute.
pub const MESSAGE_DEDUPLICATION_ID: &str = "message-deduplication-id";
/// Required for FIFO destinations; sent as a request field, never as an attribute.
pub const MESSAGE_GROUP_ID: &str = "message-group-id";
/// Bodies are always serialized as JSON.
pub const APPLICATION_JSON: &str = "application/json";
/// Destinations whose identifier ends with this are FIFO destinations.
pub const FIFO_SUFFIX: &str = "fifo";

/// A typed message attribute value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttributeValue {
    /// Sent with data type `Number`.
    Number(String),
    /// Sent with data type `String`.
    String(String),
}

impl AttributeValue {
    /// Converts a caller supplied value.  Returns `None` for `null`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => Some(Self::Number(n.to_string())),
            Value::String(s) => Some(Self::String(s.clone())),
            other => Some(Self::String(other.to_string())),
        }
    }

    /// The data type tag sent on the wire.
    pub fn data_type(&self) -> &'static str {
        match self {
            Self::Number(_) => "Number",
            Self::String(_) => "String",
        }
    }

    /// The value as sent on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number(s) | Self::String(s) => s,
        }
    }
}

/// A message ready to be put on the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedMessage {
    /// JSON body.
    pub body: String,
    /// Generic attributes, always including the standard ones.
    pub attributes: BTreeMap<String, AttributeValue>,
    /// FIFO deduplication id.  Always `Some` for FIFO destinations.
    pub deduplication_id: Option<String>,
    /// FIFO group id.  Always `Some` for FIFO destinations.
    pub group_id: Option<String>,
}

/// Returns `true` if `destination` names a FIFO destination.
pub fn is_fifo(destination: &str) -> bool {
    destination.ends_with(FIFO_SUFFIX)
}

/// Serializes a pending message and adds the standard attributes which the
/// caller did not supply.  Caller supplied values are kept verbatim.
pub fn enrich(
    destination: &str,
    message: &PendingMessage,
    now: UnixMillis,
) -> Result<EnrichedMessage, Error> {
    let body = serde_json::to_string(message.payload()).map_err(Error::Serde)?;

    let mut attributes: BTreeMap<String, AttributeValue> = message
        .attributes()
        .iter()
        .filter(|(key, _)| !is_fifo_key(key))
        .filter_map(|(key, value)| AttributeValue::from_json(value).map(|v| (key.clone(), v)))
        .collect();

    attributes
        .entry(ID.to_string())
        .or_insert_with(|| AttributeValue::String(new_message_id()));
    attributes
        .entry(TIMESTAMP.to_string())
        .or_insert_with(|| AttributeValue::Number(now.to_string()));
    for key in [CONTENT_TYPE, MIME_CONTENT_TYPE] {
        attributes
            .entry(key.to_string())
            .or_insert_with(|| AttributeValue::String(APPLICATION_JSON.to_string()));
    }
    attributes
        .entry(CONTENT_LENGTH.to_string())
        .or_insert_with(|| AttributeValue::Number(body.len().to_string()));

    let (deduplication_id, group_id) = if is_fifo(destination) {
        match (
            fifo_field(message, MESSAGE_DEDUPLICATION_ID),
            fifo_field(message, MESSAGE_GROUP_ID),
        ) {
            (Some(deduplication_id), Some(group_id)) => (Some(deduplication_id), Some(group_id)),
            _ => {
                return Err(Error::Validation(format!(
                    "{destination}: FIFO destinations require the {MESSAGE_DEDUPLICATION_ID} and {MESSAGE_GROUP_ID} attributes"
                )))
            }
        }
    } else {
        (None, None)
    };

    Ok(EnrichedMessage {
        body,
        attributes,
        deduplication_id,
        group_id,
    })
}

/// Enriches every message of a batch, or fails the whole batch on the first
/// message which cannot be sent.
pub fn enrich_batch(
    destination: &str,
    messages: &[PendingMessage],
    now: UnixMillis,
) -> Result<Vec<EnrichedMessage>, Error> {
    messages
        .iter()
        .map(|message| enrich(destination, message, now))
        .collect()
}

fn is_fifo_key(key: &str) -> bool {
    key == MESSAGE_DEDUPLICATION_ID || key == MESSAGE_GROUP_ID
}

fn fifo_field(message: &PendingMessage, key: &str) -> Option<String> {
    message
        .attributes()
        .get(key)
        .and_then(AttributeValue::from_json)
        .map(|value| value.as_str().to_string())
        .filter(|value| !value.is_empty())
}
