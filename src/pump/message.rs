// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::common::Error;
use serde::Serialize;
use std::collections::BTreeMap;

/// Caller supplied message attributes.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// A message and its caller supplied attributes, as queued for a destination.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingMessage {
    payload: serde_json::Value,
    attributes: Attributes,
}

impl PendingMessage {
    /// Creates a pending message from a JSON payload.
    pub fn new(payload: serde_json::Value, attributes: Option<Attributes>) -> Self {
        Self {
            payload,
            attributes: attributes.unwrap_or_default(),
        }
    }

    /// Creates a pending message from any serializable payload.
    pub fn from_serialize<M: Serialize + ?Sized>(
        message: &M,
        attributes: Option<Attributes>,
    ) -> Result<Self, Error> {
        let payload = serde_json::to_value(message).map_err(Error::Serde)?;
        Ok(Self::new(payload, attributes))
    }

    /// The attributes supplied when the message was sent.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// The message payload.
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }
}
