// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::pump::BatchFailure;
use std::fmt::{Display, Formatter};

#[cfg(feature = "aws")]
/// A convenient alias for Anyhow so consuming code doesn't need to add to `Cargo.toml`
pub type AnyhowError = anyhow::Error;

/// A convenient alias for Serde JSON error so consuming code doesn't need to add to `Cargo.toml`
pub type SerdeError = serde_json::Error;

#[derive(Debug)]
/// An enum that encapsulates a variety of error types.
///
/// # Example
///
/// Error::Validation(format!("{destination}: missing message-group-id"))
pub enum Error {
    #[cfg(feature = "aws")]
    /// Anyhow error, e.g. a failed SQS call, with the operation that failed.
    Anyhow(AnyhowError, String),
    /// Some entries of a batch were rejected by the destination.
    BatchFailed {
        /// The destination the batch was sent to.
        destination: String,
        /// The number of messages in the batch.
        total: usize,
        /// The rejected entries.
        failures: Vec<BatchFailure>,
    },
    /// The pump was closed before the message was sent.
    Closed(String),
    /// More than one operation failed.
    Multiple(Vec<Error>),
    /// Serde (serialization or deserialization) error
    Serde(SerdeError),
    /// String error.
    String(String),
    /// Local validation failed before any network call.
    Validation(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            #[cfg(feature = "aws")]
            Error::Anyhow(e, context) => write!(f, "{context}: {e}"),
            Error::BatchFailed {
                destination,
                total,
                failures,
            } => write!(
                f,
                "{destination}: {} of {total} messages failed",
                failures.len()
            ),
            Error::Closed(destination) => write!(f, "{destination}: pump is closed"),
            Error::Multiple(errors) => {
                let lines: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                f.write_str(&lines.join("\n"))
            }
            Error::Serde(e) => write!(f, "serde: {e}"),
            Error::String(s) | Error::Validation(s) => Display::fmt(s, f),
        }
    }
}

impl std::error::Error for Error {}

impl From<SerdeError> for Error {
    fn from(e: SerdeError) -> Self {
        Error::Serde(e)
    }
}
