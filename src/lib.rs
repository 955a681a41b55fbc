// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#![warn(missing_docs)]
//! This crate buffers outbound messages per destination and sends them to
//! Amazon SQS in batches, adding standard message attributes on the way.

#[cfg(feature = "aws")]
/// A wrapper which provides access to Amazon SQS.
pub mod aws;
#[cfg(feature = "aws")]
pub use aws::*;

/// Types common to multiple wrappers.
pub mod common;
pub use common::*;

/// Thread-safe logging.
pub mod log;
pub use log::*;

/// Per-destination message buffering and batch sending.
pub mod pump;
pub use pump::*;

/// Generates Unix timestamps in milliseconds and unique message IDs.
pub mod time_id;
pub use time_id::*;
