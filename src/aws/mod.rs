// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

/// Loads AWS configuration.
mod config;
/// A batch sender backed by the SQS client.
mod sqs;
/// Unit tests.
mod tests;

pub use crate::aws::config::{create_aws_config_loader, load_aws_config};
pub use crate::aws::sqs::{new_sqs_client, SqsClient, SqsSender, MAX_SQS_BATCH_SIZE};
