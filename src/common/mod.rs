// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

mod config;
/// An enum that encapsulates a variety of error types.
mod error;
#[cfg(feature = "http")]
mod http;

pub use self::config::{PumpConfig, PumpConfigBuilder, DEFAULT_MAX_BATCH_SIZE};
pub use self::error::{Error, SerdeError};
#[cfg(feature = "aws")]
pub use self::error::AnyhowError;
#[cfg(feature = "http")]
pub use self::http::create_error_response;
