// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

/// Unique message IDs.
mod id;
mod tests;
/// Thin wrapper around Unix timestamp (non leap milliseconds since 1970).
mod time;

pub use self::id::new_message_id;
pub use self::time::UnixMillis;
