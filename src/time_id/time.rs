// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix date/time which contains the number of non leap milliseconds since (or before) 1970.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
pub struct UnixMillis(pub i64);

impl UnixMillis {
    /// Creates a `UnixMillis` with the current date and time.
    pub fn now() -> Self {
        let millis = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_millis().try_into().unwrap_or(i64::MAX),
            // Clock is before 1970.
            Err(e) => e
                .duration()
                .as_millis()
                .try_into()
                .map(|before: i64| -before)
                .unwrap_or(i64::MIN),
        };
        Self(millis)
    }
}

impl Display for UnixMillis {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        Display::fmt(&self.0, f)
    }
}

impl From<i64> for UnixMillis {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<UnixMillis> for i64 {
    fn from(value: UnixMillis) -> Self {
        value.0
    }
}
