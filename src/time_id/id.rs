// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use uuid::Uuid;

/// Generates a new random (version 4) UUID, e.g. for the `id` message attribute.
pub fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}
