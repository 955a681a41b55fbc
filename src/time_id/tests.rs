// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#[cfg(test)]
mod time_tests {
    use crate::time_id::{new_message_id, UnixMillis};
    use std::collections::HashSet;

    #[test]
    fn time_cast_now() {
        println!("Testing time casts (for time now).");
        let t1 = UnixMillis::now();
        println!("t1 = {t1:?}");
        // 2020-01-01T00:00:00Z
        assert!(t1.0 > 1_577_836_800_000);

        let i: i64 = t1.into();
        let t2 = UnixMillis::from(i);
        assert_eq!(t1, t2);
        assert_eq!(t2.to_string(), i.to_string());
    }

    #[test]
    fn message_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| new_message_id()).collect();
        assert_eq!(ids.len(), 1000);
        let id = ids.into_iter().next().unwrap();
        assert_eq!(id.len(), 36);
    }
}
