use proptest::prelude::*;

use heirloom_types::{Timestamp, VerificationQuery};

proptest! {
    /// Cache keys do not depend on the case or spacing of the name.
    #[test]
    fn cache_key_is_case_and_space_insensitive(
        first in "[A-Za-z]{1,12}",
        last in "[A-Za-z]{1,12}",
        pad in 1usize..4,
    ) {
        let plain = VerificationQuery::new(format!("{first} {last}"), "1950-01-01", "US");
        let spaced = VerificationQuery::new(
            format!("{}{}{}", first.to_uppercase(), " ".repeat(pad), last.to_lowercase()),
            "1950-01-01",
            "us",
        );
        prop_assert_eq!(plain.cache_key(), spaced.cache_key());
    }

    /// A timestamp expires exactly when `ttl` seconds have elapsed.
    #[test]
    fn expiry_matches_elapsed(
        stored in 0u64..1_000_000,
        ttl in 0u64..1_000_000,
        delta in 0u64..2_000_000,
    ) {
        let t = Timestamp::new(stored);
        let now = Timestamp::new(stored + delta);
        prop_assert_eq!(t.has_expired(ttl, now), t.elapsed_since(now) >= ttl);
    }
}
