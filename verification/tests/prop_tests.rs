use proptest::prelude::*;

use heirloom_types::{ConfidenceTier, SourceVerdict, Timestamp, VerificationRecord};
use heirloom_verification::combine;

fn tier() -> impl Strategy<Value = ConfidenceTier> {
    prop_oneof![
        Just(ConfidenceTier::High),
        Just(ConfidenceTier::Medium),
        Just(ConfidenceTier::Low),
    ]
}

/// A verdict from one of a few source names; repeats are likely.
fn verdict() -> impl Strategy<Value = SourceVerdict> {
    (prop::sample::select(vec!["SSDI", "GovernmentRegistry", "News"]), tier(), any::<bool>())
        .prop_map(|(name, tier, verified)| {
            if verified {
                SourceVerdict::matched(
                    name,
                    VerificationRecord::new(
                        "John Doe",
                        "1950-01-01",
                        "2024-03-15",
                        None,
                        "US",
                        tier,
                        format!("{name}-{}", tier),
                        Timestamp::new(0),
                    ),
                )
            } else {
                SourceVerdict::failed(name, "down")
            }
        })
}

fn high(name: &str) -> SourceVerdict {
    SourceVerdict::matched(
        name,
        VerificationRecord::new(
            "John Doe",
            "1950-01-01",
            "2024-03-15",
            None,
            "US",
            ConfidenceTier::High,
            format!("{name}-extra"),
            Timestamp::new(0),
        ),
    )
}

proptest! {
    /// Sources never repeat, whatever names the verdicts carry.
    #[test]
    fn sources_are_unique(verdicts in prop::collection::vec(verdict(), 0..8)) {
        let combined = combine(verdicts);
        let mut seen = std::collections::HashSet::new();
        for source in &combined.sources {
            prop_assert!(seen.insert(source.clone()), "duplicate source {}", source);
        }
    }

    /// A verified aggregate always carries a record.
    #[test]
    fn verified_implies_record(verdicts in prop::collection::vec(verdict(), 0..8)) {
        let combined = combine(verdicts);
        prop_assert!(!combined.is_verified || combined.record.is_some());
    }

    /// Adding another high-tier match never lowers confidence.
    #[test]
    fn extra_high_match_never_lowers_confidence(
        verdicts in prop::collection::vec(verdict(), 0..6),
    ) {
        let before = combine(verdicts.clone());
        let mut more = verdicts;
        more.push(high("Extra"));
        let after = combine(more);
        prop_assert!(after.confidence.weight() >= before.confidence.weight());
        prop_assert!(after.is_verified);
    }
}
