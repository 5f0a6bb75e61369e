//! Final placement ordering for a scored candidate list.
//!
//! Premium candidates surface first for every viewer; verification, rating
//! and activity break the remaining ties. The sort is stable, so candidates
//! equal on all four keys retain their relative input order — the discovery
//! pipeline relies on this to let the compatibility score act as the last
//! tie-break.

use crate::profile::{Profile, SubscriptionTier};
use crate::score::ScoredCandidate;
use std::cmp::Ordering;

/// Reorder `scored` by placement priority. Pure reordering: the multiset of
/// elements is unchanged.
pub fn rank_candidates(
    viewer_tier: SubscriptionTier,
    mut scored: Vec<ScoredCandidate>,
) -> Vec<ScoredCandidate> {
    tracing::debug!(?viewer_tier, pool = scored.len(), "applying placement order");
    scored.sort_by(|x, y| placement_cmp(&x.profile, &y.profile));
    scored
}

/// Descending on each key: premium tier, verified, rating, total rounds.
fn placement_cmp(a: &Profile, b: &Profile) -> Ordering {
    is_premium(b)
        .cmp(&is_premium(a))
        .then(b.is_verified.cmp(&a.is_verified))
        .then(b.avg_rating.partial_cmp(&a.avg_rating).unwrap_or(Ordering::Equal))
        .then(b.total_rounds.cmp(&a.total_rounds))
}

fn is_premium(profile: &Profile) -> bool {
    profile.tier == SubscriptionTier::Premium
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use crate::profile::{GroupSize, PaceOfPlay, PlayingStyle, TeeTimeSlot};
    use std::collections::BTreeSet;

    fn scored(id: &str, score: u8) -> ScoredCandidate {
        ScoredCandidate {
            profile: Profile {
                id: id.to_string(),
                location: Coordinates::new(37.7749, -122.4194),
                handicap: 12,
                preferred_times: [TeeTimeSlot::Morning].into_iter().collect::<BTreeSet<_>>(),
                playing_style: PlayingStyle::Casual,
                pace_of_play: PaceOfPlay::Moderate,
                preferred_group_size: GroupSize::Foursome,
                is_verified: false,
                avg_rating: 3.0,
                total_rounds: 10,
                last_active_millis: 0,
                tier: SubscriptionTier::Free,
            },
            score,
        }
    }

    fn ids(list: &[ScoredCandidate]) -> Vec<&str> {
        list.iter().map(|c| c.profile.id.as_str()).collect()
    }

    #[test]
    fn premium_candidates_sort_first_for_any_viewer() {
        let mut premium = scored("premium", 10);
        premium.profile.tier = SubscriptionTier::Premium;
        let free = scored("free", 90);

        for viewer in [SubscriptionTier::Free, SubscriptionTier::Premium] {
            let ranked = rank_candidates(viewer, vec![free.clone(), premium.clone()]);
            assert_eq!(ids(&ranked), vec!["premium", "free"]);
        }
    }

    #[test]
    fn verified_breaks_ties_within_a_tier() {
        let mut verified = scored("verified", 50);
        verified.profile.is_verified = true;
        let unverified = scored("unverified", 50);

        let ranked = rank_candidates(SubscriptionTier::Free, vec![unverified, verified]);
        assert_eq!(ids(&ranked), vec!["verified", "unverified"]);
    }

    #[test]
    fn rating_then_rounds_break_remaining_ties() {
        let mut rated = scored("rated", 50);
        rated.profile.avg_rating = 4.8;
        let mut active = scored("active", 50);
        active.profile.total_rounds = 300;
        let idle = scored("idle", 50);

        let ranked =
            rank_candidates(SubscriptionTier::Free, vec![idle.clone(), active.clone(), rated]);
        assert_eq!(ids(&ranked), vec!["rated", "active", "idle"]);
    }

    #[test]
    fn full_ties_retain_input_order() {
        let first = scored("first", 80);
        let second = scored("second", 40);
        let third = scored("third", 60);

        let ranked = rank_candidates(
            SubscriptionTier::Free,
            vec![first.clone(), second.clone(), third.clone()],
        );
        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn ranking_never_drops_or_adds_elements() {
        let mut input = Vec::new();
        for i in 0..20 {
            let mut c = scored(&format!("g{i}"), (i * 5) as u8);
            c.profile.tier =
                if i % 3 == 0 { SubscriptionTier::Premium } else { SubscriptionTier::Free };
            c.profile.is_verified = i % 2 == 0;
            input.push(c);
        }
        let ranked = rank_candidates(SubscriptionTier::Premium, input.clone());
        assert_eq!(ranked.len(), input.len());
        for candidate in &input {
            assert!(ranked.contains(candidate));
        }
    }
}
