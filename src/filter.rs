//! Hard-constraint filtering of a candidate pool.
//!
//! A candidate failing any single predicate is excluded; no compensating
//! score can re-admit it. Filtering is pure apart from the up-front
//! preference validation, which fails closed.

use crate::geo::haversine_miles;
use crate::profile::{MatchingPreferences, PreferenceError, Profile};

/// Decide whether a single candidate passes every hard constraint.
///
/// Assumes `preferences` have already been validated.
pub fn admits(seeker: &Profile, preferences: &MatchingPreferences, candidate: &Profile) -> bool {
    if candidate.id == seeker.id {
        return false;
    }

    if haversine_miles(seeker.location, candidate.location) > preferences.max_distance_miles {
        return false;
    }

    if !preferences.handicap_range.contains(candidate.handicap) {
        return false;
    }

    if let Some(style) = preferences.playing_style {
        if candidate.playing_style != style {
            return false;
        }
    }

    if let Some(pace) = preferences.pace_of_play {
        if candidate.pace_of_play != pace {
            return false;
        }
    }

    if let Some(size) = preferences.group_size {
        if candidate.preferred_group_size != size {
            return false;
        }
    }

    if preferences.verified_only && !candidate.is_verified {
        return false;
    }

    if candidate.avg_rating < preferences.min_rating {
        return false;
    }

    true
}

/// Filter `pool` down to the candidates admissible for `seeker`.
///
/// The output is always a subset of the input. Invalid preferences fail
/// closed before any candidate is inspected.
pub fn filter_candidates(
    seeker: &Profile,
    preferences: &MatchingPreferences,
    pool: Vec<Profile>,
) -> Result<Vec<Profile>, PreferenceError> {
    preferences.validate()?;
    Ok(pool.into_iter().filter(|candidate| admits(seeker, preferences, candidate)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use crate::profile::{
        GroupSize, HandicapRange, PaceOfPlay, PlayingStyle, SubscriptionTier, TeeTimeSlot,
    };
    use std::collections::BTreeSet;

    fn golfer(id: &str) -> Profile {
        Profile {
            id: id.to_string(),
            location: Coordinates::new(37.7749, -122.4194),
            handicap: 12,
            preferred_times: BTreeSet::new(),
            playing_style: PlayingStyle::Casual,
            pace_of_play: PaceOfPlay::Moderate,
            preferred_group_size: GroupSize::Foursome,
            is_verified: true,
            avg_rating: 4.0,
            total_rounds: 50,
            last_active_millis: 0,
            tier: SubscriptionTier::Free,
        }
    }

    #[test]
    fn excludes_the_seeker_from_their_own_pool() {
        let seeker = golfer("ava");
        let prefs = MatchingPreferences::default();
        assert!(!admits(&seeker, &prefs, &seeker));
    }

    #[test]
    fn excludes_candidates_beyond_max_distance() {
        let seeker = golfer("ava");
        // Oakland is roughly 8.4 miles from the seeker; Sacramento far more.
        let mut near = golfer("near");
        near.location = Coordinates::new(37.8044, -122.2711);
        let mut far = golfer("far");
        far.location = Coordinates::new(38.5816, -121.4944);

        let prefs = MatchingPreferences { max_distance_miles: 10.0, ..Default::default() };
        assert!(admits(&seeker, &prefs, &near));
        assert!(!admits(&seeker, &prefs, &far));
    }

    #[test]
    fn distance_exclusion_ignores_everything_else() {
        // A candidate at 15 miles is excluded regardless of how well the rest
        // of their profile lines up.
        let seeker = golfer("ava");
        let mut candidate = golfer("twin");
        candidate.location = Coordinates::new(37.9929, -122.4194); // ~15 mi due north
        let prefs = MatchingPreferences {
            max_distance_miles: 10.0,
            handicap_range: HandicapRange::new(0, 30),
            preferred_times: [TeeTimeSlot::Morning].into_iter().collect(),
            ..Default::default()
        };
        assert!(!admits(&seeker, &prefs, &candidate));
    }

    #[test]
    fn excludes_handicap_outside_range() {
        let seeker = golfer("ava");
        let mut candidate = golfer("sandbagger");
        candidate.handicap = 30;
        let prefs = MatchingPreferences {
            handicap_range: HandicapRange::new(5, 20),
            ..Default::default()
        };
        assert!(!admits(&seeker, &prefs, &candidate));
    }

    #[test]
    fn optional_filters_only_apply_when_set() {
        let seeker = golfer("ava");
        let mut candidate = golfer("sam");
        candidate.playing_style = PlayingStyle::Competitive;
        candidate.pace_of_play = PaceOfPlay::Fast;
        candidate.preferred_group_size = GroupSize::Twosome;

        let open = MatchingPreferences::default();
        assert!(admits(&seeker, &open, &candidate));

        let styled = MatchingPreferences {
            playing_style: Some(PlayingStyle::Casual),
            ..Default::default()
        };
        assert!(!admits(&seeker, &styled, &candidate));

        let paced =
            MatchingPreferences { pace_of_play: Some(PaceOfPlay::Relaxed), ..Default::default() };
        assert!(!admits(&seeker, &paced, &candidate));

        let sized =
            MatchingPreferences { group_size: Some(GroupSize::Foursome), ..Default::default() };
        assert!(!admits(&seeker, &sized, &candidate));
    }

    #[test]
    fn verified_only_excludes_unverified() {
        let seeker = golfer("ava");
        let mut candidate = golfer("sam");
        candidate.is_verified = false;
        let prefs = MatchingPreferences { verified_only: true, ..Default::default() };
        assert!(!admits(&seeker, &prefs, &candidate));
    }

    #[test]
    fn min_rating_excludes_low_rated() {
        let seeker = golfer("ava");
        let mut candidate = golfer("sam");
        candidate.avg_rating = 2.9;
        let prefs = MatchingPreferences { min_rating: 3.0, ..Default::default() };
        assert!(!admits(&seeker, &prefs, &candidate));
    }

    #[test]
    fn empty_preferred_times_never_filters() {
        let seeker = golfer("ava");
        let mut candidate = golfer("sam");
        candidate.preferred_times = [TeeTimeSlot::Evening].into_iter().collect();
        // Seeker preferences carry no time slots; admission must not care.
        let prefs = MatchingPreferences::default();
        assert!(admits(&seeker, &prefs, &candidate));
    }

    #[test]
    fn invalid_preferences_fail_closed() {
        let seeker = golfer("ava");
        let pool = vec![golfer("sam"), golfer("lee")];
        let prefs = MatchingPreferences {
            handicap_range: HandicapRange::new(10, 0),
            ..Default::default()
        };
        assert!(filter_candidates(&seeker, &prefs, pool).is_err());
    }

    #[test]
    fn output_is_a_subset_of_input() {
        let seeker = golfer("ava");
        let mut pool = Vec::new();
        for i in 0..10 {
            let mut p = golfer(&format!("g{i}"));
            p.handicap = i as i8 * 4;
            pool.push(p);
        }
        let prefs = MatchingPreferences {
            handicap_range: HandicapRange::new(0, 16),
            ..Default::default()
        };
        let kept = filter_candidates(&seeker, &prefs, pool.clone()).expect("valid preferences");
        assert!(kept.len() < pool.len());
        for candidate in &kept {
            assert!(pool.contains(candidate));
            assert!(admits(&seeker, &prefs, candidate));
        }
    }
}
